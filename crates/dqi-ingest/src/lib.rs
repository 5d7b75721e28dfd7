//! Study report ingestion.
//!
//! This crate reads the CSV report exports of one study into the typed rows
//! consumed by reconciliation: a staging subject population plus the event
//! tables (visits, queries, coding, eSAE queues, ...).
//!
//! # Features
//!
//! - **Column normalization**: report exports disagree on header spelling;
//!   every header resolves to a canonical name before row reading
//! - **Lenient cells**: blank or garbage numeric cells coerce to 0 with a
//!   warning, dates that fail both export formats read as absent
//! - **Optional reports**: only the subject-level metrics file is required;
//!   absent event reports load as empty tables
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use dqi_ingest::load_study;
//!
//! let study = load_study(Path::new("studies/Study 1"))?;
//! println!("{} subjects staged", study.staging.len());
//! ```

mod columns;
mod error;
mod reports;
mod study;
mod table;

pub use columns::{HeaderMap, canonical_column};
pub use error::{IngestError, Result};
pub use reports::{
    read_coding, read_completed_visits, read_edrr_issues, read_inactivated_forms, read_lab_issues,
    read_missing_pages, read_missing_visits, read_non_conformant, read_queries, read_sae_reviews,
    read_staging,
};
pub use study::{StudyData, files, load_study};
pub use table::{CsvTable, Row, parse_report_date};
