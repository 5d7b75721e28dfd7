pub mod coding;
pub mod counts;
pub mod engine;
pub mod forms;
pub mod site;
pub mod visits;

pub use coding::{TermCounts, term_counts_by_subject};
pub use counts::EventCounts;
pub use engine::{ReconcileOutcome, ReconcileReport, reconcile};
pub use forms::{FormOverlap, form_overlap_by_subject};
pub use site::{SiteLookup, backfill_sites};
pub use visits::latest_visit_by_subject;
