//! Persistence sink for run outputs.
//!
//! A run's results are written as one atomic batch: either every subject's
//! master record, DQI result, and clean-status row lands, or none do. Reruns
//! upsert by `(project, site, subject)`.

pub mod error;
pub mod memory;
pub mod sqlite;

pub use error::{Result, StoreError};
pub use memory::MemorySink;
pub use sqlite::SqliteSink;

use dqi_model::{CleanStatusResult, DqiResult, SubjectMasterRecord};

/// Everything produced for one run of one study population.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    pub masters: Vec<SubjectMasterRecord>,
    pub dqi_results: Vec<DqiResult>,
    pub clean_results: Vec<CleanStatusResult>,
}

/// A durable destination for run outputs.
///
/// Implementations must be atomic at run granularity: a failed persist
/// leaves no partial rows behind, so a subject's DQI and clean-status rows
/// are never out of step.
pub trait ResultSink {
    fn persist_run(&mut self, run: &RunOutput) -> Result<()>;
}
