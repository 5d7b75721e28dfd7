//! In-memory sink for tests and dry runs.

use std::collections::BTreeMap;

use dqi_model::{CleanStatusResult, DqiResult, SubjectKey, SubjectMasterRecord};

use crate::error::{Result, StoreError};
use crate::{ResultSink, RunOutput};

/// Keeps run outputs in maps keyed by subject. Mirrors the atomic contract:
/// a run either lands fully or not at all, so an injected failure leaves
/// prior state untouched.
#[derive(Debug, Default)]
pub struct MemorySink {
    masters: BTreeMap<SubjectKey, SubjectMasterRecord>,
    dqi_results: BTreeMap<SubjectKey, DqiResult>,
    clean_results: BTreeMap<SubjectKey, CleanStatusResult>,
    fail_next: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `persist_run` fail, for atomicity tests.
    pub fn inject_failure(&mut self) {
        self.fail_next = true;
    }

    pub fn masters(&self) -> &BTreeMap<SubjectKey, SubjectMasterRecord> {
        &self.masters
    }

    pub fn dqi_results(&self) -> &BTreeMap<SubjectKey, DqiResult> {
        &self.dqi_results
    }

    pub fn clean_results(&self) -> &BTreeMap<SubjectKey, CleanStatusResult> {
        &self.clean_results
    }
}

impl ResultSink for MemorySink {
    fn persist_run(&mut self, run: &RunOutput) -> Result<()> {
        if self.fail_next {
            self.fail_next = false;
            return Err(StoreError::Message("injected failure".to_string()));
        }
        // Stage the whole batch before touching the maps.
        let masters: Vec<_> = run
            .masters
            .iter()
            .map(|record| (record.key(), record.clone()))
            .collect();
        let dqi: Vec<_> = run
            .dqi_results
            .iter()
            .map(|result| (result.key.clone(), result.clone()))
            .collect();
        let clean: Vec<_> = run
            .clean_results
            .iter()
            .map(|result| (result.key.clone(), result.clone()))
            .collect();

        self.masters.extend(masters);
        self.dqi_results.extend(dqi);
        self.clean_results.extend(clean);
        Ok(())
    }
}
