//! Pipeline driver: ingest, reconcile, score, evaluate, persist.
//!
//! Reconciliation runs to completion for the whole population before any
//! subject is scored, and the run's outputs land in the database as one
//! atomic batch.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use dqi_model::{CleanStatus, DqiCategory};
use dqi_reconcile::{ReconcileReport, reconcile};
use dqi_score::{ScoringConfig, ScoringEngine, evaluate_all};
use dqi_store::{ResultSink, RunOutput, SqliteSink};

/// Everything the run summary needs about one completed run.
#[derive(Debug)]
pub struct RunResult {
    pub project: String,
    pub subjects: usize,
    pub clean: usize,
    pub not_clean: usize,
    pub category_counts: BTreeMap<DqiCategory, usize>,
    pub report: ReconcileReport,
    pub db_path: PathBuf,
}

/// Run the full pipeline for one study directory.
pub fn run_study(study_dir: &Path, config: ScoringConfig, db_path: &Path) -> Result<RunResult> {
    let study = {
        let span = info_span!("ingest", study_dir = %study_dir.display());
        let _guard = span.enter();
        dqi_ingest::load_study(study_dir).context("load study reports")?
    };
    let project = study.project.clone();

    let outcome = {
        let span = info_span!("reconcile", project = %project);
        let _guard = span.enter();
        reconcile(study.staging, study.tables)
    };

    let (dqi_results, clean_results) = {
        let span = info_span!("score", project = %project);
        let _guard = span.enter();
        let engine = ScoringEngine::new(config);
        (
            engine.score_all(&outcome.records),
            evaluate_all(&outcome.records),
        )
    };

    let mut category_counts: BTreeMap<DqiCategory, usize> = BTreeMap::new();
    for result in &dqi_results {
        *category_counts.entry(result.category).or_default() += 1;
    }
    let clean = clean_results
        .iter()
        .filter(|r| r.status == CleanStatus::Clean)
        .count();
    let not_clean = clean_results.len() - clean;

    let run = RunOutput {
        masters: outcome.records,
        dqi_results,
        clean_results,
    };
    {
        let span = info_span!("persist", db = %db_path.display());
        let _guard = span.enter();
        let mut sink = SqliteSink::open(db_path).context("open results database")?;
        sink.persist_run(&run).context("persist run")?;
    }

    info!(
        project = %project,
        subjects = run.masters.len(),
        clean,
        not_clean,
        "run complete"
    );

    Ok(RunResult {
        project,
        subjects: run.masters.len(),
        clean,
        not_clean,
        category_counts,
        report: outcome.report,
        db_path: db_path.to_path_buf(),
    })
}
