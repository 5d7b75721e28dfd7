//! SQLite-backed result sink.
//!
//! One transaction per run: any failure rolls the whole batch back.
//! `INSERT OR REPLACE` keyed on `(project_name, site_id, subject_id)` gives
//! rerun-safe upserts.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{Connection, params};
use tracing::info;

use dqi_model::{CleanStatusResult, SubjectKey};

use crate::error::{Result, StoreError};
use crate::{ResultSink, RunOutput};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS subject_level_metrics (
    project_name TEXT NOT NULL,
    region TEXT,
    country TEXT,
    site_id TEXT NOT NULL,
    subject_id TEXT NOT NULL,
    latest_visit TEXT,
    subject_status TEXT,
    missing_visits INTEGER DEFAULT 0,
    missing_pages INTEGER DEFAULT 0,
    coded_terms INTEGER DEFAULT 0,
    uncoded_terms INTEGER DEFAULT 0,
    open_issues_lnr INTEGER DEFAULT 0,
    open_issues_edrr INTEGER DEFAULT 0,
    inactivated_forms_folders INTEGER DEFAULT 0,
    esae_dashboard_dm INTEGER DEFAULT 0,
    esae_dashboard_safety INTEGER DEFAULT 0,
    expected_visits INTEGER DEFAULT 0,
    pages_entered INTEGER DEFAULT 0,
    pages_non_conformant INTEGER DEFAULT 0,
    crfs_with_queries_nc INTEGER DEFAULT 0,
    crfs_without_queries_nc INTEGER DEFAULT 0,
    percentage_clean_crf REAL DEFAULT 0.0,
    dm_queries INTEGER DEFAULT 0,
    clinical_queries INTEGER DEFAULT 0,
    medical_queries INTEGER DEFAULT 0,
    site_queries INTEGER DEFAULT 0,
    field_monitor_queries INTEGER DEFAULT 0,
    coding_queries INTEGER DEFAULT 0,
    safety_queries INTEGER DEFAULT 0,
    total_queries INTEGER DEFAULT 0,
    crfs_require_verification INTEGER DEFAULT 0,
    forms_verified INTEGER DEFAULT 0,
    crfs_frozen INTEGER DEFAULT 0,
    crfs_not_frozen INTEGER DEFAULT 0,
    crfs_locked INTEGER DEFAULT 0,
    crfs_unlocked INTEGER DEFAULT 0,
    pds_confirmed INTEGER DEFAULT 0,
    pds_proposed INTEGER DEFAULT 0,
    crfs_signed INTEGER DEFAULT 0,
    crfs_overdue_within_45_days INTEGER DEFAULT 0,
    crfs_overdue_45_to_90_days INTEGER DEFAULT 0,
    crfs_overdue_beyond_90_days INTEGER DEFAULT 0,
    broken_signatures INTEGER DEFAULT 0,
    crfs_never_signed INTEGER DEFAULT 0,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(project_name, site_id, subject_id)
);
CREATE TABLE IF NOT EXISTS subject_dqi_clean_status (
    project_name TEXT NOT NULL,
    site_id TEXT NOT NULL,
    subject_id TEXT NOT NULL,
    dqi_score REAL DEFAULT 0.0,
    dqi_category TEXT,
    norm_safety_issues REAL DEFAULT 0.0,
    norm_open_queries REAL DEFAULT 0.0,
    norm_missing_visits REAL DEFAULT 0.0,
    norm_missing_pages REAL DEFAULT 0.0,
    norm_non_conformant REAL DEFAULT 0.0,
    norm_unsigned_crfs REAL DEFAULT 0.0,
    norm_unverified_forms REAL DEFAULT 0.0,
    norm_uncoded_terms REAL DEFAULT 0.0,
    norm_protocol_deviations REAL DEFAULT 0.0,
    clean_status TEXT,
    criteria_met INTEGER DEFAULT 0,
    criteria_total INTEGER DEFAULT 11,
    failing_criteria TEXT,
    calculated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(project_name, site_id, subject_id)
);
CREATE INDEX IF NOT EXISTS idx_slm_key
    ON subject_level_metrics(project_name, site_id, subject_id);
CREATE INDEX IF NOT EXISTS idx_dqi_key
    ON subject_dqi_clean_status(project_name, site_id, subject_id);
CREATE INDEX IF NOT EXISTS idx_dqi_category
    ON subject_dqi_clean_status(dqi_category);
CREATE INDEX IF NOT EXISTS idx_clean_status
    ON subject_dqi_clean_status(clean_status);
";

pub struct SqliteSink {
    connection: Connection,
}

impl SqliteSink {
    /// Open (or create) the database at `path` and ensure the schema.
    pub fn open(path: &Path) -> Result<Self> {
        let connection = Connection::open(path)?;
        connection.pragma_update(None, "journal_mode", "WAL")?;
        connection.pragma_update(None, "synchronous", "NORMAL")?;
        connection.execute_batch(SCHEMA)?;
        Ok(Self { connection })
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory()?;
        connection.execute_batch(SCHEMA)?;
        Ok(Self { connection })
    }

    pub fn subject_count(&self) -> Result<usize> {
        let count: i64 =
            self.connection
                .query_row("SELECT COUNT(*) FROM subject_level_metrics", [], |row| {
                    row.get(0)
                })?;
        Ok(count as usize)
    }

    pub fn result_count(&self) -> Result<usize> {
        let count: i64 = self.connection.query_row(
            "SELECT COUNT(*) FROM subject_dqi_clean_status",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

impl ResultSink for SqliteSink {
    fn persist_run(&mut self, run: &RunOutput) -> Result<()> {
        let clean_by_key: HashMap<&SubjectKey, &CleanStatusResult> = run
            .clean_results
            .iter()
            .map(|result| (&result.key, result))
            .collect();

        let transaction = self.connection.transaction()?;
        {
            let mut insert_master = transaction.prepare(
                "INSERT OR REPLACE INTO subject_level_metrics (
                    project_name, region, country, site_id, subject_id,
                    latest_visit, subject_status, missing_visits, missing_pages,
                    coded_terms, uncoded_terms, open_issues_lnr, open_issues_edrr,
                    inactivated_forms_folders, esae_dashboard_dm, esae_dashboard_safety,
                    expected_visits, pages_entered, pages_non_conformant,
                    crfs_with_queries_nc, crfs_without_queries_nc, percentage_clean_crf,
                    dm_queries, clinical_queries, medical_queries, site_queries,
                    field_monitor_queries, coding_queries, safety_queries, total_queries,
                    crfs_require_verification, forms_verified, crfs_frozen, crfs_not_frozen,
                    crfs_locked, crfs_unlocked, pds_confirmed, pds_proposed, crfs_signed,
                    crfs_overdue_within_45_days, crfs_overdue_45_to_90_days,
                    crfs_overdue_beyond_90_days, broken_signatures, crfs_never_signed,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                          ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26,
                          ?27, ?28, ?29, ?30, ?31, ?32, ?33, ?34, ?35, ?36, ?37, ?38,
                          ?39, ?40, ?41, ?42, ?43, ?44, CURRENT_TIMESTAMP)",
            )?;
            for record in &run.masters {
                insert_master.execute(params![
                    record.project,
                    record.region,
                    record.country,
                    record.site,
                    record.subject,
                    record.latest_visit,
                    record.subject_status,
                    record.missing_visits,
                    record.missing_pages,
                    record.coded_terms,
                    record.uncoded_terms,
                    record.open_issues_lnr,
                    record.open_issues_edrr,
                    record.inactivated_forms_folders,
                    record.esae_dm_reviews,
                    record.esae_safety_reviews,
                    record.expected_visits,
                    record.pages_entered,
                    record.pages_non_conformant,
                    record.crfs_with_queries_nc,
                    record.crfs_without_queries_nc,
                    record.percentage_clean_crf,
                    record.dm_queries,
                    record.clinical_queries,
                    record.medical_queries,
                    record.site_queries,
                    record.field_monitor_queries,
                    record.coding_queries,
                    record.safety_queries,
                    record.total_queries,
                    record.crfs_require_verification,
                    record.forms_verified,
                    record.crfs_frozen,
                    record.crfs_not_frozen,
                    record.crfs_locked,
                    record.crfs_unlocked,
                    record.pds_confirmed,
                    record.pds_proposed,
                    record.crfs_signed,
                    record.crfs_overdue_within_45_days,
                    record.crfs_overdue_45_to_90_days,
                    record.crfs_overdue_beyond_90_days,
                    record.broken_signatures,
                    record.crfs_never_signed,
                ])?;
            }

            let mut insert_result = transaction.prepare(
                "INSERT OR REPLACE INTO subject_dqi_clean_status (
                    project_name, site_id, subject_id,
                    dqi_score, dqi_category,
                    norm_safety_issues, norm_open_queries, norm_missing_visits,
                    norm_missing_pages, norm_non_conformant, norm_unsigned_crfs,
                    norm_unverified_forms, norm_uncoded_terms, norm_protocol_deviations,
                    clean_status, criteria_met, criteria_total, failing_criteria,
                    calculated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                          ?15, ?16, ?17, ?18, CURRENT_TIMESTAMP)",
            )?;
            for dqi in &run.dqi_results {
                let clean = clean_by_key.get(&dqi.key).ok_or_else(|| {
                    StoreError::Message(format!("no clean-status result for {}", dqi.key))
                })?;
                let failing = if clean.failing_criteria.is_empty() {
                    None
                } else {
                    Some(clean.failing_criteria.join(", "))
                };
                insert_result.execute(params![
                    dqi.key.project,
                    dqi.key.site,
                    dqi.key.subject,
                    dqi.dqi_score,
                    dqi.category.as_str(),
                    dqi.scores.safety_issues,
                    dqi.scores.open_queries,
                    dqi.scores.missing_visits,
                    dqi.scores.missing_pages,
                    dqi.scores.non_conformant,
                    dqi.scores.unsigned_crfs,
                    dqi.scores.unverified_forms,
                    dqi.scores.uncoded_terms,
                    dqi.scores.protocol_deviations,
                    clean.status.as_str(),
                    clean.criteria_met,
                    clean.criteria_total,
                    failing,
                ])?;
            }
        }
        transaction.commit()?;

        info!(
            masters = run.masters.len(),
            results = run.dqi_results.len(),
            "persisted run"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqi_model::{
        CLEAN_CRITERIA_TOTAL, CleanCriteria, CleanStatus, DqiCategory, DqiResult,
        NormalizedScores, SubjectMasterRecord,
    };

    fn sample_run(subject: &str, score: f64) -> RunOutput {
        let master = SubjectMasterRecord {
            project: "Study 1".to_string(),
            site: "101".to_string(),
            subject: subject.to_string(),
            ..Default::default()
        };
        let key = master.key();
        RunOutput {
            masters: vec![master],
            dqi_results: vec![DqiResult {
                key: key.clone(),
                scores: NormalizedScores::default(),
                dqi_score: score,
                category: DqiCategory::from_score(score),
            }],
            clean_results: vec![CleanStatusResult {
                key,
                criteria: CleanCriteria::default(),
                criteria_met: 0,
                criteria_total: CLEAN_CRITERIA_TOTAL,
                status: CleanStatus::NotClean,
                failing_criteria: vec!["no_open_queries".to_string()],
            }],
        }
    }

    #[test]
    fn persists_and_upserts_by_key() {
        let mut sink = SqliteSink::open_in_memory().expect("open");
        sink.persist_run(&sample_run("A", 80.0)).expect("persist");
        sink.persist_run(&sample_run("A", 60.0)).expect("persist again");
        assert_eq!(sink.subject_count().expect("count"), 1);
        assert_eq!(sink.result_count().expect("count"), 1);

        let score: f64 = sink
            .connection
            .query_row(
                "SELECT dqi_score FROM subject_dqi_clean_status WHERE subject_id = 'A'",
                [],
                |row| row.get(0),
            )
            .expect("query");
        assert_eq!(score, 60.0);
    }

    #[test]
    fn mismatched_results_fail_without_partial_rows() {
        let mut sink = SqliteSink::open_in_memory().expect("open");
        let mut run = sample_run("A", 80.0);
        run.clean_results.clear(); // force the batch to fail mid-way

        assert!(sink.persist_run(&run).is_err());
        // The transaction never committed: no masters, no results.
        assert_eq!(sink.subject_count().expect("count"), 0);
        assert_eq!(sink.result_count().expect("count"), 0);
    }
}
