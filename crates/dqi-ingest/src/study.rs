//! Study directory loading.
//!
//! A study is a directory of CSV report exports, one file per report. The
//! subject-level metrics export is required; every event report is optional
//! and loads as an empty table with a warning when the file is absent.

use std::path::Path;

use dqi_model::{CodingDictionary, EventTables, SubjectMasterRecord};

use crate::error::{IngestError, Result};
use crate::reports;
use crate::table::CsvTable;

/// Expected file names inside a study directory.
pub mod files {
    pub const SUBJECT_LEVEL_METRICS: &str = "subject_level_metrics.csv";
    pub const COMPLETED_VISITS: &str = "sv.csv";
    pub const VISIT_PROJECTION: &str = "visit_projection_tracker.csv";
    pub const MISSING_PAGES: &str = "missing_pages_report.csv";
    pub const CODING_MEDDRA: &str = "global_coding_meddra.csv";
    pub const CODING_WHODD: &str = "global_coding_whodd.csv";
    pub const MISSING_LAB: &str = "missing_lab_name_and_ranges.csv";
    pub const COMPILED_EDRR: &str = "compiled_edrr.csv";
    pub const INACTIVATED_FORMS: &str = "inactivated_forms_folders.csv";
    pub const ESAE_DM: &str = "esae_dashboard_dm.csv";
    pub const ESAE_SAFETY: &str = "esae_dashboard_safety.csv";
    pub const QUERY_REPORT: &str = "query_report_cumulative.csv";
    pub const NON_CONFORMANT: &str = "non_conformant.csv";
}

/// Everything ingested for one study.
#[derive(Debug, Clone, Default)]
pub struct StudyData {
    /// Project name, taken from the directory name when the reports carry
    /// no project column.
    pub project: String,
    pub staging: Vec<SubjectMasterRecord>,
    pub tables: EventTables,
}

/// Reads an optional report; absent files yield `None` with a warning.
fn optional_table(dir: &Path, name: &str) -> Result<Option<CsvTable>> {
    let path = dir.join(name);
    if !path.exists() {
        tracing::warn!(path = %path.display(), "report not found, treating as empty");
        return Ok(None);
    }
    CsvTable::read(&path).map(Some)
}

/// Reads an optional report into rows via the given reader.
fn optional_rows<T>(
    dir: &Path,
    name: &str,
    project: &str,
    read: impl Fn(&CsvTable, &str) -> Result<Vec<T>>,
) -> Result<Vec<T>> {
    match optional_table(dir, name)? {
        Some(table) => {
            let rows = read(&table, project)?;
            tracing::debug!(report = name, rows = rows.len(), "loaded report");
            Ok(rows)
        }
        None => Ok(Vec::new()),
    }
}

/// Loads a full study directory.
///
/// The project name defaults to the directory's base name; reports that
/// carry an explicit project column override it per row.
pub fn load_study(dir: &Path) -> Result<StudyData> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let project = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let staging_path = dir.join(files::SUBJECT_LEVEL_METRICS);
    let staging_table = CsvTable::read(&staging_path)?;
    let staging = reports::read_staging(&staging_table, &project)?;

    let tables = EventTables {
        completed_visits: optional_rows(
            dir,
            files::COMPLETED_VISITS,
            &project,
            reports::read_completed_visits,
        )?,
        missing_visits: optional_rows(
            dir,
            files::VISIT_PROJECTION,
            &project,
            reports::read_missing_visits,
        )?,
        missing_pages: optional_rows(
            dir,
            files::MISSING_PAGES,
            &project,
            reports::read_missing_pages,
        )?,
        coding_records: {
            let mut records = optional_rows(dir, files::CODING_MEDDRA, &project, |t, p| {
                reports::read_coding(t, p, CodingDictionary::MedDra)
            })?;
            records.extend(optional_rows(dir, files::CODING_WHODD, &project, |t, p| {
                reports::read_coding(t, p, CodingDictionary::WhoDd)
            })?);
            records
        },
        lab_issues: optional_rows(dir, files::MISSING_LAB, &project, reports::read_lab_issues)?,
        edrr_issues: optional_rows(
            dir,
            files::COMPILED_EDRR,
            &project,
            reports::read_edrr_issues,
        )?,
        inactivated_forms: optional_rows(
            dir,
            files::INACTIVATED_FORMS,
            &project,
            reports::read_inactivated_forms,
        )?,
        esae_dm: optional_rows(dir, files::ESAE_DM, &project, reports::read_sae_reviews)?,
        esae_safety: optional_rows(dir, files::ESAE_SAFETY, &project, reports::read_sae_reviews)?,
        queries: optional_rows(dir, files::QUERY_REPORT, &project, reports::read_queries)?,
        non_conformant: optional_rows(
            dir,
            files::NON_CONFORMANT,
            &project,
            reports::read_non_conformant,
        )?,
    };

    tracing::info!(
        project,
        subjects = staging.len(),
        completed_visits = tables.completed_visits.len(),
        queries = tables.queries.len(),
        "study loaded"
    );

    Ok(StudyData {
        project,
        staging,
        tables,
    })
}
