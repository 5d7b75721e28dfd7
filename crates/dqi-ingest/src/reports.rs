//! Typed readers for each study report export.
//!
//! Every reader follows the same contract: rows without a subject id are
//! skipped (report footers and banner rows), a missing project column falls
//! back to the study's project name, and numeric cells coerce per
//! [`Row::count`](crate::table::Row::count).

use dqi_model::{
    CodingDictionary, CodingRecord, CompletedVisit, EdrrIssue, InactivatedForm, LabIssue,
    MissingPage, MissingVisit, NonConformantRow, QueryRow, SaeReview, SubjectMasterRecord,
};

use crate::error::Result;
use crate::table::{CsvTable, Row};

fn project_of(row: &Row<'_>, default_project: &str) -> String {
    row.text_owned("project")
        .unwrap_or_else(|| default_project.to_string())
}

/// Rows of a table that carry a subject id, with a debug note for the rest.
fn subject_rows<'a>(
    table: &'a CsvTable,
    default_project: &'a str,
) -> impl Iterator<Item = (String, String, Row<'a>)> {
    let mut skipped = 0usize;
    let path = table.path().to_path_buf();
    table
        .rows()
        .filter_map(move |row| match row.text_owned("subject") {
            Some(subject) => Some((project_of(&row, default_project), subject, row)),
            None => {
                skipped += 1;
                tracing::debug!(
                    path = %path.display(),
                    skipped,
                    "skipping row without subject id"
                );
                None
            }
        })
}

/// Subject-level metrics sheet: the staging population. Requires subject and
/// site columns; every count column is optional and coerces to 0.
pub fn read_staging(table: &CsvTable, default_project: &str) -> Result<Vec<SubjectMasterRecord>> {
    table.require("subject")?;
    table.require("site")?;

    let mut records = Vec::with_capacity(table.len());
    for (project, subject, row) in subject_rows(table, default_project) {
        records.push(SubjectMasterRecord {
            project,
            region: row.text_owned("region"),
            country: row.text_owned("country"),
            site: row.text_or_empty("site"),
            subject,
            latest_visit: row.text_owned("latest_visit").map(strip_visit_ordinal),
            subject_status: row.text_owned("subject_status"),

            missing_visits: row.count("missing_visits"),
            missing_pages: row.count("missing_pages"),
            coded_terms: row.count("coded_terms"),
            uncoded_terms: row.count("uncoded_terms"),
            open_issues_lnr: row.count("open_issues_lnr"),
            open_issues_edrr: row.count("open_issues_edrr"),
            inactivated_forms_folders: row.count("inactivated_forms_folders"),
            esae_dm_reviews: row.count("esae_dm_reviews"),
            esae_safety_reviews: row.count("esae_safety_reviews"),
            expected_visits: row.count("expected_visits"),
            pages_entered: row.count("pages_entered"),
            pages_non_conformant: row.count("pages_non_conformant"),
            crfs_with_queries_nc: row.count("crfs_with_queries_nc"),
            crfs_without_queries_nc: row.count("crfs_without_queries_nc"),
            percentage_clean_crf: row.percent("percentage_clean_crf"),

            dm_queries: row.count("dm_queries"),
            clinical_queries: row.count("clinical_queries"),
            medical_queries: row.count("medical_queries"),
            site_queries: row.count("site_queries"),
            field_monitor_queries: row.count("field_monitor_queries"),
            coding_queries: row.count("coding_queries"),
            safety_queries: row.count("safety_queries"),
            total_queries: row.count("total_queries"),

            crfs_require_verification: row.count("crfs_require_verification"),
            forms_verified: row.count("forms_verified"),
            crfs_frozen: row.count("crfs_frozen"),
            crfs_not_frozen: row.count("crfs_not_frozen"),
            crfs_locked: row.count("crfs_locked"),
            crfs_unlocked: row.count("crfs_unlocked"),
            pds_confirmed: row.count("pds_confirmed"),
            pds_proposed: row.count("pds_proposed"),

            crfs_signed: row.count("crfs_signed"),
            crfs_overdue_within_45_days: row.count("crfs_overdue_within_45_days"),
            crfs_overdue_45_to_90_days: row.count("crfs_overdue_45_to_90_days"),
            crfs_overdue_beyond_90_days: row.count("crfs_overdue_beyond_90_days"),
            broken_signatures: row.count("broken_signatures"),
            crfs_never_signed: row.count("crfs_never_signed"),
        });
    }
    Ok(records)
}

/// Drops a trailing visit ordinal like " (3)" that the metrics export
/// appends to the latest-visit name.
fn strip_visit_ordinal(value: String) -> String {
    let trimmed = value.trim_end();
    if let Some(open) = trimmed.rfind(" (")
        && trimmed.ends_with(')')
        && trimmed[open + 2..trimmed.len() - 1]
            .chars()
            .all(|c| c.is_ascii_digit())
        && open + 2 < trimmed.len() - 1
    {
        return trimmed[..open].trim_end().to_string();
    }
    trimmed.to_string()
}

/// Completed-visit (SV) export.
pub fn read_completed_visits(
    table: &CsvTable,
    default_project: &str,
) -> Result<Vec<CompletedVisit>> {
    table.require("subject")?;
    Ok(subject_rows(table, default_project)
        .map(|(project, subject, row)| CompletedVisit {
            project,
            site: row.text_or_empty("site"),
            subject,
            visit_name: row.text_or_empty("visit_name"),
            visit_date: row.date("visit_date"),
        })
        .collect())
}

/// Visit projection tracker (missing visits).
pub fn read_missing_visits(table: &CsvTable, default_project: &str) -> Result<Vec<MissingVisit>> {
    table.require("subject")?;
    Ok(subject_rows(table, default_project)
        .map(|(project, subject, row)| MissingVisit {
            project,
            site: row.text_or_empty("site"),
            subject,
            visit_name: row.text_owned("visit_name"),
            projected_date: row.date("projected_date"),
            days_outstanding: row.days("days_outstanding"),
        })
        .collect())
}

/// Missing pages report, first sheet only (all pages missing).
pub fn read_missing_pages(table: &CsvTable, default_project: &str) -> Result<Vec<MissingPage>> {
    table.require("subject")?;
    Ok(subject_rows(table, default_project)
        .map(|(project, subject, row)| MissingPage {
            project,
            site: row.text_or_empty("site"),
            subject,
            visit_name: row.text_owned("visit_name"),
            form_name: row.text_owned("form_name"),
            days_missing: row.days("days_missing"),
        })
        .collect())
}

/// Global coding report for one dictionary. These exports have no site
/// column at all.
pub fn read_coding(
    table: &CsvTable,
    default_project: &str,
    dictionary: CodingDictionary,
) -> Result<Vec<CodingRecord>> {
    table.require("subject")?;
    Ok(subject_rows(table, default_project)
        .map(|(project, subject, row)| CodingRecord {
            project,
            subject,
            dictionary,
            form_oid: row.text_owned("form_oid"),
            coding_status: row.text_owned("coding_status"),
            require_coding: row.text_owned("require_coding"),
        })
        .collect())
}

/// Missing lab name / missing ranges (LNR) report. Site may be absent.
pub fn read_lab_issues(table: &CsvTable, default_project: &str) -> Result<Vec<LabIssue>> {
    table.require("subject")?;
    Ok(subject_rows(table, default_project)
        .map(|(project, subject, row)| LabIssue {
            project,
            site: row.text_owned("site"),
            subject,
            test_name: row.text_owned("test_name"),
            issue: row.text_owned("issue"),
        })
        .collect())
}

/// Compiled EDRR register: pre-aggregated open-issue counts per subject.
pub fn read_edrr_issues(table: &CsvTable, default_project: &str) -> Result<Vec<EdrrIssue>> {
    table.require("subject")?;
    Ok(subject_rows(table, default_project)
        .map(|(project, subject, row)| EdrrIssue {
            project,
            subject,
            total_open_issue_count: row.count("total_open_issue_count"),
        })
        .collect())
}

/// Inactivated forms/folders/records report.
pub fn read_inactivated_forms(
    table: &CsvTable,
    default_project: &str,
) -> Result<Vec<InactivatedForm>> {
    table.require("subject")?;
    Ok(subject_rows(table, default_project)
        .map(|(project, subject, row)| InactivatedForm {
            project,
            site: row.text_owned("site"),
            subject,
            visit_name: row.text_owned("visit_name"),
            form_name: row.text_owned("form_name"),
            audit_action: row.text_owned("audit_action"),
        })
        .collect())
}

/// One eSAE dashboard queue (the DM and Safety queues ship as separate
/// files of the same shape).
pub fn read_sae_reviews(table: &CsvTable, default_project: &str) -> Result<Vec<SaeReview>> {
    table.require("subject")?;
    Ok(subject_rows(table, default_project)
        .map(|(project, subject, row)| SaeReview {
            project,
            site: row.text_owned("site"),
            subject,
            form_name: row.text_owned("form_name"),
            case_status: row.text_owned("case_status"),
            review_status: row.text_owned("review_status"),
        })
        .collect())
}

/// Cumulative query report.
pub fn read_queries(table: &CsvTable, default_project: &str) -> Result<Vec<QueryRow>> {
    table.require("subject")?;
    Ok(subject_rows(table, default_project)
        .map(|(project, subject, row)| QueryRow {
            project,
            site: row.text_or_empty("site"),
            subject,
            visit_name: row.text_owned("visit_name"),
            form_name: row.text_owned("form_name"),
            query_status: row.text_owned("query_status"),
            marking_group: row.text_owned("marking_group"),
        })
        .collect())
}

/// Non-conformant data report.
pub fn read_non_conformant(
    table: &CsvTable,
    default_project: &str,
) -> Result<Vec<NonConformantRow>> {
    table.require("subject")?;
    Ok(subject_rows(table, default_project)
        .map(|(project, subject, row)| NonConformantRow {
            project,
            site: row.text_or_empty("site"),
            subject,
            visit_name: row.text_owned("visit_name"),
            form_name: row.text_owned("form_name"),
        })
        .collect())
}
