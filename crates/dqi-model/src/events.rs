//! Event-level rows consumed during reconciliation.
//!
//! These mirror the per-report exports. They are ephemeral: reconciliation
//! aggregates them into the [`SubjectMasterRecord`](crate::SubjectMasterRecord)
//! and nothing downstream sees them again. Row order is preserved from the
//! source; latest-visit tie-breaking depends on it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A visit recorded as completed (SV export).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletedVisit {
    pub project: String,
    pub site: String,
    pub subject: String,
    pub visit_name: String,
    pub visit_date: Option<NaiveDate>,
}

/// A projected visit that has not happened (visit projection tracker).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissingVisit {
    pub project: String,
    pub site: String,
    pub subject: String,
    pub visit_name: Option<String>,
    pub projected_date: Option<NaiveDate>,
    pub days_outstanding: Option<i32>,
}

/// A page expected but not entered (missing pages report).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissingPage {
    pub project: String,
    pub site: String,
    pub subject: String,
    pub visit_name: Option<String>,
    pub form_name: Option<String>,
    pub days_missing: Option<i32>,
}

/// Source dictionary for a coding record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodingDictionary {
    MedDra,
    WhoDd,
}

/// One term from a global coding report. No site dimension is available
/// from this source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodingRecord {
    pub project: String,
    pub subject: String,
    pub dictionary: CodingDictionary,
    pub form_oid: Option<String>,
    /// Null means the term has not been coded yet.
    pub coding_status: Option<String>,
    /// "yes" (case-insensitive) means the term requires coding.
    pub require_coding: Option<String>,
}

/// An open lab name/range (LNR) issue. Site may be absent at ingest and is
/// resolved during reconciliation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabIssue {
    pub project: String,
    pub site: Option<String>,
    pub subject: String,
    pub test_name: Option<String>,
    pub issue: Option<String>,
}

/// Pre-aggregated open-issue count from the EDRR register. No site dimension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdrrIssue {
    pub project: String,
    pub subject: String,
    pub total_open_issue_count: u32,
}

/// An inactivated form or folder. Site may be absent at ingest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InactivatedForm {
    pub project: String,
    pub site: Option<String>,
    pub subject: String,
    pub visit_name: Option<String>,
    pub form_name: Option<String>,
    pub audit_action: Option<String>,
}

/// One row from an eSAE dashboard queue. The DM and Safety queues ship as
/// separate tables of the same shape; site is frequently absent or the
/// `"-"` sentinel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaeReview {
    pub project: String,
    pub site: Option<String>,
    pub subject: String,
    pub form_name: Option<String>,
    pub case_status: Option<String>,
    pub review_status: Option<String>,
}

/// One row from the cumulative query report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRow {
    pub project: String,
    pub site: String,
    pub subject: String,
    pub visit_name: Option<String>,
    pub form_name: Option<String>,
    pub query_status: Option<String>,
    pub marking_group: Option<String>,
}

/// One row from the non-conformant data report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NonConformantRow {
    pub project: String,
    pub site: String,
    pub subject: String,
    pub visit_name: Option<String>,
    pub form_name: Option<String>,
}

/// All event tables for one study, in source row order.
#[derive(Debug, Clone, Default)]
pub struct EventTables {
    pub completed_visits: Vec<CompletedVisit>,
    pub missing_visits: Vec<MissingVisit>,
    pub missing_pages: Vec<MissingPage>,
    pub coding_records: Vec<CodingRecord>,
    pub lab_issues: Vec<LabIssue>,
    pub edrr_issues: Vec<EdrrIssue>,
    pub inactivated_forms: Vec<InactivatedForm>,
    pub esae_dm: Vec<SaeReview>,
    pub esae_safety: Vec<SaeReview>,
    pub queries: Vec<QueryRow>,
    pub non_conformant: Vec<NonConformantRow>,
}
