use serde::{Deserialize, Serialize};

use crate::key::SubjectKey;

/// Authoritative per-subject record, one per `(project, site, subject)` per
/// run.
///
/// The same shape serves as the staging record delivered by the provider and
/// as the reconciled output: reconciliation replaces the stale aggregate
/// fields with values derived from the event-level reports and recomputes the
/// percentage fields, so nothing here is ever left stale. Counts default to 0
/// when no underlying event rows exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectMasterRecord {
    pub project: String,
    pub region: Option<String>,
    pub country: Option<String>,
    pub site: String,
    pub subject: String,
    pub latest_visit: Option<String>,
    pub subject_status: Option<String>,

    pub missing_visits: u32,
    pub missing_pages: u32,
    pub coded_terms: u32,
    pub uncoded_terms: u32,
    pub open_issues_lnr: u32,
    pub open_issues_edrr: u32,
    pub inactivated_forms_folders: u32,
    pub esae_dm_reviews: u32,
    pub esae_safety_reviews: u32,
    pub expected_visits: u32,
    pub pages_entered: u32,
    pub pages_non_conformant: u32,
    pub crfs_with_queries_nc: u32,
    pub crfs_without_queries_nc: u32,
    pub percentage_clean_crf: f64,

    pub dm_queries: u32,
    pub clinical_queries: u32,
    pub medical_queries: u32,
    pub site_queries: u32,
    pub field_monitor_queries: u32,
    pub coding_queries: u32,
    pub safety_queries: u32,
    pub total_queries: u32,

    pub crfs_require_verification: u32,
    pub forms_verified: u32,
    pub crfs_frozen: u32,
    pub crfs_not_frozen: u32,
    pub crfs_locked: u32,
    pub crfs_unlocked: u32,
    pub pds_confirmed: u32,
    pub pds_proposed: u32,

    pub crfs_signed: u32,
    pub crfs_overdue_within_45_days: u32,
    pub crfs_overdue_45_to_90_days: u32,
    pub crfs_overdue_beyond_90_days: u32,
    pub broken_signatures: u32,
    pub crfs_never_signed: u32,
}

impl SubjectMasterRecord {
    pub fn key(&self) -> SubjectKey {
        SubjectKey::new(
            self.project.clone(),
            self.site.clone(),
            self.subject.clone(),
        )
    }

    /// Combined review backlog across both eSAE queues.
    pub fn safety_issues(&self) -> u32 {
        self.esae_dm_reviews + self.esae_safety_reviews
    }

    /// CRFs awaiting a PI signature: never signed plus all overdue buckets.
    pub fn unsigned_crfs(&self) -> u32 {
        self.crfs_never_signed
            + self.crfs_overdue_within_45_days
            + self.crfs_overdue_45_to_90_days
            + self.crfs_overdue_beyond_90_days
    }

    /// Share of entered pages carrying non-conformant data, in [0,100].
    /// Defined as 0 when no pages have been entered.
    pub fn non_conformant_pct(&self) -> f64 {
        if self.pages_entered == 0 {
            0.0
        } else {
            f64::from(self.pages_non_conformant) * 100.0 / f64::from(self.pages_entered)
        }
    }
}
