use serde::{Deserialize, Serialize};
use std::fmt;

use crate::key::SubjectKey;

/// DQI tier, assigned from the composite score with inclusive lower bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DqiCategory {
    /// 90-100: submission ready.
    Excellent,
    /// 75-89: minor cleanup required.
    Good,
    /// 60-74: moderate issues, action plan needed.
    Acceptable,
    /// 40-59: significant gaps, delay risk.
    NeedsAttention,
    /// 0-39: major intervention required.
    Critical,
}

impl DqiCategory {
    /// Categorize a composite score. Boundaries are inclusive lower bounds:
    /// 90, 75, 60, 40.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            DqiCategory::Excellent
        } else if score >= 75.0 {
            DqiCategory::Good
        } else if score >= 60.0 {
            DqiCategory::Acceptable
        } else if score >= 40.0 {
            DqiCategory::NeedsAttention
        } else {
            DqiCategory::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DqiCategory::Excellent => "Excellent",
            DqiCategory::Good => "Good",
            DqiCategory::Acceptable => "Acceptable",
            DqiCategory::NeedsAttention => "Needs Attention",
            DqiCategory::Critical => "Critical",
        }
    }
}

impl fmt::Display for DqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The nine normalized sub-scores, each in [0,100], rounded to 2 decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedScores {
    pub safety_issues: f64,
    pub open_queries: f64,
    pub missing_visits: f64,
    pub missing_pages: f64,
    pub non_conformant: f64,
    pub unsigned_crfs: f64,
    pub unverified_forms: f64,
    pub uncoded_terms: f64,
    pub protocol_deviations: f64,
}

/// Composite quality assessment for one subject. Recomputed and upserted
/// every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqiResult {
    pub key: SubjectKey,
    pub scores: NormalizedScores,
    /// Weighted composite in [0,100], rounded to 2 decimals.
    pub dqi_score: f64,
    pub category: DqiCategory,
}

/// Overall clean classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CleanStatus {
    Clean,
    NotClean,
}

impl CleanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CleanStatus::Clean => "Clean",
            CleanStatus::NotClean => "Not Clean",
        }
    }
}

impl fmt::Display for CleanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The eleven zero-count criteria, in evaluation order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanCriteria {
    pub no_missing_visits: bool,
    pub no_missing_pages: bool,
    pub no_open_queries: bool,
    pub no_non_conformant_data: bool,
    pub no_uncoded_terms: bool,
    pub all_forms_verified: bool,
    pub all_forms_signed: bool,
    pub no_broken_signatures: bool,
    pub no_lab_issues: bool,
    pub no_edrr_issues: bool,
    pub no_safety_issues: bool,
}

/// Fixed number of clean criteria.
pub const CLEAN_CRITERIA_TOTAL: u8 = 11;

impl CleanCriteria {
    /// Criterion names paired with values, in evaluation order.
    pub fn entries(&self) -> [(&'static str, bool); 11] {
        [
            ("no_missing_visits", self.no_missing_visits),
            ("no_missing_pages", self.no_missing_pages),
            ("no_open_queries", self.no_open_queries),
            ("no_non_conformant_data", self.no_non_conformant_data),
            ("no_uncoded_terms", self.no_uncoded_terms),
            ("all_forms_verified", self.all_forms_verified),
            ("all_forms_signed", self.all_forms_signed),
            ("no_broken_signatures", self.no_broken_signatures),
            ("no_lab_issues", self.no_lab_issues),
            ("no_edrr_issues", self.no_edrr_issues),
            ("no_safety_issues", self.no_safety_issues),
        ]
    }

    pub fn met_count(&self) -> u8 {
        self.entries().iter().filter(|(_, met)| *met).count() as u8
    }

    pub fn all_met(&self) -> bool {
        self.entries().iter().all(|(_, met)| *met)
    }

    /// Names of failing criteria, in evaluation order.
    pub fn failing(&self) -> Vec<&'static str> {
        self.entries()
            .iter()
            .filter(|(_, met)| !*met)
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Clean-status assessment for one subject. Recomputed and upserted every
/// run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanStatusResult {
    pub key: SubjectKey,
    pub criteria: CleanCriteria,
    pub criteria_met: u8,
    pub criteria_total: u8,
    pub status: CleanStatus,
    /// Empty when the subject is clean.
    pub failing_criteria: Vec<String>,
}
