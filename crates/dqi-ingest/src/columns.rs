//! Header canonicalization and column lookup.
//!
//! The source reports come from several EDC exports that disagree on header
//! spelling ("Subject", "Subject Name", "Patient ID"). Every header is mapped
//! to a canonical snake_case name before row reading; readers only ever ask
//! for canonical names.

use std::collections::HashMap;
use std::path::Path;

use csv::StringRecord;

use crate::error::{IngestError, Result};

/// Irregular header spellings that a mechanical snake_case pass would not
/// resolve. Matched case-insensitively against the trimmed raw header.
const SYNONYMS: &[(&str, &str)] = &[
    ("study", "project"),
    ("study id", "project"),
    ("study name", "project"),
    ("project name", "project"),
    ("subject", "subject"),
    ("subject name", "subject"),
    ("subjectname", "subject"),
    ("subject id", "subject"),
    ("patient id", "subject"),
    ("site", "site"),
    ("site id", "site"),
    ("site number", "site"),
    ("sitenumber", "site"),
    ("study site", "site"),
    ("study site number", "site"),
    ("visit", "visit_name"),
    ("folder", "visit_name"),
    ("folder name", "visit_name"),
    ("foldername", "visit_name"),
    ("form", "form_name"),
    ("formname", "form_name"),
    ("page", "form_name"),
    ("page name", "form_name"),
    ("data page name", "form_name"),
    ("sitegroupname(countryname)", "country"),
    ("overall subject status", "subject_status"),
    ("latest visit", "latest_visit"),
    ("latest visit (sv)", "latest_visit"),
    ("missing page", "missing_pages"),
    ("open issues in lnr", "open_issues_lnr"),
    (
        "open issues reported for 3rd party reconciliation in edrr",
        "open_issues_edrr",
    ),
    ("inactivated forms and folders", "inactivated_forms_folders"),
    ("esae dashboard review for dm", "esae_dm_reviews"),
    ("esae dashboard review for safety", "esae_safety_reviews"),
    ("pages with non-conformant data", "pages_non_conformant"),
    (
        "total crfs with queries & non-conformant data",
        "crfs_with_queries_nc",
    ),
    (
        "total crfs without queries & non-conformant data",
        "crfs_without_queries_nc",
    ),
    ("percentage clean entered crf", "percentage_clean_crf"),
    ("crfs require verification (sdv)", "crfs_require_verification"),
    (
        "crfs overdue for signs within 45 days of data entry",
        "crfs_overdue_within_45_days",
    ),
    (
        "crfs overdue for signs between 45 to 90 days of data entry",
        "crfs_overdue_45_to_90_days",
    ),
    (
        "crfs overdue for signs beyond 90 days of data entry",
        "crfs_overdue_beyond_90_days",
    ),
    ("# of days missing", "days_missing"),
    ("no. #days page missing", "days_missing"),
    ("#days page missing", "days_missing"),
    ("# days outstanding", "days_outstanding"),
    ("# days outstanding (today - projecteddate)", "days_outstanding"),
    ("total open issue count", "total_open_issue_count"),
    ("total open issue count per subject", "total_open_issue_count"),
    ("lab test name", "test_name"),
    ("marking group name", "marking_group"),
];

/// Canonical name for a raw header cell.
///
/// Strips a UTF-8 BOM and surrounding whitespace, resolves known synonyms,
/// and otherwise falls back to a snake_case rendering of the header so
/// regular headers ("Broken Signatures", "PDs Proposed") need no table entry.
pub fn canonical_column(raw: &str) -> String {
    let cleaned = raw.trim_start_matches('\u{feff}').trim();
    let lower = cleaned.to_lowercase();
    if let Some((_, canon)) = SYNONYMS.iter().find(|(syn, _)| *syn == lower) {
        return (*canon).to_string();
    }
    snake_case(&lower)
}

fn snake_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut last_underscore = true;
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            last_underscore = false;
        } else if !last_underscore {
            out.push('_');
            last_underscore = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Canonical-name → column-index lookup for one CSV file.
#[derive(Debug, Clone)]
pub struct HeaderMap {
    index: HashMap<String, usize>,
}

impl HeaderMap {
    /// Builds the lookup from a raw header record. When two raw headers
    /// canonicalize to the same name the first one wins.
    pub fn from_record(record: &StringRecord) -> Self {
        let mut index = HashMap::with_capacity(record.len());
        for (i, raw) in record.iter().enumerate() {
            let canon = canonical_column(raw);
            if !canon.is_empty() {
                index.entry(canon).or_insert(i);
            }
        }
        Self { index }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Index of a column the reader cannot work without.
    pub fn require(&self, name: &str, path: &Path) -> Result<usize> {
        self.get(name).ok_or_else(|| IngestError::MissingColumn {
            column: name.to_string(),
            path: path.to_path_buf(),
        })
    }
}
