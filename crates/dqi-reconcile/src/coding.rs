//! Coded/uncoded term counts from the union of both coding dictionaries.
//!
//! Grouped by `(project, subject)`: the global coding reports carry no site
//! dimension. The coded and uncoded predicates are not mutually exclusive —
//! a record with a non-null coding status AND require-coding "yes" counts
//! toward both. That overlap is observed production behavior and is
//! preserved, not deduplicated.

use std::collections::HashMap;

use dqi_model::{CodingRecord, ProjectSubject};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TermCounts {
    pub coded: u32,
    pub uncoded: u32,
}

fn requires_coding(record: &CodingRecord) -> bool {
    record
        .require_coding
        .as_deref()
        .is_some_and(|flag| flag.trim().eq_ignore_ascii_case("yes"))
}

/// Count coded and uncoded terms per `(project, subject)`.
pub fn term_counts_by_subject(records: &[CodingRecord]) -> HashMap<ProjectSubject, TermCounts> {
    let mut counts: HashMap<ProjectSubject, TermCounts> = HashMap::new();
    for record in records {
        let entry = counts
            .entry(ProjectSubject::new(
                record.project.clone(),
                record.subject.clone(),
            ))
            .or_default();
        if record.coding_status.is_some() {
            entry.coded += 1;
        }
        if requires_coding(record) || record.coding_status.is_none() {
            entry.uncoded += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqi_model::CodingDictionary;

    fn record(status: Option<&str>, require: Option<&str>) -> CodingRecord {
        CodingRecord {
            project: "Study 1".to_string(),
            subject: "A".to_string(),
            dictionary: CodingDictionary::MedDra,
            form_oid: None,
            coding_status: status.map(str::to_string),
            require_coding: require.map(str::to_string),
        }
    }

    fn counts_for(records: &[CodingRecord]) -> TermCounts {
        let counts = term_counts_by_subject(records);
        counts
            .get(&ProjectSubject::new("Study 1", "A"))
            .copied()
            .unwrap_or_default()
    }

    #[test]
    fn coded_requires_non_null_status() {
        let counts = counts_for(&[record(Some("Coded"), None), record(None, None)]);
        assert_eq!(counts.coded, 1);
    }

    #[test]
    fn uncoded_from_flag_or_null_status() {
        let counts = counts_for(&[
            record(None, None),          // null status
            record(Some("Coded"), None), // neither predicate
            record(None, Some("YES")),   // both flag and null status, one row
        ]);
        assert_eq!(counts.uncoded, 2);
    }

    #[test]
    fn overlapping_predicates_count_both_ways() {
        // Non-null status AND require-coding yes: one record increments
        // coded and uncoded simultaneously. Documented overlap, kept as is.
        let counts = counts_for(&[record(Some("Coded"), Some("Yes"))]);
        assert_eq!(counts.coded, 1);
        assert_eq!(counts.uncoded, 1);
    }

    #[test]
    fn require_coding_flag_is_case_insensitive() {
        let counts = counts_for(&[record(Some("Coded"), Some("yEs"))]);
        assert_eq!(counts.uncoded, 1);
        let counts = counts_for(&[record(Some("Coded"), Some("no"))]);
        assert_eq!(counts.uncoded, 0);
    }
}
