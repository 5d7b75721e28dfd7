//! Clean-status evaluation: eleven independent zero-count criteria.
//!
//! Deliberately separate from the scoring engine. The two disagree by
//! construction in places (a zero-threshold dimension can score 100 while
//! its clean criterion fails), so this gate is evaluated and tested on its
//! own.

use tracing::debug;

use dqi_model::{
    CLEAN_CRITERIA_TOTAL, CleanCriteria, CleanStatus, CleanStatusResult, SubjectMasterRecord,
};

/// Evaluate the eleven-criterion boolean gate for one subject.
pub fn evaluate(record: &SubjectMasterRecord) -> CleanStatusResult {
    let criteria = CleanCriteria {
        no_missing_visits: record.missing_visits == 0,
        no_missing_pages: record.missing_pages == 0,
        no_open_queries: record.total_queries == 0,
        no_non_conformant_data: record.pages_non_conformant == 0,
        no_uncoded_terms: record.uncoded_terms == 0,
        all_forms_verified: record.crfs_require_verification == 0,
        all_forms_signed: record.crfs_never_signed == 0,
        no_broken_signatures: record.broken_signatures == 0,
        no_lab_issues: record.open_issues_lnr == 0,
        no_edrr_issues: record.open_issues_edrr == 0,
        no_safety_issues: record.safety_issues() == 0,
    };

    let criteria_met = criteria.met_count();
    let status = if criteria.all_met() {
        CleanStatus::Clean
    } else {
        CleanStatus::NotClean
    };
    let failing_criteria: Vec<String> = criteria
        .failing()
        .into_iter()
        .map(str::to_string)
        .collect();

    debug!(
        subject = %record.key(),
        criteria_met,
        status = %status,
        "evaluated clean status"
    );

    CleanStatusResult {
        key: record.key(),
        criteria,
        criteria_met,
        criteria_total: CLEAN_CRITERIA_TOTAL,
        status,
        failing_criteria,
    }
}

/// Evaluate the full population, preserving input order.
pub fn evaluate_all(records: &[SubjectMasterRecord]) -> Vec<CleanStatusResult> {
    records.iter().map(evaluate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_record() -> SubjectMasterRecord {
        SubjectMasterRecord {
            project: "Study 1".to_string(),
            site: "101".to_string(),
            subject: "101-001".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn all_zero_dimensions_are_clean() {
        let result = evaluate(&base_record());
        assert_eq!(result.status, CleanStatus::Clean);
        assert_eq!(result.criteria_met, 11);
        assert_eq!(result.criteria_total, 11);
        assert!(result.failing_criteria.is_empty());
    }

    #[test]
    fn single_missing_visit_fails_one_criterion() {
        let mut record = base_record();
        record.missing_visits = 1;
        let result = evaluate(&record);
        assert_eq!(result.status, CleanStatus::NotClean);
        assert_eq!(result.criteria_met, 10);
        assert_eq!(result.failing_criteria, vec!["no_missing_visits"]);
    }

    #[test]
    fn safety_criterion_sums_both_queues() {
        let mut record = base_record();
        record.esae_safety_reviews = 1;
        let result = evaluate(&record);
        assert!(!result.criteria.no_safety_issues);
        assert_eq!(result.failing_criteria, vec!["no_safety_issues"]);

        record.esae_safety_reviews = 0;
        record.esae_dm_reviews = 1;
        assert!(!evaluate(&record).criteria.no_safety_issues);
    }

    #[test]
    fn failing_list_preserves_evaluation_order() {
        let mut record = base_record();
        record.open_issues_edrr = 2;
        record.missing_pages = 1;
        record.broken_signatures = 1;
        let result = evaluate(&record);
        assert_eq!(
            result.failing_criteria,
            vec!["no_missing_pages", "no_broken_signatures", "no_edrr_issues"]
        );
    }

    #[test]
    fn only_never_signed_counts_toward_signature_criterion() {
        // Overdue-signature buckets degrade the DQI but do not fail the
        // all_forms_signed gate; only never-signed forms do.
        let mut record = base_record();
        record.crfs_overdue_beyond_90_days = 4;
        let result = evaluate(&record);
        assert!(result.criteria.all_forms_signed);
        assert_eq!(result.status, CleanStatus::Clean);
    }
}
