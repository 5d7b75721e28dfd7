//! Per-dimension normalization.
//!
//! `normalized = clamp(100 * (1 - actual/threshold), 0, 100)`. A zero
//! threshold returns 100 unconditionally regardless of the actual value, so
//! a violated zero-tolerance dimension still scores perfect; the clean-status
//! gate is where zero-tolerance dimensions actually fail a subject.

use dqi_model::SubjectMasterRecord;

use crate::config::Dimension;

/// Normalize an actual value against its maximum-acceptable threshold onto
/// the 0-100 scale.
pub fn normalize(actual: f64, threshold: f64) -> f64 {
    if threshold == 0.0 {
        return 100.0;
    }
    let normalized = 100.0 * (1.0 - actual / threshold);
    normalized.clamp(0.0, 100.0)
}

/// Round to 2 decimal places, matching the persisted result precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Raw actuals for the nine scored dimensions, extracted from a reconciled
/// master record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionValues {
    pub open_queries: f64,
    pub missing_visits: f64,
    pub missing_pages: f64,
    pub safety_issues: f64,
    pub non_conformant_pct: f64,
    pub unsigned_crfs: f64,
    pub unverified_forms: f64,
    pub uncoded_terms: f64,
    pub protocol_deviations: f64,
}

impl DimensionValues {
    pub fn from_record(record: &SubjectMasterRecord) -> Self {
        Self {
            open_queries: f64::from(record.total_queries),
            missing_visits: f64::from(record.missing_visits),
            missing_pages: f64::from(record.missing_pages),
            safety_issues: f64::from(record.safety_issues()),
            non_conformant_pct: record.non_conformant_pct(),
            unsigned_crfs: f64::from(record.unsigned_crfs()),
            unverified_forms: f64::from(record.crfs_require_verification),
            uncoded_terms: f64::from(record.uncoded_terms),
            protocol_deviations: f64::from(record.pds_proposed),
        }
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::OpenQueries => self.open_queries,
            Dimension::MissingVisits => self.missing_visits,
            Dimension::MissingPages => self.missing_pages,
            Dimension::SafetyIssues => self.safety_issues,
            Dimension::NonConformantPct => self.non_conformant_pct,
            Dimension::UnsignedCrfs => self.unsigned_crfs,
            Dimension::UnverifiedForms => self.unverified_forms,
            Dimension::UncodedTerms => self.uncoded_terms,
            Dimension::ProtocolDeviations => self.protocol_deviations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_threshold_always_returns_100() {
        assert_eq!(normalize(0.0, 0.0), 100.0);
        assert_eq!(normalize(5.0, 0.0), 100.0);
        assert_eq!(normalize(1_000_000.0, 0.0), 100.0);
    }

    #[test]
    fn normalization_scales_and_clamps() {
        assert_eq!(normalize(0.0, 10.0), 100.0);
        assert_eq!(normalize(5.0, 10.0), 50.0);
        assert_eq!(normalize(10.0, 10.0), 0.0);
        // Beyond the threshold clamps to 0 rather than going negative.
        assert_eq!(normalize(25.0, 10.0), 0.0);
    }

    #[test]
    fn dimension_extraction_composes_buckets() {
        let record = SubjectMasterRecord {
            total_queries: 4,
            esae_dm_reviews: 1,
            esae_safety_reviews: 2,
            crfs_never_signed: 3,
            crfs_overdue_within_45_days: 1,
            crfs_overdue_45_to_90_days: 1,
            crfs_overdue_beyond_90_days: 1,
            pages_entered: 100,
            pages_non_conformant: 25,
            pds_proposed: 2,
            ..Default::default()
        };
        let values = DimensionValues::from_record(&record);
        assert_eq!(values.open_queries, 4.0);
        assert_eq!(values.safety_issues, 3.0);
        assert_eq!(values.unsigned_crfs, 6.0);
        assert_eq!(values.non_conformant_pct, 25.0);
        assert_eq!(values.protocol_deviations, 2.0);
    }
}
