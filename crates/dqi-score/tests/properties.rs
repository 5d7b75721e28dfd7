//! Property tests for normalization and composite scoring.

use std::collections::BTreeMap;

use proptest::prelude::*;

use dqi_model::SubjectMasterRecord;
use dqi_score::{Dimension, ScoringConfig, ScoringEngine, ThresholdConfig, WeightConfig, normalize};

fn arb_weights() -> impl Strategy<Value = WeightConfig> {
    // Nine positive raw weights, normalized to sum to 1.0.
    prop::collection::vec(0.01f64..10.0, 9).prop_map(|raw| {
        let sum: f64 = raw.iter().sum();
        let values: BTreeMap<Dimension, f64> = Dimension::ALL
            .iter()
            .zip(&raw)
            .map(|(dimension, weight)| (*dimension, weight / sum))
            .collect();
        WeightConfig::new(values).expect("normalized weights are valid")
    })
}

fn arb_thresholds() -> impl Strategy<Value = ThresholdConfig> {
    prop::collection::vec(0.0f64..50.0, 9).prop_map(|raw| {
        let values: BTreeMap<Dimension, f64> = Dimension::ALL
            .iter()
            .zip(&raw)
            .map(|(dimension, threshold)| (*dimension, *threshold))
            .collect();
        ThresholdConfig::new(values).expect("non-negative thresholds are valid")
    })
}

proptest! {
    #[test]
    fn normalize_stays_in_range(actual in 0.0f64..10_000.0, threshold in 0.0f64..1_000.0) {
        let normalized = normalize(actual, threshold);
        prop_assert!((0.0..=100.0).contains(&normalized));
    }

    #[test]
    fn normalize_is_non_increasing_for_positive_threshold(
        lower in 0.0f64..1_000.0,
        delta in 0.0f64..1_000.0,
        threshold in 0.001f64..1_000.0,
    ) {
        let higher = lower + delta;
        prop_assert!(normalize(higher, threshold) <= normalize(lower, threshold));
    }

    #[test]
    fn zero_threshold_convention_holds_for_any_actual(actual in 0.0f64..100_000.0) {
        prop_assert_eq!(normalize(actual, 0.0), 100.0);
    }

    #[test]
    fn composite_stays_in_range_for_any_valid_config(
        weights in arb_weights(),
        thresholds in arb_thresholds(),
        queries in 0u32..500,
        visits in 0u32..100,
        pages in 0u32..100,
        esae_dm in 0u32..50,
        pages_entered in 0u32..2_000,
        pages_nc in 0u32..2_000,
        never_signed in 0u32..200,
        unverified in 0u32..200,
        uncoded in 0u32..200,
        deviations in 0u32..50,
    ) {
        let engine = ScoringEngine::new(ScoringConfig::new(thresholds, weights));
        let record = SubjectMasterRecord {
            project: "Study P".to_string(),
            site: "1".to_string(),
            subject: "S".to_string(),
            total_queries: queries,
            missing_visits: visits,
            missing_pages: pages,
            esae_dm_reviews: esae_dm,
            pages_entered,
            pages_non_conformant: pages_nc,
            crfs_never_signed: never_signed,
            crfs_require_verification: unverified,
            uncoded_terms: uncoded,
            pds_proposed: deviations,
            ..Default::default()
        };
        let result = engine.score(&record);
        prop_assert!((0.0..=100.0).contains(&result.dqi_score));
        for sub in [
            result.scores.safety_issues,
            result.scores.open_queries,
            result.scores.missing_visits,
            result.scores.missing_pages,
            result.scores.non_conformant,
            result.scores.unsigned_crfs,
            result.scores.unverified_forms,
            result.scores.uncoded_terms,
            result.scores.protocol_deviations,
        ] {
            prop_assert!((0.0..=100.0).contains(&sub));
        }
    }
}
