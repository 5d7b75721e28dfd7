//! Threshold and weight configuration for the scoring engine.
//!
//! Both tables are external data so recalibration never requires a code
//! change. Weights must sum to 1.0; the check runs at construction, not at
//! scoring time, so an invalid file fails the run before any subject is
//! scored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use dqi_model::{DqiError, Result};

/// Tolerance for the weight-sum check; absorbs decimal representation noise.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// The nine scored dimensions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    OpenQueries,
    MissingVisits,
    MissingPages,
    SafetyIssues,
    NonConformantPct,
    UnsignedCrfs,
    UnverifiedForms,
    UncodedTerms,
    ProtocolDeviations,
}

impl Dimension {
    pub const ALL: [Dimension; 9] = [
        Dimension::OpenQueries,
        Dimension::MissingVisits,
        Dimension::MissingPages,
        Dimension::SafetyIssues,
        Dimension::NonConformantPct,
        Dimension::UnsignedCrfs,
        Dimension::UnverifiedForms,
        Dimension::UncodedTerms,
        Dimension::ProtocolDeviations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::OpenQueries => "open_queries",
            Dimension::MissingVisits => "missing_visits",
            Dimension::MissingPages => "missing_pages",
            Dimension::SafetyIssues => "safety_issues",
            Dimension::NonConformantPct => "non_conformant_pct",
            Dimension::UnsignedCrfs => "unsigned_crfs",
            Dimension::UnverifiedForms => "unverified_forms",
            Dimension::UncodedTerms => "uncoded_terms",
            Dimension::ProtocolDeviations => "protocol_deviations",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maximum-acceptable value per dimension: the actual value that normalizes
/// to a sub-score of 0. A zero threshold is a defined edge case (the
/// dimension normalizes to 100 regardless of the actual), not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdConfig {
    values: BTreeMap<Dimension, f64>,
}

impl ThresholdConfig {
    pub fn new(values: BTreeMap<Dimension, f64>) -> Result<Self> {
        require_complete(&values, "thresholds")?;
        for (dimension, value) in &values {
            if !value.is_finite() || *value < 0.0 {
                return Err(DqiError::Config(format!(
                    "threshold for {dimension} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(Self { values })
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        // Completeness is enforced at construction.
        self.values.get(&dimension).copied().unwrap_or(0.0)
    }
}

impl Default for ThresholdConfig {
    /// Benchmarked production thresholds (95th percentile analysis).
    fn default() -> Self {
        let values = BTreeMap::from([
            (Dimension::OpenQueries, 1.0),
            (Dimension::MissingVisits, 0.0),
            (Dimension::MissingPages, 0.0),
            (Dimension::SafetyIssues, 2.0),
            (Dimension::NonConformantPct, 0.0),
            (Dimension::UnsignedCrfs, 12.0),
            (Dimension::UnverifiedForms, 8.0),
            (Dimension::UncodedTerms, 0.0),
            (Dimension::ProtocolDeviations, 0.0),
        ]);
        Self { values }
    }
}

/// Per-dimension weights for the composite score. Must cover all nine
/// dimensions and sum to 1.0 within [`WEIGHT_SUM_TOLERANCE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightConfig {
    values: BTreeMap<Dimension, f64>,
}

impl WeightConfig {
    pub fn new(values: BTreeMap<Dimension, f64>) -> Result<Self> {
        require_complete(&values, "weights")?;
        for (dimension, value) in &values {
            if !value.is_finite() || *value < 0.0 || *value > 1.0 {
                return Err(DqiError::Config(format!(
                    "weight for {dimension} must be within [0,1], got {value}"
                )));
            }
        }
        let sum: f64 = values.values().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(DqiError::Config(format!(
                "weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(Self { values })
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        self.values.get(&dimension).copied().unwrap_or(0.0)
    }
}

impl Default for WeightConfig {
    /// Weights reflecting relative regulatory impact: safety first, coding
    /// and deviations last.
    fn default() -> Self {
        let values = BTreeMap::from([
            (Dimension::SafetyIssues, 0.25),
            (Dimension::OpenQueries, 0.15),
            (Dimension::MissingVisits, 0.15),
            (Dimension::MissingPages, 0.10),
            (Dimension::NonConformantPct, 0.10),
            (Dimension::UnsignedCrfs, 0.10),
            (Dimension::UnverifiedForms, 0.05),
            (Dimension::UncodedTerms, 0.05),
            (Dimension::ProtocolDeviations, 0.05),
        ]);
        Self { values }
    }
}

fn require_complete(values: &BTreeMap<Dimension, f64>, what: &str) -> Result<()> {
    for dimension in Dimension::ALL {
        if !values.contains_key(&dimension) {
            return Err(DqiError::Config(format!(
                "{what} missing entry for dimension {dimension}"
            )));
        }
    }
    Ok(())
}

/// Validated scoring configuration passed into the scoring engine entry
/// point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScoringConfig")]
pub struct ScoringConfig {
    pub thresholds: ThresholdConfig,
    pub weights: WeightConfig,
}

impl ScoringConfig {
    pub fn new(thresholds: ThresholdConfig, weights: WeightConfig) -> Self {
        Self {
            thresholds,
            weights,
        }
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|error| DqiError::Config(format!("{}: {error}", path.display())))
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            weights: WeightConfig::default(),
        }
    }
}

#[derive(Deserialize)]
struct RawScoringConfig {
    thresholds: BTreeMap<Dimension, f64>,
    weights: BTreeMap<Dimension, f64>,
}

impl TryFrom<RawScoringConfig> for ScoringConfig {
    type Error = DqiError;

    fn try_from(raw: RawScoringConfig) -> Result<Self> {
        Ok(Self {
            thresholds: ThresholdConfig::new(raw.thresholds)?,
            weights: WeightConfig::new(raw.weights)?,
        })
    }
}
