pub mod clean;
pub mod config;
pub mod normalize;
pub mod score;

pub use clean::{evaluate, evaluate_all};
pub use config::{Dimension, ScoringConfig, ThresholdConfig, WeightConfig};
pub use normalize::{DimensionValues, normalize, round2};
pub use score::ScoringEngine;
