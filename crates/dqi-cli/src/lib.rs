//! Library components for the DQI CLI: logging setup and the pipeline
//! driver, exposed so integration tests can run a study end to end without
//! spawning the binary.

pub mod logging;
pub mod pipeline;
