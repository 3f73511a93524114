//! Price inference
//!
//! Runs a feature record through the bundle's vectorizer and predictor and
//! maps the log-space output back to a price.

mod engine;
mod target;

pub use engine::{PriceEstimate, PriceEstimator};
pub use target::{from_log_space, to_log_space};
