//! Application state management

use std::path::Path;
use std::sync::Arc;

use crate::bundle::ModelBundle;
use crate::error::Result;
use crate::inference::PriceEstimator;

/// Application state shared across handlers; immutable after startup
#[derive(Debug, Clone)]
pub struct AppState {
    pub estimator: PriceEstimator,
}

impl AppState {
    pub fn new(bundle: ModelBundle) -> Self {
        Self {
            estimator: PriceEstimator::new(Arc::new(bundle)),
        }
    }

    /// Load the bundle from disk; any failure here must stop the process
    pub fn load(model_path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(ModelBundle::load(model_path)?))
    }
}
