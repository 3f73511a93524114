//! Price estimator

use std::sync::Arc;
use tracing::debug;

use crate::bundle::ModelBundle;
use crate::error::{PriceError, Result};
use crate::features::FeatureRecord;
use crate::predictor::Regressor;

use super::from_log_space;

/// Result of one prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceEstimate {
    /// Raw model output in log space
    pub log_price: f64,
    /// `expm1(log_price)`
    pub price: f64,
}

/// Read-only predictor over a shared model bundle
#[derive(Debug, Clone)]
pub struct PriceEstimator {
    bundle: Arc<ModelBundle>,
}

impl PriceEstimator {
    pub fn new(bundle: Arc<ModelBundle>) -> Self {
        Self { bundle }
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    /// Estimate the price for a single feature record
    pub fn estimate(&self, record: &FeatureRecord) -> Result<PriceEstimate> {
        let x = self.bundle.dv.transform(std::slice::from_ref(record))?;
        let y = self.bundle.model.predict(&x)?;

        let log_price = y.get(0).copied().ok_or_else(|| {
            PriceError::PredictionError("model returned no predictions".to_string())
        })?;

        // Widths already agree here, so a non-finite result comes from the
        // record's values.
        if !log_price.is_finite() {
            return Err(PriceError::OutOfRange(format!(
                "feature values produce a non-finite model output ({})",
                log_price
            )));
        }

        let price = from_log_space(log_price);
        if !price.is_finite() {
            return Err(PriceError::OutOfRange(format!(
                "feature values produce a price too large to represent (log price {})",
                log_price
            )));
        }

        debug!(
            n_features = record.len(),
            log_price,
            price,
            "Prediction computed"
        );

        Ok(PriceEstimate { log_price, price })
    }
}
