//! Fitted regressors
//!
//! Every predictor maps a dense feature matrix to one log-space prediction per
//! row through the [`Regressor`] trait. [`Model`] is the serialized form stored
//! in a model bundle.

mod linear;
mod tree;

pub use linear::LinearRegressor;
pub use tree::{Aggregation, Node, RegressionTree, TreeEnsembleRegressor, TreeNode};

use crate::error::{PriceError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// A fitted model producing one scalar per input row
pub trait Regressor {
    /// Number of columns the model expects
    fn n_features(&self) -> usize;

    /// Predict one value per row of `x`
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;
}

/// Reject matrices whose width differs from what the model was fitted on
pub(crate) fn check_width(expected: usize, x: &Array2<f64>) -> Result<()> {
    if x.ncols() != expected {
        return Err(PriceError::ShapeError {
            expected: format!("{} feature columns", expected),
            actual: format!("{} feature columns", x.ncols()),
        });
    }
    Ok(())
}

/// Serialized predictor stored alongside the vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Model {
    Linear(LinearRegressor),
    TreeEnsemble(TreeEnsembleRegressor),
}

impl Model {
    pub fn kind(&self) -> &'static str {
        match self {
            Model::Linear(_) => "linear",
            Model::TreeEnsemble(m) => match m.aggregation() {
                Aggregation::Boosted { .. } => "gradient_boosting",
                Aggregation::Mean => "random_forest",
            },
        }
    }

    /// Structural checks that decoding alone does not guarantee
    pub fn validate(&self) -> Result<()> {
        match self {
            Model::Linear(_) => Ok(()),
            Model::TreeEnsemble(m) => m.validate(),
        }
    }
}

impl Regressor for Model {
    fn n_features(&self) -> usize {
        match self {
            Model::Linear(m) => m.n_features(),
            Model::TreeEnsemble(m) => m.n_features(),
        }
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        match self {
            Model::Linear(m) => m.predict(x),
            Model::TreeEnsemble(m) => m.predict(x),
        }
    }
}

impl From<LinearRegressor> for Model {
    fn from(model: LinearRegressor) -> Self {
        Model::Linear(model)
    }
}

impl From<TreeEnsembleRegressor> for Model {
    fn from(model: TreeEnsembleRegressor) -> Self {
        Model::TreeEnsemble(model)
    }
}
