//! House price prediction service
//!
//! Serves a pre-trained regression model over HTTP. A model bundle (feature
//! vectorizer plus fitted predictor) is loaded once at startup; each
//! `POST /predict` request vectorizes one JSON feature record, predicts in
//! log space and returns `expm1` of the result as the price.
//!
//! # Modules
//!
//! - [`features`] - Feature records and the dictionary vectorizer
//! - [`predictor`] - Linear and tree-ensemble regressors
//! - [`bundle`] - Model bundle loading and saving
//! - [`inference`] - Target transform and price estimation
//! - [`server`] - HTTP server with the prediction and health endpoints
//! - [`cli`] - Command-line interface

pub mod error;

pub mod features;
pub mod predictor;
pub mod bundle;
pub mod inference;

pub mod server;
pub mod cli;

pub use error::{PriceError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{PriceError, Result};
    pub use crate::features::{DictVectorizer, FeatureRecord};
    pub use crate::predictor::{
        Aggregation, LinearRegressor, Model, Node, RegressionTree, Regressor, TreeEnsembleRegressor,
        TreeNode,
    };
    pub use crate::bundle::ModelBundle;
    pub use crate::inference::{PriceEstimate, PriceEstimator};
    pub use crate::server::{create_router, AppState, ServerConfig};
}
