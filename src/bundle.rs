//! Model bundle loading
//!
//! A bundle is the vectorizer and predictor produced together by the training
//! pipeline, stored as one bincode artifact. It is loaded once at startup and
//! never mutated afterwards.

use bincode::Options;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

use crate::error::{PriceError, Result};
use crate::features::DictVectorizer;
use crate::predictor::{Model, Regressor};

/// Vectorizer and predictor loaded from one artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    pub model: Model,
    pub dv: DictVectorizer,
}

impl ModelBundle {
    pub fn new(dv: DictVectorizer, model: impl Into<Model>) -> Self {
        Self {
            model: model.into(),
            dv,
        }
    }

    /// Read and decode a bundle from disk.
    ///
    /// The vectorizer and predictor widths are expected to agree; a mismatch is
    /// logged but does not fail the load.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let bundle = Self::from_bytes(&bytes)?;

        info!(
            path = %path.display(),
            size_bytes = bytes.len(),
            n_features = bundle.dv.n_features(),
            model_kind = bundle.model.kind(),
            "Model bundle loaded"
        );

        if bundle.dv.n_features() != bundle.model.n_features() {
            warn!(
                vectorizer_width = bundle.dv.n_features(),
                model_width = bundle.model.n_features(),
                "Vectorizer output width does not match model input width"
            );
        }

        Ok(bundle)
    }

    /// Decode and structurally check a bundle.
    ///
    /// Reads are capped at the artifact's own length, so a corrupt length
    /// prefix cannot trigger an allocation larger than the file.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(PriceError::BundleDecodeError(
                "artifact is empty".to_string(),
            ));
        }

        // Same encoding as `bincode::serialize`, plus the read limit
        let bundle: Self = bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .allow_trailing_bytes()
            .with_limit(bytes.len() as u64)
            .deserialize(bytes)?;

        bundle.model.validate()?;
        Ok(bundle)
    }

    /// Write the bundle in the format [`ModelBundle::load`] reads
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = bincode::serialize(self).map_err(|e| {
            PriceError::SerializationError(format!("Failed to serialize bundle: {}", e))
        })?;

        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::{
        Aggregation, LinearRegressor, Node, RegressionTree, TreeEnsembleRegressor,
    };
    use ndarray::array;

    fn bundle() -> ModelBundle {
        let dv = DictVectorizer::new(vec!["area".to_string(), "location=Pune".to_string()])
            .unwrap();
        ModelBundle::new(dv, LinearRegressor::new(array![0.001, 0.2], 10.0))
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");

        bundle().save(&path).unwrap();
        let loaded = ModelBundle::load(&path).unwrap();

        assert_eq!(loaded.dv.feature_names(), bundle().dv.feature_names());
        assert_eq!(loaded.model.kind(), "linear");
        assert_eq!(loaded.model.n_features(), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = ModelBundle::load("/nonexistent/dir/model.bin").unwrap_err();
        assert!(matches!(err, PriceError::IoError(_)));
    }

    #[test]
    fn test_empty_artifact() {
        let err = ModelBundle::from_bytes(&[]).unwrap_err();
        assert!(matches!(err, PriceError::BundleDecodeError(_)));
    }

    #[test]
    fn test_corrupt_artifact() {
        let err = ModelBundle::from_bytes(b"not a model bundle").unwrap_err();
        assert!(matches!(err, PriceError::BundleDecodeError(_)));
    }

    #[test]
    fn test_huge_length_prefix_is_rejected() {
        let mut bytes = bincode::serialize(&bundle()).unwrap();
        // Coefficients encode as shape (2,) then the data length 2; claim 2^40
        // elements in the data length.
        let prefix_at = bytes
            .windows(8)
            .enumerate()
            .filter(|(_, w)| *w == 2u64.to_le_bytes())
            .map(|(i, _)| i)
            .nth(1)
            .unwrap();
        bytes[prefix_at..prefix_at + 8].copy_from_slice(&(1u64 << 40).to_le_bytes());

        let err = ModelBundle::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, PriceError::BundleDecodeError(_)));
    }

    #[test]
    fn test_cyclic_tree_is_rejected_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");

        let cyclic = RegressionTree::from_nodes(vec![
            Node::Split { feature_idx: 0, threshold: 0.0, left: 1, right: 2 },
            Node::Split { feature_idx: 0, threshold: 0.0, left: 0, right: 2 },
            Node::Leaf { value: 1.0 },
        ]);
        let model = TreeEnsembleRegressor::from_trees(vec![cyclic], 1, Aggregation::Mean);
        let dv = DictVectorizer::new(vec!["area".to_string()]).unwrap();
        ModelBundle::new(dv, model).save(&path).unwrap();

        let err = ModelBundle::load(&path).unwrap_err();
        assert!(matches!(err, PriceError::BundleDecodeError(ref msg) if msg.contains("tree 0")));
    }

    #[test]
    fn test_very_deep_tree_round_trips() {
        let depth = 50_000u32;
        let mut nodes = Vec::new();
        for i in 0..depth {
            nodes.push(Node::Split {
                feature_idx: 0,
                threshold: 0.0,
                left: 2 * i + 2,
                right: 2 * i + 1,
            });
            nodes.push(Node::Leaf { value: 1.0 });
        }
        nodes.push(Node::Leaf { value: -1.0 });

        let model = TreeEnsembleRegressor::from_trees(
            vec![RegressionTree::from_nodes(nodes)],
            1,
            Aggregation::Mean,
        );
        let dv = DictVectorizer::new(vec!["area".to_string()]).unwrap();
        let bytes = bincode::serialize(&ModelBundle::new(dv, model)).unwrap();

        let loaded = ModelBundle::from_bytes(&bytes).unwrap();
        assert_eq!(loaded.model.kind(), "random_forest");
    }

    #[test]
    fn test_width_mismatch_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");

        let dv = DictVectorizer::new(vec!["area".to_string()]).unwrap();
        ModelBundle::new(dv, LinearRegressor::new(array![1.0, 2.0], 0.0))
            .save(&path)
            .unwrap();

        assert!(ModelBundle::load(&path).is_ok());
    }
}
