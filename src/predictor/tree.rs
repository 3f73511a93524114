//! Regression tree ensembles
//!
//! Covers both boosted ensembles (base score plus scaled sum of trees) and
//! averaged forests. Splits send a sample left when `x[feature_idx] <= threshold`.
//!
//! Trees are stored as flat node arrays with child indices local to the tree
//! (0 = root), so decoding an artifact never recurses. [`TreeNode`] is the
//! nested form used to build trees in code.

use crate::error::{PriceError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use super::{check_width, Regressor};

/// Nested tree builder
#[derive(Debug, Clone)]
pub enum TreeNode {
    Leaf { value: f64 },
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    pub fn leaf(value: f64) -> Self {
        TreeNode::Leaf { value }
    }

    pub fn split(feature_idx: usize, threshold: f64, left: TreeNode, right: TreeNode) -> Self {
        TreeNode::Split {
            feature_idx,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// One node of a flat tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Leaf node with prediction value
    Leaf { value: f64 },
    /// Internal node with split
    Split {
        feature_idx: usize,
        threshold: f64,
        left: u32,
        right: u32,
    },
}

/// Regression tree stored as a flat node array
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Wrap raw nodes without checking them; see [`RegressionTree::validate`]
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Check that the nodes form a single tree rooted at 0: every child index
    /// in bounds, no cycles, no shared or unreachable nodes, and every split
    /// feature below `n_features`.
    pub fn validate(&self, n_features: usize) -> std::result::Result<(), String> {
        let n_nodes = self.nodes.len();
        if n_nodes == 0 {
            return Err("tree has no nodes".to_string());
        }

        let mut visited = vec![false; n_nodes];
        let mut stack = vec![0u32];

        while let Some(idx) = stack.pop() {
            let i = idx as usize;
            if i >= n_nodes {
                return Err(format!("child index {} out of bounds ({} nodes)", idx, n_nodes));
            }
            if visited[i] {
                return Err(format!("node {} is reachable more than once", idx));
            }
            visited[i] = true;

            if let Node::Split {
                feature_idx,
                left,
                right,
                ..
            } = self.nodes[i]
            {
                if feature_idx >= n_features {
                    return Err(format!(
                        "node {} splits on feature {} but the model has {}",
                        idx, feature_idx, n_features
                    ));
                }
                stack.push(right);
                stack.push(left);
            }
        }

        if let Some(unreachable) = visited.iter().position(|v| !v) {
            return Err(format!("node {} is unreachable from the root", unreachable));
        }

        Ok(())
    }

    fn evaluate(&self, sample: &ArrayView1<f64>) -> Result<f64> {
        let mut idx = 0usize;
        // A valid tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..=self.nodes.len() {
            let node = self.nodes.get(idx).ok_or_else(|| {
                PriceError::PredictionError(format!("tree node {} does not exist", idx))
            })?;
            match *node {
                Node::Leaf { value } => return Ok(value),
                Node::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                } => {
                    let v = sample.get(feature_idx).ok_or_else(|| {
                        PriceError::PredictionError(format!(
                            "tree split references feature {} but the sample has {}",
                            feature_idx,
                            sample.len()
                        ))
                    })?;
                    let next = if *v <= threshold { left } else { right };
                    idx = next as usize;
                }
            }
        }

        Err(PriceError::PredictionError("tree traversal does not terminate".to_string()))
    }

    /// Depth of the deepest leaf (a single leaf has depth 0)
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0usize, 0usize)];
        let mut budget = self.nodes.len();

        while let Some((idx, depth)) = stack.pop() {
            if budget == 0 {
                break;
            }
            budget -= 1;

            match self.nodes.get(idx) {
                Some(Node::Split { left, right, .. }) => {
                    stack.push((*left as usize, depth + 1));
                    stack.push((*right as usize, depth + 1));
                }
                Some(Node::Leaf { .. }) => max_depth = max_depth.max(depth),
                None => {}
            }
        }

        max_depth
    }
}

impl From<TreeNode> for RegressionTree {
    fn from(root: TreeNode) -> Self {
        let mut nodes = Vec::new();
        // (subtree, parent index, is left child)
        let mut stack: Vec<(TreeNode, Option<(usize, bool)>)> = vec![(root, None)];

        while let Some((node, parent)) = stack.pop() {
            let idx = nodes.len() as u32;
            if let Some((p, is_left)) = parent {
                if let Node::Split { left, right, .. } = &mut nodes[p] {
                    if is_left {
                        *left = idx;
                    } else {
                        *right = idx;
                    }
                }
            }

            match node {
                TreeNode::Leaf { value } => nodes.push(Node::Leaf { value }),
                TreeNode::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                } => {
                    nodes.push(Node::Split {
                        feature_idx,
                        threshold,
                        left: 0,
                        right: 0,
                    });
                    stack.push((*right, Some((idx as usize, false))));
                    stack.push((*left, Some((idx as usize, true))));
                }
            }
        }

        Self { nodes }
    }
}

/// How per-tree outputs combine into one prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Aggregation {
    /// `base_score + learning_rate * sum(trees)`
    Boosted { base_score: f64, learning_rate: f64 },
    /// Mean of tree outputs
    Mean,
}

/// Fitted tree ensemble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsembleRegressor {
    trees: Vec<RegressionTree>,
    n_features: usize,
    aggregation: Aggregation,
}

impl TreeEnsembleRegressor {
    pub fn new(trees: Vec<TreeNode>, n_features: usize, aggregation: Aggregation) -> Self {
        let trees = trees.into_iter().map(RegressionTree::from).collect();
        Self::from_trees(trees, n_features, aggregation)
    }

    pub fn from_trees(
        trees: Vec<RegressionTree>,
        n_features: usize,
        aggregation: Aggregation,
    ) -> Self {
        Self {
            trees,
            n_features,
            aggregation,
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn max_depth(&self) -> usize {
        self.trees.iter().map(RegressionTree::depth).max().unwrap_or(0)
    }

    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    /// Structural check run after decoding an artifact
    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() && self.aggregation == Aggregation::Mean {
            return Err(PriceError::BundleDecodeError(
                "averaged ensemble has no trees".to_string(),
            ));
        }

        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features).map_err(|reason| {
                PriceError::BundleDecodeError(format!("tree {}: {}", i, reason))
            })?;
        }
        Ok(())
    }

    fn predict_sample(&self, sample: ArrayView1<f64>) -> Result<f64> {
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.evaluate(&sample)?;
        }

        match self.aggregation {
            Aggregation::Boosted {
                base_score,
                learning_rate,
            } => Ok(base_score + learning_rate * sum),
            Aggregation::Mean => {
                if self.trees.is_empty() {
                    return Err(PriceError::PredictionError(
                        "averaged ensemble has no trees".to_string(),
                    ));
                }
                Ok(sum / self.trees.len() as f64)
            }
        }
    }
}

impl Regressor for TreeEnsembleRegressor {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        check_width(self.n_features, x)?;

        let predictions = x
            .rows()
            .into_iter()
            .map(|row| self.predict_sample(row))
            .collect::<Result<Vec<f64>>>()?;

        Ok(Array1::from_vec(predictions))
    }
}
