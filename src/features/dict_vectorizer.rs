//! Dictionary vectorizer
//!
//! Maps named feature records onto the column layout fixed at training time.
//!
//! Encoding contract for a single `key: value` pair:
//! - number: column `key` receives the value
//! - boolean: column `key` receives 1.0 or 0.0
//! - string: column `key=value` receives 1.0 (one-hot)
//! - array of strings: column `key=item` receives 1.0 for every item
//! - null: treated as if the key were absent
//! - object, or an array holding anything but strings: rejected
//!
//! Keys or one-hot columns that were not seen during training are ignored and
//! every column without a value stays at 0.0.

use crate::error::{PriceError, Result};
use ndarray::{Array2, ArrayViewMut1};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::{json_kind, FeatureRecord};

const SEPARATOR: &str = "=";

/// Feature-name to column vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictVectorizer {
    feature_names: Vec<String>,
    vocabulary: HashMap<String, usize>,
}

impl DictVectorizer {
    /// Create a vectorizer from the ordered training-time column names
    pub fn new(feature_names: Vec<String>) -> Result<Self> {
        let mut vocabulary = HashMap::with_capacity(feature_names.len());
        for (idx, name) in feature_names.iter().enumerate() {
            if vocabulary.insert(name.clone(), idx).is_some() {
                return Err(PriceError::InvalidInput(format!(
                    "duplicate feature column: {}",
                    name
                )));
            }
        }

        Ok(Self {
            feature_names,
            vocabulary,
        })
    }

    /// Width of the vectors this vectorizer produces
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Encode a batch of records, one row per record
    pub fn transform(&self, records: &[FeatureRecord]) -> Result<Array2<f64>> {
        let mut result = Array2::zeros((records.len(), self.n_features()));

        for (row_idx, record) in records.iter().enumerate() {
            self.encode_into(record, result.row_mut(row_idx))?;
        }

        Ok(result)
    }

    fn encode_into(&self, record: &FeatureRecord, mut row: ArrayViewMut1<f64>) -> Result<()> {
        for (name, value) in record.iter() {
            match value {
                Value::Null => {}
                Value::Bool(b) => self.set(&mut row, name, if *b { 1.0 } else { 0.0 }),
                Value::Number(n) => {
                    let v = n.as_f64().ok_or_else(|| PriceError::InvalidFeature {
                        name: name.clone(),
                        reason: format!("{} is not representable as a float", n),
                    })?;
                    self.set(&mut row, name, v);
                }
                Value::String(s) => self.set(&mut row, &self.one_hot_name(name, s), 1.0),
                Value::Array(items) => {
                    for item in items {
                        match item {
                            Value::String(s) => {
                                self.set(&mut row, &self.one_hot_name(name, s), 1.0)
                            }
                            other => {
                                return Err(PriceError::InvalidFeature {
                                    name: name.clone(),
                                    reason: format!(
                                        "array items must be strings, got {}",
                                        json_kind(other)
                                    ),
                                })
                            }
                        }
                    }
                }
                Value::Object(_) => {
                    return Err(PriceError::InvalidFeature {
                        name: name.clone(),
                        reason: "nested objects are not supported".to_string(),
                    })
                }
            }
        }

        Ok(())
    }

    fn one_hot_name(&self, name: &str, value: &str) -> String {
        format!("{}{}{}", name, SEPARATOR, value)
    }

    fn set(&self, row: &mut ArrayViewMut1<f64>, column: &str, value: f64) {
        if let Some(&idx) = self.vocabulary.get(column) {
            row[idx] = value;
        }
    }
}
