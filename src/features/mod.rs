//! Feature records and vectorization
//!
//! A [`FeatureRecord`] is the per-request mapping from feature name to value.
//! The [`DictVectorizer`] turns a batch of records into the fixed-width dense
//! matrix the predictor was trained on.

mod dict_vectorizer;

pub use dict_vectorizer::DictVectorizer;

use crate::error::{PriceError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One caller-supplied set of named feature values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRecord(Map<String, Value>);

impl FeatureRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a record from an arbitrary JSON value; only objects are accepted.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(PriceError::InvalidInput(format!(
                "expected a JSON object of features, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for FeatureRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Human-readable name of a JSON value's type, used in error messages
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
