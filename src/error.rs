//! Error types for the house price service

use thiserror::Error;

/// Result type alias for bundle and inference operations
pub type Result<T> = std::result::Result<T, PriceError>;

/// Main error type for bundle loading and inference
#[derive(Error, Debug)]
pub enum PriceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Bundle decode error: {0}")]
    BundleDecodeError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid feature '{name}': {reason}")]
    InvalidFeature { name: String, reason: String },

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Prediction error: {0}")]
    PredictionError(String),

    /// Feature values drove the prediction outside the representable range
    #[error("Out of range: {0}")]
    OutOfRange(String),
}

impl PriceError {
    /// Whether the error was caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PriceError::InvalidInput(_)
                | PriceError::InvalidFeature { .. }
                | PriceError::OutOfRange(_)
        )
    }
}

impl From<bincode::Error> for PriceError {
    fn from(err: bincode::Error) -> Self {
        PriceError::BundleDecodeError(err.to_string())
    }
}

impl From<serde_json::Error> for PriceError {
    fn from(err: serde_json::Error) -> Self {
        PriceError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PriceError {
    fn from(err: ndarray::ShapeError) -> Self {
        PriceError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PriceError::InvalidFeature {
            name: "location".to_string(),
            reason: "nested objects are not supported".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid feature 'location': nested objects are not supported"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PriceError = io_err.into();
        assert!(matches!(err, PriceError::IoError(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_client_errors() {
        assert!(PriceError::InvalidInput("x".to_string()).is_client_error());
        assert!(PriceError::OutOfRange("inf".to_string()).is_client_error());
        let shape = PriceError::ShapeError {
            expected: "3".to_string(),
            actual: "4".to_string(),
        };
        assert!(!shape.is_client_error());
    }
}
