//! Linear regressor

use crate::error::Result;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::{check_width, Regressor};

/// Fitted linear model: `x · coefficients + intercept`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    /// Fitted coefficients (weights)
    pub coefficients: Array1<f64>,
    /// Fitted intercept (bias)
    pub intercept: f64,
}

impl LinearRegressor {
    pub fn new(coefficients: Array1<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }
}

impl Regressor for LinearRegressor {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        check_width(self.n_features(), x)?;
        Ok(x.dot(&self.coefficients) + self.intercept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_linear_prediction() {
        // y = 2*x1 + 3*x2 + 1
        let model = LinearRegressor::new(array![2.0, 3.0], 1.0);
        let x = array![[1.0, 1.0], [2.0, 1.0], [0.0, 0.0]];

        let y = model.predict(&x).unwrap();
        assert_eq!(y.to_vec(), vec![6.0, 8.0, 1.0]);
    }

    #[test]
    fn test_empty_batch() {
        let model = LinearRegressor::new(array![2.0, 3.0], 1.0);
        let x = Array2::<f64>::zeros((0, 2));
        assert_eq!(model.predict(&x).unwrap().len(), 0);
    }
}
