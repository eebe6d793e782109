//! Linear models for regression and classification.
//!
//! This module provides implementations of linear models including:
//! - `LinearRegression`: Ordinary least squares via the normal equations
//! - `Ridge`: L2-regularized least squares solved by Cholesky factorization
//! - `Lasso`: L1-regularized least squares solved by coordinate descent
//! - `LogisticRegression`: Binary classification trained by batch gradient descent
//! - `Pls`: Partial least squares regression via NIPALS
//!
//! Every estimator is a set of hyperparameters; calling `fit` returns a separate
//! fitted model, so predicting with an untrained model cannot be expressed.
//!
//! # Examples
//!
//! ## Linear Regression
//! ```rust
//! use regressors::{Estimator, LinearRegression, Predictor};
//! use ndarray::array;
//!
//! let x = array![[1.0], [2.0], [3.0]];
//! let y = array![2.0, 4.0, 6.0];
//!
//! let model = LinearRegression::new().fit(&x, &y).unwrap();
//! let predictions = model.predict(&x).unwrap();
//! assert!((predictions[2] - 6.0).abs() < 1e-9);
//! ```
//!
//! ## Logistic Regression
//! ```rust
//! use regressors::{Estimator, LogisticRegression, Predictor};
//! use ndarray::array;
//!
//! let x = array![[1.0], [2.0], [3.0], [4.0]];
//! let y = array![0.0, 0.0, 1.0, 1.0];
//!
//! let model = LogisticRegression::new().learning_rate(0.5).fit(&x, &y).unwrap();
//! let probabilities = model.predict(&x).unwrap();
//! let classes = model.predict_class(&x, 0.5).unwrap();
//! assert!(probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
//! assert_eq!(classes.len(), 4);
//! ```

mod lasso;
mod linear_regression;
mod logistic_regression;
mod pls;
mod ridge;

pub use lasso::{FittedLasso, Lasso};
pub use linear_regression::{FittedLinearRegression, LinearRegression};
pub use logistic_regression::{FittedLogisticRegression, LogisticRegression};
pub use pls::{FittedPls, Pls};
pub use ridge::{FittedRidge, Ridge};

use crate::error::Result;
use crate::least_squares;
use crate::params::Parameters;
use crate::{Matrix, Vector};

/// Learned weights shared by the intercept-plus-coefficients models.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LinearWeights {
    pub(crate) coefficients: Vector,
    pub(crate) intercept: f64,
}

impl LinearWeights {
    pub(crate) fn decision_function(&self, x: &Matrix) -> Result<Vector> {
        least_squares::predict_linear(x, &self.coefficients, self.intercept)
    }

    pub(crate) fn write_to(&self, params: &mut Parameters) {
        params.insert("coefficients", &self.coefficients);
        params.insert("intercept", self.intercept);
    }

    pub(crate) fn read_from(params: &Parameters) -> Result<Self> {
        Ok(Self {
            coefficients: params.vector("coefficients")?,
            intercept: params.scalar_or("intercept", 0.0)?,
        })
    }
}

/// Shrink `z` towards zero by `gamma`, clamping to zero inside `[-gamma, gamma]`.
pub(crate) fn soft_threshold(z: f64, gamma: f64) -> f64 {
    if z > gamma {
        z - gamma
    } else if z < -gamma {
        z + gamma
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_threshold() {
        assert_eq!(soft_threshold(3.0, 1.0), 2.0);
        assert_eq!(soft_threshold(-3.0, 1.0), -2.0);
        assert_eq!(soft_threshold(0.5, 1.0), 0.0);
        assert_eq!(soft_threshold(-1.0, 1.0), 0.0);
        assert_eq!(soft_threshold(0.25, 0.0), 0.25);
    }
}
