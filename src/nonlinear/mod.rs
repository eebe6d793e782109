//! Single-feature curve fits reduced to one least-squares solve.
//!
//! Each model transforms its input and/or target, fits a linear model on the
//! transformed data and inverts the transform at prediction time:
//!
//! | Model         | Domain        | Fitted form        |
//! |---------------|---------------|--------------------|
//! | `Polynomial`  | any           | `Σ cᵢ·xⁱ`          |
//! | `Exponential` | y > 0         | `a·exp(b·x)`       |
//! | `Logarithmic` | x > 0         | `a·ln(x) + b`      |
//! | `Power`       | x > 0, y > 0  | `a·x^b`            |
//!
//! All of them expect a matrix with exactly one column. Values outside the
//! domain are rejected with [`DomainViolation`](crate::RegressionError::DomainViolation),
//! both when fitting and when predicting.
//!
//! ```rust
//! use regressors::{Estimator, Exponential, Predictor};
//! use ndarray::array;
//!
//! let x = array![[0.0], [1.0], [2.0], [3.0]];
//! let y = x.column(0).mapv(|v: f64| 2.0 * (0.5 * v).exp());
//!
//! let model = Exponential::new().fit(&x, &y).unwrap();
//! assert!((model.a() - 2.0).abs() < 1e-9);
//! assert!((model.b() - 0.5).abs() < 1e-9);
//! ```

mod exponential;
mod logarithmic;
mod polynomial;
mod power;

pub use exponential::{Exponential, FittedExponential};
pub use logarithmic::{FittedLogarithmic, Logarithmic};
pub use polynomial::{FittedPolynomial, Polynomial};
pub use power::{FittedPower, Power};

use crate::error::{RegressionError, Result};
use crate::params::Parameters;
use crate::{Matrix, Vector};
use ndarray::ArrayView1;

/// The only column of `x`, or `ShapeMismatch` if there is not exactly one.
pub(crate) fn single_feature(x: &Matrix) -> Result<ArrayView1<'_, f64>> {
    if x.ncols() != 1 {
        return Err(RegressionError::ShapeMismatch(format!(
            "expected a single feature column, got {}",
            x.ncols()
        )));
    }
    Ok(x.column(0))
}

pub(crate) fn require_positive(values: ArrayView1<'_, f64>, what: &str) -> Result<()> {
    match values.iter().position(|v| !(*v > 0.0)) {
        Some(index) => Err(RegressionError::DomainViolation(format!(
            "{} must be positive, found {} at index {}",
            what, values[index], index
        ))),
        None => Ok(()),
    }
}

/// Reshape a transformed feature into a one-column design.
pub(crate) fn as_column(values: Vector) -> Matrix {
    values.insert_axis(ndarray::Axis(1))
}

/// The `a`/`b` pair shared by the two-parameter curves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct CurveCoefficients {
    pub(crate) a: f64,
    pub(crate) b: f64,
}

impl CurveCoefficients {
    pub(crate) fn write_to(&self, params: &mut Parameters) {
        params.insert("a", self.a);
        params.insert("b", self.b);
    }

    pub(crate) fn read_from(params: &Parameters) -> Result<Self> {
        Ok(Self {
            a: params.scalar("a")?,
            b: params.scalar("b")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_single_feature() {
        let x = array![[1.0], [2.0]];
        assert_eq!(single_feature(&x).unwrap(), array![1.0, 2.0]);

        let wide = array![[1.0, 2.0]];
        assert!(matches!(
            single_feature(&wide),
            Err(RegressionError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_require_positive() {
        let values = array![1.0, 0.5, 0.0, 2.0];
        assert!(require_positive(values.slice(ndarray::s![..2]), "x").is_ok());

        match require_positive(values.view(), "x") {
            Err(RegressionError::DomainViolation(message)) => assert!(message.contains("index 2")),
            other => panic!("expected a domain violation, got {:?}", other),
        }

        let nan = array![f64::NAN];
        assert!(require_positive(nan.view(), "y").is_err());
    }
}
