use super::{CurveCoefficients, as_column, require_positive, single_feature};
use crate::error::Result;
use crate::iteration::Interrupt;
use crate::least_squares;
use crate::linalg;
use crate::model::{Estimator, Predictor};
use crate::params::Parameters;
use crate::{Matrix, Vector};

/// `y = a·ln(x) + b`. The feature must be strictly positive, also at
/// prediction time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Logarithmic;

impl Logarithmic {
    pub fn new() -> Self {
        Self
    }

    pub fn hyperparameters(&self) -> Parameters {
        Parameters::new()
    }

    pub fn from_hyperparameters(_params: &Parameters) -> Result<Self> {
        Ok(Self)
    }
}

impl Estimator for Logarithmic {
    type Fitted = FittedLogarithmic;

    fn fit_with(&self, x: &Matrix, y: &Vector, _interrupt: &Interrupt) -> Result<Self::Fitted> {
        linalg::check_fit_input(x, y)?;
        let feature = single_feature(x)?;
        require_positive(feature, "x")?;

        let design = as_column(feature.mapv(f64::ln));
        let (slope, intercept) = least_squares::fit_least_squares(&design, y, true)?;

        Ok(FittedLogarithmic {
            estimator: self.clone(),
            curve: CurveCoefficients {
                a: slope[0],
                b: intercept,
            },
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FittedLogarithmic {
    estimator: Logarithmic,
    curve: CurveCoefficients,
}

impl FittedLogarithmic {
    pub fn estimator(&self) -> &Logarithmic {
        &self.estimator
    }

    pub fn a(&self) -> f64 {
        self.curve.a
    }

    pub fn b(&self) -> f64 {
        self.curve.b
    }

    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        Ok(Self {
            estimator: Logarithmic::from_hyperparameters(params)?,
            curve: CurveCoefficients::read_from(params)?,
        })
    }
}

impl Predictor for FittedLogarithmic {
    fn predict(&self, x: &Matrix) -> Result<Vector> {
        let feature = single_feature(x)?;
        require_positive(feature, "x")?;

        let CurveCoefficients { a, b } = self.curve;
        Ok(feature.mapv(|v| a * v.ln() + b))
    }

    fn parameters(&self) -> Parameters {
        let mut params = self.estimator.hyperparameters();
        self.curve.write_to(&mut params);
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegressionError;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_logarithmic_exact_fit() {
        let x = array![[0.5], [1.0], [2.0], [4.0], [8.0]];
        let y = x.column(0).mapv(|v: f64| 2.5 * v.ln() - 1.0);

        let model = Logarithmic::new().fit(&x, &y).unwrap();

        assert_abs_diff_eq!(model.a(), 2.5, epsilon = 1e-9);
        assert_abs_diff_eq!(model.b(), -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(model.score(&x, &y).unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_logarithmic_rejects_non_positive_inputs() {
        let y = array![1.0, 2.0, 3.0];

        for bad in [array![[1.0], [0.0], [2.0]], array![[-1.0], [1.0], [2.0]]] {
            assert!(matches!(
                Logarithmic::new().fit(&bad, &y),
                Err(RegressionError::DomainViolation(_))
            ));
        }
    }

    #[test]
    fn test_logarithmic_predict_domain_violation() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![0.0, 0.7, 1.1];
        let model = Logarithmic::new().fit(&x, &y).unwrap();

        assert!(matches!(
            model.predict(&array![[1.0], [-2.0]]),
            Err(RegressionError::DomainViolation(_))
        ));
    }

    #[test]
    fn test_logarithmic_parameters_round_trip() {
        let x = array![[1.0], [2.0], [3.0], [5.0]];
        let y = array![0.1, 0.8, 1.0, 1.7];
        let model = Logarithmic::new().fit(&x, &y).unwrap();

        let restored = FittedLogarithmic::from_parameters(&model.parameters()).unwrap();
        assert_eq!(restored, model);
    }
}
