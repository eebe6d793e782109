use super::{CurveCoefficients, require_positive, single_feature};
use crate::error::Result;
use crate::iteration::Interrupt;
use crate::least_squares;
use crate::linalg;
use crate::model::{Estimator, Predictor};
use crate::params::Parameters;
use crate::{Matrix, Vector};

/// Exponential growth or decay, `y = a·exp(b·x)`, fitted as `ln y = ln a + b·x`.
///
/// Every target must be strictly positive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Exponential;

impl Exponential {
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

impl Estimator for Exponential {
    type Fitted = FittedExponential;

    fn fit_with(&self, x: &Matrix, y: &Vector, _interrupt: &Interrupt) -> Result<Self::Fitted> {
        linalg::check_fit_input(x, y)?;
        single_feature(x)?;
        require_positive(y.view(), "y")?;

        let log_y = y.mapv(f64::ln);
        let (slope, log_a) = least_squares::fit_least_squares(x, &log_y, true)?;

        Ok(FittedExponential {
            estimator: self.clone(),
            curve: CurveCoefficients {
                a: log_a.exp(),
                b: slope[0],
            },
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FittedExponential {
    estimator: Exponential,
    curve: CurveCoefficients,
}

impl FittedExponential {
    pub fn estimator(&self) -> &Exponential {
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
            estimator: Exponential::from_hyperparameters(params)?,
            curve: CurveCoefficients::read_from(params)?,
        })
    }
}

impl Predictor for FittedExponential {
    fn predict(&self, x: &Matrix) -> Result<Vector> {
        let CurveCoefficients { a, b } = self.curve;
        Ok(single_feature(x)?.mapv(|v| a * (b * v).exp()))
    }

    fn parameters(&self) -> Parameters {
        let mut params = self.estimator.hyperparameters();
        self.curve.write_to(&mut params);
        params
    }
}
