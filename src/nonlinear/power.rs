use super::{CurveCoefficients, as_column, require_positive, single_feature};
use crate::error::Result;
use crate::iteration::Interrupt;
use crate::least_squares;
use crate::linalg;
use crate::model::{Estimator, Predictor};
use crate::params::Parameters;
use crate::{Matrix, Vector};

/// Power law `y = a·x^b`, fitted on the log-log scale.
///
/// Both feature and target must be strictly positive when fitting; the
/// feature must stay positive when predicting.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Power;

impl Power {
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

impl Estimator for Power {
    type Fitted = FittedPower;

    fn fit_with(&self, x: &Matrix, y: &Vector, _interrupt: &Interrupt) -> Result<Self::Fitted> {
        linalg::check_fit_input(x, y)?;
        let feature = single_feature(x)?;
        require_positive(feature, "x")?;
        require_positive(y.view(), "y")?;

        let design = as_column(feature.mapv(f64::ln));
        let log_y = y.mapv(f64::ln);
        let (exponent, log_a) = least_squares::fit_least_squares(&design, &log_y, true)?;

        Ok(FittedPower {
            estimator: self.clone(),
            curve: CurveCoefficients {
                a: log_a.exp(),
                b: exponent[0],
            },
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FittedPower {
    estimator: Power,
    curve: CurveCoefficients,
}

impl FittedPower {
    pub fn estimator(&self) -> &Power {
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
            estimator: Power::from_hyperparameters(params)?,
            curve: CurveCoefficients::read_from(params)?,
        })
    }
}

impl Predictor for FittedPower {
    fn predict(&self, x: &Matrix) -> Result<Vector> {
        let feature = single_feature(x)?;
        require_positive(feature, "x")?;

        let CurveCoefficients { a, b } = self.curve;
        Ok(feature.mapv(|v| a * v.powf(b)))
    }

    fn parameters(&self) -> Parameters {
        let mut params = self.estimator.hyperparameters();
        self.curve.write_to(&mut params);
        params
    }
}
