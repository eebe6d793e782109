use super::LinearWeights;
use crate::error::Result;
use crate::iteration::Interrupt;
use crate::least_squares;
use crate::model::{Estimator, Predictor};
use crate::params::Parameters;
use crate::{Matrix, Vector};

/// Ordinary least squares, solved through the normal equations.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearRegression {
    fit_intercept: bool,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            fit_intercept: true,
        }
    }

    pub fn with_intercept(fit_intercept: bool) -> Self {
        Self { fit_intercept }
    }

    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn hyperparameters(&self) -> Parameters {
        Parameters::new().with("fit_intercept", self.fit_intercept)
    }

    pub fn from_hyperparameters(params: &Parameters) -> Result<Self> {
        Ok(Self {
            fit_intercept: params.flag_or("fit_intercept", true)?,
        })
    }
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl Estimator for LinearRegression {
    type Fitted = FittedLinearRegression;

    fn fit_with(&self, x: &Matrix, y: &Vector, _interrupt: &Interrupt) -> Result<Self::Fitted> {
        let (coefficients, intercept) = least_squares::fit_least_squares(x, y, self.fit_intercept)?;

        Ok(FittedLinearRegression {
            estimator: self.clone(),
            weights: LinearWeights {
                coefficients,
                intercept,
            },
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FittedLinearRegression {
    estimator: LinearRegression,
    weights: LinearWeights,
}

impl FittedLinearRegression {
    pub fn estimator(&self) -> &LinearRegression {
        &self.estimator
    }

    pub fn coefficients(&self) -> &Vector {
        &self.weights.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.weights.intercept
    }

    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        Ok(Self {
            estimator: LinearRegression::from_hyperparameters(params)?,
            weights: LinearWeights::read_from(params)?,
        })
    }
}

impl Predictor for FittedLinearRegression {
    fn predict(&self, x: &Matrix) -> Result<Vector> {
        self.weights.decision_function(x)
    }

    fn parameters(&self) -> Parameters {
        let mut params = self.estimator.hyperparameters();
        self.weights.write_to(&mut params);
        params
    }
}
