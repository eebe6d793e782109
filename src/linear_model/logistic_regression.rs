use super::LinearWeights;
use crate::error::{RegressionError, Result};
use crate::iteration::{self, Convergence, Interrupt};
use crate::least_squares;
use crate::linalg;
use crate::metrics;
use crate::model::{Estimator, Predictor};
use crate::params::Parameters;
use crate::{Matrix, Vector};

/// Binary logistic regression trained by batch gradient descent.
///
/// Labels are expected to be 0.0 or 1.0. `predict` returns probabilities;
/// use [`FittedLogisticRegression::predict_class`] for hard labels. `score`
/// reports accuracy at a 0.5 threshold rather than R².
#[derive(Clone, Debug, PartialEq)]
pub struct LogisticRegression {
    fit_intercept: bool,
    learning_rate: f64,
    max_iterations: usize,
    tolerance: f64,
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self {
            fit_intercept: true,
            learning_rate: 0.01,
            max_iterations: 1000,
            tolerance: 1e-4,
        }
    }

    pub fn with_params(learning_rate: f64, max_iterations: usize, fit_intercept: bool) -> Self {
        Self::new()
            .learning_rate(learning_rate)
            .max_iter(max_iterations)
            .fit_intercept(fit_intercept)
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        if !(learning_rate > 0.0) {
            panic!("learning_rate must be positive, got {}", learning_rate);
        }
        self.learning_rate = learning_rate;
        self
    }

    pub fn max_iter(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn hyperparameters(&self) -> Parameters {
        Parameters::new()
            .with("fit_intercept", self.fit_intercept)
            .with("learning_rate", self.learning_rate)
            .with("max_iter", self.max_iterations)
            .with("tol", self.tolerance)
    }

    pub fn from_hyperparameters(params: &Parameters) -> Result<Self> {
        let defaults = Self::new();
        let learning_rate = params.scalar_or("learning_rate", defaults.learning_rate)?;
        if !(learning_rate > 0.0) {
            return Err(RegressionError::invalid_parameter(
                "learning_rate",
                format!("must be positive, got {}", learning_rate),
            ));
        }
        Ok(Self {
            fit_intercept: params.flag_or("fit_intercept", defaults.fit_intercept)?,
            learning_rate,
            max_iterations: params.integer_or("max_iter", defaults.max_iterations)?,
            tolerance: params.scalar_or("tol", defaults.tolerance)?,
        })
    }

    fn gradient_descent(
        &self,
        design: &Matrix,
        y: &Vector,
        interrupt: &Interrupt,
    ) -> Result<(Vector, Convergence)> {
        let n_samples = design.nrows() as f64;
        let mut theta = Vector::zeros(design.ncols());

        let convergence = iteration::descend(
            &mut theta,
            self.max_iterations,
            self.tolerance,
            interrupt,
            |theta| {
                let predictions = design.dot(&*theta).mapv(sigmoid);
                let error = &predictions - y;
                let gradient = design.t().dot(&error) / n_samples;
                theta.scaled_add(-self.learning_rate, &gradient);
            },
        )?;

        Ok((theta, convergence))
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

/// Logistic function, saturated outside `[-30, 30]`.
pub(crate) fn sigmoid(z: f64) -> f64 {
    if z > 30.0 {
        1.0
    } else if z < -30.0 {
        0.0
    } else {
        1.0 / (1.0 + (-z).exp())
    }
}

impl Estimator for LogisticRegression {
    type Fitted = FittedLogisticRegression;

    fn fit_with(&self, x: &Matrix, y: &Vector, interrupt: &Interrupt) -> Result<Self::Fitted> {
        linalg::check_fit_input(x, y)?;

        let design = least_squares::design_matrix(x, self.fit_intercept);
        let (theta, convergence) = self.gradient_descent(&design, y, interrupt)?;
        let (coefficients, intercept) = least_squares::split_intercept(theta, self.fit_intercept);

        Ok(FittedLogisticRegression {
            estimator: self.clone(),
            weights: LinearWeights {
                coefficients,
                intercept,
            },
            convergence,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FittedLogisticRegression {
    estimator: LogisticRegression,
    weights: LinearWeights,
    convergence: Convergence,
}

impl FittedLogisticRegression {
    pub fn estimator(&self) -> &LogisticRegression {
        &self.estimator
    }

    pub fn coefficients(&self) -> &Vector {
        &self.weights.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.weights.intercept
    }

    pub fn n_iter(&self) -> usize {
        self.convergence.iterations
    }

    pub fn converged(&self) -> bool {
        self.convergence.converged
    }

    /// Hard 0/1 labels: 1.0 where the probability is at least `threshold`.
    pub fn predict_class(&self, x: &Matrix, threshold: f64) -> Result<Vector> {
        let probabilities = self.predict(x)?;
        Ok(probabilities.mapv(|p| if p >= threshold { 1.0 } else { 0.0 }))
    }

    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        Ok(Self {
            estimator: LogisticRegression::from_hyperparameters(params)?,
            weights: LinearWeights::read_from(params)?,
            convergence: Convergence::read_from(params)?,
        })
    }
}

impl Predictor for FittedLogisticRegression {
    fn predict(&self, x: &Matrix) -> Result<Vector> {
        Ok(self.weights.decision_function(x)?.mapv(sigmoid))
    }

    /// Classification accuracy at a 0.5 threshold.
    fn score(&self, x: &Matrix, y: &Vector) -> Result<f64> {
        let predictions = self.predict_class(x, 0.5)?;
        metrics::accuracy_score(y, &predictions)
    }

    fn parameters(&self) -> Parameters {
        let mut params = self.estimator.hyperparameters();
        self.weights.write_to(&mut params);
        self.convergence.write_to(&mut params);
        params
    }
}
