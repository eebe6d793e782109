use super::{LinearWeights, soft_threshold};
use crate::error::{RegressionError, Result};
use crate::iteration::{self, Convergence, Interrupt};
use crate::least_squares;
use crate::linalg;
use crate::model::{Estimator, Predictor};
use crate::params::Parameters;
use crate::{Matrix, Vector};
use log::debug;

/// L1-regularized least squares fitted by cyclic coordinate descent.
///
/// Coordinates are visited in ascending order, the intercept (when fitted)
/// first and unpenalized. Reaching `max_iter` without the largest coefficient
/// change dropping below `tolerance` is accepted; check
/// [`FittedLasso::converged`] if it matters.
#[derive(Clone, Debug, PartialEq)]
pub struct Lasso {
    alpha: f64,
    fit_intercept: bool,
    max_iter: usize,
    tolerance: f64,
}

impl Lasso {
    pub fn new() -> Self {
        Self {
            alpha: 1.0,
            fit_intercept: true,
            max_iter: 1000,
            tolerance: 1e-4,
        }
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        if !(alpha >= 0.0) {
            panic!("alpha must be non-negative, got {}", alpha);
        }
        self.alpha = alpha;
        self
    }

    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn hyperparameters(&self) -> Parameters {
        Parameters::new()
            .with("alpha", self.alpha)
            .with("fit_intercept", self.fit_intercept)
            .with("max_iter", self.max_iter)
            .with("tol", self.tolerance)
    }

    pub fn from_hyperparameters(params: &Parameters) -> Result<Self> {
        let defaults = Self::new();
        let alpha = params.scalar_or("alpha", defaults.alpha)?;
        if !(alpha >= 0.0) {
            return Err(RegressionError::invalid_parameter(
                "alpha",
                format!("must be non-negative, got {}", alpha),
            ));
        }
        Ok(Self {
            alpha,
            fit_intercept: params.flag_or("fit_intercept", defaults.fit_intercept)?,
            max_iter: params.integer_or("max_iter", defaults.max_iter)?,
            tolerance: params.scalar_or("tol", defaults.tolerance)?,
        })
    }

    fn coordinate_descent(
        &self,
        design: &Matrix,
        y: &Vector,
        interrupt: &Interrupt,
    ) -> Result<(Vector, Convergence)> {
        let n_params = design.ncols();
        let n_samples = design.nrows() as f64;

        // (1/n) ||X_j||², fixed for the whole fit.
        let x_norms: Vector = (0..n_params)
            .map(|j| design.column(j).mapv(|v| v * v).sum() / n_samples)
            .collect();

        // Kept equal to y - X beta across coordinate updates.
        let mut residual = y.clone();
        let mut beta = Vector::zeros(n_params);

        let convergence = iteration::descend(
            &mut beta,
            self.max_iter,
            self.tolerance,
            interrupt,
            |beta| {
                for j in 0..n_params {
                    if x_norms[j] <= 0.0 {
                        continue;
                    }

                    let column = design.column(j);
                    let old = beta[j];
                    let rho = column.dot(&residual) / n_samples + x_norms[j] * old;

                    let penalty = if self.fit_intercept && j == 0 {
                        0.0
                    } else {
                        self.alpha
                    };
                    let updated = soft_threshold(rho, penalty / x_norms[j]) / x_norms[j];

                    if updated != old {
                        residual.scaled_add(old - updated, &column);
                        beta[j] = updated;
                    }
                }
            },
        )?;

        Ok((beta, convergence))
    }
}

impl Default for Lasso {
    fn default() -> Self {
        Self::new()
    }
}

impl Estimator for Lasso {
    type Fitted = FittedLasso;

    fn fit_with(&self, x: &Matrix, y: &Vector, interrupt: &Interrupt) -> Result<Self::Fitted> {
        linalg::check_fit_input(x, y)?;

        let design = least_squares::design_matrix(x, self.fit_intercept);
        let (beta, convergence) = self.coordinate_descent(&design, y, interrupt)?;
        let (coefficients, intercept) = least_squares::split_intercept(beta, self.fit_intercept);

        debug!(
            "lasso(alpha={}) kept {} of {} coefficients after {} iterations",
            self.alpha,
            coefficients.iter().filter(|c| **c != 0.0).count(),
            coefficients.len(),
            convergence.iterations
        );

        Ok(FittedLasso {
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
pub struct FittedLasso {
    estimator: Lasso,
    weights: LinearWeights,
    convergence: Convergence,
}

impl FittedLasso {
    pub fn estimator(&self) -> &Lasso {
        &self.estimator
    }

    pub fn coefficients(&self) -> &Vector {
        &self.weights.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.weights.intercept
    }

    /// Number of coefficients (intercept excluded) that are exactly zero.
    pub fn n_zero_coefficients(&self) -> usize {
        self.weights
            .coefficients
            .iter()
            .filter(|c| **c == 0.0)
            .count()
    }

    pub fn n_iter(&self) -> usize {
        self.convergence.iterations
    }

    pub fn converged(&self) -> bool {
        self.convergence.converged
    }

    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        Ok(Self {
            estimator: Lasso::from_hyperparameters(params)?,
            weights: LinearWeights::read_from(params)?,
            convergence: Convergence::read_from(params)?,
        })
    }
}

impl Predictor for FittedLasso {
    fn predict(&self, x: &Matrix) -> Result<Vector> {
        self.weights.decision_function(x)
    }

    fn parameters(&self) -> Parameters {
        let mut params = self.estimator.hyperparameters();
        self.weights.write_to(&mut params);
        self.convergence.write_to(&mut params);
        params
    }
}
