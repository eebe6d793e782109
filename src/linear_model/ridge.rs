use super::LinearWeights;
use crate::error::{RegressionError, Result};
use crate::iteration::Interrupt;
use crate::least_squares;
use crate::linalg;
use crate::model::{Estimator, Predictor};
use crate::params::Parameters;
use crate::{Matrix, Vector};

/// L2-regularized least squares.
///
/// `alpha` is added to every diagonal entry of `XᵗX` except the intercept's,
/// and the system is solved by Cholesky factorization. `alpha = 0` reproduces
/// ordinary least squares.
#[derive(Clone, Debug, PartialEq)]
pub struct Ridge {
    alpha: f64,
    fit_intercept: bool,
}

impl Ridge {
    pub fn new() -> Self {
        Self {
            alpha: 1.0,
            fit_intercept: true,
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

    pub fn hyperparameters(&self) -> Parameters {
        Parameters::new()
            .with("alpha", self.alpha)
            .with("fit_intercept", self.fit_intercept)
    }

    pub fn from_hyperparameters(params: &Parameters) -> Result<Self> {
        let alpha = params.scalar_or("alpha", 1.0)?;
        if !(alpha >= 0.0) {
            return Err(RegressionError::invalid_parameter(
                "alpha",
                format!("must be non-negative, got {}", alpha),
            ));
        }
        Ok(Self {
            alpha,
            fit_intercept: params.flag_or("fit_intercept", true)?,
        })
    }

    fn penalty_diagonal(&self, n_params: usize) -> Vector {
        let mut diagonal = Vector::from_elem(n_params, self.alpha);
        if self.fit_intercept && n_params > 0 {
            diagonal[0] = 0.0;
        }
        diagonal
    }
}

impl Default for Ridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Estimator for Ridge {
    type Fitted = FittedRidge;

    fn fit_with(&self, x: &Matrix, y: &Vector, _interrupt: &Interrupt) -> Result<Self::Fitted> {
        linalg::check_fit_input(x, y)?;

        let design = least_squares::design_matrix(x, self.fit_intercept);
        let (xtx, xty) = least_squares::normal_equations(&design, y);
        let penalty = self.penalty_diagonal(xtx.nrows());
        let solution = linalg::solve_spd(&xtx, &xty, Some(&penalty))?;

        let (coefficients, intercept) = least_squares::split_intercept(solution, self.fit_intercept);
        Ok(FittedRidge {
            estimator: self.clone(),
            weights: LinearWeights {
                coefficients,
                intercept,
            },
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FittedRidge {
    estimator: Ridge,
    weights: LinearWeights,
}

impl FittedRidge {
    pub fn estimator(&self) -> &Ridge {
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
            estimator: Ridge::from_hyperparameters(params)?,
            weights: LinearWeights::read_from(params)?,
        })
    }
}

impl Predictor for FittedRidge {
    fn predict(&self, x: &Matrix) -> Result<Vector> {
        self.weights.decision_function(x)
    }

    fn parameters(&self) -> Parameters {
        let mut params = self.estimator.hyperparameters();
        self.weights.write_to(&mut params);
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear_model::LinearRegression;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_ridge_simple() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let model = Ridge::new().alpha(0.0).fit(&x, &y).unwrap();
        let predictions = model.predict(&x).unwrap();

        for (pred, actual) in predictions.iter().zip(y.iter()) {
            assert!((pred - actual).abs() < 1e-6);
        }
    }

    #[test]
    fn test_ridge_zero_alpha_matches_ols() {
        let x = array![
            [1.0, 2.0, 0.5],
            [2.0, 3.0, -0.2],
            [3.0, 1.0, 1.1],
            [4.0, 4.0, 0.3],
            [5.0, 2.0, -0.8],
            [6.0, 5.0, 0.9]
        ];
        let y = array![7.1, 11.9, 12.8, 19.7, 18.9, 27.8];

        let ridge = Ridge::new().alpha(0.0).fit(&x, &y).unwrap();
        let ols = LinearRegression::new().fit(&x, &y).unwrap();

        assert_abs_diff_eq!(ridge.intercept(), ols.intercept(), epsilon = 1e-6);
        for (r, o) in ridge.coefficients().iter().zip(ols.coefficients().iter()) {
            assert_abs_diff_eq!(*r, *o, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_ridge_shrinks_coefficients() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![2.1, 3.9, 6.1, 7.9, 10.2];

        let weak = Ridge::new().alpha(0.1).fit(&x, &y).unwrap();
        let strong = Ridge::new().alpha(100.0).fit(&x, &y).unwrap();

        assert!(strong.coefficients()[0].abs() < weak.coefficients()[0].abs());
        assert!(weak.score(&x, &y).unwrap() > 0.95);
    }

    #[test]
    fn test_ridge_intercept_not_penalized() {
        // A huge penalty flattens the slope; the unpenalized intercept then
        // settles on the target mean.
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![10.0, 11.0, 12.0, 13.0];

        let model = Ridge::new().alpha(1e9).fit(&x, &y).unwrap();
        assert!(model.coefficients()[0].abs() < 1e-6);
        assert_abs_diff_eq!(model.intercept(), 11.5, epsilon = 1e-4);
    }

    #[test]
    fn test_ridge_handles_collinear_features() {
        let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0], [4.0, 8.0]];
        let y = array![1.0, 2.0, 3.0, 4.0];

        let model = Ridge::new().alpha(0.5).fit(&x, &y).unwrap();
        assert!(model.score(&x, &y).unwrap() > 0.9);
    }

    #[test]
    fn test_ridge_without_intercept() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let model = Ridge::new().alpha(0.1).fit_intercept(false).fit(&x, &y).unwrap();

        assert_eq!(model.intercept(), 0.0);
        assert!((model.coefficients()[0] - 2.0).abs() < 0.1);
    }

    #[test]
    #[should_panic(expected = "alpha must be non-negative")]
    fn test_ridge_invalid_alpha() {
        Ridge::new().alpha(-1.0);
    }

    #[test]
    fn test_ridge_invalid_alpha_parameter() {
        let params = Parameters::new().with("alpha", -0.5);
        assert!(matches!(
            Ridge::from_hyperparameters(&params),
            Err(RegressionError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_ridge_dimension_mismatch() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 2.0, 3.0];

        assert!(matches!(
            Ridge::new().fit(&x, &y),
            Err(RegressionError::ShapeMismatch(_))
        ));
    }
}
