//! Normal-equation least squares, the workhorse behind OLS, ridge and every
//! nonlinear model.

use crate::error::Result;
use crate::linalg;
use crate::{Matrix, Vector};

/// Copy `x` into a fresh design matrix, prepending a constant-one column when
/// `with_intercept` is set.
pub fn design_matrix(x: &Matrix, with_intercept: bool) -> Matrix {
    if !with_intercept {
        return x.clone();
    }

    let mut design = Matrix::ones((x.nrows(), x.ncols() + 1));
    design.slice_mut(ndarray::s![.., 1..]).assign(x);
    design
}

/// Form `XᵗX` and `Xᵗy`.
pub fn normal_equations(design: &Matrix, y: &Vector) -> (Matrix, Vector) {
    let xt = design.t();
    (xt.dot(design), xt.dot(y))
}

/// Split a solution vector into `(coefficients, intercept)`.
pub(crate) fn split_intercept(solution: Vector, with_intercept: bool) -> (Vector, f64) {
    if with_intercept {
        let intercept = solution[0];
        let coefficients = solution.slice(ndarray::s![1..]).to_owned();
        (coefficients, intercept)
    } else {
        (solution, 0.0)
    }
}

/// Ordinary least squares via the normal equations.
///
/// Returns `(coefficients, intercept)`; the intercept is 0.0 when
/// `with_intercept` is false. Collinear features surface as
/// [`crate::RegressionError::SingularMatrix`].
pub fn fit_least_squares(x: &Matrix, y: &Vector, with_intercept: bool) -> Result<(Vector, f64)> {
    linalg::check_fit_input(x, y)?;

    let design = design_matrix(x, with_intercept);
    let (xtx, xty) = normal_equations(&design, y);
    let solution = linalg::solve(&xtx, &xty)?;

    Ok(split_intercept(solution, with_intercept))
}

/// `x · coefficients + intercept`, row by row.
pub fn predict_linear(x: &Matrix, coefficients: &Vector, intercept: f64) -> Result<Vector> {
    linalg::check_n_features(x, coefficients.len())?;
    Ok(x.dot(coefficients) + intercept)
}

/// Coefficient of determination; see [`crate::metrics::r2_score`].
pub fn r_squared(y: &Vector, y_hat: &Vector) -> Result<f64> {
    crate::metrics::r2_score(y, y_hat)
}
