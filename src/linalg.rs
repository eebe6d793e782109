//! Dense linear-system solvers shared by every estimator.
//!
//! Two entry points:
//! - [`solve`]: Gaussian elimination with partial pivoting for general square systems.
//! - [`solve_spd`]: Cholesky factorization for symmetric positive-definite systems,
//!   with an optional per-row diagonal term (used for ridge penalties).

use crate::error::{RegressionError, Result};
use crate::{Matrix, Vector};
use log::{debug, warn};

/// A pivot whose magnitude does not exceed this is treated as zero.
pub const PIVOT_EPSILON: f64 = 1e-10;

/// Diagonal jitter added before the single Cholesky retry.
pub const SPD_JITTER: f64 = 1e-10;

/// Solve `a * x = b` by Gaussian elimination with partial pivoting.
///
/// At each column the remaining row with the largest absolute entry is swapped
/// into place; ties keep the first such row. Fails with
/// [`RegressionError::SingularMatrix`] when no pivot exceeds [`PIVOT_EPSILON`].
pub fn solve(a: &Matrix, b: &Vector) -> Result<Vector> {
    check_square_system(a, b)?;
    let n = a.nrows();

    let mut aug = Matrix::zeros((n, n + 1));
    aug.slice_mut(ndarray::s![.., ..n]).assign(a);
    aug.column_mut(n).assign(b);

    for i in 0..n {
        let mut max_row = i;
        for k in (i + 1)..n {
            if aug[(k, i)].abs() > aug[(max_row, i)].abs() {
                max_row = k;
            }
        }

        // NaN pivots are rejected too.
        if !(aug[(max_row, i)].abs() > PIVOT_EPSILON) {
            debug!("elimination found no usable pivot in column {}", i);
            return Err(RegressionError::SingularMatrix { column: i });
        }

        if max_row != i {
            for j in 0..=n {
                aug.swap((i, j), (max_row, j));
            }
        }

        for k in (i + 1)..n {
            let factor = aug[(k, i)] / aug[(i, i)];
            if factor == 0.0 {
                continue;
            }
            for j in i..=n {
                aug[(k, j)] -= factor * aug[(i, j)];
            }
        }
    }

    let mut x = Vector::zeros(n);
    for i in (0..n).rev() {
        x[i] = aug[(i, n)];
        for j in (i + 1)..n {
            x[i] -= aug[(i, j)] * x[j];
        }
        x[i] /= aug[(i, i)];
    }

    Ok(x)
}

/// Solve the symmetric positive-definite system `(a + diag(ridge_diag)) * x = b`.
///
/// Only the lower triangle of `a` is read. If the Cholesky factorization fails,
/// it is retried once with [`SPD_JITTER`] added to every diagonal entry before
/// giving up with [`RegressionError::NotPositiveDefinite`].
pub fn solve_spd(a: &Matrix, b: &Vector, ridge_diag: Option<&Vector>) -> Result<Vector> {
    check_square_system(a, b)?;
    let n = a.nrows();

    let mut work = a.clone();
    if let Some(ridge) = ridge_diag {
        if ridge.len() != n {
            return Err(RegressionError::ShapeMismatch(format!(
                "diagonal term has length {} but the system has {} rows",
                ridge.len(),
                n
            )));
        }
        for i in 0..n {
            work[(i, i)] += ridge[i];
        }
    }

    let l = match cholesky(&work) {
        Some(l) => l,
        None => {
            warn!(
                "cholesky factorization failed; retrying with diagonal jitter {:e}",
                SPD_JITTER
            );
            for i in 0..n {
                work[(i, i)] += SPD_JITTER;
            }
            cholesky(&work).ok_or(RegressionError::NotPositiveDefinite)?
        }
    };

    // L z = b
    let mut z = Vector::zeros(n);
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[(i, k)] * z[k];
        }
        z[i] = sum / l[(i, i)];
    }

    // L^T x = z
    let mut x = Vector::zeros(n);
    for i in (0..n).rev() {
        let mut sum = z[i];
        for k in (i + 1)..n {
            sum -= l[(k, i)] * x[k];
        }
        x[i] = sum / l[(i, i)];
    }

    Ok(x)
}

/// Lower-triangular Cholesky factor, or `None` if a non-positive pivot shows up.
fn cholesky(a: &Matrix) -> Option<Matrix> {
    let n = a.nrows();
    let mut l = Matrix::zeros((n, n));

    for j in 0..n {
        let mut diag = a[(j, j)];
        for k in 0..j {
            diag -= l[(j, k)] * l[(j, k)];
        }
        if !(diag > 0.0) || !diag.is_finite() {
            return None;
        }
        let l_jj = diag.sqrt();
        l[(j, j)] = l_jj;

        for i in (j + 1)..n {
            let mut sum = a[(i, j)];
            for k in 0..j {
                sum -= l[(i, k)] * l[(j, k)];
            }
            l[(i, j)] = sum / l_jj;
        }
    }

    Some(l)
}

fn check_square_system(a: &Matrix, b: &Vector) -> Result<()> {
    if a.nrows() != a.ncols() {
        return Err(RegressionError::ShapeMismatch(format!(
            "coefficient matrix must be square, got {}x{}",
            a.nrows(),
            a.ncols()
        )));
    }
    if a.nrows() != b.len() {
        return Err(RegressionError::ShapeMismatch(format!(
            "right-hand side has length {} but the matrix has {} rows",
            b.len(),
            a.nrows()
        )));
    }
    Ok(())
}

/// Shape checks run before any fit touches the data.
pub(crate) fn check_fit_input(x: &Matrix, y: &Vector) -> Result<()> {
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(RegressionError::ShapeMismatch(format!(
            "X must have at least one sample and one feature, got {}x{}",
            x.nrows(),
            x.ncols()
        )));
    }
    if x.nrows() != y.len() {
        return Err(RegressionError::ShapeMismatch(format!(
            "Number of samples in X ({}) and y ({}) must match",
            x.nrows(),
            y.len()
        )));
    }
    Ok(())
}

pub(crate) fn check_n_features(x: &Matrix, expected: usize) -> Result<()> {
    if x.ncols() != expected {
        return Err(RegressionError::ShapeMismatch(format!(
            "Number of features in X ({}) doesn't match training data ({})",
            x.ncols(),
            expected
        )));
    }
    Ok(())
}
