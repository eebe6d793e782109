use crate::error::{RegressionError, Result};
use crate::Vector;
use serde::{Deserialize, Serialize};

/// The regression metrics reported together by [`evaluate`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub r2: f64,
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
}

fn check_lengths(y_true: &Vector, y_pred: &Vector) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(RegressionError::ShapeMismatch(format!(
            "y_true ({}) and y_pred ({}) must have the same length",
            y_true.len(),
            y_pred.len()
        )));
    }
    if y_true.is_empty() {
        return Err(RegressionError::ShapeMismatch(
            "metrics need at least one sample".to_string(),
        ));
    }
    Ok(())
}

pub fn mean_squared_error(y_true: &Vector, y_pred: &Vector) -> Result<f64> {
    check_lengths(y_true, y_pred)?;

    let diff = y_true - y_pred;
    Ok(diff.mapv(|x| x * x).sum() / y_true.len() as f64)
}

pub fn root_mean_squared_error(y_true: &Vector, y_pred: &Vector) -> Result<f64> {
    Ok(mean_squared_error(y_true, y_pred)?.sqrt())
}

pub fn mean_absolute_error(y_true: &Vector, y_pred: &Vector) -> Result<f64> {
    check_lengths(y_true, y_pred)?;

    let diff = y_true - y_pred;
    Ok(diff.mapv(|x| x.abs()).sum() / y_true.len() as f64)
}

/// Coefficient of determination, `1 - SSE / SST`.
///
/// A constant target (`SST == 0`) scores 1.0 regardless of the predictions.
pub fn r2_score(y_true: &Vector, y_pred: &Vector) -> Result<f64> {
    check_lengths(y_true, y_pred)?;

    let y_mean = y_true.sum() / y_true.len() as f64;
    let ss_res = (y_true - y_pred).mapv(|x| x * x).sum();
    let ss_tot = y_true.mapv(|x| (x - y_mean) * (x - y_mean)).sum();

    if ss_tot == 0.0 {
        return Ok(1.0);
    }

    Ok(1.0 - ss_res / ss_tot)
}

/// Fraction of labels matched exactly by the predicted classes.
pub fn accuracy_score(y_true: &Vector, y_pred: &Vector) -> Result<f64> {
    check_lengths(y_true, y_pred)?;

    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(actual, pred)| actual == pred)
        .count();
    Ok(correct as f64 / y_true.len() as f64)
}

pub fn evaluate(y_true: &Vector, y_pred: &Vector) -> Result<RegressionMetrics> {
    let mse = mean_squared_error(y_true, y_pred)?;
    Ok(RegressionMetrics {
        r2: r2_score(y_true, y_pred)?,
        mse,
        rmse: mse.sqrt(),
        mae: mean_absolute_error(y_true, y_pred)?,
    })
}
