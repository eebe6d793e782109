//! Name-to-value parameter maps for exporting and reloading fitted models.
//!
//! A [`Parameters`] map holds both the hyperparameters and the learned values of
//! a fitted model, so that `from_parameters(model.parameters())` rebuilds a
//! model with identical predictions. The map serializes as a plain JSON object.

use crate::error::{RegressionError, Result};
use crate::{Matrix, Vector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Flag(bool),
    Integer(u64),
    Scalar(f64),
    Vector(Vec<f64>),
    Matrix(Vec<Vec<f64>>),
    Text(String),
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Flag(value)
    }
}

impl From<usize> for ParameterValue {
    fn from(value: usize) -> Self {
        ParameterValue::Integer(value as u64)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Scalar(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Text(value.to_string())
    }
}

impl From<&Vector> for ParameterValue {
    fn from(value: &Vector) -> Self {
        ParameterValue::Vector(value.to_vec())
    }
}

impl From<&Matrix> for ParameterValue {
    fn from(value: &Matrix) -> Self {
        ParameterValue::Matrix(value.outer_iter().map(|row| row.to_vec()).collect())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, ParameterValue>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<ParameterValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<ParameterValue>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParameterValue)> {
        self.0.iter()
    }

    fn require(&self, name: &str) -> Result<&ParameterValue> {
        self.0
            .get(name)
            .ok_or_else(|| RegressionError::invalid_parameter(name, "missing"))
    }

    /// A floating-point value; integers are accepted and widened.
    pub fn scalar(&self, name: &str) -> Result<f64> {
        match self.require(name)? {
            ParameterValue::Scalar(value) => Ok(*value),
            ParameterValue::Integer(value) => Ok(*value as f64),
            other => Err(type_error(name, "a number", other)),
        }
    }

    pub fn scalar_or(&self, name: &str, default: f64) -> Result<f64> {
        if self.contains(name) {
            self.scalar(name)
        } else {
            Ok(default)
        }
    }

    /// A non-negative integer; floats with no fractional part are accepted.
    pub fn integer(&self, name: &str) -> Result<usize> {
        match self.require(name)? {
            ParameterValue::Integer(value) => Ok(*value as usize),
            ParameterValue::Scalar(value) if *value >= 0.0 && value.fract() == 0.0 => {
                Ok(*value as usize)
            }
            other => Err(type_error(name, "a non-negative integer", other)),
        }
    }

    pub fn integer_or(&self, name: &str, default: usize) -> Result<usize> {
        if self.contains(name) {
            self.integer(name)
        } else {
            Ok(default)
        }
    }

    pub fn flag(&self, name: &str) -> Result<bool> {
        match self.require(name)? {
            ParameterValue::Flag(value) => Ok(*value),
            other => Err(type_error(name, "a boolean", other)),
        }
    }

    pub fn flag_or(&self, name: &str, default: bool) -> Result<bool> {
        if self.contains(name) {
            self.flag(name)
        } else {
            Ok(default)
        }
    }

    pub fn text(&self, name: &str) -> Result<&str> {
        match self.require(name)? {
            ParameterValue::Text(value) => Ok(value.as_str()),
            other => Err(type_error(name, "a string", other)),
        }
    }

    pub fn vector(&self, name: &str) -> Result<Vector> {
        match self.require(name)? {
            ParameterValue::Vector(values) => Ok(Vector::from(values.clone())),
            other => Err(type_error(name, "a list of numbers", other)),
        }
    }

    /// A dense matrix given as a list of equally long rows.
    ///
    /// `ncols` is needed to shape an empty row list.
    pub fn matrix(&self, name: &str, ncols: usize) -> Result<Matrix> {
        let rows = match self.require(name)? {
            ParameterValue::Matrix(rows) => rows,
            // An empty list is ambiguous between the two shapes.
            ParameterValue::Vector(values) if values.is_empty() => {
                return Ok(Matrix::zeros((0, ncols)));
            }
            other => return Err(type_error(name, "a list of rows", other)),
        };

        let mut matrix = Matrix::zeros((rows.len(), ncols));
        for (i, row) in rows.iter().enumerate() {
            if row.len() != ncols {
                return Err(RegressionError::invalid_parameter(
                    name,
                    format!("row {} has {} entries, expected {}", i, row.len(), ncols),
                ));
            }
            for (j, value) in row.iter().enumerate() {
                matrix[(i, j)] = *value;
            }
        }
        Ok(matrix)
    }
}

fn type_error(name: &str, expected: &str, found: &ParameterValue) -> RegressionError {
    let found = match found {
        ParameterValue::Flag(_) => "a boolean",
        ParameterValue::Integer(_) => "an integer",
        ParameterValue::Scalar(_) => "a number",
        ParameterValue::Vector(_) => "a list",
        ParameterValue::Matrix(_) => "a list of rows",
        ParameterValue::Text(_) => "a string",
    };
    RegressionError::invalid_parameter(name, format!("expected {}, found {}", expected, found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_typed_accessors() {
        let params = Parameters::new()
            .with("intercept", 1.5)
            .with("degree", 3usize)
            .with("fit_intercept", true)
            .with("coefficients", &array![1.0, 2.0])
            .with("weights", &array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);

        assert_eq!(params.scalar("intercept").unwrap(), 1.5);
        assert_eq!(params.scalar("degree").unwrap(), 3.0);
        assert_eq!(params.integer("degree").unwrap(), 3);
        assert!(params.flag("fit_intercept").unwrap());
        assert_eq!(params.vector("coefficients").unwrap(), array![1.0, 2.0]);
        assert_eq!(
            params.matrix("weights", 2).unwrap(),
            array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]
        );
    }

    #[test]
    fn test_missing_and_mistyped() {
        let params = Parameters::new().with("intercept", 1.5);

        assert!(matches!(
            params.scalar("lambda"),
            Err(RegressionError::InvalidParameter { .. })
        ));
        assert!(matches!(
            params.vector("intercept"),
            Err(RegressionError::InvalidParameter { .. })
        ));
        assert!(params.integer("intercept").is_err());
        assert_eq!(params.scalar_or("lambda", 0.5).unwrap(), 0.5);
        assert_eq!(params.integer_or("max_iter", 1000).unwrap(), 1000);
        assert!(!params.flag_or("center", false).unwrap());
    }

    #[test]
    fn test_ragged_matrix_rejected() {
        let mut params = Parameters::new();
        params.insert(
            "weights",
            ParameterValue::Matrix(vec![vec![1.0, 2.0], vec![3.0]]),
        );

        assert!(params.matrix("weights", 2).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let params = Parameters::new()
            .with("a", 2.0)
            .with("b", -0.25)
            .with("degree", 2usize)
            .with("center", false)
            .with("model_type", "power")
            .with("coefficients", &array![0.5, 1.0, 1.5]);

        let json = serde_json::to_string(&params).unwrap();
        let restored: Parameters = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.scalar("a").unwrap(), 2.0);
        assert_eq!(restored.scalar("b").unwrap(), -0.25);
        assert_eq!(restored.integer("degree").unwrap(), 2);
        assert!(!restored.flag("center").unwrap());
        assert_eq!(restored.text("model_type").unwrap(), "power");
        assert!(restored.scalar("model_type").is_err());
        assert_eq!(restored.vector("coefficients").unwrap(), array![0.5, 1.0, 1.5]);
    }
}
