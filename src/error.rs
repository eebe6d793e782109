use thiserror::Error;

/// Errors produced by fitting, predicting and reloading models.
///
/// Every failure leaves the model that was being operated on untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("matrix is singular or nearly singular (no usable pivot in column {column})")]
    SingularMatrix { column: usize },

    #[error("matrix is not positive definite")]
    NotPositiveDefinite,

    #[error("domain violation: {0}")]
    DomainViolation(String),

    #[error("model not fitted; call fit() first")]
    NotTrained,

    #[error("fit interrupted: {0}")]
    Interrupted(String),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("invalid model config: {0}")]
    InvalidConfig(String),

    #[error("unsupported model type `{0}` (supported: ols, ridge, lasso, logistic, pls, polynomial, exponential, logarithmic, power)")]
    UnknownModel(String),
}

impl RegressionError {
    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        RegressionError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegressionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RegressionError::SingularMatrix { column: 2 };
        assert!(err.to_string().contains("column 2"));

        let err = RegressionError::invalid_parameter("alpha", "must be non-negative");
        assert_eq!(
            err.to_string(),
            "invalid parameter `alpha`: must be non-negative"
        );
    }
}
