//! Declarative model construction from JSON.
//!
//! ```rust
//! use regressors::{ModelConfig, ModelKind};
//!
//! let config = ModelConfig::from_json(r#"{"model_type": "ridge", "parameters": {"lambda": 0.5}}"#).unwrap();
//! let model = config.build().unwrap();
//! assert_eq!(model.kind(), ModelKind::Ridge);
//! ```

use crate::error::{RegressionError, Result};
use crate::model::{Model, ModelKind};
use crate::params::{ParameterValue, Parameters};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Alternative spellings accepted for hyperparameter names.
const ALIASES: [(&str, &str); 5] = [
    ("lambda", "alpha"),
    ("num_components", "n_components"),
    ("components", "n_components"),
    ("max_iterations", "max_iter"),
    ("tolerance", "tol"),
];

/// A model type name plus its hyperparameters.
///
/// Parameters that are not given take the model's defaults (`alpha = 1.0`,
/// `n_components = 2`, `degree = 2`, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_type: String,
    #[serde(default)]
    pub parameters: Parameters,
}

impl ModelConfig {
    pub fn new(kind: ModelKind) -> Self {
        Self {
            model_type: kind.to_string(),
            parameters: Parameters::new(),
        }
    }

    pub fn parameter(mut self, name: &str, value: impl Into<ParameterValue>) -> Self {
        self.parameters.insert(name, value);
        self
    }

    /// The configuration that rebuilds `model`.
    pub fn from_model(model: &Model) -> Self {
        Self {
            model_type: model.kind().to_string(),
            parameters: model.hyperparameters(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RegressionError::InvalidConfig(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| RegressionError::InvalidConfig(e.to_string()))
    }

    pub fn kind(&self) -> Result<ModelKind> {
        self.model_type.parse()
    }

    /// Build the untrained model this configuration describes.
    pub fn build(&self) -> Result<Model> {
        let kind = self.kind()?;
        let params = self.normalized_parameters(kind)?;
        Model::from_hyperparameters(kind, &params)
    }

    /// Resolve aliases to canonical names. Names the model does not know are
    /// logged and ignored.
    fn normalized_parameters(&self, kind: ModelKind) -> Result<Parameters> {
        let known = Model::default_for(kind).hyperparameters();
        let mut normalized = Parameters::new();
        let mut given_as: BTreeMap<&str, &str> = BTreeMap::new();

        for (name, value) in self.parameters.iter() {
            let canonical = ALIASES
                .iter()
                .find(|(alias, _)| *alias == name.as_str())
                .map_or(name.as_str(), |(_, canonical)| *canonical);

            if !known.contains(canonical) {
                warn!("ignoring unknown parameter `{}` for {} model", name, kind);
                continue;
            }
            if let Some(earlier) = given_as.insert(canonical, name.as_str()) {
                return Err(RegressionError::invalid_parameter(
                    canonical,
                    format!("given both as `{}` and `{}`", earlier, name),
                ));
            }
            normalized.insert(canonical, value.clone());
        }
        Ok(normalized)
    }
}

impl From<&Model> for ModelConfig {
    fn from(model: &Model) -> Self {
        ModelConfig::from_model(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear_model::{Lasso, Pls, Ridge};
    use crate::nonlinear::Polynomial;

    #[test]
    fn test_defaults() {
        let model = ModelConfig::new(ModelKind::Ridge).build().unwrap();
        assert_eq!(model, Model::Ridge(Ridge::new().alpha(1.0)));

        let model = ModelConfig::new(ModelKind::Pls).build().unwrap();
        assert_eq!(model, Model::Pls(Pls::new(2)));

        let model = ModelConfig::new(ModelKind::Polynomial).build().unwrap();
        assert_eq!(model, Model::Polynomial(Polynomial::new(2)));
    }

    #[test]
    fn test_from_json_with_aliases() {
        let json = r#"{
            "model_type": "lasso",
            "parameters": {"lambda": 0.1, "max_iterations": 500, "tolerance": 1e-6}
        }"#;

        let model = ModelConfig::from_json(json).unwrap().build().unwrap();
        assert_eq!(
            model,
            Model::Lasso(Lasso::new().alpha(0.1).max_iter(500).tolerance(1e-6))
        );

        let json = r#"{"model_type": "pls", "parameters": {"num_components": 3}}"#;
        let model = ModelConfig::from_json(json).unwrap().build().unwrap();
        assert_eq!(model, Model::Pls(Pls::new(3)));
    }

    #[test]
    fn test_parameters_are_optional() {
        let config = ModelConfig::from_json(r#"{"model_type": "power"}"#).unwrap();
        assert!(config.parameters.is_empty());
        assert_eq!(config.build().unwrap().kind(), ModelKind::Power);
    }

    #[test]
    fn test_model_type_is_case_insensitive() {
        let config = ModelConfig::from_json(r#"{"model_type": "OLS"}"#).unwrap();
        assert_eq!(config.kind().unwrap(), ModelKind::Ols);
    }

    #[test]
    fn test_unknown_model_type() {
        let config = ModelConfig::from_json(r#"{"model_type": "random_forest"}"#).unwrap();
        match config.build() {
            Err(err @ RegressionError::UnknownModel(_)) => {
                assert!(err.to_string().contains("random_forest"));
                assert!(err.to_string().contains("polynomial"));
            }
            other => panic!("expected UnknownModel, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_values() {
        let negative = ModelConfig::new(ModelKind::Ridge).parameter("alpha", -1.0);
        assert!(matches!(
            negative.build(),
            Err(RegressionError::InvalidParameter { .. })
        ));

        let mistyped = ModelConfig::new(ModelKind::Polynomial).parameter("degree", true);
        assert!(matches!(
            mistyped.build(),
            Err(RegressionError::InvalidParameter { .. })
        ));

        let duplicated = ModelConfig::new(ModelKind::Ridge)
            .parameter("alpha", 1.0)
            .parameter("lambda", 2.0);
        assert!(matches!(
            duplicated.build(),
            Err(RegressionError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_two_aliases_for_one_parameter() {
        let config = ModelConfig::from_json(
            r#"{"model_type": "pls", "parameters": {"components": 3, "num_components": 5}}"#,
        )
        .unwrap();
        match config.build() {
            Err(RegressionError::InvalidParameter { name, reason }) => {
                assert_eq!(name, "n_components");
                assert!(reason.contains("components"));
                assert!(reason.contains("num_components"));
            }
            other => panic!("expected InvalidParameter, got {:?}", other),
        }

        let single =
            ModelConfig::from_json(r#"{"model_type": "pls", "parameters": {"num_components": 3}}"#)
                .unwrap()
                .build()
                .unwrap();
        assert_eq!(single, Model::Pls(Pls::new(3)));
    }

    #[test]
    fn test_unknown_parameters_are_ignored() {
        let config = ModelConfig::new(ModelKind::Ols).parameter("alpha", 3.0);
        assert_eq!(config.build().unwrap().kind(), ModelKind::Ols);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ModelConfig::from_json("{\"parameters\": {}}"),
            Err(RegressionError::InvalidConfig(_))
        ));
        assert!(matches!(
            ModelConfig::from_json("not json"),
            Err(RegressionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_round_trip_through_json() {
        for kind in ModelKind::ALL {
            let model = Model::default_for(kind);
            let json = ModelConfig::from_model(&model).to_json().unwrap();
            let rebuilt = ModelConfig::from_json(&json).unwrap().build().unwrap();
            assert_eq!(rebuilt, model);
        }
    }
}
