//! The unified model contract.
//!
//! Estimators (hyperparameters only) implement [`Estimator`]; fitting one yields
//! a fitted model implementing [`Predictor`]. [`Model`] and [`FittedModel`] are
//! the sum types over the nine supported variants, and [`ModelInstance`] wraps
//! them into a single value that moves from untrained to trained.

use crate::error::{RegressionError, Result};
use crate::iteration::Interrupt;
use crate::linear_model::{
    FittedLasso, FittedLinearRegression, FittedLogisticRegression, FittedPls, FittedRidge, Lasso,
    LinearRegression, LogisticRegression, Pls, Ridge,
};
use crate::metrics;
use crate::nonlinear::{
    Exponential, FittedExponential, FittedLogarithmic, FittedPolynomial, FittedPower, Logarithmic,
    Polynomial, Power,
};
use crate::params::Parameters;
use crate::{Matrix, Vector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An untrained model: hyperparameters plus a fitting procedure.
pub trait Estimator {
    type Fitted: Predictor;

    /// Fit, checking `interrupt` at every outer-iteration boundary.
    fn fit_with(&self, x: &Matrix, y: &Vector, interrupt: &Interrupt) -> Result<Self::Fitted>;

    fn fit(&self, x: &Matrix, y: &Vector) -> Result<Self::Fitted> {
        self.fit_with(x, y, &Interrupt::none())
    }
}

/// A trained model.
pub trait Predictor {
    fn predict(&self, x: &Matrix) -> Result<Vector>;

    /// R² of the predictions on `x` against `y`.
    fn score(&self, x: &Matrix, y: &Vector) -> Result<f64> {
        let y_pred = self.predict(x)?;
        metrics::r2_score(y, &y_pred)
    }

    /// Hyperparameters and learned values, by name.
    fn parameters(&self) -> Parameters;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Ols,
    Ridge,
    Lasso,
    Logistic,
    Pls,
    Polynomial,
    Exponential,
    Logarithmic,
    Power,
}

impl ModelKind {
    pub const ALL: [ModelKind; 9] = [
        ModelKind::Ols,
        ModelKind::Ridge,
        ModelKind::Lasso,
        ModelKind::Logistic,
        ModelKind::Pls,
        ModelKind::Polynomial,
        ModelKind::Exponential,
        ModelKind::Logarithmic,
        ModelKind::Power,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Ols => "ols",
            ModelKind::Ridge => "ridge",
            ModelKind::Lasso => "lasso",
            ModelKind::Logistic => "logistic",
            ModelKind::Pls => "pls",
            ModelKind::Polynomial => "polynomial",
            ModelKind::Exponential => "exponential",
            ModelKind::Logarithmic => "logarithmic",
            ModelKind::Power => "power",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = RegressionError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        ModelKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| RegressionError::UnknownModel(s.to_string()))
    }
}

/// Any untrained model.
#[derive(Clone, Debug, PartialEq)]
pub enum Model {
    Ols(LinearRegression),
    Ridge(Ridge),
    Lasso(Lasso),
    Logistic(LogisticRegression),
    Pls(Pls),
    Polynomial(Polynomial),
    Exponential(Exponential),
    Logarithmic(Logarithmic),
    Power(Power),
}

/// Any fitted model.
#[derive(Clone, Debug, PartialEq)]
pub enum FittedModel {
    Ols(FittedLinearRegression),
    Ridge(FittedRidge),
    Lasso(FittedLasso),
    Logistic(FittedLogisticRegression),
    Pls(FittedPls),
    Polynomial(FittedPolynomial),
    Exponential(FittedExponential),
    Logarithmic(FittedLogarithmic),
    Power(FittedPower),
}

macro_rules! dispatch {
    ($value:expr, $enum:ident, $inner:ident => $body:expr) => {
        match $value {
            $enum::Ols($inner) => $body,
            $enum::Ridge($inner) => $body,
            $enum::Lasso($inner) => $body,
            $enum::Logistic($inner) => $body,
            $enum::Pls($inner) => $body,
            $enum::Polynomial($inner) => $body,
            $enum::Exponential($inner) => $body,
            $enum::Logarithmic($inner) => $body,
            $enum::Power($inner) => $body,
        }
    };
}

impl Model {
    /// The variant with every hyperparameter at its default.
    pub fn default_for(kind: ModelKind) -> Self {
        match kind {
            ModelKind::Ols => Model::Ols(LinearRegression::new()),
            ModelKind::Ridge => Model::Ridge(Ridge::new()),
            ModelKind::Lasso => Model::Lasso(Lasso::new()),
            ModelKind::Logistic => Model::Logistic(LogisticRegression::new()),
            ModelKind::Pls => Model::Pls(Pls::new(2)),
            ModelKind::Polynomial => Model::Polynomial(Polynomial::new(2)),
            ModelKind::Exponential => Model::Exponential(Exponential::new()),
            ModelKind::Logarithmic => Model::Logarithmic(Logarithmic::new()),
            ModelKind::Power => Model::Power(Power::new()),
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Model::Ols(_) => ModelKind::Ols,
            Model::Ridge(_) => ModelKind::Ridge,
            Model::Lasso(_) => ModelKind::Lasso,
            Model::Logistic(_) => ModelKind::Logistic,
            Model::Pls(_) => ModelKind::Pls,
            Model::Polynomial(_) => ModelKind::Polynomial,
            Model::Exponential(_) => ModelKind::Exponential,
            Model::Logarithmic(_) => ModelKind::Logarithmic,
            Model::Power(_) => ModelKind::Power,
        }
    }

    pub fn hyperparameters(&self) -> Parameters {
        dispatch!(self, Model, m => m.hyperparameters())
    }

    /// Build a model of `kind` from named hyperparameters; missing names take
    /// their defaults.
    pub fn from_hyperparameters(kind: ModelKind, params: &Parameters) -> Result<Self> {
        Ok(match kind {
            ModelKind::Ols => Model::Ols(LinearRegression::from_hyperparameters(params)?),
            ModelKind::Ridge => Model::Ridge(Ridge::from_hyperparameters(params)?),
            ModelKind::Lasso => Model::Lasso(Lasso::from_hyperparameters(params)?),
            ModelKind::Logistic => {
                Model::Logistic(LogisticRegression::from_hyperparameters(params)?)
            }
            ModelKind::Pls => Model::Pls(Pls::from_hyperparameters(params)?),
            ModelKind::Polynomial => Model::Polynomial(Polynomial::from_hyperparameters(params)?),
            ModelKind::Exponential => Model::Exponential(Exponential::from_hyperparameters(params)?),
            ModelKind::Logarithmic => Model::Logarithmic(Logarithmic::from_hyperparameters(params)?),
            ModelKind::Power => Model::Power(Power::from_hyperparameters(params)?),
        })
    }

    pub fn fit(&self, x: &Matrix, y: &Vector) -> Result<FittedModel> {
        self.fit_with(x, y, &Interrupt::none())
    }

    pub fn fit_with(&self, x: &Matrix, y: &Vector, interrupt: &Interrupt) -> Result<FittedModel> {
        Ok(match self {
            Model::Ols(m) => FittedModel::Ols(m.fit_with(x, y, interrupt)?),
            Model::Ridge(m) => FittedModel::Ridge(m.fit_with(x, y, interrupt)?),
            Model::Lasso(m) => FittedModel::Lasso(m.fit_with(x, y, interrupt)?),
            Model::Logistic(m) => FittedModel::Logistic(m.fit_with(x, y, interrupt)?),
            Model::Pls(m) => FittedModel::Pls(m.fit_with(x, y, interrupt)?),
            Model::Polynomial(m) => FittedModel::Polynomial(m.fit_with(x, y, interrupt)?),
            Model::Exponential(m) => FittedModel::Exponential(m.fit_with(x, y, interrupt)?),
            Model::Logarithmic(m) => FittedModel::Logarithmic(m.fit_with(x, y, interrupt)?),
            Model::Power(m) => FittedModel::Power(m.fit_with(x, y, interrupt)?),
        })
    }
}

/// Entry that tags exported parameters with the model type they came from.
const MODEL_TYPE: &str = "model_type";

impl FittedModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            FittedModel::Ols(_) => ModelKind::Ols,
            FittedModel::Ridge(_) => ModelKind::Ridge,
            FittedModel::Lasso(_) => ModelKind::Lasso,
            FittedModel::Logistic(_) => ModelKind::Logistic,
            FittedModel::Pls(_) => ModelKind::Pls,
            FittedModel::Polynomial(_) => ModelKind::Polynomial,
            FittedModel::Exponential(_) => ModelKind::Exponential,
            FittedModel::Logarithmic(_) => ModelKind::Logarithmic,
            FittedModel::Power(_) => ModelKind::Power,
        }
    }

    /// The hyperparameters this model was fitted with.
    pub fn estimator(&self) -> Model {
        match self {
            FittedModel::Ols(m) => Model::Ols(m.estimator().clone()),
            FittedModel::Ridge(m) => Model::Ridge(m.estimator().clone()),
            FittedModel::Lasso(m) => Model::Lasso(m.estimator().clone()),
            FittedModel::Logistic(m) => Model::Logistic(m.estimator().clone()),
            FittedModel::Pls(m) => Model::Pls(m.estimator().clone()),
            FittedModel::Polynomial(m) => Model::Polynomial(m.estimator().clone()),
            FittedModel::Exponential(m) => Model::Exponential(m.estimator().clone()),
            FittedModel::Logarithmic(m) => Model::Logarithmic(m.estimator().clone()),
            FittedModel::Power(m) => Model::Power(m.estimator().clone()),
        }
    }

    /// Rebuild a fitted model from the output of [`Predictor::parameters`].
    ///
    /// Parameters exported from a different model type are rejected. A map
    /// without a `model_type` entry is read as belonging to `kind`.
    pub fn from_parameters(kind: ModelKind, params: &Parameters) -> Result<Self> {
        if params.contains(MODEL_TYPE) {
            let exported = params.text(MODEL_TYPE)?;
            if exported.parse::<ModelKind>().ok() != Some(kind) {
                return Err(RegressionError::invalid_parameter(
                    MODEL_TYPE,
                    format!("parameters belong to a {} model, not {}", exported, kind),
                ));
            }
        }

        Ok(match kind {
            ModelKind::Ols => FittedModel::Ols(FittedLinearRegression::from_parameters(params)?),
            ModelKind::Ridge => FittedModel::Ridge(FittedRidge::from_parameters(params)?),
            ModelKind::Lasso => FittedModel::Lasso(FittedLasso::from_parameters(params)?),
            ModelKind::Logistic => {
                FittedModel::Logistic(FittedLogisticRegression::from_parameters(params)?)
            }
            ModelKind::Pls => FittedModel::Pls(FittedPls::from_parameters(params)?),
            ModelKind::Polynomial => {
                FittedModel::Polynomial(FittedPolynomial::from_parameters(params)?)
            }
            ModelKind::Exponential => {
                FittedModel::Exponential(FittedExponential::from_parameters(params)?)
            }
            ModelKind::Logarithmic => {
                FittedModel::Logarithmic(FittedLogarithmic::from_parameters(params)?)
            }
            ModelKind::Power => FittedModel::Power(FittedPower::from_parameters(params)?),
        })
    }
}

impl Predictor for FittedModel {
    fn predict(&self, x: &Matrix) -> Result<Vector> {
        dispatch!(self, FittedModel, m => m.predict(x))
    }

    fn score(&self, x: &Matrix, y: &Vector) -> Result<f64> {
        dispatch!(self, FittedModel, m => m.score(x, y))
    }

    fn parameters(&self) -> Parameters {
        let mut params = dispatch!(self, FittedModel, m => m.parameters());
        params.insert(MODEL_TYPE, self.kind().as_str());
        params
    }
}

/// A model that is either waiting to be fitted or ready to predict.
///
/// Failed operations leave the instance in the state it was in before.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelInstance {
    Untrained(Model),
    Trained(FittedModel),
}

impl ModelInstance {
    pub fn new(model: Model) -> Self {
        ModelInstance::Untrained(model)
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            ModelInstance::Untrained(model) => model.kind(),
            ModelInstance::Trained(fitted) => fitted.kind(),
        }
    }

    pub fn is_trained(&self) -> bool {
        matches!(self, ModelInstance::Trained(_))
    }

    pub fn fitted(&self) -> Option<&FittedModel> {
        match self {
            ModelInstance::Untrained(_) => None,
            ModelInstance::Trained(fitted) => Some(fitted),
        }
    }

    pub fn fit(&mut self, x: &Matrix, y: &Vector) -> Result<()> {
        self.fit_with(x, y, &Interrupt::none())
    }

    /// Refit from scratch with the instance's hyperparameters, replacing any
    /// previously learned parameters on success.
    pub fn fit_with(&mut self, x: &Matrix, y: &Vector, interrupt: &Interrupt) -> Result<()> {
        let model = match self {
            ModelInstance::Untrained(model) => model.clone(),
            ModelInstance::Trained(fitted) => fitted.estimator(),
        };
        let fitted = model.fit_with(x, y, interrupt)?;
        *self = ModelInstance::Trained(fitted);
        Ok(())
    }

    pub fn predict(&self, x: &Matrix) -> Result<Vector> {
        self.fitted()
            .ok_or(RegressionError::NotTrained)?
            .predict(x)
    }

    pub fn score(&self, x: &Matrix, y: &Vector) -> Result<f64> {
        self.fitted()
            .ok_or(RegressionError::NotTrained)?
            .score(x, y)
    }

    /// Learned parameters once trained, hyperparameters before that.
    pub fn get_parameters(&self) -> Parameters {
        match self {
            ModelInstance::Untrained(model) => model.hyperparameters(),
            ModelInstance::Trained(fitted) => fitted.parameters(),
        }
    }

    /// Load previously exported parameters, leaving the instance trained.
    pub fn set_parameters(&mut self, params: &Parameters) -> Result<()> {
        let fitted = FittedModel::from_parameters(self.kind(), params)?;
        *self = ModelInstance::Trained(fitted);
        Ok(())
    }
}

impl From<Model> for ModelInstance {
    fn from(model: Model) -> Self {
        ModelInstance::Untrained(model)
    }
}

impl From<FittedModel> for ModelInstance {
    fn from(fitted: FittedModel) -> Self {
        ModelInstance::Trained(fitted)
    }
}
