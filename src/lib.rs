//! Supervised regression solvers behind one model abstraction.
//!
//! Linear models (OLS, ridge, lasso, logistic, PLS) and single-feature curve
//! fits (polynomial, exponential, logarithmic, power) all follow the same
//! shape: an [`Estimator`] holds hyperparameters, `fit` returns a fitted model
//! implementing [`Predictor`]. [`Model`], [`FittedModel`] and [`ModelInstance`]
//! tie the nine variants together for callers that pick a model at runtime,
//! and [`ModelConfig`] builds one from JSON.
//!
//! The library logs through the `log` facade and never installs a logger.

pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod config;
pub mod error;
pub mod iteration;
pub mod least_squares;
pub mod linalg;
pub mod linear_model;
pub mod metrics;
pub mod model;
pub mod nonlinear;
pub mod params;

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;

pub use config::ModelConfig;
pub use error::{RegressionError, Result};
pub use iteration::{Convergence, Interrupt};
pub use linear_model::{
    FittedLasso, FittedLinearRegression, FittedLogisticRegression, FittedPls, FittedRidge, Lasso,
    LinearRegression, LogisticRegression, Pls, Ridge,
};
pub use metrics::RegressionMetrics;
pub use model::{Estimator, FittedModel, Model, ModelInstance, ModelKind, Predictor};
pub use nonlinear::{
    Exponential, FittedExponential, FittedLogarithmic, FittedPolynomial, FittedPower, Logarithmic,
    Polynomial, Power,
};
pub use params::{ParameterValue, Parameters};
