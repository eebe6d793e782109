use crate::error::{RegressionError, Result};
use crate::iteration::Interrupt;
use crate::linalg;
use crate::model::{Estimator, Predictor};
use crate::params::Parameters;
use crate::{Matrix, Vector};
use log::{debug, trace};
use ndarray::Axis;

const MAX_INNER_ITERATIONS: usize = 100;
/// Bound on the Euclidean change of the response score `u` between passes.
const INNER_TOLERANCE: f64 = 1e-6;
/// Components whose score vector carries less than this fraction of the
/// (centered) input's total sum of squares are not extracted.
const SCORE_EPSILON: f64 = 1e-12;

/// Partial least squares regression with a single response, fitted by NIPALS.
///
/// Each component is found by alternating power iterations between the input
/// and the response residual, after which both are deflated by the component's
/// scores. Fewer than `n_components` components are kept when the inputs are
/// exhausted earlier.
///
/// With `center(true)` (the default) inputs and response are mean-centered
/// during fit and predict, which gives the model an implicit intercept. With
/// `center(false)` the data is used as is and predictions have no intercept;
/// that is only meaningful for data that is already centered.
#[derive(Clone, Debug, PartialEq)]
pub struct Pls {
    n_components: usize,
    center: bool,
}

impl Pls {
    pub fn new(n_components: usize) -> Self {
        if n_components == 0 {
            panic!("n_components must be at least 1");
        }
        Self {
            n_components,
            center: true,
        }
    }

    pub fn center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    pub fn n_components(&self) -> usize {
        self.n_components
    }

    pub fn hyperparameters(&self) -> Parameters {
        Parameters::new()
            .with("n_components", self.n_components)
            .with("center", self.center)
    }

    pub fn from_hyperparameters(params: &Parameters) -> Result<Self> {
        let n_components = params.integer_or("n_components", 2)?;
        if n_components == 0 {
            return Err(RegressionError::invalid_parameter(
                "n_components",
                "must be at least 1",
            ));
        }
        Ok(Self {
            n_components,
            center: params.flag_or("center", true)?,
        })
    }
}

struct Component {
    weights: Vector,
    scores: Vector,
    loadings: Vector,
    y_loading: f64,
}

/// One NIPALS component of `x` against the response residual `y`.
///
/// Returns `None` when `x` has no direction left that correlates with `y`.
fn extract_component(x: &Matrix, y: &Vector) -> Option<Component> {
    let mut u = y.clone();
    let mut found = None;

    for iteration in 0..MAX_INNER_ITERATIONS {
        let uu = u.dot(&u);
        let mut w = x.t().dot(&u);
        if uu > 0.0 {
            w /= uu;
        }
        let norm = w.dot(&w).sqrt();
        if norm == 0.0 {
            return None;
        }
        w /= norm;

        let t = x.dot(&w);
        let tt = t.dot(&t);
        if tt == 0.0 {
            return None;
        }

        let c = y.dot(&t) / tt;
        let u_next = if c != 0.0 { y / c } else { y.clone() };
        let delta = euclidean_distance(&u_next, &u);
        u = u_next;
        found = Some((w, t, tt));

        if delta < INNER_TOLERANCE {
            trace!("component converged after {} inner iterations", iteration + 1);
            break;
        }
    }

    let (weights, scores, tt) = found?;
    let loadings = x.t().dot(&scores) / tt;
    let y_loading = y.dot(&scores) / tt;
    Some(Component {
        weights,
        scores,
        loadings,
        y_loading,
    })
}

fn euclidean_distance(a: &Vector, b: &Vector) -> f64 {
    let diff = a - b;
    diff.dot(&diff).sqrt()
}

/// `W (PᵗW)⁻¹`, which maps (centered) inputs straight to component scores.
fn x_rotations(weights: &Matrix, loadings: &Matrix) -> Result<Matrix> {
    let k = weights.ncols();
    let ptw = loadings.t().dot(weights);
    let mut inverse = Matrix::zeros((k, k));
    for j in 0..k {
        let mut unit = Vector::zeros(k);
        unit[j] = 1.0;
        inverse.column_mut(j).assign(&linalg::solve(&ptw, &unit)?);
    }
    Ok(weights.dot(&inverse))
}

impl Estimator for Pls {
    type Fitted = FittedPls;

    fn fit_with(&self, x: &Matrix, y: &Vector, interrupt: &Interrupt) -> Result<Self::Fitted> {
        linalg::check_fit_input(x, y)?;

        let (n_samples, n_features) = x.dim();
        let (x_mean, y_mean) = if self.center {
            (
                x.sum_axis(Axis(0)) / n_samples as f64,
                y.sum() / n_samples as f64,
            )
        } else {
            (Vector::zeros(n_features), 0.0)
        };

        let mut x_residual = x - &x_mean;
        let mut y_residual = y - y_mean;
        let total_ss: f64 = x_residual.iter().map(|v| v * v).sum();

        let mut components = Vec::with_capacity(self.n_components);
        for index in 0..self.n_components {
            interrupt.check()?;

            let Some(component) = extract_component(&x_residual, &y_residual) else {
                debug!("no input direction left after {} components", index);
                break;
            };
            let tt = component.scores.dot(&component.scores);
            if tt <= SCORE_EPSILON * total_ss {
                debug!("inputs exhausted after {} components", index);
                break;
            }

            let t_col = component.scores.view().insert_axis(Axis(1));
            let p_row = component.loadings.view().insert_axis(Axis(0));
            x_residual -= &t_col.dot(&p_row);
            y_residual.scaled_add(-component.y_loading, &component.scores);

            trace!(
                "component {}: y loading {:e}, residual y norm {:e}",
                index,
                component.y_loading,
                y_residual.dot(&y_residual).sqrt()
            );
            components.push(component);
        }

        let k = components.len();
        let mut x_weights = Matrix::zeros((n_features, k));
        let mut x_loadings = Matrix::zeros((n_features, k));
        let mut x_scores = Matrix::zeros((n_samples, k));
        let mut y_loadings = Vector::zeros(k);
        for (j, component) in components.into_iter().enumerate() {
            x_weights.column_mut(j).assign(&component.weights);
            x_loadings.column_mut(j).assign(&component.loadings);
            x_scores.column_mut(j).assign(&component.scores);
            y_loadings[j] = component.y_loading;
        }

        debug!(
            "PLS fitted {} of {} requested components",
            k, self.n_components
        );
        FittedPls::assemble(
            self.clone(),
            x_mean,
            y_mean,
            x_weights,
            x_loadings,
            y_loadings,
            x_scores,
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FittedPls {
    estimator: Pls,
    x_mean: Vector,
    y_mean: f64,
    x_weights: Matrix,
    x_loadings: Matrix,
    y_loadings: Vector,
    x_scores: Matrix,
    x_rotations: Matrix,
    coefficients: Vector,
}

impl FittedPls {
    fn assemble(
        estimator: Pls,
        x_mean: Vector,
        y_mean: f64,
        x_weights: Matrix,
        x_loadings: Matrix,
        y_loadings: Vector,
        x_scores: Matrix,
    ) -> Result<Self> {
        let x_rotations = x_rotations(&x_weights, &x_loadings)?;
        let coefficients = x_rotations.dot(&y_loadings);
        Ok(Self {
            estimator,
            x_mean,
            y_mean,
            x_weights,
            x_loadings,
            y_loadings,
            x_scores,
            x_rotations,
            coefficients,
        })
    }

    pub fn estimator(&self) -> &Pls {
        &self.estimator
    }

    /// Number of components actually extracted.
    pub fn n_components(&self) -> usize {
        self.y_loadings.len()
    }

    pub fn x_mean(&self) -> &Vector {
        &self.x_mean
    }

    pub fn y_mean(&self) -> f64 {
        self.y_mean
    }

    pub fn x_weights(&self) -> &Matrix {
        &self.x_weights
    }

    pub fn x_loadings(&self) -> &Matrix {
        &self.x_loadings
    }

    pub fn y_loadings(&self) -> &Vector {
        &self.y_loadings
    }

    /// Scores of the training samples, one column per component.
    pub fn x_scores(&self) -> &Matrix {
        &self.x_scores
    }

    /// Regression coefficients on the (centered) inputs.
    pub fn coefficients(&self) -> &Vector {
        &self.coefficients
    }

    /// Project `x` onto the latent components.
    pub fn transform(&self, x: &Matrix) -> Result<Matrix> {
        linalg::check_n_features(x, self.x_mean.len())?;
        Ok((x - &self.x_mean).dot(&self.x_rotations))
    }

    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        let estimator = Pls::from_hyperparameters(params)?;
        let x_mean = params.vector("x_mean")?;
        let y_loadings = params.vector("y_loadings")?;
        let k = y_loadings.len();

        let x_weights = params.matrix("x_weights", k)?;
        let x_loadings = params.matrix("x_loadings", k)?;
        for (name, matrix) in [("x_weights", &x_weights), ("x_loadings", &x_loadings)] {
            if matrix.nrows() != x_mean.len() {
                return Err(RegressionError::invalid_parameter(
                    name,
                    format!("expected {} rows, found {}", x_mean.len(), matrix.nrows()),
                ));
            }
        }

        Self::assemble(
            estimator,
            x_mean,
            params.scalar_or("y_mean", 0.0)?,
            x_weights,
            x_loadings,
            y_loadings,
            params.matrix("x_scores", k)?,
        )
    }
}

impl Predictor for FittedPls {
    fn predict(&self, x: &Matrix) -> Result<Vector> {
        linalg::check_n_features(x, self.x_mean.len())?;
        Ok((x - &self.x_mean).dot(&self.coefficients) + self.y_mean)
    }

    fn parameters(&self) -> Parameters {
        let mut params = self.estimator.hyperparameters();
        params.insert("x_mean", &self.x_mean);
        params.insert("y_mean", self.y_mean);
        params.insert("x_weights", &self.x_weights);
        params.insert("x_loadings", &self.x_loadings);
        params.insert("y_loadings", &self.y_loadings);
        params.insert("x_scores", &self.x_scores);
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear_model::LinearRegression;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use ndarray_rand::RandomExt;
    use ndarray_rand::rand_distr::Uniform;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    fn noisy_linear_data(seed: u64) -> (Matrix, Vector) {
        let mut rng = StdRng::seed_from_u64(seed);
        let x = Matrix::random_using((40, 3), Uniform::new(-2.0, 2.0), &mut rng);
        let noise = Vector::random_using(40, Uniform::new(-0.3, 0.3), &mut rng);
        let y = x.dot(&array![1.5, -2.0, 0.7]) + 4.0 + noise;
        (x, y)
    }

    #[test]
    fn test_euclidean_distance() {
        assert_eq!(euclidean_distance(&array![0.0, 0.0], &array![3.0, 4.0]), 5.0);
        assert_eq!(euclidean_distance(&array![1.0, -2.0], &array![1.0, -2.0]), 0.0);
    }

    #[test]
    fn test_pls_full_rank_matches_ols() {
        let (x, y) = noisy_linear_data(7);

        let pls = Pls::new(3).fit(&x, &y).unwrap();
        let ols = LinearRegression::new().fit(&x, &y).unwrap();

        assert_eq!(pls.n_components(), 3);
        assert_abs_diff_eq!(
            pls.score(&x, &y).unwrap(),
            ols.score(&x, &y).unwrap(),
            epsilon = 1e-6
        );
        for (p, o) in pls.coefficients().iter().zip(ols.coefficients().iter()) {
            assert_abs_diff_eq!(*p, *o, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_pls_uncentered_matches_ols_without_intercept() {
        let (x, y) = noisy_linear_data(11);

        let pls = Pls::new(3).center(false).fit(&x, &y).unwrap();
        let ols = LinearRegression::with_intercept(false).fit(&x, &y).unwrap();

        assert_eq!(pls.y_mean(), 0.0);
        for (p, o) in pls.coefficients().iter().zip(ols.coefficients().iter()) {
            assert_abs_diff_eq!(*p, *o, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_pls_single_component_fits_reasonably() {
        let (x, y) = noisy_linear_data(3);

        let one = Pls::new(1).fit(&x, &y).unwrap();
        let two = Pls::new(2).fit(&x, &y).unwrap();

        let r2_one = one.score(&x, &y).unwrap();
        let r2_two = two.score(&x, &y).unwrap();
        assert!(r2_one > 0.5);
        assert!(r2_two >= r2_one - 1e-12);
    }

    #[test]
    fn test_pls_transform_reproduces_training_scores() {
        let (x, y) = noisy_linear_data(5);
        let model = Pls::new(3).fit(&x, &y).unwrap();

        let scores = model.transform(&x).unwrap();
        for (a, b) in scores.iter().zip(model.x_scores().iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_pls_stops_when_inputs_are_exhausted() {
        // The second column is a multiple of the first, so only one
        // component carries information.
        let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0], [4.0, 8.0], [5.0, 10.0]];
        let y = array![4.0, 7.0, 10.0, 13.0, 16.0];

        let model = Pls::new(2).fit(&x, &y).unwrap();

        assert_eq!(model.n_components(), 1);
        assert_abs_diff_eq!(model.score(&x, &y).unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pls_constant_target_has_no_components() {
        let x = array![[1.0, 0.5], [2.0, -1.0], [3.0, 2.0]];
        let y = array![5.0, 5.0, 5.0];

        let model = Pls::new(2).fit(&x, &y).unwrap();

        assert_eq!(model.n_components(), 0);
        assert_eq!(model.predict(&x).unwrap(), array![5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_pls_parameters_round_trip() {
        let (x, y) = noisy_linear_data(13);
        let model = Pls::new(2).fit(&x, &y).unwrap();

        let json = serde_json::to_string(&model.parameters()).unwrap();
        let params: Parameters = serde_json::from_str(&json).unwrap();
        let restored = FittedPls::from_parameters(&params).unwrap();

        assert_eq!(restored.n_components(), 2);
        for (a, b) in restored
            .predict(&x)
            .unwrap()
            .iter()
            .zip(model.predict(&x).unwrap().iter())
        {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_pls_interrupted() {
        let (x, y) = noisy_linear_data(1);
        let interrupt = Interrupt::none().with_flag(Arc::new(AtomicBool::new(true)));

        assert!(matches!(
            Pls::new(2).fit_with(&x, &y, &interrupt),
            Err(RegressionError::Interrupted(_))
        ));
    }

    #[test]
    fn test_pls_feature_mismatch() {
        let (x, y) = noisy_linear_data(2);
        let model = Pls::new(2).fit(&x, &y).unwrap();

        assert!(matches!(
            model.predict(&array![[1.0, 2.0]]),
            Err(RegressionError::ShapeMismatch(_))
        ));
    }

    #[test]
    #[should_panic(expected = "n_components must be at least 1")]
    fn test_pls_zero_components() {
        Pls::new(0);
    }

    #[test]
    fn test_pls_zero_components_parameter() {
        let params = Parameters::new().with("n_components", 0usize);
        assert!(matches!(
            Pls::from_hyperparameters(&params),
            Err(RegressionError::InvalidParameter { .. })
        ));
    }
}
