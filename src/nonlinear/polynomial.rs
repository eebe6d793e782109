use super::single_feature;
use crate::error::{RegressionError, Result};
use crate::iteration::Interrupt;
use crate::least_squares;
use crate::linalg;
use crate::model::{Estimator, Predictor};
use crate::params::Parameters;
use crate::{Matrix, Vector};
use ndarray::ArrayView1;

/// Polynomial regression of a given degree on a single feature.
///
/// The feature is expanded into the powers `x⁰ ..= x^degree` and solved as
/// ordinary least squares; the `x⁰` column plays the role of the intercept.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial {
    degree: usize,
}

impl Polynomial {
    pub fn new(degree: usize) -> Self {
        Self { degree }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn hyperparameters(&self) -> Parameters {
        Parameters::new().with("degree", self.degree)
    }

    pub fn from_hyperparameters(params: &Parameters) -> Result<Self> {
        Ok(Self {
            degree: params.integer_or("degree", 2)?,
        })
    }
}

impl Default for Polynomial {
    fn default() -> Self {
        Self::new(2)
    }
}

/// Vandermonde expansion: column `j` holds `xʲ`.
fn expand(x: ArrayView1<'_, f64>, degree: usize) -> Matrix {
    let mut design = Matrix::ones((x.len(), degree + 1));
    for j in 1..=degree {
        let previous = design.column(j - 1).to_owned();
        design.column_mut(j).assign(&(&previous * &x));
    }
    design
}

impl Estimator for Polynomial {
    type Fitted = FittedPolynomial;

    fn fit_with(&self, x: &Matrix, y: &Vector, _interrupt: &Interrupt) -> Result<Self::Fitted> {
        linalg::check_fit_input(x, y)?;
        let feature = single_feature(x)?;

        let design = expand(feature, self.degree);
        let (coefficients, _) = least_squares::fit_least_squares(&design, y, false)?;

        Ok(FittedPolynomial {
            estimator: self.clone(),
            coefficients,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FittedPolynomial {
    estimator: Polynomial,
    coefficients: Vector,
}

impl FittedPolynomial {
    pub fn estimator(&self) -> &Polynomial {
        &self.estimator
    }

    /// Coefficients in ascending powers, starting with the constant term.
    pub fn coefficients(&self) -> &Vector {
        &self.coefficients
    }

    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        let estimator = Polynomial::from_hyperparameters(params)?;
        let coefficients = params.vector("coefficients")?;
        if coefficients.len() != estimator.degree + 1 {
            return Err(RegressionError::invalid_parameter(
                "coefficients",
                format!(
                    "degree {} needs {} coefficients, found {}",
                    estimator.degree,
                    estimator.degree + 1,
                    coefficients.len()
                ),
            ));
        }
        Ok(Self {
            estimator,
            coefficients,
        })
    }
}

impl Predictor for FittedPolynomial {
    fn predict(&self, x: &Matrix) -> Result<Vector> {
        let feature = single_feature(x)?;
        // Horner's scheme, highest power first.
        Ok(feature.mapv(|v| {
            self.coefficients
                .iter()
                .rev()
                .fold(0.0, |acc, c| acc * v + c)
        }))
    }

    fn parameters(&self) -> Parameters {
        self.estimator
            .hyperparameters()
            .with("coefficients", &self.coefficients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_expand() {
        let x = array![2.0, -1.0];
        assert_eq!(
            expand(x.view(), 3),
            array![[1.0, 2.0, 4.0, 8.0], [1.0, -1.0, 1.0, -1.0]]
        );
        assert_eq!(expand(x.view(), 0), array![[1.0], [1.0]]);
    }

    #[test]
    fn test_polynomial_exact_quadratic() {
        // y = 1 - 2x + 0.5x²
        let x = array![[-2.0], [-1.0], [0.0], [1.0], [2.0], [3.0]];
        let y = x.column(0).mapv(|v| 1.0 - 2.0 * v + 0.5 * v * v);

        let model = Polynomial::new(2).fit(&x, &y).unwrap();

        let expected = [1.0, -2.0, 0.5];
        for (c, e) in model.coefficients().iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*c, *e, epsilon = 1e-9);
        }
        assert_abs_diff_eq!(model.score(&x, &y).unwrap(), 1.0, epsilon = 1e-9);

        let predictions = model.predict(&array![[4.0]]).unwrap();
        assert_abs_diff_eq!(predictions[0], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_polynomial_degree_zero_is_mean() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![1.0, 2.0, 6.0];

        let model = Polynomial::new(0).fit(&x, &y).unwrap();
        assert_abs_diff_eq!(model.coefficients()[0], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_polynomial_too_few_points() {
        // Three distinct points cannot determine a cubic.
        let x = array![[0.0], [1.0], [2.0]];
        let y = array![0.0, 1.0, 4.0];

        assert!(matches!(
            Polynomial::new(3).fit(&x, &y),
            Err(RegressionError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn test_polynomial_requires_single_feature() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let y = array![1.0, 2.0];

        assert!(matches!(
            Polynomial::new(2).fit(&x, &y),
            Err(RegressionError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_polynomial_parameters_round_trip() {
        let x = array![[0.0], [1.0], [2.0], [3.0], [4.0]];
        let y = array![1.0, 2.5, 2.0, 4.5, 9.0];
        let model = Polynomial::new(3).fit(&x, &y).unwrap();

        let restored = FittedPolynomial::from_parameters(&model.parameters()).unwrap();
        assert_eq!(restored, model);

        let truncated = Parameters::new()
            .with("degree", 3usize)
            .with("coefficients", &array![1.0, 2.0]);
        assert!(matches!(
            FittedPolynomial::from_parameters(&truncated),
            Err(RegressionError::InvalidParameter { .. })
        ));
    }
}
