use ndarray::Array1;
use regressors::{
    Estimator, Exponential, Logarithmic, Matrix, Polynomial, Power, Predictor, RegressionError,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Step 1: A positive feature grid
    let grid = Array1::linspace(0.5, 5.0, 10);
    let x: Matrix = grid.clone().insert_axis(ndarray::Axis(1));

    // Step 2: Polynomial
    let y = grid.mapv(|v| 2.0 - v + 0.3 * v * v);
    let polynomial = Polynomial::new(2).fit(&x, &y)?;
    println!(
        "Polynomial: coefficients = {}, R² = {:.6}",
        polynomial.coefficients(),
        polynomial.score(&x, &y)?
    );

    // Step 3: Exponential
    let y = grid.mapv(|v| 1.5 * (0.6 * v).exp());
    let exponential = Exponential::new().fit(&x, &y)?;
    println!(
        "Exponential: y = {:.4}·exp({:.4}·x)",
        exponential.a(),
        exponential.b()
    );

    // Step 4: Logarithmic
    let y = grid.mapv(|v| 3.0 * v.ln() + 1.0);
    let logarithmic = Logarithmic::new().fit(&x, &y)?;
    println!(
        "Logarithmic: y = {:.4}·ln(x) + {:.4}",
        logarithmic.a(),
        logarithmic.b()
    );

    // Step 5: Power
    let y = grid.mapv(|v| 0.8 * v.powf(2.5));
    let power = Power::new().fit(&x, &y)?;
    println!("Power: y = {:.4}·x^{:.4}", power.a(), power.b());

    // Step 6: Out-of-domain input is an error, not a crash
    let negative = ndarray::array![[-1.0]];
    match power.predict(&negative) {
        Err(RegressionError::DomainViolation(message)) => {
            println!("Power rejected x = -1: {}", message)
        }
        other => println!("unexpected result: {:?}", other),
    }

    Ok(())
}
