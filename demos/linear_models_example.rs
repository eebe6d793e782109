use ndarray::array;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::SeedableRng;
use rand::rngs::StdRng;
use regressors::metrics;
use regressors::{
    Estimator, Lasso, LinearRegression, LogisticRegression, Matrix, Pls, Predictor, Ridge, Vector,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Step 1: Synthetic data where only 3 of 8 features matter
    let mut rng = StdRng::seed_from_u64(42);
    let x = Matrix::random_using((200, 8), Uniform::new(-1.0, 1.0), &mut rng);
    let noise = Vector::random_using(200, Uniform::new(-0.1, 0.1), &mut rng);
    let true_coefficients = array![3.0, 0.0, -2.0, 0.0, 0.0, 1.5, 0.0, 0.0];
    let y = x.dot(&true_coefficients) + 0.5 + noise;
    println!("Dataset: {} samples, {} features", x.nrows(), x.ncols());

    // Step 2: Ordinary least squares
    let ols = LinearRegression::new().fit(&x, &y)?;
    println!("OLS:   R² = {:.4}, intercept = {:.4}", ols.score(&x, &y)?, ols.intercept());

    // Step 3: Ridge
    let ridge = Ridge::new().alpha(10.0).fit(&x, &y)?;
    println!("Ridge: R² = {:.4}", ridge.score(&x, &y)?);

    // Step 4: Lasso, watching the support shrink
    for alpha in [0.01, 0.1, 0.5, 1.0] {
        let lasso = Lasso::new().alpha(alpha).fit(&x, &y)?;
        println!(
            "Lasso alpha={:<4}: R² = {:.4}, zero coefficients = {}, iterations = {} (converged: {})",
            alpha,
            lasso.score(&x, &y)?,
            lasso.n_zero_coefficients(),
            lasso.n_iter(),
            lasso.converged()
        );
    }

    // Step 5: PLS with fewer components than features
    for n_components in [1, 2, 3, 8] {
        let pls = Pls::new(n_components).fit(&x, &y)?;
        println!(
            "PLS k={}: R² = {:.4} ({} components extracted)",
            n_components,
            pls.score(&x, &y)?,
            pls.n_components()
        );
    }

    // Step 6: Logistic regression on the sign of the target
    let labels = y.mapv(|v| if v > 0.5 { 1.0 } else { 0.0 });
    let logistic = LogisticRegression::new()
        .learning_rate(0.5)
        .max_iter(2000)
        .fit(&x, &labels)?;
    let classes = logistic.predict_class(&x, 0.5)?;
    println!(
        "Logistic: accuracy = {:.4}",
        metrics::accuracy_score(&labels, &classes)?
    );

    // Step 7: Full metrics report for the OLS fit
    let report = metrics::evaluate(&y, &ols.predict(&x)?)?;
    println!("OLS metrics: {}", serde_json::to_string(&report)?);

    Ok(())
}
