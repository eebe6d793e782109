use ndarray::array;
use regressors::{ModelConfig, ModelInstance, Parameters};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0]];
    let y = array![2.1, 3.9, 6.2, 7.8, 10.1, 12.0];

    // Step 1: Build models from JSON configs
    let configs = [
        r#"{"model_type": "ols"}"#,
        r#"{"model_type": "ridge", "parameters": {"lambda": 0.5}}"#,
        r#"{"model_type": "lasso", "parameters": {"alpha": 0.1, "max_iterations": 500}}"#,
        r#"{"model_type": "pls", "parameters": {"num_components": 1}}"#,
        r#"{"model_type": "polynomial", "parameters": {"degree": 2}}"#,
        r#"{"model_type": "power"}"#,
    ];

    for json in configs {
        let config = ModelConfig::from_json(json)?;
        let mut instance = ModelInstance::new(config.build()?);

        // Step 2: Train and score
        instance.fit(&x, &y)?;
        println!("{:<11} R² = {:.4}", instance.kind(), instance.score(&x, &y)?);

        // Step 3: Export the learned parameters and reload them
        let exported = serde_json::to_string(&instance.get_parameters())?;
        let params: Parameters = serde_json::from_str(&exported)?;
        let mut reloaded = ModelInstance::new(config.build()?);
        reloaded.set_parameters(&params)?;
        println!("            reloaded prediction at x = 7: {:.4}", reloaded.predict(&array![[7.0]])?[0]);
    }

    // Step 4: Unknown model types are reported with the supported list
    let config = ModelConfig::from_json(r#"{"model_type": "random_forest"}"#)?;
    if let Err(err) = config.build() {
        println!("{}", err);
    }

    Ok(())
}
