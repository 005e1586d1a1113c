use franke_regression::{
    FitStrategy, FrankeExperiment, Lasso, Ols, OlsSolver, PolynomialBasis, Regressor, Ridge,
    SampleSet, SamplingConfig,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Polynomial fits of Franke's function ===\n");

    let sampling = SamplingConfig::new();
    println!(
        "Sampling: {} points, seed {}, noise σ = {}\n",
        sampling.get_n_samples(),
        sampling.get_seed(),
        sampling.get_noise_scale()
    );

    let strategies: Vec<FitStrategy> = vec![
        Ols::new().into(),
        Ridge::new().lambda(0.005).into(),
        Lasso::new().lambda(0.005).into(),
    ];

    println!(
        "{:<20} {:>12} {:>10} {:>12} {:>14} {:>10}",
        "Model", "Train MSE", "Train R²", "Grid MSE", "Max |error|", "Iterations"
    );
    println!("{}", "-".repeat(83));

    for strategy in strategies {
        let report = FrankeExperiment::new()
            .sampling(sampling.clone())
            .strategy(strategy.clone())
            .grid_size(100)
            .run()?;

        println!(
            "{:<20} {:>12.3e} {:>10.4} {:>12.3e} {:>14.3e} {:>10}",
            strategy.to_string(),
            report.train_mse,
            report.train_r2,
            report.grid_mse,
            report.max_abs_error,
            report.fit.iterations()
        );
    }

    println!("\n=== Ridge shrinkage path (degree 5) ===");
    let samples = SampleSet::generate(&sampling)?;
    let basis = PolynomialBasis::default();
    let design = samples.design_matrix(&basis)?;

    println!("{:<10} {:>12} {:>10}", "Lambda", "‖β‖₂", "R²");
    println!("{}", "-".repeat(34));
    for lambda in [0.0, 1e-4, 1e-3, 1e-2, 1e-1, 1.0] {
        let fit = Ridge::new().lambda(lambda).fit(&design, &samples.z)?;
        let r2 = fit.score(&design, &samples.z)?;
        println!("{:<10.0e} {:>12.4} {:>10.4}", lambda, fit.l2_norm(), r2);
    }

    println!("\n=== Degree 5 on three collinear points ===");
    let corner = SampleSet::new(
        vec![0.0, 0.5, 1.0].into(),
        vec![0.0, 0.5, 1.0].into(),
        vec![1.0, 1.0, 1.0].into(),
    )?;
    let design = corner.design_matrix(&basis)?;
    match Ols::new().fit(&design, &corner.z) {
        Ok(_) => println!("strict OLS unexpectedly succeeded"),
        Err(e) => println!("strict OLS: {}", e),
    }
    let fit = Ols::new()
        .solver(OlsSolver::PseudoInverse)
        .fit(&design, &corner.z)?;
    println!(
        "minimum-norm OLS: intercept {:.6}, largest other |β| {:.2e}",
        fit.intercept(),
        fit.coefficients()
            .iter()
            .skip(1)
            .fold(0.0f64, |acc, b| acc.max(b.abs()))
    );

    Ok(())
}
