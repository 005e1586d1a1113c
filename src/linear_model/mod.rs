//! Closed-form polynomial regression solvers.
//!
//! Every strategy implements [`Regressor`] and returns an immutable [`Fit`]:
//! - `Ols`: ordinary least squares through the normal equations
//! - `Ridge`: L2-penalised least squares
//! - `Lasso`: L1-penalised least squares by coordinate descent
//!
//! [`FitStrategy`] wraps the three so callers can pick one at runtime.
//!
//! # Examples
//!
//! ```rust
//! use franke_regression::{FitStrategy, Lasso, Ols, Regressor};
//! use ndarray::array;
//!
//! let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 3.0]];
//! let f = array![1.0, 3.0, 5.0, 7.0];
//!
//! let fit = FitStrategy::Ols(Ols::new()).fit(&x, &f).unwrap();
//! assert!((fit.coefficients()[1] - 2.0).abs() < 1e-10);
//!
//! let sparse = Lasso::new().lambda(0.1).fit(&x, &f).unwrap();
//! assert!(sparse.converged());
//! ```

mod lasso;
mod ols;
mod ridge;

pub use lasso::Lasso;
pub use ols::{Ols, OlsSolver};
pub use ridge::Ridge;

use crate::error::{RegressionError, Result};
use crate::{Matrix, Vector};
use std::fmt;

/// A regression strategy that turns a design matrix and targets into coefficients.
pub trait Regressor {
    fn fit(&self, x: &Matrix, f: &Vector) -> Result<Fit>;
}

/// Selects one of the supported fitting strategies.
#[derive(Clone, Debug, PartialEq)]
pub enum FitStrategy {
    Ols(Ols),
    Ridge(Ridge),
    Lasso(Lasso),
}

impl Regressor for FitStrategy {
    fn fit(&self, x: &Matrix, f: &Vector) -> Result<Fit> {
        match self {
            FitStrategy::Ols(model) => model.fit(x, f),
            FitStrategy::Ridge(model) => model.fit(x, f),
            FitStrategy::Lasso(model) => model.fit(x, f),
        }
    }
}

impl Default for FitStrategy {
    fn default() -> Self {
        FitStrategy::Ols(Ols::new())
    }
}

impl fmt::Display for FitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitStrategy::Ols(_) => write!(f, "OLS"),
            FitStrategy::Ridge(model) => write!(f, "Ridge(λ={})", model.penalty()),
            FitStrategy::Lasso(model) => write!(f, "Lasso(λ={})", model.penalty()),
        }
    }
}

impl From<Ols> for FitStrategy {
    fn from(model: Ols) -> Self {
        FitStrategy::Ols(model)
    }
}

impl From<Ridge> for FitStrategy {
    fn from(model: Ridge) -> Self {
        FitStrategy::Ridge(model)
    }
}

impl From<Lasso> for FitStrategy {
    fn from(model: Lasso) -> Self {
        FitStrategy::Lasso(model)
    }
}

/// Coefficients produced by a single call to [`Regressor::fit`].
#[derive(Clone, Debug)]
pub struct Fit {
    coefficients: Vector,
    strategy: FitStrategy,
    iterations: usize,
    converged: bool,
}

impl Fit {
    pub(crate) fn new(
        coefficients: Vector,
        strategy: FitStrategy,
        iterations: usize,
        converged: bool,
    ) -> Self {
        Self {
            coefficients,
            strategy,
            iterations,
            converged,
        }
    }

    pub(crate) fn closed_form(coefficients: Vector, strategy: FitStrategy) -> Self {
        Self::new(coefficients, strategy, 1, true)
    }

    pub fn coefficients(&self) -> &Vector {
        &self.coefficients
    }

    /// Coefficient of the constant basis term.
    pub fn intercept(&self) -> f64 {
        self.coefficients.first().copied().unwrap_or(0.0)
    }

    pub fn strategy(&self) -> &FitStrategy {
        &self.strategy
    }

    /// Solver passes used; 1 for the closed-form strategies.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// False only when the lasso ran out of iterations before settling.
    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn l2_norm(&self) -> f64 {
        self.coefficients.dot(&self.coefficients).sqrt()
    }

    pub fn predict(&self, x: &Matrix) -> Result<Vector> {
        if x.ncols() != self.coefficients.len() {
            return Err(RegressionError::invalid(format!(
                "Number of features in X ({}) doesn't match training data ({})",
                x.ncols(),
                self.coefficients.len()
            )));
        }

        Ok(x.dot(&self.coefficients))
    }

    pub fn score(&self, x: &Matrix, f: &Vector) -> Result<f64> {
        let predicted = self.predict(x)?;
        crate::metrics::r2_score(f, &predicted)
    }
}

pub(crate) fn validate_training_data(x: &Matrix, f: &Vector) -> Result<()> {
    if x.nrows() != f.len() {
        return Err(RegressionError::invalid(format!(
            "Number of samples in X ({}) and f ({}) must match",
            x.nrows(),
            f.len()
        )));
    }

    if x.nrows() == 0 {
        return Err(RegressionError::invalid("X must have at least one sample"));
    }

    if x.ncols() == 0 {
        return Err(RegressionError::invalid("X must have at least one column"));
    }

    if x.iter().chain(f.iter()).any(|v| !v.is_finite()) {
        return Err(RegressionError::invalid("X and f must contain only finite values"));
    }

    Ok(())
}

pub(crate) fn validate_penalty(lambda: f64) -> Result<()> {
    if !lambda.is_finite() || lambda < 0.0 {
        return Err(RegressionError::invalid(format!(
            "lambda must be finite and non-negative, got {}",
            lambda
        )));
    }
    Ok(())
}

/// `(XᵗX, Xᵗf)`
pub(crate) fn normal_equations(x: &Matrix, f: &Vector) -> (Matrix, Vector) {
    let xt = x.t();
    (xt.dot(x), xt.dot(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{PolynomialBasis, design_matrix};
    use ndarray::array;
    use ndarray_rand::RandomExt;
    use ndarray_rand::rand_distr::{Normal, Uniform};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn noisy_plane(n: usize, seed: u64) -> (Matrix, Vector) {
        let mut rng = StdRng::seed_from_u64(seed);
        let x = Vector::random_using(n, Uniform::new(0.0, 1.0), &mut rng);
        let y = Vector::random_using(n, Uniform::new(0.0, 1.0), &mut rng);
        let noise = Vector::random_using(n, Normal::new(0.0, 0.05).unwrap(), &mut rng);

        let design = PolynomialBasis::new(1).design_matrix(&x, &y).unwrap();
        // columns are 1, y, x
        let f = 1.0 - 3.0 * &y + 2.0 * &x + noise;
        (design, f)
    }

    #[test]
    fn test_all_strategies_recover_true_coefficients() {
        let (x, f) = noisy_plane(4000, 17);
        let truth = [1.0, -3.0, 2.0];

        let strategies = vec![
            FitStrategy::Ols(Ols::new()),
            FitStrategy::Ridge(Ridge::new().lambda(1e-3)),
            FitStrategy::Lasso(Lasso::new().lambda(1e-3)),
        ];

        for strategy in strategies {
            let fit = strategy.fit(&x, &f).unwrap();
            assert!(fit.converged(), "{} did not converge", strategy);
            for (beta, expected) in fit.coefficients().iter().zip(truth.iter()) {
                assert!(
                    (beta - expected).abs() < 0.05,
                    "{}: {} vs {}",
                    strategy,
                    beta,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_coefficient_error_shrinks_with_sample_size() {
        let truth = array![1.0, -3.0, 2.0];
        let strategies = vec![
            FitStrategy::Ols(Ols::new()),
            FitStrategy::Ridge(Ridge::new().lambda(1e-3)),
            FitStrategy::Lasso(Lasso::new().lambda(1e-3)),
        ];

        for strategy in strategies {
            let errors: Vec<f64> = [100, 1600, 25_600]
                .iter()
                .map(|&n| {
                    let (x, f) = noisy_plane(n, 17);
                    let fit = strategy.fit(&x, &f).unwrap();
                    (fit.coefficients() - &truth)
                        .iter()
                        .fold(0.0f64, |acc, e| acc.max(e.abs()))
                })
                .collect();

            assert!(errors[1] <= errors[0], "{}: {:?}", strategy, errors);
            assert!(errors[2] <= errors[1], "{}: {:?}", strategy, errors);
            assert!(errors[2] < 0.01, "{}: {:?}", strategy, errors);
        }
    }

    #[test]
    fn test_concrete_scenario_constant_target() {
        let x = array![0.0, 0.5, 1.0];
        let y = array![0.0, 0.5, 1.0];
        let design = design_matrix(&x, &y).unwrap();
        assert_eq!(design.shape(), &[3, 21]);

        let f = array![1.0, 1.0, 1.0];
        let fit = FitStrategy::Ols(Ols::new().solver(OlsSolver::PseudoInverse))
            .fit(&design, &f)
            .unwrap();

        assert!((fit.intercept() - 1.0).abs() < 1e-8);
        for beta in fit.coefficients().iter().skip(1) {
            assert!(beta.abs() < 1e-8);
        }
    }

    #[test]
    fn test_strict_ols_surfaces_singularity() {
        let x = array![0.0, 0.5, 1.0];
        let y = array![0.0, 0.5, 1.0];
        let design = design_matrix(&x, &y).unwrap();
        let f = array![1.0, 1.0, 1.0];

        let err = FitStrategy::default().fit(&design, &f).unwrap_err();
        assert!(matches!(err, RegressionError::SingularMatrix { size: 21, .. }));
    }

    #[test]
    fn test_ridge_zero_penalty_equals_ols() {
        let (x, f) = noisy_plane(200, 5);

        let ols = Ols::new().fit(&x, &f).unwrap();
        let ridge = Ridge::new().lambda(0.0).fit(&x, &f).unwrap();

        for (a, b) in ols.coefficients().iter().zip(ridge.coefficients().iter()) {
            assert!((a - b).abs() < 1e-10);
        }
    }

    #[test]
    fn test_exact_polynomial_round_trip() {
        let mut rng = StdRng::seed_from_u64(99);
        let x = Vector::random_using(60, Uniform::new(0.0, 1.0), &mut rng);
        let y = Vector::random_using(60, Uniform::new(0.0, 1.0), &mut rng);
        let f = x.mapv(|v| v * v) - 2.0 * &x * &y + 0.5 * &y + 0.25;

        let design = PolynomialBasis::new(3).design_matrix(&x, &y).unwrap();
        let fit = Ols::new().fit(&design, &f).unwrap();
        let predicted = fit.predict(&design).unwrap();

        for (p, t) in predicted.iter().zip(f.iter()) {
            assert!((p - t).abs() < 1e-8);
        }
    }

    #[test]
    fn test_fit_predict_column_mismatch() {
        let fit = Fit::closed_form(array![1.0, 2.0], FitStrategy::default());
        let x = array![[1.0, 2.0, 3.0]];
        assert!(matches!(
            fit.predict(&x),
            Err(RegressionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_fit_accessors() {
        let fit = Fit::closed_form(array![3.0, 4.0], FitStrategy::default());
        assert_eq!(fit.intercept(), 3.0);
        assert!((fit.l2_norm() - 5.0).abs() < 1e-12);
        assert_eq!(fit.iterations(), 1);
        assert!(fit.converged());
    }

    #[test]
    fn test_rejects_non_finite_input() {
        let x = array![[1.0, f64::NAN], [1.0, 2.0]];
        let f = array![1.0, 2.0];

        for strategy in [
            FitStrategy::Ols(Ols::new()),
            FitStrategy::Ridge(Ridge::new()),
            FitStrategy::Lasso(Lasso::new()),
        ] {
            assert!(matches!(
                strategy.fit(&x, &f),
                Err(RegressionError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(FitStrategy::default().to_string(), "OLS");
        assert_eq!(
            FitStrategy::Ridge(Ridge::new().lambda(0.5)).to_string(),
            "Ridge(λ=0.5)"
        );
        assert_eq!(
            FitStrategy::from(Lasso::new().lambda(0.01)).to_string(),
            "Lasso(λ=0.01)"
        );
    }
}
