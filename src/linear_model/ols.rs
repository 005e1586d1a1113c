use super::{Fit, FitStrategy, Regressor, normal_equations, validate_training_data};
use crate::error::{RegressionError, Result};
use crate::linalg::{self, DEFAULT_TOLERANCE};
use crate::{Matrix, Vector};
use tracing::debug;

/// How [`Ols`] inverts `XᵗX`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OlsSolver {
    /// Gaussian elimination; a singular `XᵗX` is an error.
    #[default]
    Inverse,
    /// Minimum-norm least squares through the eigen-decomposition of `XᵗX`.
    PseudoInverse,
}

/// Ordinary least squares, `β = (XᵗX)⁻¹Xᵗf`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ols {
    solver: OlsSolver,
    tolerance: f64,
}

impl Ols {
    pub fn new() -> Self {
        Self {
            solver: OlsSolver::Inverse,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn solver(mut self, solver: OlsSolver) -> Self {
        self.solver = solver;
        self
    }

    /// Relative pivot tolerance for [`OlsSolver::Inverse`], or eigenvalue
    /// cutoff for [`OlsSolver::PseudoInverse`].
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn solve(&self, xtx: &Matrix, xty: &Vector) -> Result<Vector> {
        match self.solver {
            OlsSolver::Inverse => linalg::solve(xtx, xty, self.tolerance),
            OlsSolver::PseudoInverse => linalg::pseudo_solve(xtx, xty, self.tolerance),
        }
    }
}

impl Regressor for Ols {
    fn fit(&self, x: &Matrix, f: &Vector) -> Result<Fit> {
        validate_training_data(x, f)?;
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(RegressionError::invalid(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }

        let (xtx, xty) = normal_equations(x, f);
        let coefficients = self.solve(&xtx, &xty)?;
        debug!(
            samples = x.nrows(),
            terms = x.ncols(),
            solver = ?self.solver,
            "fitted OLS"
        );

        Ok(Fit::closed_form(coefficients, FitStrategy::Ols(self.clone())))
    }
}

impl Default for Ols {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_ols_simple_line() {
        let x = array![[1.0, 1.0], [1.0, 2.0], [1.0, 3.0], [1.0, 4.0]];
        let f = array![2.0, 4.0, 6.0, 8.0];

        let fit = Ols::new().fit(&x, &f).unwrap();
        assert!(fit.intercept().abs() < 1e-10);
        assert!((fit.coefficients()[1] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_ols_singular_design() {
        // second column duplicates the first
        let x = array![[1.0, 1.0], [1.0, 1.0], [1.0, 1.0]];
        let f = array![1.0, 2.0, 3.0];

        let err = Ols::new().fit(&x, &f).unwrap_err();
        assert!(matches!(err, RegressionError::SingularMatrix { .. }));
    }

    #[test]
    fn test_pseudo_inverse_handles_collinear_columns() {
        let x = array![[1.0, 1.0], [1.0, 1.0], [1.0, 1.0]];
        let f = array![1.0, 2.0, 3.0];

        let fit = Ols::new().solver(OlsSolver::PseudoInverse).fit(&x, &f).unwrap();
        // mean of f split evenly between the identical columns
        assert!((fit.coefficients()[0] - 1.0).abs() < 1e-10);
        assert!((fit.coefficients()[1] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_ols_dimension_mismatch() {
        let x = array![[1.0], [2.0]];
        let f = array![1.0, 2.0, 3.0];

        assert!(matches!(
            Ols::new().fit(&x, &f),
            Err(RegressionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_ols_empty_input() {
        let x = Matrix::zeros((0, 3));
        let f = Vector::zeros(0);

        assert!(Ols::new().fit(&x, &f).is_err());
    }

    #[test]
    fn test_ols_negative_tolerance() {
        let x = array![[1.0], [2.0]];
        let f = array![1.0, 2.0];

        assert!(Ols::new().tolerance(-1.0).fit(&x, &f).is_err());
    }
}
