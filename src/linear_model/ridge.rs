use super::{
    Fit, FitStrategy, Regressor, normal_equations, validate_penalty, validate_training_data,
};
use crate::error::Result;
use crate::linalg::{self, DEFAULT_TOLERANCE};
use crate::{Matrix, Vector};
use tracing::debug;

/// L2-penalised least squares, `β = (XᵗX + λI)⁻¹Xᵗf`.
///
/// The penalty applies to every coefficient, the intercept column included.
#[derive(Clone, Debug, PartialEq)]
pub struct Ridge {
    lambda: f64,
}

impl Ridge {
    pub fn new() -> Self {
        Self { lambda: 0.005 }
    }

    pub fn lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    pub fn penalty(&self) -> f64 {
        self.lambda
    }

    fn solve_ridge_equation(&self, x: &Matrix, f: &Vector) -> Result<Vector> {
        let (mut xtx, xty) = normal_equations(x, f);
        for i in 0..xtx.nrows() {
            xtx[(i, i)] += self.lambda;
        }

        // positive definite for any λ > 0, so only a zero or non-finite pivot can fail
        let tolerance = if self.lambda > 0.0 { 0.0 } else { DEFAULT_TOLERANCE };
        linalg::solve(&xtx, &xty, tolerance)
    }
}

impl Regressor for Ridge {
    fn fit(&self, x: &Matrix, f: &Vector) -> Result<Fit> {
        validate_training_data(x, f)?;
        validate_penalty(self.lambda)?;

        let coefficients = self.solve_ridge_equation(x, f)?;
        debug!(
            samples = x.nrows(),
            terms = x.ncols(),
            lambda = self.lambda,
            "fitted ridge"
        );

        Ok(Fit::closed_form(coefficients, FitStrategy::Ridge(self.clone())))
    }
}

impl Default for Ridge {
    fn default() -> Self {
        Self::new()
    }
}
