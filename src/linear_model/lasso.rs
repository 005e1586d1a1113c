use super::{Fit, FitStrategy, Regressor, validate_penalty, validate_training_data};
use crate::error::{RegressionError, Result};
use crate::linalg::{self, DEFAULT_TOLERANCE};
use crate::{Matrix, Vector};
use ndarray::Axis;
use tracing::{debug, warn};

/// L1-penalised least squares minimising `‖f − Xβ‖² + λ‖β‖₁`.
///
/// Each iteration is one cyclic coordinate-descent sweep followed by an
/// exact solve on the current support `A` with signs `s`:
/// `(X_AᵗX_A) β_A = X_Aᵗf − (λ/2) s_A`. If that solution would flip a sign,
/// the step stops where the first coefficient reaches zero. The fit has
/// converged once the optimality conditions hold, `Xᵗr = (λ/2) sign(β)` on
/// the support and `|Xᵗr| ≤ λ/2` off it, to within
/// `tolerance * max(1, max|Xᵗf|)`.
///
/// When `max_iter` iterations pass without that happening the fit still
/// succeeds, carrying the lowest-objective iterate and `converged() == false`.
#[derive(Clone, Debug, PartialEq)]
pub struct Lasso {
    lambda: f64,
    max_iter: usize,
    tolerance: f64,
}

impl Lasso {
    pub fn new() -> Self {
        Self {
            lambda: 0.005,
            max_iter: 10_000,
            tolerance: 1e-8,
        }
    }

    pub fn lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn penalty(&self) -> f64 {
        self.lambda
    }

    fn objective(&self, residual: &Vector, beta: &Vector) -> f64 {
        residual.dot(residual) + self.lambda * beta.mapv(f64::abs).sum()
    }

    fn coordinate_descent(&self, x: &Matrix, f: &Vector) -> (Vector, usize, bool) {
        let mut beta = Vector::zeros(x.ncols());
        let mut residual = f.clone();

        let gram = x.t().dot(x);
        let xtf = x.t().dot(f);
        let kkt_tolerance = self.tolerance * xtf.iter().fold(1.0f64, |acc, v| acc.max(v.abs()));

        let mut best = (beta.clone(), self.objective(&residual, &beta));
        let mut iterations = 0;

        while iterations < self.max_iter {
            iterations += 1;
            self.sweep(x, &gram, &mut beta, &mut residual);
            self.refine_support(x, f, &gram, &xtf, &mut beta, &mut residual);

            let objective = self.objective(&residual, &beta);
            if objective <= best.1 {
                best = (beta.clone(), objective);
            }

            if self.is_optimal(x, &residual, &beta, kkt_tolerance) {
                return (beta, iterations, true);
            }
        }

        (best.0, iterations, false)
    }

    /// One pass of soft-thresholded coordinate updates, keeping `residual = f − Xβ`.
    fn sweep(&self, x: &Matrix, gram: &Matrix, beta: &mut Vector, residual: &mut Vector) {
        let threshold = self.lambda / 2.0;

        for j in 0..beta.len() {
            let norm = gram[(j, j)];
            if norm == 0.0 {
                continue;
            }

            let column = x.column(j);
            let rho = column.dot(&*residual) + norm * beta[j];
            let updated = soft_threshold(rho, threshold) / norm;
            let step = updated - beta[j];

            if step != 0.0 {
                residual.scaled_add(-step, &column);
                beta[j] = updated;
            }
        }
    }

    /// Moves toward the exact minimiser on the current support and signs.
    ///
    /// A rank-deficient support is left to coordinate descent, as is any
    /// step that would not lower the objective.
    fn refine_support(
        &self,
        x: &Matrix,
        f: &Vector,
        gram: &Matrix,
        xtf: &Vector,
        beta: &mut Vector,
        residual: &mut Vector,
    ) {
        let support: Vec<usize> = (0..beta.len()).filter(|&j| beta[j] != 0.0).collect();
        if support.is_empty() {
            return;
        }

        let signs: Vector = support.iter().map(|&j| beta[j].signum()).collect();
        let gram_support = gram.select(Axis(0), &support).select(Axis(1), &support);
        let rhs = xtf.select(Axis(0), &support) - &signs * (self.lambda / 2.0);
        let Ok(target) = linalg::solve(&gram_support, &rhs, DEFAULT_TOLERANCE) else {
            return;
        };

        // stop at the first coefficient that would change sign
        let mut step = 1.0;
        let mut blocking = None;
        for (k, &j) in support.iter().enumerate() {
            if target[k] * signs[k] < 0.0 {
                let t = beta[j] / (beta[j] - target[k]);
                if t < step {
                    step = t;
                    blocking = Some(j);
                }
            }
        }

        let mut trial = beta.clone();
        for (k, &j) in support.iter().enumerate() {
            trial[j] += step * (target[k] - beta[j]);
        }
        if let Some(j) = blocking {
            trial[j] = 0.0;
        }

        let trial_residual = f - &x.dot(&trial);
        if self.objective(&trial_residual, &trial) <= self.objective(residual, beta) {
            *beta = trial;
            *residual = trial_residual;
        }
    }

    fn is_optimal(&self, x: &Matrix, residual: &Vector, beta: &Vector, tolerance: f64) -> bool {
        let threshold = self.lambda / 2.0;
        let correlation = x.t().dot(residual);

        correlation.iter().zip(beta.iter()).all(|(&c, &b)| {
            if b == 0.0 {
                c.abs() <= threshold + tolerance
            } else {
                (c - threshold * b.signum()).abs() <= tolerance
            }
        })
    }
}

fn soft_threshold(z: f64, gamma: f64) -> f64 {
    if z > gamma {
        z - gamma
    } else if z < -gamma {
        z + gamma
    } else {
        0.0
    }
}

impl Regressor for Lasso {
    fn fit(&self, x: &Matrix, f: &Vector) -> Result<Fit> {
        validate_training_data(x, f)?;
        validate_penalty(self.lambda)?;
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(RegressionError::invalid(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        if self.max_iter == 0 {
            return Err(RegressionError::invalid("max_iter must be at least 1"));
        }

        let (coefficients, iterations, converged) = self.coordinate_descent(x, f);
        if converged {
            debug!(iterations, lambda = self.lambda, "lasso converged");
        } else {
            warn!(
                iterations,
                lambda = self.lambda,
                tolerance = self.tolerance,
                "lasso did not fully converge, keeping best iterate"
            );
        }

        Ok(Fit::new(
            coefficients,
            FitStrategy::Lasso(self.clone()),
            iterations,
            converged,
        ))
    }
}

impl Default for Lasso {
    fn default() -> Self {
        Self::new()
    }
}
