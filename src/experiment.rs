//! End-to-end fit of a polynomial model to sampled Franke data.

use crate::design::{DEFAULT_DEGREE, PolynomialBasis};
use crate::error::Result;
use crate::linear_model::{Fit, FitStrategy, Regressor};
use crate::metrics::{mean_squared_error, r2_score};
use crate::sampling::{SampleSet, SamplingConfig};
use crate::surface::SurfaceGrid;
use std::fmt;
use tracing::info;

/// Everything one run needs, seed included.
#[derive(Clone, Debug, PartialEq)]
pub struct FrankeExperiment {
    sampling: SamplingConfig,
    degree: usize,
    strategy: FitStrategy,
    grid_size: Option<usize>,
}

impl FrankeExperiment {
    pub fn new() -> Self {
        Self {
            sampling: SamplingConfig::new(),
            degree: DEFAULT_DEGREE,
            strategy: FitStrategy::default(),
            grid_size: None,
        }
    }

    pub fn sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    pub fn strategy(mut self, strategy: impl Into<FitStrategy>) -> Self {
        self.strategy = strategy.into();
        self
    }

    /// Points per grid axis; defaults to the sample count.
    pub fn grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = Some(grid_size);
        self
    }

    pub fn run(&self) -> Result<ExperimentReport> {
        let basis = PolynomialBasis::new(self.degree);
        let samples = SampleSet::generate(&self.sampling)?;
        info!(
            samples = samples.n_samples(),
            degree = self.degree,
            terms = basis.n_terms(),
            strategy = %self.strategy,
            "fitting Franke samples"
        );

        let design = samples.design_matrix(&basis)?;
        let fit = self.strategy.fit(&design, &samples.z)?;
        let fitted = fit.predict(&design)?;
        let train_mse = mean_squared_error(&samples.z, &fitted)?;
        let train_r2 = r2_score(&samples.z, &fitted)?;

        let grid_size = self.grid_size.unwrap_or(samples.n_samples());
        let predicted = SurfaceGrid::evaluate(&fit, &basis, grid_size)?;
        let truth = SurfaceGrid::franke(grid_size)?;
        let error = predicted.abs_error(&truth)?;
        let grid_mse = mean_squared_error(&truth.flatten(), &predicted.flatten())?;

        let report = ExperimentReport {
            fit,
            train_mse,
            train_r2,
            grid_mse,
            max_abs_error: error.max(),
            predicted,
            error,
        };
        info!(%report, "experiment finished");
        Ok(report)
    }
}

impl Default for FrankeExperiment {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of [`FrankeExperiment::run`].
#[derive(Clone, Debug)]
pub struct ExperimentReport {
    pub fit: Fit,
    pub train_mse: f64,
    pub train_r2: f64,
    /// Mean squared deviation from the true surface over the grid.
    pub grid_mse: f64,
    pub max_abs_error: f64,
    pub predicted: SurfaceGrid,
    pub error: SurfaceGrid,
}

impl fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: train MSE {:.3e}, train R² {:.4}, grid MSE {:.3e}, max |error| {:.3e}",
            self.fit.strategy(),
            self.train_mse,
            self.train_r2,
            self.grid_mse,
            self.max_abs_error
        )?;
        if !self.fit.converged() {
            write!(f, " (not converged after {} iterations)", self.fit.iterations())?;
        }
        Ok(())
    }
}
