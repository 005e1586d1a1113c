//! Polynomial regression on scattered samples of a bivariate surface.
//!
//! The crate builds polynomial design matrices from `(x, y)` samples and fits
//! them with ordinary least squares, ridge or lasso. Franke's function is the
//! built-in test surface.
//!
//! ```rust
//! use franke_regression::{FitStrategy, PolynomialBasis, Regressor, Ridge, SampleSet, SamplingConfig};
//!
//! let samples = SampleSet::generate(&SamplingConfig::new().n_samples(200).seed(3)).unwrap();
//! let basis = PolynomialBasis::new(3);
//! let x = samples.design_matrix(&basis).unwrap();
//!
//! let strategy = FitStrategy::Ridge(Ridge::new().lambda(1e-3));
//! let fit = strategy.fit(&x, &samples.z).unwrap();
//! assert_eq!(fit.coefficients().len(), basis.n_terms());
//! ```

pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod design;
pub mod error;
pub mod experiment;
pub mod franke;
pub mod linalg;
pub mod linear_model;
pub mod metrics;
pub mod sampling;
pub mod surface;

pub use design::{DEFAULT_DEGREE, PolynomialBasis, design_matrix};
pub use error::{RegressionError, Result};
pub use experiment::{ExperimentReport, FrankeExperiment};
pub use franke::{franke, franke_array};
pub use linear_model::{Fit, FitStrategy, Lasso, Ols, OlsSolver, Regressor, Ridge};
pub use sampling::{SampleSet, SamplingConfig};
pub use surface::SurfaceGrid;

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_types_work() {
        let vec = Vector::zeros(5);
        let mat = Matrix::zeros((3, 4));
        assert_eq!(vec.len(), 5);
        assert_eq!(mat.shape(), &[3, 4]);
    }
}
