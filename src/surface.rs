//! Fitted and true surfaces sampled on a regular grid over the unit square.

use crate::design::PolynomialBasis;
use crate::error::{RegressionError, Result};
use crate::franke::franke;
use crate::linear_model::Fit;
use crate::{Matrix, Vector};

/// Values on an `n x n` grid with `linspace(0, 1, n)` along both axes.
///
/// Row `r`, column `c` holds the value at `(x = axis[c], y = axis[r])`.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceGrid {
    axis: Vector,
    values: Matrix,
}

impl SurfaceGrid {
    /// Prediction of `fit` over the grid.
    pub fn evaluate(fit: &Fit, basis: &PolynomialBasis, n: usize) -> Result<Self> {
        let axis = grid_axis(n)?;
        let (xs, ys) = meshgrid(&axis);

        let design = basis.design_matrix(&xs, &ys)?;
        let predicted = fit.predict(&design)?;
        let values = predicted
            .into_shape_with_order((n, n))
            .map_err(|e| RegressionError::invalid(e.to_string()))?;

        Ok(Self { axis, values })
    }

    /// Franke's function over the grid.
    pub fn franke(n: usize) -> Result<Self> {
        let axis = grid_axis(n)?;
        let values = Matrix::from_shape_fn((n, n), |(r, c)| franke(axis[c], axis[r]));
        Ok(Self { axis, values })
    }

    /// Pointwise `|self - other|`.
    pub fn abs_error(&self, other: &SurfaceGrid) -> Result<SurfaceGrid> {
        if self.size() != other.size() {
            return Err(RegressionError::invalid(format!(
                "grids differ in size: {} and {}",
                self.size(),
                other.size()
            )));
        }

        Ok(Self {
            axis: self.axis.clone(),
            values: (&self.values - &other.values).mapv(f64::abs),
        })
    }

    pub fn size(&self) -> usize {
        self.axis.len()
    }

    pub fn axis(&self) -> &Vector {
        &self.axis
    }

    pub fn values(&self) -> &Matrix {
        &self.values
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn mean(&self) -> f64 {
        self.values.sum() / self.values.len() as f64
    }

    /// Values in row-major order, matching the flattened meshgrid.
    pub fn flatten(&self) -> Vector {
        self.values.iter().copied().collect()
    }
}

fn grid_axis(n: usize) -> Result<Vector> {
    if n == 0 {
        return Err(RegressionError::invalid("grid size must be at least 1"));
    }
    Ok(Vector::linspace(0.0, 1.0, n))
}

/// Flattened meshgrid: x varies fastest.
fn meshgrid(axis: &Vector) -> (Vector, Vector) {
    let n = axis.len();
    let xs = Vector::from_shape_fn(n * n, |k| axis[k % n]);
    let ys = Vector::from_shape_fn(n * n, |k| axis[k / n]);
    (xs, ys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear_model::{Ols, Regressor};
    use crate::sampling::{SampleSet, SamplingConfig};

    #[test]
    fn test_meshgrid_layout() {
        let axis = Vector::linspace(0.0, 1.0, 3);
        let (xs, ys) = meshgrid(&axis);

        assert_eq!(xs.to_vec(), vec![0.0, 0.5, 1.0, 0.0, 0.5, 1.0, 0.0, 0.5, 1.0]);
        assert_eq!(ys.to_vec(), vec![0.0, 0.0, 0.0, 0.5, 0.5, 0.5, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_franke_grid_orientation() {
        let grid = SurfaceGrid::franke(5).unwrap();

        assert_eq!(grid.values().shape(), &[5, 5]);
        assert_eq!(grid.values()[(1, 3)], franke(0.75, 0.25));
    }

    #[test]
    fn test_evaluate_exact_fit_matches_truth() {
        // degree-2 polynomial surface reproduced exactly by a degree-2 fit
        let basis = PolynomialBasis::new(2);
        let samples = SampleSet::generate(&SamplingConfig::new().n_samples(40)).unwrap();
        let z = 0.5 + &samples.x * &samples.y - samples.y.mapv(|v| v * v);
        let design = samples.design_matrix(&basis).unwrap();
        let fit = Ols::new().fit(&design, &z).unwrap();

        let grid = SurfaceGrid::evaluate(&fit, &basis, 6).unwrap();
        for (r, &y) in grid.axis().iter().enumerate() {
            for (c, &x) in grid.axis().iter().enumerate() {
                let expected = 0.5 + x * y - y * y;
                assert!((grid.values()[(r, c)] - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_abs_error() {
        let truth = SurfaceGrid::franke(4).unwrap();
        let zero = SurfaceGrid {
            axis: truth.axis().clone(),
            values: Matrix::zeros((4, 4)),
        };

        let error = zero.abs_error(&truth).unwrap();
        let largest = truth.values().iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
        assert_eq!(error.max(), largest);
        assert!(error.mean() > 0.0);
        assert_eq!(error.flatten().len(), 16);
    }

    #[test]
    fn test_grid_size_errors() {
        assert!(SurfaceGrid::franke(0).is_err());
        let small = SurfaceGrid::franke(2).unwrap();
        let large = SurfaceGrid::franke(3).unwrap();
        assert!(small.abs_error(&large).is_err());
    }
}
