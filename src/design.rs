use crate::error::{RegressionError, Result};
use crate::{Matrix, Vector};

pub const DEFAULT_DEGREE: usize = 5;

/// Full bivariate polynomial basis of a fixed total degree.
///
/// Columns enumerate `x^i * y^j` for `i + j <= degree`, grouped by total
/// degree and ascending in `i` within a group:
/// `1, y, x, y^2, xy, x^2, ...`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PolynomialBasis {
    degree: usize,
}

impl PolynomialBasis {
    pub fn new(degree: usize) -> Self {
        Self { degree }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// `C(degree + 2, 2)`
    pub fn n_terms(&self) -> usize {
        (self.degree + 1) * (self.degree + 2) / 2
    }

    /// Exponent pairs `(i, j)` in column order.
    pub fn terms(&self) -> impl Iterator<Item = (usize, usize)> {
        (0..=self.degree).flat_map(|total| (0..=total).map(move |i| (i, total - i)))
    }

    pub fn design_matrix(&self, x: &Vector, y: &Vector) -> Result<Matrix> {
        if x.len() != y.len() {
            return Err(RegressionError::invalid(format!(
                "x and y must have the same length, got {} and {}",
                x.len(),
                y.len()
            )));
        }

        let mut design = Matrix::zeros((x.len(), self.n_terms()));
        for (col, (i, j)) in self.terms().enumerate() {
            let mut column = design.column_mut(col);
            for (row, value) in column.iter_mut().enumerate() {
                *value = x[row].powi(i as i32) * y[row].powi(j as i32);
            }
        }

        Ok(design)
    }
}

impl Default for PolynomialBasis {
    fn default() -> Self {
        Self::new(DEFAULT_DEGREE)
    }
}

/// Design matrix of the default degree-5 basis.
pub fn design_matrix(x: &Vector, y: &Vector) -> Result<Matrix> {
    PolynomialBasis::default().design_matrix(x, y)
}
