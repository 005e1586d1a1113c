//! Franke's bivariate test function.
//!
//! Two Gaussian peaks of different heights and a smaller dip, defined on the
//! unit square. Franke, R. (1979), "A critical comparison of some methods for
//! interpolation of scattered data".

use crate::error::{RegressionError, Result};
use crate::Vector;
use ndarray::Zip;

pub fn franke(x: f64, y: f64) -> f64 {
    let term1 = 0.75 * (-(9.0 * x - 2.0).powi(2) / 4.0 - (9.0 * y - 2.0).powi(2) / 4.0).exp();
    let term2 = 0.75 * (-(9.0 * x + 1.0).powi(2) / 49.0 - (9.0 * y + 1.0) / 10.0).exp();
    let term3 = 0.5 * (-(9.0 * x - 7.0).powi(2) / 4.0 - (9.0 * y - 3.0).powi(2) / 4.0).exp();
    let term4 = -0.2 * (-(9.0 * x - 4.0).powi(2) - (9.0 * y - 7.0).powi(2)).exp();
    term1 + term2 + term3 + term4
}

/// Evaluates [`franke`] pairwise over two coordinate vectors.
pub fn franke_array(x: &Vector, y: &Vector) -> Result<Vector> {
    if x.len() != y.len() {
        return Err(RegressionError::invalid(format!(
            "x and y must have the same length, got {} and {}",
            x.len(),
            y.len()
        )));
    }

    Ok(Zip::from(x).and(y).map_collect(|&xi, &yi| franke(xi, yi)))
}
