//! Dense solvers for the small symmetric systems produced by the normal equations.

use crate::error::{RegressionError, Result};
use crate::{Matrix, Vector};
use ndarray::Axis;

const JACOBI_MAX_SWEEPS: usize = 100;

/// Relative pivot size below which [`solve`] reports a singular system; also
/// the eigenvalue cutoff used with [`pseudo_solve`].
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Solves `a * x = b` by Gaussian elimination with partial pivoting.
///
/// A pivot whose magnitude is at most `tolerance * max|a_ij|` makes the
/// system singular.
pub fn solve(a: &Matrix, b: &Vector, tolerance: f64) -> Result<Vector> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(RegressionError::invalid(format!(
            "system matrix must be square, got {}x{}",
            n,
            a.ncols()
        )));
    }
    if b.len() != n {
        return Err(RegressionError::invalid(format!(
            "right-hand side has length {}, expected {}",
            b.len(),
            n
        )));
    }

    let scale = a.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    let threshold = tolerance * scale;

    let mut aug = Matrix::zeros((n, n + 1));
    aug.slice_mut(ndarray::s![.., ..n]).assign(a);
    aug.column_mut(n).assign(b);

    for i in 0..n {
        let mut max_row = i;
        for k in (i + 1)..n {
            if aug[(k, i)].abs() > aug[(max_row, i)].abs() {
                max_row = k;
            }
        }

        let pivot = aug[(max_row, i)];
        if pivot.abs() <= threshold || !pivot.is_finite() {
            return Err(RegressionError::SingularMatrix { size: n, pivot });
        }

        if max_row != i {
            for j in 0..=n {
                aug.swap((i, j), (max_row, j));
            }
        }

        for k in (i + 1)..n {
            let factor = aug[(k, i)] / aug[(i, i)];
            if factor == 0.0 {
                continue;
            }
            for j in i..=n {
                aug[(k, j)] -= factor * aug[(i, j)];
            }
        }
    }

    let mut x = Vector::zeros(n);
    for i in (0..n).rev() {
        x[i] = aug[(i, n)];
        for j in (i + 1)..n {
            x[i] -= aug[(i, j)] * x[j];
        }
        x[i] /= aug[(i, i)];
    }

    Ok(x)
}

/// Cyclic Jacobi eigen-decomposition of a symmetric matrix.
///
/// Returns the eigenvalues and a matrix whose columns are the matching
/// orthonormal eigenvectors. Order is unspecified.
pub fn symmetric_eigen(a: &Matrix) -> Result<(Vector, Matrix)> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(RegressionError::invalid(format!(
            "matrix must be square for eigenvalue decomposition, got {}x{}",
            n,
            a.ncols()
        )));
    }

    let mut a = a.clone();
    let mut v = Matrix::eye(n);
    let frobenius = a.iter().map(|x| x * x).sum::<f64>().sqrt();

    for _ in 0..JACOBI_MAX_SWEEPS {
        let mut off_diagonal = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                off_diagonal += a[(p, q)] * a[(p, q)];
            }
        }
        if off_diagonal.sqrt() <= f64::EPSILON * frobenius {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[(p, q)];
                if apq == 0.0 {
                    continue;
                }

                let theta = (a[(q, q)] - a[(p, p)]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = a[(k, p)];
                    let akq = a[(k, q)];
                    a[(k, p)] = c * akp - s * akq;
                    a[(k, q)] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[(p, k)];
                    let aqk = a[(q, k)];
                    a[(p, k)] = c * apk - s * aqk;
                    a[(q, k)] = s * apk + c * aqk;
                }
                for k in 0..n {
                    let vkp = v[(k, p)];
                    let vkq = v[(k, q)];
                    v[(k, p)] = c * vkp - s * vkq;
                    v[(k, q)] = s * vkp + c * vkq;
                }
            }
        }
    }

    Ok((a.diag().to_owned(), v))
}

/// Minimum-norm solution of `a * x = b` for symmetric positive semi-definite `a`.
///
/// Eigen-directions with eigenvalue at most `rcond * max eigenvalue` are dropped.
pub fn pseudo_solve(a: &Matrix, b: &Vector, rcond: f64) -> Result<Vector> {
    if b.len() != a.nrows() {
        return Err(RegressionError::invalid(format!(
            "right-hand side has length {}, expected {}",
            b.len(),
            a.nrows()
        )));
    }

    let (eigenvalues, eigenvectors) = symmetric_eigen(a)?;
    let largest = eigenvalues.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    let cutoff = rcond * largest;

    let mut x = Vector::zeros(a.ncols());
    for (value, vector) in eigenvalues.iter().zip(eigenvectors.axis_iter(Axis(1))) {
        if *value > cutoff && *value > 0.0 {
            let weight = vector.dot(b) / value;
            x.scaled_add(weight, &vector);
        }
    }

    Ok(x)
}
