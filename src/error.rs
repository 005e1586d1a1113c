use thiserror::Error;

/// Failures surfaced by the design matrix builder, the solvers and the metrics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    /// Shapes disagree, a parameter is out of range, or the data holds non-finite values.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The normal-equation matrix could not be inverted.
    #[error("matrix of size {size}x{size} is singular or ill-conditioned (pivot {pivot:e})")]
    SingularMatrix { size: usize, pivot: f64 },
}

pub type Result<T> = std::result::Result<T, RegressionError>;

impl RegressionError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        RegressionError::InvalidInput(msg.into())
    }
}
