use tenmat_tensor::TensorError;
use thiserror::Error;

/// An error type for cartesian tensor construction and algebra.
#[derive(Error, Debug, PartialEq)]
pub enum CartesianError {
    /// The inverse was requested for a tensor whose determinant is exactly zero.
    #[error("Singular matrix: the determinant is exactly zero")]
    SingularMatrix,

    /// Tensor error
    #[error("Error with the tensor: {0}")]
    TensorError(#[from] TensorError),
}

impl CartesianError {
    /// Returns a user-friendly suggestion for resolving the error.
    pub fn suggestion(&self) -> &str {
        match self {
            Self::SingularMatrix => {
                "Check the tensor for linearly dependent rows before inverting it"
            }
            Self::TensorError(e) => e.suggestion(),
        }
    }
}
