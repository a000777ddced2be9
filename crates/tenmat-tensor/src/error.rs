use thiserror::Error;

use crate::allocator::TensorAllocatorError;

/// Error type for array construction, addressing and manipulation.
///
/// Every variant is a precondition violation detected eagerly by the call
/// that triggers it. Nothing is corrected or deferred silently.
#[derive(Error, Debug, PartialEq)]
pub enum TensorError {
    /// Operand shapes are incompatible for the requested operation.
    ///
    /// # Examples
    /// - Element-wise addition of arrays with different shapes
    /// - Building a 3x3 tensor from a 2x2 array
    /// - Indexing a rank-2 array with three indices
    /// - Resizing a fixed-size container to another shape
    #[error("Shape mismatch: {message}. Expected shape: {expected}, got: {actual}")]
    ShapeMismatch {
        /// Human-readable description of the mismatch
        message: String,
        /// Expected shape description
        expected: String,
        /// Actual shape description
        actual: String,
    },

    /// A multi-index component is not smaller than its dimension.
    ///
    /// Only raised by regular (non-periodic) addressing. Periodic addressing
    /// wraps every component and never fails this way.
    #[error("Index {index} out of range for axis {axis} of size {size}")]
    IndexOutOfRange {
        /// The axis the index was applied to
        axis: usize,
        /// The invalid index that was attempted
        index: usize,
        /// The size of the dimension being indexed
        size: usize,
    },

    /// A flat initializer or buffer does not hold the required number of elements.
    ///
    /// # Example
    /// ```ignore
    /// // Error: shape [2, 3] expects 6 elements, but got 5
    /// let a = Array::<f64>::from_shape_vec(&[2, 3], vec![1.0; 5], CpuAllocator)?;
    /// ```
    #[error("Length mismatch: expected {expected} elements, but got {actual}")]
    LengthMismatch {
        /// Required number of elements
        expected: usize,
        /// Number of elements supplied
        actual: usize,
    },

    /// The operation is not available for this container.
    ///
    /// # Examples
    /// - Resizing a view (views never allocate)
    /// - Reshaping a non-contiguous view
    /// - Importing a foreign buffer whose element type does not match
    #[error("Unsupported operation: {operation} - {reason}")]
    Unsupported {
        /// Name of the operation that failed
        operation: String,
        /// Reason why the operation is not supported
        reason: String,
    },

    /// Underlying storage allocation failed.
    #[error("Storage error: {0}")]
    StorageError(#[from] TensorAllocatorError),
}

impl TensorError {
    /// Creates a ShapeMismatch error with formatted shapes.
    pub fn shape_mismatch(message: impl Into<String>, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            message: message.into(),
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        }
    }

    /// Creates an IndexOutOfRange error.
    pub fn index_out_of_range(axis: usize, index: usize, size: usize) -> Self {
        Self::IndexOutOfRange { axis, index, size }
    }

    /// Creates a LengthMismatch error.
    pub fn length_mismatch(expected: usize, actual: usize) -> Self {
        Self::LengthMismatch { expected, actual }
    }

    /// Creates an Unsupported error with context.
    pub fn unsupported(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Returns a user-friendly suggestion for resolving the error.
    pub fn suggestion(&self) -> &str {
        match self {
            Self::ShapeMismatch { .. } => {
                "Check that operand shapes agree; use broadcast() or reshape() for compatible layouts"
            }
            Self::IndexOutOfRange { .. } => {
                "Verify indices are within bounds (0 <= index < dimension_size) or use a periodic container"
            }
            Self::LengthMismatch { .. } => {
                "Ensure the product of shape dimensions equals the number of data elements"
            }
            Self::Unsupported { .. } => {
                "Copy the view into an owned array with to_owned() before changing its layout"
            }
            Self::StorageError(e) => e.suggestion(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TensorError::shape_mismatch("element-wise add", &[2, 2], &[3, 3]);
        assert_eq!(
            err.to_string(),
            "Shape mismatch: element-wise add. Expected shape: [2, 2], got: [3, 3]"
        );

        let err = TensorError::index_out_of_range(1, 4, 3);
        assert_eq!(err.to_string(), "Index 4 out of range for axis 1 of size 3");

        let err = TensorError::length_mismatch(6, 5);
        assert_eq!(
            err.to_string(),
            "Length mismatch: expected 6 elements, but got 5"
        );
        assert!(err.suggestion().contains("product"));
    }
}
