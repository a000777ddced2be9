//! Row-major shape and stride arithmetic.
//!
//! Pure functions mapping a shape to strides and element counts, and
//! converting between multi-indices and flat offsets. Rank 0 denotes a
//! scalar: it has one element and an empty index.

use crate::error::TensorError;

/// Computes the strides for a row-major (C-contiguous) layout.
///
/// The rightmost dimension has stride 1 and each dimension's stride is the
/// product of all dimensions to its right.
///
/// # Examples
///
/// ```rust
/// use tenmat_tensor::layout::get_strides_from_shape;
///
/// // For a 2x3 matrix: [[a, b, c], [d, e, f]]
/// assert_eq!(get_strides_from_shape(&[2, 3]), vec![3, 1]);
///
/// // For a 2x3x4 array
/// assert_eq!(get_strides_from_shape(&[2, 3, 4]), vec![12, 4, 1]);
/// ```
pub fn get_strides_from_shape(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut stride = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// Const-rank version of [`get_strides_from_shape`] used by fixed-size containers.
///
/// ```rust
/// use tenmat_tensor::layout::get_strides_from_shape_array;
///
/// assert_eq!(get_strides_from_shape_array([3, 3, 3, 3]), [27, 9, 3, 1]);
/// ```
pub const fn get_strides_from_shape_array<const N: usize>(shape: [usize; N]) -> [usize; N] {
    let mut strides: [usize; N] = [0; N];
    let mut stride = 1;
    let mut i = N;
    while i > 0 {
        i -= 1;
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// Returns the number of elements addressed by `shape`.
///
/// The empty shape (rank 0) holds exactly one element.
#[inline]
pub fn numel(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Checks that every dimension of `shape` is at least 1.
///
/// # Errors
///
/// Returns [`TensorError::ShapeMismatch`] naming the first empty axis.
pub fn validate_shape(shape: &[usize]) -> Result<(), TensorError> {
    if let Some(axis) = shape.iter().position(|&d| d == 0) {
        return Err(TensorError::shape_mismatch(
            format!("axis {axis} has size 0, every dimension must be at least 1"),
            &shape.iter().map(|&d| d.max(1)).collect::<Vec<_>>(),
            shape,
        ));
    }
    Ok(())
}

/// Checks that an index has exactly one component per axis.
pub(crate) fn check_index_rank(index_len: usize, shape: &[usize]) -> Result<(), TensorError> {
    if index_len != shape.len() {
        return Err(TensorError::ShapeMismatch {
            message: "index rank does not match array rank".to_string(),
            expected: format!("{} indices for shape {:?}", shape.len(), shape),
            actual: format!("{index_len} indices"),
        });
    }
    Ok(())
}

/// Converts a multi-index to a flat offset: `sum(index[i] * strides[i])`.
///
/// # Errors
///
/// Returns [`TensorError::ShapeMismatch`] when the index rank differs from the
/// shape rank and [`TensorError::IndexOutOfRange`] when a component is not
/// smaller than its dimension.
///
/// ```rust
/// use tenmat_tensor::layout::ravel_index;
///
/// assert_eq!(ravel_index(&[1, 2], &[2, 3], &[3, 1]).unwrap(), 5);
/// assert!(ravel_index(&[2, 0], &[2, 3], &[3, 1]).is_err());
/// ```
pub fn ravel_index(index: &[usize], shape: &[usize], strides: &[usize]) -> Result<usize, TensorError> {
    check_index_rank(index.len(), shape)?;
    let mut offset = 0;
    for (axis, ((&idx, &dim), &stride)) in index.iter().zip(shape).zip(strides).enumerate() {
        if idx >= dim {
            return Err(TensorError::index_out_of_range(axis, idx, dim));
        }
        offset += idx * stride;
    }
    Ok(offset)
}

/// Converts a flat row-major position back to a multi-index.
///
/// This is the exact inverse of [`ravel_index`] with row-major strides.
///
/// # Errors
///
/// Returns [`TensorError::IndexOutOfRange`] when `offset >= numel(shape)`.
///
/// ```rust
/// use tenmat_tensor::layout::unravel_index;
///
/// assert_eq!(unravel_index(5, &[2, 3]).unwrap(), vec![1, 2]);
/// ```
pub fn unravel_index(offset: usize, shape: &[usize]) -> Result<Vec<usize>, TensorError> {
    let size = numel(shape);
    if offset >= size {
        return Err(TensorError::index_out_of_range(0, offset, size));
    }
    let strides = get_strides_from_shape(shape);
    let mut index = vec![0; shape.len()];
    let mut rem = offset;
    for (idx, &stride) in index.iter_mut().zip(&strides) {
        *idx = rem / stride;
        rem %= stride;
    }
    Ok(index)
}

/// Returns true if `strides` are the row-major strides of `shape`.
///
/// Axes of size 1 are ignored since their stride never contributes to an offset.
pub fn is_standard_layout(shape: &[usize], strides: &[usize]) -> bool {
    let mut expected_stride: usize = 1;
    for (&dim, &stride) in shape.iter().rev().zip(strides.iter().rev()) {
        if dim != 1 && stride != expected_stride {
            return false;
        }
        expected_stride = expected_stride.saturating_mul(dim);
    }
    true
}

/// Number of buffer elements a shape/stride pair can reach: the largest
/// offset plus one.
pub fn span_len(shape: &[usize], strides: &[usize]) -> usize {
    if shape.iter().any(|&d| d == 0) {
        return 0;
    }
    1 + shape
        .iter()
        .zip(strides)
        .map(|(&d, &s)| (d - 1) * s)
        .sum::<usize>()
}

/// Iterator over the buffer offsets of a shape/stride pair in row-major
/// logical order.
///
/// ```rust
/// use tenmat_tensor::layout::OffsetIter;
///
/// // transposed 2x3 layout
/// let offsets: Vec<usize> = OffsetIter::new(&[3, 2], &[1, 3]).collect();
/// assert_eq!(offsets, vec![0, 3, 1, 4, 2, 5]);
/// ```
#[derive(Debug, Clone)]
pub struct OffsetIter<'a> {
    shape: &'a [usize],
    strides: &'a [usize],
    index: Vec<usize>,
    offset: usize,
    remaining: usize,
}

impl<'a> OffsetIter<'a> {
    /// Creates an iterator over all offsets addressed by `shape` and `strides`.
    pub fn new(shape: &'a [usize], strides: &'a [usize]) -> Self {
        Self {
            shape,
            strides,
            index: vec![0; shape.len()],
            offset: 0,
            remaining: numel(shape),
        }
    }
}

impl Iterator for OffsetIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.offset;
        self.remaining -= 1;

        // increment index, carrying into the slower axes
        for dim in (0..self.shape.len()).rev() {
            self.index[dim] += 1;
            self.offset += self.strides[dim];
            if self.index[dim] < self.shape[dim] {
                break;
            }
            self.offset -= self.index[dim] * self.strides[dim];
            self.index[dim] = 0;
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for OffsetIter<'_> {}
