use crate::{
    array::ArrayBase,
    data::{Data, DataMut},
    error::TensorError,
    layout,
    policy::{IndexPolicy, Periodic, Regular},
};

/// A non-owning, read-only view into a buffer owned elsewhere.
///
/// The view borrows the buffer for its lifetime `'a`, so the owner can
/// neither be dropped nor reallocated while the view exists. Strides are in
/// element units and may describe any non-contiguous layout that stays
/// inside the borrowed buffer.
///
/// # Examples
///
/// ```rust
/// use tenmat_tensor::ArrayView;
///
/// let buffer = [1, 2, 3, 4, 5, 6];
/// let view = ArrayView::<i32>::from_shape(&[2, 3], &buffer).unwrap();
/// assert_eq!(view[[1, 2]], 6);
///
/// // transpose without copying
/// let t = view.permute_axes(&[1, 0]).unwrap();
/// assert_eq!(t.to_owned().unwrap().as_slice(), &[1, 4, 2, 5, 3, 6]);
/// ```
pub type ArrayView<'a, T, P = Regular> = ArrayBase<&'a [T], P>;

/// A non-owning, writable view into a buffer owned elsewhere.
///
/// Every mutation writes straight into the borrowed buffer.
///
/// ```rust
/// use tenmat_tensor::ArrayViewMut;
///
/// let mut buffer = [0.0f64; 6];
/// let mut view = ArrayViewMut::<f64>::from_shape(&[2, 3], &mut buffer).unwrap();
/// view[[1, 2]] = 9.0;
/// assert_eq!(buffer[5], 9.0);
/// ```
pub type ArrayViewMut<'a, T, P = Regular> = ArrayBase<&'a mut [T], P>;

/// A read-only view addressed with periodic wrapping.
pub type PeriodicArrayView<'a, T> = ArrayView<'a, T, Periodic>;

/// A writable view addressed with periodic wrapping.
pub type PeriodicArrayViewMut<'a, T> = ArrayViewMut<'a, T, Periodic>;

/// Validates a shape/stride pair against a buffer of `len` elements.
fn check_strided(shape: &[usize], strides: &[usize], len: usize) -> Result<(), TensorError> {
    layout::validate_shape(shape)?;
    if strides.len() != shape.len() {
        return Err(TensorError::ShapeMismatch {
            message: "strides must have one entry per axis".to_string(),
            expected: format!("{} strides", shape.len()),
            actual: format!("{} strides", strides.len()),
        });
    }
    let span = layout::span_len(shape, strides);
    if span > len {
        return Err(TensorError::length_mismatch(span, len));
    }
    Ok(())
}

/// Checks that `axes` is a permutation of `0..rank`.
fn check_permutation(axes: &[usize], rank: usize) -> Result<(), TensorError> {
    let mut seen = vec![false; rank];
    if axes.len() != rank {
        return Err(TensorError::ShapeMismatch {
            message: "permutation must name every axis once".to_string(),
            expected: format!("{rank} axes"),
            actual: format!("{axes:?}"),
        });
    }
    for &axis in axes {
        if axis >= rank || seen[axis] {
            return Err(TensorError::ShapeMismatch {
                message: "permutation must name every axis once".to_string(),
                expected: format!("a permutation of 0..{rank}"),
                actual: format!("{axes:?}"),
            });
        }
        seen[axis] = true;
    }
    Ok(())
}

impl<'a, T, P: IndexPolicy> ArrayView<'a, T, P> {
    /// Wraps a row-major buffer holding exactly `numel(shape)` elements.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::LengthMismatch`] if the buffer length differs.
    pub fn from_shape(shape: &[usize], data: &'a [T]) -> Result<Self, TensorError> {
        layout::validate_shape(shape)?;
        let numel = layout::numel(shape);
        if numel != data.len() {
            return Err(TensorError::length_mismatch(numel, data.len()));
        }
        Ok(Self::from_parts(
            data,
            shape.to_vec(),
            layout::get_strides_from_shape(shape),
        ))
    }

    /// Wraps a buffer with caller supplied strides.
    ///
    /// Strides may alias elements, for example a stride of 0 repeats one
    /// element along an axis.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::LengthMismatch`] if the layout reaches past the
    /// end of the buffer.
    pub fn from_shape_strides(
        shape: &[usize],
        strides: &[usize],
        data: &'a [T],
    ) -> Result<Self, TensorError> {
        check_strided(shape, strides, data.len())?;
        Ok(Self::from_parts(data, shape.to_vec(), strides.to_vec()))
    }

    /// Wraps foreign memory described by a pointer, shape and strides.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null, aligned and valid for reads of
    /// `span_len(shape, strides)` elements for the whole lifetime `'a`, and
    /// the memory must not be mutated through another path meanwhile.
    pub unsafe fn from_raw_parts(
        ptr: *const T,
        shape: &[usize],
        strides: &[usize],
    ) -> Result<Self, TensorError> {
        check_strided(shape, strides, usize::MAX)?;
        let span = layout::span_len(shape, strides);
        log::trace!("wrapping {span} foreign elements as a view of shape {shape:?}");
        // SAFETY: guaranteed by the caller
        let data = unsafe { std::slice::from_raw_parts(ptr, span) };
        Ok(Self::from_parts(data, shape.to_vec(), strides.to_vec()))
    }

    /// Returns a view with the same lifetime as the wrapped buffer.
    pub fn reborrow(&self) -> ArrayView<'a, T, P> {
        Self::from_parts(self.data, self.shape.clone(), self.strides.clone())
    }
}

impl<'a, T, P: IndexPolicy> ArrayViewMut<'a, T, P> {
    /// Wraps a mutable row-major buffer holding exactly `numel(shape)` elements.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::LengthMismatch`] if the buffer length differs.
    pub fn from_shape(shape: &[usize], data: &'a mut [T]) -> Result<Self, TensorError> {
        layout::validate_shape(shape)?;
        let numel = layout::numel(shape);
        if numel != data.len() {
            return Err(TensorError::length_mismatch(numel, data.len()));
        }
        Ok(Self::from_parts(
            data,
            shape.to_vec(),
            layout::get_strides_from_shape(shape),
        ))
    }

    /// Wraps a mutable buffer with caller supplied strides.
    ///
    /// Two multi-indices may address the same element when strides alias;
    /// writes then land on the shared element in call order.
    pub fn from_shape_strides(
        shape: &[usize],
        strides: &[usize],
        data: &'a mut [T],
    ) -> Result<Self, TensorError> {
        check_strided(shape, strides, data.len())?;
        Ok(Self::from_parts(data, shape.to_vec(), strides.to_vec()))
    }

    /// Wraps foreign writable memory described by a pointer, shape and strides.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null, aligned and valid for reads and writes of
    /// `span_len(shape, strides)` elements for the whole lifetime `'a`, and
    /// no other reference may access the memory meanwhile.
    pub unsafe fn from_raw_parts_mut(
        ptr: *mut T,
        shape: &[usize],
        strides: &[usize],
    ) -> Result<Self, TensorError> {
        check_strided(shape, strides, usize::MAX)?;
        let span = layout::span_len(shape, strides);
        log::trace!("wrapping {span} foreign elements as a mutable view of shape {shape:?}");
        // SAFETY: guaranteed by the caller
        let data = unsafe { std::slice::from_raw_parts_mut(ptr, span) };
        Ok(Self::from_parts(data, shape.to_vec(), strides.to_vec()))
    }

    /// Returns a shorter-lived mutable view of the same elements.
    pub fn reborrow(&mut self) -> ArrayViewMut<'_, T, P> {
        ArrayBase::from_parts(&mut *self.data, self.shape.clone(), self.strides.clone())
    }

    /// Converts the mutable view into a read-only view of the same lifetime.
    pub fn into_view(self) -> ArrayView<'a, T, P> {
        let ArrayBase {
            data,
            shape,
            strides,
            ..
        } = self;
        let data: &'a [T] = data;
        ArrayBase::from_parts(data, shape, strides)
    }
}

impl<S: Data, P: IndexPolicy> ArrayBase<S, P> {
    /// Returns a read-only view of the array.
    pub fn view(&self) -> ArrayView<'_, S::Elem, P> {
        ArrayBase::from_parts(self.data.as_slice(), self.shape.clone(), self.strides.clone())
    }

    /// Returns a view with the axes reordered, without copying.
    ///
    /// Axis `i` of the result is axis `axes[i]` of `self`.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if `axes` is not a permutation
    /// of the array's axes.
    pub fn permute_axes(&self, axes: &[usize]) -> Result<ArrayView<'_, S::Elem, P>, TensorError> {
        check_permutation(axes, self.ndim())?;
        let shape = axes.iter().map(|&a| self.shape[a]).collect();
        let strides = axes.iter().map(|&a| self.strides[a]).collect();
        Ok(ArrayBase::from_parts(self.data.as_slice(), shape, strides))
    }

    /// Returns a view repeating the array to `shape`, without copying.
    ///
    /// Axes are aligned from the right. Missing leading axes and axes of size
    /// 1 get stride 0; every other axis must match exactly.
    ///
    /// ```rust
    /// use tenmat_tensor::{Array, CpuAllocator};
    ///
    /// let row = Array::<i32>::from_shape_vec(&[3], vec![1, 2, 3], CpuAllocator).unwrap();
    /// let grid = row.broadcast(&[2, 3]).unwrap();
    /// assert_eq!(grid.strides(), &[0, 1]);
    /// assert_eq!(grid[[1, 2]], 3);
    /// ```
    pub fn broadcast(&self, shape: &[usize]) -> Result<ArrayView<'_, S::Elem, P>, TensorError> {
        layout::validate_shape(shape)?;
        if shape.len() < self.ndim() {
            return Err(TensorError::shape_mismatch(
                "cannot broadcast to a lower rank",
                &self.shape,
                shape,
            ));
        }
        let lead = shape.len() - self.ndim();
        let mut strides = vec![0; shape.len()];
        for (axis, (&dim, &stride)) in self.shape.iter().zip(&self.strides).enumerate() {
            let target = shape[lead + axis];
            if dim == target {
                strides[lead + axis] = stride;
            } else if dim != 1 {
                return Err(TensorError::shape_mismatch(
                    format!("axis {axis} of size {dim} cannot broadcast to {target}"),
                    &self.shape,
                    shape,
                ));
            }
        }
        Ok(ArrayBase::from_parts(
            self.data.as_slice(),
            shape.to_vec(),
            strides,
        ))
    }
}

/// Views a nested rank-4 array, whose row-major layout is known statically.
///
/// ```rust
/// use tenmat_tensor::ArrayView;
///
/// let nested = [[[[0, 1], [2, 3]], [[4, 5], [6, 7]]]];
/// let view = ArrayView::<i32>::from(&nested);
/// assert_eq!(view.shape(), &[1, 2, 2, 2]);
/// assert_eq!(view[[0, 1, 1, 0]], 6);
/// ```
impl<'a, T, P, const I: usize, const J: usize, const K: usize, const L: usize>
    From<&'a [[[[T; L]; K]; J]; I]> for ArrayView<'a, T, P>
where
    P: IndexPolicy,
{
    fn from(data: &'a [[[[T; L]; K]; J]; I]) -> Self {
        let shape = [I, J, K, L];
        Self::from_parts(
            data.as_flattened().as_flattened().as_flattened(),
            shape.to_vec(),
            layout::get_strides_from_shape(&shape),
        )
    }
}

/// Writable counterpart of the nested rank-4 conversion.
impl<'a, T, P, const I: usize, const J: usize, const K: usize, const L: usize>
    From<&'a mut [[[[T; L]; K]; J]; I]> for ArrayViewMut<'a, T, P>
where
    P: IndexPolicy,
{
    fn from(data: &'a mut [[[[T; L]; K]; J]; I]) -> Self {
        let shape = [I, J, K, L];
        Self::from_parts(
            data.as_flattened_mut()
                .as_flattened_mut()
                .as_flattened_mut(),
            shape.to_vec(),
            layout::get_strides_from_shape(&shape),
        )
    }
}

impl<S: DataMut, P: IndexPolicy> ArrayBase<S, P> {
    /// Returns a writable view of the array.
    pub fn view_mut(&mut self) -> ArrayViewMut<'_, S::Elem, P> {
        ArrayBase::from_parts(
            self.data.as_mut_slice(),
            self.shape.clone(),
            self.strides.clone(),
        )
    }
}
