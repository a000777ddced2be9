//! Fixed-size vectors and matrices stored inline.
//!
//! [`TinyVector`] and [`TinyMatrix`] keep their elements in plain arrays, so
//! they never touch the heap and are `Copy` whenever the element is. Their
//! shape is part of the type; any attempt to change it fails.

use std::marker::PhantomData;

use num_traits::{One, Zero};

use crate::{
    array::ArrayBase,
    data::Data,
    error::TensorError,
    policy::{IndexPolicy, Periodic, Regular},
    view::{ArrayView, ArrayViewMut},
};

/// A vector of `N` elements stored inline.
///
/// ```rust
/// use tenmat_tensor::TinyVector;
///
/// let v = TinyVector::<f64, 3>::from_array([1.0, 2.0, 3.0]);
/// assert_eq!(v[2], 3.0);
/// assert_eq!(v.shape(), [3]);
/// ```
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TinyVector<T, const N: usize, P: IndexPolicy = Regular> {
    data: [T; N],
    policy: PhantomData<P>,
}

/// A row-major `M x N` matrix stored inline.
///
/// ```rust
/// use tenmat_tensor::TinyMatrix;
///
/// let m = TinyMatrix::<i32, 2, 3>::from_array([[1, 2, 3], [4, 5, 6]]);
/// assert_eq!(m[[1, 0]], 4);
/// assert_eq!(m.as_slice(), &[1, 2, 3, 4, 5, 6]);
/// ```
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TinyMatrix<T, const M: usize, const N: usize, P: IndexPolicy = Regular> {
    data: [[T; N]; M],
    policy: PhantomData<P>,
}

/// A fixed-size vector addressed with periodic wrapping.
pub type PeriodicTinyVector<T, const N: usize> = TinyVector<T, N, Periodic>;

/// A fixed-size matrix addressed with periodic wrapping.
pub type PeriodicTinyMatrix<T, const M: usize, const N: usize> = TinyMatrix<T, M, N, Periodic>;

fn fixed_shape_error(kind: &str, fixed: &[usize], requested: &[usize]) -> TensorError {
    TensorError::shape_mismatch(format!("{kind} has a fixed shape"), fixed, requested)
}

impl<T, const N: usize, P: IndexPolicy> TinyVector<T, N, P> {
    /// Wraps an array of elements.
    pub const fn from_array(data: [T; N]) -> Self {
        Self {
            data,
            policy: PhantomData,
        }
    }

    /// Creates a vector with every element set to `value`.
    pub fn from_val(value: T) -> Self
    where
        T: Clone,
    {
        Self::from_array(std::array::from_fn(|_| value.clone()))
    }

    /// Creates a vector of zeros.
    pub fn zeros() -> Self
    where
        T: Zero + Clone,
    {
        Self::from_val(T::zero())
    }

    /// Creates a vector of ones.
    pub fn ones() -> Self
    where
        T: One + Clone,
    {
        Self::from_val(T::one())
    }

    /// Creates a vector by copying exactly `N` elements.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::LengthMismatch`] if `values.len() != N`.
    pub fn from_slice(values: &[T]) -> Result<Self, TensorError>
    where
        T: Clone,
    {
        if values.len() != N {
            return Err(TensorError::length_mismatch(N, values.len()));
        }
        Ok(Self::from_array(std::array::from_fn(|i| values[i].clone())))
    }

    /// Copies the elements of an array of shape `[N]`.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if the shape is not `[N]`.
    pub fn from_array_base<S, Q>(array: &ArrayBase<S, Q>) -> Result<Self, TensorError>
    where
        S: Data<Elem = T>,
        Q: IndexPolicy,
        T: Clone,
    {
        if array.shape() != [N] {
            return Err(fixed_shape_error("TinyVector", &[N], array.shape()));
        }
        let values: Vec<T> = array.iter().cloned().collect();
        Self::from_slice(&values)
    }

    /// Reinterprets a slice of exactly `N` elements as a vector, without copying.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::LengthMismatch`] if `values.len() != N`.
    pub fn map_slice(values: &[T]) -> Result<&Self, TensorError> {
        if values.len() != N {
            return Err(TensorError::length_mismatch(N, values.len()));
        }
        // SAFETY: Self is a transparent wrapper over [T; N] and the slice holds
        // exactly N contiguous elements borrowed for the returned lifetime.
        Ok(unsafe { &*(values.as_ptr() as *const Self) })
    }

    /// Reinterprets a mutable slice of exactly `N` elements as a vector, without copying.
    pub fn map_slice_mut(values: &mut [T]) -> Result<&mut Self, TensorError> {
        if values.len() != N {
            return Err(TensorError::length_mismatch(N, values.len()));
        }
        // SAFETY: as in map_slice, with exclusive access carried over
        Ok(unsafe { &mut *(values.as_mut_ptr() as *mut Self) })
    }

    /// Returns the fixed shape `[N]`.
    #[inline]
    pub const fn shape(&self) -> [usize; 1] {
        [N]
    }

    /// Returns the number of elements.
    #[inline]
    pub const fn numel(&self) -> usize {
        N
    }

    /// Returns the elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Returns the inner array.
    #[inline]
    pub fn into_array(self) -> [T; N] {
        self.data
    }

    /// Returns a reference to the inner array.
    #[inline]
    pub fn as_array(&self) -> &[T; N] {
        &self.data
    }

    /// Returns a mutable reference to the inner array.
    #[inline]
    pub fn as_mut_array(&mut self) -> &mut [T; N] {
        &mut self.data
    }

    /// Returns the element at `index` under the vector's policy.
    pub fn get(&self, index: P::Index) -> Result<&T, TensorError> {
        let i = P::resolve(index, 0, N)?;
        Ok(&self.data[i])
    }

    /// Returns the element at `index` mutably.
    pub fn get_mut(&mut self, index: P::Index) -> Result<&mut T, TensorError> {
        let i = P::resolve(index, 0, N)?;
        Ok(&mut self.data[i])
    }

    /// Accepts only the fixed shape `[N]`.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] for any other shape.
    pub fn resize(&mut self, shape: &[usize]) -> Result<(), TensorError> {
        if shape != [N] {
            return Err(fixed_shape_error("TinyVector", &[N], shape));
        }
        Ok(())
    }

    /// Sets every element to `value`.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.data.iter_mut().for_each(|x| *x = value.clone());
    }

    /// Returns an iterator over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Returns a general read-only view of the vector.
    pub fn view(&self) -> ArrayView<'_, T, P> {
        ArrayBase::from_parts(&self.data[..], vec![N], vec![1])
    }

    /// Returns a general writable view of the vector.
    pub fn view_mut(&mut self) -> ArrayViewMut<'_, T, P> {
        ArrayBase::from_parts(&mut self.data[..], vec![N], vec![1])
    }
}

impl<T, const N: usize, P: IndexPolicy> std::ops::Index<P::Index> for TinyVector<T, N, P> {
    type Output = T;

    fn index(&self, index: P::Index) -> &T {
        match self.get(index) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T, const N: usize, P: IndexPolicy> std::ops::IndexMut<P::Index> for TinyVector<T, N, P> {
    fn index_mut(&mut self, index: P::Index) -> &mut T {
        match self.get_mut(index) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T, const M: usize, const N: usize, P: IndexPolicy> TinyMatrix<T, M, N, P> {
    /// Wraps a nested array of rows.
    pub const fn from_array(data: [[T; N]; M]) -> Self {
        Self {
            data,
            policy: PhantomData,
        }
    }

    /// Creates a matrix with every element set to `value`.
    pub fn from_val(value: T) -> Self
    where
        T: Clone,
    {
        Self::from_array(std::array::from_fn(|_| {
            std::array::from_fn(|_| value.clone())
        }))
    }

    /// Creates a matrix of zeros.
    pub fn zeros() -> Self
    where
        T: Zero + Clone,
    {
        Self::from_val(T::zero())
    }

    /// Creates a matrix of ones.
    pub fn ones() -> Self
    where
        T: One + Clone,
    {
        Self::from_val(T::one())
    }

    /// Creates a matrix by evaluating `f(i, j)` for every element.
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        Self::from_array(std::array::from_fn(|i| std::array::from_fn(|j| f(i, j))))
    }

    /// Creates a matrix from `M * N` row-major elements.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::LengthMismatch`] if `values.len() != M * N`.
    pub fn from_slice(values: &[T]) -> Result<Self, TensorError>
    where
        T: Clone,
    {
        if values.len() != M * N {
            return Err(TensorError::length_mismatch(M * N, values.len()));
        }
        Ok(Self::from_fn(|i, j| values[i * N + j].clone()))
    }

    /// Copies the elements of an array of shape `[M, N]`.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if the shape is not `[M, N]`.
    pub fn from_array_base<S, Q>(array: &ArrayBase<S, Q>) -> Result<Self, TensorError>
    where
        S: Data<Elem = T>,
        Q: IndexPolicy,
        T: Clone,
    {
        if array.shape() != [M, N] {
            return Err(fixed_shape_error("TinyMatrix", &[M, N], array.shape()));
        }
        let values: Vec<T> = array.iter().cloned().collect();
        Self::from_slice(&values)
    }

    /// Reinterprets a slice of exactly `M * N` elements as a matrix, without copying.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::LengthMismatch`] if `values.len() != M * N`.
    pub fn map_slice(values: &[T]) -> Result<&Self, TensorError> {
        if values.len() != M * N {
            return Err(TensorError::length_mismatch(M * N, values.len()));
        }
        // SAFETY: Self is a transparent wrapper over [[T; N]; M], which has the
        // layout of M * N contiguous elements, and the slice holds exactly that.
        Ok(unsafe { &*(values.as_ptr() as *const Self) })
    }

    /// Reinterprets a mutable slice of exactly `M * N` elements as a matrix.
    pub fn map_slice_mut(values: &mut [T]) -> Result<&mut Self, TensorError> {
        if values.len() != M * N {
            return Err(TensorError::length_mismatch(M * N, values.len()));
        }
        // SAFETY: as in map_slice, with exclusive access carried over
        Ok(unsafe { &mut *(values.as_mut_ptr() as *mut Self) })
    }

    /// Returns the fixed shape `[M, N]`.
    #[inline]
    pub const fn shape(&self) -> [usize; 2] {
        [M, N]
    }

    /// Returns the number of elements.
    #[inline]
    pub const fn numel(&self) -> usize {
        M * N
    }

    /// Returns the elements in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.data.as_flattened()
    }

    /// Returns the elements in row-major order, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data.as_flattened_mut()
    }

    /// Returns the rows.
    #[inline]
    pub fn rows(&self) -> &[[T; N]; M] {
        &self.data
    }

    /// Returns the rows mutably.
    #[inline]
    pub fn rows_mut(&mut self) -> &mut [[T; N]; M] {
        &mut self.data
    }

    /// Returns the element at `(i, j)` under the matrix's policy.
    pub fn get(&self, i: P::Index, j: P::Index) -> Result<&T, TensorError> {
        let i = P::resolve(i, 0, M)?;
        let j = P::resolve(j, 1, N)?;
        Ok(&self.data[i][j])
    }

    /// Returns the element at `(i, j)` mutably.
    pub fn get_mut(&mut self, i: P::Index, j: P::Index) -> Result<&mut T, TensorError> {
        let i = P::resolve(i, 0, M)?;
        let j = P::resolve(j, 1, N)?;
        Ok(&mut self.data[i][j])
    }

    /// Accepts only the fixed shape `[M, N]`.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] for any other shape.
    pub fn resize(&mut self, shape: &[usize]) -> Result<(), TensorError> {
        if shape != [M, N] {
            return Err(fixed_shape_error("TinyMatrix", &[M, N], shape));
        }
        Ok(())
    }

    /// Sets every element to `value`.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.as_mut_slice().iter_mut().for_each(|x| *x = value.clone());
    }

    /// Returns the transposed matrix.
    pub fn transpose(&self) -> TinyMatrix<T, N, M, P>
    where
        T: Clone,
    {
        TinyMatrix::from_fn(|i, j| self.data[j][i].clone())
    }

    /// Returns an iterator over the elements in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns a general read-only view of the matrix.
    pub fn view(&self) -> ArrayView<'_, T, P> {
        ArrayBase::from_parts(self.as_slice(), vec![M, N], vec![N, 1])
    }

    /// Returns a general writable view of the matrix.
    pub fn view_mut(&mut self) -> ArrayViewMut<'_, T, P> {
        ArrayBase::from_parts(self.as_mut_slice(), vec![M, N], vec![N, 1])
    }
}

impl<T, const N: usize, P: IndexPolicy> TinyMatrix<T, N, N, P> {
    /// Creates the identity matrix (Kronecker delta).
    pub fn identity() -> Self
    where
        T: Zero + One,
    {
        Self::from_fn(|i, j| if i == j { T::one() } else { T::zero() })
    }
}

impl<T, const M: usize, const N: usize, P: IndexPolicy> std::ops::Index<[P::Index; 2]>
    for TinyMatrix<T, M, N, P>
{
    type Output = T;

    fn index(&self, [i, j]: [P::Index; 2]) -> &T {
        match self.get(i, j) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T, const M: usize, const N: usize, P: IndexPolicy> std::ops::IndexMut<[P::Index; 2]>
    for TinyMatrix<T, M, N, P>
{
    fn index_mut(&mut self, [i, j]: [P::Index; 2]) -> &mut T {
        match self.get_mut(i, j) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}
