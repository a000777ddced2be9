use num_traits::{Float, One, Zero};
use tenmat_tensor::{data::Data, ArrayBase, ArrayView, ArrayViewMut, IndexPolicy, TinyMatrix};

use crate::error::CartesianError;

/// A rank-2 cartesian tensor in `ND` dimensions, stored row-major.
///
/// ```rust
/// use tenmat_cartesian::Tensor2;
///
/// let a = Tensor2::<f64, 2>::from_list(&[1.0, 2.0, 3.0, 4.0]).unwrap();
/// assert_eq!(a.det(), -2.0);
/// assert_eq!(a.inv().unwrap().as_slice(), &[-2.0, 1.0, 1.5, -0.5]);
/// ```
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tensor2<T, const ND: usize>(TinyMatrix<T, ND, ND>);

impl<T, const ND: usize> Tensor2<T, ND> {
    /// Wraps a nested array of rows.
    pub const fn from_array(data: [[T; ND]; ND]) -> Self {
        Self(TinyMatrix::from_array(data))
    }

    /// Creates a tensor by evaluating `f(i, j)` for every component.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        Self(TinyMatrix::from_fn(f))
    }

    /// Creates a tensor with every component set to `value`.
    pub fn from_val(value: T) -> Self
    where
        T: Clone,
    {
        Self(TinyMatrix::from_val(value))
    }

    /// Creates the zero tensor.
    pub fn zeros() -> Self
    where
        T: Zero + Clone,
    {
        Self(TinyMatrix::zeros())
    }

    /// Creates a tensor of ones.
    pub fn ones() -> Self
    where
        T: One + Clone,
    {
        Self(TinyMatrix::ones())
    }

    /// Creates the second-order identity `I_ij = delta_ij`.
    pub fn identity() -> Self
    where
        T: Zero + One,
    {
        Self(TinyMatrix::identity())
    }

    /// Creates a tensor from `ND * ND` row-major components.
    ///
    /// # Errors
    ///
    /// Returns a `LengthMismatch` error if the number of values is wrong.
    pub fn from_list(values: &[T]) -> Result<Self, CartesianError>
    where
        T: Clone,
    {
        Ok(Self(TinyMatrix::from_slice(values)?))
    }

    /// Copies an array of shape `[ND, ND]`.
    ///
    /// # Errors
    ///
    /// Returns a `ShapeMismatch` error for any other shape.
    pub fn from_array_base<S, P>(array: &ArrayBase<S, P>) -> Result<Self, CartesianError>
    where
        S: Data<Elem = T>,
        P: IndexPolicy,
        T: Clone,
    {
        Ok(Self(TinyMatrix::from_array_base(array)?))
    }

    /// Reinterprets `ND * ND` contiguous row-major values as a tensor, without copying.
    pub fn map_slice(values: &[T]) -> Result<&Self, CartesianError> {
        let tiny = TinyMatrix::<T, ND, ND>::map_slice(values)?;
        // SAFETY: Tensor2 is a transparent wrapper over TinyMatrix
        Ok(unsafe { &*(tiny as *const TinyMatrix<T, ND, ND> as *const Self) })
    }

    /// Reinterprets `ND * ND` contiguous values as a mutable tensor, without copying.
    pub fn map_slice_mut(values: &mut [T]) -> Result<&mut Self, CartesianError> {
        let tiny = TinyMatrix::<T, ND, ND>::map_slice_mut(values)?;
        // SAFETY: Tensor2 is a transparent wrapper over TinyMatrix
        Ok(unsafe { &mut *(tiny as *mut TinyMatrix<T, ND, ND> as *mut Self) })
    }

    /// Accepts only the fixed shape `[ND, ND]`.
    pub fn resize(&mut self, shape: &[usize]) -> Result<(), CartesianError> {
        Ok(self.0.resize(shape)?)
    }

    /// Returns the fixed shape `[ND, ND]`.
    #[inline]
    pub const fn shape(&self) -> [usize; 2] {
        [ND, ND]
    }

    /// Returns the number of components.
    #[inline]
    pub const fn numel(&self) -> usize {
        ND * ND
    }

    /// Returns the components in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.0.as_slice()
    }

    /// Returns the components in row-major order, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.0.as_mut_slice()
    }

    /// Returns the rows.
    #[inline]
    pub fn rows(&self) -> &[[T; ND]; ND] {
        self.0.rows()
    }

    /// Returns the component `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> Result<&T, CartesianError> {
        Ok(self.0.get(i, j)?)
    }

    /// Returns the component `(i, j)` mutably.
    pub fn get_mut(&mut self, i: usize, j: usize) -> Result<&mut T, CartesianError> {
        Ok(self.0.get_mut(i, j)?)
    }

    /// Returns an iterator over the components in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Returns a general read-only view of the components.
    pub fn view(&self) -> ArrayView<'_, T> {
        self.0.view()
    }

    /// Returns a general writable view of the components.
    pub fn view_mut(&mut self) -> ArrayViewMut<'_, T> {
        self.0.view_mut()
    }

    /// Applies `f` to every component.
    pub fn map<U, F>(&self, f: F) -> Tensor2<U, ND>
    where
        T: Copy,
        F: Fn(T) -> U,
    {
        let a = self.rows();
        Tensor2::from_fn(|i, j| f(a[i][j]))
    }

    #[inline]
    pub(crate) fn at(&self, i: usize, j: usize) -> T
    where
        T: Copy,
    {
        self.rows()[i][j]
    }

    pub(crate) fn zip_map<F>(&self, other: &Self, f: F) -> Self
    where
        T: Copy,
        F: Fn(T, T) -> T,
    {
        let (a, b) = (self.rows(), other.rows());
        Self::from_fn(|i, j| f(a[i][j], b[i][j]))
    }
}

impl<T: Float, const ND: usize> Tensor2<T, ND> {
    /// Transpose `C_ij = A_ji`.
    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }

    /// Trace `A_ii`.
    pub fn trace(&self) -> T {
        let a = self.rows();
        (0..ND).fold(T::zero(), |acc, i| acc + a[i][i])
    }

    /// Symmetric part `(A + A^T) / 2`.
    pub fn sym(&self) -> Self {
        let a = self.rows();
        let half = T::from(0.5).unwrap_or_else(T::nan);
        Self::from_fn(|i, j| (a[i][j] + a[j][i]) * half)
    }

    /// Skew-symmetric part `(A - A^T) / 2`.
    pub fn skew(&self) -> Self {
        let a = self.rows();
        let half = T::from(0.5).unwrap_or_else(T::nan);
        Self::from_fn(|i, j| (a[i][j] - a[j][i]) * half)
    }

    /// Deviatoric part `A - tr(A) / ND * I`.
    pub fn dev(&self) -> Self {
        let a = self.rows();
        let mean = self.trace() / T::from(ND).unwrap_or_else(T::nan);
        Self::from_fn(|i, j| if i == j { a[i][j] - mean } else { a[i][j] })
    }

    /// Frobenius norm `sqrt(A : A)`.
    pub fn norm(&self) -> T {
        self.iter().fold(T::zero(), |acc, &x| acc + x * x).sqrt()
    }

    /// Sum of the absolute values of the components.
    pub fn abs_sum(&self) -> T {
        self.iter().fold(T::zero(), |acc, &x| acc + x.abs())
    }

    /// Largest absolute component.
    pub fn norm_max(&self) -> T {
        self.iter().fold(T::zero(), |acc, &x| acc.max(x.abs()))
    }

    /// True if `A == A^T` exactly.
    pub fn is_symmetric(&self) -> bool {
        let a = self.rows();
        (0..ND).all(|i| (0..i).all(|j| a[i][j] == a[j][i]))
    }

    /// True if every off-diagonal component is exactly zero.
    pub fn is_diagonal(&self) -> bool {
        let a = self.rows();
        (0..ND).all(|i| (0..ND).all(|j| i == j || a[i][j] == T::zero()))
    }
}

fn singular<T>() -> Result<T, CartesianError> {
    log::debug!("refusing to invert a tensor with zero determinant");
    Err(CartesianError::SingularMatrix)
}

impl<T: Float> Tensor2<T, 2> {
    /// Determinant by cofactor expansion.
    pub fn det(&self) -> T {
        let [[a00, a01], [a10, a11]] = *self.rows();
        a00 * a11 - a01 * a10
    }

    /// Inverse from the adjugate.
    ///
    /// # Errors
    ///
    /// Returns [`CartesianError::SingularMatrix`] if the determinant is
    /// exactly zero. Nearly singular tensors are inverted as they are.
    pub fn inv(&self) -> Result<Self, CartesianError> {
        let det = self.det();
        if det == T::zero() {
            return singular();
        }
        let [[a00, a01], [a10, a11]] = *self.rows();
        Ok(Self::from_array([
            [a11 / det, -a01 / det],
            [-a10 / det, a00 / det],
        ]))
    }
}

impl<T: Float> Tensor2<T, 3> {
    /// Determinant by cofactor expansion along the first row.
    pub fn det(&self) -> T {
        let [[a00, a01, a02], [a10, a11, a12], [a20, a21, a22]] = *self.rows();
        a00 * (a11 * a22 - a12 * a21) - a01 * (a10 * a22 - a12 * a20)
            + a02 * (a10 * a21 - a11 * a20)
    }

    /// Inverse from the adjugate.
    ///
    /// # Errors
    ///
    /// Returns [`CartesianError::SingularMatrix`] if the determinant is
    /// exactly zero. Nearly singular tensors are inverted as they are.
    pub fn inv(&self) -> Result<Self, CartesianError> {
        let det = self.det();
        if det == T::zero() {
            return singular();
        }
        let [[a00, a01, a02], [a10, a11, a12], [a20, a21, a22]] = *self.rows();
        Ok(Self::from_array([
            [
                (a11 * a22 - a12 * a21) / det,
                (a02 * a21 - a01 * a22) / det,
                (a01 * a12 - a02 * a11) / det,
            ],
            [
                (a12 * a20 - a10 * a22) / det,
                (a00 * a22 - a02 * a20) / det,
                (a02 * a10 - a00 * a12) / det,
            ],
            [
                (a10 * a21 - a11 * a20) / det,
                (a01 * a20 - a00 * a21) / det,
                (a00 * a11 - a01 * a10) / det,
            ],
        ]))
    }
}

impl<T, const ND: usize> std::ops::Index<[usize; 2]> for Tensor2<T, ND> {
    type Output = T;

    fn index(&self, index: [usize; 2]) -> &T {
        &self.0[index]
    }
}

impl<T, const ND: usize> std::ops::IndexMut<[usize; 2]> for Tensor2<T, ND> {
    fn index_mut(&mut self, index: [usize; 2]) -> &mut T {
        &mut self.0[index]
    }
}

impl<T: std::fmt::Display, const ND: usize> std::fmt::Display for Tensor2<T, ND> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.view(), f)
    }
}

impl<T, const ND: usize> From<[[T; ND]; ND]> for Tensor2<T, ND> {
    fn from(data: [[T; ND]; ND]) -> Self {
        Self::from_array(data)
    }
}
