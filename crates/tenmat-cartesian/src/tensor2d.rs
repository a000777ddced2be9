use num_traits::{Float, One, Zero};
use tenmat_tensor::TensorError;

use crate::{error::CartesianError, tensor2::Tensor2, tensor2s::Tensor2s};

/// A diagonal rank-2 cartesian tensor in `ND` dimensions.
///
/// Only the `ND` diagonal components are stored. Off-diagonal components
/// read as zero and cannot be written.
///
/// ```rust
/// use tenmat_cartesian::{Dot, Tensor2d};
///
/// let a = Tensor2d::<f64, 3>::from_array([1.0, 2.0, 4.0]);
/// assert_eq!(a.get(0, 1).unwrap(), 0.0);
/// assert_eq!(a.det(), 8.0);
/// assert_eq!(a.dot(&a.inv().unwrap()), Tensor2d::identity());
/// ```
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tensor2d<T, const ND: usize>([T; ND]);

impl<T, const ND: usize> Tensor2d<T, ND> {
    /// Wraps the diagonal components.
    pub const fn from_array(diagonal: [T; ND]) -> Self {
        Self(diagonal)
    }

    /// Creates a tensor by evaluating `f(i)` for every diagonal component.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnMut(usize) -> T,
    {
        Self(std::array::from_fn(f))
    }

    /// Creates a tensor with every diagonal component set to `value`.
    pub fn from_val(value: T) -> Self
    where
        T: Clone,
    {
        Self::from_fn(|_| value.clone())
    }

    /// Creates the zero tensor.
    pub fn zeros() -> Self
    where
        T: Zero,
    {
        Self::from_fn(|_| T::zero())
    }

    /// Creates the second-order identity.
    pub fn identity() -> Self
    where
        T: One,
    {
        Self::from_fn(|_| T::one())
    }

    /// Creates a tensor from its `ND` diagonal components.
    ///
    /// # Errors
    ///
    /// Returns a `LengthMismatch` error if the number of values is wrong.
    pub fn from_list(values: &[T]) -> Result<Self, CartesianError>
    where
        T: Clone,
    {
        if values.len() != ND {
            return Err(TensorError::length_mismatch(ND, values.len()).into());
        }
        Ok(Self::from_fn(|i| values[i].clone()))
    }

    /// Compresses a full tensor whose off-diagonal components are all zero.
    ///
    /// # Errors
    ///
    /// Returns an `Unsupported` error if an off-diagonal component is non-zero.
    pub fn from_dense(dense: &Tensor2<T, ND>) -> Result<Self, CartesianError>
    where
        T: Zero + Copy,
    {
        let a = dense.rows();
        if let Some((i, j)) = (0..ND)
            .flat_map(|i| (0..ND).map(move |j| (i, j)))
            .find(|&(i, j)| i != j && !a[i][j].is_zero())
        {
            return Err(TensorError::unsupported(
                "diagonal compression",
                format!("off-diagonal component ({i}, {j}) is non-zero"),
            )
            .into());
        }
        Ok(Self::from_fn(|i| a[i][i]))
    }

    fn check_index(i: usize, j: usize) -> Result<(), TensorError> {
        match [i, j].iter().position(|&x| x >= ND) {
            Some(axis) => Err(TensorError::index_out_of_range(axis, [i, j][axis], ND)),
            None => Ok(()),
        }
    }

    /// Returns the storage position of the diagonal component `(i, i)`.
    ///
    /// # Errors
    ///
    /// Returns an `IndexOutOfRange` error for indices not below `ND` and an
    /// `Unsupported` error for off-diagonal components, which have no storage.
    pub fn compress(i: usize, j: usize) -> Result<usize, CartesianError> {
        Self::check_index(i, j)?;
        if i != j {
            return Err(TensorError::unsupported(
                "diagonal compression",
                format!("component ({i}, {j}) is not stored"),
            )
            .into());
        }
        Ok(i)
    }

    /// Returns the component `(k, k)` stored at `k`.
    pub fn decompress(k: usize) -> Result<[usize; 2], CartesianError> {
        if k >= ND {
            return Err(TensorError::index_out_of_range(0, k, ND).into());
        }
        Ok([k, k])
    }

    /// Returns the fixed shape `[ND, ND]`.
    #[inline]
    pub const fn shape(&self) -> [usize; 2] {
        [ND, ND]
    }

    /// Returns the number of logical components, `ND * ND`.
    #[inline]
    pub const fn numel(&self) -> usize {
        ND * ND
    }

    /// Returns the diagonal components.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Returns the diagonal components, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.0
    }

    /// Returns the diagonal components.
    #[inline]
    pub fn as_array(&self) -> &[T; ND] {
        &self.0
    }

    /// Returns an iterator over the diagonal components.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Returns the component `(i, j)`, zero off the diagonal.
    pub fn get(&self, i: usize, j: usize) -> Result<T, CartesianError>
    where
        T: Zero + Copy,
    {
        Self::check_index(i, j)?;
        Ok(self.at(i, j))
    }

    /// Returns the diagonal component `(i, i)` mutably.
    ///
    /// # Errors
    ///
    /// Off-diagonal components cannot be written, see [`Tensor2d::compress`].
    pub fn get_mut(&mut self, i: usize, j: usize) -> Result<&mut T, CartesianError> {
        let k = Self::compress(i, j)?;
        Ok(&mut self.0[k])
    }

    #[inline]
    pub(crate) fn at(&self, i: usize, j: usize) -> T
    where
        T: Zero + Copy,
    {
        if i == j {
            self.0[i]
        } else {
            T::zero()
        }
    }

    /// Expands to a full tensor.
    pub fn to_dense(&self) -> Tensor2<T, ND>
    where
        T: Zero + Copy,
    {
        Tensor2::from_fn(|i, j| self.at(i, j))
    }

    /// Expands to a symmetric tensor.
    pub fn to_symmetric(&self) -> Tensor2s<T, ND>
    where
        T: Zero + Copy,
    {
        Tensor2s::from_fn(|i, j| self.at(i, j))
    }

    /// Applies `f` to every diagonal component.
    pub fn map<U, F>(&self, f: F) -> Tensor2d<U, ND>
    where
        T: Copy,
        F: Fn(T) -> U,
    {
        Tensor2d::from_fn(|i| f(self.0[i]))
    }

    pub(crate) fn zip_map<F>(&self, other: &Self, f: F) -> Self
    where
        T: Copy,
        F: Fn(T, T) -> T,
    {
        Self::from_fn(|i| f(self.0[i], other.0[i]))
    }
}

impl<T: Float, const ND: usize> Tensor2d<T, ND> {
    /// Transpose, which is the tensor itself.
    pub fn transpose(&self) -> Self {
        *self
    }

    /// Trace `A_ii`.
    pub fn trace(&self) -> T {
        self.iter().fold(T::zero(), |acc, &x| acc + x)
    }

    /// Determinant, the product of the diagonal, in any dimension.
    pub fn det(&self) -> T {
        self.iter().fold(T::one(), |acc, &x| acc * x)
    }

    /// Inverse, the reciprocal of every diagonal component, in any dimension.
    ///
    /// # Errors
    ///
    /// Returns [`CartesianError::SingularMatrix`] if a diagonal component is
    /// exactly zero.
    pub fn inv(&self) -> Result<Self, CartesianError> {
        if self.iter().any(|x| x.is_zero()) {
            log::debug!("refusing to invert a diagonal tensor with a zero component");
            return Err(CartesianError::SingularMatrix);
        }
        Ok(self.map(|x| x.recip()))
    }

    /// Deviatoric part `A - tr(A) / ND * I`, still diagonal.
    pub fn dev(&self) -> Self {
        let mean = self.trace() / T::from(ND).unwrap_or_else(T::nan);
        self.map(|x| x - mean)
    }

    /// Frobenius norm.
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
}

impl<T: Zero + Copy, const ND: usize> From<Tensor2d<T, ND>> for Tensor2<T, ND> {
    fn from(a: Tensor2d<T, ND>) -> Self {
        a.to_dense()
    }
}

impl<T: Zero + Copy, const ND: usize> From<Tensor2d<T, ND>> for Tensor2s<T, ND> {
    fn from(a: Tensor2d<T, ND>) -> Self {
        a.to_symmetric()
    }
}

impl<T: Zero + Copy + std::fmt::Display, const ND: usize> std::fmt::Display for Tensor2d<T, ND> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.to_dense(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn off_diagonal_reads_zero() -> Result<(), CartesianError> {
        let mut a = Tensor2d::<f64, 3>::from_list(&[1.0, 2.0, 3.0])?;
        assert_eq!(a.get(1, 1)?, 2.0);
        assert_eq!(a.get(0, 2)?, 0.0);
        *a.get_mut(2, 2)? = 5.0;
        assert_eq!(a.as_slice(), &[1.0, 2.0, 5.0]);
        assert!(matches!(
            a.get_mut(0, 1),
            Err(CartesianError::TensorError(TensorError::Unsupported { .. }))
        ));
        assert!(matches!(
            a.get(3, 0),
            Err(CartesianError::TensorError(TensorError::IndexOutOfRange { .. }))
        ));
        assert_eq!(Tensor2d::<f64, 3>::decompress(Tensor2d::<f64, 3>::compress(1, 1)?)?, [1, 1]);
        assert!(Tensor2d::<f64, 3>::decompress(3).is_err());
        Ok(())
    }

    #[test]
    fn dense_and_symmetric_expansion() -> Result<(), CartesianError> {
        let a = Tensor2d::<f64, 2>::from_array([3.0, -1.0]);
        let dense = a.to_dense();
        assert_eq!(dense.rows(), &[[3.0, 0.0], [0.0, -1.0]]);
        assert!(dense.is_diagonal());
        assert_eq!(Tensor2d::from_dense(&dense)?, a);
        assert_eq!(Tensor2s::from(a).to_dense(), dense);
        assert_eq!(Tensor2::from(a), dense);

        let full = Tensor2::<f64, 2>::from_array([[3.0, 0.5], [0.0, -1.0]]);
        assert!(matches!(
            Tensor2d::from_dense(&full),
            Err(CartesianError::TensorError(TensorError::Unsupported { .. }))
        ));
        Ok(())
    }

    #[test]
    fn algebra_matches_dense() -> Result<(), CartesianError> {
        let a = Tensor2d::<f64, 3>::from_array([2.0, -4.0, 0.5]);
        let dense = a.to_dense();
        assert_eq!(a.det(), dense.det());
        assert_eq!(a.trace(), dense.trace());
        assert_relative_eq!(a.norm(), dense.norm());
        assert_relative_eq!(a.abs_sum(), dense.abs_sum());
        assert_eq!(a.norm_max(), 4.0);
        assert_eq!(a.inv()?.as_slice(), &[0.5, -0.25, 2.0]);
        assert_eq!(a.inv()?.to_dense(), dense.inv()?);
        assert_relative_eq!(a.dev().trace(), 0.0, epsilon = 1e-12);
        assert_eq!(a.transpose(), a);
        Ok(())
    }

    #[test]
    fn zero_component_is_singular() {
        let a = Tensor2d::<f64, 4>::from_array([1.0, 2.0, 0.0, 3.0]);
        assert_eq!(a.det(), 0.0);
        assert_eq!(a.inv(), Err(CartesianError::SingularMatrix));
    }
}
