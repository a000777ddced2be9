use num_traits::{Float, One, Zero};
use tenmat_tensor::{data::Data, ArrayBase, ArrayView, ArrayViewMut, IndexPolicy, TinyVector};

use crate::error::CartesianError;

/// A rank-1 cartesian tensor in `ND` dimensions.
///
/// Stored inline as `ND` components, never on the heap.
///
/// ```rust
/// use tenmat_cartesian::{Dot, Vector};
///
/// let a = Vector::<f64, 3>::from_array([1.0, 2.0, 2.0]);
/// assert_eq!(a.dot(&a), 9.0);
/// assert_eq!(a.length(), 3.0);
/// ```
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector<T, const ND: usize>(TinyVector<T, ND>);

impl<T, const ND: usize> Vector<T, ND> {
    /// Wraps an array of components.
    pub const fn from_array(data: [T; ND]) -> Self {
        Self(TinyVector::from_array(data))
    }

    /// Creates a vector by evaluating `f(i)` for every component.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnMut(usize) -> T,
    {
        Self::from_array(std::array::from_fn(f))
    }

    /// Creates a vector with every component set to `value`.
    pub fn from_val(value: T) -> Self
    where
        T: Clone,
    {
        Self(TinyVector::from_val(value))
    }

    /// Creates the zero vector.
    pub fn zeros() -> Self
    where
        T: Zero + Clone,
    {
        Self(TinyVector::zeros())
    }

    /// Creates a vector of ones.
    pub fn ones() -> Self
    where
        T: One + Clone,
    {
        Self(TinyVector::ones())
    }

    /// Creates a vector from exactly `ND` components.
    ///
    /// # Errors
    ///
    /// Returns a `LengthMismatch` error if `values.len() != ND`.
    pub fn from_list(values: &[T]) -> Result<Self, CartesianError>
    where
        T: Clone,
    {
        Ok(Self(TinyVector::from_slice(values)?))
    }

    /// Copies an array of shape `[ND]`.
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
        Ok(Self(TinyVector::from_array_base(array)?))
    }

    /// Reinterprets `ND` contiguous values as a vector, without copying.
    pub fn map_slice(values: &[T]) -> Result<&Self, CartesianError> {
        let tiny = TinyVector::<T, ND>::map_slice(values)?;
        // SAFETY: Vector is a transparent wrapper over TinyVector
        Ok(unsafe { &*(tiny as *const TinyVector<T, ND> as *const Self) })
    }

    /// Reinterprets `ND` contiguous values as a mutable vector, without copying.
    pub fn map_slice_mut(values: &mut [T]) -> Result<&mut Self, CartesianError> {
        let tiny = TinyVector::<T, ND>::map_slice_mut(values)?;
        // SAFETY: Vector is a transparent wrapper over TinyVector
        Ok(unsafe { &mut *(tiny as *mut TinyVector<T, ND> as *mut Self) })
    }

    /// Accepts only the fixed shape `[ND]`.
    pub fn resize(&mut self, shape: &[usize]) -> Result<(), CartesianError> {
        Ok(self.0.resize(shape)?)
    }

    /// Returns the fixed shape `[ND]`.
    #[inline]
    pub const fn shape(&self) -> [usize; 1] {
        [ND]
    }

    /// Returns the number of components.
    #[inline]
    pub const fn numel(&self) -> usize {
        ND
    }

    /// Returns the components as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.0.as_slice()
    }

    /// Returns the components as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.0.as_mut_slice()
    }

    /// Returns the components as an array.
    #[inline]
    pub fn as_array(&self) -> &[T; ND] {
        self.0.as_array()
    }

    /// Returns the component `i`.
    pub fn get(&self, i: usize) -> Result<&T, CartesianError> {
        Ok(self.0.get(i)?)
    }

    /// Returns the component `i` mutably.
    pub fn get_mut(&mut self, i: usize) -> Result<&mut T, CartesianError> {
        Ok(self.0.get_mut(i)?)
    }

    /// Returns an iterator over the components.
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
    pub fn map<U, F>(&self, f: F) -> Vector<U, ND>
    where
        T: Copy,
        F: Fn(T) -> U,
    {
        let a = self.as_array();
        Vector::from_fn(|i| f(a[i]))
    }

    pub(crate) fn zip_map<F>(&self, other: &Self, f: F) -> Self
    where
        T: Copy,
        F: Fn(T, T) -> T,
    {
        let (a, b) = (self.as_array(), other.as_array());
        Self::from_fn(|i| f(a[i], b[i]))
    }
}

impl<T: Float, const ND: usize> Vector<T, ND> {
    /// Euclidean length `sqrt(a . a)`.
    pub fn length(&self) -> T {
        self.iter().fold(T::zero(), |acc, &x| acc + x * x).sqrt()
    }

    /// Frobenius norm, equal to the length for a vector.
    pub fn norm(&self) -> T {
        self.length()
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

impl<T: Float> Vector<T, 3> {
    /// Cross product `a x b`.
    ///
    /// ```rust
    /// use tenmat_cartesian::Vector;
    ///
    /// let x = Vector::<f64, 3>::from_array([1.0, 0.0, 0.0]);
    /// let y = Vector::<f64, 3>::from_array([0.0, 1.0, 0.0]);
    /// assert_eq!(x.cross(&y).as_slice(), &[0.0, 0.0, 1.0]);
    /// ```
    pub fn cross(&self, other: &Self) -> Self {
        let [a0, a1, a2] = *self.as_array();
        let [b0, b1, b2] = *other.as_array();
        Self::from_array([a1 * b2 - a2 * b1, a2 * b0 - a0 * b2, a0 * b1 - a1 * b0])
    }
}

impl<T, const ND: usize> std::ops::Index<usize> for Vector<T, ND> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.0[i]
    }
}

impl<T, const ND: usize> std::ops::IndexMut<usize> for Vector<T, ND> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.0[i]
    }
}

impl<T: std::fmt::Display, const ND: usize> std::fmt::Display for Vector<T, ND> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.view(), f)
    }
}

impl<T, const ND: usize> From<[T; ND]> for Vector<T, ND> {
    fn from(data: [T; ND]) -> Self {
        Self::from_array(data)
    }
}

impl<T, const ND: usize> TryFrom<&[T]> for Vector<T, ND>
where
    T: Clone,
{
    type Error = CartesianError;

    fn try_from(values: &[T]) -> Result<Self, CartesianError> {
        Self::from_list(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tenmat_tensor::{Array, CpuAllocator, TensorError};

    #[test]
    fn constructors() -> Result<(), CartesianError> {
        assert_eq!(Vector::<f64, 2>::zeros().as_slice(), &[0.0, 0.0]);
        assert_eq!(Vector::<f64, 2>::ones().as_slice(), &[1.0, 1.0]);
        assert_eq!(Vector::<f64, 3>::from_val(2.0).as_slice(), &[2.0; 3]);
        let v = Vector::<f64, 3>::from_list(&[1.0, 2.0, 3.0])?;
        assert_eq!(v[1], 2.0);
        assert!(matches!(
            Vector::<f64, 3>::from_list(&[1.0]),
            Err(CartesianError::TensorError(TensorError::LengthMismatch { .. }))
        ));
        Ok(())
    }

    #[test]
    fn from_general_array() -> Result<(), CartesianError> {
        let a = Array::<f64>::from_shape_vec(&[3], vec![1.0, 2.0, 3.0], CpuAllocator)?;
        let v = Vector::<f64, 3>::from_array_base(&a)?;
        assert_eq!(v.as_slice(), a.as_slice());
        let b = Array::<f64>::zeros(&[2], CpuAllocator)?;
        assert!(matches!(
            Vector::<f64, 3>::from_array_base(&b),
            Err(CartesianError::TensorError(TensorError::ShapeMismatch { .. }))
        ));
        Ok(())
    }

    #[test]
    fn map_slice_aliases_buffer() -> Result<(), CartesianError> {
        let mut buffer = [0.0f64; 3];
        {
            let v = Vector::<f64, 3>::map_slice_mut(&mut buffer)?;
            v[2] = 5.0;
        }
        assert_eq!(buffer[2], 5.0);
        assert!(Vector::<f64, 2>::map_slice(&buffer).is_err());
        Ok(())
    }

    #[test]
    fn norms() {
        let v = Vector::<f64, 2>::from_array([3.0, -4.0]);
        assert_relative_eq!(v.length(), 5.0);
        assert_relative_eq!(v.norm(), 5.0);
        assert_relative_eq!(v.abs_sum(), 7.0);
        assert_relative_eq!(v.norm_max(), 4.0);
    }

    #[test]
    fn cross_is_orthogonal() {
        let a = Vector::<f64, 3>::from_array([1.0, 2.0, 3.0]);
        let b = Vector::<f64, 3>::from_array([-2.0, 0.5, 4.0]);
        let c = a.cross(&b);
        let dot = |x: &Vector<f64, 3>, y: &Vector<f64, 3>| {
            x.iter().zip(y.iter()).map(|(p, q)| p * q).sum::<f64>()
        };
        assert_relative_eq!(dot(&a, &c), 0.0, epsilon = 1e-12);
        assert_relative_eq!(dot(&b, &c), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn fixed_shape() {
        let mut v = Vector::<f32, 3>::zeros();
        assert!(v.resize(&[3]).is_ok());
        assert!(v.resize(&[2]).is_err());
        assert_eq!(v.shape(), [3]);
        assert!(v.get(3).is_err());
    }
}
