use num_traits::{Float, One, Zero};
use tenmat_tensor::{data::Data, ArrayBase, ArrayView, ArrayViewMut, IndexPolicy, TensorError};

use crate::error::CartesianError;

type Components<T, const ND: usize> = [[[[T; ND]; ND]; ND]; ND];

fn kronecker<T: Zero + One>(i: usize, j: usize) -> T {
    if i == j {
        T::one()
    } else {
        T::zero()
    }
}

/// A rank-4 cartesian tensor in `ND` dimensions.
///
/// Components are stored inline in row-major order, so `(i, j, k, l)` lives
/// at flat offset `((i * ND + j) * ND + k) * ND + l`.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tensor4<T, const ND: usize> {
    data: Components<T, ND>,
}

impl<T, const ND: usize> Tensor4<T, ND> {
    /// Wraps a nested array of components.
    pub const fn from_array(data: Components<T, ND>) -> Self {
        Self { data }
    }

    /// Creates a tensor by evaluating `f(i, j, k, l)` for every component.
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize, usize) -> T,
    {
        Self::from_array(std::array::from_fn(|i| {
            std::array::from_fn(|j| {
                std::array::from_fn(|k| std::array::from_fn(|l| f(i, j, k, l)))
            })
        }))
    }

    /// Creates a tensor with every component set to `value`.
    pub fn from_val(value: T) -> Self
    where
        T: Clone,
    {
        Self::from_fn(|_, _, _, _| value.clone())
    }

    /// Creates the zero tensor.
    pub fn zeros() -> Self
    where
        T: Zero + Clone,
    {
        Self::from_val(T::zero())
    }

    /// Creates a tensor of ones.
    pub fn ones() -> Self
    where
        T: One + Clone,
    {
        Self::from_val(T::one())
    }

    /// Creates a tensor from `ND^4` row-major components.
    ///
    /// # Errors
    ///
    /// Returns a `LengthMismatch` error if the number of values is wrong.
    pub fn from_list(values: &[T]) -> Result<Self, CartesianError>
    where
        T: Clone,
    {
        let numel = ND * ND * ND * ND;
        if values.len() != numel {
            return Err(TensorError::length_mismatch(numel, values.len()).into());
        }
        Ok(Self::from_fn(|i, j, k, l| {
            values[((i * ND + j) * ND + k) * ND + l].clone()
        }))
    }

    /// Copies an array of shape `[ND, ND, ND, ND]`.
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
        if array.shape() != [ND; 4] {
            return Err(Self::fixed_shape(array.shape()).into());
        }
        let values: Vec<T> = array.iter().cloned().collect();
        Self::from_list(&values)
    }

    /// Reinterprets `ND^4` contiguous row-major values as a tensor, without copying.
    pub fn map_slice(values: &[T]) -> Result<&Self, CartesianError> {
        let numel = ND * ND * ND * ND;
        if values.len() != numel {
            return Err(TensorError::length_mismatch(numel, values.len()).into());
        }
        // SAFETY: Self is a transparent wrapper over a nested array holding
        // exactly ND^4 contiguous elements.
        Ok(unsafe { &*(values.as_ptr() as *const Self) })
    }

    /// Reinterprets `ND^4` contiguous values as a mutable tensor, without copying.
    pub fn map_slice_mut(values: &mut [T]) -> Result<&mut Self, CartesianError> {
        let numel = ND * ND * ND * ND;
        if values.len() != numel {
            return Err(TensorError::length_mismatch(numel, values.len()).into());
        }
        // SAFETY: as in map_slice, with exclusive access carried over
        Ok(unsafe { &mut *(values.as_mut_ptr() as *mut Self) })
    }

    fn fixed_shape(requested: &[usize]) -> TensorError {
        TensorError::shape_mismatch("Tensor4 has a fixed shape", &[ND; 4], requested)
    }

    /// Accepts only the fixed shape `[ND, ND, ND, ND]`.
    pub fn resize(&mut self, shape: &[usize]) -> Result<(), CartesianError> {
        if shape != [ND; 4] {
            return Err(Self::fixed_shape(shape).into());
        }
        Ok(())
    }

    /// Returns the fixed shape `[ND, ND, ND, ND]`.
    #[inline]
    pub const fn shape(&self) -> [usize; 4] {
        [ND; 4]
    }

    /// Returns the number of components.
    #[inline]
    pub const fn numel(&self) -> usize {
        ND * ND * ND * ND
    }

    /// Returns the components in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.data.as_flattened().as_flattened().as_flattened()
    }

    /// Returns the components in row-major order, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data
            .as_flattened_mut()
            .as_flattened_mut()
            .as_flattened_mut()
    }

    /// Returns the nested components.
    #[inline]
    pub fn as_array(&self) -> &Components<T, ND> {
        &self.data
    }

    /// Returns the component `(i, j, k, l)`.
    pub fn get(&self, i: usize, j: usize, k: usize, l: usize) -> Result<&T, CartesianError> {
        Self::check_index([i, j, k, l])?;
        Ok(&self.data[i][j][k][l])
    }

    /// Returns the component `(i, j, k, l)` mutably.
    pub fn get_mut(
        &mut self,
        i: usize,
        j: usize,
        k: usize,
        l: usize,
    ) -> Result<&mut T, CartesianError> {
        Self::check_index([i, j, k, l])?;
        Ok(&mut self.data[i][j][k][l])
    }

    fn check_index(index: [usize; 4]) -> Result<(), TensorError> {
        match index.iter().position(|&i| i >= ND) {
            Some(axis) => Err(TensorError::index_out_of_range(axis, index[axis], ND)),
            None => Ok(()),
        }
    }

    /// Returns an iterator over the components in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns a general read-only view of the components.
    pub fn view(&self) -> ArrayView<'_, T> {
        ArrayView::from(&self.data)
    }

    /// Returns a general writable view of the components.
    pub fn view_mut(&mut self) -> ArrayViewMut<'_, T> {
        ArrayViewMut::from(&mut self.data)
    }

    /// Applies `f` to every component.
    pub fn map<U, F>(&self, f: F) -> Tensor4<U, ND>
    where
        T: Copy,
        F: Fn(T) -> U,
    {
        let a = &self.data;
        Tensor4::from_fn(|i, j, k, l| f(a[i][j][k][l]))
    }

    pub(crate) fn zip_map<F>(&self, other: &Self, f: F) -> Self
    where
        T: Copy,
        F: Fn(T, T) -> T,
    {
        let (a, b) = (&self.data, &other.data);
        Self::from_fn(|i, j, k, l| f(a[i][j][k][l], b[i][j][k][l]))
    }
}

impl<T: Float, const ND: usize> Tensor4<T, ND> {
    /// Identity `I_ijkl = delta_ik delta_jl`, so that `I : A = A`.
    pub fn identity() -> Self {
        Self::from_fn(|i, j, k, l| kronecker::<T>(i, k) * kronecker(j, l))
    }

    /// Right-transposed identity `Irt_ijkl = delta_il delta_jk`, so that `Irt : A = A^T`.
    pub fn identity_rt() -> Self {
        Self::from_fn(|i, j, k, l| kronecker::<T>(i, l) * kronecker(j, k))
    }

    /// Dyadic identity `II_ijkl = delta_ij delta_kl`, so that `II : A = tr(A) I`.
    pub fn identity_ii() -> Self {
        Self::from_fn(|i, j, k, l| kronecker::<T>(i, j) * kronecker(k, l))
    }

    /// Symmetric identity `Is = (I + Irt) / 2`, so that `Is : A = sym(A)`.
    pub fn identity_sym() -> Self {
        let half = T::from(0.5).unwrap_or_else(T::nan);
        Self::from_fn(|i, j, k, l| {
            (kronecker::<T>(i, k) * kronecker(j, l) + kronecker::<T>(i, l) * kronecker(j, k))
                * half
        })
    }

    /// Deviatoric identity `Id = Is - II / ND`, so that `Id : A = dev(sym(A))`.
    pub fn identity_dev() -> Self {
        let nd = T::from(ND).unwrap_or_else(T::nan);
        let (sym, ii) = (Self::identity_sym(), Self::identity_ii());
        sym.zip_map(&ii, |s, d| s - d / nd)
    }

    /// Full transpose `C_lkji = A_ijkl`.
    pub fn transpose(&self) -> Self {
        let a = &self.data;
        Self::from_fn(|i, j, k, l| a[l][k][j][i])
    }

    /// Transpose of the last pair of indices, `C_ijlk = A_ijkl`.
    pub fn transpose_right(&self) -> Self {
        let a = &self.data;
        Self::from_fn(|i, j, k, l| a[i][j][l][k])
    }

    /// Transpose of the first pair of indices, `C_jikl = A_ijkl`.
    pub fn transpose_left(&self) -> Self {
        let a = &self.data;
        Self::from_fn(|i, j, k, l| a[j][i][k][l])
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

impl<T, const ND: usize> std::ops::Index<[usize; 4]> for Tensor4<T, ND> {
    type Output = T;

    fn index(&self, [i, j, k, l]: [usize; 4]) -> &T {
        match self.get(i, j, k, l) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T, const ND: usize> std::ops::IndexMut<[usize; 4]> for Tensor4<T, ND> {
    fn index_mut(&mut self, [i, j, k, l]: [usize; 4]) -> &mut T {
        match self.get_mut(i, j, k, l) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T, const ND: usize> From<Components<T, ND>> for Tensor4<T, ND> {
    fn from(data: Components<T, ND>) -> Self {
        Self::from_array(data)
    }
}
