use num_traits::{Float, One, Zero};
use tenmat_tensor::TensorError;

use crate::{error::CartesianError, tensor2::Tensor2};

/// A symmetric rank-2 cartesian tensor in `ND` dimensions.
///
/// Only the upper triangle is stored, packed row by row: for `ND = 3` the
/// stored order is `(0,0) (0,1) (0,2) (1,1) (1,2) (2,2)`. Component `(i, j)`
/// and `(j, i)` are the same storage slot, so symmetry holds by construction.
///
/// ```rust
/// use tenmat_cartesian::{Tensor2, Tensor2s};
///
/// let a = Tensor2s::<f64, 2>::from_list(&[1.0, 2.0, 3.0]).unwrap();
/// assert_eq!(a[[1, 0]], 2.0);
/// assert_eq!(a.to_dense(), Tensor2::from_array([[1.0, 2.0], [2.0, 3.0]]));
/// assert_eq!(a.det(), -1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tensor2s<T, const ND: usize> {
    // packed triangle in the first PACKED_LEN slots, tail kept at zero
    data: [[T; ND]; ND],
}

impl<T, const ND: usize> Tensor2s<T, ND> {
    /// Number of independent components, `ND (ND + 1) / 2`.
    pub const PACKED_LEN: usize = ND * (ND + 1) / 2;

    #[inline]
    pub(crate) fn packed_index(i: usize, j: usize) -> usize {
        let (i, j) = if i <= j { (i, j) } else { (j, i) };
        i * (2 * ND - i + 1) / 2 + j - i
    }

    fn check_index(i: usize, j: usize) -> Result<(), TensorError> {
        match [i, j].iter().position(|&x| x >= ND) {
            Some(axis) => Err(TensorError::index_out_of_range(axis, [i, j][axis], ND)),
            None => Ok(()),
        }
    }

    /// Returns the packed storage position of component `(i, j)`.
    ///
    /// # Errors
    ///
    /// Returns an `IndexOutOfRange` error if `i` or `j` is not below `ND`.
    pub fn compress(i: usize, j: usize) -> Result<usize, CartesianError> {
        Self::check_index(i, j)?;
        Ok(Self::packed_index(i, j))
    }

    /// Returns the upper-triangle component `(i, j)`, `i <= j`, stored at `k`.
    ///
    /// # Errors
    ///
    /// Returns an `IndexOutOfRange` error if `k` is not below [`Self::PACKED_LEN`].
    pub fn decompress(k: usize) -> Result<[usize; 2], CartesianError> {
        let mut rest = k;
        for i in 0..ND {
            let row = ND - i;
            if rest < row {
                return Ok([i, i + rest]);
            }
            rest -= row;
        }
        Err(TensorError::index_out_of_range(0, k, Self::PACKED_LEN).into())
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

    /// Returns the packed upper triangle.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data.as_flattened()[..Self::PACKED_LEN]
    }

    /// Returns the packed upper triangle, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data.as_flattened_mut()[..Self::PACKED_LEN]
    }

    /// Returns an iterator over the packed upper triangle.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns the component `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> Result<&T, CartesianError> {
        Self::check_index(i, j)?;
        Ok(&self.as_slice()[Self::packed_index(i, j)])
    }

    /// Returns the component `(i, j)` mutably. Writing it also sets `(j, i)`.
    pub fn get_mut(&mut self, i: usize, j: usize) -> Result<&mut T, CartesianError> {
        Self::check_index(i, j)?;
        Ok(&mut self.as_mut_slice()[Self::packed_index(i, j)])
    }

    #[inline]
    pub(crate) fn at(&self, i: usize, j: usize) -> T
    where
        T: Copy,
    {
        self.as_slice()[Self::packed_index(i, j)]
    }

    /// Expands to a full tensor.
    pub fn to_dense(&self) -> Tensor2<T, ND>
    where
        T: Copy,
    {
        Tensor2::from_fn(|i, j| self.at(i, j))
    }
}

impl<T: Zero, const ND: usize> Tensor2s<T, ND> {
    /// Creates a tensor by evaluating `f(i, j)` on the upper triangle, `i <= j`.
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut data: [[T; ND]; ND] =
            std::array::from_fn(|_| std::array::from_fn(|_| T::zero()));
        let packed = data.as_flattened_mut();
        let mut k = 0;
        for i in 0..ND {
            for j in i..ND {
                packed[k] = f(i, j);
                k += 1;
            }
        }
        Self { data }
    }

    /// Creates a tensor with every component set to `value`.
    pub fn from_val(value: T) -> Self
    where
        T: Clone,
    {
        Self::from_fn(|_, _| value.clone())
    }

    /// Creates the zero tensor.
    pub fn zeros() -> Self {
        Self::from_fn(|_, _| T::zero())
    }

    /// Creates a tensor of ones.
    pub fn ones() -> Self
    where
        T: One,
    {
        Self::from_fn(|_, _| T::one())
    }

    /// Creates the second-order identity.
    pub fn identity() -> Self
    where
        T: One,
    {
        Self::from_fn(|i, j| if i == j { T::one() } else { T::zero() })
    }

    /// Creates a tensor from its packed upper triangle.
    ///
    /// # Errors
    ///
    /// Returns a `LengthMismatch` error unless exactly [`Self::PACKED_LEN`]
    /// values are given.
    pub fn from_list(values: &[T]) -> Result<Self, CartesianError>
    where
        T: Clone,
    {
        if values.len() != Self::PACKED_LEN {
            return Err(TensorError::length_mismatch(Self::PACKED_LEN, values.len()).into());
        }
        let mut packed = values.iter();
        Ok(Self::from_fn(|_, _| match packed.next() {
            Some(value) => value.clone(),
            None => T::zero(),
        }))
    }

    /// Compresses a full tensor, which must be exactly symmetric.
    ///
    /// # Errors
    ///
    /// Returns an `Unsupported` error if some `A_ij != A_ji`.
    pub fn from_dense(dense: &Tensor2<T, ND>) -> Result<Self, CartesianError>
    where
        T: Copy + PartialEq,
    {
        let a = dense.rows();
        if let Some((i, j)) = (0..ND)
            .flat_map(|i| (0..i).map(move |j| (i, j)))
            .find(|&(i, j)| a[i][j] != a[j][i])
        {
            return Err(TensorError::unsupported(
                "symmetric compression",
                format!("component ({i}, {j}) differs from ({j}, {i})"),
            )
            .into());
        }
        Ok(Self::from_fn(|i, j| a[i][j]))
    }

    /// Applies `f` to every stored component.
    pub fn map<U, F>(&self, f: F) -> Tensor2s<U, ND>
    where
        T: Copy,
        U: Zero,
        F: Fn(T) -> U,
    {
        Tensor2s::from_fn(|i, j| f(self.at(i, j)))
    }

    pub(crate) fn zip_map<F>(&self, other: &Self, f: F) -> Self
    where
        T: Copy,
        F: Fn(T, T) -> T,
    {
        Self::from_fn(|i, j| f(self.at(i, j), other.at(i, j)))
    }
}

impl<T: Float, const ND: usize> Tensor2s<T, ND> {
    /// Transpose, which is the tensor itself.
    pub fn transpose(&self) -> Self {
        *self
    }

    /// Trace `A_ii`.
    pub fn trace(&self) -> T {
        (0..ND).fold(T::zero(), |acc, i| acc + self.at(i, i))
    }

    /// Deviatoric part `A - tr(A) / ND * I`, still symmetric.
    pub fn dev(&self) -> Self {
        let mean = self.trace() / T::from(ND).unwrap_or_else(T::nan);
        Self::from_fn(|i, j| if i == j { self.at(i, j) - mean } else { self.at(i, j) })
    }

    // off-diagonal slots stand for two components
    fn fold_full<F>(&self, f: F) -> T
    where
        F: Fn(T) -> T,
    {
        let two = T::one() + T::one();
        self.as_slice()
            .iter()
            .enumerate()
            .fold(T::zero(), |acc, (k, &x)| match Self::decompress(k) {
                Ok([i, j]) if i != j => acc + two * f(x),
                _ => acc + f(x),
            })
    }

    /// Frobenius norm over all `ND * ND` components.
    pub fn norm(&self) -> T {
        self.fold_full(|x| x * x).sqrt()
    }

    /// Sum of the absolute values of all `ND * ND` components.
    pub fn abs_sum(&self) -> T {
        self.fold_full(|x| x.abs())
    }

    /// Largest absolute component.
    pub fn norm_max(&self) -> T {
        self.iter().fold(T::zero(), |acc, &x| acc.max(x.abs()))
    }
}

impl<T: Float> Tensor2s<T, 2> {
    /// Determinant `a00 a11 - a01^2`.
    pub fn det(&self) -> T {
        self.to_dense().det()
    }

    /// Inverse, symmetric again.
    ///
    /// # Errors
    ///
    /// Returns [`CartesianError::SingularMatrix`] if the determinant is exactly zero.
    pub fn inv(&self) -> Result<Self, CartesianError> {
        let inv = self.to_dense().inv()?;
        Ok(Self::from_fn(|i, j| inv[[i, j]]))
    }
}

impl<T: Float> Tensor2s<T, 3> {
    /// Determinant by cofactor expansion.
    pub fn det(&self) -> T {
        self.to_dense().det()
    }

    /// Inverse, symmetric again.
    ///
    /// # Errors
    ///
    /// Returns [`CartesianError::SingularMatrix`] if the determinant is exactly zero.
    pub fn inv(&self) -> Result<Self, CartesianError> {
        let inv = self.to_dense().inv()?;
        Ok(Self::from_fn(|i, j| inv[[i, j]]))
    }
}

impl<T, const ND: usize> std::ops::Index<[usize; 2]> for Tensor2s<T, ND> {
    type Output = T;

    fn index(&self, [i, j]: [usize; 2]) -> &T {
        match self.get(i, j) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T, const ND: usize> std::ops::IndexMut<[usize; 2]> for Tensor2s<T, ND> {
    fn index_mut(&mut self, [i, j]: [usize; 2]) -> &mut T {
        match self.get_mut(i, j) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T: Copy, const ND: usize> From<Tensor2s<T, ND>> for Tensor2<T, ND> {
    fn from(a: Tensor2s<T, ND>) -> Self {
        a.to_dense()
    }
}

impl<T: Copy + std::fmt::Display, const ND: usize> std::fmt::Display for Tensor2s<T, ND> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.to_dense(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::Rng;

    #[test]
    fn packed_layout() -> Result<(), CartesianError> {
        let a = Tensor2s::<f64, 3>::from_list(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0])?;
        assert_eq!(Tensor2s::<f64, 3>::PACKED_LEN, 6);
        assert_eq!(a.as_slice().len(), 6);
        assert_eq!(a.numel(), 9);
        assert_eq!(
            a.to_dense().rows(),
            &[[0.0, 1.0, 2.0], [1.0, 3.0, 4.0], [2.0, 4.0, 5.0]]
        );
        assert_eq!(Tensor2s::<f64, 3>::compress(2, 1)?, 4);
        assert_eq!(Tensor2s::<f64, 3>::compress(1, 2)?, 4);
        for k in 0..6 {
            let [i, j] = Tensor2s::<f64, 3>::decompress(k)?;
            assert!(i <= j);
            assert_eq!(Tensor2s::<f64, 3>::compress(i, j)?, k);
        }
        assert_eq!(Tensor2s::<f64, 3>::decompress(4)?, [1, 2]);
        assert!(Tensor2s::<f64, 3>::decompress(6).is_err());
        assert!(Tensor2s::<f64, 3>::compress(3, 0).is_err());
        Ok(())
    }

    #[test]
    fn writes_are_mirrored() {
        let mut a = Tensor2s::<f64, 3>::zeros();
        a[[2, 0]] = 7.0;
        assert_eq!(a[[0, 2]], 7.0);
        assert!(a.to_dense().is_symmetric());
        assert!(matches!(
            a.get(0, 3),
            Err(CartesianError::TensorError(TensorError::IndexOutOfRange { .. }))
        ));
    }

    #[test]
    fn dense_round_trip() -> Result<(), CartesianError> {
        let mut rng = rand::rng();
        let full = Tensor2::<f64, 3>::from_fn(|_, _| rng.random_range(-1.0..1.0)).sym();
        let a = Tensor2s::from_dense(&full)?;
        assert_eq!(a.to_dense(), full);
        assert_eq!(Tensor2::from(a), full);

        let skewed = Tensor2::<f64, 2>::from_array([[1.0, 2.0], [3.0, 4.0]]);
        assert!(matches!(
            Tensor2s::from_dense(&skewed),
            Err(CartesianError::TensorError(TensorError::Unsupported { .. }))
        ));
        assert_eq!(
            Tensor2s::<f64, 2>::from_list(&[1.0; 4]).unwrap_err(),
            CartesianError::TensorError(TensorError::length_mismatch(3, 4))
        );
        Ok(())
    }

    #[test]
    fn reductions_count_both_triangles() -> Result<(), CartesianError> {
        let mut rng = rand::rng();
        let a = Tensor2s::<f64, 3>::from_fn(|_, _| rng.random_range(-5.0..5.0));
        let dense = a.to_dense();
        assert_relative_eq!(a.norm(), dense.norm(), epsilon = 1e-12);
        assert_relative_eq!(a.abs_sum(), dense.abs_sum(), epsilon = 1e-12);
        assert_relative_eq!(a.norm_max(), dense.norm_max());
        assert_relative_eq!(a.trace(), dense.trace());
        assert_relative_eq!(a.dev().trace(), 0.0, epsilon = 1e-12);
        assert_eq!(a.transpose(), a);
        Ok(())
    }

    #[test]
    fn det_and_inverse() -> Result<(), CartesianError> {
        let a = Tensor2s::<f64, 2>::from_list(&[2.0, 1.0, 2.0])?;
        assert_eq!(a.det(), 3.0);
        let inv = a.inv()?;
        assert_relative_eq!(inv[[0, 0]], 2.0 / 3.0);
        assert_relative_eq!(inv[[0, 1]], -1.0 / 3.0);

        let b = Tensor2s::<f64, 3>::from_list(&[4.0, 1.0, 0.0, 3.0, 1.0, 2.0])?;
        let product = crate::Dot::dot(&b, &b.inv()?);
        for (x, y) in product.iter().zip(Tensor2::<f64, 3>::identity().iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12);
        }

        let singular = Tensor2s::<f64, 2>::from_list(&[1.0, 1.0, 1.0])?;
        assert_eq!(singular.inv(), Err(CartesianError::SingularMatrix));
        Ok(())
    }
}
