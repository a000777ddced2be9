//! Element-wise arithmetic and reductions.
//!
//! All operations run in row-major logical order, so they behave the same on
//! owned arrays, contiguous views and strided views. Results are always new
//! owned, contiguous arrays.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

use num_traits::{Float, NumCast, Signed, Zero};

use crate::{
    allocator::CpuAllocator,
    array::{Array, ArrayBase},
    data::{Data, DataMut},
    error::TensorError,
    policy::IndexPolicy,
};

fn check_same_shape(op: &str, lhs: &[usize], rhs: &[usize]) -> Result<(), TensorError> {
    if lhs != rhs {
        return Err(TensorError::shape_mismatch(
            format!("{op} requires identical shapes"),
            lhs,
            rhs,
        ));
    }
    Ok(())
}

// Generates the array and scalar variant of one element-wise comparison.
macro_rules! impl_comparison {
    ($name:ident, $name_scalar:ident, $op:tt) => {
        #[doc = concat!("Element-wise `a ", stringify!($op), " b` against an array of identical shape.")]
        ///
        /// # Errors
        ///
        /// Returns [`TensorError::ShapeMismatch`] if the shapes differ.
        pub fn $name<S2, Q>(&self, other: &ArrayBase<S2, Q>) -> Result<Array<bool, P>, TensorError>
        where
            S2: Data<Elem = S::Elem>,
            Q: IndexPolicy,
            S::Elem: PartialOrd,
        {
            self.element_wise_op(other, |a, b| a $op b)
        }

        #[doc = concat!("Element-wise `a ", stringify!($op), " value`.")]
        pub fn $name_scalar(&self, value: &S::Elem) -> Result<Array<bool, P>, TensorError>
        where
            S::Elem: PartialOrd,
        {
            self.map(|a| a $op value)
        }
    };
}

impl<S, P> ArrayBase<S, P>
where
    S: Data,
    P: IndexPolicy,
{
    /// Perform an element-wise operation on two arrays of identical shape.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if the shapes differ.
    ///
    /// # Example
    ///
    /// ```
    /// use tenmat_tensor::{Array, CpuAllocator};
    ///
    /// let a = Array::<u8>::from_shape_vec(&[4], vec![1, 2, 3, 4], CpuAllocator).unwrap();
    /// let b = Array::<u8>::from_shape_vec(&[4], vec![1, 2, 3, 4], CpuAllocator).unwrap();
    ///
    /// let c = a.element_wise_op(&b, |x, y| *x * *y).unwrap();
    /// assert_eq!(c.as_slice(), &[1, 4, 9, 16]);
    /// ```
    pub fn element_wise_op<S2, Q, U, F>(
        &self,
        other: &ArrayBase<S2, Q>,
        op: F,
    ) -> Result<Array<U, P>, TensorError>
    where
        S2: Data,
        Q: IndexPolicy,
        F: Fn(&S::Elem, &S2::Elem) -> U,
    {
        check_same_shape("element-wise operation", self.shape(), other.shape())?;
        let data = self.iter().zip(other.iter()).map(|(a, b)| op(a, b)).collect();
        Array::from_shape_vec(self.shape(), data, CpuAllocator)
    }

    /// Element-wise sum of two arrays.
    pub fn add<S2, Q>(&self, other: &ArrayBase<S2, Q>) -> Result<Array<S::Elem, P>, TensorError>
    where
        S2: Data<Elem = S::Elem>,
        Q: IndexPolicy,
        S::Elem: Add<Output = S::Elem> + Clone,
    {
        self.element_wise_op(other, |a, b| a.clone() + b.clone())
    }

    /// Element-wise difference of two arrays.
    pub fn sub<S2, Q>(&self, other: &ArrayBase<S2, Q>) -> Result<Array<S::Elem, P>, TensorError>
    where
        S2: Data<Elem = S::Elem>,
        Q: IndexPolicy,
        S::Elem: Sub<Output = S::Elem> + Clone,
    {
        self.element_wise_op(other, |a, b| a.clone() - b.clone())
    }

    /// Element-wise product of two arrays.
    pub fn mul<S2, Q>(&self, other: &ArrayBase<S2, Q>) -> Result<Array<S::Elem, P>, TensorError>
    where
        S2: Data<Elem = S::Elem>,
        Q: IndexPolicy,
        S::Elem: Mul<Output = S::Elem> + Clone,
    {
        self.element_wise_op(other, |a, b| a.clone() * b.clone())
    }

    /// Element-wise quotient of two arrays.
    pub fn div<S2, Q>(&self, other: &ArrayBase<S2, Q>) -> Result<Array<S::Elem, P>, TensorError>
    where
        S2: Data<Elem = S::Elem>,
        Q: IndexPolicy,
        S::Elem: Div<Output = S::Elem> + Clone,
    {
        self.element_wise_op(other, |a, b| a.clone() / b.clone())
    }

    /// Adds `value` to every element.
    pub fn add_scalar(&self, value: S::Elem) -> Result<Array<S::Elem, P>, TensorError>
    where
        S::Elem: Add<Output = S::Elem> + Clone,
    {
        self.map(|x| x.clone() + value.clone())
    }

    /// Subtracts `value` from every element.
    pub fn sub_scalar(&self, value: S::Elem) -> Result<Array<S::Elem, P>, TensorError>
    where
        S::Elem: Sub<Output = S::Elem> + Clone,
    {
        self.map(|x| x.clone() - value.clone())
    }

    /// Multiplies every element by `value`.
    pub fn mul_scalar(&self, value: S::Elem) -> Result<Array<S::Elem, P>, TensorError>
    where
        S::Elem: Mul<Output = S::Elem> + Clone,
    {
        self.map(|x| x.clone() * value.clone())
    }

    /// Divides every element by `value`.
    pub fn div_scalar(&self, value: S::Elem) -> Result<Array<S::Elem, P>, TensorError>
    where
        S::Elem: Div<Output = S::Elem> + Clone,
    {
        self.map(|x| x.clone() / value.clone())
    }

    /// Returns the sum of all elements.
    pub fn sum(&self) -> S::Elem
    where
        S::Elem: Zero + Clone,
    {
        self.iter()
            .fold(S::Elem::zero(), |acc, x| acc + x.clone())
    }

    /// Returns the arithmetic mean of all elements.
    pub fn mean(&self) -> S::Elem
    where
        S::Elem: Float,
    {
        let n = <S::Elem as NumCast>::from(self.numel()).unwrap_or_else(S::Elem::nan);
        self.sum() / n
    }

    /// Returns the smallest element.
    pub fn min(&self) -> S::Elem
    where
        S::Elem: PartialOrd + Clone,
    {
        self.as_ref_at(self.argmin()).clone()
    }

    /// Returns the largest element.
    pub fn max(&self) -> S::Elem
    where
        S::Elem: PartialOrd + Clone,
    {
        self.as_ref_at(self.argmax()).clone()
    }

    /// Returns the flat logical position of the first smallest element.
    pub fn argmin(&self) -> usize
    where
        S::Elem: PartialOrd,
    {
        self.arg_best(|candidate, best| candidate < best)
    }

    /// Returns the flat logical position of the first largest element.
    pub fn argmax(&self) -> usize
    where
        S::Elem: PartialOrd,
    {
        self.arg_best(|candidate, best| candidate > best)
    }

    fn arg_best<F>(&self, better: F) -> usize
    where
        F: Fn(&S::Elem, &S::Elem) -> bool,
    {
        let mut iter = self.iter().enumerate();
        let Some((_, first)) = iter.next() else {
            return 0;
        };
        let (mut best_pos, mut best) = (0, first);
        for (pos, value) in iter {
            if better(value, best) {
                best_pos = pos;
                best = value;
            }
        }
        best_pos
    }

    // flat positions handed out by arg_best are always in range
    fn as_ref_at(&self, flat: usize) -> &S::Elem {
        let slice = self.as_slice();
        match self.flat_offset(flat) {
            Ok(offset) => &slice[offset],
            Err(_) => &slice[0],
        }
    }

    /// Returns an array holding the absolute value of every element.
    pub fn abs(&self) -> Result<Array<S::Elem, P>, TensorError>
    where
        S::Elem: Signed,
    {
        self.map(|x| x.abs())
    }

    /// Returns the sum of the absolute values of all elements.
    pub fn abs_sum(&self) -> S::Elem
    where
        S::Elem: Signed,
    {
        self.iter()
            .fold(S::Elem::zero(), |acc, x| acc + x.abs())
    }

    /// Weighted average `sum(w * x)`, divided by `sum(w)` when `normalize` is set.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if the weights have another shape.
    ///
    /// ```rust
    /// use tenmat_tensor::{Array, CpuAllocator};
    ///
    /// let x = Array::<f64>::from_shape_vec(&[3], vec![1.0, 2.0, 3.0], CpuAllocator).unwrap();
    /// let w = Array::<f64>::from_shape_vec(&[3], vec![1.0, 1.0, 2.0], CpuAllocator).unwrap();
    /// assert_eq!(x.average(&w, true).unwrap(), 2.25);
    /// assert_eq!(x.average(&w, false).unwrap(), 9.0);
    /// ```
    pub fn average<S2, Q>(
        &self,
        weights: &ArrayBase<S2, Q>,
        normalize: bool,
    ) -> Result<S::Elem, TensorError>
    where
        S2: Data<Elem = S::Elem>,
        Q: IndexPolicy,
        S::Elem: Float,
    {
        check_same_shape("weighted average", self.shape(), weights.shape())?;
        let weighted = self
            .iter()
            .zip(weights.iter())
            .fold(S::Elem::zero(), |acc, (&x, &w)| acc + x * w);
        if normalize {
            Ok(weighted / weights.sum())
        } else {
            Ok(weighted)
        }
    }

    /// Returns the flat logical positions of all non-zero elements.
    pub fn where_nonzero(&self) -> Vec<usize>
    where
        S::Elem: Zero,
    {
        self.iter()
            .enumerate()
            .filter(|(_, x)| !x.is_zero())
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Returns the flat logical positions of all elements equal to `value`.
    pub fn where_eq(&self, value: &S::Elem) -> Vec<usize>
    where
        S::Elem: PartialEq,
    {
        self.iter()
            .enumerate()
            .filter(|(_, x)| *x == value)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Forward difference of a 1-d array: `x0, x1 - x0, x2 - x1, ...`.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if the array is not 1-d.
    pub fn diff(&self) -> Result<Array<S::Elem, P>, TensorError>
    where
        S::Elem: Sub<Output = S::Elem> + Clone,
    {
        if self.ndim() != 1 {
            return Err(TensorError::ShapeMismatch {
                message: "diff is defined for 1-d arrays".to_string(),
                expected: "rank 1".to_string(),
                actual: format!("{:?}", self.shape()),
            });
        }
        let mut prev: Option<&S::Elem> = None;
        let data = self
            .iter()
            .map(|x| {
                let out = match prev {
                    Some(p) => x.clone() - p.clone(),
                    None => x.clone(),
                };
                prev = Some(x);
                out
            })
            .collect();
        Array::from_shape_vec(self.shape(), data, CpuAllocator)
    }

    impl_comparison!(equal, equal_scalar, ==);
    impl_comparison!(not_equal, not_equal_scalar, !=);
    impl_comparison!(less, less_scalar, <);
    impl_comparison!(less_equal, less_equal_scalar, <=);
    impl_comparison!(greater, greater_scalar, >);
    impl_comparison!(greater_equal, greater_equal_scalar, >=);

    /// Returns the euclidean (Frobenius) norm `sqrt(sum x^2)`.
    pub fn norm(&self) -> S::Elem
    where
        S::Elem: Float,
    {
        self.iter()
            .fold(S::Elem::zero(), |acc, &x| acc + x * x)
            .sqrt()
    }

    /// Returns the flat logical positions that sort the elements.
    ///
    /// The sort is stable, so equal elements keep their logical order.
    /// Incomparable elements (NaN) are treated as equal.
    ///
    /// ```rust
    /// use tenmat_tensor::{Array, CpuAllocator};
    ///
    /// let a = Array::<f64>::from_shape_vec(&[2, 2], vec![3.0, 1.0, 4.0, 1.5], CpuAllocator).unwrap();
    /// assert_eq!(a.argsort(true), vec![1, 3, 0, 2]);
    /// assert_eq!(a.argsort(false), vec![2, 0, 3, 1]);
    /// ```
    pub fn argsort(&self, ascending: bool) -> Vec<usize>
    where
        S::Elem: PartialOrd,
    {
        let values: Vec<&S::Elem> = self.iter().collect();
        let mut order: Vec<usize> = (0..values.len()).collect();
        order.sort_by(|&a, &b| {
            let ord = values[a]
                .partial_cmp(values[b])
                .unwrap_or(std::cmp::Ordering::Equal);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        order
    }
}

impl<S, P> ArrayBase<S, P>
where
    S: DataMut,
    P: IndexPolicy,
{
    fn zip_inplace<S2, Q, F>(&mut self, other: &ArrayBase<S2, Q>, op: &str, f: F) -> Result<(), TensorError>
    where
        S2: Data<Elem = S::Elem>,
        Q: IndexPolicy,
        F: Fn(&mut S::Elem, &S::Elem),
    {
        check_same_shape(op, self.shape(), other.shape())?;
        let mut rhs = other.iter();
        self.map_inplace(|x| {
            if let Some(y) = rhs.next() {
                f(x, y);
            }
        });
        Ok(())
    }

    /// Adds `other` into this array element-wise.
    pub fn add_inplace<S2, Q>(&mut self, other: &ArrayBase<S2, Q>) -> Result<(), TensorError>
    where
        S2: Data<Elem = S::Elem>,
        Q: IndexPolicy,
        S::Elem: AddAssign + Clone,
    {
        self.zip_inplace(other, "add_inplace", |x, y| *x += y.clone())
    }

    /// Subtracts `other` from this array element-wise.
    pub fn sub_inplace<S2, Q>(&mut self, other: &ArrayBase<S2, Q>) -> Result<(), TensorError>
    where
        S2: Data<Elem = S::Elem>,
        Q: IndexPolicy,
        S::Elem: SubAssign + Clone,
    {
        self.zip_inplace(other, "sub_inplace", |x, y| *x -= y.clone())
    }

    /// Multiplies this array by `other` element-wise.
    pub fn mul_inplace<S2, Q>(&mut self, other: &ArrayBase<S2, Q>) -> Result<(), TensorError>
    where
        S2: Data<Elem = S::Elem>,
        Q: IndexPolicy,
        S::Elem: MulAssign + Clone,
    {
        self.zip_inplace(other, "mul_inplace", |x, y| *x *= y.clone())
    }

    /// Divides this array by `other` element-wise.
    pub fn div_inplace<S2, Q>(&mut self, other: &ArrayBase<S2, Q>) -> Result<(), TensorError>
    where
        S2: Data<Elem = S::Elem>,
        Q: IndexPolicy,
        S::Elem: DivAssign + Clone,
    {
        self.zip_inplace(other, "div_inplace", |x, y| *x /= y.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{array::PeriodicArray, view::ArrayView};
    use approx::assert_relative_eq;

    #[test]
    fn element_wise_arithmetic() -> Result<(), TensorError> {
        let a = Array::<f64>::from_shape_vec(&[2, 2], vec![1.0, 2.0, 3.0, 4.0], CpuAllocator)?;
        let b = Array::<f64>::from_shape_val(&[2, 2], 2.0, CpuAllocator)?;
        assert_eq!(a.add(&b)?.as_slice(), &[3.0, 4.0, 5.0, 6.0]);
        assert_eq!(a.sub(&b)?.as_slice(), &[-1.0, 0.0, 1.0, 2.0]);
        assert_eq!(a.mul(&b)?.as_slice(), &[2.0, 4.0, 6.0, 8.0]);
        assert_eq!(a.div(&b)?.as_slice(), &[0.5, 1.0, 1.5, 2.0]);
        assert_eq!(a.add_scalar(1.0)?.as_slice(), &[2.0, 3.0, 4.0, 5.0]);
        assert_eq!(a.sub_scalar(1.0)?.as_slice(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(a.mul_scalar(-1.0)?.as_slice(), &[-1.0, -2.0, -3.0, -4.0]);
        assert_eq!(a.div_scalar(2.0)?.as_slice(), &[0.5, 1.0, 1.5, 2.0]);

        let c = Array::<f64>::zeros(&[4], CpuAllocator)?;
        assert!(matches!(a.add(&c), Err(TensorError::ShapeMismatch { .. })));
        Ok(())
    }

    #[test]
    fn inplace_arithmetic() -> Result<(), TensorError> {
        let mut a = Array::<i32>::arange(&[3], CpuAllocator)?;
        let b = Array::<i32>::from_shape_val(&[3], 2, CpuAllocator)?;
        a.add_inplace(&b)?;
        assert_eq!(a.as_slice(), &[2, 3, 4]);
        a.mul_inplace(&b)?;
        assert_eq!(a.as_slice(), &[4, 6, 8]);
        a.div_inplace(&b)?;
        a.sub_inplace(&b)?;
        assert_eq!(a.as_slice(), &[0, 1, 2]);
        let c = Array::<i32>::zeros(&[2], CpuAllocator)?;
        assert!(a.add_inplace(&c).is_err());
        Ok(())
    }

    #[test]
    fn ops_on_strided_views() -> Result<(), TensorError> {
        let buffer = [1, 2, 3, 4, 5, 6];
        let t = ArrayView::<i32>::from_shape_strides(&[3, 2], &[1, 3], &buffer)?;
        let a = Array::<i32>::from_shape_val(&[3, 2], 10, CpuAllocator)?;
        let sum = t.add(&a)?;
        assert_eq!(sum.as_slice(), &[11, 14, 12, 15, 13, 16]);
        assert_eq!(t.argmax(), 5);
        assert_eq!(t.argmin(), 0);
        assert_eq!(t.max(), 6);
        Ok(())
    }

    #[test]
    fn reductions() -> Result<(), TensorError> {
        let a = Array::<f64>::from_shape_vec(&[2, 3], vec![3.0, -1.0, 4.0, -1.0, 5.0, -9.0], CpuAllocator)?;
        assert_relative_eq!(a.sum(), 1.0);
        assert_relative_eq!(a.mean(), 1.0 / 6.0);
        assert_eq!(a.min(), -9.0);
        assert_eq!(a.max(), 5.0);
        assert_eq!(a.argmin(), 5);
        assert_eq!(a.argmax(), 4);
        assert_eq!(a.abs()?.as_slice(), &[3.0, 1.0, 4.0, 1.0, 5.0, 9.0]);
        assert_relative_eq!(a.abs_sum(), 23.0);
        Ok(())
    }

    #[test]
    fn arg_ties_pick_first() -> Result<(), TensorError> {
        let a = Array::<i32>::from_shape_vec(&[4], vec![2, 7, 7, 2], CpuAllocator)?;
        assert_eq!(a.argmax(), 1);
        assert_eq!(a.argmin(), 0);
        Ok(())
    }

    #[test]
    fn weighted_average() -> Result<(), TensorError> {
        let x = Array::<f64>::arange(&[2, 2], CpuAllocator)?;
        let w = Array::<f64>::from_shape_vec(&[2, 2], vec![0.0, 1.0, 1.0, 2.0], CpuAllocator)?;
        assert_relative_eq!(x.average(&w, false)?, 9.0);
        assert_relative_eq!(x.average(&w, true)?, 2.25);
        let bad = Array::<f64>::ones(&[4], CpuAllocator)?;
        assert!(x.average(&bad, true).is_err());
        Ok(())
    }

    #[test]
    fn where_queries() -> Result<(), TensorError> {
        let a = Array::<i32>::from_shape_vec(&[2, 3], vec![0, 1, 0, 2, 1, 0], CpuAllocator)?;
        assert_eq!(a.where_nonzero(), vec![1, 3, 4]);
        assert_eq!(a.where_eq(&1), vec![1, 4]);
        assert_eq!(a.where_eq(&5), Vec::<usize>::new());
        Ok(())
    }

    #[test]
    fn comparisons() -> Result<(), TensorError> {
        let a = Array::<i32>::from_shape_vec(&[2, 2], vec![1, 5, 3, 2], CpuAllocator)?;
        let b = Array::<i32>::from_shape_val(&[2, 2], 3, CpuAllocator)?;
        assert_eq!(a.equal(&b)?.as_slice(), &[false, false, true, false]);
        assert_eq!(a.not_equal(&b)?.as_slice(), &[true, true, false, true]);
        assert_eq!(a.less(&b)?.as_slice(), &[true, false, false, true]);
        assert_eq!(a.less_equal(&b)?.as_slice(), &[true, false, true, true]);
        assert_eq!(a.greater(&b)?.as_slice(), &[false, true, false, false]);
        assert_eq!(a.greater_equal(&b)?.as_slice(), &[false, true, true, false]);
        assert_eq!(a.greater_scalar(&2)?.as_slice(), &[false, true, true, false]);
        assert_eq!(a.equal_scalar(&2)?.shape(), &[2, 2]);
        assert_eq!(a.less_equal_scalar(&2)?.where_eq(&true), vec![0, 3]);

        let c = Array::<i32>::zeros(&[4], CpuAllocator)?;
        assert!(matches!(a.less(&c), Err(TensorError::ShapeMismatch { .. })));
        Ok(())
    }

    #[test]
    fn comparisons_keep_periodic_policy() -> Result<(), TensorError> {
        let a = PeriodicArray::<i32>::arange(&[4], CpuAllocator)?;
        let mask = a.less_scalar(&2)?;
        assert!(mask[[-1]] == mask[[3]]);
        assert!(mask[[-4]]);
        Ok(())
    }

    #[test]
    fn euclidean_norm() -> Result<(), TensorError> {
        let a = Array::<f64>::from_shape_vec(&[2, 2], vec![3.0, 0.0, 0.0, -4.0], CpuAllocator)?;
        assert_relative_eq!(a.norm(), 5.0);
        assert_relative_eq!(a.abs_sum(), 7.0);
        assert_eq!(Array::<f64>::zeros(&[3], CpuAllocator)?.norm(), 0.0);
        Ok(())
    }

    #[test]
    fn argsort_orders() -> Result<(), TensorError> {
        let a = Array::<i32>::from_shape_vec(&[5], vec![4, 1, 3, 1, 0], CpuAllocator)?;
        assert_eq!(a.argsort(true), vec![4, 1, 3, 2, 0]);
        assert_eq!(a.argsort(false), vec![0, 2, 1, 3, 4]);

        let buffer = [1, 2, 3, 4, 5, 6];
        let t = ArrayView::<i32>::from_shape_strides(&[3, 2], &[1, 3], &buffer)?;
        // logical order is 1 4 2 5 3 6
        assert_eq!(t.argsort(true), vec![0, 2, 4, 1, 3, 5]);
        Ok(())
    }

    #[test]
    fn forward_difference() -> Result<(), TensorError> {
        let x = Array::<i32>::from_shape_vec(&[4], vec![1, 4, 9, 16], CpuAllocator)?;
        assert_eq!(x.diff()?.as_slice(), &[1, 3, 5, 7]);
        let m = Array::<i32>::zeros(&[2, 2], CpuAllocator)?;
        assert!(matches!(m.diff(), Err(TensorError::ShapeMismatch { .. })));
        Ok(())
    }
}
