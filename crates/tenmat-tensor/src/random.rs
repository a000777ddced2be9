use rand::{
    distr::{uniform::SampleUniform, Distribution, Uniform},
    Rng,
};

use crate::{
    allocator::TensorAllocator,
    array::{Array, ArrayBase},
    data::DataMut,
    error::TensorError,
    layout,
    policy::IndexPolicy,
};

fn uniform<T: SampleUniform>(lower: T, upper: T) -> Result<Uniform<T>, TensorError> {
    Uniform::new(lower, upper).map_err(|e| TensorError::unsupported("random", e.to_string()))
}

impl<T, P: IndexPolicy, A: TensorAllocator> Array<T, P, A>
where
    T: SampleUniform,
{
    /// Creates an array of values drawn uniformly from `[lower, upper)`.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::Unsupported`] if the range is empty or not finite.
    ///
    /// ```rust
    /// use tenmat_tensor::{Array, CpuAllocator};
    ///
    /// let a = Array::<f64>::random(&[3, 3], -1.0, 1.0, CpuAllocator).unwrap();
    /// assert!(a.iter().all(|x| (-1.0..1.0).contains(x)));
    /// ```
    pub fn random(shape: &[usize], lower: T, upper: T, alloc: A) -> Result<Self, TensorError> {
        Self::random_with(shape, lower, upper, &mut rand::rng(), alloc)
    }

    /// Like [`Array::random`], drawing from a caller supplied generator.
    pub fn random_with<R: Rng + ?Sized>(
        shape: &[usize],
        lower: T,
        upper: T,
        rng: &mut R,
        alloc: A,
    ) -> Result<Self, TensorError> {
        layout::validate_shape(shape)?;
        let dist = uniform(lower, upper)?;
        let data = (0..layout::numel(shape)).map(|_| dist.sample(&mut *rng)).collect();
        Self::from_shape_vec(shape, data, alloc)
    }
}

impl<S, P> ArrayBase<S, P>
where
    S: DataMut,
    S::Elem: SampleUniform,
    P: IndexPolicy,
{
    /// Overwrites every addressed element with a value drawn from `[lower, upper)`.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::Unsupported`] if the range is empty or not finite.
    pub fn fill_random(&mut self, lower: S::Elem, upper: S::Elem) -> Result<(), TensorError> {
        let dist = uniform(lower, upper)?;
        let mut rng = rand::rng();
        self.map_inplace(|x| *x = dist.sample(&mut rng));
        log::trace!("filled {} elements with uniform samples", self.numel());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{allocator::CpuAllocator, view::ArrayViewMut};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn random_stays_in_range() -> Result<(), TensorError> {
        let a = Array::<f64>::random(&[4, 5], 2.0, 3.0, CpuAllocator)?;
        assert_eq!(a.shape(), &[4, 5]);
        assert!(a.iter().all(|&x| (2.0..3.0).contains(&x)));

        let b = Array::<i32>::random(&[100], -3, 3, CpuAllocator)?;
        assert!(b.iter().all(|&x| (-3..3).contains(&x)));
        Ok(())
    }

    #[test]
    fn seeded_generator_is_reproducible() -> Result<(), TensorError> {
        let a = Array::<f64>::random_with(&[8], 0.0, 1.0, &mut StdRng::seed_from_u64(7), CpuAllocator)?;
        let b = Array::<f64>::random_with(&[8], 0.0, 1.0, &mut StdRng::seed_from_u64(7), CpuAllocator)?;
        assert_eq!(a.as_slice(), b.as_slice());
        Ok(())
    }

    #[test]
    fn empty_range_is_rejected() {
        assert!(matches!(
            Array::<f64>::random(&[2], 1.0, 1.0, CpuAllocator),
            Err(TensorError::Unsupported { .. })
        ));
        assert!(Array::<f64>::random(&[2], 1.0, 0.0, CpuAllocator).is_err());
    }

    #[test]
    fn fill_random_through_strided_view() -> Result<(), TensorError> {
        let mut buffer = [0.0f64; 6];
        {
            // second column of a 3x2 row-major buffer
            let mut column = ArrayViewMut::<f64>::from_shape_strides(&[3], &[2], &mut buffer[1..])?;
            column.fill_random(10.0, 11.0)?;
        }
        for (i, x) in buffer.iter().enumerate() {
            if i % 2 == 1 {
                assert!((10.0..11.0).contains(x));
            } else {
                assert_eq!(*x, 0.0);
            }
        }
        Ok(())
    }
}
