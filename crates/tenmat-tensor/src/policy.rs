//! Addressing policies shared by every container.
//!
//! A policy decides how one incoming index component maps onto a position
//! along its axis. Storage layout, iteration order and internal loops are
//! identical for all policies; only the incoming multi-index differs.

use std::fmt::Debug;

use crate::error::TensorError;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Regular {}
    impl Sealed for super::Periodic {}
}

/// Strategy mapping a user supplied index component to a canonical position.
pub trait IndexPolicy: sealed::Sealed + Copy + Clone + Debug + Default + PartialEq + 'static {
    /// Integer type accepted for one index component.
    type Index: Copy + Debug;

    /// True if indices wrap around the shape.
    const PERIODIC: bool;

    /// Maps `index` on `axis` (of size `dim`, always at least 1) to `[0, dim)`.
    fn resolve(index: Self::Index, axis: usize, dim: usize) -> Result<usize, TensorError>;
}

/// Plain addressing: components must satisfy `0 <= index < dim`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Regular;

/// Periodic addressing: components of any sign or magnitude wrap modulo the
/// dimension, so access never fails with an out-of-range condition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Periodic;

impl IndexPolicy for Regular {
    type Index = usize;

    const PERIODIC: bool = false;

    #[inline]
    fn resolve(index: usize, axis: usize, dim: usize) -> Result<usize, TensorError> {
        if index >= dim {
            return Err(TensorError::index_out_of_range(axis, index, dim));
        }
        Ok(index)
    }
}

impl IndexPolicy for Periodic {
    type Index = isize;

    const PERIODIC: bool = true;

    #[inline]
    fn resolve(index: isize, _axis: usize, dim: usize) -> Result<usize, TensorError> {
        Ok(wrap_index(index, dim))
    }
}

/// True mathematical modulo: `((index % dim) + dim) % dim`.
///
/// ```rust
/// use tenmat_tensor::policy::wrap_index;
///
/// assert_eq!(wrap_index(-1, 4), 3);
/// assert_eq!(wrap_index(9, 4), 1);
/// assert_eq!(wrap_index(-8, 4), 0);
/// ```
#[inline]
pub fn wrap_index(index: isize, dim: usize) -> usize {
    index.rem_euclid(dim as isize) as usize
}

/// Resolves a full multi-index under policy `P` and returns its buffer offset.
pub(crate) fn resolve_offset<P: IndexPolicy>(
    index: &[P::Index],
    shape: &[usize],
    strides: &[usize],
) -> Result<usize, TensorError> {
    crate::layout::check_index_rank(index.len(), shape)?;
    let mut offset = 0;
    for (axis, ((&idx, &dim), &stride)) in index.iter().zip(shape).zip(strides).enumerate() {
        offset += P::resolve(idx, axis, dim)? * stride;
    }
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_rejects_out_of_range() {
        assert_eq!(Regular::resolve(2, 0, 3), Ok(2));
        assert_eq!(
            Regular::resolve(3, 1, 3),
            Err(TensorError::index_out_of_range(1, 3, 3))
        );
    }

    #[test]
    fn periodic_wraps_any_index() {
        for dim in 1..6usize {
            for index in -20isize..20 {
                let wrapped = Periodic::resolve(index, 0, dim).unwrap();
                assert!(wrapped < dim);
                assert_eq!(wrapped as isize, ((index % dim as isize) + dim as isize) % dim as isize);
            }
        }
    }

    #[test]
    fn resolve_offset_uses_strides() -> Result<(), TensorError> {
        let shape = [2, 3];
        let strides = [3, 1];
        assert_eq!(resolve_offset::<Regular>(&[1, 2], &shape, &strides)?, 5);
        assert_eq!(resolve_offset::<Periodic>(&[-1, -1], &shape, &strides)?, 5);
        assert_eq!(resolve_offset::<Periodic>(&[2, 3], &shape, &strides)?, 0);
        assert!(resolve_offset::<Regular>(&[1], &shape, &strides).is_err());
        Ok(())
    }
}
