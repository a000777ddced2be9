//! Backing-buffer abstraction shared by owned arrays and views.
//!
//! An [`ArrayBase`](crate::array::ArrayBase) is generic over the thing that
//! holds its elements: an owned [`TensorStorage`], a borrowed slice or a
//! mutably borrowed slice. Everything that only reads or writes elements is
//! written once against these traits.

use crate::{allocator::TensorAllocator, error::TensorError, storage::TensorStorage};

/// A buffer of elements that can be read.
pub trait Data {
    /// The element type.
    type Elem;

    /// Returns the whole backing buffer.
    fn as_slice(&self) -> &[Self::Elem];

    /// Replaces the buffer with `len` default-valued elements.
    ///
    /// # Errors
    ///
    /// Borrowed buffers never own memory and return [`TensorError::Unsupported`].
    fn reallocate(&mut self, len: usize) -> Result<(), TensorError>
    where
        Self::Elem: Clone + Default;

    /// True if the buffer is owned by the container.
    fn is_owned(&self) -> bool;
}

/// A buffer of elements that can also be written.
pub trait DataMut: Data {
    /// Returns the whole backing buffer mutably.
    fn as_mut_slice(&mut self) -> &mut [Self::Elem];
}

impl<T, A: TensorAllocator> Data for TensorStorage<T, A> {
    type Elem = T;

    #[inline]
    fn as_slice(&self) -> &[T] {
        TensorStorage::as_slice(self)
    }

    fn reallocate(&mut self, len: usize) -> Result<(), TensorError>
    where
        T: Clone + Default,
    {
        log::debug!("reallocating storage from {} to {} elements", self.len(), len);
        *self = TensorStorage::from_elem(len, T::default(), self.alloc().clone())?;
        Ok(())
    }

    #[inline]
    fn is_owned(&self) -> bool {
        true
    }
}

impl<T, A: TensorAllocator> DataMut for TensorStorage<T, A> {
    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        TensorStorage::as_mut_slice(self)
    }
}

impl<T> Data for &[T] {
    type Elem = T;

    #[inline]
    fn as_slice(&self) -> &[T] {
        self
    }

    fn reallocate(&mut self, _len: usize) -> Result<(), TensorError> {
        Err(TensorError::unsupported(
            "resize",
            "a view does not own its buffer and cannot reallocate",
        ))
    }

    #[inline]
    fn is_owned(&self) -> bool {
        false
    }
}

impl<T> Data for &mut [T] {
    type Elem = T;

    #[inline]
    fn as_slice(&self) -> &[T] {
        self
    }

    fn reallocate(&mut self, _len: usize) -> Result<(), TensorError> {
        Err(TensorError::unsupported(
            "resize",
            "a view does not own its buffer and cannot reallocate",
        ))
    }

    #[inline]
    fn is_owned(&self) -> bool {
        false
    }
}

impl<T> DataMut for &mut [T] {
    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::CpuAllocator;

    #[test]
    fn owned_storage_reallocates_with_defaults() -> Result<(), TensorError> {
        let mut storage = TensorStorage::from_vec(vec![1.0f64, 2.0], CpuAllocator)?;
        storage.reallocate(3)?;
        assert_eq!(Data::as_slice(&storage), &[0.0, 0.0, 0.0]);
        assert!(storage.is_owned());
        Ok(())
    }

    #[test]
    fn borrowed_buffers_cannot_reallocate() {
        let buf = [1.0f64, 2.0];
        let mut view: &[f64] = &buf;
        assert!(matches!(
            view.reallocate(4),
            Err(TensorError::Unsupported { .. })
        ));
        assert!(!view.is_owned());

        let mut buf = [1i32, 2];
        let mut view: &mut [i32] = &mut buf;
        assert!(view.reallocate(1).is_err());
        view.as_mut_slice()[0] = 7;
        assert_eq!(buf, [7, 2]);
    }
}
