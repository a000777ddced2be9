//! Owned, allocator-backed element buffers.

use std::{alloc::Layout, mem::ManuallyDrop, ptr::NonNull};

use crate::{
    allocator::{TensorAllocator, TensorAllocatorError},
    error::TensorError,
};

/// A contiguous buffer of `len` elements owned through a [`TensorAllocator`].
///
/// The buffer is allocated on construction and released, after dropping the
/// elements, when the storage is dropped. Zero-sized buffers never touch the
/// allocator.
pub struct TensorStorage<T, A: TensorAllocator> {
    /// The pointer to the buffer memory which must be non-null.
    ptr: NonNull<T>,
    /// The number of initialized elements.
    len: usize,
    /// The memory layout used for allocation.
    layout: Layout,
    /// The allocator used to allocate/deallocate the buffer.
    alloc: A,
}

impl<T, A: TensorAllocator> TensorStorage<T, A> {
    /// Allocates an uninitialized buffer for `len` elements.
    fn allocate(len: usize, alloc: &A) -> Result<(NonNull<T>, Layout), TensorError> {
        let layout = Layout::array::<T>(len).map_err(TensorAllocatorError::LayoutError)?;
        if layout.size() == 0 {
            return Ok((NonNull::dangling(), layout));
        }
        let raw_ptr = alloc.alloc(layout)?;
        let ptr = NonNull::new(raw_ptr as *mut T).ok_or(TensorAllocatorError::NullPointer)?;
        Ok((ptr, layout))
    }

    /// Creates a new buffer by moving the elements of a vector into memory
    /// obtained from `alloc`.
    ///
    /// # Errors
    ///
    /// Returns an error if memory allocation fails.
    pub fn from_vec(value: Vec<T>, alloc: A) -> Result<Self, TensorError> {
        let len = value.len();
        let (ptr, layout) = Self::allocate(len, &alloc)?;

        let mut value = ManuallyDrop::new(value);
        // SAFETY: ptr is valid for len elements, value holds len initialized
        // elements and the regions don't overlap. The elements are moved, so
        // the vector is released without dropping them.
        unsafe {
            std::ptr::copy_nonoverlapping(value.as_ptr(), ptr.as_ptr(), len);
            value.set_len(0);
            ManuallyDrop::drop(&mut value);
        }

        Ok(Self {
            ptr,
            len,
            layout,
            alloc,
        })
    }

    /// Creates a buffer of `len` copies of `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if memory allocation fails.
    pub fn from_elem(len: usize, value: T, alloc: A) -> Result<Self, TensorError>
    where
        T: Clone,
    {
        Self::from_vec(vec![value; len], alloc)
    }

    /// Returns the pointer to the buffer memory.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Returns the mutable pointer to the buffer memory.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Returns the buffer as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: ptr is valid for len initialized elements and properly aligned
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Returns the buffer as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: ptr is valid for len initialized elements, properly aligned and
        // exclusively borrowed through &mut self
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Returns the number of elements in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the allocator of the buffer.
    #[inline]
    pub fn alloc(&self) -> &A {
        &self.alloc
    }

    /// Returns the memory layout of the buffer.
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Consumes the buffer and returns its elements as a vector.
    pub fn into_vec(self) -> Vec<T> {
        let this = ManuallyDrop::new(self);
        let mut out = Vec::with_capacity(this.len);
        // SAFETY: every element is read exactly once and the buffer is released
        // below without running the element destructors again.
        unsafe {
            std::ptr::copy_nonoverlapping(this.ptr.as_ptr(), out.as_mut_ptr(), this.len);
            out.set_len(this.len);
        }
        if this.layout.size() != 0 {
            this.alloc
                .dealloc(this.ptr.as_ptr() as *mut u8, this.layout);
        }
        // SAFETY: the allocator is moved out once and `this` is never used again
        drop(unsafe { std::ptr::read(&this.alloc) });
        out
    }
}

// SAFETY: the buffer is uniquely owned, so sending it moves the elements.
unsafe impl<T: Send, A: TensorAllocator + Send> Send for TensorStorage<T, A> {}

// SAFETY: shared access only hands out &T.
unsafe impl<T: Sync, A: TensorAllocator + Sync> Sync for TensorStorage<T, A> {}

impl<T, A: TensorAllocator> Drop for TensorStorage<T, A> {
    fn drop(&mut self) {
        // SAFETY: the slice holds len initialized elements that are dropped once,
        // then the memory is released with the layout it was allocated with.
        unsafe {
            std::ptr::drop_in_place(std::ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr(),
                self.len,
            ));
        }
        if self.layout.size() != 0 {
            self.alloc.dealloc(self.ptr.as_ptr() as *mut u8, self.layout);
        }
    }
}

impl<T: Clone, A: TensorAllocator> Clone for TensorStorage<T, A> {
    /// Deep copy of the buffer with the same allocator.
    ///
    /// # Panics
    ///
    /// Panics if the allocation of the copy fails.
    fn clone(&self) -> Self {
        match Self::from_vec(self.as_slice().to_vec(), self.alloc.clone()) {
            Ok(storage) => storage,
            Err(e) => panic!("failed to clone storage: {e}"),
        }
    }
}

impl<T, A: TensorAllocator> std::fmt::Debug for TensorStorage<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TensorStorage")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .field("layout", &self.layout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::CpuAllocator;
    use std::rc::Rc;

    #[test]
    fn test_storage_create_f64() -> Result<(), TensorError> {
        let storage = TensorStorage::<f64, _>::from_vec(vec![0.0; 10], CpuAllocator)?;
        assert_eq!(storage.len(), 10);
        assert!(!storage.is_empty());
        assert!(!storage.as_ptr().is_null());
        assert_eq!(storage.layout().size(), 10 * std::mem::size_of::<f64>());
        Ok(())
    }

    #[test]
    fn test_storage_from_vec_into_vec() -> Result<(), TensorError> {
        let storage = TensorStorage::<i32, _>::from_vec(vec![1, 2, 3, 4, 5], CpuAllocator)?;
        assert_eq!(storage.as_slice(), &[1, 2, 3, 4, 5]);
        assert_eq!(storage.into_vec(), vec![1, 2, 3, 4, 5]);
        Ok(())
    }

    #[test]
    fn test_storage_mutability() -> Result<(), TensorError> {
        let mut storage = TensorStorage::<i32, _>::from_elem(4, 1, CpuAllocator)?;
        storage.as_mut_slice()[0] = 10;
        assert_eq!(storage.as_slice(), &[10, 1, 1, 1]);
        Ok(())
    }

    #[test]
    fn test_storage_clone_is_deep() -> Result<(), TensorError> {
        let storage = TensorStorage::<f32, _>::from_vec(vec![1.0, 2.0], CpuAllocator)?;
        let mut copy = storage.clone();
        copy.as_mut_slice()[1] = 5.0;
        assert_eq!(storage.as_slice(), &[1.0, 2.0]);
        assert_eq!(copy.as_slice(), &[1.0, 5.0]);
        Ok(())
    }

    #[test]
    fn test_storage_empty() -> Result<(), TensorError> {
        let storage = TensorStorage::<f64, _>::from_vec(Vec::new(), CpuAllocator)?;
        assert!(storage.is_empty());
        assert_eq!(storage.as_slice(), &[] as &[f64]);
        Ok(())
    }

    #[test]
    fn test_storage_drops_elements_once() -> Result<(), TensorError> {
        let marker = Rc::new(());
        let storage =
            TensorStorage::from_vec(vec![marker.clone(), marker.clone()], CpuAllocator)?;
        assert_eq!(Rc::strong_count(&marker), 3);
        let items = storage.into_vec();
        assert_eq!(Rc::strong_count(&marker), 3);
        drop(items);
        assert_eq!(Rc::strong_count(&marker), 1);

        let storage = TensorStorage::from_elem(3, marker.clone(), CpuAllocator)?;
        assert_eq!(Rc::strong_count(&marker), 4);
        drop(storage);
        assert_eq!(Rc::strong_count(&marker), 1);
        Ok(())
    }
}
