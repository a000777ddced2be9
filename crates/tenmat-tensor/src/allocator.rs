use std::alloc;
use std::alloc::Layout;

use thiserror::Error;

/// An error type for storage allocator operations.
#[derive(Debug, Error, PartialEq)]
pub enum TensorAllocatorError {
    /// The requested buffer does not describe a valid memory layout.
    #[error("Invalid buffer layout {0}")]
    LayoutError(core::alloc::LayoutError),

    /// The allocator returned a null pointer.
    #[error("Null pointer")]
    NullPointer,
}

impl TensorAllocatorError {
    /// Returns a user-friendly suggestion for resolving the error.
    pub fn suggestion(&self) -> &str {
        match self {
            Self::LayoutError(_) => "Reduce the number of elements so the buffer fits in isize::MAX bytes",
            Self::NullPointer => "The system is out of memory; release unused arrays and retry",
        }
    }
}

/// Memory backend for [`crate::storage::TensorStorage`].
///
/// Owned arrays hold their allocator by value and hand every buffer back to
/// the same allocator on drop. Implementations must be usable from any thread.
pub trait TensorAllocator: Clone {
    /// Returns a block fitting `layout`, which always has a non-zero size.
    fn alloc(&self, layout: Layout) -> Result<*mut u8, TensorAllocatorError>;

    /// Releases a block previously returned by `alloc` with the same layout.
    fn dealloc(&self, ptr: *mut u8, layout: Layout);
}

/// The global system allocator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuAllocator;

impl TensorAllocator for CpuAllocator {
    fn alloc(&self, layout: Layout) -> Result<*mut u8, TensorAllocatorError> {
        // SAFETY: storage never requests zero-sized layouts
        let ptr = unsafe { alloc::alloc(layout) };
        if ptr.is_null() {
            return Err(TensorAllocatorError::NullPointer);
        }
        Ok(ptr)
    }

    #[allow(clippy::not_unsafe_ptr_arg_deref)]
    fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if !ptr.is_null() {
            // SAFETY: ptr came from alloc with this layout
            unsafe { alloc::dealloc(ptr, layout) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_allocator() -> Result<(), TensorAllocatorError> {
        let allocator = CpuAllocator;
        let layout = Layout::array::<f64>(128).map_err(TensorAllocatorError::LayoutError)?;
        let ptr = allocator.alloc(layout)?;
        assert!(!ptr.is_null());
        allocator.dealloc(ptr, layout);
        Ok(())
    }

    #[test]
    fn test_layout_error_suggestion() {
        let err = Layout::array::<f64>(usize::MAX).unwrap_err();
        let err = TensorAllocatorError::LayoutError(err);
        assert!(err.suggestion().contains("isize::MAX"));
    }
}
