//! Zero-copy exchange with foreign array runtimes.
//!
//! A [`BufferDescriptor`] carries what a host runtime knows about a buffer:
//! the element type tag, shape, strides in element units, the data pointer
//! and whether the buffer may be written. Importing a descriptor yields a
//! view over the foreign memory; exporting one hands out the container's own
//! memory. No element is ever copied.

use crate::{
    array::ArrayBase,
    data::{Data, DataMut},
    error::TensorError,
    policy::IndexPolicy,
    view::{ArrayView, ArrayViewMut},
};

/// Element type tag understood by host runtimes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit unsigned integer.
    U32,
    /// 64-bit unsigned integer.
    U64,
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
}

impl DType {
    /// Size of one element in bytes.
    pub const fn size_of(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }
}

/// Scalar types that can cross the interop boundary.
pub trait Element: Copy + 'static {
    /// The tag describing `Self`.
    const DTYPE: DType;
}

macro_rules! impl_element {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const DTYPE: DType = DType::$tag;
            }
        )*
    };
}

impl_element!(
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    f32 => F32, f64 => F64,
);

/// Description of a strided buffer exchanged with a host runtime.
#[derive(Clone, Debug, PartialEq)]
pub struct BufferDescriptor {
    /// Element type of the buffer.
    pub dtype: DType,
    /// Size of every axis.
    pub shape: Vec<usize>,
    /// Distance between neighbours along every axis, in elements.
    pub strides: Vec<usize>,
    /// Pointer to the first element.
    pub data: *mut u8,
    /// True if the receiver must not write through `data`.
    pub readonly: bool,
}

impl BufferDescriptor {
    /// True if the buffer is contiguous in row-major order.
    pub fn is_c_contiguous(&self) -> bool {
        crate::layout::is_standard_layout(&self.shape, &self.strides)
    }

    /// Number of elements reachable through the descriptor.
    pub fn span_len(&self) -> usize {
        crate::layout::span_len(&self.shape, &self.strides)
    }

    fn check_import<T: Element>(&self) -> Result<(), TensorError> {
        if self.dtype != T::DTYPE {
            return Err(TensorError::unsupported(
                "import buffer",
                format!("element type {:?} does not match {:?}", self.dtype, T::DTYPE),
            ));
        }
        if self.data.is_null() {
            return Err(TensorError::unsupported("import buffer", "data pointer is null"));
        }
        if (self.data as usize) % std::mem::align_of::<T>() != 0 {
            return Err(TensorError::unsupported(
                "import buffer",
                "data pointer is not aligned for the element type",
            ));
        }
        Ok(())
    }
}

/// Wraps the buffer of a host descriptor as a read-only view.
///
/// # Errors
///
/// Returns [`TensorError::Unsupported`] if the element type differs from `T`
/// or the pointer is null or misaligned, and the layout errors of
/// [`ArrayView::from_raw_parts`].
///
/// # Safety
///
/// The descriptor must describe live memory that stays valid and unmodified
/// for `'a`.
pub unsafe fn view_from_descriptor<'a, T: Element>(
    desc: &BufferDescriptor,
) -> Result<ArrayView<'a, T>, TensorError> {
    desc.check_import::<T>()?;
    log::debug!(
        "importing {:?} buffer of shape {:?} strides {:?}",
        desc.dtype,
        desc.shape,
        desc.strides
    );
    // SAFETY: guaranteed by the caller
    unsafe { ArrayView::from_raw_parts(desc.data as *const T, &desc.shape, &desc.strides) }
}

/// Wraps the buffer of a host descriptor as a writable view.
///
/// # Errors
///
/// As [`view_from_descriptor`], and [`TensorError::Unsupported`] if the
/// descriptor is read-only.
///
/// # Safety
///
/// The descriptor must describe live memory that stays valid for `'a` and is
/// not accessed through any other path meanwhile.
pub unsafe fn view_mut_from_descriptor<'a, T: Element>(
    desc: &BufferDescriptor,
) -> Result<ArrayViewMut<'a, T>, TensorError> {
    if desc.readonly {
        return Err(TensorError::unsupported(
            "import buffer",
            "a read-only buffer cannot back a writable view",
        ));
    }
    desc.check_import::<T>()?;
    log::debug!(
        "importing writable {:?} buffer of shape {:?} strides {:?}",
        desc.dtype,
        desc.shape,
        desc.strides
    );
    // SAFETY: guaranteed by the caller
    unsafe { ArrayViewMut::from_raw_parts_mut(desc.data as *mut T, &desc.shape, &desc.strides) }
}

impl<S, P> ArrayBase<S, P>
where
    S: Data,
    S::Elem: Element,
    P: IndexPolicy,
{
    /// Describes the array's buffer for a host runtime, marked read-only.
    ///
    /// The descriptor borrows nothing; it is valid as long as the array is
    /// neither dropped nor resized.
    pub fn descriptor(&self) -> BufferDescriptor {
        BufferDescriptor {
            dtype: S::Elem::DTYPE,
            shape: self.shape().to_vec(),
            strides: self.strides().to_vec(),
            data: self.as_ptr() as *mut u8,
            readonly: true,
        }
    }
}

impl<S, P> ArrayBase<S, P>
where
    S: DataMut,
    S::Elem: Element,
    P: IndexPolicy,
{
    /// Describes the array's buffer for a host runtime, marked writable.
    pub fn descriptor_mut(&mut self) -> BufferDescriptor {
        BufferDescriptor {
            dtype: S::Elem::DTYPE,
            shape: self.shape().to_vec(),
            strides: self.strides().to_vec(),
            data: self.as_mut_ptr() as *mut u8,
            readonly: false,
        }
    }
}
