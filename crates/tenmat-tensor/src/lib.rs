#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `tenmat-tensor` is a small multidimensional array library meant to be
//! embedded in numerical codes and shared zero-copy with foreign array
//! runtimes. Every container is a strided, row-major buffer addressed through
//! one of two policies: regular (range checked) or periodic (indices wrap
//! around the shape).
//!
//! # Architecture
//!
//! - **ArrayBase**: one array type generic over its backing buffer and its addressing policy
//! - **Array / PeriodicArray**: owned arrays backed by [`storage::TensorStorage`]
//! - **ArrayView / ArrayViewMut**: borrowed views over memory owned elsewhere, with arbitrary strides
//! - **TinyVector / TinyMatrix**: fixed-size containers stored inline
//! - **BufferDescriptor**: the shape/strides/pointer triple exchanged with host runtimes
//!
//! # Quick Start
//!
//! ```rust
//! use tenmat_tensor::{Array, CpuAllocator, PeriodicArray};
//!
//! let a = Array::<f64>::from_shape_vec(&[2, 2], vec![1.0, 2.0, 3.0, 4.0], CpuAllocator).unwrap();
//! assert_eq!(a[[1, 0]], 3.0);
//! assert!(a.get(&[2, 0]).is_err());
//!
//! let p = PeriodicArray::<f64>::from_shape_vec(&[4], vec![1.0, 2.0, 3.0, 4.0], CpuAllocator).unwrap();
//! assert_eq!(p[[-1]], p[[3]]);
//! ```
//!
//! Wrapping caller memory:
//!
//! ```rust
//! use tenmat_tensor::ArrayViewMut;
//!
//! let mut buffer = vec![0.0f64; 6];
//! let mut view = ArrayViewMut::<f64>::from_shape(&[2, 3], &mut buffer).unwrap();
//! view[[1, 2]] = 9.0;
//! assert_eq!(buffer[5], 9.0);
//! ```

/// Allocator module containing memory management utilities.
///
/// This module provides the [`TensorAllocator`] trait and the default
/// [`CpuAllocator`] backed by the system allocator.
pub mod allocator;

/// Array module containing the strided container shared by owned arrays and views.
pub mod array;

/// Bincode module for binary serialization and deserialization.
#[cfg(feature = "bincode")]
pub mod bincode;

/// Data module abstracting over owned and borrowed buffers.
pub mod data;

/// Error module containing [`TensorError`].
pub mod error;

/// Interop module converting between host buffer descriptors and views.
pub mod interop;

/// Layout module with row-major shape and stride arithmetic.
pub mod layout;

/// Element-wise arithmetic and reductions.
pub mod ops;

/// Policy module containing the regular and periodic addressing strategies.
pub mod policy;

/// Random module with uniformly distributed constructors.
pub mod random;

/// Serde module for JSON/other format serialization and deserialization.
#[cfg(feature = "serde")]
pub mod serde;

/// Storage module containing the owned, allocator-backed buffer.
pub mod storage;

/// Tiny module containing fixed-size vectors and matrices.
pub mod tiny;

/// View module containing non-owning array views.
pub mod view;

pub use crate::allocator::{CpuAllocator, TensorAllocator};
pub use crate::array::{Array, ArrayBase, PeriodicArray};
pub use crate::error::TensorError;
pub use crate::interop::{BufferDescriptor, DType, Element};
pub use crate::policy::{IndexPolicy, Periodic, Regular};
pub use crate::tiny::{PeriodicTinyMatrix, PeriodicTinyVector, TinyMatrix, TinyVector};
pub use crate::view::{ArrayView, ArrayViewMut, PeriodicArrayView, PeriodicArrayViewMut};
