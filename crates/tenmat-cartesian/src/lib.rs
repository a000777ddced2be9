#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! Vectors, second-order and fourth-order tensors with a fixed dimension `ND`
//! (typically 2 or 3) given as a const generic. Second-order tensors also
//! come in symmetric ([`Tensor2s`]) and diagonal ([`Tensor2d`]) storage. Components live inline and
//! are always stored row-major, so every tensor can be reinterpreted over a
//! caller buffer with `map_slice` or viewed as a general
//! [`tenmat_tensor::ArrayView`].
//!
//! ```rust
//! use tenmat_cartesian::{Ddot, Dyadic, Tensor2, Tensor4, Vector};
//!
//! let a = Vector::<f64, 3>::from_array([1.0, 0.0, 2.0]);
//! let aa = a.dyadic(&a);
//! assert_eq!(aa.ddot(&aa), 25.0);
//!
//! let sym = Tensor4::<f64, 3>::identity_sym().ddot(&aa);
//! assert_eq!(sym, aa);
//!
//! let t = Tensor2::<f64, 2>::from_list(&[1.0, 2.0, 3.0, 4.0]).unwrap();
//! assert_eq!(t.det(), -2.0);
//! ```

/// Error module containing [`CartesianError`].
pub mod error;

/// Component-wise arithmetic operators.
pub mod ops;

/// Dot, double-dot and dyadic products.
pub mod product;

#[cfg(feature = "serde")]
mod serde;

/// Second-order tensors, determinant and inverse.
pub mod tensor2;

/// Diagonal second-order tensors storing only the diagonal.
pub mod tensor2d;

/// Symmetric second-order tensors storing only the upper triangle.
pub mod tensor2s;

/// Fourth-order tensors and the identity family.
pub mod tensor4;

/// First-order tensors.
pub mod vector;

pub use crate::error::CartesianError;
pub use crate::product::{ddot, dot, dyadic, Ddot, Dot, Dyadic};
pub use crate::tensor2::Tensor2;
pub use crate::tensor2d::Tensor2d;
pub use crate::tensor2s::Tensor2s;
pub use crate::tensor4::Tensor4;
pub use crate::vector::Vector;
