#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! ```rust
//! use tenmat::cartesian::Tensor2;
//! use tenmat::tensor::{CpuAllocator, PeriodicArray};
//!
//! let p = PeriodicArray::<f64>::from_shape_vec(&[4], vec![0.0, 1.0, 2.0, 3.0], CpuAllocator).unwrap();
//! assert_eq!(p[[-1]], 3.0);
//!
//! let t = Tensor2::<f64, 2>::from_list(&[1.0, 2.0, 3.0, 4.0]).unwrap();
//! assert_eq!(t.inv().unwrap().as_slice(), &[-2.0, 1.0, 1.5, -0.5]);
//! ```

#[doc(inline)]
pub use tenmat_tensor as tensor;

#[doc(inline)]
pub use tenmat_cartesian as cartesian;
