//! Component-wise arithmetic for cartesian tensors through `std::ops`.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_traits::Float;

use crate::{
    tensor2::Tensor2, tensor2d::Tensor2d, tensor2s::Tensor2s, tensor4::Tensor4, vector::Vector,
};

macro_rules! impl_arithmetic {
    ($name:ident) => {
        impl<T: Float, const ND: usize> Add for $name<T, ND> {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                self.zip_map(&rhs, |a, b| a + b)
            }
        }

        impl<T: Float, const ND: usize> Sub for $name<T, ND> {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                self.zip_map(&rhs, |a, b| a - b)
            }
        }

        impl<T: Float, const ND: usize> Neg for $name<T, ND> {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                self.map(|a| -a)
            }
        }

        impl<T: Float, const ND: usize> Mul<T> for $name<T, ND> {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: T) -> Self {
                self.map(|a| a * rhs)
            }
        }

        impl<T: Float, const ND: usize> Div<T> for $name<T, ND> {
            type Output = Self;

            #[inline]
            fn div(self, rhs: T) -> Self {
                self.map(|a| a / rhs)
            }
        }

        impl<T: Float, const ND: usize> AddAssign for $name<T, ND> {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl<T: Float, const ND: usize> SubAssign for $name<T, ND> {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl<T: Float, const ND: usize> MulAssign<T> for $name<T, ND> {
            #[inline]
            fn mul_assign(&mut self, rhs: T) {
                *self = *self * rhs;
            }
        }

        impl<T: Float, const ND: usize> DivAssign<T> for $name<T, ND> {
            #[inline]
            fn div_assign(&mut self, rhs: T) {
                *self = *self / rhs;
            }
        }
    };
}

impl_arithmetic!(Vector);
impl_arithmetic!(Tensor2);
impl_arithmetic!(Tensor2s);
impl_arithmetic!(Tensor2d);
impl_arithmetic!(Tensor4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_arithmetic() {
        let a = Vector::<f64, 3>::from_array([1.0, 2.0, 3.0]);
        let b = Vector::<f64, 3>::ones();
        assert_eq!((a + b).as_slice(), &[2.0, 3.0, 4.0]);
        assert_eq!((a - b).as_slice(), &[0.0, 1.0, 2.0]);
        assert_eq!((-a).as_slice(), &[-1.0, -2.0, -3.0]);
        assert_eq!((a * 2.0).as_slice(), &[2.0, 4.0, 6.0]);
        assert_eq!((a / 2.0).as_slice(), &[0.5, 1.0, 1.5]);
    }

    #[test]
    fn compound_assignment() {
        let mut t = Tensor2::<f64, 2>::identity();
        t += Tensor2::ones();
        assert_eq!(t.rows(), &[[2.0, 1.0], [1.0, 2.0]]);
        t -= Tensor2::identity();
        assert_eq!(t, Tensor2::ones());
        t *= 4.0;
        t /= 2.0;
        assert_eq!(t, Tensor2::from_val(2.0));
    }

    #[test]
    fn compressed_arithmetic() {
        let mut s = Tensor2s::<f64, 2>::identity() * 2.0 + Tensor2s::ones();
        assert_eq!(s.as_slice(), &[3.0, 1.0, 3.0]);
        s -= Tensor2s::identity();
        s /= 2.0;
        assert_eq!(s.to_dense().rows(), &[[1.0, 0.5], [0.5, 1.0]]);
        assert_eq!((-s).as_slice(), &[-1.0, -0.5, -1.0]);

        let mut d = Tensor2d::<f64, 3>::from_array([1.0, 2.0, 3.0]);
        d *= 2.0;
        d += Tensor2d::identity();
        assert_eq!((d - Tensor2d::identity()).as_slice(), &[2.0, 4.0, 6.0]);
        assert_eq!((d / 3.0).as_slice(), &[1.0, 5.0 / 3.0, 7.0 / 3.0]);
    }

    #[test]
    fn rank4_arithmetic() {
        let is = Tensor4::<f64, 3>::identity_sym();
        let sum = Tensor4::<f64, 3>::identity() + Tensor4::identity_rt();
        assert_eq!(sum / 2.0, is);
        let dev = is - Tensor4::<f64, 3>::identity_ii() / 3.0;
        assert_eq!(dev, Tensor4::identity_dev());
        assert_eq!(-(-is), is);
    }
}
