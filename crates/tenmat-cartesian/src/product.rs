//! Tensor products: single contraction, double contraction and dyadic product.
//!
//! Conventions, with summation over repeated indices:
//!
//! | product | result |
//! |---|---|
//! | `a . b` | `a_i b_i` |
//! | `A . b` | `A_ij b_j` |
//! | `a . B` | `a_i B_ij` |
//! | `A . B` | `A_ik B_kj` |
//! | `A : B` | `A_ij B_ij` |
//! | `C : B` (rank 4 : rank 2) | `C_ijkl B_kl` |
//! | `A : C` (rank 2 : rank 4) | `A_ij C_ijkl` |
//! | `C : D` (rank 4 : rank 4) | `C_ijkl D_klmn` |
//! | `a (x) b` | `a_i b_j` |
//! | `A (x) B` | `A_ij B_kl` |
//!
//! Symmetric ([`Tensor2s`]) and diagonal ([`Tensor2d`]) rank-2 tensors take
//! part in every product a full [`Tensor2`] does, in any combination. Results
//! are full tensors, except `Tensor2d . Tensor2d` which stays diagonal.

use num_traits::Float;

use crate::{
    tensor2::Tensor2, tensor2d::Tensor2d, tensor2s::Tensor2s, tensor4::Tensor4, vector::Vector,
};

/// Single contraction over the last index of `self` and the first of `rhs`.
pub trait Dot<Rhs = Self> {
    /// Result of the contraction.
    type Output;

    /// Contracts `self . rhs`.
    fn dot(&self, rhs: &Rhs) -> Self::Output;
}

/// Double contraction over the last two indices of `self` and the first two of `rhs`.
pub trait Ddot<Rhs = Self> {
    /// Result of the contraction.
    type Output;

    /// Contracts `self : rhs`.
    fn ddot(&self, rhs: &Rhs) -> Self::Output;
}

/// Outer product.
pub trait Dyadic<Rhs = Self> {
    /// Result of the product.
    type Output;

    /// Computes `self (x) rhs`.
    fn dyadic(&self, rhs: &Rhs) -> Self::Output;
}

/// Computes `a . b`.
pub fn dot<A: Dot<B>, B>(a: &A, b: &B) -> A::Output {
    a.dot(b)
}

/// Computes `a : b`.
pub fn ddot<A: Ddot<B>, B>(a: &A, b: &B) -> A::Output {
    a.ddot(b)
}

/// Computes `a (x) b`.
pub fn dyadic<A: Dyadic<B>, B>(a: &A, b: &B) -> A::Output {
    a.dyadic(b)
}

#[inline]
fn sum<T: Float>(n: usize, f: impl Fn(usize) -> T) -> T {
    (0..n).fold(T::zero(), |acc, k| acc + f(k))
}

impl<T: Float, const ND: usize> Dot for Vector<T, ND> {
    type Output = T;

    fn dot(&self, rhs: &Self) -> T {
        let (a, b) = (self.as_array(), rhs.as_array());
        sum(ND, |i| a[i] * b[i])
    }
}

impl<T: Float, const ND: usize> Dot<Vector<T, ND>> for Tensor2<T, ND> {
    type Output = Vector<T, ND>;

    fn dot(&self, rhs: &Vector<T, ND>) -> Vector<T, ND> {
        let (a, b) = (self.rows(), rhs.as_array());
        Vector::from_fn(|i| sum(ND, |j| a[i][j] * b[j]))
    }
}

impl<T: Float, const ND: usize> Dot<Tensor2<T, ND>> for Vector<T, ND> {
    type Output = Vector<T, ND>;

    fn dot(&self, rhs: &Tensor2<T, ND>) -> Vector<T, ND> {
        let (a, b) = (self.as_array(), rhs.rows());
        Vector::from_fn(|j| sum(ND, |i| a[i] * b[i][j]))
    }
}

impl<T: Float, const ND: usize> Dot for Tensor2<T, ND> {
    type Output = Tensor2<T, ND>;

    fn dot(&self, rhs: &Self) -> Self {
        let (a, b) = (self.rows(), rhs.rows());
        Tensor2::from_fn(|i, j| sum(ND, |k| a[i][k] * b[k][j]))
    }
}

impl<T: Float, const ND: usize> Ddot for Tensor2<T, ND> {
    type Output = T;

    fn ddot(&self, rhs: &Self) -> T {
        self.iter()
            .zip(rhs.iter())
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
    }
}

impl<T: Float, const ND: usize> Ddot<Tensor2<T, ND>> for Tensor4<T, ND> {
    type Output = Tensor2<T, ND>;

    fn ddot(&self, rhs: &Tensor2<T, ND>) -> Tensor2<T, ND> {
        let (c, b) = (self.as_array(), rhs.rows());
        Tensor2::from_fn(|i, j| sum(ND, |k| sum(ND, |l| c[i][j][k][l] * b[k][l])))
    }
}

impl<T: Float, const ND: usize> Ddot<Tensor4<T, ND>> for Tensor2<T, ND> {
    type Output = Tensor2<T, ND>;

    fn ddot(&self, rhs: &Tensor4<T, ND>) -> Tensor2<T, ND> {
        let (a, c) = (self.rows(), rhs.as_array());
        Tensor2::from_fn(|k, l| sum(ND, |i| sum(ND, |j| a[i][j] * c[i][j][k][l])))
    }
}

impl<T: Float, const ND: usize> Ddot for Tensor4<T, ND> {
    type Output = Tensor4<T, ND>;

    fn ddot(&self, rhs: &Self) -> Self {
        let (c, d) = (self.as_array(), rhs.as_array());
        Tensor4::from_fn(|i, j, m, n| {
            sum(ND, |k| sum(ND, |l| c[i][j][k][l] * d[k][l][m][n]))
        })
    }
}

impl<T: Float, const ND: usize> Dyadic for Vector<T, ND> {
    type Output = Tensor2<T, ND>;

    fn dyadic(&self, rhs: &Self) -> Tensor2<T, ND> {
        let (a, b) = (self.as_array(), rhs.as_array());
        Tensor2::from_fn(|i, j| a[i] * b[j])
    }
}

impl<T: Float, const ND: usize> Dyadic for Tensor2<T, ND> {
    type Output = Tensor4<T, ND>;

    fn dyadic(&self, rhs: &Self) -> Tensor4<T, ND> {
        let (a, b) = (self.rows(), rhs.rows());
        Tensor4::from_fn(|i, j, k, l| a[i][j] * b[k][l])
    }
}

// Products between two rank-2 tensors of which at least one is compressed.
macro_rules! impl_rank2_pair {
    ($lhs:ident, $rhs:ident) => {
        impl<T: Float, const ND: usize> Dot<$rhs<T, ND>> for $lhs<T, ND> {
            type Output = Tensor2<T, ND>;

            fn dot(&self, rhs: &$rhs<T, ND>) -> Tensor2<T, ND> {
                Tensor2::from_fn(|i, j| sum(ND, |k| self.at(i, k) * rhs.at(k, j)))
            }
        }

        impl<T: Float, const ND: usize> Ddot<$rhs<T, ND>> for $lhs<T, ND> {
            type Output = T;

            fn ddot(&self, rhs: &$rhs<T, ND>) -> T {
                sum(ND, |i| sum(ND, |j| self.at(i, j) * rhs.at(i, j)))
            }
        }

        impl<T: Float, const ND: usize> Dyadic<$rhs<T, ND>> for $lhs<T, ND> {
            type Output = Tensor4<T, ND>;

            fn dyadic(&self, rhs: &$rhs<T, ND>) -> Tensor4<T, ND> {
                Tensor4::from_fn(|i, j, k, l| self.at(i, j) * rhs.at(k, l))
            }
        }
    };
}

impl_rank2_pair!(Tensor2, Tensor2s);
impl_rank2_pair!(Tensor2, Tensor2d);
impl_rank2_pair!(Tensor2s, Tensor2);
impl_rank2_pair!(Tensor2s, Tensor2s);
impl_rank2_pair!(Tensor2s, Tensor2d);
impl_rank2_pair!(Tensor2d, Tensor2);
impl_rank2_pair!(Tensor2d, Tensor2s);

// Products of a compressed rank-2 tensor with vectors and rank-4 tensors.
macro_rules! impl_compressed_rank2 {
    ($name:ident) => {
        impl<T: Float, const ND: usize> Dot<Vector<T, ND>> for $name<T, ND> {
            type Output = Vector<T, ND>;

            fn dot(&self, rhs: &Vector<T, ND>) -> Vector<T, ND> {
                let b = rhs.as_array();
                Vector::from_fn(|i| sum(ND, |j| self.at(i, j) * b[j]))
            }
        }

        impl<T: Float, const ND: usize> Dot<$name<T, ND>> for Vector<T, ND> {
            type Output = Vector<T, ND>;

            fn dot(&self, rhs: &$name<T, ND>) -> Vector<T, ND> {
                let a = self.as_array();
                Vector::from_fn(|j| sum(ND, |i| a[i] * rhs.at(i, j)))
            }
        }

        impl<T: Float, const ND: usize> Ddot<$name<T, ND>> for Tensor4<T, ND> {
            type Output = Tensor2<T, ND>;

            fn ddot(&self, rhs: &$name<T, ND>) -> Tensor2<T, ND> {
                let c = self.as_array();
                Tensor2::from_fn(|i, j| sum(ND, |k| sum(ND, |l| c[i][j][k][l] * rhs.at(k, l))))
            }
        }

        impl<T: Float, const ND: usize> Ddot<Tensor4<T, ND>> for $name<T, ND> {
            type Output = Tensor2<T, ND>;

            fn ddot(&self, rhs: &Tensor4<T, ND>) -> Tensor2<T, ND> {
                let c = rhs.as_array();
                Tensor2::from_fn(|k, l| sum(ND, |i| sum(ND, |j| self.at(i, j) * c[i][j][k][l])))
            }
        }
    };
}

impl_compressed_rank2!(Tensor2s);
impl_compressed_rank2!(Tensor2d);

impl<T: Float, const ND: usize> Dot for Tensor2d<T, ND> {
    type Output = Tensor2d<T, ND>;

    fn dot(&self, rhs: &Self) -> Self {
        let (a, b) = (self.as_array(), rhs.as_array());
        Tensor2d::from_fn(|i| a[i] * b[i])
    }
}

impl<T: Float, const ND: usize> Ddot for Tensor2d<T, ND> {
    type Output = T;

    fn ddot(&self, rhs: &Self) -> T {
        let (a, b) = (self.as_array(), rhs.as_array());
        sum(ND, |i| a[i] * b[i])
    }
}

impl<T: Float, const ND: usize> Dyadic for Tensor2d<T, ND> {
    type Output = Tensor4<T, ND>;

    fn dyadic(&self, rhs: &Self) -> Tensor4<T, ND> {
        Tensor4::from_fn(|i, j, k, l| self.at(i, j) * rhs.at(k, l))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::Rng;

    fn random_tensor2<const ND: usize>(rng: &mut impl Rng) -> Tensor2<f64, ND> {
        Tensor2::from_fn(|_, _| rng.random_range(-1.0..1.0))
    }

    #[test]
    fn vector_products() {
        let a = Vector::<f64, 3>::from_array([1.0, 2.0, 3.0]);
        let b = Vector::<f64, 3>::from_array([4.0, 5.0, 6.0]);
        assert_eq!(a.dot(&b), 32.0);
        assert_eq!(dot(&a, &b), 32.0);
        let ab = a.dyadic(&b);
        assert_eq!(ab[[1, 2]], 12.0);
        assert_eq!(ab.trace(), a.dot(&b));
    }

    #[test]
    fn matrix_vector_products() {
        let m = Tensor2::<f64, 2>::from_array([[1.0, 2.0], [3.0, 4.0]]);
        let v = Vector::<f64, 2>::from_array([1.0, -1.0]);
        assert_eq!(m.dot(&v).as_slice(), &[-1.0, -1.0]);
        assert_eq!(v.dot(&m).as_slice(), &[-2.0, -2.0]);
        assert_eq!(m.transpose().dot(&v), v.dot(&m));
        assert_eq!(m.dot(&m).rows(), &[[7.0, 10.0], [15.0, 22.0]]);
    }

    #[test]
    fn double_contraction_matches_naive_sum() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let a = random_tensor2::<3>(&mut rng);
            let b = random_tensor2::<3>(&mut rng);
            let mut naive = 0.0;
            for i in 0..3 {
                for j in 0..3 {
                    naive += a[[i, j]] * b[[i, j]];
                }
            }
            assert_relative_eq!(a.ddot(&b), naive, epsilon = 1e-12);
            assert_relative_eq!(ddot(&a, &a).sqrt(), a.norm(), epsilon = 1e-12);
        }
    }

    #[test]
    fn dyadic_of_equal_vectors() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let a = Vector::<f64, 2>::from_fn(|_| rng.random_range(-1.0..1.0));
            let aa = dyadic(&a, &a);
            assert!(aa.is_symmetric());
            assert_relative_eq!(aa.ddot(&aa), a.dot(&a) * a.dot(&a), epsilon = 1e-12);
        }
    }

    #[test]
    fn identities_act_on_rank2() {
        let mut rng = rand::rng();
        let a = random_tensor2::<3>(&mut rng);
        let close = |x: &Tensor2<f64, 3>, y: &Tensor2<f64, 3>| {
            x.iter()
                .zip(y.iter())
                .for_each(|(p, q)| assert_relative_eq!(p, q, epsilon = 1e-12));
        };
        close(&Tensor4::<f64, 3>::identity().ddot(&a), &a);
        close(&Tensor4::<f64, 3>::identity_rt().ddot(&a), &a.transpose());
        close(
            &Tensor4::<f64, 3>::identity_ii().ddot(&a),
            &Tensor2::<f64, 3>::identity().map(|x| x * a.trace()),
        );
        close(&Tensor4::<f64, 3>::identity_sym().ddot(&a), &a.sym());
        close(&Tensor4::<f64, 3>::identity_dev().ddot(&a), &a.sym().dev());
        close(&a.ddot(&Tensor4::<f64, 3>::identity()), &a);
    }

    #[test]
    fn compressed_products_match_dense() -> Result<(), crate::CartesianError> {
        let mut rng = rand::rng();
        let full = random_tensor2::<3>(&mut rng);
        let sym = Tensor2s::<f64, 3>::from_fn(|_, _| rng.random_range(-1.0..1.0));
        let diag = Tensor2d::<f64, 3>::from_fn(|_| rng.random_range(-1.0..1.0));
        let (sd, dd) = (sym.to_dense(), diag.to_dense());
        let v = Vector::<f64, 3>::from_fn(|_| rng.random_range(-1.0..1.0));
        let c = full.dyadic(&sd);

        let close2 = |x: Tensor2<f64, 3>, y: Tensor2<f64, 3>| {
            x.iter()
                .zip(y.iter())
                .for_each(|(p, q)| assert_relative_eq!(p, q, epsilon = 1e-12));
        };
        close2(full.dot(&sym), full.dot(&sd));
        close2(sym.dot(&full), sd.dot(&full));
        close2(sym.dot(&sym), sd.dot(&sd));
        close2(sym.dot(&diag), sd.dot(&dd));
        close2(diag.dot(&sym), dd.dot(&sd));
        close2(diag.dot(&full), dd.dot(&full));
        close2(full.dot(&diag), full.dot(&dd));
        close2(diag.dot(&diag).to_dense(), dd.dot(&dd));

        assert_relative_eq!(sym.ddot(&full), sd.ddot(&full), epsilon = 1e-12);
        assert_relative_eq!(full.ddot(&diag), full.ddot(&dd), epsilon = 1e-12);
        assert_relative_eq!(sym.ddot(&diag), sd.ddot(&dd), epsilon = 1e-12);
        assert_relative_eq!(diag.ddot(&diag), dd.ddot(&dd), epsilon = 1e-12);
        assert_relative_eq!(sym.ddot(&sym), sd.ddot(&sd), epsilon = 1e-12);

        close2(c.ddot(&sym), c.ddot(&sd));
        close2(sym.ddot(&c), sd.ddot(&c));
        close2(c.ddot(&diag), c.ddot(&dd));
        close2(diag.ddot(&c), dd.ddot(&c));

        for (p, q) in sym.dot(&v).iter().zip(sd.dot(&v).iter()) {
            assert_relative_eq!(p, q, epsilon = 1e-12);
        }
        for (p, q) in v.dot(&diag).iter().zip(v.dot(&dd).iter()) {
            assert_relative_eq!(p, q, epsilon = 1e-12);
        }

        assert_eq!(sym.dyadic(&diag), sd.dyadic(&dd));
        assert_eq!(diag.dyadic(&diag), dd.dyadic(&dd));
        assert_eq!(full.dyadic(&sym), c);
        Ok(())
    }

    #[test]
    fn symmetric_projection_of_compressed() -> Result<(), crate::CartesianError> {
        let sym = Tensor2s::<f64, 2>::from_list(&[1.0, 2.0, 3.0])?;
        let projected = Tensor4::<f64, 2>::identity_sym().ddot(&sym);
        assert_eq!(Tensor2s::from_dense(&projected)?, sym);
        let dev = Tensor4::<f64, 2>::identity_dev().ddot(&sym);
        assert_relative_eq!(dev.trace(), 0.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn rank4_contractions() {
        let mut rng = rand::rng();
        let a = random_tensor2::<2>(&mut rng);
        let b = random_tensor2::<2>(&mut rng);
        let c = a.dyadic(&b);
        // (a (x) b) : x == a (b : x)
        let x = random_tensor2::<2>(&mut rng);
        let lhs = c.ddot(&x);
        let scale = b.ddot(&x);
        for (p, q) in lhs.iter().zip(a.iter()) {
            assert_relative_eq!(*p, q * scale, epsilon = 1e-12);
        }
        // I : C == C
        let ic = Tensor4::<f64, 2>::identity().ddot(&c);
        for (p, q) in ic.iter().zip(c.iter()) {
            assert_relative_eq!(p, q, epsilon = 1e-12);
        }
        // x : (a (x) b) == (x : a) b
        let rhs = x.ddot(&c);
        let scale = x.ddot(&a);
        for (p, q) in rhs.iter().zip(b.iter()) {
            assert_relative_eq!(*p, q * scale, epsilon = 1e-12);
        }
    }
}
