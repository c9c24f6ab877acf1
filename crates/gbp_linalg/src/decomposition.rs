//! Decompositions of square matrices.
//!
//! Inversion goes through `ndarray_inverse`. Cholesky factorisation and the
//! symmetric eigen-decomposition are delegated to `nalgebra`; matrices are
//! converted to `nalgebra::DMatrix` at this boundary and back again, so the
//! rest of the workspace only ever sees `ndarray` types.

use nalgebra as na;
use ndarray_inverse::Inverse;

use super::{
    approx_eq::{ApproxEq, Tolerance},
    Float, Matrix, Vector,
};

fn to_nalgebra(m: &Matrix<Float>) -> na::DMatrix<Float> {
    na::DMatrix::from_fn(m.nrows(), m.ncols(), |i, j| m[(i, j)])
}

fn from_nalgebra(m: &na::DMatrix<Float>) -> Matrix<Float> {
    Matrix::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// `(A + Aᵀ) / 2`. Callers guarantee `m` is square.
fn symmetric_part(m: &Matrix<Float>) -> Matrix<Float> {
    (m + &m.t()) / 2.0
}

/// Eigen-decomposition of a symmetric matrix, `A = V diag(λ) Vᵀ`.
#[derive(Debug, Clone)]
pub struct SymmetricEigen {
    /// Eigenvalues, in no particular order.
    pub eigenvalues: Vector<Float>,
    /// Orthonormal eigenvectors, stored as columns. Column `i` belongs to
    /// `eigenvalues[i]`.
    pub eigenvectors: Matrix<Float>,
}

impl SymmetricEigen {
    /// Rebuild `V f(Λ) Vᵀ` for a function applied to each eigenvalue.
    pub fn recompose(&self, f: impl Fn(Float) -> Float) -> Matrix<Float> {
        let scaled = &self.eigenvectors * &self.eigenvalues.mapv(f);
        scaled.dot(&self.eigenvectors.t())
    }
}

/// Extension trait for square matrices.
///
/// Every method answers `None` (or `false`) for a non-square matrix instead of
/// panicking.
pub trait SquareMatrixExt: Sized {
    /// Invert the matrix.
    /// Returns `None` if the matrix is not square, or if it is singular to
    /// the point that the inverse contains non-finite entries.
    fn try_inverse(&self) -> Option<Self>;

    /// Lower triangular Cholesky factor `L` with `A = L Lᵀ`.
    /// Only the lower triangle of `self` is read.
    /// Returns `None` if the matrix is not (numerically) positive-definite.
    fn cholesky_factor(&self) -> Option<Self>;

    /// Whether the matrix equals its transpose within `tolerance`, i.e.
    /// `a_ij` and `a_ji` agree either absolutely or relatively for every pair
    /// of mirrored entries.
    fn is_symmetric(&self, tolerance: Tolerance) -> bool;

    /// Whether the matrix is symmetric within `tolerance` and its symmetric
    /// part admits a Cholesky factorisation.
    fn is_positive_definite(&self, tolerance: Tolerance) -> bool;

    /// Eigen-decomposition of the symmetric part of the matrix.
    /// Returns `None` for non-square matrices or non-finite entries.
    fn symmetric_eigen(&self) -> Option<SymmetricEigen>;

    /// Principal square root of a symmetric positive semi-definite matrix,
    /// i.e. the unique symmetric PSD `S` with `S S = A`.
    /// Eigenvalues that rounding pushed slightly below zero are clamped to zero.
    fn principal_sqrt(&self) -> Option<Matrix<Float>> {
        self.symmetric_eigen()
            .map(|eigen| eigen.recompose(|lambda| lambda.max(0.0).sqrt()))
    }
}

impl SquareMatrixExt for Matrix<Float> {
    fn try_inverse(&self) -> Option<Self> {
        if !self.is_square() {
            return None;
        }
        if self.is_empty() {
            return Some(self.clone());
        }
        self.inv()
            .filter(|inverse| inverse.iter().all(|x| x.is_finite()))
    }

    fn cholesky_factor(&self) -> Option<Self> {
        if !self.is_square() || !self.iter().all(|x| x.is_finite()) {
            return None;
        }
        if self.is_empty() {
            return Some(self.clone());
        }
        na::Cholesky::new(to_nalgebra(self)).map(|cholesky| from_nalgebra(&cholesky.l()))
    }

    fn is_symmetric(&self, tolerance: Tolerance) -> bool {
        self.is_square() && self.approx_eq(&self.t(), tolerance)
    }

    fn is_positive_definite(&self, tolerance: Tolerance) -> bool {
        self.is_symmetric(tolerance) && symmetric_part(self).cholesky_factor().is_some()
    }

    fn symmetric_eigen(&self) -> Option<SymmetricEigen> {
        if !self.is_square() || !self.iter().all(|x| x.is_finite()) {
            return None;
        }
        if self.is_empty() {
            return Some(SymmetricEigen {
                eigenvalues:  Vector::zeros(0),
                eigenvectors: self.clone(),
            });
        }
        let eigen = na::SymmetricEigen::new(to_nalgebra(&symmetric_part(self)));
        Some(SymmetricEigen {
            eigenvalues:  eigen.eigenvalues.iter().copied().collect(),
            eigenvectors: from_nalgebra(&eigen.eigenvectors),
        })
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use arbtest::arbtest;
    use ndarray::array;
    use paste::paste;
    use pretty_assertions::assert_eq;

    use super::*;

    macro_rules! test_positive_definiteness {
        ($($name:ident: $matrix:expr => $expected:expr),* $(,)?) => {
            $(
                paste! {
                    #[test]
                    fn [<$name _positive_definiteness>]() {
                        let m: Matrix<Float> = $matrix;
                        assert_eq!(m.is_positive_definite(Tolerance::default()), $expected);
                    }
                }
            )*
        };
    }

    test_positive_definiteness! {
        symmetric: array![[2.0, 0.5], [0.5, 1.0]] => true,
        indefinite: array![[1.0, 2.0], [2.0, 1.0]] => false,
        asymmetric: array![[2.0, 0.5], [0.0, 1.0]] => false,
        negative_scalar: array![[-1.0]] => false,
        tiny_diagonal: array![[1e-12, 0.0], [0.0, 1e-12]] => true,
        near_zero_asymmetry: array![[1.0, 1e-20], [0.0, 1.0]] => true,
        non_finite: array![[Float::NAN, 0.0], [0.0, 1.0]] => false,
        non_square: array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] => false,
    }

    #[test]
    fn inverse_of_diagonal() {
        let m: Matrix<Float> = array![[2.0, 0.0], [0.0, 4.0]];
        let inv = m.try_inverse().unwrap();
        assert_relative_eq!(inv[(0, 0)], 0.5, epsilon = 1e-12);
        assert_relative_eq!(inv[(1, 1)], 0.25, epsilon = 1e-12);
        assert_relative_eq!(inv[(0, 1)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn inverse_of_singular_is_none() {
        let m: Matrix<Float> = array![[1.0, 2.0], [2.0, 4.0]];
        assert!(m.try_inverse().is_none());
        let zero: Matrix<Float> = Matrix::zeros((3, 3));
        assert!(zero.try_inverse().is_none());
    }

    #[test]
    fn non_square_matrices_are_rejected() {
        let m: Matrix<Float> = array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        assert!(m.try_inverse().is_none());
        assert!(m.cholesky_factor().is_none());
        assert!(m.symmetric_eigen().is_none());
        assert!(m.principal_sqrt().is_none());
        assert!(!m.is_symmetric(Tolerance::default()));
    }

    #[test]
    fn cholesky_reconstructs() {
        let m: Matrix<Float> = array![[4.0, 2.0, 0.4], [2.0, 5.0, 1.0], [0.4, 1.0, 3.0]];
        let l = m.cholesky_factor().unwrap();
        let reconstructed = l.dot(&l.t());
        for (a, b) in reconstructed.iter().zip(m.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-10);
        }
        // entries above the diagonal are zero
        assert_eq!(l[(0, 1)], 0.0);
        assert_eq!(l[(0, 2)], 0.0);
        assert_eq!(l[(1, 2)], 0.0);
    }

    #[test]
    fn symmetry_uses_absolute_floor() {
        let m: Matrix<Float> = array![[1.0, 1e-20], [0.0, 1.0]];
        assert!(m.is_symmetric(Tolerance::default()));
        assert!(!m.is_symmetric(Tolerance::new(1e-8, 0.0)));

        let relative_only: Matrix<Float> = array![[2.0, 1.0], [0.0, 2.0]];
        assert!(!relative_only.is_symmetric(Tolerance::default()));
        assert!(relative_only.is_symmetric(Tolerance::new(1.0, 0.0)));
    }

    #[test]
    fn principal_sqrt_squares_back() {
        let m: Matrix<Float> = array![[4.0, 1.0], [1.0, 3.0]];
        let s = m.principal_sqrt().unwrap();
        assert!(s.is_symmetric(Tolerance::new(1e-10, 1e-12)));
        let squared = s.dot(&s);
        for (a, b) in squared.iter().zip(m.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-10, max_relative = 1e-10);
        }
    }

    #[test]
    fn principal_sqrt_of_diagonal() {
        let m: Matrix<Float> = array![[9.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 0.25]];
        let s = m.principal_sqrt().unwrap();
        assert_relative_eq!(s[(0, 0)], 3.0, epsilon = 1e-10);
        assert_relative_eq!(s[(1, 1)], 2.0, epsilon = 1e-10);
        assert_relative_eq!(s[(2, 2)], 0.5, epsilon = 1e-10);
        assert_relative_eq!(s[(0, 1)], 0.0, epsilon = 1e-10);
    }

    #[test]
    fn empty_matrix_decomposes_trivially() {
        let m: Matrix<Float> = Matrix::zeros((0, 0));
        assert!(m.is_positive_definite(Tolerance::default()));
        assert_eq!(m.principal_sqrt().unwrap().dim(), (0, 0));
    }

    #[test]
    fn eigenvalues_of_known_matrix() {
        let m: Matrix<Float> = array![[2.0, 1.0], [1.0, 2.0]];
        let eigen = m.symmetric_eigen().unwrap();
        let mut values = eigen.eigenvalues.to_vec();
        values.sort_by(Float::total_cmp);
        assert_relative_eq!(values[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(values[1], 3.0, epsilon = 1e-12);
        // eigenvectors are orthonormal
        let vtv = eigen.eigenvectors.t().dot(&eigen.eigenvectors);
        for ((i, j), x) in vtv.indexed_iter() {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_relative_eq!(*x, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn principal_sqrt_of_arbitrary_spd_matrix() {
        // A = B Bᵀ + I is symmetric positive definite for any B
        arbtest(|u| {
            let n = u.int_in_range(1..=5)?;
            let mut b = Matrix::<Float>::zeros((n, n));
            for x in &mut b {
                *x = f64::from(u.int_in_range(-100..=100)?) / 10.0;
            }
            let a = b.dot(&b.t()) + Matrix::<Float>::eye(n);
            assert!(a.is_positive_definite(Tolerance::default()));

            let s = a.principal_sqrt().unwrap();
            let squared = s.dot(&s);
            for (x, y) in squared.iter().zip(a.iter()) {
                assert_relative_eq!(*x, *y, epsilon = 1e-8, max_relative = 1e-8);
            }

            let inverse = a.try_inverse().unwrap();
            let identity = a.dot(&inverse);
            for ((i, j), x) in identity.indexed_iter() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(*x, expected, epsilon = 1e-8);
            }
            Ok(())
        })
        .budget_ms(100);
    }
}
