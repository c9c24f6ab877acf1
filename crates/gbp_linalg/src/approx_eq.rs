//! Tolerance based elementwise comparison of vectors and matrices.

use ndarray::{ArrayBase, Data, Dimension};

use super::Float;

/// Relative and absolute tolerance used when comparing floating point arrays.
///
/// Two scalars `a` and `b` are considered equal if `|a - b| <= absolute`, or
/// if `|a - b| <= relative * max(|a|, |b|)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub relative: Float,
    pub absolute: Float,
}

impl Tolerance {
    pub const DEFAULT_RELATIVE: Float = 1e-8;
    pub const DEFAULT_ABSOLUTE: Float = 1e-12;

    #[must_use]
    pub const fn new(relative: Float, absolute: Float) -> Self {
        Self { relative, absolute }
    }

    /// Compare two scalars.
    #[inline]
    pub fn scalars_eq(&self, a: Float, b: Float) -> bool {
        approx::relative_eq!(a, b, epsilon = self.absolute, max_relative = self.relative)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RELATIVE, Self::DEFAULT_ABSOLUTE)
    }
}

/// Approximate equality of arrays. Arrays of different shape are never equal.
pub trait ApproxEq<Rhs: ?Sized = Self> {
    fn approx_eq(&self, other: &Rhs, tolerance: Tolerance) -> bool;
}

impl<S1, S2, D> ApproxEq<ArrayBase<S2, D>> for ArrayBase<S1, D>
where
    S1: Data<Elem = Float>,
    S2: Data<Elem = Float>,
    D: Dimension,
{
    fn approx_eq(&self, other: &ArrayBase<S2, D>, tolerance: Tolerance) -> bool {
        self.shape() == other.shape()
            && self
                .iter()
                .zip(other.iter())
                .all(|(&a, &b)| tolerance.scalars_eq(a, b))
    }
}
