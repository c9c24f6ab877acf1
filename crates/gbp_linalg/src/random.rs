//! Random draws used when sampling from Gaussian beliefs.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use super::{Float, Vector};

/// Draw a vector of `n` independent standard normal variates.
pub fn standard_normal_vector<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vector<Float> {
    Vector::from_shape_fn(n, |_| StandardNormal.sample(rng))
}
