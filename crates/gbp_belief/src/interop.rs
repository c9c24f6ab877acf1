//! Conversions between [`GaussianBelief`] and the neighbouring belief types
//! of an inference engine: scalar Gaussians and point masses.

use gbp_linalg::prelude::*;

use crate::{config::BeliefConfig, GaussianBelief, GaussianBeliefError, Result};

/// A one dimensional Gaussian belief, with the same four optional fields as
/// [`GaussianBelief`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UnivariateBelief {
    pub mean: Option<Float>,
    pub variance: Option<Float>,
    pub precision: Option<Float>,
    pub weighted_mean: Option<Float>,
}

impl UnivariateBelief {
    #[must_use]
    pub const fn from_mean_and_variance(mean: Float, variance: Float) -> Self {
        Self {
            mean:          Some(mean),
            variance:      Some(variance),
            precision:     None,
            weighted_mean: None,
        }
    }

    #[must_use]
    pub const fn from_weighted_mean_and_precision(weighted_mean: Float, precision: Float) -> Self {
        Self {
            mean:          None,
            variance:      None,
            precision:     Some(precision),
            weighted_mean: Some(weighted_mean),
        }
    }
}

impl TryFrom<&GaussianBelief> for UnivariateBelief {
    type Error = GaussianBeliefError;

    /// Unwrap the single entry of every available field.
    ///
    /// # Errors
    /// [`GaussianBeliefError::Dimension`] unless the belief is one dimensional.
    fn try_from(belief: &GaussianBelief) -> Result<Self> {
        if belief.len() != 1 {
            return Err(GaussianBeliefError::Dimension {
                expected: 1,
                found:    belief.len(),
            });
        }
        Ok(Self {
            mean:          belief.known_mean().map(|m| m[0]),
            variance:      belief.known_covariance().map(|v| v[(0, 0)]),
            precision:     belief.known_precision().map(|w| w[(0, 0)]),
            weighted_mean: belief.known_weighted_mean().map(|xi| xi[0]),
        })
    }
}

impl TryFrom<UnivariateBelief> for GaussianBelief {
    type Error = GaussianBeliefError;

    /// Wrap every available field of the scalar belief, subject to the same
    /// validation as [`GaussianBelief::new`].
    fn try_from(belief: UnivariateBelief) -> Result<Self> {
        let vector = |x: Float| Vector::from_elem(1, x);
        let matrix = |x: Float| Matrix::from_elem((1, 1), x);
        Self::new(
            belief.mean.map(vector),
            belief.variance.map(matrix),
            belief.precision.map(matrix),
            belief.weighted_mean.map(vector),
        )
    }
}

/// A degenerate belief that puts all of its mass on a single value.
#[derive(Debug, Clone, PartialEq)]
pub struct PointMass(pub Vector<Float>);

impl GaussianBelief {
    /// Approximate a point mass by a Gaussian with a covariance of
    /// [`crate::config::TINY`] times the identity. A true point mass has zero
    /// variance, which a belief cannot have.
    pub fn from_point_mass(point: &PointMass) -> Result<Self> {
        Self::from_point_mass_with(point, &BeliefConfig::default())
    }

    /// Like [`Self::from_point_mass`], with the variance taken from `config`.
    pub fn from_point_mass_with(point: &PointMass, config: &BeliefConfig) -> Result<Self> {
        let PointMass(value) = point;
        Self::from_mean_and_covariance(
            value.clone(),
            Matrix::eye(value.len()) * config.tiny.get(),
        )
    }
}

impl TryFrom<PointMass> for GaussianBelief {
    type Error = GaussianBeliefError;

    fn try_from(point: PointMass) -> Result<Self> {
        Self::from_point_mass(&point)
    }
}
