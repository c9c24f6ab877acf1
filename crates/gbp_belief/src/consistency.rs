//! Consistency of over-determined beliefs, and approximate equality.

use gbp_linalg::prelude::*;
use tracing::trace;

use crate::{config::BeliefConfig, GaussianBelief, GaussianBeliefError, Result};

impl GaussianBelief {
    /// Whether the available parametrizations describe the same distribution,
    /// using the default [`Tolerance`].
    ///
    /// A belief with only one field of each pair is trivially consistent.
    ///
    /// # Errors
    /// [`GaussianBeliefError::ConsistencyUndeterminable`] if both the
    /// covariance and the precision matrix are available but neither can be
    /// inverted.
    pub fn is_consistent(&self) -> Result<bool> {
        self.is_consistent_within(Tolerance::default())
    }

    /// Like [`Self::is_consistent`], with the tolerance of `config`.
    pub fn is_consistent_with(&self, config: &BeliefConfig) -> Result<bool> {
        self.is_consistent_within(config.tolerance())
    }

    pub fn is_consistent_within(&self, tolerance: Tolerance) -> Result<bool> {
        let covariance = self.known_covariance();
        let precision = self.known_precision();

        if let (Some(covariance), Some(precision)) = (covariance, precision) {
            let consistent = if let Some(inverse) = covariance.try_inverse() {
                inverse.approx_eq(precision, tolerance)
            } else if let Some(inverse) = precision.try_inverse() {
                inverse.approx_eq(covariance, tolerance)
            } else {
                return Err(GaussianBeliefError::ConsistencyUndeterminable);
            };
            if !consistent {
                trace!("covariance and precision matrix disagree");
                return Ok(false);
            }
        }

        if let (Some(mean), Some(weighted_mean)) = (self.known_mean(), self.known_weighted_mean()) {
            let consistent = match (covariance, precision) {
                (Some(covariance), _) => covariance.dot(weighted_mean).approx_eq(mean, tolerance),
                (None, Some(precision)) => precision.dot(mean).approx_eq(weighted_mean, tolerance),
                (None, None) => return Err(GaussianBeliefError::Underdetermined),
            };
            if !consistent {
                trace!("mean and weighted mean disagree");
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Approximate equality, using the default [`Tolerance`].
    ///
    /// The mean-like fields are compared directly if both beliefs hold a mean,
    /// or else if both hold a weighted mean. Otherwise the mean of both is
    /// derived and compared. The covariance-like fields are compared the same
    /// way. Beliefs of different dimension are never equal, and neither are
    /// beliefs for which a required derivation fails.
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.approx_eq_within(other, Tolerance::default())
    }

    /// Like [`Self::approx_eq`], with the tolerance of `config`.
    pub fn approx_eq_with(&self, other: &Self, config: &BeliefConfig) -> bool {
        self.approx_eq_within(other, config.tolerance())
    }

    pub fn approx_eq_within(&self, other: &Self, tolerance: Tolerance) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if !self.is_well_defined() || !other.is_well_defined() || self.len() != other.len() {
            return false;
        }

        let means_eq = match (
            (self.known_mean(), other.known_mean()),
            (self.known_weighted_mean(), other.known_weighted_mean()),
        ) {
            ((Some(a), Some(b)), _) | (_, (Some(a), Some(b))) => a.approx_eq(b, tolerance),
            _ => match (self.resolved_mean(), other.resolved_mean()) {
                (Ok(a), Ok(b)) => a.approx_eq(b, tolerance),
                _ => false,
            },
        };
        if !means_eq {
            return false;
        }

        match (
            (self.known_covariance(), other.known_covariance()),
            (self.known_precision(), other.known_precision()),
        ) {
            ((Some(a), Some(b)), _) | (_, (Some(a), Some(b))) => a.approx_eq(b, tolerance),
            _ => match (self.resolved_covariance(), other.resolved_covariance()) {
                (Ok(a), Ok(b)) => a.approx_eq(b, tolerance),
                _ => false,
            },
        }
    }
}

impl PartialEq for GaussianBelief {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other)
    }
}
