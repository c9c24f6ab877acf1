use gbp_linalg::prelude::*;
use rand::Rng;

use crate::{GaussianBelief, GaussianBeliefError, Result};

impl GaussianBelief {
    /// Draw a sample using the thread local random number generator.
    ///
    /// # Errors
    /// See [`Self::sample_with`].
    pub fn sample(&self) -> Result<Vector<Float>> {
        self.sample_with(&mut rand::thread_rng())
    }

    /// Draw a sample `sqrt(V) z + m`, where `z` is a vector of independent
    /// standard normal variates and `sqrt(V)` is the principal square root of
    /// the covariance.
    ///
    /// # Errors
    /// - [`GaussianBeliefError::ImproperDistribution`] if the belief is not
    ///   proper
    /// - [`GaussianBeliefError::SingularMatrix`] if the moment form cannot be
    ///   derived
    pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vector<Float>> {
        if !self.is_proper() {
            return Err(GaussianBeliefError::ImproperDistribution);
        }
        self.ensure_moment_form()?;
        let mean = self.resolved_mean()?;
        let covariance = self.resolved_covariance()?;
        let root = covariance
            .principal_sqrt()
            .ok_or(GaussianBeliefError::ImproperDistribution)?;
        let z = standard_normal_vector(self.len(), rng);
        Ok(root.dot(&z) + mean)
    }
}
