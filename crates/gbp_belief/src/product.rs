use std::ops::Mul;

use crate::{BeliefField, GaussianBelief, Malformation, Result};

impl GaussianBelief {
    /// Product of two beliefs over the same variables, i.e. the normalised
    /// pointwise product of their densities.
    ///
    /// In canonical form the product is the sum of the weighted means and the
    /// sum of the precision matrices, so both operands are brought into
    /// canonical form first.
    ///
    /// # Errors
    /// - [`crate::GaussianBeliefError::Malformed`] if the dimensions differ
    /// - [`crate::GaussianBeliefError::SingularMatrix`] if an operand cannot
    ///   be brought into canonical form
    pub fn product(&self, other: &Self) -> Result<Self> {
        if self.len() != other.len() {
            return Err(Malformation::DimensionMismatch {
                first:      BeliefField::Precision,
                first_dim:  self.len(),
                second:     BeliefField::Precision,
                second_dim: other.len(),
            }
            .into());
        }
        let weighted_mean = self.resolved_weighted_mean()? + other.resolved_weighted_mean()?;
        let precision = self.resolved_precision()? + other.resolved_precision()?;
        Self::from_weighted_mean_and_precision(weighted_mean, precision)
    }
}

impl Mul<&GaussianBelief> for &GaussianBelief {
    type Output = Result<GaussianBelief>;

    fn mul(self, rhs: &GaussianBelief) -> Self::Output {
        self.product(rhs)
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use gbp_linalg::{array, prelude::*};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::GaussianBeliefError;

    #[test]
    fn product_adds_canonical_parameters() {
        let a = GaussianBelief::from_weighted_mean_and_precision(
            array![1.0, 2.0, 3.0],
            Matrix::eye(3),
        )
        .unwrap();
        let b = GaussianBelief::from_weighted_mean_and_precision(
            array![3.0, 2.0, 1.0],
            Matrix::eye(3),
        )
        .unwrap();
        let product = (&a * &b).unwrap();
        assert_eq!(product.known_weighted_mean(), Some(&array![4.0, 4.0, 4.0]));
        assert_eq!(product.known_precision(), Some(&(Matrix::eye(3) * 2.0)));
        assert_eq!(product.mean().unwrap(), array![2.0, 2.0, 2.0]);
    }

    #[test]
    fn product_of_moment_forms() {
        let a = GaussianBelief::from_mean_and_covariance(array![0.0], array![[1.0]]).unwrap();
        let b = GaussianBelief::from_mean_and_covariance(array![2.0], array![[1.0]]).unwrap();
        let product = a.product(&b).unwrap();
        let expected = GaussianBelief::from_mean_and_covariance(array![1.0], array![[0.5]]).unwrap();
        assert_eq!(product, expected);
    }

    #[test]
    fn vague_belief_is_nearly_neutral() {
        let belief = GaussianBelief::from_mean_and_covariance(
            array![1.0, -1.0],
            array![[2.0, 0.3], [0.3, 1.0]],
        )
        .unwrap();
        let product = belief.product(&GaussianBelief::vague(2)).unwrap();
        assert!(product.approx_eq_within(&belief, Tolerance::new(1e-9, 1e-9)));
    }

    #[test]
    fn product_of_different_dimensions_is_malformed() {
        let result = &GaussianBelief::vague(2) * &GaussianBelief::vague(3);
        assert!(matches!(
            result,
            Err(GaussianBeliefError::Malformed(
                Malformation::DimensionMismatch {
                    first_dim: 2,
                    second_dim: 3,
                    ..
                }
            ))
        ));
    }
}
