//! The dual-parametrization Gaussian belief.

use std::sync::OnceLock;

use gbp_linalg::prelude::*;
use tracing::{debug, warn};

use crate::{
    config::{BeliefConfig, HUGE},
    GaussianBeliefError, Malformation, NumericRangeIssue, Result,
};

/// Names of the four fields of a [`GaussianBelief`], used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum BeliefField {
    Mean,
    Covariance,
    Precision,
    #[strum(serialize = "weighted mean")]
    WeightedMean,
}

/// Multivariate Gaussian belief held in moment form (mean, covariance), in
/// canonical form (weighted mean, precision), or in any mix of the two.
///
/// Fields that were not supplied are derived the first time they are needed
/// and memoized, so each matrix is inverted at most once per belief. The
/// cache sits behind a [`OnceLock`] per field, which makes the lazy fill safe
/// when the belief is shared between threads.
///
/// # Example:
/// ```
/// use gbp_belief::{GaussianBelief, Result};
/// use gbp_linalg::array;
/// fn main() -> Result<()> {
///     let belief = GaussianBelief::from_mean_and_covariance(
///         array![1.0, 3.0],
///         array![[2.0, 0.0], [0.0, 2.0]],
///     )?;
///     assert!(belief.known_precision().is_none());
///     let precision = belief.resolved_precision()?;
///     assert_eq!(precision, &array![[0.5, 0.0], [0.0, 0.5]]);
///     assert_eq!(belief.variance()?, array![2.0, 2.0]);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct GaussianBelief {
    dim: usize,
    mean: OnceLock<Vector<Float>>,
    covariance: OnceLock<Matrix<Float>>,
    precision: OnceLock<Matrix<Float>>,
    weighted_mean: OnceLock<Vector<Float>>,
}

/// Return the memoized value of `cell`, deriving and storing it first if the
/// cell is empty.
fn memoize<T>(cell: &OnceLock<T>, derive: impl FnOnce() -> Result<T>) -> Result<&T> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = derive()?;
    // another thread may have won the race, in which case its value is kept
    Ok(cell.get_or_init(|| value))
}

fn cell<T>(value: Option<T>) -> OnceLock<T> {
    value.map_or_else(OnceLock::new, OnceLock::from)
}

fn check_square(field: BeliefField, matrix: Option<&Matrix<Float>>) -> Result<()> {
    match matrix {
        Some(m) if !m.is_square() => Err(Malformation::NonSquare {
            field,
            nrows: m.nrows(),
            ncols: m.ncols(),
        }
        .into()),
        _ => Ok(()),
    }
}

/// Checks that a covariance or precision matrix has no infinite entries, and
/// no diagonal entry indistinguishable from zero.
fn check_numeric_range(field: BeliefField, matrix: Option<&Matrix<Float>>) -> Result<()> {
    let Some(matrix) = matrix else {
        return Ok(());
    };
    if let Some(((row, col), _)) = matrix.indexed_iter().find(|(_, x)| x.is_infinite()) {
        return Err(GaussianBeliefError::NumericRange {
            field,
            issue: NumericRangeIssue::InfiniteEntry { row, col },
        });
    }
    // NaN fails the comparison as well
    if let Some((index, &value)) = matrix
        .diag()
        .iter()
        .enumerate()
        .find(|(_, x)| !(x.abs() > Float::MIN_POSITIVE))
    {
        return Err(GaussianBeliefError::NumericRange {
            field,
            issue: NumericRangeIssue::DegenerateDiagonal { index, value },
        });
    }
    Ok(())
}

impl GaussianBelief {
    /// Create a belief from any combination of its four fields.
    ///
    /// The fields are validated in order:
    /// 1. paired fields agree on their shape, and matrices are square
    /// 2. every supplied field has the same dimension
    /// 3. a supplied covariance or precision has no infinite entries and no
    ///    degenerate diagonal entries
    /// 4. at least one of `mean`/`weighted_mean` and one of
    ///    `covariance`/`precision` is supplied
    ///
    /// # Errors
    /// [`GaussianBeliefError::Malformed`], [`GaussianBeliefError::NumericRange`]
    /// or [`GaussianBeliefError::Underdetermined`] for the steps above.
    pub fn new(
        mean: Option<Vector<Float>>,
        covariance: Option<Matrix<Float>>,
        precision: Option<Matrix<Float>>,
        weighted_mean: Option<Vector<Float>>,
    ) -> Result<Self> {
        check_square(BeliefField::Covariance, covariance.as_ref())?;
        check_square(BeliefField::Precision, precision.as_ref())?;

        if let (Some(m), Some(w)) = (&mean, &weighted_mean) {
            if m.len() != w.len() {
                return Err(Malformation::DimensionMismatch {
                    first:      BeliefField::Mean,
                    first_dim:  m.len(),
                    second:     BeliefField::WeightedMean,
                    second_dim: w.len(),
                }
                .into());
            }
        }
        if let (Some(v), Some(w)) = (&covariance, &precision) {
            if v.dim() != w.dim() {
                return Err(Malformation::DimensionMismatch {
                    first:      BeliefField::Covariance,
                    first_dim:  v.nrows(),
                    second:     BeliefField::Precision,
                    second_dim: w.nrows(),
                }
                .into());
            }
        }

        let dims = [
            (BeliefField::Mean, mean.as_ref().map(Vector::len)),
            (BeliefField::WeightedMean, weighted_mean.as_ref().map(Vector::len)),
            (BeliefField::Covariance, covariance.as_ref().map(Matrix::nrows)),
            (BeliefField::Precision, precision.as_ref().map(Matrix::nrows)),
        ];
        let mut supplied = dims
            .iter()
            .filter_map(|&(field, dim)| dim.map(|dim| (field, dim)));
        let (first, dim) = supplied.next().unwrap_or((BeliefField::Mean, 1));
        if let Some((second, second_dim)) = supplied.find(|&(_, d)| d != dim) {
            return Err(Malformation::DimensionMismatch {
                first,
                first_dim: dim,
                second,
                second_dim,
            }
            .into());
        }

        check_numeric_range(BeliefField::Covariance, covariance.as_ref())?;
        check_numeric_range(BeliefField::Precision, precision.as_ref())?;

        let belief = Self {
            dim,
            mean: cell(mean),
            covariance: cell(covariance),
            precision: cell(precision),
            weighted_mean: cell(weighted_mean),
        };
        if !belief.is_well_defined() {
            return Err(GaussianBeliefError::Underdetermined);
        }
        Ok(belief)
    }

    /// Create a belief in moment form.
    pub fn from_mean_and_covariance(mean: Vector<Float>, covariance: Matrix<Float>) -> Result<Self> {
        Self::new(Some(mean), Some(covariance), None, None)
    }

    /// Create a belief from a mean and a precision matrix.
    pub fn from_mean_and_precision(mean: Vector<Float>, precision: Matrix<Float>) -> Result<Self> {
        Self::new(Some(mean), None, Some(precision), None)
    }

    /// Create a belief in canonical (information) form.
    pub fn from_weighted_mean_and_precision(
        weighted_mean: Vector<Float>,
        precision: Matrix<Float>,
    ) -> Result<Self> {
        Self::new(None, None, Some(precision), Some(weighted_mean))
    }

    /// Create a belief from a weighted mean and a covariance matrix.
    pub fn from_weighted_mean_and_covariance(
        weighted_mean: Vector<Float>,
        covariance: Matrix<Float>,
    ) -> Result<Self> {
        Self::new(None, Some(covariance), None, Some(weighted_mean))
    }

    /// A vague belief of dimension `dim`: zero mean and a covariance of
    /// [`HUGE`] times the identity. Used as a neutral starting point.
    pub fn vague(dim: usize) -> Self {
        Self {
            dim,
            mean: OnceLock::from(Vector::zeros(dim)),
            covariance: OnceLock::from(Matrix::eye(dim) * HUGE),
            precision: OnceLock::new(),
            weighted_mean: OnceLock::new(),
        }
    }

    /// Like [`Self::vague`], with the covariance scale taken from `config`.
    pub fn vague_with(dim: usize, config: &BeliefConfig) -> Result<Self> {
        Self::from_mean_and_covariance(Vector::zeros(dim), Matrix::eye(dim) * config.huge.get())
    }

    /// Returns the dimension of the belief.
    #[allow(clippy::len_without_is_empty)]
    #[inline]
    pub const fn len(&self) -> usize {
        self.dim
    }

    /// At least one of mean and weighted mean, and one of covariance and
    /// precision is available. Holds for every constructed belief.
    pub fn is_well_defined(&self) -> bool {
        (self.mean.get().is_some() || self.weighted_mean.get().is_some())
            && (self.covariance.get().is_some() || self.precision.get().is_some())
    }

    /// The mean, if it was supplied or has already been derived.
    #[inline]
    pub fn known_mean(&self) -> Option<&Vector<Float>> {
        self.mean.get()
    }

    /// The covariance matrix, if it was supplied or has already been derived.
    #[inline]
    pub fn known_covariance(&self) -> Option<&Matrix<Float>> {
        self.covariance.get()
    }

    /// The precision matrix, if it was supplied or has already been derived.
    #[inline]
    pub fn known_precision(&self) -> Option<&Matrix<Float>> {
        self.precision.get()
    }

    /// The weighted mean, if it was supplied or has already been derived.
    #[inline]
    pub fn known_weighted_mean(&self) -> Option<&Vector<Float>> {
        self.weighted_mean.get()
    }

    /// The mean, deriving it as `covariance * weighted_mean` if necessary.
    pub fn resolved_mean(&self) -> Result<&Vector<Float>> {
        memoize(&self.mean, || {
            let weighted_mean = self
                .weighted_mean
                .get()
                .ok_or(GaussianBeliefError::Underdetermined)?;
            let covariance = self.resolved_covariance()?;
            debug!("deriving mean of {}-dimensional belief", self.dim);
            Ok(covariance.dot(weighted_mean))
        })
    }

    /// The weighted mean, deriving it as `precision * mean` if necessary.
    pub fn resolved_weighted_mean(&self) -> Result<&Vector<Float>> {
        memoize(&self.weighted_mean, || {
            let mean = self
                .mean
                .get()
                .ok_or(GaussianBeliefError::Underdetermined)?;
            let precision = self.resolved_precision()?;
            debug!("deriving weighted mean of {}-dimensional belief", self.dim);
            Ok(precision.dot(mean))
        })
    }

    /// The covariance matrix, inverting the precision matrix if necessary.
    pub fn resolved_covariance(&self) -> Result<&Matrix<Float>> {
        memoize(&self.covariance, || {
            let precision = self
                .precision
                .get()
                .ok_or(GaussianBeliefError::Underdetermined)?;
            debug!("deriving covariance of {}-dimensional belief", self.dim);
            precision.try_inverse().ok_or_else(|| {
                warn!("precision matrix of {}-dimensional belief is singular", self.dim);
                GaussianBeliefError::SingularMatrix(BeliefField::Precision)
            })
        })
    }

    /// The precision matrix, inverting the covariance matrix if necessary.
    pub fn resolved_precision(&self) -> Result<&Matrix<Float>> {
        memoize(&self.precision, || {
            let covariance = self
                .covariance
                .get()
                .ok_or(GaussianBeliefError::Underdetermined)?;
            debug!("deriving precision of {}-dimensional belief", self.dim);
            covariance.try_inverse().ok_or_else(|| {
                warn!("covariance matrix of {}-dimensional belief is singular", self.dim);
                GaussianBeliefError::SingularMatrix(BeliefField::Covariance)
            })
        })
    }

    /// Make sure the mean is available.
    ///
    /// # Errors
    /// [`GaussianBeliefError::SingularMatrix`] if the covariance has to be
    /// derived from a singular precision matrix.
    pub fn ensure_mean(&self) -> Result<&Self> {
        self.resolved_mean().map(|_| self)
    }

    /// Make sure the weighted mean is available.
    pub fn ensure_weighted_mean(&self) -> Result<&Self> {
        self.resolved_weighted_mean().map(|_| self)
    }

    /// Make sure the covariance matrix is available.
    pub fn ensure_covariance(&self) -> Result<&Self> {
        self.resolved_covariance().map(|_| self)
    }

    /// Make sure the precision matrix is available.
    pub fn ensure_precision(&self) -> Result<&Self> {
        self.resolved_precision().map(|_| self)
    }

    /// Mean and covariance.
    pub fn ensure_moment_form(&self) -> Result<&Self> {
        self.ensure_mean()?.ensure_covariance()
    }

    /// Mean and precision.
    pub fn ensure_mean_precision_form(&self) -> Result<&Self> {
        self.ensure_mean()?.ensure_precision()
    }

    /// Weighted mean and precision.
    pub fn ensure_canonical_form(&self) -> Result<&Self> {
        self.ensure_weighted_mean()?.ensure_precision()
    }

    /// Weighted mean and covariance.
    pub fn ensure_weighted_covariance_form(&self) -> Result<&Self> {
        self.ensure_weighted_mean()?.ensure_covariance()
    }

    /// Consume the belief, returning it with mean and covariance available.
    pub fn into_moment_form(self) -> Result<Self> {
        self.ensure_moment_form()?;
        Ok(self)
    }

    /// Consume the belief, returning it with weighted mean and precision
    /// available.
    pub fn into_canonical_form(self) -> Result<Self> {
        self.ensure_canonical_form()?;
        Ok(self)
    }

    /// Like [`Self::is_proper`], using the symmetry tolerance of `config`.
    pub fn is_proper_with(&self, config: &BeliefConfig) -> bool {
        self.is_proper_within(config.tolerance())
    }

    /// Whether the belief is a legitimate distribution: it is well-defined
    /// and its covariance (or, if no covariance is available, its precision)
    /// is symmetric within the default [`Tolerance`] and positive-definite.
    pub fn is_proper(&self) -> bool {
        self.is_proper_within(Tolerance::default())
    }

    fn is_proper_within(&self, symmetry_tolerance: Tolerance) -> bool {
        self.is_well_defined()
            && self
                .covariance
                .get()
                .or_else(|| self.precision.get())
                .is_some_and(|m| m.is_positive_definite(symmetry_tolerance))
    }

    /// The mean of the belief, or a vector of NaN if the belief is not proper.
    ///
    /// # Errors
    /// [`GaussianBeliefError::SingularMatrix`] if deriving the mean requires
    /// inverting a numerically singular matrix.
    pub fn mean(&self) -> Result<Vector<Float>> {
        if !self.is_proper() {
            return Ok(Vector::from_elem(self.dim, Float::NAN));
        }
        self.ensure_moment_form()?.resolved_mean().cloned()
    }

    /// The covariance of the belief, or a matrix of NaN if the belief is not
    /// proper.
    pub fn covariance(&self) -> Result<Matrix<Float>> {
        if !self.is_proper() {
            return Ok(Matrix::from_elem((self.dim, self.dim), Float::NAN));
        }
        self.resolved_covariance().cloned()
    }

    /// The diagonal of [`Self::covariance`].
    pub fn variance(&self) -> Result<Vector<Float>> {
        self.covariance().map(|covariance| covariance.diag().to_owned())
    }
}
