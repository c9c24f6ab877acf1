use gbp_linalg::Float;

use crate::BeliefField;

/// The ways the fields handed to [`crate::GaussianBelief::new`] can disagree
/// about the shape of the belief.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Malformation {
    #[error("the {field} matrix is not square, it has shape {nrows}x{ncols}")]
    NonSquare {
        field: BeliefField,
        nrows: usize,
        ncols: usize,
    },
    #[error("the {first} has dimension {first_dim}, but the {second} has dimension {second_dim}")]
    DimensionMismatch {
        first:      BeliefField,
        first_dim:  usize,
        second:     BeliefField,
        second_dim: usize,
    },
}

/// Numeric defects of a supplied covariance or precision matrix.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NumericRangeIssue {
    #[error("entry ({row}, {col}) is infinite")]
    InfiniteEntry { row: usize, col: usize },
    #[error("diagonal entry {index} is {value}, which is indistinguishable from zero")]
    DegenerateDiagonal { index: usize, value: Float },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GaussianBeliefError {
    #[error("malformed belief: {0}")]
    Malformed(#[from] Malformation),
    #[error("the {field} matrix is out of range: {issue}")]
    NumericRange {
        field: BeliefField,
        issue: NumericRangeIssue,
    },
    #[error(
        "the belief is underdetermined, it needs a mean or weighted mean, and a covariance or precision matrix"
    )]
    Underdetermined,
    #[error("the {0} matrix is not invertible, which is required to derive the missing parametrization")]
    SingularMatrix(BeliefField),
    #[error("consistency cannot be determined, neither the covariance nor the precision matrix is invertible")]
    ConsistencyUndeterminable,
    #[error("the belief is not proper, its covariance is not positive-definite")]
    ImproperDistribution,
    #[error("expected a belief of dimension {expected}, but it has dimension {found}")]
    Dimension { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, GaussianBeliefError>;
