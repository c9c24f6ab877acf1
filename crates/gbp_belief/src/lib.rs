//! Multivariate Gaussian beliefs that can be held in moment form (mean and
//! covariance), in canonical form (weighted mean and precision), or both.
//!
//! Messages in Gaussian belief propagation are produced in whichever form is
//! natural for the factor or variable sending them. [`GaussianBelief`] keeps
//! what it was given and only inverts a matrix when the other form is
//! actually asked for.

pub mod config;
mod consistency;
mod display;
pub mod error;
pub mod interop;
mod product;
mod sample;

mod belief;

pub use belief::{BeliefField, GaussianBelief};
pub use config::BeliefConfig;
pub use error::{GaussianBeliefError, Malformation, NumericRangeIssue, Result};
pub use interop::{PointMass, UnivariateBelief};
