//! A small collection of extension traits and types for ndarray, covering the
//! numeric kernels a Gaussian belief needs: inversion, positive-definiteness,
//! principal square roots, approximate comparison and standard normal draws.

pub mod approx_eq;
pub mod decomposition;
pub mod pretty_print;
pub mod random;

pub mod prelude {
    pub use super::{
        approx_eq::{ApproxEq, Tolerance},
        decomposition::{SquareMatrixExt, SymmetricEigen},
        pretty_print::{PrettyPrintMatrix, PrettyPrintVector},
        random::standard_normal_vector,
        Float, GbpFloat, Matrix, MatrixView, Vector, VectorView,
    };
}

/// Marker trait for floating point types used in GBP.
/// - `ndarray::NdFloat` is a trait for floating point types that can be used
///   with ndarray. It is implemented for f32 and f64.
/// - Copy, is to make some of the methods more ergonomic to use.
pub trait GbpFloat: ndarray::NdFloat + Copy {}

impl GbpFloat for f32 {}
impl GbpFloat for f64 {}

/// The precision of the floating point type used in GBP.
pub type Float = f64;

pub type Vector<T> = ndarray::Array1<T>;
pub type Matrix<T> = ndarray::Array2<T>;
pub type VectorView<'a, T> = ndarray::ArrayView1<'a, T>;
pub type MatrixView<'a, T> = ndarray::ArrayView2<'a, T>;

pub use ndarray::array;
