use std::fmt;

use gbp_linalg::prelude::*;

use crate::GaussianBelief;

fn write_vector(f: &mut fmt::Formatter<'_>, v: &Vector<Float>) -> fmt::Result {
    f.write_str("[")?;
    for (i, x) in v.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{x:?}")?;
    }
    f.write_str("]")
}

fn write_matrix(f: &mut fmt::Formatter<'_>, m: &Matrix<Float>) -> fmt::Result {
    f.write_str("[")?;
    for (i, row) in m.rows().into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_vector(f, &row.to_owned())?;
    }
    f.write_str("]")
}

/// Renders the first available pair of (mean, covariance), (mean, precision),
/// (weighted mean, precision) and (weighted mean, covariance), e.g.
/// `N(m=[1.0, 3.0], V=[[2.0, 0.0], [0.0, 2.0]])`.
///
/// The alternate form `{:#}` renders the pair as box-drawn blocks.
impl fmt::Display for GaussianBelief {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (location, spread) = match (
            self.known_mean(),
            self.known_weighted_mean(),
            self.known_covariance(),
            self.known_precision(),
        ) {
            (Some(m), _, Some(v), _) => (("m", "mean", m), ("V", "covariance", v)),
            (Some(m), _, None, Some(w)) => (("m", "mean", m), ("W", "precision", w)),
            (None, Some(xi), _, Some(w)) => (("xi", "weighted mean", xi), ("W", "precision", w)),
            (None, Some(xi), Some(v), None) => (("xi", "weighted mean", xi), ("V", "covariance", v)),
            _ => return f.write_str("N(underdetermined)"),
        };

        if f.alternate() {
            writeln!(f, "{}", location.2.pretty(Some(location.1)))?;
            write!(f, "{}", spread.2.pretty(Some(spread.1)))
        } else {
            write!(f, "N({}=", location.0)?;
            write_vector(f, location.2)?;
            write!(f, ", {}=", spread.0)?;
            write_matrix(f, spread.2)?;
            f.write_str(")")
        }
    }
}
