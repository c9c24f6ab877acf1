#![allow(clippy::module_name_repetitions)]
//! Pretty printing of matrices and vectors into box-drawn blocks of text.
//! Used by the alternate (`{:#}`) rendering of beliefs, and handy when
//! logging the contents of a matrix or vector.

use std::fmt::Write;

use super::{GbpFloat, Matrix, Vector};

/// Digits after the decimal point.
const PRECISION: usize = 3;
/// Values with a larger magnitude are written in scientific notation.
const SCIENTIFIC_THRESHOLD: f64 = 1e6;
/// Widest cell, reached by scientific notation and by "-inf".
const MAX_INTEGRAL_DIGITS: usize = 9;

const BAR: char = '│';
const UPPER_LEFT_CORNER: char = '╭';
const UPPER_RIGHT_CORNER: char = '╮';
const LOWER_LEFT_CORNER: char = '╰';
const LOWER_RIGHT_CORNER: char = '╯';
const HORIZONTAL_LINE: &str = "─";

/// Count the number of integral digits in a floating point number, counting
/// the sign of negative numbers as a digit.
/// ```
/// use gbp_linalg::pretty_print::num_of_integral_digits;
/// assert_eq!(num_of_integral_digits(0.0), Some(1));
/// assert_eq!(num_of_integral_digits(10.0), Some(2));
/// assert_eq!(num_of_integral_digits(-10.0), Some(3));
/// assert_eq!(num_of_integral_digits(1e5), Some(6));
/// assert_eq!(num_of_integral_digits(1e-5), Some(1));
/// assert_eq!(num_of_integral_digits(f64::NAN), None);
/// assert_eq!(num_of_integral_digits(f64::NEG_INFINITY), None);
/// ```
#[must_use]
pub fn num_of_integral_digits(mut f: f64) -> Option<usize> {
    if !f.is_finite() {
        return None;
    }

    let mut count = 0_usize;
    if f.is_sign_negative() {
        f = -f;
        count += 1;
    }
    if f < 1.0 {
        count += 1;
    }
    while f >= 1.0 {
        f /= 10.0;
        count += 1;
    }

    Some(count)
}

fn cell_width<T: GbpFloat>(values: impl Iterator<Item = T>) -> usize {
    let widest = values
        .map(|x| x.to_f64().and_then(num_of_integral_digits).unwrap_or(0) + 1)
        .max()
        .unwrap_or(0)
        // enough for "nan", "inf" and "-inf"
        .max(5)
        .min(MAX_INTEGRAL_DIGITS);
    widest + 1 + PRECISION
}

fn write_cell(out: &mut String, x: f64, width: usize) {
    let precision = PRECISION;
    // writing into a `String` cannot fail
    let _ = if x.abs() > SCIENTIFIC_THRESHOLD {
        write!(out, "{x:width$.precision$e}")
    } else {
        write!(out, "{x:width$.precision$}")
    };
}

/// Render rows of cells inside a box, with the name and the dimensions of the
/// block in the top border.
fn render_block<T: GbpFloat>(
    rows: usize,
    cols: usize,
    at: impl Fn(usize, usize) -> T,
    name: Option<&str>,
) -> String {
    let width = cell_width(
        (0..rows)
            .flat_map(|i| (0..cols).map(move |j| (i, j)))
            .map(|(i, j)| at(i, j)),
    );
    let right_padding = width / 2;
    let total_width = cols * width + right_padding;
    let dims = format!("{rows}x{cols}");

    let mut out = String::new();
    let name = name.unwrap_or("");
    if name.chars().count() + dims.len() > total_width {
        let _ = writeln!(out, "{name}:{dims}");
        out.push(UPPER_LEFT_CORNER);
        out.push_str(&HORIZONTAL_LINE.repeat(total_width));
    } else {
        out.push(UPPER_LEFT_CORNER);
        out.push_str(name);
        out.push_str(&HORIZONTAL_LINE.repeat(total_width - name.chars().count() - dims.len()));
        out.push_str(&dims);
    }
    out.push(UPPER_RIGHT_CORNER);
    out.push('\n');

    for i in 0..rows {
        out.push(BAR);
        for j in 0..cols {
            write_cell(&mut out, at(i, j).to_f64().unwrap_or(f64::NAN), width);
        }
        out.push_str(&" ".repeat(right_padding));
        out.push(BAR);
        out.push('\n');
    }

    out.push(LOWER_LEFT_CORNER);
    out.push_str(&HORIZONTAL_LINE.repeat(total_width));
    out.push(LOWER_RIGHT_CORNER);
    out
}

/// Extension trait that renders a vector as a single row block.
pub trait PrettyPrintVector {
    /// Render the vector, with an optional name in the top border.
    fn pretty(&self, name: Option<&str>) -> String;
}

impl<T: GbpFloat> PrettyPrintVector for Vector<T> {
    fn pretty(&self, name: Option<&str>) -> String {
        render_block(1, self.len(), |_, j| self[j], name)
    }
}

/// Extension trait that renders a matrix as a block.
pub trait PrettyPrintMatrix {
    /// Render the matrix, with an optional name in the top border.
    fn pretty(&self, name: Option<&str>) -> String;
}

impl<T: GbpFloat> PrettyPrintMatrix for Matrix<T> {
    fn pretty(&self, name: Option<&str>) -> String {
        render_block(self.nrows(), self.ncols(), |i, j| self[(i, j)], name)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn matrix_block_has_one_line_per_row_plus_borders() {
        let m: Matrix<f64> = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let rendered = m.pretty(Some("m"));
        assert_eq!(rendered.lines().count(), 3 + 2);
        let top = rendered.lines().next().unwrap_or_default();
        assert!(top.starts_with("╭m"));
        assert!(top.ends_with("3x2╮"));
        assert!(rendered.contains("6.000"));
    }

    #[test]
    fn vector_block_is_a_single_row() {
        let v: Vector<f64> = array![1.5, -2.25];
        let rendered = v.pretty(None);
        assert_eq!(rendered.lines().count(), 3);
        assert!(rendered.contains("1.500"));
        assert!(rendered.contains("-2.250"));
        assert!(rendered.contains("1x2"));
    }

    #[test]
    fn large_values_use_scientific_notation() {
        let v: Vector<f64> = array![1e12];
        assert!(v.pretty(None).contains("1.000e12"));
    }

    #[test]
    fn non_finite_values_are_rendered() {
        let v: Vector<f64> = array![f64::NAN, f64::INFINITY];
        let rendered = v.pretty(None);
        assert!(rendered.contains("NaN"));
        assert!(rendered.contains("inf"));
    }

    #[test]
    fn long_names_go_above_the_block() {
        let v: Vector<f64> = array![1.0];
        let rendered = v.pretty(Some("a rather long name for a tiny vector"));
        assert!(rendered.starts_with("a rather long name for a tiny vector:1x1\n╭"));
    }
}
