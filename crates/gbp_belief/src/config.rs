//! Numeric constants of Gaussian beliefs, loadable from a TOML file.
//!
//! ```toml
//! huge = 1e12
//! tiny = 1e-12
//!
//! [tolerance]
//! relative = 1e-8
//! absolute = 1e-12
//! ```

use gbp_linalg::{approx_eq::Tolerance, Float};
use serde::{Deserialize, Serialize};
use typed_floats::{PositiveFinite, StrictlyPositiveFinite};

/// Variance used for vague (near uninformative) beliefs.
pub const HUGE: Float = 1e12;
/// Variance used when a point mass is approximated by a Gaussian.
pub const TINY: Float = 1e-12;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ToleranceSection {
    /// Largest accepted difference relative to the larger magnitude of the
    /// two compared entries
    pub relative: PositiveFinite<Float>,
    /// Largest accepted absolute difference, used for entries close to zero
    pub absolute: PositiveFinite<Float>,
}

impl Default for ToleranceSection {
    fn default() -> Self {
        Self {
            relative: Tolerance::DEFAULT_RELATIVE
                .try_into()
                .expect("1e-8 >= 0.0"),
            absolute: Tolerance::DEFAULT_ABSOLUTE
                .try_into()
                .expect("1e-12 >= 0.0"),
        }
    }
}

impl From<ToleranceSection> for Tolerance {
    fn from(value: ToleranceSection) -> Self {
        Self::new(value.relative.get(), value.absolute.get())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BeliefConfig {
    /// Scale of the identity covariance of a vague belief
    #[serde(default = "BeliefConfig::default_huge")]
    pub huge:      StrictlyPositiveFinite<Float>,
    /// Scale of the identity covariance substituted for a point mass
    #[serde(default = "BeliefConfig::default_tiny")]
    pub tiny:      StrictlyPositiveFinite<Float>,
    /// Tolerance of consistency checks, equality and the symmetry test of
    /// positive-definiteness
    #[serde(default)]
    pub tolerance: ToleranceSection,
}

impl BeliefConfig {
    fn default_huge() -> StrictlyPositiveFinite<Float> {
        HUGE.try_into().expect("1e12 > 0.0")
    }

    fn default_tiny() -> StrictlyPositiveFinite<Float> {
        TINY.try_into().expect("1e-12 > 0.0")
    }

    /// Parse a config file from a given path
    pub fn from_file<P>(path: P) -> Result<Self, ParseError>
    where
        P: AsRef<std::path::Path>,
    {
        std::fs::read_to_string(path)
            .map_err(Into::into)
            .and_then(|contents| Self::parse(contents.as_str()))
    }

    /// Parse a config file
    /// Returns a `ParseError` if the file cannot be parsed
    pub fn parse(contents: &str) -> Result<Self, ParseError> {
        toml::from_str(contents).map_err(Into::into)
    }

    #[inline]
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance.into()
    }
}

impl Default for BeliefConfig {
    fn default() -> Self {
        Self {
            huge:      Self::default_huge(),
            tiny:      Self::default_tiny(),
            tolerance: ToleranceSection::default(),
        }
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_config_uses_named_constants() {
        let config = BeliefConfig::default();
        assert_eq!(config.huge.get(), HUGE);
        assert_eq!(config.tiny.get(), TINY);
        assert_eq!(config.tolerance(), Tolerance::default());
    }

    #[test]
    fn parse_full_config() {
        let config = BeliefConfig::parse(
            r"
            huge = 1e6
            tiny = 1e-6

            [tolerance]
            relative = 1e-4
            absolute = 0.0
            ",
        )
        .unwrap();
        assert_eq!(config.huge.get(), 1e6);
        assert_eq!(config.tiny.get(), 1e-6);
        assert_eq!(config.tolerance(), Tolerance::new(1e-4, 0.0));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = BeliefConfig::parse("huge = 1e9").unwrap();
        assert_eq!(config.huge.get(), 1e9);
        assert_eq!(config.tiny.get(), TINY);
        assert_eq!(config.tolerance(), Tolerance::default());
    }

    #[test]
    fn non_positive_constants_are_rejected() {
        assert!(matches!(
            BeliefConfig::parse("tiny = 0.0"),
            Err(ParseError::Toml(_))
        ));
        assert!(matches!(
            BeliefConfig::parse("huge = -1.0"),
            Err(ParseError::Toml(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            BeliefConfig::from_file("/this/path/does/not/exist.toml"),
            Err(ParseError::Io(_))
        ));
    }
}
