//! Percentage value object (0-100 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A completion ratio between 0 and 100 inclusive.
///
/// Fractional values are kept: one of three sub-actions complete is
/// 33.33..%, not 33%.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(f64);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0.0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100.0);

    /// Creates a new Percentage, clamping to the valid range. NaN becomes zero.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 100.0))
    }

    /// Creates a Percentage, returning error if out of range or NaN.
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if value.is_nan() || !(0.0..=100.0).contains(&value) {
            return Err(ValidationError::out_of_range("percentage", 0.0, 100.0, value));
        }
        Ok(Self(value))
    }

    /// Computes `100 * part / whole`, yielding zero for an empty whole.
    pub fn ratio(part: usize, whole: usize) -> Self {
        if whole == 0 {
            return Self::ZERO;
        }
        Self::clamped(part as f64 * 100.0 / whole as f64)
    }

    /// Arithmetic mean of the given percentages; zero for an empty input.
    pub fn mean<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Percentage>,
    {
        let (sum, count) = values
            .into_iter()
            .fold((0.0, 0usize), |(sum, count), p| (sum + p.0, count + 1));
        if count == 0 {
            return Self::ZERO;
        }
        Self::clamped(sum / count as f64)
    }

    /// Returns the raw value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Returns true at exactly 100%.
    pub fn is_complete(&self) -> bool {
        self.0 >= 100.0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_limits_to_range() {
        assert_eq!(Percentage::clamped(-5.0).value(), 0.0);
        assert_eq!(Percentage::clamped(150.0).value(), 100.0);
        assert_eq!(Percentage::clamped(42.5).value(), 42.5);
        assert_eq!(Percentage::clamped(f64::NAN).value(), 0.0);
    }

    #[test]
    fn try_new_rejects_out_of_range() {
        assert!(Percentage::try_new(0.0).is_ok());
        assert!(Percentage::try_new(100.0).is_ok());
        assert!(Percentage::try_new(100.1).is_err());
        assert!(Percentage::try_new(-0.1).is_err());
        assert!(Percentage::try_new(f64::NAN).is_err());
    }

    #[test]
    fn ratio_of_empty_whole_is_zero() {
        assert_eq!(Percentage::ratio(0, 0), Percentage::ZERO);
        assert_eq!(Percentage::ratio(1, 4).value(), 25.0);
    }

    #[test]
    fn mean_of_nothing_is_zero() {
        assert_eq!(Percentage::mean(Vec::new()), Percentage::ZERO);
        let mean = Percentage::mean(vec![Percentage::HUNDRED, Percentage::ZERO]);
        assert_eq!(mean.value(), 50.0);
    }

    #[test]
    fn displays_with_two_decimals() {
        assert_eq!(Percentage::ratio(1, 3).to_string(), "33.33%");
    }
}
