//! Vendor commission rate using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`CommissionRate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CommissionRateError {
    /// The rate is below zero.
    #[error("commission rate cannot be negative (got {0})")]
    Negative(Decimal),
    /// The rate is above one.
    #[error("commission rate must be at most 1 (got {0})")]
    AboveOne(Decimal),
}

/// The share of each sale the platform keeps, as a fraction in `[0, 1]`.
///
/// Serialized as a decimal string (e.g. `"0.15"`) so no precision is lost in
/// JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct CommissionRate(Decimal);

impl CommissionRate {
    /// Create a commission rate from a fraction.
    ///
    /// # Errors
    ///
    /// Returns an error if `rate` is outside `[0, 1]`.
    pub fn new(rate: Decimal) -> Result<Self, CommissionRateError> {
        if rate < Decimal::ZERO {
            return Err(CommissionRateError::Negative(rate));
        }
        if rate > Decimal::ONE {
            return Err(CommissionRateError::AboveOne(rate));
        }
        Ok(Self(rate))
    }

    /// The fraction as a decimal.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for CommissionRate {
    type Error = CommissionRateError;

    fn try_from(rate: Decimal) -> Result<Self, Self::Error> {
        Self::new(rate)
    }
}

impl From<CommissionRate> for Decimal {
    fn from(rate: CommissionRate) -> Self {
        rate.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(CommissionRate::new(Decimal::ZERO).is_ok());
        assert!(CommissionRate::new(Decimal::ONE).is_ok());
        assert!(CommissionRate::new(Decimal::new(15, 2)).is_ok());
        assert!(matches!(
            CommissionRate::new(Decimal::new(-1, 2)),
            Err(CommissionRateError::Negative(_))
        ));
        assert!(matches!(
            CommissionRate::new(Decimal::new(101, 2)),
            Err(CommissionRateError::AboveOne(_))
        ));
    }

    #[test]
    fn test_serializes_as_string() {
        let rate = CommissionRate::new(Decimal::new(1250, 4)).unwrap();
        assert_eq!(serde_json::to_string(&rate).unwrap(), "\"0.1250\"");

        let parsed: CommissionRate = serde_json::from_str("\"0.1250\"").unwrap();
        assert_eq!(parsed, rate);
        assert!(serde_json::from_str::<CommissionRate>("\"1.5\"").is_err());
    }
}
