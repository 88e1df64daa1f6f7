//! Common types used across the planner

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Round to `dp` decimal places, halves away from zero
pub fn round_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Divide, substituting 1 for a zero divisor. A quotient too large to
/// represent saturates.
pub fn div_or_one(numerator: Decimal, divisor: Decimal) -> Decimal {
    if divisor.is_zero() {
        return numerator;
    }
    numerator.checked_div(divisor).unwrap_or_else(|| {
        if numerator.is_sign_negative() == divisor.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}

/// Reporting period for sales queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SalesPeriod {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_round_dp_half_away_from_zero() {
        assert_eq!(round_dp(Decimal::new(2333, 2), 1), Decimal::new(233, 1));
        assert_eq!(round_dp(Decimal::new(125, 2), 1), Decimal::new(13, 1));
        assert_eq!(round_dp(Decimal::new(-125, 2), 1), Decimal::new(-13, 1));
    }

    #[test]
    fn test_div_or_one() {
        assert_eq!(div_or_one(Decimal::from(10), Decimal::ZERO), Decimal::from(10));
        assert_eq!(div_or_one(Decimal::from(10), Decimal::from(4)), Decimal::new(25, 1));
        // 10 / 1e-28 does not fit
        assert_eq!(div_or_one(Decimal::from(10), Decimal::new(1, 28)), Decimal::MAX);
        assert_eq!(div_or_one(Decimal::from(-10), Decimal::new(1, 28)), Decimal::MIN);
    }

    #[test]
    fn test_period_validity() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();
        assert!(SalesPeriod::new(start, end).is_valid());
        assert!(!SalesPeriod::new(end, start).is_valid());
    }
}
