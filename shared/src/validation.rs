//! Validation utilities for operator input
//!
//! Size conventions are advisory: unconventional bottle or nip sizes are
//! accepted but flagged so the settings screen can highlight them.

use rust_decimal::Decimal;

use crate::types::SalesPeriod;

/// Bottle sizes (mL) the venue stocks
pub const CONVENTIONAL_BOTTLE_ML: [u32; 3] = [700, 750, 1000];

/// Nip sizes (mL) poured at the bar
pub const CONVENTIONAL_NIP_ML: [u32; 2] = [30, 60];

/// Longest trailing sales window the POS is asked for
pub const MAX_DAYS_BACK: u32 = 365;

// ============================================================================
// Reorder Settings
// ============================================================================

/// Validate weeks of cover
pub fn validate_target_weeks(weeks: Decimal) -> Result<(), &'static str> {
    if weeks <= Decimal::ZERO {
        return Err("Target weeks must be positive");
    }
    if weeks > Decimal::from(52) {
        return Err("Target weeks cannot exceed 52");
    }
    Ok(())
}

/// Validate the trailing sales window in days
pub fn validate_days_back(days: u32) -> Result<(), &'static str> {
    if days == 0 || days > MAX_DAYS_BACK {
        return Err("Days back must be between 1 and 365");
    }
    Ok(())
}

pub fn is_conventional_bottle_size(bottle_ml: Decimal) -> bool {
    CONVENTIONAL_BOTTLE_ML
        .iter()
        .any(|size| Decimal::from(*size) == bottle_ml)
}

pub fn is_conventional_nip_size(nip_ml: Decimal) -> bool {
    CONVENTIONAL_NIP_ML
        .iter()
        .any(|size| Decimal::from(*size) == nip_ml)
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate a supplier name for the supplier list
pub fn validate_supplier_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Supplier name cannot be empty");
    }
    if trimmed.chars().count() > 80 {
        return Err("Supplier name must be at most 80 characters");
    }
    Ok(())
}

/// Validate a reporting period
pub fn validate_sales_period(period: &SalesPeriod) -> Result<(), &'static str> {
    if !period.is_valid() {
        return Err("Period start must be before its end");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_validate_target_weeks() {
        assert!(validate_target_weeks(Decimal::from(6)).is_ok());
        assert!(validate_target_weeks(Decimal::new(15, 1)).is_ok());
        assert!(validate_target_weeks(Decimal::from(52)).is_ok());
        assert!(validate_target_weeks(Decimal::ZERO).is_err());
        assert!(validate_target_weeks(Decimal::from(-2)).is_err());
        assert!(validate_target_weeks(Decimal::from(53)).is_err());
    }

    #[test]
    fn test_validate_days_back() {
        assert!(validate_days_back(90).is_ok());
        assert!(validate_days_back(1).is_ok());
        assert!(validate_days_back(0).is_err());
        assert!(validate_days_back(366).is_err());
    }

    #[test]
    fn test_conventional_sizes() {
        assert!(is_conventional_bottle_size(Decimal::from(700)));
        assert!(is_conventional_bottle_size(Decimal::new(10000, 1)));
        assert!(!is_conventional_bottle_size(Decimal::from(500)));
        assert!(is_conventional_nip_size(Decimal::from(30)));
        assert!(is_conventional_nip_size(Decimal::from(60)));
        assert!(!is_conventional_nip_size(Decimal::from(45)));
    }

    #[test]
    fn test_validate_supplier_name() {
        assert!(validate_supplier_name("Dan Murphys").is_ok());
        assert!(validate_supplier_name("   ").is_err());
        assert!(validate_supplier_name(&"x".repeat(81)).is_err());
    }

    #[test]
    fn test_validate_sales_period() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
        assert!(validate_sales_period(&SalesPeriod::new(start, end)).is_ok());
        assert!(validate_sales_period(&SalesPeriod::new(end, start)).is_err());
    }
}
