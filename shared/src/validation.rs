//! Input validation functions
//!
//! This module provides validation utilities for user input.
//! Request DTOs in [`crate::types`] use the `validator` derive for
//! field-level rules; the checks here cover rules that span values.

use rust_decimal::Decimal;
use std::sync::OnceLock;

/// Highest rating a review may carry
pub const MAX_RATING: f64 = 5.0;

/// Decimal places kept for monetary amounts (minor currency units)
pub const MONEY_SCALE: u32 = 2;

/// Largest amount a `NUMERIC(12,2)` column holds
const MAX_MONEY_UNITS: i64 = 9_999_999_999_99;

fn email_regex() -> &'static regex_lite::Regex {
    static RE: OnceLock<regex_lite::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

fn phone_regex() -> &'static regex_lite::Regex {
    static RE: OnceLock<regex_lite::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex_lite::Regex::new(r"^\+?[0-9][0-9 ()\-]{5,19}$").expect("phone pattern is valid")
    })
}

/// Normalize an email for lookup and storage
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    if !email_regex().is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate a phone number (digits, spaces, dashes, parentheses, optional +)
pub fn validate_phone(phone: &str) -> Result<(), String> {
    if !phone_regex().is_match(phone.trim()) {
        return Err("Invalid phone number".to_string());
    }
    Ok(())
}

/// Validate a monetary amount: non-negative, at most two decimal places
pub fn validate_price(price: Decimal) -> Result<(), String> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err("Price cannot be negative".to_string());
    }
    if price.normalize().scale() > MONEY_SCALE {
        return Err(format!(
            "Price cannot have more than {} decimal places",
            MONEY_SCALE
        ));
    }
    if price > Decimal::new(MAX_MONEY_UNITS, MONEY_SCALE) {
        return Err("Price is too large".to_string());
    }
    Ok(())
}

/// A validated amount at the stored scale, so `400` reads back as `400.00`
pub fn money(amount: Decimal) -> Decimal {
    let mut amount = amount;
    amount.rescale(MONEY_SCALE);
    amount
}

/// Validate a review rating (0 to 5 inclusive)
pub fn validate_rating(rating: f64) -> Result<(), String> {
    if rating.is_nan() || rating.is_infinite() {
        return Err("Rating must be a valid number".to_string());
    }
    if !(0.0..=MAX_RATING).contains(&rating) {
        return Err(format!("Rating must be between 0 and {}", MAX_RATING));
    }
    Ok(())
}

/// Validate latitude/longitude
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), String> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err("Latitude must be between -90 and 90".to_string());
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err("Longitude must be between -180 and 180".to_string());
    }
    Ok(())
}

/// Check that a supplied order total equals items + tax + shipping exactly
pub fn validate_order_total(expected: Decimal, supplied: Decimal) -> Result<(), String> {
    validate_price(supplied)?;
    if expected != supplied {
        return Err(format!(
            "total_price {} does not match items + tax + shipping ({})",
            supplied,
            money(expected)
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@domain.co.uk").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@dot").is_err());
        assert!(validate_email("spaces in@email.com").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane@Example.COM "), "jane@example.com");
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+234 000 000 000").is_ok());
        assert!(validate_phone("08012345678").is_ok());
        assert!(validate_phone("0801-234-5678").is_ok());
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone("12").is_err());
    }

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(dec("450.99")).is_ok());
        assert!(validate_price(dec("450.100")).is_ok());
        assert!(validate_price(dec("-0.5")).is_err());
        assert!(validate_price(dec("0.509")).is_err());
        assert!(validate_price(dec("10000000000")).is_err());
    }

    #[test]
    fn test_money_uses_stored_scale() {
        assert_eq!(money(dec("400")).to_string(), "400.00");
        assert_eq!(money(dec("0.5")).to_string(), "0.50");
    }

    #[test]
    fn test_validate_rating() {
        assert!(validate_rating(0.5).is_ok());
        assert!(validate_rating(5.0).is_ok());
        assert!(validate_rating(5.5).is_err());
        assert!(validate_rating(-1.0).is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(10.4535, 7.4646).is_ok());
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, -181.0).is_err());
    }

    #[test]
    fn test_validate_order_total() {
        assert!(validate_order_total(dec("1803.96"), dec("1803.96")).is_ok());
        assert!(validate_order_total(dec("860"), dec("860.00")).is_ok());
        assert!(validate_order_total(dec("1803.96"), dec("1803.97")).is_err());
        assert!(validate_order_total(dec("1803.96"), dec("18203.96")).is_err());
    }

    #[test]
    fn test_total_off_by_less_than_a_cent_rejected() {
        // 3 x 0.10 + 0.20 is exactly 0.50
        let expected = Decimal::from(3) * dec("0.1") + dec("0.2");
        assert_eq!(expected, dec("0.5"));
        assert!(validate_order_total(expected, dec("0.509")).is_err());
        assert!(validate_order_total(expected, dec("0.50")).is_ok());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_non_negative_prices_accepted(cents in 0i64..100_000_000) {
            prop_assert!(validate_price(Decimal::new(cents, 2)).is_ok());
        }

        #[test]
        fn prop_negative_prices_rejected(cents in -100_000_000i64..-1) {
            prop_assert!(validate_price(Decimal::new(cents, 2)).is_err());
        }

        #[test]
        fn prop_line_sums_are_exact(cents in 0i64..1_000_000, quantity in 1i32..100) {
            let price = Decimal::new(cents, 2);
            let total = Decimal::from(quantity) * price;
            prop_assert!(validate_order_total(total, total).is_ok());
            prop_assert!(validate_order_total(total, total + Decimal::new(1, 3)).is_err());
        }

        #[test]
        fn prop_ratings_in_range_accepted(rating in 0.0f64..=5.0) {
            prop_assert!(validate_rating(rating).is_ok());
        }
    }
}
