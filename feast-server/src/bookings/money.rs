//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic is done with `Decimal` internally and converted
//! to `f64` for storage/serialization. Results are rounded to 2 decimal
//! places, half-up.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::utils::AppError;

/// Rounding target for monetary values (2 decimal places)
const DECIMAL_PLACES: u32 = 2;

/// Fixed tax rate applied to receipts (12%)
pub const TAX_RATE: f64 = 0.12;

/// Tax rate as an exact decimal (0.12)
const TAX_RATE_DECIMAL: Decimal = Decimal::from_parts(12, 0, 0, false, 2);

/// Maximum allowed unit price per item (₱1,000,000)
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: i64 = 9999;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

fn to_decimal(value: f64, field_name: &str) -> Result<Decimal, AppError> {
    require_finite(value, field_name)?;
    Decimal::from_f64(value).ok_or_else(|| {
        AppError::validation(format!("{} is not representable: {}", field_name, value))
    })
}

fn to_f64(value: Decimal, field_name: &str) -> Result<f64, AppError> {
    value
        .to_f64()
        .ok_or_else(|| AppError::internal(format!("{} overflowed f64", field_name)))
}

/// Round to 2 decimal places, half-up
fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Validate a unit price taken from the catalog
pub fn validate_unit_price(price: f64) -> Result<(), AppError> {
    require_finite(price, "unit price")?;
    if price < 0.0 {
        return Err(AppError::validation(format!(
            "unit price must be non-negative, got {}",
            price
        )));
    }
    if price > MAX_PRICE {
        return Err(AppError::validation(format!(
            "unit price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, price
        )));
    }
    Ok(())
}

/// Validate a requested line quantity
pub fn validate_quantity(quantity: i64) -> Result<(), AppError> {
    if quantity < 1 {
        return Err(AppError::validation(format!(
            "quantity must be at least 1, got {}",
            quantity
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        )));
    }
    Ok(())
}

/// Line total at the snapshot price: `unit_price × quantity`
pub fn line_total(unit_price: f64, quantity: i64) -> Result<f64, AppError> {
    validate_unit_price(unit_price)?;
    validate_quantity(quantity)?;
    let price = to_decimal(unit_price, "unit price")?;
    let total = round_money(price * Decimal::from(quantity));
    to_f64(total, "line total")
}

/// Booking total: sum of line totals
pub fn booking_total(line_totals: &[f64]) -> Result<f64, AppError> {
    let mut sum = Decimal::ZERO;
    for &line in line_totals {
        sum += to_decimal(line, "line total")?;
    }
    to_f64(round_money(sum), "booking total")
}

/// Tax breakdown for a receipt: `(tax_amount, grand_total)`
///
/// `tax_amount = subtotal × 0.12`, `grand_total = subtotal + tax_amount`.
pub fn tax_breakdown(subtotal: f64) -> Result<(f64, f64), AppError> {
    require_finite(subtotal, "subtotal")?;
    if subtotal < 0.0 {
        return Err(AppError::validation(format!(
            "subtotal must be non-negative, got {}",
            subtotal
        )));
    }
    let subtotal = to_decimal(subtotal, "subtotal")?;
    let tax = round_money(subtotal * TAX_RATE_DECIMAL);
    let grand_total = round_money(subtotal + tax);
    Ok((to_f64(tax, "tax amount")?, to_f64(grand_total, "total")?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_is_price_times_quantity() {
        assert_eq!(line_total(100.0, 3).unwrap(), 300.0);
        assert_eq!(line_total(50.0, 1).unwrap(), 50.0);
        assert_eq!(line_total(19.99, 3).unwrap(), 59.97);
    }

    #[test]
    fn line_total_rejects_bad_input() {
        assert!(line_total(-1.0, 1).is_err());
        assert!(line_total(f64::NAN, 1).is_err());
        assert!(line_total(f64::INFINITY, 2).is_err());
        assert!(line_total(100.0, 0).is_err());
        assert!(line_total(100.0, -3).is_err());
        assert!(line_total(100.0, 10_000).is_err());
        assert!(line_total(2_000_000.0, 1).is_err());
    }

    #[test]
    fn booking_total_sums_lines() {
        let total = booking_total(&[300.0, 50.0]).unwrap();
        assert_eq!(total, 350.0);
    }

    #[test]
    fn tax_is_twelve_percent() {
        let (tax, total) = tax_breakdown(1000.0).unwrap();
        assert_eq!(tax, 120.0);
        assert_eq!(total, 1120.0);

        let (tax, total) = tax_breakdown(350.0).unwrap();
        assert_eq!(tax, 42.0);
        assert_eq!(total, 392.0);
    }

    #[test]
    fn tax_rounds_half_up() {
        // 0.375 tax on 3.125 rounds to 0.38 rather than truncating
        let (tax, total) = tax_breakdown(3.125).unwrap();
        assert_eq!(tax, 0.38);
        assert_eq!(total, 3.51);
    }

    #[test]
    fn tax_rejects_negative_subtotal() {
        assert!(tax_breakdown(-1.0).is_err());
    }
}
