//! Common utility functions for sizing and costing calculations.
//!
//! This module provides shared functionality used across the worksheets,
//! including rounding, percentage handling and equipment counts.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::EstimateError;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use solar_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a percentage on the 0-100 scale to a fraction.
///
/// ```
/// use rust_decimal_macros::dec;
/// use solar_core::calculations::common::percent_to_fraction;
///
/// assert_eq!(percent_to_fraction(dec!(20)), dec!(0.2));
/// ```
pub fn percent_to_fraction(percent: Decimal) -> Decimal {
    percent / Decimal::ONE_HUNDRED
}

/// Multiplies two values, reporting overflow against `field`.
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use solar_core::calculations::common::checked_mul;
///
/// assert_eq!(checked_mul("daily_kwh", dec!(1.5), dec!(24)), Ok(dec!(36)));
/// assert!(checked_mul("monthly_bill", Decimal::MAX, dec!(2)).is_err());
/// ```
pub fn checked_mul(
    field: &'static str,
    lhs: Decimal,
    rhs: Decimal,
) -> Result<Decimal, EstimateError> {
    lhs.checked_mul(rhs).ok_or(EstimateError::Overflow { field })
}

/// Divides two values. A zero divisor is reported the same way as an
/// overflow, since validated inputs only reach zero through underflow.
pub fn checked_div(
    field: &'static str,
    lhs: Decimal,
    rhs: Decimal,
) -> Result<Decimal, EstimateError> {
    lhs.checked_div(rhs).ok_or(EstimateError::Overflow { field })
}

/// Adds two values, reporting overflow against `field`.
pub fn checked_add(
    field: &'static str,
    lhs: Decimal,
    rhs: Decimal,
) -> Result<Decimal, EstimateError> {
    lhs.checked_add(rhs).ok_or(EstimateError::Overflow { field })
}

/// Clamps a fraction into `[0, max]`.
pub fn clamp_fraction(
    fraction: Decimal,
    max: Decimal,
) -> Decimal {
    fraction.max(Decimal::ZERO).min(max)
}

/// Rounds a fractional equipment requirement up to a whole unit count.
///
/// Partial units cannot be purchased, so any remainder adds a unit.
///
/// # Errors
///
/// Returns [`EstimateError::CountOverflow`] if the count does not fit a `u32`.
pub fn ceil_count(
    field: &'static str,
    requirement: Decimal,
) -> Result<u32, EstimateError> {
    let units = requirement.ceil();
    units
        .to_u32()
        .ok_or(EstimateError::CountOverflow { field, value: units })
}
