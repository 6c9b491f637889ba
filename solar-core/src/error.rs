use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while sizing an installation.
///
/// Every variant is raised before any result is produced; the calculator
/// never returns a partially computed estimate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimateError {
    /// An input violates a domain precondition.
    #[error("invalid parameter `{field}`: {value} ({constraint})")]
    InvalidParameter {
        field: &'static str,
        value: Decimal,
        constraint: &'static str,
    },

    /// A rounded-up equipment count is too large to represent.
    #[error("`{field}` requires {value} units, which exceeds the supported count")]
    CountOverflow { field: &'static str, value: Decimal },

    /// An intermediate quantity left the range a [`Decimal`] can hold, or
    /// shrank to zero where it is used as a divisor.
    #[error("`{field}` is outside the representable range")]
    Overflow { field: &'static str },
}

impl EstimateError {
    pub(crate) fn invalid(
        field: &'static str,
        value: Decimal,
        constraint: &'static str,
    ) -> Self {
        Self::InvalidParameter {
            field,
            value,
            constraint,
        }
    }
}

/// Checks that `value` is zero or greater.
pub(crate) fn ensure_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), EstimateError> {
    if value < Decimal::ZERO {
        return Err(EstimateError::invalid(field, value, "must be non-negative"));
    }
    Ok(())
}

/// Checks that `value` is strictly greater than zero.
pub(crate) fn ensure_positive(
    field: &'static str,
    value: Decimal,
) -> Result<(), EstimateError> {
    if value <= Decimal::ZERO {
        return Err(EstimateError::invalid(field, value, "must be positive"));
    }
    Ok(())
}

/// Checks that `value` lies in `[0, max]`.
pub(crate) fn ensure_at_most(
    field: &'static str,
    value: Decimal,
    max: Decimal,
    constraint: &'static str,
) -> Result<(), EstimateError> {
    ensure_non_negative(field, value)?;
    if value > max {
        return Err(EstimateError::invalid(field, value, constraint));
    }
    Ok(())
}
