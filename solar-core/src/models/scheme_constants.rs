use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EstimateError, ensure_at_most, ensure_non_negative, ensure_positive};
use crate::models::Scheme;

/// Fixed assumptions of the costing model that are not part of a customer
/// profile: balance-of-system surcharges, calendar conventions, the
/// regulatory savings cap and the replacement reserve rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemeConstants {
    /// Installation and engineering overhead for a grid-tied system.
    pub grid_tied_surcharge: Decimal,
    pub stand_alone_surcharge: Decimal,
    pub hybrid_surcharge: Decimal,

    pub days_per_month: Decimal,
    pub months_per_year: Decimal,

    /// Upper bound on the grid-tied savings fraction (export limitation rule).
    pub grid_tied_savings_cap: Decimal,

    /// Share of the grid-tied initial spend held back for an inverter swap.
    pub grid_tied_inverter_reserve: Decimal,
    /// Share of the base installation cost held back for an inverter swap
    /// on battery schemes. The full battery bank is reserved on top.
    pub battery_scheme_inverter_reserve: Decimal,
}

impl Default for SchemeConstants {
    fn default() -> Self {
        Self {
            grid_tied_surcharge: Decimal::from(10_000_000),
            stand_alone_surcharge: Decimal::from(25_000_000),
            hybrid_surcharge: Decimal::from(30_000_000),
            days_per_month: Decimal::from(30),
            months_per_year: Decimal::from(12),
            grid_tied_savings_cap: Decimal::new(40, 2),
            grid_tied_inverter_reserve: Decimal::new(15, 2),
            battery_scheme_inverter_reserve: Decimal::new(10, 2),
        }
    }
}

impl SchemeConstants {
    pub fn surcharge(
        &self,
        scheme: Scheme,
    ) -> Decimal {
        match scheme {
            Scheme::GridTied => self.grid_tied_surcharge,
            Scheme::StandAlone => self.stand_alone_surcharge,
            Scheme::Hybrid => self.hybrid_surcharge,
        }
    }

    /// Validates the constants.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::InvalidParameter`] if:
    /// - any surcharge is negative
    /// - `days_per_month` or `months_per_year` is not positive
    /// - the savings cap or a reserve rate is outside [0, 1]
    pub fn validate(&self) -> Result<(), EstimateError> {
        ensure_non_negative("grid_tied_surcharge", self.grid_tied_surcharge)?;
        ensure_non_negative("stand_alone_surcharge", self.stand_alone_surcharge)?;
        ensure_non_negative("hybrid_surcharge", self.hybrid_surcharge)?;
        ensure_positive("days_per_month", self.days_per_month)?;
        ensure_positive("months_per_year", self.months_per_year)?;
        ensure_at_most(
            "grid_tied_savings_cap",
            self.grid_tied_savings_cap,
            Decimal::ONE,
            "must be a fraction between 0 and 1",
        )?;
        ensure_at_most(
            "grid_tied_inverter_reserve",
            self.grid_tied_inverter_reserve,
            Decimal::ONE,
            "must be a fraction between 0 and 1",
        )?;
        ensure_at_most(
            "battery_scheme_inverter_reserve",
            self.battery_scheme_inverter_reserve,
            Decimal::ONE,
            "must be a fraction between 0 and 1",
        )?;
        Ok(())
    }
}
