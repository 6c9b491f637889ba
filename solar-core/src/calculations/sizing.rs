//! Physical sizing of a PV installation.
//!
//! This module turns a load profile into the energy demand, the PV array that
//! serves it and the battery bank required to store a share of it. The
//! results are shared by every scheme; only the battery coverage differs.
//!
//! # Worksheet Structure
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Daily energy = average load × operating hours |
//! | 2    | Monthly energy = daily energy × days per month |
//! | 3    | Monthly bill = monthly energy × grid tariff; annual = monthly × 12 |
//! | 4    | Target production = daily energy ÷ (1 − loss fraction) |
//! | 5    | Required kWp = target production ÷ peak sun hours |
//! | 6    | Panel count = ⌈required kWp ÷ panel kW⌉ |
//! | 7    | Installed kWp = panel count × panel kW; area = count × length × width |
//! | 8    | Usable battery kWh = V × Ah ÷ 1000 × depth of discharge |
//! | 9    | Battery count = ⌈daily energy × coverage ÷ usable kWh⌉ |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use solar_core::SizingInput;
//! use solar_core::calculations::SizingWorksheet;
//!
//! let worksheet = SizingWorksheet::new(dec!(30), dec!(12));
//! let result = worksheet.calculate(&SizingInput::default()).unwrap();
//!
//! assert_eq!(result.energy.daily_kwh, dec!(36));
//! assert_eq!(result.array.panel_count, 22);
//! assert_eq!(result.usable_battery_kwh, dec!(3.84));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{
    ceil_count, checked_div, checked_mul, percent_to_fraction, round_half_up,
};
use crate::error::{EstimateError, ensure_positive};
use crate::models::{ArraySizing, EnergyDemand, SchemeConstants, SizingInput};

const WATTS_PER_KW: Decimal = Decimal::ONE_THOUSAND;

/// Result of the sizing worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingWorksheetResult {
    pub energy: EnergyDemand,
    pub array: ArraySizing,
    pub usable_battery_kwh: Decimal,
}

/// Calculator for demand, array and battery sizing.
#[derive(Debug, Clone)]
pub struct SizingWorksheet {
    days_per_month: Decimal,
    months_per_year: Decimal,
}

impl SizingWorksheet {
    pub fn new(
        days_per_month: Decimal,
        months_per_year: Decimal,
    ) -> Self {
        Self {
            days_per_month,
            months_per_year,
        }
    }

    pub fn from_constants(constants: &SchemeConstants) -> Self {
        Self::new(constants.days_per_month, constants.months_per_year)
    }

    /// Runs every sizing step.
    ///
    /// The input is expected to have passed [`SizingInput::validate`]; the
    /// divisors (sun hours, panel rating, battery capacity) are assumed
    /// positive and the loss below 100%.
    ///
    /// # Errors
    ///
    /// * [`EstimateError::CountOverflow`] if the panel count does not fit a `u32`.
    /// * [`EstimateError::Overflow`] if an intermediate quantity leaves the
    ///   representable range.
    /// * [`EstimateError::InvalidParameter`] if the battery ratings are so
    ///   small that the usable energy per battery is zero.
    pub fn calculate(
        &self,
        input: &SizingInput,
    ) -> Result<SizingWorksheetResult, EstimateError> {
        let energy = self.energy_demand(
            input.average_load_kw,
            input.operating_hours_per_day,
            input.grid_tariff,
        )?;

        let target_daily_production_kwh =
            self.target_daily_production(energy.daily_kwh, input.system_loss_percent)?;
        let required_kwp = self.required_kwp(target_daily_production_kwh, input.peak_sun_hours)?;
        let panel_kw = self.panel_kw(input.panel_rated_watts)?;
        let panel_count = self.panel_count(required_kwp, panel_kw)?;
        let installed_kwp = checked_mul("installed_kwp", Decimal::from(panel_count), panel_kw)?;
        let area_m2 = self.array_area(panel_count, input.panel_length_m, input.panel_width_m)?;

        debug!(
            daily_kwh = %energy.daily_kwh,
            %required_kwp,
            panel_count,
            %installed_kwp,
            "array sized"
        );

        let usable_battery_kwh = self.usable_battery_kwh(
            input.battery_voltage,
            input.battery_capacity_ah,
            input.depth_of_discharge_percent,
        )?;

        Ok(SizingWorksheetResult {
            energy,
            array: ArraySizing {
                target_daily_production_kwh,
                required_kwp,
                panel_kw,
                panel_count,
                installed_kwp,
                area_m2,
            },
            usable_battery_kwh,
        })
    }

    /// Steps 1-3: energy use and the baseline utility bill.
    fn energy_demand(
        &self,
        load_kw: Decimal,
        hours_per_day: Decimal,
        tariff: Decimal,
    ) -> Result<EnergyDemand, EstimateError> {
        let daily_kwh = checked_mul("daily_kwh", load_kw, hours_per_day)?;
        let monthly_kwh = checked_mul("monthly_kwh", daily_kwh, self.days_per_month)?;
        let monthly_bill = round_half_up(checked_mul("monthly_bill", monthly_kwh, tariff)?);
        let annual_bill =
            round_half_up(checked_mul("annual_bill", monthly_bill, self.months_per_year)?);

        Ok(EnergyDemand {
            daily_kwh,
            monthly_kwh,
            monthly_bill,
            annual_bill,
        })
    }

    /// Step 4: production needed so that delivered energy covers the load.
    fn target_daily_production(
        &self,
        daily_kwh: Decimal,
        loss_percent: Decimal,
    ) -> Result<Decimal, EstimateError> {
        checked_div(
            "target_daily_production_kwh",
            daily_kwh,
            Decimal::ONE - percent_to_fraction(loss_percent),
        )
    }

    /// Step 5.
    fn required_kwp(
        &self,
        target_daily_production_kwh: Decimal,
        peak_sun_hours: Decimal,
    ) -> Result<Decimal, EstimateError> {
        checked_div("required_kwp", target_daily_production_kwh, peak_sun_hours)
    }

    fn panel_kw(
        &self,
        rated_watts: Decimal,
    ) -> Result<Decimal, EstimateError> {
        let panel_kw = rated_watts / WATTS_PER_KW;
        ensure_positive("panel_kw", panel_kw)?;
        Ok(panel_kw)
    }

    /// Step 6: never rounds down, so the array always meets the requirement.
    fn panel_count(
        &self,
        required_kwp: Decimal,
        panel_kw: Decimal,
    ) -> Result<u32, EstimateError> {
        ceil_count("panel_count", checked_div("panel_count", required_kwp, panel_kw)?)
    }

    fn array_area(
        &self,
        panel_count: u32,
        length_m: Decimal,
        width_m: Decimal,
    ) -> Result<Decimal, EstimateError> {
        let footprint = checked_mul("area_m2", length_m, width_m)?;
        checked_mul("area_m2", Decimal::from(panel_count), footprint)
    }

    /// Step 8. Ratings small enough to round the product to zero are
    /// rejected here, before any battery count divides by it.
    fn usable_battery_kwh(
        &self,
        voltage: Decimal,
        capacity_ah: Decimal,
        dod_percent: Decimal,
    ) -> Result<Decimal, EstimateError> {
        let rated_kwh = checked_mul("usable_battery_kwh", voltage, capacity_ah)? / WATTS_PER_KW;
        let usable = rated_kwh * percent_to_fraction(dod_percent);
        ensure_positive("usable_battery_kwh", usable)?;
        Ok(usable)
    }

    /// Step 9: batteries needed to store `coverage` of the daily load.
    ///
    /// Zero coverage (grid-tied, or a hybrid targeting no savings) needs no
    /// batteries at all.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::CountOverflow`] if the count does not fit a
    /// `u32`, or [`EstimateError::Overflow`] if the requirement cannot be
    /// computed for `usable_battery_kwh`.
    pub fn battery_count(
        &self,
        daily_kwh: Decimal,
        coverage: Decimal,
        usable_battery_kwh: Decimal,
    ) -> Result<u32, EstimateError> {
        if coverage <= Decimal::ZERO || daily_kwh <= Decimal::ZERO {
            return Ok(0);
        }
        let stored_kwh = checked_mul("battery_count", daily_kwh, coverage)?;
        ceil_count(
            "battery_count",
            checked_div("battery_count", stored_kwh, usable_battery_kwh)?,
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn worksheet() -> SizingWorksheet {
        SizingWorksheet::from_constants(&SchemeConstants::default())
    }

    // =========================================================================
    // energy_demand tests
    // =========================================================================

    #[test]
    fn energy_demand_reference_load() {
        let result = worksheet().energy_demand(dec!(1.5), dec!(24), dec!(1444)).unwrap();

        assert_eq!(result.daily_kwh, dec!(36));
        assert_eq!(result.monthly_kwh, dec!(1080));
        assert_eq!(result.monthly_bill, dec!(1559520));
        assert_eq!(result.annual_bill, dec!(18714240));
    }

    #[test]
    fn energy_demand_zero_load() {
        let result = worksheet().energy_demand(dec!(0), dec!(24), dec!(1444)).unwrap();

        assert_eq!(result.daily_kwh, dec!(0));
        assert_eq!(result.monthly_bill, dec!(0));
    }

    #[test]
    fn energy_demand_rounds_bill_to_cents() {
        let result = worksheet().energy_demand(dec!(1), dec!(1), dec!(0.12345)).unwrap();

        // 30 kWh × 0.12345 = 3.7035
        assert_eq!(result.monthly_bill, dec!(3.70));
        assert_eq!(result.annual_bill, dec!(44.40));
    }

    // =========================================================================
    // array sizing tests
    // =========================================================================

    #[test]
    fn target_daily_production_compensates_loss() {
        let result = worksheet().target_daily_production(dec!(36), dec!(20)).unwrap();

        assert_eq!(result, dec!(45));
    }

    #[test]
    fn target_daily_production_without_loss() {
        let result = worksheet().target_daily_production(dec!(36), dec!(0)).unwrap();

        assert_eq!(result, dec!(36));
    }

    #[test]
    fn required_kwp_divides_by_sun_hours() {
        let result = worksheet().required_kwp(dec!(45), dec!(3.8)).unwrap();

        assert_eq!(round_half_up(result), dec!(11.84));
    }

    #[test]
    fn panel_kw_converts_watts() {
        assert_eq!(worksheet().panel_kw(dec!(550)), Ok(dec!(0.55)));
    }

    #[test]
    fn panel_count_rounds_up() {
        let ws = worksheet();
        let required = ws.required_kwp(dec!(45), dec!(3.8)).unwrap();

        assert_eq!(ws.panel_count(required, dec!(0.55)), Ok(22));
    }

    #[test]
    fn panel_count_exact_fit_not_padded() {
        assert_eq!(worksheet().panel_count(dec!(5.5), dec!(0.55)), Ok(10));
    }

    #[test]
    fn array_area_multiplies_footprint() {
        let result = worksheet().array_area(22, dec!(2.3), dec!(1.1)).unwrap();

        assert_eq!(result, dec!(55.66));
    }

    // =========================================================================
    // battery tests
    // =========================================================================

    #[test]
    fn usable_battery_kwh_applies_depth_of_discharge() {
        let result = worksheet().usable_battery_kwh(dec!(48), dec!(100), dec!(80)).unwrap();

        assert_eq!(result, dec!(3.84));
    }

    #[test]
    fn battery_count_full_coverage() {
        let result = worksheet().battery_count(dec!(36), dec!(1), dec!(3.84));

        // 36 / 3.84 = 9.375
        assert_eq!(result, Ok(10));
    }

    #[test]
    fn battery_count_partial_coverage() {
        let result = worksheet().battery_count(dec!(36), dec!(0.5), dec!(3.84));

        // 18 / 3.84 = 4.6875
        assert_eq!(result, Ok(5));
    }

    #[test]
    fn usable_battery_kwh_rejects_ratings_that_round_to_zero() {
        let result = worksheet().usable_battery_kwh(
            dec!(0.0000000000000000000000001),
            dec!(0.0000000000000000000000001),
            dec!(80),
        );

        assert!(matches!(
            result,
            Err(EstimateError::InvalidParameter {
                field: "usable_battery_kwh",
                ..
            })
        ));
    }

    #[test]
    fn battery_count_tiny_battery_overflows() {
        let result =
            worksheet().battery_count(dec!(36), dec!(1), dec!(0.0000000000000000000000000001));

        assert_eq!(
            result,
            Err(EstimateError::Overflow {
                field: "battery_count"
            })
        );
    }

    #[test]
    fn battery_count_zero_coverage() {
        let result = worksheet().battery_count(dec!(36), dec!(0), dec!(3.84));

        assert_eq!(result, Ok(0));
    }

    // =========================================================================
    // calculate (integration) tests
    // =========================================================================

    #[test]
    fn calculate_reference_profile() {
        let result = worksheet().calculate(&SizingInput::default()).unwrap();

        assert_eq!(result.energy.daily_kwh, dec!(36));
        assert_eq!(result.array.target_daily_production_kwh, dec!(45));
        assert_eq!(round_half_up(result.array.required_kwp), dec!(11.84));
        assert_eq!(result.array.panel_count, 22);
        assert_eq!(result.array.installed_kwp, dec!(12.10));
        assert_eq!(result.array.area_m2, dec!(55.66));
        assert_eq!(result.usable_battery_kwh, dec!(3.84));
    }

    #[test]
    fn energy_demand_reports_bill_overflow() {
        let result = worksheet().energy_demand(
            dec!(1000000000000000),
            dec!(24),
            dec!(1000000000000000),
        );

        assert_eq!(
            result,
            Err(EstimateError::Overflow {
                field: "monthly_bill"
            })
        );
    }

    #[test]
    fn calculate_rejects_vanishing_battery_ratings() {
        let input = SizingInput {
            battery_voltage: dec!(0.0000000000000000000000001),
            battery_capacity_ah: dec!(0.0000000000000000000000001),
            ..Default::default()
        };

        assert!(worksheet().calculate(&input).is_err());
    }

    #[test]
    fn calculate_zero_load_needs_no_panels() {
        let input = SizingInput {
            average_load_kw: dec!(0),
            ..Default::default()
        };

        let result = worksheet().calculate(&input).unwrap();

        assert_eq!(result.array.panel_count, 0);
        assert_eq!(result.array.installed_kwp, dec!(0));
        assert_eq!(result.array.area_m2, dec!(0));
    }
}
