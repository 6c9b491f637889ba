//! Per-scheme financial calculations.
//!
//! One worksheet serves all three schemes; the differences between them are
//! carried entirely by the [`SchemeProfile`] it is given.
//!
//! # Worksheet Structure
//!
//! | Line | Description |
//! |------|-------------|
//! | 1    | Battery count for the scheme's coverage |
//! | 2    | Base installation = required kWp × price per kWp |
//! | 3    | Battery cost = battery count × unit price |
//! | 4    | Initial spend = Line 2 + surcharge + Line 3 |
//! | 5    | Replacement reserve (grid-tied: 15% of Line 4; battery schemes: Line 3 + 10% of Line 2) |
//! | 6    | Total CAPEX = Line 4 + Line 5 |
//! | 7    | Cost per kWp = Line 6 ÷ installed kWp |
//! | 8    | Gross annual savings = annual bill × savings fraction |
//! | 9    | Net annual savings = Line 8 − maintenance (when deducted) |
//! | 10   | Break-even = Line 6 ÷ Line 9 (not reached when Line 9 ≤ 0) |
//! | 11   | Rental tariff = grid tariff × (1 − discount) |
//! | 12   | Vendor payment = monthly kWh × savings fraction × Line 11 |
//! | 13   | Residual bill = monthly kWh × (1 − savings fraction) × grid tariff |
//! | 14   | Gross profit = Line 6 × margin; tax; net profit; cost ceiling |
//!
//! Lines 5 and 14 only apply when enabled on the input.

use rust_decimal::Decimal;
use tracing::warn;

use crate::calculations::common::{
    checked_add, checked_div, checked_mul, percent_to_fraction, round_half_up,
};
use crate::calculations::sizing::{SizingWorksheet, SizingWorksheetResult};
use crate::error::EstimateError;
use crate::models::{
    BreakEven, CapexBreakdown, ProfitView, RentalView, SchemeConstants, SchemeProfile,
    SchemeResult, SizingInput, TaxBase,
};

/// Calculator for the financial view of a single scheme.
#[derive(Debug, Clone)]
pub struct SchemeWorksheet<'a> {
    constants: &'a SchemeConstants,
}

impl<'a> SchemeWorksheet<'a> {
    pub fn new(constants: &'a SchemeConstants) -> Self {
        Self { constants }
    }

    /// Evaluates the scheme described by `profile` against a shared sizing.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::CountOverflow`] if the battery count does not
    /// fit a `u32`, or [`EstimateError::Overflow`] if a money amount leaves
    /// the representable range.
    pub fn calculate(
        &self,
        profile: &SchemeProfile,
        sizing: &SizingWorksheetResult,
        input: &SizingInput,
    ) -> Result<SchemeResult, EstimateError> {
        let battery_count = SizingWorksheet::from_constants(self.constants).battery_count(
            sizing.energy.daily_kwh,
            profile.battery_coverage,
            sizing.usable_battery_kwh,
        )?;

        let capex = self.capex(
            profile,
            sizing.array.required_kwp,
            battery_count,
            input.battery_unit_price,
            input.include_replacement_reserve,
        )?;
        let cost_per_kwp = self.cost_per_kwp(capex.total, sizing.array.installed_kwp)?;

        let annual_gross_savings = round_half_up(checked_mul(
            "annual_gross_savings",
            sizing.energy.annual_bill,
            profile.savings_fraction,
        )?);
        let annual_maintenance = if input.deduct_maintenance {
            round_half_up(input.annual_maintenance_cost)
        } else {
            Decimal::ZERO
        };
        let annual_net_savings = annual_gross_savings - annual_maintenance;
        let break_even = self.break_even(capex.total, annual_net_savings)?;
        if !break_even.is_reached() {
            warn!(
                scheme = profile.scheme.as_str(),
                %annual_net_savings,
                "net savings not positive, break-even not reached"
            );
        }

        let rental = self.rental(
            sizing.energy.monthly_kwh,
            profile.savings_fraction,
            input.grid_tariff,
            input.rental_discount_percent,
        )?;

        let profit = input.profit_margin_percent.map(|margin| {
            self.profit(capex.total, margin, input.tax_rate_percent, input.tax_base)
        });

        Ok(SchemeResult {
            scheme: profile.scheme,
            savings_fraction: profile.savings_fraction,
            battery_count,
            capex,
            cost_per_kwp,
            annual_gross_savings,
            annual_maintenance,
            annual_net_savings,
            break_even,
            rental,
            profit,
        })
    }

    /// Lines 2-6.
    fn capex(
        &self,
        profile: &SchemeProfile,
        required_kwp: Decimal,
        battery_count: u32,
        battery_unit_price: Decimal,
        include_reserve: bool,
    ) -> Result<CapexBreakdown, EstimateError> {
        let base_installation = round_half_up(checked_mul(
            "base_installation",
            required_kwp,
            profile.price_per_kwp,
        )?);
        let battery_cost = round_half_up(checked_mul(
            "battery_cost",
            Decimal::from(battery_count),
            battery_unit_price,
        )?);
        let initial_spend = checked_add(
            "initial_spend",
            checked_add("initial_spend", base_installation, profile.surcharge)?,
            battery_cost,
        )?;

        let replacement_reserve = if !include_reserve {
            Decimal::ZERO
        } else if profile.scheme.uses_batteries() {
            let inverter = checked_mul(
                "replacement_reserve",
                base_installation,
                self.constants.battery_scheme_inverter_reserve,
            )?;
            checked_add("replacement_reserve", battery_cost, round_half_up(inverter))?
        } else {
            round_half_up(checked_mul(
                "replacement_reserve",
                initial_spend,
                self.constants.grid_tied_inverter_reserve,
            )?)
        };

        Ok(CapexBreakdown {
            base_installation,
            surcharge: profile.surcharge,
            battery_cost,
            initial_spend,
            replacement_reserve,
            total: checked_add("capex_total", initial_spend, replacement_reserve)?,
        })
    }

    /// Line 7. An empty array (no load) has no meaningful unit cost.
    fn cost_per_kwp(
        &self,
        total_capex: Decimal,
        installed_kwp: Decimal,
    ) -> Result<Decimal, EstimateError> {
        if installed_kwp <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        Ok(round_half_up(checked_div("cost_per_kwp", total_capex, installed_kwp)?))
    }

    /// Line 10.
    fn break_even(
        &self,
        total_capex: Decimal,
        annual_net_savings: Decimal,
    ) -> Result<BreakEven, EstimateError> {
        if annual_net_savings <= Decimal::ZERO {
            return Ok(BreakEven::NotReached);
        }
        let years = checked_div("break_even", total_capex, annual_net_savings)?;
        Ok(BreakEven::Years(round_half_up(years)))
    }

    /// Lines 11-13.
    fn rental(
        &self,
        monthly_kwh: Decimal,
        savings_fraction: Decimal,
        grid_tariff: Decimal,
        discount_percent: Decimal,
    ) -> Result<RentalView, EstimateError> {
        let rental_tariff =
            round_half_up(grid_tariff * (Decimal::ONE - percent_to_fraction(discount_percent)));
        let supplied_kwh = monthly_kwh * savings_fraction;
        let residual_kwh = monthly_kwh * (Decimal::ONE - savings_fraction);
        let monthly_vendor_payment = round_half_up(checked_mul(
            "monthly_vendor_payment",
            supplied_kwh,
            rental_tariff,
        )?);
        let monthly_residual_bill = round_half_up(checked_mul(
            "monthly_residual_bill",
            residual_kwh,
            grid_tariff,
        )?);
        let monthly_total =
            checked_add("monthly_total", monthly_vendor_payment, monthly_residual_bill)?;

        Ok(RentalView {
            rental_tariff,
            monthly_vendor_payment,
            monthly_residual_bill,
            monthly_total,
            annual_total: checked_mul(
                "rental_annual_total",
                monthly_total,
                self.constants.months_per_year,
            )?,
        })
    }

    /// Line 14.
    fn profit(
        &self,
        total_capex: Decimal,
        margin_percent: Decimal,
        tax_rate_percent: Decimal,
        tax_base: TaxBase,
    ) -> ProfitView {
        let gross_profit = round_half_up(total_capex * percent_to_fraction(margin_percent));
        let taxable = match tax_base {
            TaxBase::Capex => total_capex,
            TaxBase::GrossProfit => gross_profit,
        };
        let tax = round_half_up(taxable * percent_to_fraction(tax_rate_percent));

        ProfitView {
            gross_profit,
            tax,
            net_profit: gross_profit - tax,
            cost_ceiling: total_capex - gross_profit,
        }
    }
}
