use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EstimateError, ensure_at_most, ensure_non_negative, ensure_positive};

/// What the tax on installer revenue is levied against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxBase {
    /// Final tax on turnover: the rate applies to the whole project value.
    #[default]
    Capex,
    /// The rate applies to the installer's gross profit only.
    GrossProfit,
}

impl TaxBase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Capex => "capex",
            Self::GrossProfit => "gross_profit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "capex" => Some(Self::Capex),
            "gross_profit" => Some(Self::GrossProfit),
            _ => None,
        }
    }
}

/// The load, location and price profile of one prospective installation.
///
/// Percentages are given on a 0-100 scale, the way a customer quotes them.
/// The record is immutable input to the calculator; nothing is retained
/// between calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizingInput {
    // Load & location
    pub average_load_kw: Decimal,
    pub operating_hours_per_day: Decimal,
    /// Utility price per kWh.
    pub grid_tariff: Decimal,
    pub peak_sun_hours: Decimal,

    // Panel and battery hardware
    pub panel_rated_watts: Decimal,
    pub system_loss_percent: Decimal,
    pub panel_length_m: Decimal,
    pub panel_width_m: Decimal,
    pub battery_voltage: Decimal,
    pub battery_capacity_ah: Decimal,
    pub depth_of_discharge_percent: Decimal,

    // Price assumptions
    /// Installed price per kWp, used for every scheme without its own price.
    pub price_per_kwp: Decimal,
    pub grid_tied_price_per_kwp: Option<Decimal>,
    pub stand_alone_price_per_kwp: Option<Decimal>,
    pub hybrid_price_per_kwp: Option<Decimal>,
    pub battery_unit_price: Decimal,
    /// Discount of the rental tariff relative to the grid tariff.
    pub rental_discount_percent: Decimal,

    // Savings targets
    /// Share of the bill a grid-tied system offsets. Capped by regulation.
    pub grid_tied_savings_percent: Decimal,
    /// Share of the load the hybrid system is sized to cover.
    pub hybrid_savings_percent: Decimal,

    // Lifecycle
    pub annual_maintenance_cost: Decimal,
    /// Subtract `annual_maintenance_cost` from gross savings before break-even.
    pub deduct_maintenance: bool,
    /// Add the inverter/battery replacement reserve to CAPEX.
    pub include_replacement_reserve: bool,

    // Installer profit model, enabled when a margin is set.
    pub profit_margin_percent: Option<Decimal>,
    pub tax_rate_percent: Decimal,
    pub tax_base: TaxBase,
}

impl Default for SizingInput {
    fn default() -> Self {
        Self {
            average_load_kw: Decimal::new(15, 1),
            operating_hours_per_day: Decimal::from(24),
            grid_tariff: Decimal::from(1444),
            peak_sun_hours: Decimal::new(38, 1),
            panel_rated_watts: Decimal::from(550),
            system_loss_percent: Decimal::from(20),
            panel_length_m: Decimal::new(23, 1),
            panel_width_m: Decimal::new(11, 1),
            battery_voltage: Decimal::from(48),
            battery_capacity_ah: Decimal::from(100),
            depth_of_discharge_percent: Decimal::from(80),
            price_per_kwp: Decimal::from(14_000_000),
            grid_tied_price_per_kwp: None,
            stand_alone_price_per_kwp: None,
            hybrid_price_per_kwp: None,
            battery_unit_price: Decimal::from(16_000_000),
            rental_discount_percent: Decimal::from(10),
            grid_tied_savings_percent: Decimal::from(40),
            hybrid_savings_percent: Decimal::from(90),
            annual_maintenance_cost: Decimal::ZERO,
            deduct_maintenance: false,
            include_replacement_reserve: false,
            profit_margin_percent: None,
            tax_rate_percent: Decimal::ZERO,
            tax_base: TaxBase::Capex,
        }
    }
}

impl SizingInput {
    /// Validates every domain precondition.
    ///
    /// Savings percentages above their scheme's range are not rejected here;
    /// they are clamped when the scheme profile is resolved.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::InvalidParameter`] for the first field that:
    /// - is negative
    /// - is a divisor and is zero (sun hours, panel rating, battery
    ///   voltage/capacity, depth of discharge)
    /// - is a loss percentage of 100 or more
    /// - is any other percentage above 100, or operating hours above 24
    pub fn validate(&self) -> Result<(), EstimateError> {
        let hundred = Decimal::ONE_HUNDRED;

        ensure_non_negative("average_load_kw", self.average_load_kw)?;
        ensure_at_most(
            "operating_hours_per_day",
            self.operating_hours_per_day,
            Decimal::from(24),
            "must be at most 24",
        )?;
        ensure_non_negative("grid_tariff", self.grid_tariff)?;
        ensure_positive("peak_sun_hours", self.peak_sun_hours)?;

        ensure_positive("panel_rated_watts", self.panel_rated_watts)?;
        ensure_non_negative("system_loss_percent", self.system_loss_percent)?;
        if self.system_loss_percent >= hundred {
            return Err(EstimateError::invalid(
                "system_loss_percent",
                self.system_loss_percent,
                "must be below 100",
            ));
        }
        ensure_non_negative("panel_length_m", self.panel_length_m)?;
        ensure_non_negative("panel_width_m", self.panel_width_m)?;
        ensure_positive("battery_voltage", self.battery_voltage)?;
        ensure_positive("battery_capacity_ah", self.battery_capacity_ah)?;
        ensure_positive("depth_of_discharge_percent", self.depth_of_discharge_percent)?;
        ensure_at_most(
            "depth_of_discharge_percent",
            self.depth_of_discharge_percent,
            hundred,
            "must be at most 100",
        )?;

        ensure_non_negative("price_per_kwp", self.price_per_kwp)?;
        for (field, price) in [
            ("grid_tied_price_per_kwp", self.grid_tied_price_per_kwp),
            ("stand_alone_price_per_kwp", self.stand_alone_price_per_kwp),
            ("hybrid_price_per_kwp", self.hybrid_price_per_kwp),
        ] {
            if let Some(price) = price {
                ensure_non_negative(field, price)?;
            }
        }
        ensure_non_negative("battery_unit_price", self.battery_unit_price)?;
        ensure_at_most(
            "rental_discount_percent",
            self.rental_discount_percent,
            hundred,
            "must be at most 100",
        )?;

        ensure_non_negative("grid_tied_savings_percent", self.grid_tied_savings_percent)?;
        ensure_non_negative("hybrid_savings_percent", self.hybrid_savings_percent)?;

        ensure_non_negative("annual_maintenance_cost", self.annual_maintenance_cost)?;
        if let Some(margin) = self.profit_margin_percent {
            ensure_at_most(
                "profit_margin_percent",
                margin,
                hundred,
                "must be at most 100",
            )?;
        }
        ensure_at_most(
            "tax_rate_percent",
            self.tax_rate_percent,
            hundred,
            "must be at most 100",
        )?;

        Ok(())
    }
}
