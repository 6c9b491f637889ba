use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Scheme;

/// Energy consumption and the bill it costs without solar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyDemand {
    pub daily_kwh: Decimal,
    pub monthly_kwh: Decimal,
    pub monthly_bill: Decimal,
    pub annual_bill: Decimal,
}

/// Physical size of the PV array, shared by every scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArraySizing {
    /// Daily production needed to deliver the load after system losses.
    pub target_daily_production_kwh: Decimal,
    /// Installed capacity the load strictly requires.
    pub required_kwp: Decimal,
    /// Rated capacity of a single panel in kW.
    pub panel_kw: Decimal,
    pub panel_count: u32,
    /// Capacity actually installed; at least `required_kwp`.
    pub installed_kwp: Decimal,
    pub area_m2: Decimal,
}

/// How a scheme's capital expenditure is made up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapexBreakdown {
    /// Required kWp times the scheme's price per kWp.
    pub base_installation: Decimal,
    pub surcharge: Decimal,
    pub battery_cost: Decimal,
    /// Everything paid on day one.
    pub initial_spend: Decimal,
    /// Held back for inverter and battery replacement; zero unless enabled.
    pub replacement_reserve: Decimal,
    pub total: Decimal,
}

/// Years until cumulative savings repay the investment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "years", rename_all = "snake_case")]
pub enum BreakEven {
    Years(Decimal),
    /// Net annual savings are zero or negative; the system never pays back.
    NotReached,
}

impl BreakEven {
    pub fn is_reached(&self) -> bool {
        matches!(self, Self::Years(_))
    }

    /// The break-even period, with `NotReached` reported as zero.
    ///
    /// Zero here is a sentinel; check [`BreakEven::is_reached`] before
    /// presenting it as a payback period.
    pub fn years_or_zero(&self) -> Decimal {
        match self {
            Self::Years(years) => *years,
            Self::NotReached => Decimal::ZERO,
        }
    }
}

/// Monthly cash flows when the customer rents the system instead of buying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalView {
    pub rental_tariff: Decimal,
    pub monthly_vendor_payment: Decimal,
    pub monthly_residual_bill: Decimal,
    pub monthly_total: Decimal,
    pub annual_total: Decimal,
}

/// The installer's margin on a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitView {
    pub gross_profit: Decimal,
    pub tax: Decimal,
    pub net_profit: Decimal,
    /// Maximum procurement and labour budget that still preserves the margin.
    pub cost_ceiling: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeResult {
    pub scheme: Scheme,
    pub savings_fraction: Decimal,
    pub battery_count: u32,
    pub capex: CapexBreakdown,
    /// Total CAPEX per installed kWp.
    pub cost_per_kwp: Decimal,
    pub annual_gross_savings: Decimal,
    /// Maintenance deducted from savings; zero when not deducted.
    pub annual_maintenance: Decimal,
    pub annual_net_savings: Decimal,
    pub break_even: BreakEven,
    pub rental: RentalView,
    pub profit: Option<ProfitView>,
}

/// Complete result of one sizing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    pub energy: EnergyDemand,
    pub array: ArraySizing,
    /// Usable energy of one battery at the configured depth of discharge.
    pub usable_battery_kwh: Decimal,
    pub grid_tied: SchemeResult,
    pub stand_alone: SchemeResult,
    pub hybrid: SchemeResult,
}

impl Estimate {
    pub fn scheme(
        &self,
        scheme: Scheme,
    ) -> &SchemeResult {
        match scheme {
            Scheme::GridTied => &self.grid_tied,
            Scheme::StandAlone => &self.stand_alone,
            Scheme::Hybrid => &self.hybrid,
        }
    }

    /// Scheme results in display order.
    pub fn schemes(&self) -> impl Iterator<Item = &SchemeResult> {
        Scheme::all().iter().map(|scheme| self.scheme(*scheme))
    }
}
