//! Rendering of estimates for the terminal or for other programs.

use std::fmt::Write;

use clap::ValueEnum;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use solar_core::{BreakEven, Estimate, Scheme, SchemeResult};

use crate::utils::format_amount;

/// Which representation to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// An estimate labelled with the scenario it was computed for.
#[derive(Debug, Clone, Serialize)]
pub struct NamedEstimate {
    pub name: String,
    pub estimate: Estimate,
}

fn scheme_caption(scheme: Scheme) -> &'static str {
    match scheme {
        Scheme::GridTied => "grid connection, no batteries",
        Scheme::StandAlone => "independent of the grid",
        Scheme::Hybrid => "grid backup with battery storage",
    }
}

/// Rounds half-up before display; `{:.N}` on a `Decimal` truncates.
fn rounded(
    value: Decimal,
    dp: u32,
) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn break_even_text(break_even: &BreakEven) -> String {
    match break_even {
        BreakEven::Years(years) => format!("{:.1} years", rounded(*years, 1)),
        BreakEven::NotReached => "not reached".to_string(),
    }
}

fn percent_text(fraction: Decimal) -> String {
    format!("{}%", (fraction * Decimal::ONE_HUNDRED).normalize())
}

fn write_scheme(
    out: &mut String,
    estimate: &Estimate,
    result: &SchemeResult,
) -> std::fmt::Result {
    writeln!(
        out,
        "{} ({})",
        result.scheme.label().to_uppercase(),
        scheme_caption(result.scheme)
    )?;
    write!(
        out,
        "  Physical: {} panels | {:.1} m²",
        estimate.array.panel_count,
        rounded(estimate.array.area_m2, 1)
    )?;
    if result.scheme.uses_batteries() {
        write!(out, " | {} batteries", result.battery_count)?;
    }
    writeln!(out)?;

    writeln!(out, "  Purchase (CAPEX)")?;
    writeln!(out, "    Investment:      {}", format_amount(result.capex.total))?;
    if result.capex.replacement_reserve > Decimal::ZERO {
        writeln!(
            out,
            "      of which reserve: {}",
            format_amount(result.capex.replacement_reserve)
        )?;
    }
    writeln!(out, "    Cost per kWp:    {}", format_amount(result.cost_per_kwp))?;
    writeln!(
        out,
        "    Savings ({}):  {} / year",
        percent_text(result.savings_fraction),
        format_amount(result.annual_net_savings)
    )?;
    writeln!(out, "    Break-even:      {}", break_even_text(&result.break_even))?;

    writeln!(out, "  Rental (OPEX)")?;
    writeln!(
        out,
        "    Vendor payment:  {} / month",
        format_amount(result.rental.monthly_vendor_payment)
    )?;
    writeln!(
        out,
        "    Residual bill:   {} / month",
        format_amount(result.rental.monthly_residual_bill)
    )?;
    writeln!(
        out,
        "    Total:           {} / month",
        format_amount(result.rental.monthly_total)
    )?;

    if let Some(profit) = &result.profit {
        writeln!(out, "  Installer")?;
        writeln!(out, "    Gross profit:    {}", format_amount(profit.gross_profit))?;
        writeln!(out, "    Tax:             {}", format_amount(profit.tax))?;
        writeln!(out, "    Net profit:      {}", format_amount(profit.net_profit))?;
        writeln!(out, "    Cost ceiling:    {}", format_amount(profit.cost_ceiling))?;
    }

    Ok(())
}

fn write_estimate(
    out: &mut String,
    estimate: &Estimate,
) -> std::fmt::Result {
    writeln!(
        out,
        "Baseline bill: {} / month ({} / year)",
        format_amount(estimate.energy.monthly_bill),
        format_amount(estimate.energy.annual_bill)
    )?;
    writeln!(
        out,
        "Load: {:.1} kWh / day | Required: {:.2} kWp | Installed: {:.2} kWp",
        rounded(estimate.energy.daily_kwh, 1),
        rounded(estimate.array.required_kwp, 2),
        rounded(estimate.array.installed_kwp, 2)
    )?;

    for result in estimate.schemes() {
        writeln!(out)?;
        write_scheme(out, estimate, result)?;
    }
    Ok(())
}

/// Renders a single estimate as a plain-text report.
pub fn render_text(estimate: &Estimate) -> String {
    let mut out = String::new();
    write_estimate(&mut out, estimate).expect("writing to a String cannot fail");
    out
}

/// Renders a batch of scenario estimates, one titled section each.
pub fn render_text_batch(estimates: &[NamedEstimate]) -> String {
    let mut out = String::new();
    for (idx, named) in estimates.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&format!("=== {} ===\n", named.name));
        out.push_str(&render_text(&named.estimate));
    }
    out
}

/// Serializes any report value as pretty-printed JSON.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
