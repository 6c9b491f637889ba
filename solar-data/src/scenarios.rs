//! CSV loader for scenario batches.
//!
//! Each row describes one scenario as a set of overrides applied on top of a
//! base [`SizingInput`] (usually the project profile). Column order does
//! **not** matter (headers are matched by name) and every column except
//! `name` may be omitted or left empty to keep the base value.
//!
//! ## CSV Format
//!
//! | Column | Type | Notes |
//! |-----------------------------|---------|----------------------------------|
//! | `name` | string | required, used in reports |
//! | `average_load_kw` | decimal | |
//! | `operating_hours_per_day` | decimal | |
//! | `grid_tariff` | decimal | |
//! | `peak_sun_hours` | decimal | |
//! | `panel_rated_watts` | decimal | |
//! | `system_loss_percent` | decimal | |
//! | `panel_length_m` | decimal | |
//! | `panel_width_m` | decimal | |
//! | `battery_voltage` | decimal | |
//! | `battery_capacity_ah` | decimal | |
//! | `depth_of_discharge_percent`| decimal | |
//! | `price_per_kwp` | decimal | |
//! | `grid_tied_price_per_kwp` | decimal | |
//! | `stand_alone_price_per_kwp` | decimal | |
//! | `hybrid_price_per_kwp` | decimal | |
//! | `battery_unit_price` | decimal | |
//! | `rental_discount_percent` | decimal | |
//! | `grid_tied_savings_percent` | decimal | |
//! | `hybrid_savings_percent` | decimal | |
//! | `annual_maintenance_cost` | decimal | |
//! | `deduct_maintenance` | bool | `true` / `false` |
//! | `include_replacement_reserve`| bool | `true` / `false` |
//! | `profit_margin_percent` | decimal | |
//! | `tax_rate_percent` | decimal | |
//! | `tax_base` | string | `capex` or `gross_profit` |
//!
//! ### Example
//!
//! ```csv
//! name,average_load_kw,operating_hours_per_day,hybrid_savings_percent
//! Clinic,3.2,12,60
//! Warehouse,8.5,10,
//! ```
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use solar_core::{EstimateError, SizingInput, TaxBase};
use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    average_load_kw: Option<Decimal>,
    operating_hours_per_day: Option<Decimal>,
    grid_tariff: Option<Decimal>,
    peak_sun_hours: Option<Decimal>,
    panel_rated_watts: Option<Decimal>,
    system_loss_percent: Option<Decimal>,
    panel_length_m: Option<Decimal>,
    panel_width_m: Option<Decimal>,
    battery_voltage: Option<Decimal>,
    battery_capacity_ah: Option<Decimal>,
    depth_of_discharge_percent: Option<Decimal>,
    price_per_kwp: Option<Decimal>,
    grid_tied_price_per_kwp: Option<Decimal>,
    stand_alone_price_per_kwp: Option<Decimal>,
    hybrid_price_per_kwp: Option<Decimal>,
    battery_unit_price: Option<Decimal>,
    rental_discount_percent: Option<Decimal>,
    grid_tied_savings_percent: Option<Decimal>,
    hybrid_savings_percent: Option<Decimal>,
    annual_maintenance_cost: Option<Decimal>,
    deduct_maintenance: Option<bool>,
    include_replacement_reserve: Option<bool>,
    profit_margin_percent: Option<Decimal>,
    tax_rate_percent: Option<Decimal>,
    tax_base: Option<String>,
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A named set of installation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub input: SizingInput,
}

/// Errors that can occur while loading scenario data.
#[derive(Debug, Error)]
pub enum ScenarioLoadError {
    /// The underlying CSV deserialisation failed (bad structure, missing
    /// `name` column, type mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A `tax_base` cell is not one of the recognised codes.
    #[error("unrecognised tax base '{value}' on row {row}")]
    InvalidTaxBase { value: String, row: usize },

    /// The merged scenario violates a domain precondition.
    #[error("scenario '{name}' on row {row}: {source}")]
    Invalid {
        name: String,
        row: usize,
        #[source]
        source: EstimateError,
    },

    #[error("cannot read scenarios '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

/// Applies a single CSV row on top of `base`.
///
/// `row_number` is 1-based (for error messages).
fn convert_row(
    row: CsvRow,
    base: &SizingInput,
    row_number: usize,
) -> Result<Scenario, ScenarioLoadError> {
    let tax_base = match row.tax_base.as_deref().map(str::trim) {
        None | Some("") => base.tax_base,
        Some(code) => TaxBase::parse(code).ok_or_else(|| ScenarioLoadError::InvalidTaxBase {
            value: code.to_string(),
            row: row_number,
        })?,
    };

    let input = SizingInput {
        average_load_kw: row.average_load_kw.unwrap_or(base.average_load_kw),
        operating_hours_per_day: row
            .operating_hours_per_day
            .unwrap_or(base.operating_hours_per_day),
        grid_tariff: row.grid_tariff.unwrap_or(base.grid_tariff),
        peak_sun_hours: row.peak_sun_hours.unwrap_or(base.peak_sun_hours),
        panel_rated_watts: row.panel_rated_watts.unwrap_or(base.panel_rated_watts),
        system_loss_percent: row.system_loss_percent.unwrap_or(base.system_loss_percent),
        panel_length_m: row.panel_length_m.unwrap_or(base.panel_length_m),
        panel_width_m: row.panel_width_m.unwrap_or(base.panel_width_m),
        battery_voltage: row.battery_voltage.unwrap_or(base.battery_voltage),
        battery_capacity_ah: row.battery_capacity_ah.unwrap_or(base.battery_capacity_ah),
        depth_of_discharge_percent: row
            .depth_of_discharge_percent
            .unwrap_or(base.depth_of_discharge_percent),
        price_per_kwp: row.price_per_kwp.unwrap_or(base.price_per_kwp),
        grid_tied_price_per_kwp: row.grid_tied_price_per_kwp.or(base.grid_tied_price_per_kwp),
        stand_alone_price_per_kwp: row
            .stand_alone_price_per_kwp
            .or(base.stand_alone_price_per_kwp),
        hybrid_price_per_kwp: row.hybrid_price_per_kwp.or(base.hybrid_price_per_kwp),
        battery_unit_price: row.battery_unit_price.unwrap_or(base.battery_unit_price),
        rental_discount_percent: row
            .rental_discount_percent
            .unwrap_or(base.rental_discount_percent),
        grid_tied_savings_percent: row
            .grid_tied_savings_percent
            .unwrap_or(base.grid_tied_savings_percent),
        hybrid_savings_percent: row
            .hybrid_savings_percent
            .unwrap_or(base.hybrid_savings_percent),
        annual_maintenance_cost: row
            .annual_maintenance_cost
            .unwrap_or(base.annual_maintenance_cost),
        deduct_maintenance: row.deduct_maintenance.unwrap_or(base.deduct_maintenance),
        include_replacement_reserve: row
            .include_replacement_reserve
            .unwrap_or(base.include_replacement_reserve),
        profit_margin_percent: row.profit_margin_percent.or(base.profit_margin_percent),
        tax_rate_percent: row.tax_rate_percent.unwrap_or(base.tax_rate_percent),
        tax_base,
    };

    input
        .validate()
        .map_err(|source| ScenarioLoadError::Invalid {
            name: row.name.clone(),
            row: row_number,
            source,
        })?;

    Ok(Scenario {
        name: row.name,
        input,
    })
}

/// Parse scenarios from any reader and return them in file order.
///
/// # Errors
///
/// * [ScenarioLoadError::Parse] – if the CSV is structurally invalid or a
///   cell cannot be deserialised.
/// * [ScenarioLoadError::InvalidTaxBase] – if a row names an unknown tax base.
/// * [ScenarioLoadError::Invalid] – if a merged scenario fails validation.
pub fn load_from_reader<R: Read>(
    reader: R,
    base: &SizingInput,
) -> Result<Vec<Scenario>, ScenarioLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(reader);

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            let row_number = idx + 1; // 1-based for user-facing messages
            convert_row(row, base, row_number)
        })
        .collect()
}

/// Parse CSV text held in memory. See [load_from_reader].
///
/// # Errors
///
/// Same as [load_from_reader].
pub fn load_from_str(
    input: &str,
    base: &SizingInput,
) -> Result<Vec<Scenario>, ScenarioLoadError> {
    load_from_reader(input.as_bytes(), base)
}

/// Convenience wrapper: read a file from disk and delegate to [load_from_reader].
///
/// # Errors
///
/// Returns [ScenarioLoadError::Io] when the file cannot be opened, or any
/// error of [load_from_reader].
pub fn load_from_file(
    path: &Path,
    base: &SizingInput,
) -> Result<Vec<Scenario>, ScenarioLoadError> {
    debug!(path = %path.display(), "loading scenarios");
    let file = std::fs::File::open(path).map_err(|source| ScenarioLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_reader(file, base)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    // -----------------------------------------------------------------------
    // Helper: only the required column
    // -----------------------------------------------------------------------
    const MINIMAL_CSV: &str = "\
name
Reference
";

    // -----------------------------------------------------------------------
    // Helper: overrides with some cells left empty
    // -----------------------------------------------------------------------
    const MULTI_ROW_CSV: &str = "\
name,average_load_kw,operating_hours_per_day,hybrid_savings_percent,tax_base
Clinic,3.2,12,60,
Warehouse,8.5,10,,gross_profit
Kiosk, 0.4 , 8 , 100 , capex
";

    // -----------------------------------------------------------------------
    // 1. Minimal CSV – every value comes from the base
    // -----------------------------------------------------------------------
    #[test]
    fn test_minimal_csv_uses_base_values() {
        let base = SizingInput::default();

        let scenarios = load_from_str(MINIMAL_CSV, &base).expect("should parse minimal CSV");

        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].name, "Reference");
        assert_eq!(scenarios[0].input, base);
    }

    // -----------------------------------------------------------------------
    // 2. Multiple rows – order, overrides and fallbacks
    // -----------------------------------------------------------------------
    #[test]
    fn test_multi_row_order_and_overrides() {
        let base = SizingInput::default();

        let scenarios = load_from_str(MULTI_ROW_CSV, &base).expect("should parse");

        let names: Vec<&str> = scenarios.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Clinic", "Warehouse", "Kiosk"]);

        assert_eq!(scenarios[0].input.average_load_kw, dec!(3.2));
        assert_eq!(scenarios[0].input.operating_hours_per_day, dec!(12));
        assert_eq!(scenarios[0].input.hybrid_savings_percent, dec!(60));
        assert_eq!(scenarios[0].input.tax_base, TaxBase::Capex);
    }

    #[test]
    fn test_empty_cell_keeps_base_value() {
        let base = SizingInput {
            hybrid_savings_percent: dec!(45),
            ..Default::default()
        };

        let scenarios = load_from_str(MULTI_ROW_CSV, &base).expect("should parse");

        assert_eq!(scenarios[1].input.hybrid_savings_percent, dec!(45));
        assert_eq!(scenarios[1].input.tax_base, TaxBase::GrossProfit);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let scenarios =
            load_from_str(MULTI_ROW_CSV, &SizingInput::default()).expect("should parse");

        assert_eq!(scenarios[2].input.average_load_kw, dec!(0.4));
        assert_eq!(scenarios[2].input.operating_hours_per_day, dec!(8));
        assert_eq!(scenarios[2].input.hybrid_savings_percent, dec!(100));
    }

    #[test]
    fn test_optional_price_override() {
        let csv = "\
name,stand_alone_price_per_kwp,profit_margin_percent,include_replacement_reserve
Premium,17500000,22.5,true
";

        let scenarios = load_from_str(csv, &SizingInput::default()).expect("should parse");
        let input = &scenarios[0].input;

        assert_eq!(input.stand_alone_price_per_kwp, Some(dec!(17500000)));
        assert_eq!(input.hybrid_price_per_kwp, None);
        assert_eq!(input.profit_margin_percent, Some(dec!(22.5)));
        assert!(input.include_replacement_reserve);
    }

    // -----------------------------------------------------------------------
    // 3. Errors
    // -----------------------------------------------------------------------
    #[test]
    fn test_invalid_tax_base_reports_row() {
        let csv = "\
name,tax_base
Good,capex
Bad,revenue
";

        let err = load_from_str(csv, &SizingInput::default()).unwrap_err();

        match err {
            ScenarioLoadError::InvalidTaxBase { ref value, row } => {
                assert_eq!(value, "revenue");
                assert_eq!(row, 2);
            }
            other => panic!("expected InvalidTaxBase, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_value_reports_scenario() {
        let csv = "\
name,system_loss_percent
Lossy,100
";

        let err = load_from_str(csv, &SizingInput::default()).unwrap_err();

        let ScenarioLoadError::Invalid { name, row, source } = err else {
            panic!("expected Invalid, got: {err:?}");
        };
        assert_eq!(name, "Lossy");
        assert_eq!(row, 1);
        assert!(matches!(
            source,
            EstimateError::InvalidParameter {
                field: "system_loss_percent",
                ..
            }
        ));
    }

    #[test]
    fn test_bad_decimal_is_parse_error() {
        let csv = "\
name,grid_tariff
Typo,14a4
";

        let err = load_from_str(csv, &SizingInput::default()).unwrap_err();

        assert!(matches!(err, ScenarioLoadError::Parse(_)));
    }

    #[test]
    fn test_missing_name_column_is_parse_error() {
        let csv = "\
average_load_kw
1.5
";

        let err = load_from_str(csv, &SizingInput::default()).unwrap_err();

        let ScenarioLoadError::Parse(inner) = err else {
            panic!("expected Parse, got: {err:?}");
        };
        assert!(inner.to_string().contains("missing field"));
    }

    #[test]
    fn test_header_only_yields_no_scenarios() {
        let scenarios =
            load_from_str("name,average_load_kw\n", &SizingInput::default()).expect("should parse");

        assert!(scenarios.is_empty());
    }
}
