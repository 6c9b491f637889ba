use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::{clamp_fraction, percent_to_fraction};
use crate::models::{Scheme, SchemeConstants, SizingInput};

/// Everything that distinguishes one scheme's costing from another.
///
/// All three schemes share the same array sizing; only these parameters
/// differ, so a single worksheet evaluates any of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeProfile {
    pub scheme: Scheme,

    /// Share of the daily load the battery bank must hold (0 for grid-tied).
    pub battery_coverage: Decimal,

    /// Fixed balance-of-system surcharge.
    pub surcharge: Decimal,

    /// Share of the baseline bill the system offsets.
    pub savings_fraction: Decimal,

    pub price_per_kwp: Decimal,
}

impl SchemeProfile {
    /// Builds the profile for `scheme`, clamping the configured savings
    /// fraction into the scheme's valid range.
    ///
    /// - Grid-tied: `0..=grid_tied_savings_cap`, no batteries.
    /// - Stand-alone: always 1, batteries cover the whole load.
    /// - Hybrid: `0..=1`, batteries cover the same share as the savings.
    pub fn resolve(
        scheme: Scheme,
        input: &SizingInput,
        constants: &SchemeConstants,
    ) -> Self {
        let savings_fraction = match scheme {
            Scheme::GridTied => clamped(
                scheme,
                percent_to_fraction(input.grid_tied_savings_percent),
                constants.grid_tied_savings_cap,
            ),
            Scheme::StandAlone => Decimal::ONE,
            Scheme::Hybrid => clamped(
                scheme,
                percent_to_fraction(input.hybrid_savings_percent),
                Decimal::ONE,
            ),
        };

        let battery_coverage = if scheme.uses_batteries() {
            savings_fraction
        } else {
            Decimal::ZERO
        };

        let scheme_price = match scheme {
            Scheme::GridTied => input.grid_tied_price_per_kwp,
            Scheme::StandAlone => input.stand_alone_price_per_kwp,
            Scheme::Hybrid => input.hybrid_price_per_kwp,
        };

        Self {
            scheme,
            battery_coverage,
            surcharge: constants.surcharge(scheme),
            savings_fraction,
            price_per_kwp: scheme_price.unwrap_or(input.price_per_kwp),
        }
    }
}

fn clamped(
    scheme: Scheme,
    fraction: Decimal,
    max: Decimal,
) -> Decimal {
    let value = clamp_fraction(fraction, max);
    if value != fraction {
        warn!(
            scheme = scheme.as_str(),
            requested = %fraction,
            applied = %value,
            "savings fraction outside scheme range, clamped"
        );
    }
    value
}
