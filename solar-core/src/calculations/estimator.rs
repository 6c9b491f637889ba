//! The sizing and financial calculator.
//!
//! [`Estimator::compute`] validates the input, sizes the shared PV array and
//! then evaluates every scheme against it. The calculation is pure: it holds
//! no state between calls and identical inputs give identical estimates, so
//! an `Estimator` can be shared freely across threads.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use solar_core::{BreakEven, SizingInput, compute};
//!
//! let estimate = compute(&SizingInput::default()).unwrap();
//!
//! assert_eq!(estimate.array.panel_count, 22);
//! assert_eq!(estimate.stand_alone.battery_count, 10);
//! assert_eq!(estimate.grid_tied.break_even, BreakEven::Years(dec!(23.48)));
//! ```

use tracing::debug;

use crate::calculations::scheme::SchemeWorksheet;
use crate::calculations::sizing::SizingWorksheet;
use crate::error::EstimateError;
use crate::models::{Estimate, Scheme, SchemeConstants, SchemeProfile, SizingInput};

/// Calculator bound to a set of model constants.
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    constants: SchemeConstants,
}

impl Estimator {
    pub fn new(constants: SchemeConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &SchemeConstants {
        &self.constants
    }

    /// Computes the full estimate for one installation profile.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::InvalidParameter`] if the input or the
    /// constants violate a domain precondition,
    /// [`EstimateError::CountOverflow`] if an equipment count is too large,
    /// and [`EstimateError::Overflow`] if an amount cannot be represented.
    /// No computation is attempted on invalid input.
    pub fn compute(
        &self,
        input: &SizingInput,
    ) -> Result<Estimate, EstimateError> {
        self.constants.validate()?;
        input.validate()?;

        let sizing = SizingWorksheet::from_constants(&self.constants).calculate(input)?;
        let worksheet = SchemeWorksheet::new(&self.constants);

        let evaluate = |scheme: Scheme| {
            let profile = SchemeProfile::resolve(scheme, input, &self.constants);
            worksheet.calculate(&profile, &sizing, input)
        };

        let grid_tied = evaluate(Scheme::GridTied)?;
        let stand_alone = evaluate(Scheme::StandAlone)?;
        let hybrid = evaluate(Scheme::Hybrid)?;

        debug!(
            panel_count = sizing.array.panel_count,
            grid_tied_capex = %grid_tied.capex.total,
            stand_alone_capex = %stand_alone.capex.total,
            hybrid_capex = %hybrid.capex.total,
            "estimate computed"
        );

        Ok(Estimate {
            energy: sizing.energy,
            array: sizing.array,
            usable_battery_kwh: sizing.usable_battery_kwh,
            grid_tied,
            stand_alone,
            hybrid,
        })
    }
}

/// Computes an estimate with the default model constants.
///
/// # Errors
///
/// See [`Estimator::compute`].
pub fn compute(input: &SizingInput) -> Result<Estimate, EstimateError> {
    Estimator::default().compute(input)
}
