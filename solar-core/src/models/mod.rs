mod estimate;
mod scheme;
mod scheme_constants;
mod scheme_profile;
mod sizing_input;

pub use estimate::{
    ArraySizing, BreakEven, CapexBreakdown, EnergyDemand, Estimate, ProfitView, RentalView,
    SchemeResult,
};
pub use scheme::Scheme;
pub use scheme_constants::SchemeConstants;
pub use scheme_profile::SchemeProfile;
pub use sizing_input::{SizingInput, TaxBase};
