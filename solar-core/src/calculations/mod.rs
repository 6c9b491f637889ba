//! Sizing and costing calculations for PV installations.
//!
//! The work is split the way a quotation is prepared: a sizing worksheet for
//! the shared physical design, a scheme worksheet for the money side of each
//! deployment scheme, and an estimator tying them together.

pub mod common;
pub mod estimator;
pub mod scheme;
pub mod sizing;

pub use estimator::{Estimator, compute};
pub use scheme::SchemeWorksheet;
pub use sizing::{SizingWorksheet, SizingWorksheetResult};
