pub mod calculations;
pub mod error;
pub mod models;

pub use calculations::{Estimator, compute};
pub use error::EstimateError;
pub use models::*;
