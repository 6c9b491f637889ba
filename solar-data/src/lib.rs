//! Loading installation parameters from configuration files.
//!
//! - [`profile`]: a TOML project profile (installation input plus model constants)
//! - [`scenarios`]: a CSV batch of named scenarios layered over a base input

pub mod profile;
pub mod scenarios;

pub use profile::{ProfileError, ProjectProfile};
pub use scenarios::{Scenario, ScenarioLoadError};
