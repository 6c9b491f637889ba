//! TOML project profiles.
//!
//! A profile holds the installation parameters and, optionally, overrides of
//! the model constants. Every key may be omitted; missing keys take the
//! reference defaults.
//!
//! ```toml
//! [input]
//! average_load_kw = 2.5
//! operating_hours_per_day = 12
//! grid_tariff = 1699.53
//! hybrid_savings_percent = 60
//! profit_margin_percent = 20
//! tax_rate_percent = 0.5
//!
//! [constants]
//! hybrid_surcharge = 28000000
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use solar_core::{EstimateError, SchemeConstants, SizingInput};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading a project profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("cannot read profile '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid profile: {0}")]
    Invalid(#[from] EstimateError),
}

/// Installation parameters plus the model constants to evaluate them with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectProfile {
    pub input: SizingInput,
    pub constants: SchemeConstants,
}

impl ProjectProfile {
    /// Parses and validates a profile from TOML text.
    ///
    /// # Errors
    ///
    /// * [`ProfileError::Parse`] if the text is not valid TOML, has unknown
    ///   keys, or holds values of the wrong type.
    /// * [`ProfileError::Invalid`] if a value violates a domain precondition.
    pub fn from_toml_str(text: &str) -> Result<Self, ProfileError> {
        let profile: ProjectProfile = toml::from_str(text)?;
        profile.constants.validate()?;
        profile.input.validate()?;
        Ok(profile)
    }

    /// Reads a profile from disk and delegates to [`ProjectProfile::from_toml_str`].
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Io`] when the file cannot be read, or any
    /// error of [`ProjectProfile::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        debug!(path = %path.display(), "loading project profile");
        let text = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
