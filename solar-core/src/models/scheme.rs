use serde::{Deserialize, Serialize};

/// The three mutually exclusive deployment designs an installation can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scheme {
    /// Connected to the utility grid, no batteries.
    GridTied,
    /// Fully independent of the grid, batteries cover the whole daily load.
    StandAlone,
    /// Grid connection plus batteries sized to a share of the daily load.
    Hybrid,
}

impl Scheme {
    pub fn all() -> &'static [Scheme] {
        &[Scheme::GridTied, Scheme::StandAlone, Scheme::Hybrid]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GridTied => "ON",
            Self::StandAlone => "OFF",
            Self::Hybrid => "HYB",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ON" => Some(Self::GridTied),
            "OFF" => Some(Self::StandAlone),
            "HYB" => Some(Self::Hybrid),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::GridTied => "Grid-tied",
            Self::StandAlone => "Stand-alone",
            Self::Hybrid => "Hybrid",
        }
    }

    /// Grid-tied systems never carry a battery bank.
    pub fn uses_batteries(&self) -> bool {
        !matches!(self, Self::GridTied)
    }
}
