//! The two partners of a household

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two partners sharing a household
///
/// Serialized as `"X"` / `"Y"`, the same labels the preference store and
/// CLI filters use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Partner {
    X,
    Y,
}

impl Partner {
    pub const ALL: [Partner; 2] = [Partner::X, Partner::Y];

    /// The other partner
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// Stable single-letter label
    pub fn label(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
        }
    }
}

impl fmt::Display for Partner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Partner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "X" => Ok(Self::X),
            "Y" => Ok(Self::Y),
            other => Err(format!("Unknown partner '{}': expected X or Y", other)),
        }
    }
}

/// Display names of the two partners
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartnerNames {
    #[serde(default = "default_x")]
    pub x: String,
    #[serde(default = "default_y")]
    pub y: String,
}

fn default_x() -> String {
    "Partner X".to_string()
}

fn default_y() -> String {
    "Partner Y".to_string()
}

impl PartnerNames {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    pub fn name(&self, partner: Partner) -> &str {
        match partner {
            Partner::X => &self.x,
            Partner::Y => &self.y,
        }
    }

    /// Name for an optional partner, `-` when absent
    pub fn name_or_dash(&self, partner: Option<Partner>) -> &str {
        partner.map_or("-", |p| self.name(p))
    }
}

impl Default for PartnerNames {
    fn default() -> Self {
        Self {
            x: default_x(),
            y: default_y(),
        }
    }
}
