//! Configuration types for extraction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What the NetBIOS pass does with a row whose output has no computer name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissPolicy {
    /// Keep the row with a tagged `No match found in: ...` value.
    ///
    /// The host counts as resolved, so DNS and SSL will not touch it.
    #[default]
    Placeholder,

    /// Drop the row and leave the host free for DNS and SSL.
    Skip,
}

impl FromStr for MissPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "placeholder" => Ok(Self::Placeholder),
            "skip" => Ok(Self::Skip),
            other => Err(format!(
                "unknown miss policy '{}' (expected 'placeholder' or 'skip')",
                other
            )),
        }
    }
}

impl fmt::Display for MissPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => write!(f, "placeholder"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// Configuration for the extraction pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Handling of NetBIOS rows that don't match any computer-name layout.
    ///
    /// Default: `Placeholder`.
    #[serde(default)]
    pub netbios_misses: MissPolicy,
}

impl ExtractionConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the NetBIOS miss policy.
    pub fn with_netbios_misses(mut self, policy: MissPolicy) -> Self {
        self.netbios_misses = policy;
        self
    }
}
