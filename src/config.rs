// In: src/config.rs

//! The single source of truth for marshaling configuration.
//!
//! `MarshalConfig` is created once at the boundary (in code, or from a JSON
//! document the host passes in) and then shared read-only through an
//! `Arc<MarshalConfig>` by the gateway and every session it creates.

use serde::{Deserialize, Serialize};

use crate::error::MarshalError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct MarshalConfig {
    /// If true, `read_string` treats an empty string as an error instead of
    /// returning a null record.
    #[serde(default = "default_true")]
    pub reject_empty_strings: bool,

    /// If true, zero-length entries in an imported string list are reported
    /// through the warning channel.
    #[serde(default = "default_true")]
    pub warn_on_empty_strings: bool,

    /// Largest number of elements a single buffer may allocate. Larger
    /// requests fail with `OutOfMemory`.
    #[serde(default)]
    pub max_elements: Option<usize>,

    /// If true, the gateway installs the `env_logger` backend on first use.
    #[serde(default)]
    pub verbose_logging: bool,

    /// Append log output to this file instead of stderr.
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for MarshalConfig {
    fn default() -> Self {
        Self {
            reject_empty_strings: true,
            warn_on_empty_strings: true,
            max_elements: None,
            verbose_logging: false,
            log_file: None,
        }
    }
}

impl MarshalConfig {
    /// Parses a config from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, MarshalError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}
