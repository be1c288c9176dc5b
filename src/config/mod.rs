//! Configuration file support.
//!
//! A run can be configured from a YAML file; command-line flags take
//! precedence over anything set here.
//!
//! ```yaml
//! seed: 42
//! time_zone: Europe/Berlin
//! pretty: true
//! extensions: [person, internet]
//! strict_registration: false
//! timeout: 30s
//! ```

pub mod duration;

use anyhow::Context;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use duration::parse_duration;

/// Settings loaded from a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataGenConfig {
    /// Random seed for reproducible output
    #[serde(default)]
    pub seed: Option<u64>,

    /// IANA time zone used to render dates
    #[serde(default)]
    pub time_zone: Option<String>,

    /// Indent the generated document
    #[serde(default)]
    pub pretty: bool,

    /// Extension packs to register before generating
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Reject duplicate generator names
    #[serde(default)]
    pub strict_registration: bool,

    /// Upper bound on generation time, e.g. "30s"
    #[serde(default)]
    pub timeout: Option<String>,
}

impl DataGenConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse configuration YAML")
    }

    /// Load a configuration file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {path:?}"))?;
        Self::from_yaml(&text).with_context(|| format!("Invalid configuration in {path:?}"))
    }
}

/// Parse an IANA time zone name such as `America/New_York`.
pub fn parse_time_zone(name: &str) -> anyhow::Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| anyhow::anyhow!("Invalid time zone '{name}': {e}"))
}
