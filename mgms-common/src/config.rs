//! Media-server configuration
//!
//! Models the subsystem/driver tables of the server configuration file.
//! Only the ASR subsystem is consumed by this workspace: it declares the
//! pluggable speech-recognition drivers available to collect signals.
//!
//! ```toml
//! [[asr.drivers]]
//! name = "stub"
//! kind = "stub"
//!
//! [asr.drivers.params]
//! hertz = "8000"
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Top-level media-server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaConfig {
    /// Speech-recognition subsystem
    #[serde(default)]
    pub asr: AsrSubsystemConfig,
}

/// ASR subsystem: the set of declared recognition drivers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AsrSubsystemConfig {
    #[serde(default)]
    pub drivers: Vec<DriverConfig>,
}

/// One pluggable recognition driver declaration.
///
/// `name` is the identifier signals select the driver by; `kind` picks the
/// implementation from the compile-time driver table at bootstrap.
#[derive(Debug, Clone, Deserialize)]
pub struct DriverConfig {
    pub name: String,
    pub kind: String,
    /// Driver-specific key/value parameters
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl MediaConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            drivers = config.asr.drivers.len(),
            "Loaded media configuration"
        );
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: MediaConfig =
            toml::from_str(text).map_err(|e| Error::Config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate driver declarations: non-empty names and kinds, unique
    /// driver names, non-empty parameter keys and values.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for driver in &self.asr.drivers {
            if driver.name.is_empty() {
                return Err(Error::Config("driver name must not be empty".into()));
            }
            if driver.kind.is_empty() {
                return Err(Error::Config(format!(
                    "driver '{}' has an empty kind",
                    driver.name
                )));
            }
            if !seen.insert(driver.name.as_str()) {
                return Err(Error::Config(format!(
                    "driver '{}' is declared more than once",
                    driver.name
                )));
            }
            for (key, value) in &driver.params {
                if key.is_empty() || value.is_empty() {
                    return Err(Error::Config(format!(
                        "driver '{}' has an empty parameter name or value",
                        driver.name
                    )));
                }
            }
        }
        Ok(())
    }
}
