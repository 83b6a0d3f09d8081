//! Subsystem bootstrap
//!
//! Builds the ASR driver registry from the server configuration. Driver
//! kinds map to implementations through a compile-time table; an unknown
//! kind is a configuration error and aborts startup.

use crate::asr::{AsrDriver, AsrDriverRegistry, StubAsrDriver};
use mgms_common::config::{DriverConfig, MediaConfig};
use mgms_common::{Error, Result};
use std::sync::Arc;
use tracing::info;

fn instantiate(driver: &DriverConfig) -> Result<Arc<dyn AsrDriver>> {
    match driver.kind.as_str() {
        "stub" => Ok(Arc::new(StubAsrDriver::new())),
        kind => Err(Error::Config(format!(
            "driver '{}' has unknown kind '{}'",
            driver.name, kind
        ))),
    }
}

/// Build the driver registry declared by the configuration.
pub fn build_asr_registry(config: &MediaConfig) -> Result<AsrDriverRegistry> {
    let mut registry = AsrDriverRegistry::new();
    for declared in &config.asr.drivers {
        let driver = instantiate(declared)?;
        driver.configure(&declared.params);
        info!(name = %declared.name, kind = %declared.kind, "Registered ASR driver");
        registry.register(&declared.name, driver);
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_registry_from_config() {
        let config = MediaConfig::from_toml_str(
            r#"
            [[asr.drivers]]
            name = "primary"
            kind = "stub"
            "#,
        )
        .unwrap();
        let registry = build_asr_registry(&config).unwrap();
        assert!(registry.get("primary").is_ok());
    }

    #[test]
    fn test_empty_config_builds_empty_registry() {
        let registry = build_asr_registry(&MediaConfig::default()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let config = MediaConfig::from_toml_str(
            r#"
            [[asr.drivers]]
            name = "watson"
            kind = "watson"
            "#,
        )
        .unwrap();
        let err = build_asr_registry(&config).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
