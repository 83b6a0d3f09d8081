//! Name-keyed driver registry
//!
//! Built once by the server bootstrap and passed by handle into each
//! operation. Lookup of an unregistered name is a fatal configuration error,
//! never recoverable at runtime.

use super::driver::AsrDriver;
use crate::error::SignalError;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of recognition drivers, keyed by configured name.
#[derive(Debug, Default)]
pub struct AsrDriverRegistry {
    drivers: HashMap<String, Arc<dyn AsrDriver>>,
}

impl AsrDriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a driver under `name`, replacing any previous registration.
    pub fn register(&mut self, name: impl Into<String>, driver: Arc<dyn AsrDriver>) {
        self.drivers.insert(name.into(), driver);
    }

    /// Look up a driver by name, failing fast when it was never registered.
    pub fn get(&self, name: &str) -> Result<Arc<dyn AsrDriver>, SignalError> {
        self.drivers
            .get(name)
            .cloned()
            .ok_or_else(|| SignalError::DriverNotRegistered(name.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asr::stub::StubAsrDriver;

    #[test]
    fn test_lookup_registered_driver() {
        let mut registry = AsrDriverRegistry::new();
        registry.register("stub", Arc::new(StubAsrDriver::new()));
        assert!(registry.get("stub").is_ok());
    }

    #[test]
    fn test_unregistered_name_fails_fast() {
        let registry = AsrDriverRegistry::new();
        let err = registry.get("watson").unwrap_err();
        assert!(matches!(err, SignalError::DriverNotRegistered(name) if name == "watson"));
    }
}
