//! Driver registry for board drivers.
//!
//! Provides a `DriverRegistry` struct for registering and retrieving board
//! driver factories. This uses constructor-injection rather than global
//! state.

use std::collections::HashMap;

use steri_common::hal::driver::{BoardDriver, DriverFactory, HalError};

/// Registry of available board drivers.
///
/// Constructed at startup, populated via `register()`, and handed to the
/// host binary by value. No global state — testable in isolation.
pub struct DriverRegistry {
    factories: HashMap<&'static str, DriverFactory>,
}

impl DriverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a driver factory.
    ///
    /// # Panics
    /// Panics if a driver with the same name is already registered.
    pub fn register(&mut self, name: &'static str, factory: DriverFactory) {
        if self.factories.contains_key(name) {
            panic!("Driver '{name}' is already registered");
        }
        self.factories.insert(name, factory);
    }

    /// Get a driver factory by name.
    pub fn get_factory(&self, name: &str) -> Option<DriverFactory> {
        self.factories.get(name).copied()
    }

    /// Create a driver instance by name.
    ///
    /// # Errors
    /// Returns `HalError::DriverNotFound` if no driver with the given name
    /// is registered.
    pub fn create_driver(&self, name: &str) -> Result<Box<dyn BoardDriver>, HalError> {
        let factory = self
            .get_factory(name)
            .ok_or_else(|| HalError::DriverNotFound(name.to_string()))?;
        Ok(factory())
    }

    /// List all registered driver names.
    pub fn list_drivers(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry pre-populated with all built-in drivers.
pub fn builtin_registry() -> DriverRegistry {
    let mut registry = DriverRegistry::new();
    registry.register("simulation", crate::drivers::simulation::create_driver);
    // Future drivers will be registered here:
    // registry.register("chamber_v2", chamber_v2::create_driver);
    registry
}
