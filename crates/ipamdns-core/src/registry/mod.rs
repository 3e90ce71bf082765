//! Plugin-based object store registry
//!
//! The registry allows object stores to be registered dynamically at
//! runtime, avoiding hardcoded if-else chains over store types.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ipamdns_core::registry::StoreRegistry;
//! use ipamdns_core::config::StoreConfig;
//!
//! let registry = StoreRegistry::with_builtin();
//!
//! // Store crates register themselves
//! ipamdns_wapi::register(&registry);
//!
//! let store = registry.create_store(&StoreConfig::Memory)?;
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::store::MemoryStoreFactory;
use crate::traits::{ObjectStore, ObjectStoreFactory};

/// Store registry for plugin-based object store creation
///
/// Maps store type names (as reported by [`StoreConfig::type_name`]) to
/// factories.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct StoreRegistry {
    stores: RwLock<HashMap<String, Box<dyn ObjectStoreFactory>>>,
}

impl StoreRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the stores of this crate registered
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register_store("memory", Box::new(MemoryStoreFactory));
        registry
    }

    /// Register an object store factory
    ///
    /// # Parameters
    ///
    /// - `name`: Store type name (e.g., "wapi", "memory")
    /// - `factory`: Factory object for creating store instances
    pub fn register_store(&self, name: impl Into<String>, factory: Box<dyn ObjectStoreFactory>) {
        let name = name.into();
        let mut stores = self.stores.write().unwrap_or_else(PoisonError::into_inner);
        stores.insert(name, factory);
    }

    /// Create an object store from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn ObjectStore>)`: Created store instance
    /// - `Err(Error)`: If the configuration is invalid, the store type is
    ///   not registered, or creation fails
    pub fn create_store(&self, config: &StoreConfig) -> Result<Arc<dyn ObjectStore>> {
        config.validate()?;

        let store_type = config.type_name();
        let stores = self.stores.read().unwrap_or_else(PoisonError::into_inner);

        let factory = stores
            .get(store_type)
            .ok_or_else(|| Error::config(format!("Unknown store type: {}", store_type)))?;

        factory.create(config)
    }

    /// List all registered store types
    pub fn list_stores(&self) -> Vec<String> {
        let stores = self.stores.read().unwrap_or_else(PoisonError::into_inner);
        stores.keys().cloned().collect()
    }

    /// Check if a store type is registered
    pub fn has_store(&self, name: &str) -> bool {
        let stores = self.stores.read().unwrap_or_else(PoisonError::into_inner);
        stores.contains_key(name)
    }
}
