//! Plugin-based client registry
//!
//! The registry lets provider crates register their remote client
//! factories at runtime, avoiding hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zonesync_core::registry::ClientRegistry;
//! use zonesync_core::config::ProviderConfig;
//!
//! let registry = ClientRegistry::new();
//! zonesync_provider_infomaniak::register(&registry);
//!
//! let config = ProviderConfig::Infomaniak { ... };
//! let client = registry.create_client(&config, false)?;
//! ```

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::traits::{RemoteClient, RemoteClientFactory};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Registry for plugin-based remote client creation
///
/// Maps provider type names to factory objects, allowing dynamic
/// instantiation of clients based on configuration.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ClientRegistry {
    /// Registered remote client factories
    clients: RwLock<HashMap<String, Box<dyn RemoteClientFactory>>>,
}

impl ClientRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a remote client factory
    ///
    /// # Parameters
    ///
    /// - `name`: Provider type name (e.g., "infomaniak")
    /// - `factory`: Factory object for creating client instances
    pub fn register_client(&self, name: impl Into<String>, factory: Box<dyn RemoteClientFactory>) {
        let mut clients = self.clients.write().unwrap_or_else(PoisonError::into_inner);
        clients.insert(name.into(), factory);
    }

    /// Create a remote client from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn RemoteClient>)`: Created client instance
    /// - `Err(Error)`: If the provider type is not registered or creation fails
    pub fn create_client(
        &self,
        config: &ProviderConfig,
        dry_run: bool,
    ) -> Result<Box<dyn RemoteClient>> {
        let provider_type = config.type_name();
        let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);

        let factory = clients
            .get(provider_type)
            .ok_or_else(|| Error::config(format!("Unknown provider type: {}", provider_type)))?;

        factory.create(config, dry_run)
    }

    /// List all registered provider types
    pub fn list_clients(&self) -> Vec<String> {
        let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = clients.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a provider type is registered
    pub fn has_client(&self, name: &str) -> bool {
        let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);
        clients.contains_key(name)
    }
}
