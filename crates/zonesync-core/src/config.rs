//! Configuration types for zonesync
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::zone::validate_zone_name;

/// Main zonesync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Provider configuration
    pub provider: ProviderConfig,

    /// Zones to manage (fully-qualified, dot-terminated)
    #[serde(default)]
    pub zones: Vec<String>,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl SyncConfig {
    /// Create a configuration for one provider with no zones
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            provider,
            zones: Vec::new(),
            engine: EngineConfig::default(),
        }
    }

    /// Add a zone
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zones.push(zone.into());
        self
    }

    /// Read a configuration from a JSON file
    ///
    /// The result is not validated, so callers can layer overrides on top
    /// before calling [`SyncConfig::validate`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, crate::Error> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()?;

        for zone in &self.zones {
            validate_zone_name(zone).map_err(|e| crate::Error::config(e.to_string()))?;
        }

        Ok(())
    }
}

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Infomaniak DNS API
    Infomaniak {
        /// API token with domain DNS permissions
        api_token: String,
        /// API base URL override (tests, proxies)
        #[serde(default)]
        base_url: Option<String>,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Infomaniak { api_token, base_url } => {
                if api_token.is_empty() {
                    return Err(crate::Error::config("Infomaniak API token cannot be empty"));
                }
                if let Some(url) = base_url
                    && !url.starts_with("https://")
                    && !url.starts_with("http://")
                {
                    return Err(crate::Error::config(format!(
                        "Infomaniak base URL must use HTTP or HTTPS scheme. Got: {}",
                        url
                    )));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Infomaniak { .. } => "infomaniak",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Let the zone container replace duplicates instead of refusing them
    #[serde(default)]
    pub lenient: bool,

    /// Log provider writes instead of sending them
    #[serde(default)]
    pub dry_run: bool,
}
