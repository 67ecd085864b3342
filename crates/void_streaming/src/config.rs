//! Streaming configuration
//!
//! Zones are declared in TOML, in the order they should be evaluated.
//!
//! ```toml
//! simulate_slow_load = false
//!
//! [[zones]]
//! id = "Forest"
//! address = "scenes/forest"
//! center = [0.0, 0.0, 0.0]
//! enter_radius = 6.0
//! exit_radius = 8.0
//!
//! [[zones]]
//! id = "Lake"
//! address = "scenes/lake"
//! center = [12.0, 0.0, -4.0]
//! ```

use crate::error::{Result, ZoneError};
use crate::registry::ZoneRegistry;
use crate::streamer::StreamerOptions;
use crate::zone::ZoneConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete streaming configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamingConfig {
    /// Insert artificial latency before each transition
    #[serde(default)]
    pub simulate_slow_load: bool,
    /// Zone definitions in evaluation order
    #[serde(default)]
    pub zones: Vec<ZoneConfig>,
}

impl StreamingConfig {
    /// Parse from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ZoneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded {} zone(s) from {}", config.zones.len(), path.display());
        Ok(config)
    }

    /// Validate every zone without building a registry
    pub fn validate(&self) -> Result<()> {
        self.zones.iter().try_for_each(ZoneConfig::validate)
    }

    /// Options for the streamer
    pub fn streamer_options(&self) -> StreamerOptions {
        StreamerOptions::default().with_simulated_latency(self.simulate_slow_load)
    }

    /// Build the registry, rejecting invalid or duplicate zones
    pub fn into_registry(self) -> Result<ZoneRegistry> {
        ZoneRegistry::new(self.zones)
    }
}
