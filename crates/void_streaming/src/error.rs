//! Error types for zone streaming

use std::path::PathBuf;
use thiserror::Error;

/// Zone streaming errors
///
/// These are setup-time errors. Failures reported by a resource provider
/// during a transition are recovered inside the transition and never
/// surface here.
#[derive(Debug, Error)]
pub enum ZoneError {
    /// A zone definition failed validation
    #[error("Invalid zone '{zone}': {reason}")]
    InvalidZone { zone: String, reason: String },

    /// Two zone definitions share an id
    #[error("Duplicate zone id: {0}")]
    DuplicateZone(String),

    /// The streamer was created outside of a Tokio runtime
    #[error("No Tokio runtime available to drive zone transitions")]
    NoRuntime,

    /// Reading a configuration file failed
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration text is not valid TOML for the expected layout
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ZoneError {
    pub(crate) fn invalid(zone: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidZone {
            zone: zone.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for zone streaming setup
pub type Result<T> = std::result::Result<T, ZoneError>;
