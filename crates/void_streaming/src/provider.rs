//! Resource provider seam
//!
//! A provider turns an opaque zone address into a live content instance
//! and releases it again. The streamer never looks inside a handle; it only
//! holds it between a successful load and the matching unload.

use async_trait::async_trait;
use thiserror::Error;

/// Ownership token for a materialized resource instance
///
/// Not `Clone`: exactly one owner (the zone, or the transition
/// currently releasing it) holds a handle at any time.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    id: u64,
    address: String,
}

impl ResourceHandle {
    /// Create a handle. Intended for provider implementations.
    pub fn new(id: u64, address: impl Into<String>) -> Self {
        Self {
            id,
            address: address.into(),
        }
    }

    /// Provider-assigned instance id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Address the instance was materialized from
    pub fn address(&self) -> &str {
        &self.address
    }
}

impl core::fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{} ({})", self.id, self.address)
    }
}

/// Failures reported by a resource provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No resource is registered under the address
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Materialization failed
    #[error("Failed to load '{address}': {reason}")]
    LoadFailed { address: String, reason: String },

    /// Release failed
    #[error("Failed to unload #{handle}: {reason}")]
    UnloadFailed { handle: u64, reason: String },

    /// The handle does not refer to a live instance
    #[error("Invalid resource handle #{0}")]
    InvalidHandle(u64),
}

/// Asynchronous source of zone content
///
/// Implementations must tolerate concurrent calls for distinct addresses
/// and handles.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Materialize the resource behind `address`
    async fn load(&self, address: &str) -> Result<ResourceHandle, ProviderError>;

    /// Release a previously materialized resource
    async fn unload(&self, handle: ResourceHandle) -> Result<(), ProviderError>;

    /// Look up an instance that is active under `name` but whose handle the
    /// caller does not hold, e.g. one materialized out-of-band.
    fn find_active(&self, _name: &str) -> Option<ResourceHandle> {
        None
    }
}
