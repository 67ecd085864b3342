//! Void Streaming - Proximity-Triggered Zone Streaming
//!
//! This crate loads and unloads content zones as a reference point moves
//! around them.
//!
//! # Features
//!
//! - Per-zone enter/exit radii forming a hysteresis band
//! - Re-evaluation on discrete movement events, never per frame
//! - Concurrent, independent load/unload transitions on Tokio
//! - Busy flag per zone held by a guard that always releases
//! - Pluggable resource provider and status display
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use void_streaming::prelude::*;
//!
//! let registry = ZoneRegistry::new(vec![
//!     ZoneConfig::new("Forest", "scenes/forest").with_radii(6.0, 8.0),
//! ])?;
//!
//! let mut streamer = ZoneStreamer::new(
//!     registry,
//!     Arc::new(MemoryProvider::new()),
//!     Arc::new(StatusBoard::new()),
//!     StreamerOptions::default(),
//! )?;
//!
//! streamer.on_move(Vec3::new(5.0, 0.0, 0.0));
//! streamer.settle().await;
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod memory;
pub mod movement;
pub mod provider;
pub mod registry;
pub mod space;
pub mod status;
pub mod streamer;
pub mod trigger;
pub mod zone;

pub mod prelude {
    pub use crate::config::StreamingConfig;
    pub use crate::error::{Result, ZoneError};
    pub use crate::events::StreamEvent;
    pub use crate::memory::{MemoryProvider, ProviderStats};
    pub use crate::movement::{
        movement_channel, Direction, MoveEvent, MoveReceiver, MoveSender, PositionSource,
        SharedPosition,
    };
    pub use crate::provider::{ProviderError, ResourceHandle, ResourceProvider};
    pub use crate::registry::{ZoneRegistry, ZoneView};
    pub use crate::space::Vec3;
    pub use crate::status::{LogStatus, StatusBoard, StatusSink, StatusSnapshot};
    pub use crate::streamer::{Completion, StreamerOptions, ZoneStreamer};
    pub use crate::trigger::{evaluate, ZoneIntent};
    pub use crate::zone::{Band, TransitionKind, ZoneConfig, ZoneId, ZonePhase, ZoneState};
}

pub use prelude::*;
