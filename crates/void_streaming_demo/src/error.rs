//! Error types for the zone walk

use thiserror::Error;
use void_streaming::ZoneError;

/// Zone walk errors
#[derive(Debug, Error)]
pub enum WalkError {
    #[error(transparent)]
    Zones(#[from] ZoneError),

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Failed to read input: {0}")]
    Input(#[from] std::io::Error),

    #[error("Streamer task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, WalkError>;
