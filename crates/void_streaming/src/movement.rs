//! Movement events
//!
//! Re-evaluation is driven by discrete moves, not by a per-frame poll. A
//! [`MoveEvent`] only says "the reference point moved"; the current
//! position is read from a [`PositionSource`] when the event is handled.

use crate::space::Vec3;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Grid direction of a discrete move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Cell offset (x, y)
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// "The reference point moved; re-evaluate now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveEvent {
    /// Direction of the move, for logging only
    pub direction: Option<Direction>,
}

impl MoveEvent {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
        }
    }
}

/// Where the streamer reads the reference position from
pub trait PositionSource {
    fn position(&self) -> Vec3;
}

impl PositionSource for Vec3 {
    fn position(&self) -> Vec3 {
        *self
    }
}

impl<T: PositionSource + ?Sized> PositionSource for &T {
    fn position(&self) -> Vec3 {
        (**self).position()
    }
}

/// Position cell shared between the mover and the streamer
#[derive(Debug, Clone, Default)]
pub struct SharedPosition(Arc<RwLock<Vec3>>);

impl SharedPosition {
    pub fn new(position: Vec3) -> Self {
        Self(Arc::new(RwLock::new(position)))
    }

    pub fn set(&self, position: Vec3) {
        *self.0.write() = position;
    }
}

impl PositionSource for SharedPosition {
    fn position(&self) -> Vec3 {
        *self.0.read()
    }
}

/// Sending half of a movement channel
pub type MoveSender = mpsc::UnboundedSender<MoveEvent>;
/// Receiving half of a movement channel
pub type MoveReceiver = mpsc::UnboundedReceiver<MoveEvent>;

/// Create a movement channel
pub fn movement_channel() -> (MoveSender, MoveReceiver) {
    mpsc::unbounded_channel()
}
