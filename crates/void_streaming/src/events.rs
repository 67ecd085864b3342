//! Streaming events

use crate::zone::{TransitionKind, ZoneId};

/// Something that happened to a zone, in the order the streamer applied it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A load transition was dispatched
    LoadStarted(ZoneId),
    /// A load finished and the zone is now loaded
    Loaded(ZoneId),
    /// A load failed; the zone stays unloaded and may be retried
    LoadFailed { zone: ZoneId, reason: String },
    /// An unload transition was dispatched
    UnloadStarted(ZoneId),
    /// An unload finished; `released` is false when nothing had to be freed
    Unloaded { zone: ZoneId, released: bool },
    /// A transition task ended without reporting back
    Aborted { zone: ZoneId, kind: TransitionKind },
}

impl StreamEvent {
    /// Zone the event refers to
    pub fn zone(&self) -> &ZoneId {
        match self {
            Self::LoadStarted(zone)
            | Self::Loaded(zone)
            | Self::UnloadStarted(zone) => zone,
            Self::LoadFailed { zone, .. }
            | Self::Unloaded { zone, .. }
            | Self::Aborted { zone, .. } => zone,
        }
    }

    /// Whether the event ends a transition
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::LoadStarted(_) | Self::UnloadStarted(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_and_terminal() {
        let started = StreamEvent::LoadStarted(ZoneId::new("A"));
        assert_eq!(started.zone().as_str(), "A");
        assert!(!started.is_terminal());

        let failed = StreamEvent::LoadFailed {
            zone: ZoneId::new("B"),
            reason: "missing".into(),
        };
        assert_eq!(failed.zone().as_str(), "B");
        assert!(failed.is_terminal());
    }
}
