//! Zone registry
//!
//! An arena of immutable [`ZoneConfig`]s with a parallel table of
//! [`ZoneState`]s, indexed by position (configuration order) and by id.
//! Everyone may read; only the streamer mutates.

use crate::error::{Result, ZoneError};
use crate::provider::ResourceHandle;
use crate::zone::{TransitionKind, ZoneConfig, ZoneId, ZonePhase, ZoneState};
use std::collections::HashMap;

/// Result of a finished transition, applied back onto the registry
#[derive(Debug)]
pub(crate) enum TransitionOutcome {
    /// Load succeeded and produced a handle
    Loaded(ResourceHandle),
    /// Load failed; nothing is held
    LoadFailed(String),
    /// Unload ran to completion (`released` is false for a no-op unload)
    Unloaded { released: bool },
    /// The task ended without reporting an outcome
    Aborted,
}

/// Read-only view of one zone
#[derive(Debug, Clone, Copy)]
pub struct ZoneView<'a> {
    /// Position in configuration order
    pub index: usize,
    pub config: &'a ZoneConfig,
    pub state: &'a ZoneState,
}

/// Ordered collection of zones
#[derive(Debug, Default)]
pub struct ZoneRegistry {
    configs: Vec<ZoneConfig>,
    states: Vec<ZoneState>,
    by_id: HashMap<ZoneId, usize>,
}

impl ZoneRegistry {
    /// Build a registry, validating every definition
    pub fn new(configs: Vec<ZoneConfig>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(configs.len());

        for (index, config) in configs.iter().enumerate() {
            config.validate()?;
            if by_id.insert(config.id.clone(), index).is_some() {
                return Err(ZoneError::DuplicateZone(config.id.to_string()));
            }
        }

        let states = configs.iter().map(|_| ZoneState::default()).collect();

        Ok(Self {
            configs,
            states,
            by_id,
        })
    }

    /// Number of zones
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Iterate zones in configuration order
    pub fn iter(&self) -> impl Iterator<Item = ZoneView<'_>> + '_ {
        self.configs
            .iter()
            .zip(self.states.iter())
            .enumerate()
            .map(|(index, (config, state))| ZoneView {
                index,
                config,
                state,
            })
    }

    /// Look up a zone by id
    pub fn get(&self, id: &str) -> Option<ZoneView<'_>> {
        let index = self.index_of(id)?;
        Some(ZoneView {
            index,
            config: &self.configs[index],
            state: &self.states[index],
        })
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn config(&self, index: usize) -> Option<&ZoneConfig> {
        self.configs.get(index)
    }

    pub fn state(&self, index: usize) -> Option<&ZoneState> {
        self.states.get(index)
    }

    /// Phase of a zone by id
    pub fn phase(&self, id: &str) -> Option<ZonePhase> {
        self.get(id).map(|zone| zone.state.phase())
    }

    /// Ids of loaded zones, in configuration order
    pub fn loaded_ids(&self) -> Vec<&ZoneId> {
        self.iter()
            .filter(|zone| zone.state.is_loaded())
            .map(|zone| &zone.config.id)
            .collect()
    }

    /// Mark a zone busy for `kind`.
    ///
    /// Returns false if the zone is already busy or is in the wrong family
    /// for the requested transition.
    pub(crate) fn claim(&mut self, index: usize, kind: TransitionKind) -> bool {
        let Some(state) = self.states.get_mut(index) else {
            return false;
        };
        if state.is_busy() {
            return false;
        }
        let eligible = match kind {
            TransitionKind::Load => !state.loaded,
            TransitionKind::Unload => state.loaded,
        };
        if eligible {
            state.in_flight = Some(kind);
        }
        eligible
    }

    /// Mark an idle, unloaded zone as loaded without holding a handle.
    ///
    /// Used for content that was materialized out-of-band; its unload goes
    /// through the provider's name lookup.
    pub(crate) fn adopt(&mut self, index: usize) -> bool {
        let Some(state) = self.states.get_mut(index) else {
            return false;
        };
        if state.is_busy() || state.loaded {
            return false;
        }
        state.loaded = true;
        true
    }

    /// Move the held handle out so an unload can release it
    pub(crate) fn take_handle(&mut self, index: usize) -> Option<ResourceHandle> {
        self.states.get_mut(index)?.handle.take()
    }

    /// Apply a finished transition and clear the busy flag
    pub(crate) fn complete(&mut self, index: usize, kind: TransitionKind, outcome: TransitionOutcome) {
        let Some(state) = self.states.get_mut(index) else {
            return;
        };
        debug_assert_eq!(state.in_flight, Some(kind));

        match (kind, outcome) {
            (TransitionKind::Load, TransitionOutcome::Loaded(handle)) => {
                state.handle = Some(handle);
                state.loaded = true;
            }
            (TransitionKind::Load, _) => {
                state.handle = None;
                state.loaded = false;
            }
            // An unload always ends unloaded, whatever the provider said
            (TransitionKind::Unload, _) => {
                state.handle = None;
                state.loaded = false;
            }
        }

        state.in_flight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ZoneRegistry {
        ZoneRegistry::new(vec![
            ZoneConfig::new("A", "scenes/a"),
            ZoneConfig::new("B", "scenes/b"),
            ZoneConfig::new("C", "scenes/c"),
        ])
        .unwrap()
    }

    #[test]
    fn test_configuration_order() {
        let registry = registry();
        let ids: Vec<_> = registry.iter().map(|z| z.config.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(registry.index_of("C"), Some(2));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = ZoneRegistry::new(vec![
            ZoneConfig::new("A", "scenes/a"),
            ZoneConfig::new("A", "scenes/other"),
        ])
        .unwrap_err();
        assert!(matches!(err, ZoneError::DuplicateZone(id) if id == "A"));
    }

    #[test]
    fn test_invalid_rejected() {
        let result = ZoneRegistry::new(vec![ZoneConfig::new("A", "a").with_radii(4.0, 2.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_claim_is_exclusive() {
        let mut registry = registry();
        assert!(registry.claim(0, TransitionKind::Load));
        assert!(!registry.claim(0, TransitionKind::Load));
        assert!(!registry.claim(0, TransitionKind::Unload));
        assert_eq!(registry.phase("A"), Some(ZonePhase::Loading));
        assert_eq!(registry.phase("B"), Some(ZonePhase::Unloaded));
    }

    #[test]
    fn test_claim_respects_family() {
        let mut registry = registry();
        // Not loaded yet, so cannot unload
        assert!(!registry.claim(1, TransitionKind::Unload));
        assert!(registry.claim(1, TransitionKind::Load));
        registry.complete(
            1,
            TransitionKind::Load,
            TransitionOutcome::Loaded(ResourceHandle::new(7, "scenes/b")),
        );
        assert!(!registry.claim(1, TransitionKind::Load));
        assert!(registry.claim(1, TransitionKind::Unload));
    }

    #[test]
    fn test_complete_load_then_unload() {
        let mut registry = registry();
        registry.claim(0, TransitionKind::Load);
        registry.complete(
            0,
            TransitionKind::Load,
            TransitionOutcome::Loaded(ResourceHandle::new(1, "scenes/a")),
        );
        let zone = registry.get("A").unwrap();
        assert!(zone.state.is_loaded());
        assert!(!zone.state.is_busy());
        assert_eq!(zone.state.handle().map(|h| h.id()), Some(1));
        assert_eq!(registry.loaded_ids(), vec![&ZoneId::new("A")]);

        registry.claim(0, TransitionKind::Unload);
        let handle = registry.take_handle(0);
        assert!(handle.is_some());
        assert_eq!(registry.phase("A"), Some(ZonePhase::Unloading));
        registry.complete(0, TransitionKind::Unload, TransitionOutcome::Unloaded { released: true });
        let zone = registry.get("A").unwrap();
        assert!(!zone.state.is_loaded());
        assert!(zone.state.handle().is_none());
        assert_eq!(zone.state.phase(), ZonePhase::Unloaded);
    }

    #[test]
    fn test_failed_load_leaves_unloaded() {
        let mut registry = registry();
        registry.claim(2, TransitionKind::Load);
        registry.complete(2, TransitionKind::Load, TransitionOutcome::LoadFailed("boom".into()));
        let zone = registry.get("C").unwrap();
        assert!(!zone.state.is_loaded());
        assert!(!zone.state.is_busy());
        assert!(zone.state.handle().is_none());
    }

    #[test]
    fn test_adopt_only_idle_unloaded() {
        let mut registry = registry();
        assert!(registry.adopt(0));
        assert!(!registry.adopt(0));
        let zone = registry.get("A").unwrap();
        assert!(zone.state.is_loaded());
        assert!(zone.state.handle().is_none());

        assert!(registry.claim(1, TransitionKind::Load));
        assert!(!registry.adopt(1));
    }

    #[test]
    fn test_aborted_unload_clears_loaded() {
        let mut registry = registry();
        registry.claim(0, TransitionKind::Load);
        registry.complete(
            0,
            TransitionKind::Load,
            TransitionOutcome::Loaded(ResourceHandle::new(3, "scenes/a")),
        );
        registry.claim(0, TransitionKind::Unload);
        registry.complete(0, TransitionKind::Unload, TransitionOutcome::Aborted);
        assert_eq!(registry.phase("A"), Some(ZonePhase::Unloaded));
    }
}
