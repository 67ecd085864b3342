//! Trigger evaluation
//!
//! Decides, for the current reference position, which zones should start
//! loading and which should start unloading. Two radii per zone form a
//! hysteresis band: a zone loads at or inside `enter_radius` and only
//! unloads again at or beyond `exit_radius`, so hovering near one boundary
//! cannot make it cycle.

use crate::registry::ZoneRegistry;
use crate::space::Vec3;
use crate::zone::{TransitionKind, ZoneId};

/// A decision to start a transition, not yet executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneIntent {
    /// Registry index of the zone
    pub index: usize,
    /// Zone id
    pub zone: ZoneId,
    /// Transition to start
    pub kind: TransitionKind,
}

/// Scan every zone in registry order and collect intents.
///
/// Busy zones are skipped. Pure with respect to registry state and
/// position, so calling it twice without intervening transitions yields
/// the same intents.
pub fn evaluate(registry: &ZoneRegistry, position: Vec3) -> Vec<ZoneIntent> {
    let mut intents = Vec::new();

    for zone in registry.iter() {
        if zone.state.is_busy() {
            continue;
        }

        let distance_sq = position.distance_squared(zone.config.center);

        let kind = if !zone.state.is_loaded() && distance_sq <= zone.config.enter_radius_sq() {
            TransitionKind::Load
        } else if zone.state.is_loaded() && distance_sq >= zone.config.exit_radius_sq() {
            TransitionKind::Unload
        } else {
            continue;
        };

        log::debug!(
            "TriggerEvaluator: {} intent for {} (distance² {:.2})",
            kind,
            zone.config.id,
            distance_sq
        );

        intents.push(ZoneIntent {
            index: zone.index,
            zone: zone.config.id.clone(),
            kind,
        });
    }

    intents
}
