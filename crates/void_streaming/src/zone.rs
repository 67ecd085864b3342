//! Zone configuration and runtime state
//!
//! Configuration and runtime state are kept as separate types: a
//! [`ZoneConfig`] never changes after setup, while a [`ZoneState`] is only
//! mutated by the streamer through the registry.

use crate::error::{Result, ZoneError};
use crate::provider::ResourceHandle;
use crate::space::Vec3;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Default inner radius
pub const DEFAULT_ENTER_RADIUS: f32 = 6.0;
/// Default outer radius
pub const DEFAULT_EXIT_RADIUS: f32 = 8.0;

/// Stable zone identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(String);

impl ZoneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ZoneId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ZoneId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ZoneId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Where a distance falls relative to a zone's two radii
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Within the enter radius (inclusive)
    Inside,
    /// Between the two radii
    Hysteresis,
    /// Beyond the exit radius (inclusive)
    Outside,
}

/// Immutable zone definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Zone identity
    pub id: ZoneId,
    /// Opaque locator handed to the resource provider
    pub address: String,
    /// Zone center
    #[serde(default)]
    pub center: Vec3,
    /// Distance at or below which the zone loads
    #[serde(default = "default_enter_radius")]
    pub enter_radius: f32,
    /// Distance at or beyond which the zone unloads
    #[serde(default = "default_exit_radius")]
    pub exit_radius: f32,
}

fn default_enter_radius() -> f32 {
    DEFAULT_ENTER_RADIUS
}

fn default_exit_radius() -> f32 {
    DEFAULT_EXIT_RADIUS
}

impl ZoneConfig {
    /// Create a zone at the origin with default radii
    pub fn new(id: impl Into<ZoneId>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            center: Vec3::ZERO,
            enter_radius: DEFAULT_ENTER_RADIUS,
            exit_radius: DEFAULT_EXIT_RADIUS,
        }
    }

    /// Set center
    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    /// Set both radii
    pub fn with_radii(mut self, enter_radius: f32, exit_radius: f32) -> Self {
        self.enter_radius = enter_radius;
        self.exit_radius = exit_radius;
        self
    }

    #[inline]
    pub fn enter_radius_sq(&self) -> f32 {
        self.enter_radius * self.enter_radius
    }

    #[inline]
    pub fn exit_radius_sq(&self) -> f32 {
        self.exit_radius * self.exit_radius
    }

    /// Classify a squared distance from the center
    pub fn classify(&self, distance_sq: f32) -> Band {
        if distance_sq <= self.enter_radius_sq() {
            Band::Inside
        } else if distance_sq >= self.exit_radius_sq() {
            Band::Outside
        } else {
            Band::Hysteresis
        }
    }

    /// Reject definitions that would break the hysteresis band.
    ///
    /// An inverted band is reported, never swapped.
    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(ZoneError::invalid("<unnamed>", "zone id is empty"));
        }
        if self.address.trim().is_empty() {
            return Err(ZoneError::invalid(self.id.as_str(), "address is empty"));
        }
        if !self.center.is_finite() {
            return Err(ZoneError::invalid(self.id.as_str(), "center is not finite"));
        }
        for (name, radius) in [("enter_radius", self.enter_radius), ("exit_radius", self.exit_radius)] {
            if !radius.is_finite() || radius < 0.0 {
                return Err(ZoneError::invalid(
                    self.id.as_str(),
                    format!("{} must be a non-negative number, got {}", name, radius),
                ));
            }
        }
        if self.exit_radius < self.enter_radius {
            return Err(ZoneError::invalid(
                self.id.as_str(),
                format!(
                    "exit_radius ({}) is smaller than enter_radius ({})",
                    self.exit_radius, self.enter_radius
                ),
            ));
        }
        Ok(())
    }
}

/// Kind of transition a zone can undergo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    Load,
    Unload,
}

impl core::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Load => write!(f, "load"),
            Self::Unload => write!(f, "unload"),
        }
    }
}

/// Observable lifecycle phase of a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZonePhase {
    Unloaded,
    Loading,
    Loaded,
    Unloading,
}

/// Mutable per-zone runtime state
#[derive(Debug, Default)]
pub struct ZoneState {
    pub(crate) loaded: bool,
    pub(crate) in_flight: Option<TransitionKind>,
    pub(crate) handle: Option<ResourceHandle>,
}

impl ZoneState {
    /// True once a load has completed and no unload has completed since
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// True while a load or unload is in flight
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Transition currently in flight, if any
    pub fn in_flight(&self) -> Option<TransitionKind> {
        self.in_flight
    }

    /// Handle of the materialized resource
    pub fn handle(&self) -> Option<&ResourceHandle> {
        self.handle.as_ref()
    }

    pub fn phase(&self) -> ZonePhase {
        match (self.in_flight, self.loaded) {
            (Some(TransitionKind::Load), _) => ZonePhase::Loading,
            (Some(TransitionKind::Unload), _) => ZonePhase::Unloading,
            (None, true) => ZonePhase::Loaded,
            (None, false) => ZonePhase::Unloaded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let zone = ZoneConfig::new("Z", "scenes/z");
        assert_eq!(zone.enter_radius, 6.0);
        assert_eq!(zone.exit_radius, 8.0);
        assert_eq!(zone.center, Vec3::ZERO);
        assert!(zone.validate().is_ok());
    }

    #[test]
    fn test_inverted_radii_rejected() {
        let zone = ZoneConfig::new("Z", "scenes/z").with_radii(8.0, 6.0);
        let err = zone.validate().unwrap_err();
        assert!(matches!(err, ZoneError::InvalidZone { ref zone, .. } if zone == "Z"));
        // Not silently corrected
        assert_eq!(zone.enter_radius, 8.0);
    }

    #[test]
    fn test_equal_radii_allowed() {
        let zone = ZoneConfig::new("Z", "scenes/z").with_radii(5.0, 5.0);
        assert!(zone.validate().is_ok());
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(ZoneConfig::new("Z", "a").with_radii(-1.0, 2.0).validate().is_err());
        assert!(ZoneConfig::new("Z", "a").with_radii(1.0, f32::NAN).validate().is_err());
        assert!(ZoneConfig::new("", "a").validate().is_err());
        assert!(ZoneConfig::new("Z", " ").validate().is_err());
        assert!(ZoneConfig::new("Z", "a")
            .with_center(Vec3::new(f32::INFINITY, 0.0, 0.0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_classify_ties_inclusive() {
        let zone = ZoneConfig::new("Z", "a").with_radii(6.0, 8.0);
        assert_eq!(zone.classify(36.0), Band::Inside);
        assert_eq!(zone.classify(49.0), Band::Hysteresis);
        assert_eq!(zone.classify(64.0), Band::Outside);
    }

    #[test]
    fn test_phase() {
        let mut state = ZoneState::default();
        assert_eq!(state.phase(), ZonePhase::Unloaded);
        state.in_flight = Some(TransitionKind::Load);
        assert_eq!(state.phase(), ZonePhase::Loading);
        state.in_flight = None;
        state.loaded = true;
        assert_eq!(state.phase(), ZonePhase::Loaded);
        state.in_flight = Some(TransitionKind::Unload);
        assert_eq!(state.phase(), ZonePhase::Unloading);
        assert!(state.is_busy());
    }
}
