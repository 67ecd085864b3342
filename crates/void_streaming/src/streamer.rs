//! Zone lifecycle coordination
//!
//! The [`ZoneStreamer`] owns the registry and is driven from a single
//! logical thread: movement events come in, the trigger evaluator decides,
//! and every accepted intent becomes an independent Tokio task talking to
//! the resource provider. Tasks never touch the registry. When a task ends
//! its [`TransitionGuard`] posts a [`Completion`] back over a channel, and
//! the streamer applies it on the same thread that evaluates triggers.
//!
//! ```text
//! MoveEvent ──► evaluate ──► claim (busy = true) ──► spawn task
//!                                                        │
//!   registry ◄── apply ◄── Completion ◄── guard drop ◄───┘
//! ```

use crate::error::{Result, ZoneError};
use crate::events::StreamEvent;
use crate::movement::{MoveReceiver, PositionSource};
use crate::provider::{ResourceHandle, ResourceProvider};
use crate::registry::{TransitionOutcome, ZoneRegistry};
use crate::space::Vec3;
use crate::status::StatusSink;
use crate::trigger::{self, ZoneIntent};
use crate::zone::{TransitionKind, ZoneId, ZonePhase};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Streamer options
#[derive(Debug, Clone)]
pub struct StreamerOptions {
    /// Insert artificial latency before each transition (testing aid)
    pub simulate_latency: bool,
    /// Delay before a load when `simulate_latency` is set
    pub load_delay: Duration,
    /// Delay before an unload when `simulate_latency` is set
    pub unload_delay: Duration,
}

impl Default for StreamerOptions {
    fn default() -> Self {
        Self {
            simulate_latency: false,
            load_delay: Duration::from_millis(500),
            unload_delay: Duration::from_millis(200),
        }
    }
}

impl StreamerOptions {
    /// Enable or disable artificial latency
    pub fn with_simulated_latency(mut self, enabled: bool) -> Self {
        self.simulate_latency = enabled;
        self
    }

    fn delay_for(&self, kind: TransitionKind) -> Option<Duration> {
        if !self.simulate_latency {
            return None;
        }
        Some(match kind {
            TransitionKind::Load => self.load_delay,
            TransitionKind::Unload => self.unload_delay,
        })
    }
}

/// Report from a finished transition task
#[derive(Debug)]
pub struct Completion {
    index: usize,
    zone: ZoneId,
    kind: TransitionKind,
    outcome: TransitionOutcome,
}

impl Completion {
    pub fn zone(&self) -> &ZoneId {
        &self.zone
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }
}

/// Scoped hold on a zone's busy flag.
///
/// Moved into the transition task. Dropping it, on any exit path, clears the
/// status display and posts the completion that releases the zone.
struct TransitionGuard {
    index: usize,
    zone: ZoneId,
    kind: TransitionKind,
    outcome: Option<TransitionOutcome>,
    status: Arc<dyn StatusSink>,
    completions: mpsc::UnboundedSender<Completion>,
}

impl TransitionGuard {
    fn finish(mut self, outcome: TransitionOutcome) {
        self.outcome = Some(outcome);
    }
}

impl Drop for TransitionGuard {
    fn drop(&mut self) {
        self.status.hide();

        let outcome = self.outcome.take().unwrap_or(TransitionOutcome::Aborted);
        let completion = Completion {
            index: self.index,
            zone: self.zone.clone(),
            kind: self.kind,
            outcome,
        };

        // A closed channel means the streamer is gone; nothing left to release
        if self.completions.send(completion).is_err() {
            log::debug!("ZoneStreamer: dropped completion for {} after shutdown", self.zone);
        }
    }
}

/// Drives zone loads and unloads around a moving reference point
pub struct ZoneStreamer {
    registry: ZoneRegistry,
    provider: Arc<dyn ResourceProvider>,
    status: Arc<dyn StatusSink>,
    options: StreamerOptions,
    runtime: Handle,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
    events: Vec<StreamEvent>,
}

impl ZoneStreamer {
    /// Create a streamer on the current Tokio runtime
    pub fn new(
        registry: ZoneRegistry,
        provider: Arc<dyn ResourceProvider>,
        status: Arc<dyn StatusSink>,
        options: StreamerOptions,
    ) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| ZoneError::NoRuntime)?;
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        log::info!(
            "ZoneStreamer: {} zone(s) registered{}",
            registry.len(),
            if options.simulate_latency { ", simulating slow loads" } else { "" }
        );

        Ok(Self {
            registry,
            provider,
            status,
            options,
            runtime,
            completions_tx,
            completions_rx,
            in_flight: 0,
            events: Vec::new(),
        })
    }

    /// Read access to zones and their state
    pub fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    pub fn options(&self) -> &StreamerOptions {
        &self.options
    }

    /// Phase of a zone by id
    pub fn phase(&self, id: &str) -> Option<ZonePhase> {
        self.registry.phase(id)
    }

    /// Number of transitions dispatched but not yet applied
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<StreamEvent> {
        std::mem::take(&mut self.events)
    }

    /// Re-evaluate triggers for a new reference position and dispatch a
    /// transition for every eligible zone. Returns the dispatched intents.
    ///
    /// Completions that have already arrived are applied first, so only
    /// transitions that are still pending hold their zone busy. Never waits
    /// on the provider.
    pub fn on_move(&mut self, position: Vec3) -> Vec<ZoneIntent> {
        self.apply_completions();

        let intents = trigger::evaluate(&self.registry, position);
        let mut dispatched = Vec::with_capacity(intents.len());

        for intent in intents {
            // Busy is set here, before the task exists
            if !self.registry.claim(intent.index, intent.kind) {
                log::debug!("ZoneStreamer: {} intent for {} dropped", intent.kind, intent.zone);
                continue;
            }
            self.dispatch(&intent);
            dispatched.push(intent);
        }

        dispatched
    }

    fn dispatch(&mut self, intent: &ZoneIntent) {
        let Some(config) = self.registry.config(intent.index) else {
            return;
        };
        let address = config.address.clone();
        let zone = intent.zone.clone();
        let delay = self.options.delay_for(intent.kind);
        let provider = Arc::clone(&self.provider);

        let guard = TransitionGuard {
            index: intent.index,
            zone: zone.clone(),
            kind: intent.kind,
            outcome: None,
            status: Arc::clone(&self.status),
            completions: self.completions_tx.clone(),
        };

        self.in_flight += 1;

        match intent.kind {
            TransitionKind::Load => {
                self.status.show(&format!("Loading {}...", zone));
                self.events.push(StreamEvent::LoadStarted(zone));
                self.runtime.spawn(run_load(provider, address, delay, guard));
            }
            TransitionKind::Unload => {
                let handle = self.registry.take_handle(intent.index);
                self.status.show(&format!("Unloading {}...", zone));
                self.events.push(StreamEvent::UnloadStarted(zone));
                self.runtime.spawn(run_unload(provider, handle, delay, guard));
            }
        }
    }

    /// Treat zones whose content the provider reports as already active
    /// (materialized out-of-band) as loaded. No handle is taken; their
    /// eventual unload releases them by name. Returns the adopted zones.
    pub fn adopt_external(&mut self) -> Vec<ZoneId> {
        let candidates: Vec<(usize, ZoneId)> = self
            .registry
            .iter()
            .filter(|zone| !zone.state.is_busy() && !zone.state.is_loaded())
            .filter(|zone| self.provider.find_active(zone.config.id.as_str()).is_some())
            .map(|zone| (zone.index, zone.config.id.clone()))
            .collect();

        let mut adopted = Vec::with_capacity(candidates.len());
        for (index, zone) in candidates {
            if self.registry.adopt(index) {
                log::info!("ZoneStreamer: adopted externally active {}", zone);
                adopted.push(zone);
            }
        }
        adopted
    }

    /// Apply one completion to the registry
    pub fn apply(&mut self, completion: Completion) {
        let Completion {
            index,
            zone,
            kind,
            outcome,
        } = completion;

        self.in_flight = self.in_flight.saturating_sub(1);

        let event = match &outcome {
            TransitionOutcome::Loaded(_) => StreamEvent::Loaded(zone),
            TransitionOutcome::LoadFailed(reason) => StreamEvent::LoadFailed {
                zone,
                reason: reason.clone(),
            },
            TransitionOutcome::Unloaded { released } => StreamEvent::Unloaded {
                zone,
                released: *released,
            },
            TransitionOutcome::Aborted => {
                log::warn!("ZoneStreamer: {} of {} aborted", kind, zone);
                StreamEvent::Aborted { zone, kind }
            }
        };

        self.registry.complete(index, kind, outcome);
        self.events.push(event);
    }

    /// Apply every completion that has already arrived. Does not wait.
    pub fn apply_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Wait for the next completion. `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        self.completions_rx.recv().await
    }

    /// Wait until every dispatched transition has been applied
    pub async fn settle(&mut self) {
        while let Some(completion) = self.next_completion().await {
            self.apply(completion);
        }
    }

    /// Event loop: re-evaluate on every movement event and apply
    /// completions as they arrive. Returns once the movement channel closes
    /// and all pending transitions have been applied.
    pub async fn run<S: PositionSource>(&mut self, mut moves: MoveReceiver, source: S) {
        loop {
            tokio::select! {
                // Finished transitions go before the next evaluation
                biased;

                Some(completion) = self.completions_rx.recv(), if self.in_flight > 0 => {
                    self.apply(completion);
                }
                event = moves.recv() => match event {
                    Some(event) => {
                        if let Some(direction) = event.direction {
                            log::debug!("ZoneStreamer: moved {}", direction);
                        }
                        self.on_move(source.position());
                    }
                    None => break,
                },
            }
        }

        self.settle().await;
        log::info!("ZoneStreamer: stopped, {} zone(s) loaded", self.registry.loaded_ids().len());
    }
}

async fn run_load(
    provider: Arc<dyn ResourceProvider>,
    address: String,
    delay: Option<Duration>,
    guard: TransitionGuard,
) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    log::info!("ZoneStreamer: Load start: {}", guard.zone);

    let outcome = match provider.load(&address).await {
        Ok(handle) => {
            log::info!("ZoneStreamer: Load done: {} ({})", guard.zone, handle);
            TransitionOutcome::Loaded(handle)
        }
        Err(e) => {
            log::warn!("ZoneStreamer: Load failed: {}: {}", guard.zone, e);
            TransitionOutcome::LoadFailed(e.to_string())
        }
    };

    guard.finish(outcome);
}

async fn run_unload(
    provider: Arc<dyn ResourceProvider>,
    handle: Option<ResourceHandle>,
    delay: Option<Duration>,
    guard: TransitionGuard,
) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    log::info!("ZoneStreamer: Unload start: {}", guard.zone);

    // No handle held: fall back to whatever is active under the zone id
    let target = match handle {
        Some(handle) => Some(handle),
        None => provider.find_active(guard.zone.as_str()),
    };

    let released = match target {
        Some(handle) => match provider.unload(handle).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("ZoneStreamer: Unload failed: {}: {}", guard.zone, e);
                false
            }
        },
        None => {
            log::debug!("ZoneStreamer: nothing to release for {}", guard.zone);
            false
        }
    };

    log::info!("ZoneStreamer: Unload done: {}", guard.zone);
    guard.finish(TransitionOutcome::Unloaded { released });
}
