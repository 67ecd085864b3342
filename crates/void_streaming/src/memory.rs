//! In-memory resource provider
//!
//! Keeps live instances in a table instead of touching a real content
//! system. Latency and failures can be scripted per address, which makes it
//! the provider of choice for tests and the console demo.

use crate::provider::{ProviderError, ResourceHandle, ResourceProvider};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// A registered resource
#[derive(Debug, Clone)]
struct ResourceEntry {
    /// Name the instance is known by once active
    name: String,
    /// Simulated materialization time
    latency: Duration,
}

/// A live instance
#[derive(Debug, Clone)]
struct Instance {
    address: String,
    name: String,
}

#[derive(Debug, Default)]
struct Inner {
    resources: HashMap<String, ResourceEntry>,
    instances: HashMap<u64, Instance>,
    fail_loads: HashSet<String>,
    fail_unloads: HashSet<String>,
    next_id: u64,
    load_calls: u64,
    unload_calls: u64,
    materialized: u64,
    released: u64,
}

impl Inner {
    fn spawn_instance(&mut self, address: &str, name: &str) -> ResourceHandle {
        self.next_id += 1;
        let id = self.next_id;
        self.instances.insert(
            id,
            Instance {
                address: address.to_string(),
                name: name.to_string(),
            },
        );
        self.materialized += 1;
        ResourceHandle::new(id, address)
    }
}

/// Counters for leak checks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderStats {
    /// Calls to `load`
    pub load_calls: u64,
    /// Calls to `unload`
    pub unload_calls: u64,
    /// Instances created (including out-of-band ones)
    pub materialized: u64,
    /// Instances released
    pub released: u64,
    /// Instances currently alive
    pub active: usize,
}

/// Resource provider backed by an in-memory instance table
#[derive(Debug, Default)]
pub struct MemoryProvider {
    inner: Mutex<Inner>,
    /// Reject addresses that were never registered
    strict: bool,
    /// Latency for addresses without their own
    default_latency: Duration,
}

impl MemoryProvider {
    /// Create a permissive provider: any address loads instantly
    pub fn new() -> Self {
        Self::default()
    }

    /// Only registered addresses can be loaded
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Latency applied to addresses registered without one
    pub fn with_default_latency(mut self, latency: Duration) -> Self {
        self.default_latency = latency;
        self
    }

    /// Register an address. Its instance is known by the address itself.
    pub fn with_resource(self, address: impl Into<String>, latency: Duration) -> Self {
        let address = address.into();
        let name = address.clone();
        self.with_named_resource(address, name, latency)
    }

    /// Register an address whose instance is known under `name`
    pub fn with_named_resource(
        self,
        address: impl Into<String>,
        name: impl Into<String>,
        latency: Duration,
    ) -> Self {
        self.inner.lock().resources.insert(
            address.into(),
            ResourceEntry {
                name: name.into(),
                latency,
            },
        );
        self
    }

    /// Make every subsequent load of `address` fail
    pub fn fail_loads(&self, address: impl Into<String>) {
        self.inner.lock().fail_loads.insert(address.into());
    }

    /// Make every subsequent unload of instances from `address` fail
    pub fn fail_unloads(&self, address: impl Into<String>) {
        self.inner.lock().fail_unloads.insert(address.into());
    }

    /// Clear all scripted failures
    pub fn clear_failures(&self) {
        let mut inner = self.inner.lock();
        inner.fail_loads.clear();
        inner.fail_unloads.clear();
    }

    /// Materialize an instance out-of-band, without handing out a handle.
    /// Returns the instance id.
    pub fn activate_external(&self, address: &str, name: &str) -> u64 {
        self.inner.lock().spawn_instance(address, name).id()
    }

    /// Whether an instance is active under `name`
    pub fn is_active(&self, name: &str) -> bool {
        self.inner.lock().instances.values().any(|i| i.name == name)
    }

    pub fn stats(&self) -> ProviderStats {
        let inner = self.inner.lock();
        ProviderStats {
            load_calls: inner.load_calls,
            unload_calls: inner.unload_calls,
            materialized: inner.materialized,
            released: inner.released,
            active: inner.instances.len(),
        }
    }

    fn plan_load(&self, address: &str) -> Result<(Duration, String), ProviderError> {
        let mut inner = self.inner.lock();
        inner.load_calls += 1;
        match inner.resources.get(address) {
            Some(entry) => Ok((entry.latency, entry.name.clone())),
            None if self.strict => Err(ProviderError::NotFound(address.to_string())),
            None => Ok((self.default_latency, address.to_string())),
        }
    }
}

#[async_trait]
impl ResourceProvider for MemoryProvider {
    async fn load(&self, address: &str) -> Result<ResourceHandle, ProviderError> {
        let (latency, name) = self.plan_load(address)?;

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let mut inner = self.inner.lock();
        if inner.fail_loads.contains(address) {
            return Err(ProviderError::LoadFailed {
                address: address.to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(inner.spawn_instance(address, &name))
    }

    async fn unload(&self, handle: ResourceHandle) -> Result<(), ProviderError> {
        let latency = {
            let mut inner = self.inner.lock();
            inner.unload_calls += 1;
            inner
                .resources
                .get(handle.address())
                .map(|entry| entry.latency)
                .unwrap_or(self.default_latency)
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let mut inner = self.inner.lock();
        let Some(instance) = inner.instances.get(&handle.id()) else {
            return Err(ProviderError::InvalidHandle(handle.id()));
        };
        if inner.fail_unloads.contains(&instance.address) {
            return Err(ProviderError::UnloadFailed {
                handle: handle.id(),
                reason: "scripted failure".to_string(),
            });
        }
        inner.instances.remove(&handle.id());
        inner.released += 1;
        Ok(())
    }

    fn find_active(&self, name: &str) -> Option<ResourceHandle> {
        let inner = self.inner.lock();
        inner
            .instances
            .iter()
            .filter(|(_, instance)| instance.name == name)
            // Oldest instance first when several share a name
            .min_by_key(|(id, _)| **id)
            .map(|(&id, instance)| ResourceHandle::new(id, instance.address.clone()))
    }
}
