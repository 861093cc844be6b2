/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use log::{debug, info};

/// The aggregation daemon, reached over some ipc channel.
pub trait RemoteSink: Send + Sync {
    fn add_value(&self, json: &str) -> anyhow::Result<()>;
    fn start_report(&self, json: &str) -> anyhow::Result<()>;
    fn finish_report(&self, json: &str) -> anyhow::Result<()>;
}

/// Look up the remote sink registered under a service name.
///
/// `Ok(None)` means no such service is currently registered. The resolver
/// should arrange for `notifier` to be called once the returned handle dies.
pub trait RemoteSinkResolver: Send + Sync {
    fn resolve(
        &self,
        service_name: &str,
        notifier: DisconnectNotifier,
    ) -> anyhow::Result<Option<Arc<dyn RemoteSink>>>;
}

impl<F> RemoteSinkResolver for F
where
    F: Fn(&str, DisconnectNotifier) -> anyhow::Result<Option<Arc<dyn RemoteSink>>> + Send + Sync,
{
    fn resolve(
        &self,
        service_name: &str,
        notifier: DisconnectNotifier,
    ) -> anyhow::Result<Option<Arc<dyn RemoteSink>>> {
        (self)(service_name, notifier)
    }
}

struct CachedSink {
    generation: u64,
    sink: Arc<dyn RemoteSink>,
}

#[derive(Default)]
struct CacheSlot {
    cached: Option<CachedSink>,
    next_generation: u64,
}

struct CacheState {
    slot: Mutex<CacheSlot>,
    // every generation up to this one has been reported dead
    disconnected: AtomicU64,
}

/// Handed to the resolver, bound to the handle being resolved.
///
/// Notifying never takes the cache lock, so it is safe to call from any
/// thread, including from inside `RemoteSinkResolver::resolve`.
#[derive(Clone)]
pub struct DisconnectNotifier {
    state: Weak<CacheState>,
    generation: u64,
}

impl DisconnectNotifier {
    pub fn notify(&self) {
        if let Some(state) = self.state.upgrade() {
            state
                .disconnected
                .fetch_max(self.generation, Ordering::AcqRel);
        }
    }
}

/// Lazily resolved, shared handle to the remote sink.
pub struct RemoteSinkCache {
    service_name: String,
    resolver: Option<Box<dyn RemoteSinkResolver>>,
    state: Arc<CacheState>,
}

impl RemoteSinkCache {
    pub fn new(service_name: &str, resolver: Option<Box<dyn RemoteSinkResolver>>) -> Self {
        RemoteSinkCache {
            service_name: service_name.to_string(),
            resolver,
            state: Arc::new(CacheState {
                slot: Mutex::new(CacheSlot::default()),
                disconnected: AtomicU64::new(0),
            }),
        }
    }

    #[inline]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Get the cached handle, resolving a new one if there is none or the
    /// cached one has been reported dead.
    pub fn get(&self) -> Option<Arc<dyn RemoteSink>> {
        let mut slot = self.state.slot.lock().unwrap();

        if let Some(cached) = &slot.cached {
            if cached.generation > self.state.disconnected.load(Ordering::Acquire) {
                return Some(cached.sink.clone());
            }
            debug!("remote service {} disconnected", self.service_name);
            slot.cached = None;
        }

        let resolver = self.resolver.as_ref()?;
        slot.next_generation += 1;
        let generation = slot.next_generation;
        let notifier = DisconnectNotifier {
            state: Arc::downgrade(&self.state),
            generation,
        };
        match resolver.resolve(&self.service_name, notifier) {
            Ok(Some(sink)) => {
                debug!("remote service {} resolved", self.service_name);
                slot.cached = Some(CachedSink {
                    generation,
                    sink: sink.clone(),
                });
                Some(sink)
            }
            Ok(None) => {
                debug!("remote service {} not found", self.service_name);
                None
            }
            Err(e) => {
                info!("failed to resolve remote service {}: {e:?}", self.service_name);
                None
            }
        }
    }

    /// Drop the cached handle, whatever its generation.
    pub fn invalidate(&self) {
        let mut slot = self.state.slot.lock().unwrap();
        slot.cached = None;
    }

    pub fn is_cached(&self) -> bool {
        let slot = self.state.slot.lock().unwrap();
        let disconnected = self.state.disconnected.load(Ordering::Acquire);
        slot.cached
            .as_ref()
            .is_some_and(|c| c.generation > disconnected)
    }
}
