//! Scripted discovery provider for tests.
//!
//! [`SimulatedDiscovery`] records how the controller drives it and lets a test
//! push discovery events by hand, from any thread. Clones share state.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{DiscoveryError, Result};
use crate::provider::{DiscoveryProvider, DiscoverySink};
use crate::RemotePlayerHandle;

#[derive(Default)]
struct Inner {
    sink: Mutex<Option<DiscoverySink>>,
    service_types: Mutex<Vec<String>>,
    stops: AtomicU32,
    fail_next: Mutex<Option<String>>,
}

#[derive(Clone, Default)]
pub struct SimulatedDiscovery {
    inner: Arc<Inner>,
}

impl SimulatedDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `start` fail with a provider error.
    pub fn fail_next_start(&self, reason: &str) {
        *self.inner.fail_next.lock() = Some(reason.to_string());
    }

    /// Report a renderer through the active scan, if any.
    pub fn announce(&self, handle: RemotePlayerHandle) {
        if let Some(sink) = self.current_sink() {
            sink.player_discovered(handle);
        }
    }

    /// Report a renderer as gone through the active scan, if any.
    pub fn withdraw(&self, handle: RemotePlayerHandle) {
        if let Some(sink) = self.current_sink() {
            sink.player_lost(handle);
        }
    }

    pub fn report_failure(&self) {
        if let Some(sink) = self.current_sink() {
            sink.discovery_failure();
        }
    }

    /// Sink of the active scan. Tests keep it to push events after a restart.
    pub fn current_sink(&self) -> Option<DiscoverySink> {
        self.inner.sink.lock().clone()
    }

    pub fn is_active(&self) -> bool {
        self.inner.sink.lock().is_some()
    }

    pub fn start_count(&self) -> usize {
        self.inner.service_types.lock().len()
    }

    /// Service types passed to each successful `start`, in order.
    pub fn service_types(&self) -> Vec<String> {
        self.inner.service_types.lock().clone()
    }

    pub fn stop_count(&self) -> u32 {
        self.inner.stops.load(Ordering::SeqCst)
    }
}

impl DiscoveryProvider for SimulatedDiscovery {
    fn start(&self, service_type: &str, sink: DiscoverySink) -> Result<()> {
        if let Some(reason) = self.inner.fail_next.lock().take() {
            return Err(DiscoveryError::Provider(reason));
        }
        self.inner.service_types.lock().push(service_type.to_string());
        *self.inner.sink.lock() = Some(sink);
        Ok(())
    }

    fn stop(&self) {
        self.inner.stops.fetch_add(1, Ordering::SeqCst);
        *self.inner.sink.lock() = None;
    }
}
