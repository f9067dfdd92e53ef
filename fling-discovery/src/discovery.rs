//! Discovery controller: scan lifecycle and event delivery.
//!
//! Providers push events from their own threads into a channel. Nothing
//! reaches the listener until the caller pumps the controller with
//! [`DiscoveryController::dispatch_pending`] or
//! [`DiscoveryController::dispatch_next`], so listener code always runs on the
//! caller's own task.
//!
//! Before delivery each event is checked against the current scan:
//! 1. events tagged with an older scan generation are dropped,
//! 2. `discovered` for an id that is already visible is suppressed,
//! 3. `lost` for an id that is not visible is suppressed.

use std::fmt;

use tokio::sync::mpsc;

use crate::error::{DiscoveryError, Result};
use crate::listener::DiscoveryListener;
use crate::provider::{DiscoveryEvent, DiscoveryProvider, DiscoverySink};
use crate::RemotePlayerHandle;

/// Service token advertised by Fling renderers.
pub const DEFAULT_SERVICE_TYPE: &str = "amzn.thin.pl";

/// Scan lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    Idle,
    Scanning,
}

/// Drives a [`DiscoveryProvider`] and delivers its events to a listener.
pub struct DiscoveryController<P: DiscoveryProvider> {
    provider: P,
    listener: Box<dyn DiscoveryListener>,
    service_type: String,
    state: DiscoveryState,
    generation: u64,
    tx: mpsc::UnboundedSender<(u64, DiscoveryEvent)>,
    rx: mpsc::UnboundedReceiver<(u64, DiscoveryEvent)>,
    players: Vec<RemotePlayerHandle>,
}

impl<P: DiscoveryProvider> DiscoveryController<P> {
    pub fn new<L>(provider: P, listener: L) -> Self
    where
        L: DiscoveryListener + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            provider,
            listener: Box::new(listener),
            service_type: DEFAULT_SERVICE_TYPE.to_string(),
            state: DiscoveryState::Idle,
            generation: 0,
            tx,
            rx,
            players: Vec::new(),
        }
    }

    /// Search for a different service token. Takes effect on the next `start`.
    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = service_type.into();
        self
    }

    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    pub fn state(&self) -> DiscoveryState {
        self.state
    }

    pub fn is_scanning(&self) -> bool {
        self.state == DiscoveryState::Scanning
    }

    /// Renderers visible in the current scan, in discovery order.
    pub fn players(&self) -> &[RemotePlayerHandle] {
        &self.players
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Begin a new scan.
    ///
    /// Fails with [`DiscoveryError::AlreadyScanning`] if a scan is running.
    /// Players seen in earlier scans are forgotten, and anything still queued
    /// from them is discarded.
    pub fn start(&mut self) -> Result<()> {
        if self.is_scanning() {
            return Err(DiscoveryError::AlreadyScanning);
        }

        self.generation += 1;
        self.players.clear();
        let sink = DiscoverySink::new(self.generation, self.tx.clone());

        self.provider.start(&self.service_type, sink)?;
        self.state = DiscoveryState::Scanning;
        tracing::debug!("discovery scan {} started for '{}'", self.generation, self.service_type);
        Ok(())
    }

    /// End the current scan. A no-op when idle.
    pub fn stop(&mut self) {
        if !self.is_scanning() {
            return;
        }
        self.provider.stop();
        self.state = DiscoveryState::Idle;
        // Invalidate anything still queued for the scan that just ended.
        self.generation += 1;
        tracing::debug!("discovery stopped");
    }

    /// Deliver every queued event without waiting. Returns how many reached
    /// the listener.
    pub fn dispatch_pending(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok((generation, event)) = self.rx.try_recv() {
            if self.deliver(generation, event).is_some() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Wait for the next event that reaches the listener, and return it.
    ///
    /// Dropped and suppressed events are skipped. While idle nothing new
    /// arrives, so wrap this in a timeout if the scan may have been stopped.
    pub async fn dispatch_next(&mut self) -> DiscoveryEvent {
        loop {
            // The controller holds a sender, so the channel never closes.
            let Some((generation, event)) = self.rx.recv().await else {
                return std::future::pending().await;
            };
            if let Some(delivered) = self.deliver(generation, event) {
                return delivered;
            }
        }
    }

    fn deliver(&mut self, generation: u64, event: DiscoveryEvent) -> Option<DiscoveryEvent> {
        if generation != self.generation || !self.is_scanning() {
            tracing::trace!("dropping stale discovery event from scan {}", generation);
            return None;
        }

        match &event {
            DiscoveryEvent::PlayerDiscovered(handle) => {
                if self.players.iter().any(|p| p.unique_id() == handle.unique_id()) {
                    tracing::trace!("suppressing duplicate discovery of {}", handle);
                    return None;
                }
                tracing::info!("discovered player {}", handle);
                self.players.push(handle.clone());
                self.listener.on_player_discovered(handle);
            }
            DiscoveryEvent::PlayerLost(handle) => {
                let index = match self.players.iter().position(|p| p.unique_id() == handle.unique_id()) {
                    Some(index) => index,
                    None => {
                        tracing::trace!("suppressing loss of unknown player {}", handle);
                        return None;
                    }
                };
                tracing::info!("lost player {}", handle);
                self.players.remove(index);
                self.listener.on_player_lost(handle);
            }
            DiscoveryEvent::DiscoveryFailure => {
                tracing::warn!("discovery provider reported a failure");
                self.listener.on_discovery_failure();
            }
        }
        Some(event)
    }
}

impl<P: DiscoveryProvider> Drop for DiscoveryController<P> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<P: DiscoveryProvider> fmt::Debug for DiscoveryController<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveryController")
            .field("service_type", &self.service_type)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("players", &self.players)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedDiscovery;
    use crate::DiscoveryCallbacks;
    use fling_bridge::ObjectRef;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn handle(id: &str, name: &str) -> RemotePlayerHandle {
        RemotePlayerHandle::new(ObjectRef::new(id), name, id)
    }

    fn recording() -> (DiscoveryCallbacks, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let found = Arc::clone(&log);
        let lost = Arc::clone(&log);
        let failed = Arc::clone(&log);
        let callbacks = DiscoveryCallbacks::new()
            .on_player_discovered(move |p| found.lock().push(format!("+{}", p.name())))
            .on_player_lost(move |p| lost.lock().push(format!("-{}", p.name())))
            .on_discovery_failure(move || failed.lock().push("!".to_string()));
        (callbacks, log)
    }

    #[test]
    fn test_default_service_type() {
        let (callbacks, _) = recording();
        let controller = DiscoveryController::new(SimulatedDiscovery::new(), callbacks);
        assert_eq!(controller.service_type(), "amzn.thin.pl");
        assert_eq!(controller.state(), DiscoveryState::Idle);
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let provider = SimulatedDiscovery::new();
        let (callbacks, _) = recording();
        let mut controller = DiscoveryController::new(provider.clone(), callbacks);

        controller.start().unwrap();
        assert_eq!(controller.start(), Err(DiscoveryError::AlreadyScanning));
        assert_eq!(provider.start_count(), 1);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let provider = SimulatedDiscovery::new();
        let (callbacks, _) = recording();
        let mut controller = DiscoveryController::new(provider.clone(), callbacks);

        controller.stop();
        assert_eq!(provider.stop_count(), 0);
        assert_eq!(controller.state(), DiscoveryState::Idle);
    }

    #[test]
    fn test_provider_error_leaves_controller_idle() {
        let provider = SimulatedDiscovery::new();
        provider.fail_next_start("radio off");
        let (callbacks, _) = recording();
        let mut controller = DiscoveryController::new(provider, callbacks);

        assert_eq!(
            controller.start(),
            Err(DiscoveryError::Provider("radio off".to_string()))
        );
        assert!(!controller.is_scanning());
    }

    #[test]
    fn test_events_wait_for_pump() {
        let provider = SimulatedDiscovery::new();
        let (callbacks, log) = recording();
        let mut controller = DiscoveryController::new(provider.clone(), callbacks);
        controller.start().unwrap();

        provider.announce(handle("tv-1", "LivingRoomTV"));
        assert!(log.lock().is_empty());

        assert_eq!(controller.dispatch_pending(), 1);
        assert_eq!(*log.lock(), vec!["+LivingRoomTV"]);
    }

    #[test]
    fn test_duplicates_and_unknown_losses_are_suppressed() {
        let provider = SimulatedDiscovery::new();
        let (callbacks, log) = recording();
        let mut controller = DiscoveryController::new(provider.clone(), callbacks);
        controller.start().unwrap();

        provider.announce(handle("tv-1", "LivingRoomTV"));
        provider.announce(handle("tv-1", "LivingRoomTV"));
        provider.withdraw(handle("tv-9", "Ghost"));
        provider.withdraw(handle("tv-1", "LivingRoomTV"));
        provider.report_failure();

        assert_eq!(controller.dispatch_pending(), 3);
        assert_eq!(*log.lock(), vec!["+LivingRoomTV", "-LivingRoomTV", "!"]);
        assert!(controller.players().is_empty());
        assert!(controller.is_scanning());
    }

    #[test]
    fn test_events_queued_at_stop_are_discarded() {
        let provider = SimulatedDiscovery::new();
        let (callbacks, log) = recording();
        let mut controller = DiscoveryController::new(provider.clone(), callbacks);
        controller.start().unwrap();

        provider.announce(handle("tv-1", "LivingRoomTV"));
        controller.stop();

        assert_eq!(controller.dispatch_pending(), 0);
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_next_skips_suppressed_events() {
        let provider = SimulatedDiscovery::new();
        let (callbacks, _) = recording();
        let mut controller = DiscoveryController::new(provider.clone(), callbacks);
        controller.start().unwrap();

        provider.withdraw(handle("tv-9", "Ghost"));
        provider.announce(handle("tv-1", "LivingRoomTV"));

        let event = controller.dispatch_next().await;
        assert_eq!(event, DiscoveryEvent::PlayerDiscovered(handle("tv-1", "LivingRoomTV")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_next_waits_while_idle() {
        let provider = SimulatedDiscovery::new();
        let (callbacks, _) = recording();
        let mut controller = DiscoveryController::new(provider.clone(), callbacks);
        controller.start().unwrap();
        provider.announce(handle("tv-1", "LivingRoomTV"));
        controller.stop();

        let waited =
            tokio::time::timeout(std::time::Duration::from_secs(5), controller.dispatch_next()).await;
        assert!(waited.is_err());
    }

    #[test]
    fn test_drop_stops_provider() {
        let provider = SimulatedDiscovery::new();
        let (callbacks, _) = recording();
        {
            let mut controller = DiscoveryController::new(provider.clone(), callbacks);
            controller.start().unwrap();
        }
        assert_eq!(provider.stop_count(), 1);
        assert!(!provider.is_active());
    }
}
