//! Contract between the controller and the service that actually scans.

use tokio::sync::mpsc;

use crate::error::Result;
use crate::RemotePlayerHandle;

/// Events a provider reports during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    /// A renderer became visible
    PlayerDiscovered(RemotePlayerHandle),
    /// A previously visible renderer went away
    PlayerLost(RemotePlayerHandle),
    /// The provider hit an error; the scan keeps running
    DiscoveryFailure,
}

/// Where a provider pushes events for one scan.
///
/// Safe to use from any thread. Every event is tagged with the scan it
/// belongs to, so events pushed through the sink of an earlier scan are
/// dropped by the controller instead of leaking into the current one.
#[derive(Debug, Clone)]
pub struct DiscoverySink {
    generation: u64,
    tx: mpsc::UnboundedSender<(u64, DiscoveryEvent)>,
}

impl DiscoverySink {
    pub(crate) fn new(generation: u64, tx: mpsc::UnboundedSender<(u64, DiscoveryEvent)>) -> Self {
        Self { generation, tx }
    }

    /// Scan this sink belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn player_discovered(&self, handle: RemotePlayerHandle) {
        self.push(DiscoveryEvent::PlayerDiscovered(handle));
    }

    pub fn player_lost(&self, handle: RemotePlayerHandle) {
        self.push(DiscoveryEvent::PlayerLost(handle));
    }

    pub fn discovery_failure(&self) {
        self.push(DiscoveryEvent::DiscoveryFailure);
    }

    fn push(&self, event: DiscoveryEvent) {
        if self.tx.send((self.generation, event)).is_err() {
            tracing::trace!("discovery controller gone, dropping event from scan {}", self.generation);
        }
    }
}

/// The external discovery service.
///
/// Implementations search for renderers advertising `service_type` and report
/// what they find through the sink until `stop` is called. The wire protocol
/// is entirely theirs.
pub trait DiscoveryProvider: Send {
    /// Begin a scan. Returning an error leaves the controller idle.
    fn start(&self, service_type: &str, sink: DiscoverySink) -> Result<()>;

    /// End the current scan. Events reported afterwards are ignored.
    fn stop(&self);
}
