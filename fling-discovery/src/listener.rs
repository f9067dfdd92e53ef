//! Receivers of discovery events

use crate::RemotePlayerHandle;

/// Typed receiver for discovery events.
///
/// Methods run on whichever task pumps the controller, never on the
/// provider's thread. Every method has an empty default.
pub trait DiscoveryListener: Send {
    fn on_player_discovered(&mut self, _player: &RemotePlayerHandle) {}

    fn on_player_lost(&mut self, _player: &RemotePlayerHandle) {}

    fn on_discovery_failure(&mut self) {}
}

type PlayerFn = Box<dyn FnMut(&RemotePlayerHandle) + Send>;
type FailureFn = Box<dyn FnMut() + Send>;

/// Closure-based [`DiscoveryListener`].
///
/// ```rust,ignore
/// let listener = DiscoveryCallbacks::new()
///     .on_player_discovered(|p| println!("found {}", p.name()))
///     .on_player_lost(|p| println!("lost {}", p.name()));
/// ```
#[derive(Default)]
pub struct DiscoveryCallbacks {
    discovered: Option<PlayerFn>,
    lost: Option<PlayerFn>,
    failure: Option<FailureFn>,
}

impl DiscoveryCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_player_discovered<F>(mut self, f: F) -> Self
    where
        F: FnMut(&RemotePlayerHandle) + Send + 'static,
    {
        self.discovered = Some(Box::new(f));
        self
    }

    pub fn on_player_lost<F>(mut self, f: F) -> Self
    where
        F: FnMut(&RemotePlayerHandle) + Send + 'static,
    {
        self.lost = Some(Box::new(f));
        self
    }

    pub fn on_discovery_failure<F>(mut self, f: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.failure = Some(Box::new(f));
        self
    }
}

impl DiscoveryListener for DiscoveryCallbacks {
    fn on_player_discovered(&mut self, player: &RemotePlayerHandle) {
        if let Some(f) = self.discovered.as_mut() {
            f(player);
        }
    }

    fn on_player_lost(&mut self, player: &RemotePlayerHandle) {
        if let Some(f) = self.lost.as_mut() {
            f(player);
        }
    }

    fn on_discovery_failure(&mut self) {
        if let Some(f) = self.failure.as_mut() {
            f();
        }
    }
}
