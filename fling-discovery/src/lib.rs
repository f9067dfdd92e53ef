//! Fling remote player discovery
//!
//! This crate finds Fling renderers through a pluggable [`DiscoveryProvider`]
//! (the platform's discovery service) and reports them as
//! [`RemotePlayerHandle`]s to a [`DiscoveryListener`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fling_discovery::{DiscoveryCallbacks, DiscoveryController};
//!
//! let listener = DiscoveryCallbacks::new()
//!     .on_player_discovered(|player| println!("Found {}", player.name()))
//!     .on_player_lost(|player| println!("Lost {}", player.name()));
//!
//! let mut discovery = DiscoveryController::new(provider, listener);
//! discovery.start()?;
//!
//! // Events are delivered only when pumped, on the caller's task.
//! loop {
//!     let event = discovery.dispatch_next().await;
//!     // ...
//! }
//! ```

mod discovery;
mod error;
mod handle;
mod listener;
mod provider;

#[cfg(any(test, feature = "test-support"))]
pub mod sim;

pub use discovery::{DiscoveryController, DiscoveryState, DEFAULT_SERVICE_TYPE};
pub use error::{DiscoveryError, Result};
pub use handle::RemotePlayerHandle;
pub use listener::{DiscoveryCallbacks, DiscoveryListener};
pub use provider::{DiscoveryEvent, DiscoveryProvider, DiscoverySink};
