//! # Fling SDK - remote media player control
//!
//! Discover Fling renderers on the local network and drive them from async
//! Rust:
//!
//! ```rust,ignore
//! use fling_sdk::{DiscoveryCallbacks, FlingSystem, SeekMode, StatusListener};
//!
//! let system = FlingSystem::new(bridge)?;
//! let mut discovery = system.discovery(provider, DiscoveryCallbacks::new());
//! discovery.start()?;
//! discovery.dispatch_next().await;
//!
//! let player = system.open_player(&discovery.players()[0]).await?;
//! player.set_media_source("http://media.local/movie.mp4", "Movie", true, false).await?;
//!
//! let mut listener = StatusListener::new();
//! listener.on_status_change(|report| println!("{}", report.status));
//! player.add_status_listener(&listener).await?;
//!
//! player.seek(SeekMode::Relative, 30_000).await?;
//! listener.next().await;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! fling-sdk (sessions, listeners, config, logging)
//!     ↓
//! fling-discovery (scan lifecycle)   fling-api (typed operations, resolver, model)
//!     ↓                                  ↓
//! fling-bridge (transport contract)
//! ```
//!
//! The transport itself is supplied by the host through
//! [`fling_bridge::Bridge`]; the discovery service through
//! [`DiscoveryProvider`].

pub use config::FlingConfig;
pub use error::SdkError;
pub use listener::{StatusListener, StatusReport};
pub use player::RemoteMediaPlayer;
pub use system::FlingSystem;

// Re-export commonly used types from the lower crates
pub use fling_api::{
    ApiError, MediaCondition, MediaPlayerInfo, MediaPlayerStatus, MediaState, SeekMode,
};
pub use fling_discovery::{
    DiscoveryCallbacks, DiscoveryController, DiscoveryError, DiscoveryEvent, DiscoveryListener,
    DiscoveryProvider, DiscoveryState, RemotePlayerHandle,
};

pub mod logging;

mod config;
mod error;
mod listener;
mod player;
mod system;
