//! FlingSystem - Main entry point for the SDK

use std::sync::Arc;

use fling_api::PlayerClient;
use fling_bridge::Bridge;
use fling_discovery::{DiscoveryController, DiscoveryListener, DiscoveryProvider, RemotePlayerHandle};

use crate::{FlingConfig, RemoteMediaPlayer, SdkError};

/// Main system entry point
///
/// Owns the transport and the configuration, and builds discovery
/// controllers and player sessions that share them.
///
/// # Example
///
/// ```rust,ignore
/// use fling_sdk::{DiscoveryCallbacks, FlingConfig, FlingSystem};
///
/// let system = FlingSystem::with_config(bridge, FlingConfig::responsive())?;
/// let mut discovery = system.discovery(provider, DiscoveryCallbacks::new());
/// discovery.start()?;
///
/// let event = discovery.dispatch_next().await;
/// for handle in discovery.players() {
///     let player = system.open_player(handle).await?;
///     player.play().await?;
/// }
/// ```
pub struct FlingSystem {
    config: FlingConfig,
    client: PlayerClient,
}

impl FlingSystem {
    /// Create a system with the default configuration
    pub fn new(bridge: Arc<dyn Bridge>) -> Result<Self, SdkError> {
        Self::with_config(bridge, FlingConfig::default())
    }

    /// Create a system with a custom configuration, validated first
    pub fn with_config(bridge: Arc<dyn Bridge>, config: FlingConfig) -> Result<Self, SdkError> {
        config.validate()?;
        let client = PlayerClient::with_resolver_config(bridge, config.resolver_config());

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &FlingConfig {
        &self.config
    }

    /// Discovery controller searching for the configured service type
    pub fn discovery<P, L>(&self, provider: P, listener: L) -> DiscoveryController<P>
    where
        P: DiscoveryProvider,
        L: DiscoveryListener + 'static,
    {
        DiscoveryController::new(provider, listener).with_service_type(self.config.service_type.clone())
    }

    /// Open a session on a discovered renderer
    ///
    /// Pushes the configured position update interval, if any, before
    /// returning the session.
    pub async fn open_player(&self, handle: &RemotePlayerHandle) -> Result<RemoteMediaPlayer, SdkError> {
        let player = RemoteMediaPlayer::new(handle.clone(), self.client.clone());
        tracing::debug!("opened session on {}", handle);

        if let Some(interval) = self.config.position_update_interval {
            let interval_ms = i64::try_from(interval.as_millis()).unwrap_or(i64::MAX);
            player.set_position_update_interval(interval_ms).await?;
        }

        Ok(player)
    }
}

impl std::fmt::Debug for FlingSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlingSystem")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
