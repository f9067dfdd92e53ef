//! Remote player session
//!
//! Provides a typed handle on one discovered renderer.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use fling_api::operations::*;
use fling_api::{
    ApiError, MediaPlayerInfo, MediaPlayerStatus, PlayerClient, PlayerOperation, Result, SeekMode,
};
use fling_discovery::RemotePlayerHandle;
use parking_lot::Mutex;

use crate::listener::{ListenerLink, StatusListener};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Session on one remote renderer.
///
/// Every command and query suspends the calling task until the renderer
/// answers. Once any call reports [`ApiError::Disconnected`] the session is
/// dead: later calls fail immediately with the same error and nothing tries to
/// reconnect. Open a new session from a fresh discovery handle instead.
///
/// Calls may be issued concurrently, but their completions carry no ordering
/// promise relative to each other.
///
/// Dropping a session ends every status listener registration it still holds
/// and asks the renderer to release the proxies, without waiting for it.
///
/// # Example
///
/// ```rust,ignore
/// let player = system.open_player(&handle).await?;
/// player.set_media_source("http://media.local/movie.mp4", "Movie", true, false).await?;
/// println!("{}", player.status().await?);
/// ```
pub struct RemoteMediaPlayer {
    session: u64,
    handle: RemotePlayerHandle,
    client: PlayerClient,
    last_status: Mutex<Option<MediaPlayerStatus>>,
    disconnected: AtomicBool,
    registrations: Mutex<Vec<ListenerLink>>,
}

impl RemoteMediaPlayer {
    pub fn new(handle: RemotePlayerHandle, client: PlayerClient) -> Self {
        Self {
            session: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            handle,
            client,
            last_status: Mutex::new(None),
            disconnected: AtomicBool::new(false),
            registrations: Mutex::new(Vec::new()),
        }
    }

    /// Friendly name of the renderer
    pub fn name(&self) -> &str {
        self.handle.name()
    }

    pub fn unique_id(&self) -> &str {
        self.handle.unique_id()
    }

    pub fn handle(&self) -> &RemotePlayerHandle {
        &self.handle
    }

    /// Whether a call on this session has reported the renderer gone.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::SeqCst)
    }

    /// Most recent status this session has fetched, if any.
    pub fn cached_status(&self) -> Option<MediaPlayerStatus> {
        *self.last_status.lock()
    }

    async fn call<Op: PlayerOperation>(&self, request: Op::Request) -> Result<Op::Response> {
        if self.is_disconnected() {
            return Err(ApiError::Disconnected);
        }

        let result = self.client.execute::<Op>(self.handle.object(), &request).await;
        match &result {
            Ok(_) => tracing::debug!("{} {} ok", self.handle, Op::METHOD),
            Err(ApiError::Disconnected) => {
                if !self.disconnected.swap(true, Ordering::SeqCst) {
                    tracing::warn!("{} disconnected during {}", self.handle, Op::METHOD);
                }
            }
            Err(e) => tracing::debug!("{} {} failed: {}", self.handle, Op::METHOD, e),
        }
        result
    }

    /// Status used to decide volume/mute support. Always fetched fresh, since
    /// a renderer may stop reporting volume or mute at any point.
    async fn capabilities(&self) -> Result<MediaPlayerStatus> {
        self.status().await
    }

    // ========================================================================
    // Audio
    // ========================================================================

    /// Current volume.
    ///
    /// Fails with [`ApiError::UnsupportedOperation`] if the renderer does not
    /// report volume.
    pub async fn volume(&self) -> Result<f64> {
        if !self.capabilities().await?.is_volume_set() {
            return Err(ApiError::UnsupportedOperation("volume".to_string()));
        }
        self.call::<GetVolumeOperation>(GetVolumeOperationRequest {}).await
    }

    pub async fn set_volume(&self, volume: f64) -> Result<()> {
        if !self.capabilities().await?.is_volume_set() {
            return Err(ApiError::UnsupportedOperation("setVolume".to_string()));
        }
        self.call::<SetVolumeOperation>(SetVolumeOperationRequest { volume })
            .await
    }

    /// Current mute state.
    ///
    /// Fails with [`ApiError::UnsupportedOperation`] if the renderer does not
    /// report mute.
    pub async fn is_mute(&self) -> Result<bool> {
        if !self.capabilities().await?.is_mute_set() {
            return Err(ApiError::UnsupportedOperation("isMute".to_string()));
        }
        self.call::<IsMuteOperation>(IsMuteOperationRequest {}).await
    }

    pub async fn set_mute(&self, mute: bool) -> Result<()> {
        if !self.capabilities().await?.is_mute_set() {
            return Err(ApiError::UnsupportedOperation("setMute".to_string()));
        }
        self.call::<SetMuteOperation>(SetMuteOperationRequest { mute }).await
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Playback position in ms
    pub async fn position(&self) -> Result<i64> {
        self.call::<GetPositionOperation>(GetPositionOperationRequest {})
            .await
    }

    /// Duration of the loaded media in ms
    pub async fn duration(&self) -> Result<i64> {
        self.call::<GetDurationOperation>(GetDurationOperationRequest {})
            .await
    }

    /// Fresh status snapshot. Also refreshes the cached capabilities.
    pub async fn status(&self) -> Result<MediaPlayerStatus> {
        let status = self
            .call::<GetStatusOperation>(GetStatusOperationRequest {})
            .await?;
        *self.last_status.lock() = Some(status);
        Ok(status)
    }

    pub async fn media_info(&self) -> Result<MediaPlayerInfo> {
        self.call::<GetMediaInfoOperation>(GetMediaInfoOperationRequest {})
            .await
    }

    pub async fn is_mime_type_supported(&self, mime_type: &str) -> Result<bool> {
        self.call::<IsMimeTypeSupportedOperation>(IsMimeTypeSupportedOperationRequest {
            mime_type: mime_type.to_string(),
        })
        .await
    }

    // ========================================================================
    // Playback
    // ========================================================================

    pub async fn play(&self) -> Result<()> {
        self.call::<PlayOperation>(PlayOperationRequest {}).await
    }

    pub async fn pause(&self) -> Result<()> {
        self.call::<PauseOperation>(PauseOperationRequest {}).await
    }

    pub async fn stop(&self) -> Result<()> {
        self.call::<StopOperation>(StopOperationRequest {}).await
    }

    /// Seek within the loaded media.
    ///
    /// `mode` and `delta` reach the renderer exactly as given. For
    /// [`SeekMode::Absolute`] the renderer expects `0 <= delta < duration`;
    /// out-of-range values are not checked here and whatever the renderer
    /// does with them is the result.
    pub async fn seek(&self, mode: SeekMode, delta: i64) -> Result<()> {
        self.call::<SeekOperation>(SeekOperationRequest { mode, delta })
            .await
    }

    /// Load a media URL on the renderer.
    pub async fn set_media_source(
        &self,
        url: &str,
        title: &str,
        auto_play: bool,
        play_in_background: bool,
    ) -> Result<()> {
        self.call::<SetMediaSourceOperation>(SetMediaSourceOperationRequest {
            url: url.to_string(),
            title: title.to_string(),
            auto_play,
            play_in_background,
        })
        .await
    }

    pub async fn set_player_style(&self, style: &str) -> Result<()> {
        self.call::<SetPlayerStyleOperation>(SetPlayerStyleOperationRequest {
            style: style.to_string(),
        })
        .await
    }

    /// How often, in ms, the renderer reports position changes to listeners.
    pub async fn set_position_update_interval(&self, interval_ms: i64) -> Result<()> {
        self.call::<SetPositionUpdateIntervalOperation>(SetPositionUpdateIntervalOperationRequest {
            interval_ms,
        })
        .await
    }

    /// Send a free-form command string to the renderer.
    pub async fn send_command(&self, command: &str) -> Result<()> {
        self.call::<SendCommandOperation>(SendCommandOperationRequest {
            command: command.to_string(),
        })
        .await
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Register `listener` for this renderer's status changes.
    ///
    /// Registering the same listener twice on one session is a no-op.
    pub async fn add_status_listener(&self, listener: &StatusListener) -> Result<()> {
        let callback = match listener.subscribe(self.session, self.unique_id()) {
            Some(callback) => callback,
            None => return Ok(()),
        };

        let result = self
            .call::<AddStatusListenerOperation>(AddStatusListenerOperationRequest { callback })
            .await;
        match &result {
            Ok(()) => self.registrations.lock().push(listener.link()),
            Err(_) => {
                listener.unsubscribe(self.session);
            }
        }
        result
    }

    /// Unregister `listener`. Reports it has queued from this session are
    /// dropped. A no-op if it was not registered here.
    pub async fn remove_status_listener(&self, listener: &StatusListener) -> Result<()> {
        self.registrations.lock().retain(|link| !link.points_to(listener));
        match listener.unsubscribe(self.session) {
            Some(callback) => {
                self.call::<RemoveStatusListenerOperation>(RemoveStatusListenerOperationRequest {
                    callback,
                })
                .await
            }
            None => Ok(()),
        }
    }
}

impl Drop for RemoteMediaPlayer {
    fn drop(&mut self) {
        let links = std::mem::take(self.registrations.get_mut());
        for link in links {
            let Some(callback) = link.unsubscribe(self.session) else {
                continue;
            };
            if self.is_disconnected() {
                continue;
            }
            let request = RemoveStatusListenerOperationRequest { callback };
            if let Err(e) = self
                .client
                .execute_detached::<RemoveStatusListenerOperation>(self.handle.object(), &request)
            {
                tracing::debug!("{} listener release on drop failed: {}", self.handle, e);
            }
        }
    }
}

impl fmt::Debug for RemoteMediaPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteMediaPlayer")
            .field("handle", &self.handle)
            .field("disconnected", &self.is_disconnected())
            .finish_non_exhaustive()
    }
}
