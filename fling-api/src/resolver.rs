//! Future resolution for pending remote operations.
//!
//! The renderer signals completion only through a handle that must be polled.
//! [`PendingResult`] hosts that polling loop on the tokio timer so the calling
//! task is suspended between polls instead of blocking a thread.
//!
//! # Cancellation
//!
//! Renderers expose no cancellation. Wrapping a resolution in a timeout, or
//! dropping the future, stops the polling and nothing more: the remote
//! operation may still complete without anyone observing it. No task is
//! spawned, so an abandoned resolution leaves nothing behind.

use std::fmt;
use std::time::Duration;

use fling_bridge::{PendingHandle, Reply, Value};

use crate::error::{ApiError, Result};

/// Default interval between two `is_done` polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Shortest interval a resolution will poll at. Shorter intervals are raised
/// to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Polling configuration for resolving pending operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Interval between two `is_done` polls
    /// Default: 100 ms
    pub poll_interval: Duration,

    /// Ceiling applied to every resolution
    /// Default: none (wait indefinitely)
    pub timeout: Option<Duration>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the configuration and return any issue
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.poll_interval.is_zero() {
            return Err("Poll interval must be greater than 0".to_string());
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err("Timeout must be greater than 0 when set".to_string());
        }
        Ok(())
    }
}

/// A remote operation that has not completed yet.
///
/// Resolving consumes the value, so one handle resolves at most once.
pub struct PendingResult {
    handle: Box<dyn PendingHandle>,
    poll_interval: Duration,
    label: &'static str,
}

impl PendingResult {
    /// Wrap `handle`. A `poll_interval` below [`MIN_POLL_INTERVAL`] is raised
    /// to it.
    pub fn new(handle: Box<dyn PendingHandle>, poll_interval: Duration) -> Self {
        Self {
            handle,
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
            label: "pending",
        }
    }

    /// Name used in trace output, usually the remote method.
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// Poll until the renderer reports completion, then fetch the value.
    ///
    /// Polls `is_done` once per `poll_interval` and never again after it first
    /// returns `true`. A failing accessor ends the loop with the mapped error,
    /// which is [`ApiError::Disconnected`] when the renderer went away.
    pub async fn resolve(self) -> Result<Value> {
        let mut polls: u64 = 0;
        loop {
            polls += 1;
            if self.handle.is_done()? {
                tracing::trace!("{} done after {} poll(s)", self.label, polls);
                let value = self.handle.get()?;
                return Ok(value);
            }
            tracing::trace!("{} waiting (poll {})", self.label, polls);
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Like [`PendingResult::resolve`], giving up with [`ApiError::Timeout`]
    /// once `timeout` has elapsed.
    pub async fn resolve_with_timeout(self, timeout: Duration) -> Result<Value> {
        let label = self.label;
        match tokio::time::timeout(timeout, self.resolve()).await {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!("{} abandoned after {:?}", label, timeout);
                Err(ApiError::Timeout(timeout))
            }
        }
    }
}

impl fmt::Debug for PendingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingResult")
            .field("label", &self.label)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

/// Suspend until `handle` completes, polling every `poll_interval`.
pub async fn await_completion(handle: Box<dyn PendingHandle>, poll_interval: Duration) -> Result<Value> {
    PendingResult::new(handle, poll_interval).resolve().await
}

/// Turns bridge replies into values according to a [`ResolverConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a bridge reply: immediate values pass through, pending handles
    /// are polled, with the configured timeout if any.
    pub async fn resolve(&self, reply: Reply, label: &'static str) -> Result<Value> {
        match reply {
            Reply::Value(value) => Ok(value),
            Reply::Pending(handle) => {
                let pending = PendingResult::new(handle, self.config.poll_interval).with_label(label);
                match self.config.timeout {
                    Some(timeout) => pending.resolve_with_timeout(timeout).await,
                    None => pending.resolve().await,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fling_bridge::BridgeError;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Arc;

    /// Handle that reports done on its `done_after`-th poll.
    struct CountingHandle {
        done_after: u32,
        polls: Arc<AtomicU32>,
        gets: Arc<AtomicU32>,
        connected: Arc<AtomicBool>,
        value: Value,
    }

    impl CountingHandle {
        fn new(done_after: u32, value: Value) -> (Self, Arc<AtomicU32>, Arc<AtomicU32>, Arc<AtomicBool>) {
            let polls = Arc::new(AtomicU32::new(0));
            let gets = Arc::new(AtomicU32::new(0));
            let connected = Arc::new(AtomicBool::new(true));
            let handle = Self {
                done_after,
                polls: Arc::clone(&polls),
                gets: Arc::clone(&gets),
                connected: Arc::clone(&connected),
                value,
            };
            (handle, polls, gets, connected)
        }
    }

    impl PendingHandle for CountingHandle {
        fn is_done(&self) -> fling_bridge::Result<bool> {
            if !self.connected.load(Ordering::SeqCst) {
                return Err(BridgeError::Disconnected);
            }
            let n = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(n >= self.done_after)
        }

        fn get(&self) -> fling_bridge::Result<Value> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            Ok(self.value.clone())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_exactly_until_done() {
        let (handle, polls, gets, _) = CountingHandle::new(5, json!("0.5"));

        let value = await_completion(Box::new(handle), DEFAULT_POLL_INTERVAL).await.unwrap();

        assert_eq!(value, json!("0.5"));
        assert_eq!(polls.load(Ordering::SeqCst), 5);
        assert_eq!(gets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_done_polls_once() {
        let (handle, polls, gets, _) = CountingHandle::new(1, json!(null));

        await_completion(Box::new(handle), DEFAULT_POLL_INTERVAL).await.unwrap();

        assert_eq!(polls.load(Ordering::SeqCst), 1);
        assert_eq!(gets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_one_interval_between_polls() {
        let (handle, _, _, _) = CountingHandle::new(4, json!(1));
        let interval = Duration::from_millis(250);
        let start = tokio::time::Instant::now();

        await_completion(Box::new(handle), interval).await.unwrap();

        // Three sleeps separate four polls.
        assert_eq!(start.elapsed(), interval * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_raised_to_minimum() {
        let (handle, polls, _, _) = CountingHandle::new(4, json!(1));
        let start = tokio::time::Instant::now();

        await_completion(Box::new(handle), Duration::ZERO).await.unwrap();

        assert_eq!(polls.load(Ordering::SeqCst), 4);
        assert_eq!(start.elapsed(), MIN_POLL_INTERVAL * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_stops_polling() {
        let (handle, polls, gets, _) = CountingHandle::new(u32::MAX, json!(1));
        let pending = PendingResult::new(Box::new(handle), Duration::from_millis(100));

        let err = pending
            .resolve_with_timeout(Duration::from_millis(450))
            .await
            .unwrap_err();

        assert_eq!(err, ApiError::Timeout(Duration::from_millis(450)));
        let polled = polls.load(Ordering::SeqCst);
        assert_eq!(polled, 5);
        assert_eq!(gets.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(polls.load(Ordering::SeqCst), polled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_mid_poll() {
        let (handle, polls, _, connected) = CountingHandle::new(u32::MAX, json!(1));
        let pending = PendingResult::new(Box::new(handle), Duration::from_millis(100));

        let task = tokio::spawn(pending.resolve());
        tokio::time::sleep(Duration::from_millis(350)).await;
        connected.store(false, Ordering::SeqCst);

        let result = task.await.unwrap();
        assert_eq!(result, Err(ApiError::Disconnected));
        assert!(polls.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolver_applies_configured_timeout() {
        let (handle, _, _, _) = CountingHandle::new(u32::MAX, json!(1));
        let resolver = Resolver::new(
            ResolverConfig::new().with_timeout(Some(Duration::from_secs(2))),
        );

        let err = resolver
            .resolve(Reply::Pending(Box::new(handle)), "getVolume")
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Timeout(Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn test_resolver_passes_immediate_values() {
        let resolver = Resolver::default();
        let value = resolver.resolve(Reply::Value(json!("TV")), "getName").await.unwrap();
        assert_eq!(value, json!("TV"));
    }

    #[test]
    fn test_config_validation() {
        assert!(ResolverConfig::default().validate().is_ok());
        assert!(ResolverConfig::new()
            .with_poll_interval(Duration::ZERO)
            .validate()
            .is_err());
        assert!(ResolverConfig::new()
            .with_timeout(Some(Duration::ZERO))
            .validate()
            .is_err());
    }
}
