//! Status listeners
//!
//! A renderer reports status changes by calling the callback proxy it was
//! given, from whatever thread its transport uses. [`StatusListener`] turns
//! those calls into queued [`StatusReport`]s and runs its handlers only when
//! the owner pumps it, so handler code always runs on the caller's task.
//!
//! One listener can be registered with several sessions. Each registration
//! gets its own proxy and subscription token; when a registration is removed,
//! reports it queued are dropped instead of delivered late.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use fling_api::{MediaPlayerStatus, StatusCallback, Value};
use parking_lot::Mutex;
use tokio::sync::mpsc;

/// One status change, as delivered to handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    /// Unique id of the renderer that sent it
    pub player_id: String,
    pub status: MediaPlayerStatus,
    /// Playback position in ms when the report was made
    pub position: i64,
}

struct RawReport {
    token: u64,
    player_id: String,
    status: Value,
    position: i64,
}

#[derive(Clone)]
struct Subscription {
    token: u64,
    callback: StatusCallback,
}

/// State shared between a listener and the callback proxies it hands out.
struct Shared {
    tx: mpsc::UnboundedSender<RawReport>,
    next_token: Mutex<u64>,
    subscriptions: Mutex<HashMap<u64, Subscription>>,
}

impl Shared {
    fn is_active(&self, token: u64) -> bool {
        self.subscriptions.lock().values().any(|s| s.token == token)
    }
}

/// Weak link from a session back to a listener registered with it.
#[derive(Clone)]
pub(crate) struct ListenerLink(Weak<Shared>);

impl ListenerLink {
    /// Same as [`StatusListener::unsubscribe`]; `None` once the listener is gone.
    pub(crate) fn unsubscribe(&self, session: u64) -> Option<StatusCallback> {
        let shared = self.0.upgrade()?;
        let removed = shared.subscriptions.lock().remove(&session);
        removed.map(|s| s.callback)
    }

    pub(crate) fn points_to(&self, listener: &StatusListener) -> bool {
        std::ptr::eq(self.0.as_ptr(), Arc::as_ptr(&listener.shared))
    }
}

type Handler = Box<dyn FnMut(&StatusReport) + Send>;

/// Typed receiver of renderer status changes.
///
/// ```rust,ignore
/// let mut listener = StatusListener::new();
/// listener.on_status_change(|report| println!("{}", report.status));
/// player.add_status_listener(&listener).await?;
///
/// loop {
///     let report = listener.next().await;
///     // handlers have already run for `report`
/// }
/// ```
pub struct StatusListener {
    shared: Arc<Shared>,
    rx: mpsc::UnboundedReceiver<RawReport>,
    handlers: Vec<Handler>,
}

impl StatusListener {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            shared: Arc::new(Shared {
                tx,
                next_token: Mutex::new(0),
                subscriptions: Mutex::new(HashMap::new()),
            }),
            rx,
            handlers: Vec::new(),
        }
    }

    /// Add a handler. Handlers run in the order they were added.
    pub fn on_status_change<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&StatusReport) + Send + 'static,
    {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Number of sessions this listener is registered with.
    pub fn subscription_count(&self) -> usize {
        self.shared.subscriptions.lock().len()
    }

    /// Run handlers for every queued report without waiting. Returns how many
    /// reports were delivered.
    pub fn dispatch_pending(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(raw) = self.rx.try_recv() {
            if self.deliver(raw).is_some() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Wait for the next report, run the handlers on it and return it.
    ///
    /// Reports from removed registrations and reports that cannot be decoded
    /// are skipped. Bound the wait with a timeout when no report may come.
    pub async fn next(&mut self) -> StatusReport {
        loop {
            // `shared` holds a sender, so the channel never closes.
            let Some(raw) = self.rx.recv().await else {
                return std::future::pending().await;
            };
            if let Some(report) = self.deliver(raw) {
                return report;
            }
        }
    }

    fn deliver(&mut self, raw: RawReport) -> Option<StatusReport> {
        if !self.shared.is_active(raw.token) {
            tracing::trace!("dropping status report from removed registration on {}", raw.player_id);
            return None;
        }

        let status = match MediaPlayerStatus::from_value(&raw.status) {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!("ignoring malformed status report from {}: {}", raw.player_id, e);
                return None;
            }
        };

        let report = StatusReport {
            player_id: raw.player_id,
            status,
            position: raw.position,
        };
        for handler in self.handlers.iter_mut() {
            handler(&report);
        }
        Some(report)
    }

    /// Create the proxy for a new registration with `session`. `None` if this
    /// listener is already registered with it.
    pub(crate) fn subscribe(&self, session: u64, player_id: &str) -> Option<StatusCallback> {
        let mut subscriptions = self.shared.subscriptions.lock();
        if subscriptions.contains_key(&session) {
            return None;
        }

        let token = {
            let mut next = self.shared.next_token.lock();
            *next += 1;
            *next
        };
        let tx = self.shared.tx.clone();
        let player_id = player_id.to_string();
        let callback = StatusCallback::new(move |status, position| {
            let report = RawReport {
                token,
                player_id: player_id.clone(),
                status,
                position,
            };
            // The listener may already be gone; nobody is left to tell.
            let _ = tx.send(report);
        });

        subscriptions.insert(
            session,
            Subscription {
                token,
                callback: callback.clone(),
            },
        );
        Some(callback)
    }

    pub(crate) fn link(&self) -> ListenerLink {
        ListenerLink(Arc::downgrade(&self.shared))
    }

    /// End the registration with `session`, returning the proxy that was
    /// registered. Queued reports from it will not be delivered.
    pub(crate) fn unsubscribe(&self, session: u64) -> Option<StatusCallback> {
        self.shared
            .subscriptions
            .lock()
            .remove(&session)
            .map(|s| s.callback)
    }
}

impl Default for StatusListener {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StatusListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusListener")
            .field("handlers", &self.handlers.len())
            .field("subscriptions", &self.subscription_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn status(state: &str) -> Value {
        json!({
            "state": state,
            "condition": "Good",
            "mute": false,
            "volume": 0.5,
            "muteSet": true,
            "volumeSet": true,
        })
    }

    #[test]
    fn test_reports_wait_for_dispatch() {
        let mut listener = StatusListener::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = Arc::clone(&seen);
        listener.on_status_change(move |_| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
        });

        let callback = listener.subscribe(1, "tv").unwrap();
        callback.on_status_change(status("Playing"), 1000);
        assert_eq!(seen.load(Ordering::SeqCst), 0);

        assert_eq!(listener.dispatch_pending(), 1);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_all_handlers_run_in_order() {
        let mut listener = StatusListener::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let first = Arc::clone(&order);
        let second = Arc::clone(&order);
        listener
            .on_status_change(move |_| first.lock().push(1))
            .on_status_change(move |_| second.lock().push(2));

        listener.subscribe(1, "tv").unwrap().on_status_change(status("Paused"), 0);
        listener.dispatch_pending();

        assert_eq!(*order.lock(), vec![1, 2]);
    }

    #[test]
    fn test_unsubscribe_drops_queued_reports() {
        let mut listener = StatusListener::new();
        let callback = listener.subscribe(7, "tv").unwrap();
        callback.on_status_change(status("Playing"), 0);

        assert!(listener.unsubscribe(7).is_some());
        assert_eq!(listener.dispatch_pending(), 0);
        assert_eq!(listener.subscription_count(), 0);
    }

    #[test]
    fn test_resubscribe_ignores_old_proxy() {
        let mut listener = StatusListener::new();
        let old = listener.subscribe(1, "tv").unwrap();
        listener.unsubscribe(1);
        let new = listener.subscribe(1, "tv").unwrap();
        assert_ne!(old.id(), new.id());

        old.on_status_change(status("Playing"), 0);
        new.on_status_change(status("Paused"), 0);

        assert_eq!(listener.dispatch_pending(), 1);
    }

    #[test]
    fn test_double_subscribe_is_refused() {
        let listener = StatusListener::new();
        assert!(listener.subscribe(1, "tv").is_some());
        assert!(listener.subscribe(1, "tv").is_none());
        assert!(listener.subscribe(2, "tv").is_some());
        assert_eq!(listener.subscription_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_waits_without_reports() {
        let mut listener = StatusListener::new();
        let callback = listener.subscribe(1, "tv").unwrap();
        callback.on_status_change(status("Playing"), 0);
        listener.unsubscribe(1);

        let waited = tokio::time::timeout(std::time::Duration::from_secs(5), listener.next()).await;
        assert!(waited.is_err());
    }

    #[test]
    fn test_link_unsubscribes_while_listener_lives() {
        let mut listener = StatusListener::new();
        let link = listener.link();
        listener.subscribe(3, "tv").unwrap().on_status_change(status("Playing"), 0);

        assert!(link.unsubscribe(3).is_some());
        assert!(link.unsubscribe(3).is_none());
        assert_eq!(listener.dispatch_pending(), 0);

        drop(listener);
        assert!(link.unsubscribe(3).is_none());
    }

    #[test]
    fn test_malformed_report_is_skipped() {
        let mut listener = StatusListener::new();
        let callback = listener.subscribe(1, "tv").unwrap();
        callback.on_status_change(json!({"state": "Exploded"}), 0);
        callback.on_status_change(status("Finished"), 9000);

        assert_eq!(listener.dispatch_pending(), 1);
    }

    #[tokio::test]
    async fn test_next_returns_decoded_report() {
        let mut listener = StatusListener::new();
        let callback = listener.subscribe(1, "amzn-1").unwrap();
        std::thread::spawn(move || callback.on_status_change(status("Seeking"), 42))
            .join()
            .unwrap();

        let report = listener.next().await;
        assert_eq!(report.player_id, "amzn-1");
        assert_eq!(report.position, 42);
        assert_eq!(report.status.media_state(), fling_api::MediaState::Seeking);
    }
}
