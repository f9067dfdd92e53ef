//! Typed callback proxies handed to the renderer

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;

static NEXT_CALLBACK_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a callback proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(u64);

impl CallbackId {
    fn next() -> Self {
        Self(NEXT_CALLBACK_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "callback-{}", self.0)
    }
}

type StatusFn = dyn Fn(Value, i64) + Send + Sync;

/// Status listener proxy the renderer calls when its status changes.
///
/// The renderer may call [`StatusCallback::on_status_change`] from any thread.
/// Clones share the same identity, so the renderer can match a later
/// `removeStatusListener` against the proxy it was given on registration.
#[derive(Clone)]
pub struct StatusCallback {
    id: CallbackId,
    sink: Arc<StatusFn>,
}

impl StatusCallback {
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(Value, i64) + Send + Sync + 'static,
    {
        Self {
            id: CallbackId::next(),
            sink: Arc::new(sink),
        }
    }

    pub fn id(&self) -> CallbackId {
        self.id
    }

    /// Report a raw status object and the playback position (ms) at report time.
    pub fn on_status_change(&self, status: Value, position: i64) {
        tracing::trace!("{} <- status report at {}ms", self.id, position);
        (self.sink)(status, position);
    }
}

impl PartialEq for StatusCallback {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for StatusCallback {}

impl fmt::Debug for StatusCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusCallback").field("id", &self.id).finish()
    }
}
