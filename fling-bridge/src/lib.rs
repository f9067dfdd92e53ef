//! Private transport contract for remote player communication
//!
//! This crate describes the minimal surface the rest of fling-sdk needs from
//! whatever carries calls to a Fling renderer: invoke a method on a remote
//! object, get back either an immediate value or a pending handle that is
//! polled until done, and hand the renderer typed callback proxies for
//! unsolicited status reports.
//!
//! The concrete transport (a platform bridge, a test double, ...) lives
//! outside this crate. Enable the `test-support` feature for [`sim`], a
//! scripted in-memory renderer used by the workspace tests.

mod callback;
mod error;

#[cfg(any(test, feature = "test-support"))]
pub mod sim;

pub use callback::{CallbackId, StatusCallback};
pub use error::BridgeError;
pub use serde_json::Value;

use std::fmt;
use std::sync::Arc;

/// Convenience Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Opaque reference to an object living on the far side of the bridge.
///
/// For a renderer this is whatever token the transport uses to address the
/// remote player; the client never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef(String);

impl ObjectRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single argument passed across the bridge.
#[derive(Debug, Clone)]
pub enum Arg {
    /// Plain data value
    Value(Value),
    /// Callback proxy the renderer may invoke later
    Callback(StatusCallback),
}

impl Arg {
    /// Returns the plain value, if this argument is one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Arg::Value(v) => Some(v),
            Arg::Callback(_) => None,
        }
    }

    /// Returns the callback proxy, if this argument is one.
    pub fn as_callback(&self) -> Option<&StatusCallback> {
        match self {
            Arg::Callback(cb) => Some(cb),
            Arg::Value(_) => None,
        }
    }
}

macro_rules! impl_arg_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Arg::Value(Value::from(value))
                }
            }
        )*
    };
}

impl_arg_from!(bool, i64, f64, String, &str);

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl From<StatusCallback> for Arg {
    fn from(callback: StatusCallback) -> Self {
        Arg::Callback(callback)
    }
}

/// Handle to an asynchronous operation still running on the renderer.
///
/// `is_done` may be called any number of times; `get` is only meaningful once
/// `is_done` has returned `true`.
pub trait PendingHandle: Send + Sync {
    /// Whether the remote operation has completed.
    fn is_done(&self) -> Result<bool>;

    /// Retrieve the final value of a completed operation.
    fn get(&self) -> Result<Value>;
}

/// What a bridge invocation hands back.
pub enum Reply {
    /// The method completed synchronously
    Value(Value),
    /// The method returned a future-like handle that must be polled
    Pending(Box<dyn PendingHandle>),
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Reply::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Transport carrying method calls to remote objects.
pub trait Bridge: Send + Sync {
    /// Invoke `method` on `target` with the given arguments.
    fn invoke(&self, target: &ObjectRef, method: &str, args: Vec<Arg>) -> Result<Reply>;
}

impl<B: Bridge + ?Sized> Bridge for Arc<B> {
    fn invoke(&self, target: &ObjectRef, method: &str, args: Vec<Arg>) -> Result<Reply> {
        (**self).invoke(target, method, args)
    }
}

impl<B: Bridge + ?Sized> Bridge for Box<B> {
    fn invoke(&self, target: &ObjectRef, method: &str, args: Vec<Arg>) -> Result<Reply> {
        (**self).invoke(target, method, args)
    }
}
