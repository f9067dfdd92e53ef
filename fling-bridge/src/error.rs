//! Error types for the bridge

use thiserror::Error;

/// Errors that can occur while talking to a remote object
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BridgeError {
    /// The remote object or the transport underneath it is gone
    #[error("Remote object disconnected")]
    Disconnected,

    /// The remote method ran and failed
    #[error("Remote invocation failed: {0}")]
    InvocationFailed(String),

    /// The remote object has no such method
    #[error("No such remote method: {0}")]
    NoSuchMethod(String),
}
