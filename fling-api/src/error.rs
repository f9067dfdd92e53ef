use std::time::Duration;

use fling_bridge::BridgeError;
use thiserror::Error;

/// High-level API errors for remote player operations
///
/// Every command or query issued against a renderer fails with one of these.
/// Only [`ApiError::Disconnected`] is terminal for the session that produced
/// it; the rest affect the single call that returned them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The renderer or the transport underneath it is gone
    ///
    /// Terminal for the affected session. The client never retries or
    /// reconnects on its own.
    #[error("Remote player disconnected")]
    Disconnected,

    /// The renderer does not support the requested capability
    ///
    /// Volume and mute on renderers whose status reports them as unset end up
    /// here, as do methods the renderer does not implement.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A caller-imposed wait expired before the renderer answered
    ///
    /// The remote operation may still complete; nothing observes it.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// The renderer answered with something that could not be understood
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// The remote operation ran and reported a failure
    #[error("Remote failure: {0}")]
    RemoteFailure(String),
}

impl ApiError {
    /// Whether this error ends the session it came from.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ApiError::Disconnected)
    }

    pub(crate) fn protocol(msg: impl Into<String>) -> Self {
        ApiError::ProtocolError(msg.into())
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<BridgeError> for ApiError {
    fn from(error: BridgeError) -> Self {
        match error {
            BridgeError::Disconnected => ApiError::Disconnected,
            BridgeError::InvocationFailed(msg) => ApiError::RemoteFailure(msg),
            BridgeError::NoSuchMethod(method) => ApiError::UnsupportedOperation(method),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_error_conversion() {
        let api_error: ApiError = BridgeError::Disconnected.into();
        assert_eq!(api_error, ApiError::Disconnected);
        assert!(api_error.is_terminal());

        let api_error: ApiError = BridgeError::InvocationFailed("boom".to_string()).into();
        assert!(matches!(api_error, ApiError::RemoteFailure(ref m) if m == "boom"));
        assert!(!api_error.is_terminal());

        let api_error: ApiError = BridgeError::NoSuchMethod("setPlayerStyle".to_string()).into();
        assert!(matches!(api_error, ApiError::UnsupportedOperation(_)));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(ApiError::Disconnected.to_string(), "Remote player disconnected");
        assert_eq!(
            ApiError::Timeout(Duration::from_millis(250)).to_string(),
            "Operation timed out after 250ms"
        );
        assert_eq!(
            ApiError::ProtocolError("bad state".to_string()).to_string(),
            "Protocol error: bad state"
        );
    }
}
