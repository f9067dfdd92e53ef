//! Error types for the discovery system.

use thiserror::Error;

/// Error type for discovery operations.
///
/// Failures the provider reports while a scan is running are not errors here;
/// they reach the listener as `on_discovery_failure`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// `start` was called while a scan is already running
    #[error("Discovery is already scanning")]
    AlreadyScanning,

    /// The provider refused to start a scan
    #[error("Discovery provider error: {0}")]
    Provider(String),
}

/// Convenience Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
