//! Configuration for the Fling SDK
//!
//! One [`FlingConfig`] is shared by every session and discovery controller a
//! [`crate::FlingSystem`] creates.

use std::time::Duration;

use fling_api::{ResolverConfig, DEFAULT_POLL_INTERVAL};
use fling_discovery::DEFAULT_SERVICE_TYPE;
use serde::{Deserialize, Serialize};

use crate::SdkError;

/// SDK-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlingConfig {
    /// Interval between two completion polls of a pending remote call
    /// Default: 100 ms
    pub poll_interval: Duration,

    /// Ceiling applied to every remote call made by a session
    /// Default: none (a call waits as long as the renderer takes)
    pub call_timeout: Option<Duration>,

    /// Service token discovery searches for
    /// Default: "amzn.thin.pl"
    pub service_type: String,

    /// Position update interval pushed to each renderer when a session opens
    /// Default: none (leave the renderer's own setting alone)
    pub position_update_interval: Option<Duration>,
}

impl Default for FlingConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            call_timeout: None,
            service_type: DEFAULT_SERVICE_TYPE.to_string(),
            position_update_interval: None,
        }
    }
}

impl FlingConfig {
    /// Create a new FlingConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Short polls and frequent position reports, for interactive remotes
    pub fn responsive() -> Self {
        Self {
            poll_interval: Duration::from_millis(25),
            call_timeout: Some(Duration::from_secs(10)),
            position_update_interval: Some(Duration::from_millis(500)),
            ..Default::default()
        }
    }

    /// Fewer polls and rare position reports
    pub fn low_traffic() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            position_update_interval: Some(Duration::from_secs(5)),
            ..Default::default()
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = service_type.into();
        self
    }

    pub fn with_position_update_interval(mut self, interval: Option<Duration>) -> Self {
        self.position_update_interval = interval;
        self
    }

    /// Resolver settings derived from this configuration
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig::new()
            .with_poll_interval(self.poll_interval)
            .with_timeout(self.call_timeout)
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<(), SdkError> {
        self.resolver_config().validate().map_err(SdkError::Config)?;

        if self.service_type.trim().is_empty() {
            return Err(SdkError::Config("Service type must not be empty".to_string()));
        }

        if self.position_update_interval == Some(Duration::ZERO) {
            return Err(SdkError::Config(
                "Position update interval must be greater than 0 when set".to_string(),
            ));
        }

        Ok(())
    }
}
