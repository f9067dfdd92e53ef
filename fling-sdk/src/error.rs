use thiserror::Error;

use crate::logging::LoggingError;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("API error: {0}")]
    ApiError(#[from] fling_api::ApiError),

    #[error("Discovery error: {0}")]
    DiscoveryError(#[from] fling_discovery::DiscoveryError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
}
