//! Typed API for Fling remote media players
//!
//! This crate sits on top of the private `fling-bridge` transport contract and
//! provides:
//!
//! - the status and info model reported by a renderer ([`model`]),
//! - the future resolver that turns a polled pending handle into an awaitable
//!   value ([`resolver`]),
//! - one typed operation per remote player method ([`operations`]), executed
//!   through [`PlayerClient`].
//!
//! ```rust,ignore
//! use fling_api::{PlayerClient, operations::{GetStatusOperation, GetStatusOperationRequest}};
//!
//! let client = PlayerClient::new(bridge);
//! let status = client
//!     .execute::<GetStatusOperation>(&player_ref, &GetStatusOperationRequest {})
//!     .await?;
//! println!("{}", status);
//! ```

pub mod client;
pub mod error;
pub mod model;
pub mod operation;
pub mod operations;
pub mod resolver;

pub use client::PlayerClient;
pub use error::{ApiError, Result};
pub use model::{MediaCondition, MediaPlayerInfo, MediaPlayerStatus, MediaState, SeekMode};
pub use operation::PlayerOperation;
pub use resolver::{
    await_completion, PendingResult, Resolver, ResolverConfig, DEFAULT_POLL_INTERVAL,
    MIN_POLL_INTERVAL,
};

pub use fling_bridge::{Arg, Bridge, BridgeError, ObjectRef, StatusCallback, Value};
