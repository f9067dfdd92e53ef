use std::fmt;
use std::sync::Arc;

use fling_bridge::{Bridge, ObjectRef, Reply};

use crate::error::{ApiError, Result};
use crate::model::decode_string;
use crate::operation::PlayerOperation;
use crate::resolver::{Resolver, ResolverConfig};

/// A client for executing player operations against remote renderers
///
/// This client bridges the gap between the stateless operation definitions
/// and the transport that actually reaches a renderer. Calls go through the
/// [`Bridge`], and any pending reply is resolved on the tokio timer according
/// to the client's [`ResolverConfig`].
///
/// Cloning is cheap; clones share the bridge.
#[derive(Clone)]
pub struct PlayerClient {
    bridge: Arc<dyn Bridge>,
    resolver: Resolver,
}

impl PlayerClient {
    /// Create a client with the default resolver configuration
    /// (100 ms poll interval, no timeout).
    pub fn new(bridge: Arc<dyn Bridge>) -> Self {
        Self::with_resolver_config(bridge, ResolverConfig::default())
    }

    pub fn with_resolver_config(bridge: Arc<dyn Bridge>, config: ResolverConfig) -> Self {
        Self {
            bridge,
            resolver: Resolver::new(config),
        }
    }

    pub fn resolver_config(&self) -> &ResolverConfig {
        self.resolver.config()
    }

    /// Execute a player operation against a renderer
    ///
    /// Builds the arguments, invokes the remote method, waits for a pending
    /// reply to complete and parses the final value.
    ///
    /// # Example
    /// ```rust,ignore
    /// use fling_api::operations::{SetVolumeOperation, SetVolumeOperationRequest};
    ///
    /// client
    ///     .execute::<SetVolumeOperation>(&player, &SetVolumeOperationRequest { volume: 0.4 })
    ///     .await?;
    /// ```
    pub async fn execute<Op: PlayerOperation>(
        &self,
        target: &ObjectRef,
        request: &Op::Request,
    ) -> Result<Op::Response> {
        let args = Op::build_args(request);
        tracing::debug!("{} -> {} ({} arg(s))", target, Op::METHOD, args.len());

        let reply = self.bridge.invoke(target, Op::METHOD, args)?;
        let value = self.resolver.resolve(reply, Op::METHOD).await.map_err(|e| {
            tracing::debug!("{} -> {} failed: {}", target, Op::METHOD, e);
            e
        })?;

        Op::parse_response(value)
    }

    /// Invoke an operation without waiting for it to complete.
    ///
    /// A pending reply is dropped unresolved, so only failures raised by the
    /// invocation itself are reported.
    pub fn execute_detached<Op: PlayerOperation>(
        &self,
        target: &ObjectRef,
        request: &Op::Request,
    ) -> Result<()> {
        let args = Op::build_args(request);
        tracing::debug!("{} -> {} (detached)", target, Op::METHOD);
        self.bridge.invoke(target, Op::METHOD, args)?;
        Ok(())
    }

    /// Call a method the renderer answers synchronously with a string.
    ///
    /// Used for identity accessors (`getName`, `getUniqueIdentifier`). A
    /// pending reply here is a protocol violation.
    pub fn query_string(&self, target: &ObjectRef, method: &str) -> Result<String> {
        match self.bridge.invoke(target, method, Vec::new())? {
            Reply::Value(value) => decode_string(&value, method),
            Reply::Pending(_) => Err(ApiError::protocol(format!(
                "{method}: expected an immediate reply"
            ))),
        }
    }
}

impl fmt::Debug for PlayerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerClient")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}
