//! Adapter Registry
//!
//! The [`AdapterRegistry`] maps tool names to [`Adapter`]s and implements
//! [`ToolExecutorPort`]. Every adapter is added by an explicit
//! [`register`](AdapterRegistry::register) call; there is no discovery.
//!
//! # Usage
//!
//! ```ignore
//! use scout_infrastructure::tools::{AdapterRegistry, WikipediaSearch};
//!
//! let registry = AdapterRegistry::new(gateway, settings)
//!     .register(WikipediaSearch);
//!
//! assert!(registry.has_tool("wikipedia_search"));
//!
//! let call = ToolCall::new("wikipedia_search").with_arg("query", "Rust");
//! let result = registry.execute(&call).await;
//! ```
//!
//! # Call pipeline
//!
//! ```text
//! execute_with_cancellation(call, token)
//!   ├─ unknown name        → unknown_tool
//!   ├─ DefaultToolValidator → invalid_argument
//!   └─ select! {
//!        token.cancelled()                 → cancelled
//!        timeout(settings.timeout, run())  → payload | failure | timeout
//!      }
//! ```
//!
//! Losing the race drops the adapter future, which drops its in-flight
//! request.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use scout_application::ports::tool_executor::ToolExecutorPort;
use scout_application::{Adapter, AdapterContext, AdapterSettings, HttpGateway};
use scout_domain::tool::{
    entities::{ToolCall, ToolSpec},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{Failure, Payload, ToolResult},
};
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Name → adapter table plus the shared gateway and settings.
///
/// All state is immutable after construction, so one registry can serve any
/// number of concurrent calls.
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn Adapter>>,
    tool_spec: ToolSpec,
    gateway: Arc<dyn HttpGateway>,
    settings: AdapterSettings,
}

impl AdapterRegistry {
    /// Create an empty registry
    pub fn new(gateway: Arc<dyn HttpGateway>, settings: AdapterSettings) -> Self {
        Self {
            adapters: HashMap::new(),
            tool_spec: ToolSpec::new(),
            gateway,
            settings,
        }
    }

    /// Register an adapter.
    ///
    /// The adapter's definition is read once here and stored; a later
    /// registration under the same name replaces the earlier one.
    pub fn register<A: Adapter + 'static>(self, adapter: A) -> Self {
        self.register_arc(Arc::new(adapter))
    }

    /// Register an adapter (Arc version)
    pub fn register_arc(mut self, adapter: Arc<dyn Adapter>) -> Self {
        let definition = adapter.definition();
        debug!(tool = %definition.name, safe = definition.is_safe(), "Registered adapter");
        self.adapters.insert(definition.name.clone(), adapter);
        self.tool_spec = self.tool_spec.register(definition);
        self
    }

    pub fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    async fn run_adapter(
        &self,
        adapter: &dyn Adapter,
        call: &ToolCall,
        token: &CancellationToken,
    ) -> (Result<Payload, Failure>, usize) {
        let ctx = AdapterContext::new(self.gateway.as_ref(), &self.settings);
        let timeout = self.settings.timeout;

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(Failure::cancelled(&call.tool_name)),
            outcome = tokio::time::timeout(timeout, adapter.run(&ctx, call)) => match outcome {
                Ok(result) => result,
                Err(_) => Err(Failure::timeout(format!(
                    "'{}' did not finish within {}s",
                    call.tool_name,
                    timeout.as_secs_f64()
                ))),
            },
        };

        (result, ctx.requests_made())
    }

    fn execute_on_fresh_runtime(&self, call: &ToolCall) -> ToolResult {
        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime.block_on(self.execute(call)),
            Err(e) => ToolResult::failure(
                &call.tool_name,
                Failure::connection_error(format!("Failed to start async runtime: {}", e)),
            ),
        }
    }
}

#[async_trait]
impl ToolExecutorPort for AdapterRegistry {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute_with_cancellation(
        &self,
        call: &ToolCall,
        token: &CancellationToken,
    ) -> ToolResult {
        let started = Instant::now();

        let (Some(adapter), Some(definition)) = (
            self.adapters.get(&call.tool_name),
            self.tool_spec.get(&call.tool_name),
        ) else {
            warn!(tool = %call.tool_name, "Unknown tool requested");
            return ToolResult::failure(&call.tool_name, Failure::unknown_tool(&call.tool_name));
        };

        if let Err(message) = DefaultToolValidator.validate(call, definition) {
            warn!(tool = %call.tool_name, error = %message, "Rejected tool arguments");
            return ToolResult::failure(&call.tool_name, Failure::invalid_argument(message));
        }

        if token.is_cancelled() {
            return ToolResult::failure(&call.tool_name, Failure::cancelled(&call.tool_name));
        }

        let (result, requests) = self.run_adapter(adapter.as_ref(), call, token).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => info!(
                tool = %call.tool_name,
                duration_ms,
                requests,
                "Tool call succeeded"
            ),
            Err(failure) => warn!(
                tool = %call.tool_name,
                duration_ms,
                requests,
                kind = %failure.kind,
                error = %failure.message,
                "Tool call failed"
            ),
        }

        ToolResult::from_result(&call.tool_name, result)
            .with_duration(duration_ms)
            .with_requests(requests)
    }

    fn execute_sync(&self, call: &ToolCall) -> ToolResult {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(self.execute(call)))
            }
            // A current-thread runtime cannot be blocked from inside; run the
            // call on a scoped thread with its own runtime instead.
            Ok(_) => std::thread::scope(|scope| {
                scope
                    .spawn(|| self.execute_on_fresh_runtime(call))
                    .join()
                    .unwrap_or_else(|_| {
                        ToolResult::failure(
                            &call.tool_name,
                            Failure::connection_error("Tool call thread panicked"),
                        )
                    })
            }),
            Err(_) => self.execute_on_fresh_runtime(call),
        }
    }
}
