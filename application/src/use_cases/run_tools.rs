//! Run Tools use case
//!
//! Executes a batch of tool calls concurrently and returns their results in
//! input order. Read-only tools run unattended; a tool tagged
//! `SideEffecting` first goes through the [`ApprovalPort`]. A shared
//! [`CancellationToken`] aborts every call still in flight.
//!
//! ```text
//! calls ──▶ approval gate ──▶ executor (concurrent) ──▶ results (input order)
//! ```

use crate::ports::approval::{ApprovalDecision, ApprovalPort, AutoReject};
use crate::ports::tool_executor::ToolExecutorPort;
use scout_domain::{Failure, FailureKind, ToolCall, ToolResult};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Input for a batch run
#[derive(Debug, Clone, Default)]
pub struct RunToolsInput {
    pub calls: Vec<ToolCall>,
}

impl RunToolsInput {
    pub fn new(calls: Vec<ToolCall>) -> Self {
        Self { calls }
    }
}

/// Results of a batch run, one per input call, in input order
#[derive(Debug, Clone)]
pub struct RunToolsOutput {
    pub results: Vec<ToolResult>,
}

impl RunToolsOutput {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

/// Use case for running tool calls on behalf of an agent
pub struct RunToolsUseCase<T: ToolExecutorPort + 'static> {
    tool_executor: Arc<T>,
    approval: Arc<dyn ApprovalPort>,
    cancellation_token: Option<CancellationToken>,
}

impl<T: ToolExecutorPort + 'static> Clone for RunToolsUseCase<T> {
    fn clone(&self) -> Self {
        Self {
            tool_executor: self.tool_executor.clone(),
            approval: self.approval.clone(),
            cancellation_token: self.cancellation_token.clone(),
        }
    }
}

impl<T: ToolExecutorPort + 'static> RunToolsUseCase<T> {
    /// Create a use case that rejects every call needing confirmation.
    pub fn new(tool_executor: Arc<T>) -> Self {
        Self {
            tool_executor,
            approval: Arc::new(AutoReject),
            cancellation_token: None,
        }
    }

    pub fn with_approval(mut self, approval: Arc<dyn ApprovalPort>) -> Self {
        self.approval = approval;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Run every call concurrently; the output has one result per call.
    pub async fn execute(&self, input: RunToolsInput) -> RunToolsOutput {
        let futures = input.calls.iter().map(|call| self.run_one(call));
        let results: Vec<ToolResult> = futures::future::join_all(futures).await;

        let output = RunToolsOutput { results };
        info!(
            "Tool batch finished: {} succeeded, {} failed",
            output.succeeded(),
            output.failed()
        );
        output
    }

    async fn run_one(&self, call: &ToolCall) -> ToolResult {
        if let Some(definition) = self.tool_executor.get_tool(&call.tool_name) {
            if definition.safety.requires_confirmation() {
                let decision = self.approval.approve(definition, call).await;
                if decision == ApprovalDecision::Reject {
                    warn!("Call to '{}' was not approved", call.tool_name);
                    return ToolResult::failure(
                        &call.tool_name,
                        Failure::new(
                            FailureKind::Cancelled,
                            format!("Call to '{}' was not approved", call.tool_name),
                        ),
                    );
                }
            }
        }

        match &self.cancellation_token {
            Some(token) => {
                self.tool_executor
                    .execute_with_cancellation(call, token)
                    .await
            }
            None => self.tool_executor.execute(call).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::approval::AutoApprove;
    use async_trait::async_trait;
    use scout_domain::{Item, Safety, ToolDefinition, ToolSpec};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Executor that answers after `delay_ms` (taken from the call) and
    /// honors cancellation.
    struct SleepyExecutor {
        spec: ToolSpec,
        executed: AtomicUsize,
    }

    impl SleepyExecutor {
        fn new() -> Self {
            Self {
                spec: ToolSpec::new()
                    .register(ToolDefinition::read_only("echo", "Echo"))
                    .register(ToolDefinition::new(
                        "post",
                        "Post something",
                        Safety::SideEffecting,
                    )),
                executed: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ToolExecutorPort for SleepyExecutor {
        fn tool_spec(&self) -> &ToolSpec {
            &self.spec
        }

        async fn execute_with_cancellation(
            &self,
            call: &ToolCall,
            token: &CancellationToken,
        ) -> ToolResult {
            self.executed.fetch_add(1, Ordering::SeqCst);
            if !self.has_tool(&call.tool_name) {
                return ToolResult::failure(&call.tool_name, Failure::unknown_tool(&call.tool_name));
            }
            let delay = call.get_u64("delay_ms").unwrap_or(0);
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    ToolResult::failure(&call.tool_name, Failure::cancelled(&call.tool_name))
                }
                _ = tokio::time::sleep(Duration::from_millis(delay)) => {
                    let tag = call.get_string("tag").unwrap_or_default().to_string();
                    ToolResult::success(&call.tool_name, Item::new().with("tag", tag))
                }
            }
        }

        fn execute_sync(&self, _call: &ToolCall) -> ToolResult {
            unimplemented!()
        }
    }

    fn echo(tag: &str, delay_ms: u64) -> ToolCall {
        ToolCall::new("echo")
            .with_arg("tag", tag)
            .with_arg("delay_ms", delay_ms)
    }

    fn tag_of(result: &ToolResult) -> &str {
        result
            .payload()
            .and_then(|p| p.as_item())
            .and_then(|i| i.get_str("tag"))
            .unwrap()
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let use_case = RunToolsUseCase::new(Arc::new(SleepyExecutor::new()));
        let input = RunToolsInput::new(vec![echo("slow", 60), echo("fast", 0), echo("mid", 20)]);

        let output = use_case.execute(input).await;

        let tags: Vec<&str> = output.results.iter().map(tag_of).collect();
        assert_eq!(tags, vec!["slow", "fast", "mid"]);
        assert_eq!(output.succeeded(), 3);
    }

    #[tokio::test]
    async fn test_calls_run_concurrently() {
        let use_case = RunToolsUseCase::new(Arc::new(SleepyExecutor::new()));
        let calls = (0..5).map(|i| echo(&i.to_string(), 200)).collect();

        let started = std::time::Instant::now();
        let output = use_case.execute(RunToolsInput::new(calls)).await;

        assert_eq!(output.succeeded(), 5);
        assert!(started.elapsed() < Duration::from_millis(900));
    }

    #[tokio::test]
    async fn test_side_effecting_tool_rejected_by_default() {
        let executor = Arc::new(SleepyExecutor::new());
        let use_case = RunToolsUseCase::new(executor.clone());

        let output = use_case
            .execute(RunToolsInput::new(vec![ToolCall::new("post")]))
            .await;

        let error = output.results[0].error().unwrap();
        assert_eq!(error.kind, FailureKind::Cancelled);
        assert!(error.message.contains("not approved"));
        assert_eq!(executor.executed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_side_effecting_tool_runs_when_approved() {
        let executor = Arc::new(SleepyExecutor::new());
        let use_case = RunToolsUseCase::new(executor.clone()).with_approval(Arc::new(AutoApprove));

        let output = use_case
            .execute(RunToolsInput::new(vec![ToolCall::new("post")]))
            .await;

        assert!(output.results[0].is_success());
        assert_eq!(executor.executed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_not_gated() {
        let use_case = RunToolsUseCase::new(Arc::new(SleepyExecutor::new()));
        let output = use_case
            .execute(RunToolsInput::new(vec![ToolCall::new("nope")]))
            .await;

        assert_eq!(output.results[0].error().unwrap().kind, FailureKind::UnknownTool);
        assert_eq!(output.failed(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_stops_in_flight_calls() {
        let token = CancellationToken::new();
        let use_case =
            RunToolsUseCase::new(Arc::new(SleepyExecutor::new())).with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let output = use_case
            .execute(RunToolsInput::new(vec![echo("a", 10_000), echo("b", 10_000)]))
            .await;
        canceller.await.unwrap();

        assert_eq!(output.failed(), 2);
        assert!(output
            .results
            .iter()
            .all(|r| r.error().unwrap().kind == FailureKind::Cancelled));
    }
}
