//! Approval port for tools that need confirmation.
//!
//! Read-only tools run unattended. A tool whose definition is tagged
//! `SideEffecting` is only executed after [`ApprovalPort::approve`] says so.
//!
//! # Built-in Implementations
//!
//! - [`AutoReject`] - Never approves (the safe non-interactive default)
//! - [`AutoApprove`] - Always approves

use async_trait::async_trait;
use scout_domain::{ToolCall, ToolDefinition};

/// Decision returned by an approval handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    Approve,
    Reject,
}

/// Port for confirming a call to a tool that is not read-only.
#[async_trait]
pub trait ApprovalPort: Send + Sync {
    async fn approve(&self, definition: &ToolDefinition, call: &ToolCall) -> ApprovalDecision;
}

/// Rejects every call that needs confirmation.
pub struct AutoReject;

#[async_trait]
impl ApprovalPort for AutoReject {
    async fn approve(&self, _definition: &ToolDefinition, _call: &ToolCall) -> ApprovalDecision {
        ApprovalDecision::Reject
    }
}

/// Approves every call.
///
/// # Warning
///
/// Only use when side effects of the registered tools are acceptable
/// without a human in the loop.
pub struct AutoApprove;

#[async_trait]
impl ApprovalPort for AutoApprove {
    async fn approve(&self, _definition: &ToolDefinition, _call: &ToolCall) -> ApprovalDecision {
        ApprovalDecision::Approve
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_domain::Safety;

    #[tokio::test]
    async fn test_auto_reject() {
        let definition = ToolDefinition::new("post", "Post", Safety::SideEffecting);
        let decision = AutoReject.approve(&definition, &ToolCall::new("post")).await;
        assert_eq!(decision, ApprovalDecision::Reject);
    }

    #[tokio::test]
    async fn test_auto_approve() {
        let definition = ToolDefinition::new("post", "Post", Safety::SideEffecting);
        let decision = AutoApprove.approve(&definition, &ToolCall::new("post")).await;
        assert_eq!(decision, ApprovalDecision::Approve);
    }
}
