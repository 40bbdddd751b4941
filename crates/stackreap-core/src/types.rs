use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ids::*, model::*};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSummary {
    pub name: StackName,
    pub id: StackId,
    pub status: StackStatus,
    pub created_at_unix: i64,
    pub updated_at_unix: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeletionRequest {
    pub stack_name: StackName,
}

impl DeletionRequest {
    pub fn for_stack(stack: &StackSummary) -> Self {
        Self { stack_name: stack.name.clone() }
    }
}

/// Why a stack could not be confirmed deleted.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum FailureReason {
    #[error("delete request rejected: {0}")]
    RequestRejected(String),
    #[error("stack entered {0} while deleting")]
    StackFailed(StackStatus),
    #[error("status poll failed: {0}")]
    PollFailed(String),
    #[error("timed out waiting for deletion")]
    TimeoutExceeded,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeletionResult {
    Succeeded,
    /// Not found when checked after the wait failed. Counts as deleted.
    AlreadyGone,
    Failed(FailureReason),
}

impl DeletionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, DeletionResult::Succeeded | DeletionResult::AlreadyGone)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionOutcome {
    pub stack_name: StackName,
    pub result: DeletionResult,
}
