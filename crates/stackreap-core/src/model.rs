use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! stack_statuses {
    ($($variant:ident => $wire:literal,)+) => {
        /// Lifecycle state of a stack as reported by the provider.
        ///
        /// `Other` carries any state this build does not know about so a newer provider
        /// vocabulary never fails a listing.
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum StackStatus {
            $($variant,)+
            Other(String),
        }

        impl StackStatus {
            pub const KNOWN: &'static [StackStatus] = &[$(StackStatus::$variant,)+];

            pub fn as_str(&self) -> &str {
                match self {
                    $(StackStatus::$variant => $wire,)+
                    StackStatus::Other(s) => s.as_str(),
                }
            }

            pub fn parse(s: &str) -> Self {
                match s {
                    $($wire => StackStatus::$variant,)+
                    other => StackStatus::Other(other.to_string()),
                }
            }
        }
    };
}

stack_statuses! {
    CreateInProgress => "CREATE_IN_PROGRESS",
    CreateFailed => "CREATE_FAILED",
    CreateComplete => "CREATE_COMPLETE",
    RollbackInProgress => "ROLLBACK_IN_PROGRESS",
    RollbackFailed => "ROLLBACK_FAILED",
    RollbackComplete => "ROLLBACK_COMPLETE",
    DeleteInProgress => "DELETE_IN_PROGRESS",
    DeleteFailed => "DELETE_FAILED",
    DeleteComplete => "DELETE_COMPLETE",
    UpdateInProgress => "UPDATE_IN_PROGRESS",
    UpdateCompleteCleanupInProgress => "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
    UpdateComplete => "UPDATE_COMPLETE",
    UpdateFailed => "UPDATE_FAILED",
    UpdateRollbackInProgress => "UPDATE_ROLLBACK_IN_PROGRESS",
    UpdateRollbackFailed => "UPDATE_ROLLBACK_FAILED",
    UpdateRollbackCompleteCleanupInProgress => "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS",
    UpdateRollbackComplete => "UPDATE_ROLLBACK_COMPLETE",
    ReviewInProgress => "REVIEW_IN_PROGRESS",
    ImportInProgress => "IMPORT_IN_PROGRESS",
    ImportComplete => "IMPORT_COMPLETE",
    ImportRollbackInProgress => "IMPORT_ROLLBACK_IN_PROGRESS",
    ImportRollbackFailed => "IMPORT_ROLLBACK_FAILED",
    ImportRollbackComplete => "IMPORT_ROLLBACK_COMPLETE",
}

impl From<String> for StackStatus {
    fn from(s: String) -> Self {
        StackStatus::parse(&s)
    }
}

impl From<StackStatus> for String {
    fn from(s: StackStatus) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for StackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an observed status bears on a pending deletion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeletePhase {
    /// Deletion finished.
    Deleted,
    /// The stack landed in a state a delete will not leave on its own.
    Failed,
    /// Keep polling.
    Pending,
}

impl StackStatus {
    pub fn delete_phase(&self) -> DeletePhase {
        match self {
            StackStatus::DeleteComplete => DeletePhase::Deleted,
            StackStatus::DeleteFailed
            | StackStatus::CreateFailed
            | StackStatus::RollbackFailed
            | StackStatus::UpdateRollbackFailed
            | StackStatus::UpdateRollbackInProgress => DeletePhase::Failed,
            _ => DeletePhase::Pending,
        }
    }
}

/// Slice of the inventory requested from the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusFilter(pub Vec<StackStatus>);

impl StatusFilter {
    pub fn new(statuses: impl IntoIterator<Item = StackStatus>) -> Self {
        Self(statuses.into_iter().collect())
    }

    pub fn statuses(&self) -> &[StackStatus] {
        &self.0
    }

    pub fn contains(&self, status: &StackStatus) -> bool {
        self.0.contains(status)
    }
}

impl Default for StatusFilter {
    /// Live stacks: settled create/update states plus the rollback states left behind by
    /// failed deployments.
    fn default() -> Self {
        Self::new([
            StackStatus::CreateComplete,
            StackStatus::CreateInProgress,
            StackStatus::RollbackComplete,
            StackStatus::RollbackFailed,
            StackStatus::UpdateRollbackFailed,
            StackStatus::UpdateComplete,
            StackStatus::ImportRollbackComplete,
        ])
    }
}
