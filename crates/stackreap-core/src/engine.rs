use thiserror::Error;

use crate::{DeletePhase, DeletionResult, FailureReason, StackStatus, WaitPolicy};

/// Per-stack deletion state.
///
/// `Requested → Waiting → (Reconciling) → Finished`. The imperative shell performs the
/// I/O named by [`crate::next_command`] and feeds what it saw back in as a
/// [`DeletionEvent`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeletionState {
    Requested,
    Waiting {
        /// Polls issued so far.
        attempt: u32,
        consecutive_errors: u32,
    },
    /// The wait failed; one describe decides between `AlreadyGone` and `Failed(cause)`.
    Reconciling { cause: FailureReason },
    Finished(DeletionResult),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeletionEvent {
    RequestAccepted,
    RequestRejected(String),
    Polled(StackStatus),
    PollNotFound,
    PollError(String),
    DeadlineReached,
    ReconcileNotFound,
    ReconcileExists(StackStatus),
    ReconcileError(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("event {event:?} is not valid in state {state:?}")]
pub struct InvalidTransition {
    pub state: DeletionState,
    pub event: DeletionEvent,
}

impl DeletionState {
    pub fn is_finished(&self) -> bool {
        matches!(self, DeletionState::Finished(_))
    }

    pub fn result(&self) -> Option<&DeletionResult> {
        match self {
            DeletionState::Finished(r) => Some(r),
            _ => None,
        }
    }
}

pub fn transition(state: DeletionState, event: DeletionEvent, policy: &WaitPolicy) -> Result<DeletionState, InvalidTransition> {
    use DeletionEvent as E;
    use DeletionState as S;

    let next = match (&state, &event) {
        (S::Requested, E::RequestAccepted) => S::Waiting { attempt: 0, consecutive_errors: 0 },
        (S::Requested, E::RequestRejected(reason)) => {
            S::Finished(DeletionResult::Failed(FailureReason::RequestRejected(reason.clone())))
        }
        // The request itself never answered; there is nothing to reconcile against.
        (S::Requested, E::DeadlineReached) => S::Finished(DeletionResult::Failed(FailureReason::TimeoutExceeded)),

        (S::Waiting { attempt, .. }, E::Polled(status)) => match status.delete_phase() {
            DeletePhase::Deleted => S::Finished(DeletionResult::Succeeded),
            DeletePhase::Failed => S::Reconciling { cause: FailureReason::StackFailed(status.clone()) },
            DeletePhase::Pending => S::Waiting { attempt: attempt + 1, consecutive_errors: 0 },
        },
        // Purged from describe while we watched it: the delete we asked for completed.
        (S::Waiting { .. }, E::PollNotFound) => S::Finished(DeletionResult::Succeeded),
        (S::Waiting { attempt, consecutive_errors }, E::PollError(reason)) => {
            let errors = consecutive_errors + 1;
            if errors > policy.max_poll_retries {
                S::Reconciling { cause: FailureReason::PollFailed(reason.clone()) }
            } else {
                S::Waiting { attempt: attempt + 1, consecutive_errors: errors }
            }
        }
        (S::Waiting { .. }, E::DeadlineReached) => S::Reconciling { cause: FailureReason::TimeoutExceeded },

        (S::Reconciling { .. }, E::ReconcileNotFound) => S::Finished(DeletionResult::AlreadyGone),
        (S::Reconciling { cause }, E::ReconcileExists(_) | E::ReconcileError(_)) => {
            S::Finished(DeletionResult::Failed(cause.clone()))
        }

        _ => return Err(InvalidTransition { state, event }),
    };
    Ok(next)
}
