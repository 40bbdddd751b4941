use crate::DeletionState;

/// I/O the shell must perform to advance a [`DeletionState`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    RequestDeletion,
    /// Describe the stack. `after_attempt == 0` polls immediately; otherwise the shell sleeps
    /// [`crate::poll_delay`] for that attempt first.
    Poll { after_attempt: u32 },
    Reconcile,
}

pub fn next_command(state: &DeletionState) -> Option<Command> {
    match state {
        DeletionState::Requested => Some(Command::RequestDeletion),
        DeletionState::Waiting { attempt, .. } => Some(Command::Poll { after_attempt: *attempt }),
        DeletionState::Reconciling { .. } => Some(Command::Reconcile),
        DeletionState::Finished(_) => None,
    }
}
