//! Delete-and-wait driver: performs the I/O the core state machine asks for.

use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, error, info, info_span, warn, Instrument};

use stackreap_core::{
    next_command, poll_delay, transition, BatchId, BatchReport, Command, DeletionEvent, DeletionOutcome, DeletionRequest,
    DeletionResult, DeletionState, FailureReason, StackName, StackSummary, WaitPolicy,
};
use stackreap_provider::{ProviderError, StackProvider};

/// Deletes `stacks` one after another. Every stack gets exactly one outcome; a failure never
/// stops the rest of the batch.
pub async fn delete_batch<P: StackProvider>(provider: &P, stacks: &[StackSummary], policy: &WaitPolicy) -> BatchReport {
    let batch_id = BatchId::new();
    let span = info_span!("batch", batch_id = %batch_id, count = stacks.len());

    async {
        let mut report = BatchReport { batch_id: Some(batch_id.clone()), outcomes: Vec::with_capacity(stacks.len()) };
        for stack in stacks {
            let req = DeletionRequest::for_stack(stack);
            let outcome = delete_stack(provider, &req, policy)
                .instrument(info_span!("stack", stack_name = %req.stack_name))
                .await;
            report.record(outcome);
        }
        report
    }
    .instrument(span)
    .await
}

/// Requests deletion of one stack and waits for it to reach a terminal state.
pub async fn delete_stack<P: StackProvider>(provider: &P, req: &DeletionRequest, policy: &WaitPolicy) -> DeletionOutcome {
    info!(stack_name = %req.stack_name, "Deleting stack");
    let result = drive(provider, &req.stack_name, policy, DeletionState::Requested).await;

    match &result {
        DeletionResult::Succeeded => info!(stack_name = %req.stack_name, "Successfully deleted stack"),
        DeletionResult::AlreadyGone => info!(stack_name = %req.stack_name, "Stack already gone; treating as deleted"),
        DeletionResult::Failed(reason) => error!(stack_name = %req.stack_name, error = %reason, "Failed to delete stack"),
    }
    DeletionOutcome { stack_name: req.stack_name.clone(), result }
}

pub async fn request_deletion<P: StackProvider>(provider: &P, name: &StackName) -> Result<(), ProviderError> {
    provider.delete_stack(name).await
}

/// Waits for an already requested deletion. The overall timeout starts now.
pub async fn await_terminal<P: StackProvider>(provider: &P, name: &StackName, policy: &WaitPolicy) -> DeletionResult {
    drive(provider, name, policy, DeletionState::Waiting { attempt: 0, consecutive_errors: 0 }).await
}

async fn drive<P: StackProvider>(provider: &P, name: &StackName, policy: &WaitPolicy, mut state: DeletionState) -> DeletionResult {
    let deadline = Instant::now() + policy.overall_timeout;

    while let Some(cmd) = next_command(&state) {
        let event = match cmd {
            Command::RequestDeletion => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                match timeout(remaining, request_deletion(provider, name)).await {
                    Ok(Ok(())) => DeletionEvent::RequestAccepted,
                    Ok(Err(e)) => DeletionEvent::RequestRejected(e.to_string()),
                    Err(_) => {
                        warn!("delete request did not answer before the deadline");
                        DeletionEvent::DeadlineReached
                    }
                }
            }
            Command::Poll { after_attempt } => poll(provider, name, policy, after_attempt, deadline).await,
            Command::Reconcile => reconcile(provider, name, policy).await,
        };

        state = match transition(state, event, policy) {
            Ok(next) => next,
            Err(e) => {
                error!(error = %e, "deletion state machine stuck");
                DeletionState::Finished(DeletionResult::Failed(FailureReason::PollFailed(e.to_string())))
            }
        };
        if let DeletionState::Reconciling { cause } = &state {
            warn!(error = %cause, "wait failed; checking whether the stack is already gone");
        }
    }

    match state {
        DeletionState::Finished(result) => result,
        _ => DeletionResult::Failed(FailureReason::TimeoutExceeded),
    }
}

async fn poll<P: StackProvider>(provider: &P, name: &StackName, policy: &WaitPolicy, after_attempt: u32, deadline: Instant) -> DeletionEvent {
    if after_attempt > 0 {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return DeletionEvent::DeadlineReached;
        }
        let delay = poll_delay(policy, after_attempt, rand::random::<f64>(), remaining);
        debug!(attempt = after_attempt, delay_ms = delay.as_millis() as u64, "waiting before next status poll");
        sleep(delay).await;
    }

    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        return DeletionEvent::DeadlineReached;
    }
    match timeout(remaining, provider.describe_stack(name)).await {
        Err(_) => DeletionEvent::DeadlineReached,
        Ok(Ok(status)) => {
            debug!(status = %status, "polled stack status");
            DeletionEvent::Polled(status)
        }
        Ok(Err(ProviderError::NotFound(_))) => DeletionEvent::PollNotFound,
        Ok(Err(e)) => {
            warn!(error = %e, "status poll failed");
            DeletionEvent::PollError(e.to_string())
        }
    }
}

async fn reconcile<P: StackProvider>(provider: &P, name: &StackName, policy: &WaitPolicy) -> DeletionEvent {
    match timeout(policy.reconcile_timeout, provider.describe_stack(name)).await {
        Ok(Err(ProviderError::NotFound(_))) => DeletionEvent::ReconcileNotFound,
        Ok(Ok(status)) => {
            debug!(status = %status, "stack still exists after failed wait");
            DeletionEvent::ReconcileExists(status)
        }
        Ok(Err(e)) => DeletionEvent::ReconcileError(e.to_string()),
        Err(_) => DeletionEvent::ReconcileError("describe timed out".to_string()),
    }
}
