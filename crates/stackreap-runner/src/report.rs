use tracing::{debug, error, info};

use stackreap_core::{BatchReport, StackSummary};

pub fn log_selected(stack: &StackSummary) {
    info!(
        stack_name = %stack.name,
        stack_id = %stack.id,
        status = %stack.status,
        created_at_unix = stack.created_at_unix,
        last_updated_unix = ?stack.updated_at_unix,
        "matched stack"
    );
}

pub fn log_skipped(stack: &StackSummary) {
    debug!(stack_name = %stack.name, "Skipping based on prefix filtering");
}

pub fn log_batch_summary(report: &BatchReport) {
    let c = report.counts();
    for (name, reason) in report.failures() {
        error!(stack_name = %name, error = %reason, "stack not deleted");
    }
    info!(
        succeeded = c.succeeded,
        already_gone = c.already_gone,
        failed = c.failed,
        "deletion batch finished"
    );
}
