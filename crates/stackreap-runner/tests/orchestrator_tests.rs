use std::time::Duration;

use stackreap_core::{
    DeletionRequest, DeletionResult, FailureReason, StackId, StackName, StackStatus, StackSummary, WaitPolicy,
};
use stackreap_provider::{DescribeStep, InMemoryProvider};
use stackreap_runner::{await_terminal, delete_batch, delete_stack};
use tokio::time::Instant;

fn stack(name: &str) -> StackSummary {
    StackSummary {
        name: StackName::from_str(name),
        id: StackId::from_str(format!("arn:aws:cloudformation:us-east-1:000000000000:stack/{name}/1")),
        status: StackStatus::CreateComplete,
        created_at_unix: 1_700_000_000,
        updated_at_unix: None,
    }
}

fn req(name: &str) -> DeletionRequest {
    DeletionRequest { stack_name: StackName::from_str(name) }
}

#[tokio::test(start_paused = true)]
async fn succeeds_when_poll_sees_delete_complete() {
    let p = InMemoryProvider::new().with_stack(stack("pit-a")).script_describe(
        "pit-a",
        [
            DescribeStep::Status(StackStatus::DeleteInProgress),
            DescribeStep::Status(StackStatus::DeleteInProgress),
            DescribeStep::Status(StackStatus::DeleteComplete),
        ],
    );

    let started = Instant::now();
    let out = delete_stack(&p, &req("pit-a"), &WaitPolicy::default()).await;

    assert_eq!(out.result, DeletionResult::Succeeded);
    assert_eq!(p.delete_calls(), vec![StackName::from_str("pit-a")]);
    assert_eq!(p.describe_calls("pit-a"), 3);
    // two backoff sleeps between three polls
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(30) && waited <= Duration::from_secs(60), "waited {waited:?}");
}

#[tokio::test(start_paused = true)]
async fn stack_vanishing_mid_wait_is_success() {
    let p = InMemoryProvider::new().with_stack(stack("pit-a"));
    let out = delete_stack(&p, &req("pit-a"), &WaitPolicy::default()).await;
    assert_eq!(out.result, DeletionResult::Succeeded);
}

#[tokio::test(start_paused = true)]
async fn failed_wait_then_not_found_is_already_gone() {
    let p = InMemoryProvider::new()
        .with_stack(stack("pit-a"))
        .script_describe("pit-a", [DescribeStep::Status(StackStatus::DeleteFailed), DescribeStep::NotFound]);

    let out = delete_stack(&p, &req("pit-a"), &WaitPolicy::default()).await;
    assert_eq!(out.result, DeletionResult::AlreadyGone);
    assert_eq!(p.describe_calls("pit-a"), 2);
}

#[tokio::test(start_paused = true)]
async fn timed_out_wait_then_not_found_is_already_gone() {
    let p = InMemoryProvider::new().with_stack(stack("pit-a")).script_describe(
        "pit-a",
        [DescribeStep::Status(StackStatus::DeleteInProgress), DescribeStep::Hang, DescribeStep::NotFound],
    );

    let policy = WaitPolicy::default();
    let started = Instant::now();
    let out = delete_stack(&p, &req("pit-a"), &policy).await;

    assert_eq!(out.result, DeletionResult::AlreadyGone);
    assert!(started.elapsed() >= policy.overall_timeout);
}

#[tokio::test(start_paused = true)]
async fn timeout_with_stack_still_present_fails() {
    let p = InMemoryProvider::new()
        .with_stack(stack("pit-a"))
        .script_describe("pit-a", [DescribeStep::Status(StackStatus::DeleteInProgress)]);

    let policy = WaitPolicy { overall_timeout: Duration::from_secs(5 * 60), ..WaitPolicy::default() };
    let started = Instant::now();
    let out = delete_stack(&p, &req("pit-a"), &policy).await;

    assert_eq!(out.result, DeletionResult::Failed(FailureReason::TimeoutExceeded));
    let waited = started.elapsed();
    assert!(waited >= policy.overall_timeout);
    assert!(waited < policy.overall_timeout + Duration::from_secs(1), "overran deadline: {waited:?}");
}

#[tokio::test(start_paused = true)]
async fn delete_failed_with_stack_present_carries_the_wait_error() {
    let p = InMemoryProvider::new()
        .with_stack(stack("pit-a"))
        .script_describe("pit-a", [DescribeStep::Status(StackStatus::DeleteFailed)]);

    let out = delete_stack(&p, &req("pit-a"), &WaitPolicy::default()).await;
    assert_eq!(out.result, DeletionResult::Failed(FailureReason::StackFailed(StackStatus::DeleteFailed)));
}

#[tokio::test(start_paused = true)]
async fn reconcile_describe_error_is_failure() {
    let p = InMemoryProvider::new().with_stack(stack("pit-a")).script_describe(
        "pit-a",
        [DescribeStep::Status(StackStatus::DeleteFailed), DescribeStep::Error("connection reset".into())],
    );

    let out = delete_stack(&p, &req("pit-a"), &WaitPolicy::default()).await;
    assert_eq!(out.result, DeletionResult::Failed(FailureReason::StackFailed(StackStatus::DeleteFailed)));
}

#[tokio::test(start_paused = true)]
async fn transient_poll_errors_are_retried() {
    let p = InMemoryProvider::new().with_stack(stack("pit-a")).script_describe(
        "pit-a",
        [
            DescribeStep::Error("Throttling: Rate exceeded".into()),
            DescribeStep::Error("Throttling: Rate exceeded".into()),
            DescribeStep::Status(StackStatus::DeleteComplete),
        ],
    );

    let out = delete_stack(&p, &req("pit-a"), &WaitPolicy::default()).await;
    assert_eq!(out.result, DeletionResult::Succeeded);
}

#[tokio::test(start_paused = true)]
async fn persistent_poll_errors_fail_after_reconcile() {
    let p = InMemoryProvider::new()
        .with_stack(stack("pit-a"))
        .script_describe("pit-a", [DescribeStep::Error("connection refused".into())]);

    let policy = WaitPolicy::default();
    let out = delete_stack(&p, &req("pit-a"), &policy).await;

    assert_eq!(out.result, DeletionResult::Failed(FailureReason::PollFailed("connection refused".into())));
    // initial poll + retries, then one reconcile describe
    assert_eq!(p.describe_calls("pit-a"), policy.max_poll_retries + 2);
}

#[tokio::test(start_paused = true)]
async fn reconcile_describe_that_hangs_is_cut_off() {
    let p = InMemoryProvider::new()
        .with_stack(stack("pit-a"))
        .script_describe("pit-a", [DescribeStep::Status(StackStatus::DeleteFailed), DescribeStep::Hang]);

    let policy = WaitPolicy::default();
    let started = Instant::now();
    let out = delete_stack(&p, &req("pit-a"), &policy).await;

    assert_eq!(out.result, DeletionResult::Failed(FailureReason::StackFailed(StackStatus::DeleteFailed)));
    assert_eq!(p.describe_calls("pit-a"), 2);
    assert!(started.elapsed() <= policy.reconcile_timeout, "waited {:?}", started.elapsed());
}

#[tokio::test(start_paused = true)]
async fn unanswered_delete_request_times_out() {
    let p = InMemoryProvider::new().with_stack(stack("pit-a")).hang_delete("pit-a");

    let policy = WaitPolicy { overall_timeout: Duration::from_secs(60), ..WaitPolicy::default() };
    let started = Instant::now();
    let out = delete_stack(&p, &req("pit-a"), &policy).await;

    assert_eq!(out.result, DeletionResult::Failed(FailureReason::TimeoutExceeded));
    assert_eq!(started.elapsed(), policy.overall_timeout);
    assert_eq!(p.describe_calls("pit-a"), 0);
}

#[tokio::test(start_paused = true)]
async fn hung_delete_request_does_not_stall_the_batch() {
    let stacks = vec![stack("pit-1"), stack("pit-2")];
    let p = InMemoryProvider::new()
        .with_stack(stacks[0].clone())
        .with_stack(stacks[1].clone())
        .hang_delete("pit-1");

    let policy = WaitPolicy { overall_timeout: Duration::from_secs(60), ..WaitPolicy::default() };
    let report = delete_batch(&p, &stacks, &policy).await;

    let results: Vec<_> = report.outcomes.iter().map(|o| (o.stack_name.as_str(), o.result.clone())).collect();
    assert_eq!(
        results,
        vec![
            ("pit-1", DeletionResult::Failed(FailureReason::TimeoutExceeded)),
            ("pit-2", DeletionResult::Succeeded),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn rejected_request_is_failed_without_polling() {
    let p = InMemoryProvider::new()
        .with_stack(stack("pit-a"))
        .reject_delete("pit-a", "AccessDenied", "not authorized to perform cloudformation:DeleteStack");

    let out = delete_stack(&p, &req("pit-a"), &WaitPolicy::default()).await;
    match out.result {
        DeletionResult::Failed(FailureReason::RequestRejected(msg)) => assert!(msg.starts_with("AccessDenied")),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(p.describe_calls("pit-a"), 0);
}

#[tokio::test(start_paused = true)]
async fn await_terminal_alone_polls_immediately() {
    let p = InMemoryProvider::new().script_describe("pit-a", [DescribeStep::Status(StackStatus::DeleteComplete)]);
    let started = Instant::now();
    let result = await_terminal(&p, &StackName::from_str("pit-a"), &WaitPolicy::default()).await;
    assert_eq!(result, DeletionResult::Succeeded);
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert!(p.delete_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn one_rejected_request_does_not_stop_the_batch() {
    let stacks = vec![stack("pit-1"), stack("pit-2"), stack("pit-3")];
    let p = InMemoryProvider::new()
        .with_stack(stacks[0].clone())
        .with_stack(stacks[1].clone())
        .with_stack(stacks[2].clone())
        .reject_delete("pit-2", "ValidationError", "Stack pit-2 has termination protection enabled");

    let report = delete_batch(&p, &stacks, &WaitPolicy::default()).await;

    let results: Vec<_> = report.outcomes.iter().map(|o| (o.stack_name.as_str(), o.result.is_success())).collect();
    assert_eq!(results, vec![("pit-1", true), ("pit-2", false), ("pit-3", true)]);
    assert_eq!(p.delete_calls().len(), 3);
    assert!(report.batch_id.is_some());
}
