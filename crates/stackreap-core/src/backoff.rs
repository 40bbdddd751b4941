use std::time::Duration;

/// Timing knobs for the delete-and-wait loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaitPolicy {
    pub poll_min_interval: Duration,
    pub poll_max_interval: Duration,
    pub overall_timeout: Duration,
    /// Consecutive failed polls tolerated before the wait gives up.
    pub max_poll_retries: u32,
    pub reconcile_timeout: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            poll_min_interval: Duration::from_secs(15),
            poll_max_interval: Duration::from_secs(30),
            overall_timeout: Duration::from_secs(30 * 60),
            max_poll_retries: 3,
            reconcile_timeout: Duration::from_secs(60),
        }
    }
}

/// Delay before poll number `attempt + 1` (attempt 1 is the immediate first poll).
///
/// The ceiling doubles from `poll_min_interval` per attempt and is capped at
/// `poll_max_interval`; the delay is drawn uniformly from `[min, ceiling]` using `jitter`
/// in `[0, 1)`, and never exceeds `remaining`.
pub fn poll_delay(policy: &WaitPolicy, attempt: u32, jitter: f64, remaining: Duration) -> Duration {
    let min = policy.poll_min_interval;
    let max = policy.poll_max_interval.max(min);

    let exp = attempt.saturating_sub(1).min(16);
    let ceiling = min.saturating_mul(1u32 << exp).min(max);

    let span = ceiling.saturating_sub(min);
    let jitter = jitter.clamp(0.0, 1.0);
    let delay = min + span.mul_f64(jitter);
    delay.min(remaining)
}
