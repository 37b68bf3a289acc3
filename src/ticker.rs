use std::time::Duration;

/// UI poll interval in milliseconds. The countdown itself ticks once a second
/// on the timer thread; this only bounds how long an update waits to be drawn.
pub const DEFAULT_POLL_MS: u64 = 100;

/// Get poll duration
pub fn poll_duration() -> Duration {
    Duration::from_millis(DEFAULT_POLL_MS)
}
