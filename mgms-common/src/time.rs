//! Monotonic time utilities
//!
//! Timers in the signal core follow a "capture at schedule, compare at fire"
//! pattern: a timer records the instant it was scheduled and, when it fires,
//! compares that instant against the context's last-input timestamp. A stale
//! timer is a no-op, never an error.
//!
//! `tokio::time::Instant` is used (rather than `std::time::Instant`) so that
//! paused-clock tests can drive timer expiry deterministically.

use tokio::time::Instant;

/// Get the current monotonic instant.
pub fn monotonic_now() -> Instant {
    Instant::now()
}

/// Convert milliseconds to a duration.
pub fn millis_to_duration(millis: u64) -> std::time::Duration {
    std::time::Duration::from_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_monotonic_now_advances() {
        let t1 = monotonic_now();
        tokio::time::sleep(Duration::from_millis(10)).await;
        let t2 = monotonic_now();
        assert!(t2 > t1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_monotonic_now_with_paused_clock() {
        let t1 = monotonic_now();
        tokio::time::advance(Duration::from_secs(5)).await;
        let t2 = monotonic_now();
        assert_eq!(t2.duration_since(t1), Duration::from_secs(5));
    }

    #[test]
    fn test_millis_to_duration() {
        assert_eq!(millis_to_duration(0), Duration::from_millis(0));
        assert_eq!(millis_to_duration(1000), Duration::from_secs(1));
        assert_eq!(millis_to_duration(3_600_000), Duration::from_secs(3600));
    }
}
