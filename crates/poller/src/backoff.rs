//! Bounded short-retry window.
//!
//! After a failed cycle the loop retries quickly a few times, then falls back
//! to the normal interval. The counter is non-zero only while inside that
//! window.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    count: u32,
    max_short_retries: u32,
    short: Duration,
    long: Duration,
}

impl RetryState {
    pub fn new(max_short_retries: u32, short: Duration, long: Duration) -> Self {
        Self {
            count: 0,
            max_short_retries,
            short,
            long,
        }
    }

    /// Consecutive short retries taken so far.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Sleep after a failed cycle.
    pub fn after_failure(&mut self) -> Duration {
        if self.count < self.max_short_retries {
            self.count += 1;
            self.short
        } else {
            self.count = 0;
            self.long
        }
    }

    /// Sleep after a cycle that needs no retry.
    pub fn after_success(&mut self) -> Duration {
        self.count = 0;
        self.long
    }

    pub fn is_short(&self, delay: Duration) -> bool {
        delay == self.short && self.short != self.long
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT: Duration = Duration::from_secs(5);
    const LONG: Duration = Duration::from_secs(1200);

    #[test]
    fn test_three_short_then_long() {
        let mut state = RetryState::new(3, SHORT, LONG);

        assert_eq!(state.after_failure(), SHORT);
        assert_eq!(state.count(), 1);
        assert_eq!(state.after_failure(), SHORT);
        assert_eq!(state.after_failure(), SHORT);
        assert_eq!(state.count(), 3);

        assert_eq!(state.after_failure(), LONG);
        assert_eq!(state.count(), 0);

        // Window opens again after the long sleep
        assert_eq!(state.after_failure(), SHORT);
        assert_eq!(state.count(), 1);
    }

    #[test]
    fn test_success_resets() {
        let mut state = RetryState::new(3, SHORT, LONG);
        state.after_failure();
        state.after_failure();

        assert_eq!(state.after_success(), LONG);
        assert_eq!(state.count(), 0);
        assert_eq!(state.after_failure(), SHORT);
    }

    #[test]
    fn test_zero_retries_always_long() {
        let mut state = RetryState::new(0, SHORT, LONG);
        assert_eq!(state.after_failure(), LONG);
        assert_eq!(state.after_failure(), LONG);
        assert_eq!(state.count(), 0);
    }
}
