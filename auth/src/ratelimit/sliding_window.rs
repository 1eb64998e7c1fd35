use std::cmp;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;

/// Sliding window rate limiter keyed by arbitrary string identities.
///
/// Tracks unix-second timestamps of prior attempts per identity. An attempt
/// is allowed while fewer than `max_attempts` fall inside the trailing
/// window; rejected attempts are not recorded. Callers key instances by
/// whatever identity they throttle on, typically a username or a peer
/// address.
///
/// The ledger sits behind a mutex so a multi-threaded server can share one
/// instance; `cleanup` should run periodically to keep memory bounded when
/// one-off identities come and go.
pub struct SlidingWindowLimiter {
    /// Chronologically ordered attempt timestamps per identity
    attempts: Mutex<HashMap<String, Vec<i64>>>,
    max_attempts: usize,
    window_seconds: i64,
}

impl SlidingWindowLimiter {
    /// Create a new rate limiter.
    ///
    /// # Arguments
    /// * `max_attempts` - Maximum attempts allowed inside the window
    /// * `window_seconds` - Length of the trailing window in seconds
    pub fn new(max_attempts: usize, window_seconds: i64) -> Self {
        Self {
            attempts: Mutex::new(HashMap::new()),
            max_attempts,
            window_seconds,
        }
    }

    /// Check whether an attempt by `identity` is allowed and record it.
    ///
    /// Returns `true` if the attempt is allowed, `false` if rate limited.
    pub fn attempt(&self, identity: &str) -> bool {
        self.attempt_at(identity, Utc::now().timestamp())
    }

    fn attempt_at(&self, identity: &str, now: i64) -> bool {
        let mut attempts = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        let entry = attempts.entry(identity.to_string()).or_default();

        trim_expired(now - self.window_seconds, entry);

        if entry.len() >= self.max_attempts {
            return false;
        }
        entry.push(now);
        true
    }

    /// Drop expired timestamps everywhere and forget idle identities.
    ///
    /// Bounds memory growth from identities that attempted once and never
    /// came back.
    pub fn cleanup(&self) {
        self.cleanup_at(Utc::now().timestamp());
    }

    fn cleanup_at(&self, now: i64) {
        let cutoff = now - self.window_seconds;
        let mut attempts = self.attempts.lock().unwrap_or_else(|e| e.into_inner());

        attempts.retain(|_, stamps| {
            trim_expired(cutoff, stamps);
            !stamps.is_empty()
        });
    }

    /// Sweep period for the periodic cleanup: a tenth of the window,
    /// never more often than every ten seconds.
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(cmp::max(self.window_seconds / 10, 10) as u64)
    }

    /// Number of identities currently holding recorded attempts.
    pub fn tracked_identities(&self) -> usize {
        self.attempts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

/// Timestamps are appended in order, so expiry is a prefix trim.
fn trim_expired(cutoff: i64, stamps: &mut Vec<i64>) {
    let expired = stamps.partition_point(|&t| t < cutoff);
    if expired > 0 {
        stamps.drain(..expired);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_max_attempts() {
        let limiter = SlidingWindowLimiter::new(5, 60);

        for _ in 0..5 {
            assert!(limiter.attempt_at("alice", 100));
        }
    }

    #[test]
    fn test_rejects_attempt_over_limit() {
        let limiter = SlidingWindowLimiter::new(3, 60);

        assert!(limiter.attempt_at("alice", 100));
        assert!(limiter.attempt_at("alice", 101));
        assert!(limiter.attempt_at("alice", 102));
        assert!(!limiter.attempt_at("alice", 103));
    }

    #[test]
    fn test_rejected_attempts_are_not_recorded() {
        let limiter = SlidingWindowLimiter::new(1, 60);

        assert!(limiter.attempt_at("alice", 100));
        // Rejections must not extend the window.
        assert!(!limiter.attempt_at("alice", 150));
        assert!(limiter.attempt_at("alice", 161));
    }

    #[test]
    fn test_identities_are_independent() {
        let limiter = SlidingWindowLimiter::new(2, 60);

        assert!(limiter.attempt_at("alice", 100));
        assert!(limiter.attempt_at("alice", 100));
        assert!(!limiter.attempt_at("alice", 100));

        assert!(limiter.attempt_at("bob", 100));
        assert!(limiter.attempt_at("bob", 100));
        assert!(!limiter.attempt_at("bob", 100));
    }

    #[test]
    fn test_window_advances_past_oldest_attempt() {
        let limiter = SlidingWindowLimiter::new(3, 60);

        assert!(limiter.attempt_at("alice", 100));
        assert!(limiter.attempt_at("alice", 110));
        assert!(limiter.attempt_at("alice", 120));
        assert!(!limiter.attempt_at("alice", 159));

        // The attempt at 100 has left the trailing window.
        assert!(limiter.attempt_at("alice", 161));
        assert!(!limiter.attempt_at("alice", 162));
    }

    #[test]
    fn test_cleanup_forgets_idle_identities() {
        let limiter = SlidingWindowLimiter::new(5, 60);

        limiter.attempt_at("alice", 100);
        limiter.attempt_at("bob", 130);
        assert_eq!(limiter.tracked_identities(), 2);

        limiter.cleanup_at(170);
        assert_eq!(limiter.tracked_identities(), 1);

        limiter.cleanup_at(200);
        assert_eq!(limiter.tracked_identities(), 0);
    }

    #[test]
    fn test_cleanup_interval_scales_with_window() {
        assert_eq!(
            SlidingWindowLimiter::new(5, 3600).cleanup_interval(),
            Duration::from_secs(360)
        );
        // Short windows still sweep no more often than every ten seconds.
        assert_eq!(
            SlidingWindowLimiter::new(5, 30).cleanup_interval(),
            Duration::from_secs(10)
        );
    }
}
