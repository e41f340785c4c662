//! Windowed login lockout. History is append-only; a success never erases
//! past failures, the window simply slides past them.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy)]
pub struct LockoutPolicy {
    pub threshold: u32,
    pub window: Duration,
}

impl LockoutPolicy {
    pub fn from_settings(settings: &configs::AuthSettings) -> Self {
        Self {
            threshold: settings.lockout_threshold,
            window: Duration::minutes(settings.lockout_window_minutes),
        }
    }

    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.window
    }

    /// Exactly-at-threshold locks; threshold minus one does not.
    pub fn locks(&self, recent_failures: u64) -> bool {
        recent_failures >= self.threshold as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_boundary() {
        let policy = LockoutPolicy { threshold: 5, window: Duration::minutes(15) };
        assert!(!policy.locks(4));
        assert!(policy.locks(5));
        assert!(policy.locks(6));
    }

    #[test]
    fn window_start_is_trailing() {
        let policy = LockoutPolicy { threshold: 5, window: Duration::minutes(15) };
        let now = Utc::now();
        assert_eq!(policy.window_start(now), now - Duration::minutes(15));
    }
}
