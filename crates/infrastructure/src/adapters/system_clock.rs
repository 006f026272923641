//! System clock adapter

use chrono::{DateTime, Utc};
use costcheck_application::ports::Clock;

/// System clock implementation using the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_month_is_current() {
        let clock = SystemClock::new();
        let (year, month) = clock.year_month();
        assert!(year >= 2024);
        assert!((1..=12).contains(&month));
    }
}
