//! Wall clock abstraction so freshness decisions can be tested

#[cfg(test)]
use mockall::automock;

/// Source of the current time in epoch seconds
#[cfg_attr(test, automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// The system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}
