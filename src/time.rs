//! Time abstraction for testability.
//!
//! Signed sends stamp the request with the current Unix time. The
//! [`Clock`] trait lets tests pin that value instead of racing the
//! system clock.

use std::time::SystemTime;

/// Abstraction over system time.
///
/// # Example
///
/// ```
/// use feishu_webhook::time::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// assert!(clock.unix_timestamp() > 1_600_000_000);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> SystemTime;

    /// Returns the current time as whole seconds since the Unix epoch.
    ///
    /// Pre-epoch times clamp to 0.
    fn unix_timestamp(&self) -> u64 {
        self.now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs())
    }
}

/// Production clock using actual system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}
