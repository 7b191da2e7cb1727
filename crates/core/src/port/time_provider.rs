// Time Provider Port (for testability)

use chrono::{DateTime, Local};

/// Time provider interface (allows fixed clocks in tests)
pub trait TimeProvider: Send + Sync {
    /// Current local wall-clock time
    fn now(&self) -> DateTime<Local>;
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use chrono::TimeZone;

    /// Clock frozen at a single instant
    pub struct FixedTimeProvider {
        now: DateTime<Local>,
    }

    impl FixedTimeProvider {
        pub fn new(now: DateTime<Local>) -> Self {
            Self { now }
        }

        /// Build from local calendar fields
        pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
            let now = Local
                .with_ymd_and_hms(year, month, day, hour, min, sec)
                .earliest()
                .unwrap_or_else(Local::now);
            Self::new(now)
        }
    }

    impl TimeProvider for FixedTimeProvider {
        fn now(&self) -> DateTime<Local> {
            self.now
        }
    }
}
