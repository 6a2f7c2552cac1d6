use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use ticketing_core::TicketCode;
use ticketing_core::environment::{Clock, CodeGenerator};

/// Fixed clock for deterministic tests
///
/// Always returns the same time, making tests reproducible.
///
/// # Example
///
/// ```
/// use ticketing_testing::mocks::FixedClock;
/// use ticketing_core::environment::Clock;
/// use chrono::Utc;
///
/// let clock = FixedClock::new(Utc::now());
/// assert_eq!(clock.now(), clock.now());
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock with the given time
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}

/// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
#[must_use]
pub fn test_clock() -> FixedClock {
    FixedClock::new(DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default())
}

/// Produces `TKT-000001`, `TKT-000002`, ...
#[derive(Debug, Default)]
pub struct SequentialCodeGenerator {
    next: AtomicU64,
}

impl SequentialCodeGenerator {
    /// Create a generator starting at 1
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }
}

impl CodeGenerator for SequentialCodeGenerator {
    fn next_code(&self) -> TicketCode {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        TicketCode::new(format!("TKT-{n:06}"))
    }
}

/// Always produces the same code, to force `DuplicateCode` from a store.
#[derive(Debug, Clone)]
pub struct RepeatingCodeGenerator {
    code: TicketCode,
}

impl RepeatingCodeGenerator {
    /// Create a generator that always returns `code`
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: TicketCode::new(code),
        }
    }
}

impl CodeGenerator for RepeatingCodeGenerator {
    fn next_code(&self) -> TicketCode {
        self.code.clone()
    }
}
