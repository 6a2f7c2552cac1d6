//! Injected sources of non-determinism: time and ticket codes.

use crate::types::TicketCode;
use chrono::{DateTime, Utc};
use rand::Rng;

/// Clock trait - abstracts time operations for testability
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Allocates ticket codes.
///
/// Implementations need not guarantee uniqueness themselves: the ticket store
/// rejects a reused code with `DuplicateCode`, which the purchase path turns
/// into a retryable error.
pub trait CodeGenerator: Send + Sync {
    /// Produce the next code
    fn next_code(&self) -> TicketCode;
}

/// Unambiguous alphabet (no `0/O`, `1/I`), 32 symbols.
const CODE_ALPHABET: &[u8; 32] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";

/// Random characters per code (5 bits each).
pub const CODE_LENGTH: usize = 10;

/// Default code prefix.
pub const DEFAULT_CODE_PREFIX: &str = "TKT";

/// Random, human-readable codes such as `TKT-7QK2M9XHRA`.
#[derive(Clone, Debug)]
pub struct RandomCodeGenerator {
    prefix: String,
}

impl RandomCodeGenerator {
    /// Creates a generator with a custom prefix
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The prefix placed before the `-`
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_CODE_PREFIX)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn next_code(&self) -> TicketCode {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..CODE_LENGTH)
            .map(|_| char::from(CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())]))
            .collect();
        TicketCode::new(format!("{}-{suffix}", self.prefix))
    }
}
