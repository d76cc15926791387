//! Process-wide monotonic counter for the low 3 bytes of an XID.

use once_cell::sync::Lazy;
use rand::random_range;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Largest value the 24-bit counter field can hold.
pub const COUNTER_MASK: u32 = 0x00FF_FFFF;

static GLOBAL_COUNTER: Lazy<Arc<Counter>> = Lazy::new(|| Arc::new(Counter::random()));

/// A 24-bit counter shared by every generation in a process.
///
/// `next()` is a single `fetch_add`, so concurrent callers never observe the
/// same value twice (until the field wraps). The backing `AtomicU32` wraps at
/// 2^32, which is a multiple of 2^24, so masking the post-increment value
/// gives a clean modulo 2^24 sequence.
#[derive(Debug)]
pub struct Counter {
    value: AtomicU32,
}

impl Counter {
    /// Create a counter seeded uniformly over the full 24-bit range.
    pub fn random() -> Self {
        let seed = random_range(0..=COUNTER_MASK);
        tracing::debug!(seed, "seeded xid counter");
        Self::starting_at(seed)
    }

    /// The process-wide counter, randomly seeded on first use.
    pub fn global() -> Arc<Counter> {
        Arc::clone(&GLOBAL_COUNTER)
    }

    /// Create a counter whose first `next()` returns `(start + 1) mod 2^24`.
    pub fn starting_at(start: u32) -> Self {
        Self {
            value: AtomicU32::new(start & COUNTER_MASK),
        }
    }

    /// Atomically advance the counter and return the new 24-bit value.
    #[inline]
    pub fn next(&self) -> u32 {
        self.value.fetch_add(1, Ordering::Relaxed).wrapping_add(1) & COUNTER_MASK
    }

    /// Current value without advancing.
    pub fn current(&self) -> u32 {
        self.value.load(Ordering::Relaxed) & COUNTER_MASK
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::random()
    }
}
