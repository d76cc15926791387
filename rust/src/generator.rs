//! XID generation.
//!
//! A generator composes the wall clock, an [`IdentitySeed`] and a shared
//! [`Counter`]. Generators built with [`XidGen::new`] all draw from the
//! process-wide counter. Generation takes `&self` and never fails, so one
//! generator can be shared freely between threads.

use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::counter::Counter;
use crate::seed::IdentitySeed;
use crate::xid::Xid;

static GLOBAL_GEN: Lazy<XidGen> = Lazy::new(XidGen::default);

/// Source of whole Unix seconds for the timestamp field.
pub trait TimeSource {
    fn current_secs(&self) -> u32;
}

/// Wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_secs(&self) -> u32 {
        // Before-epoch clocks read as 0; past 2106 the value wraps like any
        // 32-bit unix-second counter.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0)
    }
}

/// XID generator.
#[derive(Debug)]
pub struct XidGen<T = SystemClock> {
    seed: IdentitySeed,
    counter: Arc<Counter>,
    clock: T,
}

impl XidGen<SystemClock> {
    /// Generator using the process seed, the process counter and the system
    /// clock.
    pub fn new() -> Self {
        Self::with_parts(*IdentitySeed::global(), Counter::global(), SystemClock)
    }

    /// The process-wide generator used by [`new_xid`].
    pub fn global() -> &'static XidGen {
        &GLOBAL_GEN
    }
}

impl Default for XidGen<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSource> XidGen<T> {
    /// Generator from explicit parts. Pass an `Arc<Counter>` to share one
    /// counter between several generators.
    pub fn with_parts(seed: IdentitySeed, counter: impl Into<Arc<Counter>>, clock: T) -> Self {
        Self {
            seed,
            counter: counter.into(),
            clock,
        }
    }

    /// Generate the next XID.
    #[inline]
    pub fn next_xid(&self) -> Xid {
        self.xid_at(self.clock.current_secs())
    }

    /// Generate an XID stamped with `timestamp` instead of the clock.
    pub fn xid_at(&self, timestamp: u32) -> Xid {
        Xid::from_parts(
            timestamp,
            self.seed.machine_discriminator(),
            self.seed.process_discriminator(),
            self.counter.next(),
        )
    }

    /// Generate n XIDs.
    pub fn next_n(&self, n: usize) -> Vec<Xid> {
        (0..n).map(|_| self.next_xid()).collect()
    }

    pub fn seed(&self) -> &IdentitySeed {
        &self.seed
    }
}

/// Generate an XID from the process-wide generator.
pub fn new_xid() -> Xid {
    XidGen::global().next_xid()
}
