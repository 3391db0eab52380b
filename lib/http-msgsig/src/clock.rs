//!
//! Source of the current time
//!
//! Signers stamp `created`/`expires` with it, verifiers check expiry against it.
//! Swap it out in tests to freeze or shift time.
//!

use std::time::SystemTime;

/// Clock abstraction
pub trait Clock: Send + Sync {
    /// Read the current time
    fn now(&self) -> SystemTime;
}

/// Clock reading from the system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> SystemTime + Send + Sync,
{
    #[inline]
    fn now(&self) -> SystemTime {
        self()
    }
}
