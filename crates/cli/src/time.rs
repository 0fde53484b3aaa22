// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Inter-attempt waiting.
//!
//! The retry executor waits through a [`Sleeper`] so tests can observe the
//! requested delays without wall-clock waits, and so a supervisor can
//! interrupt a real wait.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// A wait was cut short by an interrupt request.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Interrupted while waiting {requested:?} before the next attempt")]
pub struct Interrupted {
    pub requested: Duration,
}

/// Blocking wait between attempts
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted>;
}

/// Real sleeper that blocks the calling thread.
///
/// An [`Interrupter`] obtained from it wakes a pending wait, which then fails
/// with [`Interrupted`]. An interrupt requested while no wait is pending is
/// delivered to the next wait.
#[derive(Clone, Debug, Default)]
pub struct ThreadSleeper {
    signal: Arc<(Mutex<bool>, Condvar)>,
}

impl ThreadSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle that interrupts waits on this sleeper
    pub fn interrupter(&self) -> Interrupter {
        Interrupter {
            signal: Arc::clone(&self.signal),
        }
    }
}

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        let (lock, cvar) = &*self.signal;
        let deadline = Instant::now() + duration;
        let mut interrupted = lock.lock();
        while !*interrupted {
            if cvar.wait_until(&mut interrupted, deadline).timed_out() {
                break;
            }
        }
        if *interrupted {
            *interrupted = false;
            return Err(Interrupted {
                requested: duration,
            });
        }
        Ok(())
    }
}

/// Cross-thread interrupt for a [`ThreadSleeper`]
#[derive(Clone, Debug)]
pub struct Interrupter {
    signal: Arc<(Mutex<bool>, Condvar)>,
}

impl Interrupter {
    pub fn interrupt(&self) {
        let (lock, cvar) = &*self.signal;
        *lock.lock() = true;
        cvar.notify_all();
    }
}

/// Test sleeper that records requested delays and returns immediately
#[derive(Clone, Debug, Default)]
pub struct RecordingSleeper {
    requested: Arc<Mutex<Vec<Duration>>>,
    interrupt_at: Option<usize>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `n`th wait (zero-based) with [`Interrupted`]
    pub fn interrupt_at(mut self, n: usize) -> Self {
        self.interrupt_at = Some(n);
        self
    }

    /// Delays requested so far, including an interrupted one
    pub fn requested(&self) -> Vec<Duration> {
        self.requested.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.requested.lock().len()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        let mut requested = self.requested.lock();
        let index = requested.len();
        requested.push(duration);
        if self.interrupt_at == Some(index) {
            return Err(Interrupted {
                requested: duration,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod tests;
