//! Owned game-time timers
//!
//! Timers never run on their own: the round advances them with the frame
//! delta it receives from the host. A cancelled timer is inert until it is
//! armed again, so a stale firing cannot exist.

use serde::{Deserialize, Serialize};

/// A repeating timer measured in game milliseconds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    interval_ms: u32,
    elapsed_ms: u32,
    armed: bool,
}

impl Timer {
    /// Start (or restart) the timer with a new interval
    pub fn arm(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms.max(1);
        self.elapsed_ms = 0;
        self.armed = true;
    }

    /// Stop the timer. Safe to call any number of times.
    pub fn cancel(&mut self) {
        self.armed = false;
        self.elapsed_ms = 0;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Milliseconds until the next firing, `None` when cancelled
    pub fn until_fire(&self) -> Option<u32> {
        self.armed.then(|| self.interval_ms - self.elapsed_ms)
    }

    /// Advance by `dt_ms`. Returns true if the timer reached its deadline.
    ///
    /// The caller must not step past `until_fire()`; the round splits frame
    /// deltas at every deadline so firings are handled one at a time. After
    /// a firing the timer is re-armed with the same interval; call `arm`
    /// to change it.
    pub fn advance(&mut self, dt_ms: u32) -> bool {
        if !self.armed {
            return false;
        }
        self.elapsed_ms = (self.elapsed_ms + dt_ms).min(self.interval_ms);
        if self.elapsed_ms == self.interval_ms {
            self.elapsed_ms = 0;
            true
        } else {
            false
        }
    }
}
