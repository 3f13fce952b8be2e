//! Deferred one-shot continuations.
//!
//! A continuation is a plain value (`J`) handed over by ownership when it is
//! scheduled and handed back when it falls due. The scheduler never calls
//! anything itself; the owner drains due jobs on its cooperative tick.
//!
//! Cancelling is idempotent: cancelling a job that already fired, was already
//! cancelled, or never existed returns `false` and changes nothing.

use embassy_time::{Duration, Instant};
use heapless::Vec;

use crate::config::MAX_TIMERS;

/// Handle to a scheduled continuation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerId(u32);

struct Timer<J> {
    id: TimerId,
    due: Instant,
    job: J,
}

/// Fixed-capacity one-shot timer queue.
pub struct Scheduler<J> {
    pending: Vec<Timer<J>, MAX_TIMERS>,
    next_id: u32,
}

impl<J> Scheduler<J> {
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// Run `job` once, `after` from `now`.
    ///
    /// When every slot is taken the job is handed back in `Err` so the caller
    /// can run it right away instead of losing it.
    pub fn schedule(
        &mut self,
        now: Instant,
        after: Duration,
        job: J,
    ) -> Result<TimerId, J> {
        let id = TimerId(self.next_id);
        let timer = Timer {
            id,
            due: now + after,
            job,
        };
        match self.pending.push(timer) {
            Ok(()) => {
                self.next_id = self.next_id.wrapping_add(1);
                Ok(id)
            }
            Err(timer) => Err(timer.job),
        }
    }

    /// Drop a pending continuation. Returns whether one was removed.
    pub fn cancel(
        &mut self,
        id: TimerId,
    ) -> bool {
        match self.pending.iter().position(|t| t.id == id) {
            Some(pos) => {
                self.pending.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Whether `id` is still waiting to fire.
    pub fn is_pending(
        &self,
        id: TimerId,
    ) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    /// Take the earliest continuation due at `now`, if any.
    ///
    /// Jobs due at the same instant come out in scheduling order.
    pub fn pop_due(
        &mut self,
        now: Instant,
    ) -> Option<(TimerId, J)> {
        let mut earliest: Option<usize> = None;
        for (i, timer) in self.pending.iter().enumerate() {
            if timer.due > now {
                continue;
            }
            if earliest.is_none_or(|e| timer.due < self.pending[e].due) {
                earliest = Some(i);
            }
        }
        let timer = self.pending.remove(earliest?);
        Some((timer.id, timer.job))
    }

    /// Number of pending continuations.
    #[inline]
    pub fn len(&self) -> usize { self.pending.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.pending.is_empty() }
}

impl<J> Default for Scheduler<J> {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================
