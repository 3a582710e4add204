//! Virtual clock and timer queue for one session
//!
//! The host advances the clock; due timers are then polled one at a time in
//! due-time order, ties broken by creation order. Handing out one firing at a
//! time lets a callback cancel a later timer before it is reached.

use std::collections::BTreeMap;

use crate::consts::MAX_CATCH_UP_TICKS;
use crate::sim::DelayToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// What a timer is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTag {
    /// Repeating game tick
    Tick,
    /// One-shot delayed transition
    Delay(DelayToken),
}

/// One timer firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub handle: TimerHandle,
    pub tag: TimerTag,
    /// Clock time the timer was due at
    pub at_ms: u64,
}

#[derive(Debug, Clone)]
struct Timer {
    tag: TimerTag,
    due_at: u64,
    /// `Some` for repeating timers
    interval_ms: Option<u64>,
}

#[derive(Debug)]
pub struct Scheduler {
    now: u64,
    /// Clock target of the current `advance`
    horizon: u64,
    timers: BTreeMap<TimerHandle, Timer>,
    next_handle: u64,
    released: u64,
    max_catch_up: u32,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_catch_up(MAX_CATCH_UP_TICKS)
    }

    pub fn with_catch_up(max_catch_up: u32) -> Self {
        Self {
            now: 0,
            horizon: 0,
            timers: BTreeMap::new(),
            next_handle: 0,
            released: 0,
            max_catch_up: max_catch_up.max(1),
        }
    }

    fn insert(&mut self, timer: Timer) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.timers.insert(handle, timer);
        handle
    }

    /// Repeating timer, first due one interval from now
    pub fn start(&mut self, interval_ms: u64, tag: TimerTag) -> TimerHandle {
        let interval_ms = interval_ms.max(1);
        self.insert(Timer {
            tag,
            due_at: self.now + interval_ms,
            interval_ms: Some(interval_ms),
        })
    }

    pub fn schedule_once(&mut self, delay_ms: u64, tag: TimerTag) -> TimerHandle {
        self.insert(Timer {
            tag,
            due_at: self.now + delay_ms,
            interval_ms: None,
        })
    }

    /// Release a timer. Returns false if it already fired (one-shot) or was
    /// already cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let removed = self.timers.remove(&handle).is_some();
        if removed {
            self.released += 1;
        }
        removed
    }

    /// Release every timer, returning how many were live
    pub fn cancel_all(&mut self) -> usize {
        let count = self.timers.len();
        self.timers.clear();
        self.released += count as u64;
        count
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(&handle)
    }

    /// Timers released through cancellation over the scheduler's lifetime
    pub fn released(&self) -> u64 {
        self.released
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Move the clock target forward. Repeating timers that fell more than
    /// the catch-up cap behind skip whole intervals, keeping their phase.
    pub fn advance(&mut self, elapsed_ms: u64) {
        self.horizon = self.horizon.max(self.now) + elapsed_ms;
        let horizon = self.horizon;
        let cap = u64::from(self.max_catch_up);

        for timer in self.timers.values_mut() {
            let Some(interval) = timer.interval_ms else {
                continue;
            };
            if timer.due_at > horizon {
                continue;
            }
            let due = (horizon - timer.due_at) / interval + 1;
            if due > cap {
                let skipped = due - cap;
                timer.due_at += skipped * interval;
                log::debug!("Scheduler dropped {skipped} backlogged ticks ({interval}ms)");
            }
        }
    }

    /// Next due timer, if any, moving the clock to its due time. When nothing
    /// is due the clock settles at the advance target.
    pub fn poll(&mut self) -> Option<Fired> {
        let next = self
            .timers
            .iter()
            .filter(|(_, t)| t.due_at <= self.horizon)
            .min_by_key(|(handle, t)| (t.due_at, **handle))
            .map(|(handle, _)| *handle);

        let Some(handle) = next else {
            self.now = self.now.max(self.horizon);
            return None;
        };

        let timer = self.timers.get_mut(&handle)?;
        let at_ms = timer.due_at;
        let tag = timer.tag;
        self.now = self.now.max(at_ms);
        match timer.interval_ms {
            Some(interval) => timer.due_at += interval,
            None => {
                self.timers.remove(&handle);
            }
        }

        Some(Fired { handle, tag, at_ms })
    }
}
