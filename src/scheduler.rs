//! Fixed-interval tick scheduler.
//!
//! The scheduler never sleeps or spawns; the owner passes the current
//! `Instant` to `poll` and fires at most one tick per call. Stopping clears the
//! pending deadline, starting always begins a fresh interval.

use std::time::{Duration, Instant};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(3500);

#[derive(Clone, Debug)]
pub struct IntervalScheduler {
    interval: Duration,
    next_due: Option<Instant>,
    fired: u64,
}

impl IntervalScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            fired: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Start (or restart) with the first deadline one interval after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Deadline of the next tick, if running.
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Time left until the next tick; zero when overdue, `None` when stopped.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Returns true when a tick is due at `now`.
    ///
    /// A late poll fires once and reschedules from `now`; missed intervals are
    /// not replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                self.fired += 1;
                true
            }
            _ => false,
        }
    }

    /// Ticks fired since construction.
    pub fn fired(&self) -> u64 {
        self.fired
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}
