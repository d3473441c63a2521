//! Deferred work. The core never sleeps: it hands a [`Timer`] to the host's
//! [`Scheduler`] and the host calls back into the session when it fires.

use crate::round::RoundId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timer {
    /// Gap between the two halves of the announcement with this ticket.
    Pause { ticket: u64 },
    /// Deal the round after `round`, once it has been resolved.
    NextRound { round: RoundId },
}

pub trait Scheduler {
    fn schedule(&mut self, timer: Timer, delay_ms: u32);
}

/// Collects scheduled timers without running them; the host (or a test)
/// drains and fires them itself.
#[derive(Debug, Default)]
pub struct TimerQueue {
    pending: Vec<(Timer, u32)>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[(Timer, u32)] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<(Timer, u32)> {
        std::mem::take(&mut self.pending)
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, timer: Timer, delay_ms: u32) {
        self.pending.push((timer, delay_ms));
    }
}
