//! Generation-guarded deadline table
//!
//! All timer-driven re-transitions (error display, cooldown, delayed buffer
//! clear, countdown tick) are scheduled here. Every deadline is stamped with
//! the generation current at scheduling time; a mode change bumps the
//! generation and drops everything pending, so a stale timer can never
//! mutate state the machine has already left behind.

use std::time::Instant;

/// The timer-driven actions the controller knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerKind {
    /// Hide the transient error flag
    ErrorClear,
    /// Re-enable keypad input after the per-attempt cooldown
    CooldownUnlock,
    /// Clear the entered buffer after a Set-mode mismatch display window
    BufferClear,
    /// Advance the lockout countdown
    CountdownTick,
}

#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    generation: u64,
}

/// At most one pending deadline per kind.
#[derive(Debug, Default)]
pub(crate) struct TimerTable {
    generation: u64,
    error_clear: Option<Deadline>,
    cooldown_unlock: Option<Deadline>,
    buffer_clear: Option<Deadline>,
    countdown_tick: Option<Deadline>,
}

impl TimerTable {
    /// Schedule `kind` at `at`, superseding any pending deadline of the same
    /// kind.
    pub fn schedule(&mut self, kind: TimerKind, at: Instant) {
        *self.slot(kind) = Some(Deadline {
            at,
            generation: self.generation,
        });
    }

    /// Drop a pending deadline of the given kind, if any.
    pub fn cancel(&mut self, kind: TimerKind) {
        *self.slot(kind) = None;
    }

    /// Bump the generation and drop all pending deadlines.
    pub fn invalidate_all(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.error_clear = None;
        self.cooldown_unlock = None;
        self.buffer_clear = None;
        self.countdown_tick = None;
    }

    /// Take the kinds due at `now`, in a fixed order. Deadlines stamped with
    /// an older generation are discarded without firing.
    pub fn take_due(&mut self, now: Instant) -> Vec<TimerKind> {
        let mut due = Vec::new();
        for kind in [
            TimerKind::ErrorClear,
            TimerKind::CooldownUnlock,
            TimerKind::BufferClear,
            TimerKind::CountdownTick,
        ] {
            let generation = self.generation;
            let slot = self.slot(kind);
            if let Some(deadline) = *slot {
                if deadline.generation != generation {
                    *slot = None;
                } else if deadline.at <= now {
                    *slot = None;
                    due.push(kind);
                }
            }
        }
        due
    }

    fn slot(&mut self, kind: TimerKind) -> &mut Option<Deadline> {
        match kind {
            TimerKind::ErrorClear => &mut self.error_clear,
            TimerKind::CooldownUnlock => &mut self.cooldown_unlock,
            TimerKind::BufferClear => &mut self.buffer_clear,
            TimerKind::CountdownTick => &mut self.countdown_tick,
        }
    }
}
