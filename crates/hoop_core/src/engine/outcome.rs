//! Sequential-goal outcome detection
//!
//! A make is only counted when the ball passes an ordered list of trigger
//! volumes in exactly that order (top of the rim, then the net, ...). A miss
//! is declared when a bounded watch elapses after a throw without the
//! sequence completing.
//!
//! The watch is cooperative: it is driven by the same tick clock as the rest
//! of the core, polled once per tick, never blocking. Success is delivered as
//! an explicit cancellation rather than a shared flag, so a delayed miss can
//! never fire after a make.

use tracing::{debug, info};

use crate::engine::types::TriggerId;

/// Result of feeding one contact event to the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceProgress {
    /// Contact did not match the next expected volume; cursor unchanged
    Ignored,
    /// Contact matched; cursor advanced but the sequence is not complete
    Advanced,
    /// Contact completed the full ordered sequence; cursor reset to 0
    Completed,
}

/// Ordered-contact cursor over a list of trigger volumes.
///
/// Invariant: the cursor only advances when the *next expected* volume
/// registers a contact; any other contact (out of order, duplicate, unknown)
/// is a no-op.
#[derive(Debug, Clone)]
pub struct GoalSequencer {
    sequence: Vec<TriggerId>,
    cursor: usize,
}

impl GoalSequencer {
    pub fn new(sequence: Vec<TriggerId>) -> Self {
        Self { sequence, cursor: 0 }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Feed one contact event from the external collision system
    pub fn register_contact(&mut self, id: TriggerId) -> SequenceProgress {
        match self.sequence.get(self.cursor) {
            Some(&expected) if expected == id => {
                self.cursor += 1;
                if self.cursor == self.sequence.len() {
                    debug!(?id, "goal sequence completed");
                    self.cursor = 0;
                    SequenceProgress::Completed
                } else {
                    debug!(?id, cursor = self.cursor, "goal sequence advanced");
                    SequenceProgress::Advanced
                }
            }
            _ => SequenceProgress::Ignored,
        }
    }

    /// Reset the cursor; called on any release of the object and after
    /// either outcome
    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

/// Miss report produced when a watch deadline elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissReport {
    pub throw_id: u64,
}

/// At most one pending watch per object
#[derive(Debug, Clone, Copy)]
struct PendingWatch {
    throw_id: u64,
    elapsed_s: f32,
}

/// Bounded-time watch judging a throw as make or miss.
///
/// Armed on every throw; a new throw supersedes (not stacks) the previous
/// watch. Cancelled with no report when a success arrives before the
/// deadline; otherwise fires exactly one miss report at the deadline.
#[derive(Debug, Clone)]
pub struct OutcomeDetector {
    wait_time_s: f32,
    watch: Option<PendingWatch>,
}

impl OutcomeDetector {
    pub fn new(wait_time_s: f32) -> Self {
        Self {
            wait_time_s,
            watch: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.watch.is_some()
    }

    /// Start watching a throw, superseding any pending watch
    pub fn arm(&mut self, throw_id: u64) {
        if let Some(old) = self.watch.replace(PendingWatch {
            throw_id,
            elapsed_s: 0.0,
        }) {
            debug!(superseded = old.throw_id, by = throw_id, "outcome watch superseded");
        }
    }

    /// Cancel the pending watch with no report (success, or a drop)
    pub fn cancel(&mut self) -> Option<u64> {
        self.watch.take().map(|watch| watch.throw_id)
    }

    /// Advance the watch by one tick; fires at most one miss report, exactly
    /// once per armed watch that reaches its deadline
    pub fn tick(&mut self, dt: f32) -> Option<MissReport> {
        let watch = self.watch.as_mut()?;
        watch.elapsed_s += dt.max(0.0);
        if watch.elapsed_s < self.wait_time_s {
            return None;
        }

        let throw_id = watch.throw_id;
        self.watch = None;
        info!(throw_id, "outcome watch elapsed: miss");
        Some(MissReport { throw_id })
    }
}
