//! Score tracking
//!
//! Maintains the make/miss counters and pushes them to an external display
//! surface. The tracker is the only writer of `ScoreState`; counters are
//! monotonically non-decreasing except at process reset.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Success/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub makes: u32,
    pub misses: u32,
}

/// External display surface (UI text, scoreboard mesh, ...).
///
/// The core only calls `refresh` after a counter change; rendering is the
/// host's concern.
pub trait ScoreDisplay {
    fn refresh(&mut self, state: &ScoreState);
}

/// Display that discards updates; for headless use and tests
#[derive(Debug, Default)]
pub struct NullDisplay;

impl ScoreDisplay for NullDisplay {
    fn refresh(&mut self, _state: &ScoreState) {}
}

/// Counter owner; mediates between sequence completion and the outcome watch
pub struct ScoreTracker {
    state: ScoreState,
    display: Box<dyn ScoreDisplay + Send>,
}

impl std::fmt::Debug for ScoreTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreTracker").field("state", &self.state).finish()
    }
}

impl Default for ScoreTracker {
    fn default() -> Self {
        Self::new(Box::new(NullDisplay))
    }
}

impl ScoreTracker {
    pub fn new(display: Box<dyn ScoreDisplay + Send>) -> Self {
        Self {
            state: ScoreState::default(),
            display,
        }
    }

    pub fn state(&self) -> ScoreState {
        self.state
    }

    /// Record a completed goal sequence
    pub fn record_make(&mut self) {
        self.state.makes += 1;
        info!(makes = self.state.makes, "score: make");
        self.display.refresh(&self.state);
    }

    /// Record an elapsed outcome watch
    pub fn record_miss(&mut self) {
        self.state.misses += 1;
        info!(misses = self.state.misses, "score: miss");
        self.display.refresh(&self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingDisplay {
        seen: Arc<Mutex<Vec<ScoreState>>>,
    }

    impl ScoreDisplay for RecordingDisplay {
        fn refresh(&mut self, state: &ScoreState) {
            self.seen.lock().unwrap().push(*state);
        }
    }

    #[test]
    fn test_counters_monotonic() {
        let mut tracker = ScoreTracker::default();
        tracker.record_make();
        tracker.record_miss();
        tracker.record_make();
        assert_eq!(tracker.state(), ScoreState { makes: 2, misses: 1 });
    }

    #[test]
    fn test_display_refreshed_per_outcome() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut tracker = ScoreTracker::new(Box::new(RecordingDisplay { seen: seen.clone() }));
        tracker.record_make();
        tracker.record_miss();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ScoreState { makes: 1, misses: 0 },
                ScoreState { makes: 1, misses: 1 },
            ]
        );
    }
}
