//! Temporal debouncing of frame-level gestures.

use crate::constants::CONFIRM_FRAMES;
use crate::gesture::Gesture;

/// Snapshot of the debouncer's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DebounceState {
    pub last_gesture: Gesture,
    /// Consecutive frames `last_gesture` has been seen, including the latest.
    pub consecutive_count: u32,
}

/// Requires a gesture to repeat for `threshold` consecutive frames before it
/// may be dispatched. Pointer movement is never held back.
#[derive(Debug, Clone)]
pub struct Debouncer {
    state: DebounceState,
    threshold: u32,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(CONFIRM_FRAMES)
    }
}

impl Debouncer {
    pub fn new(threshold: u32) -> Self {
        Self {
            state: DebounceState::default(),
            threshold: threshold.max(1),
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Record this frame's gesture and report whether it may be dispatched.
    pub fn observe(&mut self, gesture: Gesture) -> bool {
        if gesture == self.state.last_gesture {
            self.state.consecutive_count = self.state.consecutive_count.saturating_add(1);
        } else {
            self.state = DebounceState {
                last_gesture: gesture,
                consecutive_count: 1,
            };
        }

        match gesture {
            Gesture::None => false,
            g if g.is_continuous() => true,
            _ => self.state.consecutive_count >= self.threshold,
        }
    }

    /// Forget the current run. Called when a frame has no hands.
    pub fn reset(&mut self) {
        if self.state.consecutive_count > 0 {
            tracing::trace!(gesture = %self.state.last_gesture, "debounce reset");
        }
        self.state = DebounceState::default();
    }
}
