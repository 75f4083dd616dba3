//! Per-action minimum re-fire intervals.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use crate::constants::{
    BACKSPACE_INTERVAL, CLICK_INTERVAL, FULLSCREEN_INTERVAL, PAUSE_TOGGLE_INTERVAL,
    SCROLL_INTERVAL,
};

/// Discrete action kinds that are rate limited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Click,
    Scroll,
    FullscreenToggle,
    DetectionPauseToggle,
    Backspace,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        ActionKind::Click,
        ActionKind::Scroll,
        ActionKind::FullscreenToggle,
        ActionKind::DetectionPauseToggle,
        ActionKind::Backspace,
    ];

    pub fn default_interval(self) -> Duration {
        match self {
            ActionKind::Click => CLICK_INTERVAL,
            ActionKind::Scroll => SCROLL_INTERVAL,
            ActionKind::FullscreenToggle => FULLSCREEN_INTERVAL,
            ActionKind::DetectionPauseToggle => PAUSE_TOGGLE_INTERVAL,
            ActionKind::Backspace => BACKSPACE_INTERVAL,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Click => "click",
            ActionKind::Scroll => "scroll",
            ActionKind::FullscreenToggle => "fullscreen_toggle",
            ActionKind::DetectionPauseToggle => "detection_pause_toggle",
            ActionKind::Backspace => "backspace",
        };
        f.write_str(name)
    }
}

/// Tracks when each action kind last fired.
///
/// Timestamps are supplied by the caller so the gate stays deterministic.
/// Checking readiness and recording a firing are separate steps: an action
/// that was allowed through but failed downstream is not recorded.
#[derive(Debug, Clone)]
pub struct CooldownGate {
    intervals: HashMap<ActionKind, Duration>,
    last_fired: HashMap<ActionKind, Instant>,
}

impl Default for CooldownGate {
    fn default() -> Self {
        Self {
            intervals: ActionKind::ALL
                .iter()
                .map(|&k| (k, k.default_interval()))
                .collect(),
            last_fired: HashMap::new(),
        }
    }
}

impl CooldownGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the interval for one action kind.
    pub fn with_interval(mut self, kind: ActionKind, interval: Duration) -> Self {
        self.intervals.insert(kind, interval);
        self
    }

    pub fn interval(&self, kind: ActionKind) -> Duration {
        self.intervals
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_interval())
    }

    pub fn is_ready(&self, kind: ActionKind, now: Instant) -> bool {
        match self.last_fired.get(&kind) {
            Some(&last) => now.saturating_duration_since(last) >= self.interval(kind),
            None => true,
        }
    }

    pub fn record(&mut self, kind: ActionKind, now: Instant) {
        self.last_fired.insert(kind, now);
    }

    pub fn last_fired(&self, kind: ActionKind) -> Option<Instant> {
        self.last_fired.get(&kind).copied()
    }
}
