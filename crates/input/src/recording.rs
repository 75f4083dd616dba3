//! Executor that records calls instead of injecting input.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use lazyhand_gesture::{ScreenSize, ScrollDirection};
use lazyhand_protocol::{KeyCombo, NamedKey};

use crate::error::{InputError, Result};
use crate::ActionExecutor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutorCall {
    MoveCursor { x: i32, y: i32 },
    Click,
    Scroll(ScrollDirection),
    SendKeys(String),
    TypeText(String),
    Tap(NamedKey),
}

/// In-memory executor for testing.
///
/// Clones share the same call log, so a test can keep one handle while the
/// pipeline owns another. Failed calls are recorded too.
#[derive(Clone, Default)]
pub struct RecordingExecutor {
    calls: Arc<Mutex<Vec<ExecutorCall>>>,
    failing: Arc<AtomicBool>,
    screen: Option<ScreenSize>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_screen_size(mut self, screen: ScreenSize) -> Self {
        self.screen = Some(screen);
        self
    }

    /// Make every subsequent call return an error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<ExecutorCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: ExecutorCall) -> Result<()> {
        tracing::trace!(?call, "Recorded executor call");
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(InputError::MouseFailed("injection denied".into()));
        }
        Ok(())
    }
}

impl ActionExecutor for RecordingExecutor {
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<()> {
        self.record(ExecutorCall::MoveCursor { x, y })
    }

    fn click(&mut self) -> Result<()> {
        self.record(ExecutorCall::Click)
    }

    fn scroll(&mut self, direction: ScrollDirection) -> Result<()> {
        self.record(ExecutorCall::Scroll(direction))
    }

    fn send_keys(&mut self, combo: &KeyCombo) -> Result<()> {
        self.record(ExecutorCall::SendKeys(combo.to_string()))
    }

    fn type_text(&mut self, text: &str) -> Result<()> {
        self.record(ExecutorCall::TypeText(text.to_string()))
    }

    fn tap(&mut self, key: NamedKey) -> Result<()> {
        self.record(ExecutorCall::Tap(key))
    }

    fn screen_size(&self) -> Option<ScreenSize> {
        self.screen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyhand_protocol::parse_key_combo;

    #[test]
    fn test_clones_share_log() {
        let rec = RecordingExecutor::new();
        let mut exec = rec.clone();

        exec.click().unwrap();
        exec.send_keys(&parse_key_combo("ctrl+r").unwrap()).unwrap();
        exec.tap(NamedKey::Enter).unwrap();

        assert_eq!(
            rec.calls(),
            vec![
                ExecutorCall::Click,
                ExecutorCall::SendKeys("ctrl+r".into()),
                ExecutorCall::Tap(NamedKey::Enter),
            ]
        );
    }

    #[test]
    fn test_failing_still_records() {
        let rec = RecordingExecutor::new();
        let mut exec = rec.clone();
        rec.set_failing(true);

        assert!(exec.scroll(ScrollDirection::Up).is_err());
        assert_eq!(rec.calls(), vec![ExecutorCall::Scroll(ScrollDirection::Up)]);
    }
}
