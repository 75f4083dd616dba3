//! State shared between the frame worker and the control boundary.

use std::sync::{Arc, Mutex};

use lazyhand_protocol::{parse_key_combo, KeyCombo, KeyParseError};

/// Values either side may read or change at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub detection_enabled: bool,
    pub fullscreen_keys: KeyCombo,
}

/// Cloneable handle to the single mutex guarding [`ControlState`].
#[derive(Debug, Clone)]
pub struct PipelineControl {
    inner: Arc<Mutex<ControlState>>,
}

impl PipelineControl {
    pub fn new(fullscreen_keys: KeyCombo) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ControlState {
                detection_enabled: true,
                fullscreen_keys,
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ControlState> {
        self.inner.lock().expect("pipeline control mutex poisoned")
    }

    pub fn snapshot(&self) -> ControlState {
        self.lock().clone()
    }

    pub fn detection_enabled(&self) -> bool {
        self.lock().detection_enabled
    }

    pub fn set_detection_enabled(&self, enabled: bool) {
        self.lock().detection_enabled = enabled;
        tracing::info!(enabled, "Gesture detection set");
    }

    /// Flip detection and return the new value.
    pub fn toggle_detection(&self) -> bool {
        let mut state = self.lock();
        state.detection_enabled = !state.detection_enabled;
        state.detection_enabled
    }

    pub fn fullscreen_keys(&self) -> KeyCombo {
        self.lock().fullscreen_keys.clone()
    }

    /// Rebind the four-finger gesture. An unparsable string leaves the
    /// current binding in place.
    pub fn set_fullscreen_keys(&self, key_str: &str) -> Result<KeyCombo, KeyParseError> {
        let combo = parse_key_combo(key_str)?;
        self.lock().fullscreen_keys = combo.clone();
        tracing::info!(keys = %combo, "Four-finger binding changed");
        Ok(combo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control() -> PipelineControl {
        PipelineControl::new(parse_key_combo("f").unwrap())
    }

    #[test]
    fn test_toggle_detection() {
        let c = control();
        assert!(c.detection_enabled());
        assert!(!c.toggle_detection());
        assert!(!c.detection_enabled());
        assert!(c.toggle_detection());
    }

    #[test]
    fn test_clones_share_state() {
        let c = control();
        let remote = c.clone();
        remote.set_detection_enabled(false);
        assert!(!c.detection_enabled());
    }

    #[test]
    fn test_invalid_binding_keeps_previous() {
        let c = control();
        assert!(c.set_fullscreen_keys("ctrl+nonsense").is_err());
        assert_eq!(c.fullscreen_keys().to_string(), "f");

        c.set_fullscreen_keys("Ctrl+F").unwrap();
        assert_eq!(c.snapshot().fullscreen_keys.to_string(), "ctrl+f");
    }

    #[test]
    fn test_cross_thread_update() {
        let c = control();
        let remote = c.clone();
        std::thread::spawn(move || remote.set_detection_enabled(false))
            .join()
            .unwrap();
        assert!(!c.detection_enabled());
    }
}
