//! Newline-delimited JSON read by `lazyhand run`.

use lazyhand_gesture::FrameInput;
use lazyhand_pipeline::PipelineControl;
use lazyhand_protocol::{MessageSink, Notice};
use serde::Deserialize;

/// Runtime change to the shared control state.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ControlUpdate {
    #[serde(default)]
    pub detection_enabled: Option<bool>,
    #[serde(default)]
    pub four_fingers_up_send: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum InputLine {
    Control { control: ControlUpdate },
    Frame(FrameInput),
}

/// Parse one stdin line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<serde_json::Result<InputLine>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(serde_json::from_str(line))
}

/// Apply a control update, reporting a rejected key binding as a notice.
pub fn apply_control(update: ControlUpdate, control: &PipelineControl, notices: &dyn MessageSink) {
    if let Some(enabled) = update.detection_enabled {
        control.set_detection_enabled(enabled);
    }
    if let Some(keys) = update.four_fingers_up_send {
        if let Err(e) = control.set_fullscreen_keys(&keys) {
            tracing::warn!(error = %e, "Rejected four-finger binding");
            notices.emit(Notice::error(format!("Invalid key combination: {e}")).into());
        }
    }
}
