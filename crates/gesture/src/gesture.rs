//! Gesture alphabet and the per-hand classifier.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::BACKSPACE_THUMB_OFFSET_PX;
use crate::types::{FingerStates, HandObservation, Landmark, FINGER_TIPS, THUMB_TIP};

/// A recognized hand shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    PointerMove,
    Click,
    Scroll,
    FullscreenToggle,
    DetectionPauseToggle,
    VoiceStart,
    VoiceStop,
    Backspace,
    #[default]
    None,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::PointerMove => "pointer_move",
            Gesture::Click => "click",
            Gesture::Scroll => "scroll",
            Gesture::FullscreenToggle => "fullscreen_toggle",
            Gesture::DetectionPauseToggle => "detection_pause_toggle",
            Gesture::VoiceStart => "voice_start",
            Gesture::VoiceStop => "voice_stop",
            Gesture::Backspace => "backspace",
            Gesture::None => "none",
        }
    }

    /// Continuous gestures fire every frame and skip confirmation.
    pub fn is_continuous(&self) -> bool {
        matches!(self, Gesture::PointerMove)
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify one hand. Hands with no usable finger states classify as `None`.
pub fn classify(hand: &HandObservation) -> Gesture {
    match hand.finger_states() {
        Some(fingers) => classify_fingers(fingers, &hand.landmarks),
        None => Gesture::None,
    }
}

/// Map a finger-state vector to a gesture.
///
/// `landmarks` is only consulted for the thumb-out fist, which is a
/// backspace only when the thumb is held clear of the other fingertips.
pub fn classify_fingers(fingers: FingerStates, landmarks: &[Landmark]) -> Gesture {
    match fingers.bits() {
        [0, 1, 0, 0, 0] => Gesture::PointerMove,
        [0, 1, 1, 0, 0] | [0, 1, 0, 0, 1] | [1, 1, 0, 0, 1] => Gesture::Click,
        [0, 1, 1, 1, 0] => Gesture::Scroll,
        [0, 1, 1, 1, 1] => Gesture::FullscreenToggle,
        [1, 1, 1, 1, 1] => Gesture::DetectionPauseToggle,
        [1, 0, 0, 0, 1] => Gesture::VoiceStart,
        [0, 0, 0, 0, 0] => Gesture::VoiceStop,
        [1, 0, 0, 0, 0] if thumb_clear_of_fist(landmarks) => Gesture::Backspace,
        _ => Gesture::None,
    }
}

/// Thumb tip x exceeds every other fingertip x by more than the offset.
fn thumb_clear_of_fist(landmarks: &[Landmark]) -> bool {
    let Some(thumb) = landmarks.get(THUMB_TIP) else {
        return false;
    };
    FINGER_TIPS.iter().all(|&idx| {
        landmarks
            .get(idx)
            .is_some_and(|tip| thumb.x > tip.x + BACKSPACE_THUMB_OFFSET_PX)
    })
}
