//! Per-frame hand data produced by the external landmark detector.

use serde::{Deserialize, Serialize};

use crate::constants::LANDMARK_COUNT;
use crate::GestureError;

/// Landmark indices of the fingertips, thumb first.
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;

/// Landmark index of the thumb's interphalangeal joint.
const THUMB_IP: usize = 3;

/// Tips of the four non-thumb fingers, index to pinky.
pub const FINGER_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerState {
    Curled,
    Extended,
}

impl FingerState {
    fn bit(self) -> u8 {
        match self {
            FingerState::Curled => 0,
            FingerState::Extended => 1,
        }
    }
}

/// Curled/extended state of the five fingers, ordered thumb to pinky.
///
/// Serialized as a five-element array of `0`/`1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; 5]", into = "[u8; 5]")]
pub struct FingerStates([FingerState; 5]);

impl FingerStates {
    pub fn new(states: [FingerState; 5]) -> Self {
        Self(states)
    }

    /// Build from a `0`/`1` vector. Any other value is rejected.
    pub fn from_bits(bits: [u8; 5]) -> crate::Result<Self> {
        let mut states = [FingerState::Curled; 5];
        for (state, bit) in states.iter_mut().zip(bits) {
            *state = match bit {
                0 => FingerState::Curled,
                1 => FingerState::Extended,
                other => return Err(GestureError::InvalidFingerState(other)),
            };
        }
        Ok(Self(states))
    }

    pub fn bits(&self) -> [u8; 5] {
        self.0.map(FingerState::bit)
    }

    pub fn states(&self) -> [FingerState; 5] {
        self.0
    }

    /// Derive finger states from raw landmarks.
    ///
    /// The thumb is extended when its tip lies outward of its IP joint
    /// (to the right for a right hand, to the left for a left hand); every
    /// other finger is extended when its tip is above the joint two points
    /// below it. Returns `None` for an incomplete landmark set.
    pub fn from_landmarks(handedness: Handedness, landmarks: &[Landmark]) -> Option<Self> {
        if landmarks.len() < LANDMARK_COUNT {
            return None;
        }

        let extended = |up: bool| {
            if up {
                FingerState::Extended
            } else {
                FingerState::Curled
            }
        };

        let tip = landmarks[THUMB_TIP];
        let ip = landmarks[THUMB_IP];
        let thumb_up = match handedness {
            Handedness::Right => tip.x > ip.x,
            Handedness::Left => tip.x < ip.x,
        };

        let mut states = [extended(thumb_up); 5];
        for (slot, &tip_idx) in states[1..].iter_mut().zip(FINGER_TIPS.iter()) {
            *slot = extended(landmarks[tip_idx].y < landmarks[tip_idx - 2].y);
        }
        Some(Self(states))
    }
}

impl TryFrom<[u8; 5]> for FingerStates {
    type Error = GestureError;

    fn try_from(bits: [u8; 5]) -> Result<Self, Self::Error> {
        Self::from_bits(bits)
    }
}

impl From<FingerStates> for [u8; 5] {
    fn from(states: FingerStates) -> Self {
        states.bits()
    }
}

/// A single keypoint in camera pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<[f32; 3]> for Landmark {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Landmark> for [f32; 3] {
    fn from(lm: Landmark) -> Self {
        [lm.x, lm.y, lm.z]
    }
}

/// One detected hand in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    pub handedness: Handedness,
    pub landmarks: Vec<Landmark>,
    /// Finger states supplied by the detector. Derived from landmarks when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingers: Option<FingerStates>,
}

impl HandObservation {
    pub fn new(handedness: Handedness, landmarks: Vec<Landmark>, fingers: FingerStates) -> Self {
        Self {
            handedness,
            landmarks,
            fingers: Some(fingers),
        }
    }

    pub fn finger_states(&self) -> Option<FingerStates> {
        self.fingers
            .or_else(|| FingerStates::from_landmarks(self.handedness, &self.landmarks))
    }

    pub fn landmark(&self, idx: usize) -> Option<Landmark> {
        self.landmarks.get(idx).copied()
    }

    pub fn index_tip(&self) -> Option<Landmark> {
        self.landmark(INDEX_TIP)
    }
}

/// All hands detected in the current frame. Order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    #[serde(default)]
    pub hands: Vec<HandObservation>,
}

impl FrameInput {
    pub fn new(hands: Vec<HandObservation>) -> Self {
        Self { hands }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }
}
