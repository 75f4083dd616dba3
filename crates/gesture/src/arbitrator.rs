//! Two-hand arbitration: turns a frame of hands into one frame-level gesture.

use crate::gesture::{classify, Gesture};
use crate::types::{FrameInput, Handedness};

/// Outcome of arbitrating one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arbitration {
    pub gesture: Gesture,
    /// Index into `FrameInput::hands` of the authoritative hand.
    /// `None` when the gesture came from both hands together.
    pub hand: Option<usize>,
}

impl Arbitration {
    pub fn is_dual_hand(&self) -> bool {
        self.hand.is_none()
    }
}

/// Resolve the frame-level gesture.
///
/// Returns `None` for a frame with no hands. Two hands of opposite
/// handedness both showing an open palm make a pause toggle; otherwise the
/// right hand (or the first hand) decides. A single open palm is not a
/// pause toggle. While detection is disabled the single-hand gesture is
/// suppressed to `Gesture::None`.
pub fn arbitrate(frame: &FrameInput, detection_enabled: bool) -> Option<Arbitration> {
    if frame.hands.is_empty() {
        return None;
    }

    if is_dual_hand_pause(frame) {
        return Some(Arbitration {
            gesture: Gesture::DetectionPauseToggle,
            hand: None,
        });
    }

    let idx = authoritative_hand(frame);
    let gesture = if detection_enabled {
        match classify(&frame.hands[idx]) {
            Gesture::DetectionPauseToggle => Gesture::None,
            other => other,
        }
    } else {
        Gesture::None
    };

    Some(Arbitration {
        gesture,
        hand: Some(idx),
    })
}

fn is_dual_hand_pause(frame: &FrameInput) -> bool {
    let [first, second] = frame.hands.as_slice() else {
        return false;
    };
    first.handedness != second.handedness
        && classify(first) == Gesture::DetectionPauseToggle
        && classify(second) == Gesture::DetectionPauseToggle
}

/// Right hand if present, else index 0. Two right hands also resolve to index 0.
fn authoritative_hand(frame: &FrameInput) -> usize {
    frame
        .hands
        .iter()
        .position(|h| h.handedness == Handedness::Right)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::LANDMARK_COUNT;
    use crate::types::{FingerStates, HandObservation, Landmark};

    fn hand(handedness: Handedness, bits: [u8; 5]) -> HandObservation {
        HandObservation::new(
            handedness,
            vec![Landmark::default(); LANDMARK_COUNT],
            FingerStates::from_bits(bits).unwrap(),
        )
    }

    const OPEN: [u8; 5] = [1, 1, 1, 1, 1];
    const INDEX: [u8; 5] = [0, 1, 0, 0, 0];
    const TWO: [u8; 5] = [0, 1, 1, 0, 0];

    #[test]
    fn test_empty_frame() {
        assert_eq!(arbitrate(&FrameInput::empty(), true), None);
    }

    #[test]
    fn test_dual_hand_pause() {
        let frame = FrameInput::new(vec![
            hand(Handedness::Left, OPEN),
            hand(Handedness::Right, OPEN),
        ]);
        let result = arbitrate(&frame, true).unwrap();
        assert_eq!(result.gesture, Gesture::DetectionPauseToggle);
        assert!(result.is_dual_hand());

        // Still recognized while detection is paused.
        let result = arbitrate(&frame, false).unwrap();
        assert_eq!(result.gesture, Gesture::DetectionPauseToggle);
    }

    #[test]
    fn test_single_open_palm_is_not_pause() {
        let frame = FrameInput::new(vec![hand(Handedness::Right, OPEN)]);
        assert_eq!(arbitrate(&frame, true).unwrap().gesture, Gesture::None);

        let frame = FrameInput::new(vec![
            hand(Handedness::Right, OPEN),
            hand(Handedness::Left, INDEX),
        ]);
        let result = arbitrate(&frame, true).unwrap();
        assert_eq!(result.gesture, Gesture::None);
        assert_eq!(result.hand, Some(0));
    }

    #[test]
    fn test_same_handedness_pair_is_not_pause() {
        let frame = FrameInput::new(vec![
            hand(Handedness::Right, OPEN),
            hand(Handedness::Right, OPEN),
        ]);
        let result = arbitrate(&frame, true).unwrap();
        assert_eq!(result.gesture, Gesture::None);
        assert_eq!(result.hand, Some(0));
    }

    #[test]
    fn test_right_hand_is_authoritative() {
        let frame = FrameInput::new(vec![
            hand(Handedness::Left, INDEX),
            hand(Handedness::Right, TWO),
        ]);
        let result = arbitrate(&frame, true).unwrap();
        assert_eq!(result.gesture, Gesture::Click);
        assert_eq!(result.hand, Some(1));
    }

    #[test]
    fn test_sole_left_hand_is_used() {
        let frame = FrameInput::new(vec![hand(Handedness::Left, INDEX)]);
        let result = arbitrate(&frame, true).unwrap();
        assert_eq!(result.gesture, Gesture::PointerMove);
        assert_eq!(result.hand, Some(0));
    }

    #[test]
    fn test_two_left_hands_fall_back_to_first() {
        let frame = FrameInput::new(vec![
            hand(Handedness::Left, TWO),
            hand(Handedness::Left, INDEX),
        ]);
        let result = arbitrate(&frame, true).unwrap();
        assert_eq!(result.gesture, Gesture::Click);
        assert_eq!(result.hand, Some(0));
    }

    #[test]
    fn test_disabled_detection_suppresses_single_hand() {
        let frame = FrameInput::new(vec![hand(Handedness::Right, INDEX)]);
        let result = arbitrate(&frame, false).unwrap();
        assert_eq!(result.gesture, Gesture::None);
        assert_eq!(result.hand, Some(0));
    }
}
