//! Recognition from raw detector output: landmarks in, confirmed gestures out.

use lazyhand_gesture::{
    arbitrate, ActiveRegion, CoordinateMapper, Debouncer, FrameInput, Gesture, HandObservation,
    Handedness, Landmark, ScreenSize, INDEX_TIP, LANDMARK_COUNT, THUMB_TIP,
};

/// A hand pose with the given fingers raised, landmarks only.
fn pose(handedness: Handedness, thumb_out: bool, raised: [bool; 4]) -> HandObservation {
    let mut landmarks = vec![Landmark::new(300.0, 300.0, 0.0); LANDMARK_COUNT];

    // Thumb IP at x=300; the tip goes outward for an extended thumb.
    let outward = match handedness {
        Handedness::Right => 1.0,
        Handedness::Left => -1.0,
    };
    let thumb_dx = if thumb_out { 40.0 } else { -40.0 };
    landmarks[THUMB_TIP] = Landmark::new(300.0 + outward * thumb_dx, 300.0, 0.0);

    for (finger, up) in raised.into_iter().enumerate() {
        let tip = INDEX_TIP + finger * 4;
        let y = if up { 200.0 } else { 340.0 };
        landmarks[tip] = Landmark::new(300.0, y, 0.0);
    }

    HandObservation {
        handedness,
        landmarks,
        fingers: None,
    }
}

fn frame(hands: Vec<HandObservation>) -> FrameInput {
    FrameInput::new(hands)
}

/// Feed frames through arbitration and debouncing, collecting what fires.
fn run(frames: &[FrameInput], detection_enabled: bool) -> Vec<Gesture> {
    let mut debouncer = Debouncer::default();
    let mut fired = Vec::new();
    for f in frames {
        match arbitrate(f, detection_enabled) {
            Some(result) => {
                if debouncer.observe(result.gesture) {
                    fired.push(result.gesture);
                }
            }
            None => debouncer.reset(),
        }
    }
    fired
}

#[test]
fn test_landmark_only_hands_are_classified() {
    let pointing = pose(Handedness::Right, false, [true, false, false, false]);
    let scrolling = pose(Handedness::Right, false, [true, true, true, false]);
    let fist = pose(Handedness::Right, false, [false; 4]);

    let result = arbitrate(&frame(vec![pointing]), true).unwrap();
    assert_eq!(result.gesture, Gesture::PointerMove);

    let result = arbitrate(&frame(vec![scrolling]), true).unwrap();
    assert_eq!(result.gesture, Gesture::Scroll);

    let result = arbitrate(&frame(vec![fist]), true).unwrap();
    assert_eq!(result.gesture, Gesture::VoiceStop);
}

#[test]
fn test_left_hand_thumb_is_mirrored() {
    let left_open = pose(Handedness::Left, true, [true; 4]);
    let right_open = pose(Handedness::Right, true, [true; 4]);
    let result = arbitrate(&frame(vec![left_open, right_open]), true).unwrap();
    assert_eq!(result.gesture, Gesture::DetectionPauseToggle);
    assert!(result.is_dual_hand());
}

#[test]
fn test_incomplete_hand_is_not_a_gesture() {
    let mut hand = pose(Handedness::Right, false, [true, false, false, false]);
    hand.landmarks.truncate(10);
    let result = arbitrate(&frame(vec![hand]), true).unwrap();
    assert_eq!(result.gesture, Gesture::None);
}

#[test]
fn test_gesture_stream_confirms_and_resets() {
    let click = frame(vec![pose(Handedness::Right, false, [true, true, false, false])]);
    let point = frame(vec![pose(Handedness::Right, false, [true, false, false, false])]);
    let empty = FrameInput::empty();

    let frames = vec![
        point.clone(),
        click.clone(),
        click.clone(),
        empty,
        click.clone(),
        click.clone(),
        click.clone(),
        point,
    ];
    assert_eq!(
        run(&frames, true),
        vec![Gesture::PointerMove, Gesture::Click, Gesture::PointerMove]
    );
}

#[test]
fn test_paused_stream_only_confirms_pause() {
    let click = frame(vec![pose(Handedness::Right, false, [true, true, false, false])]);
    let pause = frame(vec![
        pose(Handedness::Left, true, [true; 4]),
        pose(Handedness::Right, true, [true; 4]),
    ]);

    let frames = vec![
        click.clone(),
        click.clone(),
        click,
        pause.clone(),
        pause.clone(),
        pause,
    ];
    assert_eq!(run(&frames, false), vec![Gesture::DetectionPauseToggle]);
}

#[test]
fn test_pointer_path_through_custom_region() {
    let region = ActiveRegion {
        left: 100.0,
        top: 100.0,
        width: 400.0,
        height: 200.0,
    };
    let mut mapper =
        CoordinateMapper::new(region, ScreenSize::new(800.0, 600.0)).with_smoothening(1.0);

    // Without smoothing the mapping is exact; x is mirrored.
    assert_eq!(mapper.map_pointer(100.0, 100.0), (800.0, 0.0));
    assert_eq!(mapper.map_pointer(300.0, 200.0), (400.0, 300.0));
    // Outside the region clamps to the screen edge.
    assert_eq!(mapper.map_pointer(900.0, 900.0), (0.0, 600.0));
}
