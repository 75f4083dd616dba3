//! End-to-end frame processing against a recording executor.

use std::sync::Arc;
use std::time::{Duration, Instant};

use lazyhand_gesture::{
    ActionKind, FingerStates, FrameInput, HandObservation, Handedness, Landmark, ScreenSize,
    ScrollDirection, INDEX_TIP, LANDMARK_COUNT,
};
use lazyhand_input::{ExecutorCall, RecordingExecutor};
use lazyhand_pipeline::{
    Action, Dispatcher, GesturePipeline, PipelineControl, PipelineSettings,
};
use lazyhand_protocol::{parse_key_combo, InMemorySink, NoticeLevel};

const POINT: [u8; 5] = [0, 1, 0, 0, 0];
const TWO: [u8; 5] = [0, 1, 1, 0, 0];
const OPEN: [u8; 5] = [1, 1, 1, 1, 1];
const FOUR: [u8; 5] = [0, 1, 1, 1, 1];
const SCROLL: [u8; 5] = [0, 1, 1, 1, 0];

struct Harness {
    pipeline: GesturePipeline,
    calls: RecordingExecutor,
    sink: Arc<InMemorySink>,
    t0: Instant,
}

impl Harness {
    fn new() -> Self {
        let calls = RecordingExecutor::new().with_screen_size(ScreenSize::new(1920.0, 1080.0));
        let sink = Arc::new(InMemorySink::new());
        let control = PipelineControl::new(parse_key_combo("f").unwrap());
        let dispatcher = Dispatcher::new(Box::new(calls.clone()), control, sink.clone());
        Self {
            pipeline: GesturePipeline::new(&PipelineSettings::default(), dispatcher),
            calls,
            sink,
            t0: Instant::now(),
        }
    }

    fn at(&mut self, ms: u64, frame: &FrameInput) -> Option<Action> {
        self.pipeline
            .process_frame(frame, self.t0 + Duration::from_millis(ms))
    }
}

fn hand(handedness: Handedness, bits: [u8; 5]) -> HandObservation {
    HandObservation::new(
        handedness,
        vec![Landmark::new(320.0, 240.0, 0.0); LANDMARK_COUNT],
        FingerStates::from_bits(bits).unwrap(),
    )
}

fn right(bits: [u8; 5]) -> FrameInput {
    FrameInput::new(vec![hand(Handedness::Right, bits)])
}

/// A right-hand scroll pose with the index tip at camera `y`.
fn scroll_at(y: f32) -> FrameInput {
    let mut hand = hand(Handedness::Right, SCROLL);
    hand.landmarks[INDEX_TIP] = Landmark::new(320.0, y, 0.0);
    FrameInput::new(vec![hand])
}

fn both_open() -> FrameInput {
    FrameInput::new(vec![
        hand(Handedness::Left, OPEN),
        hand(Handedness::Right, OPEN),
    ])
}

#[test]
fn test_discrete_gesture_fires_on_third_frame() {
    let mut h = Harness::new();
    let click = right(TWO);

    assert_eq!(h.at(0, &click), None);
    assert_eq!(h.at(33, &click), None);
    assert_eq!(h.at(66, &click), Some(Action::Click));
    assert_eq!(h.calls.calls(), vec![ExecutorCall::Click]);
}

#[test]
fn test_pointer_fires_on_first_frame() {
    let mut h = Harness::new();
    assert!(matches!(
        h.at(0, &right(POINT)),
        Some(Action::MoveCursor { .. })
    ));
}

#[test]
fn test_held_click_respects_cooldown() {
    let mut h = Harness::new();
    let click = right(TWO);

    // Held for ~0.7s at 30fps.
    let fired: Vec<_> = (0..21)
        .filter_map(|i| h.at(i * 33, &click))
        .collect();
    assert_eq!(fired, vec![Action::Click, Action::Click]);
}

#[test]
fn test_two_clicks_close_together_fire_once() {
    let mut h = Harness::new();
    let click = right(TWO);
    let none = right([0, 0, 1, 0, 0]);

    for ms in [0, 10, 20] {
        h.at(ms, &click);
    }
    h.at(30, &none);
    for ms in [200, 210, 220] {
        h.at(ms, &click);
    }
    assert_eq!(h.calls.calls(), vec![ExecutorCall::Click]);

    h.at(230, &none);
    for ms in [600, 610, 620] {
        h.at(ms, &click);
    }
    assert_eq!(h.calls.calls(), vec![ExecutorCall::Click, ExecutorCall::Click]);
}

#[test]
fn test_dual_hand_pause_flips_once_per_window() {
    let mut h = Harness::new();
    let frame = both_open();

    // 1.4s of continuous dual open palms.
    let toggles = (0..43)
        .filter_map(|i| h.at(i * 33, &frame))
        .collect::<Vec<_>>();
    assert_eq!(toggles, vec![Action::ToggleDetection { enabled: false }]);
    assert!(!h.pipeline.control().detection_enabled());

    let notices = h.sink.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
}

#[test]
fn test_paused_pipeline_ignores_single_hand_gestures() {
    let mut h = Harness::new();
    h.pipeline.control().set_detection_enabled(false);

    for i in 0..10 {
        assert_eq!(h.at(i * 33, &right(TWO)), None);
        assert_eq!(h.at(i * 33 + 1, &right(POINT)), None);
    }
    assert!(h.calls.calls().is_empty());

    // The pause gesture still gets through.
    let frame = both_open();
    let actions: Vec<_> = (0..3).filter_map(|i| h.at(1000 + i, &frame)).collect();
    assert_eq!(actions, vec![Action::ToggleDetection { enabled: true }]);
}

#[test]
fn test_zero_hands_requires_fresh_confirmation() {
    let mut h = Harness::new();
    let click = right(TWO);

    h.at(0, &click);
    h.at(33, &click);
    h.at(66, &FrameInput::empty());
    assert_eq!(h.at(100, &click), None);
    assert_eq!(h.at(133, &click), None);
    assert_eq!(h.at(166, &click), Some(Action::Click));
}

#[test]
fn test_executor_failures_do_not_stop_processing() {
    let mut h = Harness::new();
    h.calls.set_failing(true);

    for i in 0..5 {
        assert_eq!(h.at(i * 33, &right(POINT)), None);
    }

    h.calls.set_failing(false);
    assert!(h.at(200, &right(POINT)).is_some());
}

#[test]
fn test_fullscreen_uses_rebound_keys() {
    let mut h = Harness::new();
    h.pipeline.control().set_fullscreen_keys("f11").unwrap();

    let frame = right(FOUR);
    let actions: Vec<_> = (0..3).filter_map(|i| h.at(i * 33, &frame)).collect();
    assert_eq!(
        actions,
        vec![Action::SendKeys(parse_key_combo("f11").unwrap())]
    );
    assert_eq!(h.calls.calls(), vec![ExecutorCall::SendKeys("f11".into())]);
}

#[test]
fn test_scroll_inside_dead_zone_is_ignored_after_cooldown() {
    let mut h = Harness::new();

    // Bottom of the region maps to y=1080; the third frame confirms and ticks.
    let far = scroll_at(330.0);
    assert_eq!(h.at(0, &far), None);
    assert_eq!(h.at(33, &far), None);
    assert_eq!(h.at(66, &far), Some(Action::Scroll(ScrollDirection::Up)));
    let after_tick = h.pipeline.state().smoothing().prev_scroll_y;
    assert!((after_tick - 1080.0 / 7.0).abs() < 1e-3);

    // y=176 maps to 156, within 60px of the smoothed position.
    let near = scroll_at(176.0);
    let later = h.t0 + Duration::from_millis(466);
    assert!(h.pipeline.state().cooldowns().is_ready(ActionKind::Scroll, later));
    for ms in [466, 500, 533] {
        assert_eq!(h.at(ms, &near), None);
    }
    assert_eq!(h.pipeline.state().smoothing().prev_scroll_y, after_tick);
    assert_eq!(
        h.calls.calls(),
        vec![ExecutorCall::Scroll(ScrollDirection::Up)]
    );

    // Moving back out of the dead zone ticks again.
    assert_eq!(h.at(566, &far), Some(Action::Scroll(ScrollDirection::Up)));
}

#[test]
fn test_left_hand_is_ignored_when_right_is_present() {
    let mut h = Harness::new();
    let frame = FrameInput::new(vec![
        hand(Handedness::Left, TWO),
        hand(Handedness::Right, POINT),
    ]);
    assert!(matches!(h.at(0, &frame), Some(Action::MoveCursor { .. })));
}

#[test]
fn test_frames_parse_from_json() {
    let landmarks = vec!["[320,240,0]"; LANDMARK_COUNT].join(",");
    let line = format!(
        r#"{{"hands":[{{"handedness":"Right","landmarks":[{landmarks}],"fingers":[0,1,1,0,0]}}]}}"#
    );
    let frame: FrameInput = serde_json::from_str(&line).unwrap();

    let mut h = Harness::new();
    let actions: Vec<_> = (0..3).filter_map(|i| h.at(i * 33, &frame)).collect();
    assert_eq!(actions, vec![Action::Click]);
}
