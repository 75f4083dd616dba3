//! One frame in, at most one action out.

use std::time::Instant;

use lazyhand_gesture::{arbitrate, FrameInput, Gesture, ScreenSize};

use crate::control::PipelineControl;
use crate::dispatcher::{Action, Dispatcher};
use crate::settings::PipelineSettings;
use crate::state::PipelineState;

/// Arbitrate, debounce, then dispatch.
pub struct GesturePipeline {
    state: PipelineState,
    dispatcher: Dispatcher,
}

impl GesturePipeline {
    /// Build the pipeline. The screen size comes from the executor when it
    /// can report one, else from `settings`.
    pub fn new(settings: &PipelineSettings, dispatcher: Dispatcher) -> Self {
        let screen = dispatcher
            .executor()
            .screen_size()
            .unwrap_or_else(|| settings.fallback_screen());
        tracing::debug!(width = screen.width, height = screen.height, "Pipeline screen size");
        Self {
            state: PipelineState::new(settings, screen),
            dispatcher,
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn control(&self) -> &PipelineControl {
        self.dispatcher.control()
    }

    pub fn screen(&self) -> ScreenSize {
        self.state.screen()
    }

    /// Process one frame observed at `now`.
    pub fn process_frame(&mut self, frame: &FrameInput, now: Instant) -> Option<Action> {
        self.dispatcher.poll_voice();

        let detection_enabled = self.dispatcher.control().detection_enabled();
        let Some(arbitration) = arbitrate(frame, detection_enabled) else {
            self.state.debouncer.reset();
            return None;
        };

        let gesture = arbitration.gesture;
        if !self.state.debouncer.observe(gesture) {
            return None;
        }
        if gesture != Gesture::PointerMove {
            tracing::debug!(%gesture, "Gesture confirmed");
        }

        let hand = arbitration.hand.and_then(|idx| frame.hands.get(idx));
        self.dispatcher.dispatch(&mut self.state, gesture, hand, now)
    }

    /// Poll the voice worker without a frame, e.g. while the camera is idle.
    pub fn poll_voice(&mut self) {
        self.dispatcher.poll_voice();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyhand_gesture::{FingerStates, HandObservation, Handedness, Landmark, LANDMARK_COUNT};
    use lazyhand_input::RecordingExecutor;
    use lazyhand_protocol::{parse_key_combo, NullSink};
    use std::sync::Arc;

    fn pipeline(executor: RecordingExecutor) -> GesturePipeline {
        let control = PipelineControl::new(parse_key_combo("f").unwrap());
        let dispatcher = Dispatcher::new(Box::new(executor), control, Arc::new(NullSink));
        GesturePipeline::new(&PipelineSettings::default(), dispatcher)
    }

    fn frame(bits: [u8; 5]) -> FrameInput {
        FrameInput::new(vec![HandObservation::new(
            Handedness::Right,
            vec![Landmark::new(320.0, 240.0, 0.0); LANDMARK_COUNT],
            FingerStates::from_bits(bits).unwrap(),
        )])
    }

    #[test]
    fn test_screen_from_executor_wins() {
        let exec = RecordingExecutor::new().with_screen_size(ScreenSize::new(2560.0, 1440.0));
        assert_eq!(pipeline(exec).screen(), ScreenSize::new(2560.0, 1440.0));
        assert_eq!(
            pipeline(RecordingExecutor::new()).screen(),
            ScreenSize::new(1920.0, 1080.0)
        );
    }

    #[test]
    fn test_empty_frame_resets_debounce() {
        let mut p = pipeline(RecordingExecutor::new());
        let now = Instant::now();
        p.process_frame(&frame([0, 1, 1, 0, 0]), now);
        p.process_frame(&frame([0, 1, 1, 0, 0]), now);
        assert_eq!(p.state().debounce().consecutive_count, 2);

        assert_eq!(p.process_frame(&FrameInput::empty(), now), None);
        assert_eq!(p.state().debounce().consecutive_count, 0);
    }
}
