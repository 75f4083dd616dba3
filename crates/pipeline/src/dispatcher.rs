//! Turns confirmed gestures into executor calls.

use std::time::Instant;

use lazyhand_gesture::{
    ActionKind, Gesture, HandObservation, ScrollDirection, FULLSCREEN_INTERVAL,
};
use lazyhand_input::ActionExecutor;
use lazyhand_protocol::{KeyCombo, MessageSinkRef, NamedKey, Notice};
use lazyhand_voice::{VoiceEvent, VoiceStatus, VoiceWorker};

use crate::control::PipelineControl;
use crate::state::PipelineState;

/// What a dispatch actually did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    MoveCursor { x: i32, y: i32 },
    Click,
    Scroll(ScrollDirection),
    SendKeys(KeyCombo),
    ToggleDetection { enabled: bool },
    StartVoice,
    StopVoice,
    Backspace,
}

pub struct Dispatcher {
    executor: Box<dyn ActionExecutor>,
    control: PipelineControl,
    notices: MessageSinkRef,
    voice: Option<VoiceWorker>,
    voice_unavailable_notified: bool,
}

impl Dispatcher {
    pub fn new(
        executor: Box<dyn ActionExecutor>,
        control: PipelineControl,
        notices: MessageSinkRef,
    ) -> Self {
        Self {
            executor,
            control,
            notices,
            voice: None,
            voice_unavailable_notified: false,
        }
    }

    pub fn with_voice(mut self, voice: VoiceWorker) -> Self {
        self.voice = Some(voice);
        self
    }

    pub fn executor(&self) -> &dyn ActionExecutor {
        self.executor.as_ref()
    }

    pub fn control(&self) -> &PipelineControl {
        &self.control
    }

    /// Run the action for a confirmed gesture.
    ///
    /// Returns `None` when a gate held the action back or the executor
    /// failed. Cooldowns are only recorded for actions that fired.
    pub fn dispatch(
        &mut self,
        state: &mut PipelineState,
        gesture: Gesture,
        hand: Option<&HandObservation>,
        now: Instant,
    ) -> Option<Action> {
        match gesture {
            Gesture::PointerMove => self.move_pointer(state, hand?),
            Gesture::Click => self.gated(state, ActionKind::Click, now, |exec| {
                exec.click().map(|_| Action::Click)
            }),
            Gesture::Scroll => self.scroll(state, hand?, now),
            Gesture::FullscreenToggle => self.toggle_fullscreen(state, now),
            Gesture::DetectionPauseToggle => self.toggle_detection(state, now),
            Gesture::VoiceStart => self.start_voice(),
            Gesture::VoiceStop => self.stop_voice(),
            Gesture::Backspace => self.gated(state, ActionKind::Backspace, now, |exec| {
                exec.tap(NamedKey::Backspace).map(|_| Action::Backspace)
            }),
            Gesture::None => None,
        }
    }

    /// Handle whatever the voice worker has reported since the last poll.
    pub fn poll_voice(&mut self) {
        let Some(events) = self.voice.as_ref().map(VoiceWorker::drain_events) else {
            return;
        };
        for event in events {
            match event {
                VoiceEvent::Ready => self.notify(Notice::success("Voice recognition ready")),
                VoiceEvent::Unavailable(reason) => self.notify_voice_unavailable(&reason),
                VoiceEvent::Started | VoiceEvent::Stopped => {
                    tracing::debug!(?event, "Voice worker event");
                }
                VoiceEvent::Transcript(text) => type_transcript(self.executor.as_mut(), &text),
                VoiceEvent::Failed(reason) => {
                    self.notify(Notice::error(format!("Voice capture failed: {reason}")));
                }
            }
        }
    }

    fn move_pointer(&mut self, state: &mut PipelineState, hand: &HandObservation) -> Option<Action> {
        let tip = hand.index_tip()?;
        let (x, y) = state.mapper.map_pointer(tip.x, tip.y);
        let (x, y) = (x.round() as i32, y.round() as i32);
        match self.executor.move_cursor(x, y) {
            Ok(()) => Some(Action::MoveCursor { x, y }),
            Err(e) => {
                tracing::warn!(error = %e, x, y, "Cursor move failed");
                None
            }
        }
    }

    fn scroll(
        &mut self,
        state: &mut PipelineState,
        hand: &HandObservation,
        now: Instant,
    ) -> Option<Action> {
        let tip = hand.index_tip()?;
        let intent = state.mapper.scroll_intent(tip.y)?;
        if !state.cooldowns.is_ready(ActionKind::Scroll, now) {
            return None;
        }
        match self.executor.scroll(intent.direction) {
            Ok(()) => {
                state.mapper.commit_scroll(intent);
                state.cooldowns.record(ActionKind::Scroll, now);
                Some(Action::Scroll(intent.direction))
            }
            Err(e) => {
                tracing::warn!(error = %e, direction = ?intent.direction, "Scroll failed");
                None
            }
        }
    }

    fn toggle_fullscreen(&mut self, state: &mut PipelineState, now: Instant) -> Option<Action> {
        let local_ready = state
            .last_fullscreen
            .map_or(true, |last| now.saturating_duration_since(last) >= FULLSCREEN_INTERVAL);
        if !local_ready {
            return None;
        }

        let keys = self.control.fullscreen_keys();
        let action = self.gated(state, ActionKind::FullscreenToggle, now, |exec| {
            exec.send_keys(&keys).map(|_| Action::SendKeys(keys.clone()))
        })?;
        state.last_fullscreen = Some(now);
        Some(action)
    }

    fn toggle_detection(&mut self, state: &mut PipelineState, now: Instant) -> Option<Action> {
        if !state.cooldowns.is_ready(ActionKind::DetectionPauseToggle, now) {
            return None;
        }
        state.cooldowns.record(ActionKind::DetectionPauseToggle, now);

        let enabled = self.control.toggle_detection();
        tracing::info!(enabled, "Gesture detection toggled");
        let msg = if enabled {
            "Gesture detection resumed"
        } else {
            "Gesture detection paused"
        };
        self.notify(Notice::info(msg));
        Some(Action::ToggleDetection { enabled })
    }

    fn start_voice(&mut self) -> Option<Action> {
        let status = self.voice.as_ref().map(VoiceWorker::status);
        match status {
            Some(VoiceStatus::Ready) => {
                let started = self.voice.as_ref().is_some_and(VoiceWorker::start);
                if !started {
                    return None;
                }
                tracing::info!("Voice capture requested");
                self.notify(Notice::info("Listening..."));
                Some(Action::StartVoice)
            }
            Some(VoiceStatus::Initializing) => {
                tracing::debug!("Voice recognizer still loading, ignoring voice start");
                None
            }
            Some(VoiceStatus::Unavailable) | None => {
                self.notify_voice_unavailable("no speech recognizer");
                None
            }
        }
    }

    fn stop_voice(&mut self) -> Option<Action> {
        let stopped = self.voice.as_ref().is_some_and(VoiceWorker::stop);
        if !stopped {
            return None;
        }
        tracing::info!("Voice capture stop requested");
        self.notify(Notice::info("Transcribing..."));
        Some(Action::StopVoice)
    }

    /// Run `fire` if `kind` is off cooldown, recording the firing on success.
    fn gated<F>(
        &mut self,
        state: &mut PipelineState,
        kind: ActionKind,
        now: Instant,
        fire: F,
    ) -> Option<Action>
    where
        F: FnOnce(&mut dyn ActionExecutor) -> lazyhand_input::Result<Action>,
    {
        if !state.cooldowns.is_ready(kind, now) {
            tracing::trace!(%kind, "Action on cooldown");
            return None;
        }
        match fire(self.executor.as_mut()) {
            Ok(action) => {
                state.cooldowns.record(kind, now);
                tracing::debug!(%kind, "Action fired");
                Some(action)
            }
            Err(e) => {
                tracing::warn!(error = %e, %kind, "Action failed");
                None
            }
        }
    }

    fn notify_voice_unavailable(&mut self, reason: &str) {
        if self.voice_unavailable_notified {
            return;
        }
        self.voice_unavailable_notified = true;
        tracing::warn!(reason, "Voice input unavailable");
        self.notify(Notice::warning("Voice input is unavailable"));
    }

    fn notify(&self, notice: Notice) {
        self.notices.emit(notice.into());
    }
}

/// Type a finished transcript followed by Enter. Blank transcripts type nothing.
fn type_transcript(executor: &mut dyn ActionExecutor, text: &str) {
    if text.trim().is_empty() {
        tracing::debug!("Empty transcript, nothing to type");
        return;
    }
    let result = executor
        .type_text(text)
        .and_then(|_| executor.tap(NamedKey::Enter));
    match result {
        Ok(()) => tracing::info!(chars = text.chars().count(), "Typed transcript"),
        Err(e) => tracing::warn!(error = %e, "Failed to type transcript"),
    }
}
