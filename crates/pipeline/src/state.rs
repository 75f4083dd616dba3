use std::time::Instant;

use lazyhand_gesture::{
    ActionKind, CooldownGate, CoordinateMapper, DebounceState, Debouncer, ScreenSize,
    SmoothingState,
};

use crate::settings::PipelineSettings;

/// Every counter and timer the frame loop mutates.
///
/// Owned by exactly one worker; nothing here is shared.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub(crate) debouncer: Debouncer,
    pub(crate) cooldowns: CooldownGate,
    pub(crate) mapper: CoordinateMapper,
    /// Dispatcher-local fullscreen timer, separate from `cooldowns`.
    pub(crate) last_fullscreen: Option<Instant>,
}

impl PipelineState {
    pub fn new(settings: &PipelineSettings, screen: ScreenSize) -> Self {
        Self {
            debouncer: Debouncer::new(settings.confirm_frames),
            cooldowns: CooldownGate::new()
                .with_interval(ActionKind::Backspace, settings.backspace_interval()),
            mapper: CoordinateMapper::new(settings.region(), screen)
                .with_smoothening(settings.smoothening)
                .with_scroll_dead_zone(settings.scroll_dead_zone),
            last_fullscreen: None,
        }
    }

    pub fn debounce(&self) -> DebounceState {
        self.debouncer.state()
    }

    pub fn smoothing(&self) -> SmoothingState {
        self.mapper.state()
    }

    pub fn cooldowns(&self) -> &CooldownGate {
        &self.cooldowns
    }

    pub fn screen(&self) -> ScreenSize {
        self.mapper.screen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_state_follows_settings() {
        let settings = PipelineSettings {
            confirm_frames: 5,
            backspace_interval_ms: 120,
            ..Default::default()
        };
        let state = PipelineState::new(&settings, ScreenSize::new(1280.0, 720.0));

        assert_eq!(state.debouncer.threshold(), 5);
        assert_eq!(
            state.cooldowns().interval(ActionKind::Backspace),
            Duration::from_millis(120)
        );
        assert_eq!(state.screen(), ScreenSize::new(1280.0, 720.0));
        assert_eq!(state.debounce(), DebounceState::default());
        assert_eq!(state.smoothing(), SmoothingState::default());
        assert!(state.last_fullscreen.is_none());
    }
}
