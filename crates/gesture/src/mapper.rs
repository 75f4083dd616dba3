//! Camera-to-screen coordinate mapping with exponential smoothing.

use serde::{Deserialize, Serialize};

use crate::constants::{
    FRAME_HEIGHT, FRAME_REDUCTION, FRAME_WIDTH, SCROLL_DEAD_ZONE_PX, SMOOTHENING,
};
use crate::GestureError;

/// Rectangle of the camera frame (pixels) that maps onto the whole screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveRegion {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for ActiveRegion {
    fn default() -> Self {
        Self::inset(FRAME_WIDTH, FRAME_HEIGHT, FRAME_REDUCTION)
    }
}

impl ActiveRegion {
    /// Region `reduction` pixels in from every edge of the frame.
    pub fn inset(frame_width: f32, frame_height: f32, reduction: f32) -> Self {
        Self {
            left: reduction,
            top: reduction,
            width: frame_width - 2.0 * reduction,
            height: frame_height - 2.0 * reduction,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.width > 0.0 && self.height > 0.0 {
            Ok(())
        } else {
            Err(GestureError::EmptyRegion {
                width: self.width,
                height: self.height,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: f32,
    pub height: f32,
}

impl ScreenSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Previous smoothed positions, in screen space before mirroring.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SmoothingState {
    pub prev_pointer: (f32, f32),
    pub prev_scroll_y: f32,
}

/// A scroll tick the mapper would fire, pending the cooldown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollIntent {
    pub direction: ScrollDirection,
    smoothed_y: f32,
}

/// Linear interpolation from `from` onto `to`, clamped to the ends of `to`.
pub fn interp(value: f32, from: (f32, f32), to: (f32, f32)) -> f32 {
    let (lo, hi) = from;
    if value <= lo {
        return to.0;
    }
    if value >= hi {
        return to.1;
    }
    to.0 + (value - lo) * (to.1 - to.0) / (hi - lo)
}

#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    region: ActiveRegion,
    screen: ScreenSize,
    smoothening: f32,
    scroll_dead_zone: f32,
    state: SmoothingState,
}

impl CoordinateMapper {
    pub fn new(region: ActiveRegion, screen: ScreenSize) -> Self {
        Self {
            region,
            screen,
            smoothening: SMOOTHENING,
            scroll_dead_zone: SCROLL_DEAD_ZONE_PX,
            state: SmoothingState::default(),
        }
    }

    pub fn with_smoothening(mut self, smoothening: f32) -> Self {
        self.smoothening = smoothening.max(1.0);
        self
    }

    pub fn with_scroll_dead_zone(mut self, dead_zone: f32) -> Self {
        self.scroll_dead_zone = dead_zone.max(0.0);
        self
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    pub fn state(&self) -> SmoothingState {
        self.state
    }

    fn target(&self, x: f32, y: f32) -> (f32, f32) {
        let r = &self.region;
        (
            interp(x, (r.left, r.right()), (0.0, self.screen.width)),
            interp(y, (r.top, r.bottom()), (0.0, self.screen.height)),
        )
    }

    fn smooth(&self, prev: f32, target: f32) -> f32 {
        prev + (target - prev) / self.smoothening
    }

    /// Map an index-fingertip position to a cursor position.
    ///
    /// Updates the pointer smoothing state. The returned x is mirrored.
    pub fn map_pointer(&mut self, x: f32, y: f32) -> (f32, f32) {
        let (tx, ty) = self.target(x, y);
        let (px, py) = self.state.prev_pointer;
        let sx = self.smooth(px, tx);
        let sy = self.smooth(py, ty);
        self.state.prev_pointer = (sx, sy);
        (self.screen.width - sx, sy)
    }

    /// Decide whether a fingertip at camera `y` should produce a scroll tick.
    ///
    /// Targets inside the dead zone of the smoothed position yield `None`.
    /// State is left untouched until [`commit_scroll`](Self::commit_scroll).
    pub fn scroll_intent(&self, y: f32) -> Option<ScrollIntent> {
        let (_, target) = self.target(0.0, y);
        let prev = self.state.prev_scroll_y;
        let smoothed = self.smooth(prev, target);

        if (target - smoothed).abs() < self.scroll_dead_zone {
            return None;
        }

        let direction = if smoothed > prev {
            ScrollDirection::Up
        } else if smoothed < prev {
            ScrollDirection::Down
        } else {
            return None;
        };

        Some(ScrollIntent {
            direction,
            smoothed_y: smoothed,
        })
    }

    /// Record that a scroll tick fired for `intent`.
    pub fn commit_scroll(&mut self, intent: ScrollIntent) {
        self.state.prev_scroll_y = intent.smoothed_y;
    }
}
