use std::time::Duration;

/// Camera frame width the detector reports landmarks in (pixels).
pub const FRAME_WIDTH: f32 = 640.0;

/// Camera frame height the detector reports landmarks in (pixels).
pub const FRAME_HEIGHT: f32 = 480.0;

/// Inset (pixels) of the active region from each camera frame edge.
pub const FRAME_REDUCTION: f32 = 150.0;

/// Divisor for exponential smoothing of pointer and scroll positions.
pub const SMOOTHENING: f32 = 7.0;

/// Scroll targets closer than this (screen pixels) to the smoothed position never tick.
pub const SCROLL_DEAD_ZONE_PX: f32 = 60.0;

/// Consecutive identical frames needed before a discrete gesture is confirmed.
pub const CONFIRM_FRAMES: u32 = 3;

/// Horizontal distance (camera pixels) the thumb tip must clear every other fingertip by.
pub const BACKSPACE_THUMB_OFFSET_PX: f32 = 20.0;

/// Number of keypoints per detected hand.
pub const LANDMARK_COUNT: usize = 21;

pub const CLICK_INTERVAL: Duration = Duration::from_millis(500);
pub const SCROLL_INTERVAL: Duration = Duration::from_millis(300);
pub const FULLSCREEN_INTERVAL: Duration = Duration::from_millis(1500);
pub const PAUSE_TOGGLE_INTERVAL: Duration = Duration::from_millis(1500);

/// Repeat interval for backspace while the gesture is held.
pub const BACKSPACE_INTERVAL: Duration = Duration::from_millis(300);
