//! Gesture recognition core for lazyhand.
//!
//! Turns per-frame hand observations into confirmed gestures and screen
//! coordinates. Everything here is synchronous and free of I/O; timestamps
//! are passed in by the caller.
//!
//! # Pipeline
//!
//! ```text
//! FrameInput -> arbitrate() -> Debouncer -> CooldownGate / CoordinateMapper
//! ```
//!
//! # Example
//!
//! ```ignore
//! use lazyhand_gesture::{arbitrate, Debouncer, FrameInput};
//!
//! let mut debouncer = Debouncer::default();
//! if let Some(result) = arbitrate(&frame, true) {
//!     if debouncer.observe(result.gesture) {
//!         // dispatch
//!     }
//! }
//! ```

mod arbitrator;
mod constants;
mod cooldown;
mod debounce;
mod gesture;
mod mapper;
mod types;

pub use arbitrator::{arbitrate, Arbitration};
pub use constants::*;
pub use cooldown::{ActionKind, CooldownGate};
pub use debounce::{DebounceState, Debouncer};
pub use gesture::{classify, classify_fingers, Gesture};
pub use mapper::{
    interp, ActiveRegion, CoordinateMapper, ScreenSize, ScrollDirection, ScrollIntent,
    SmoothingState,
};
pub use types::{
    FingerState, FingerStates, FrameInput, HandObservation, Handedness, Landmark, FINGER_TIPS,
    INDEX_TIP, MIDDLE_TIP, PINKY_TIP, RING_TIP, THUMB_TIP,
};

#[derive(Debug, thiserror::Error)]
pub enum GestureError {
    #[error("finger state must be 0 or 1, got {0}")]
    InvalidFingerState(u8),
    #[error("active region must have positive size, got {width}x{height}")]
    EmptyRegion { width: f32, height: f32 },
}

pub type Result<T> = std::result::Result<T, GestureError>;
