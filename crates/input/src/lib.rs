//! Action executor for lazyhand.
//!
//! Drives the OS cursor and keyboard on behalf of recognized gestures.
//!
//! # Implementations
//!
//! - [`InputController`]: injects input locally through `enigo`
//! - [`CommandForwarder`]: turns every action into a protocol command for a
//!   remote executor
//! - [`RecordingExecutor`]: records calls, for tests
//!
//! # Example
//!
//! ```ignore
//! use lazyhand_input::{ActionExecutor, InputController};
//!
//! let mut executor = InputController::new()?;
//! executor.move_cursor(960, 540)?;
//! executor.click()?;
//! ```

mod controller;
mod error;
mod forward;
mod recording;

#[cfg(target_os = "macos")]
mod macos;

use lazyhand_gesture::{ScreenSize, ScrollDirection};
use lazyhand_protocol::{KeyCombo, KeyToken, NamedKey};

pub use controller::{InputController, TypeOptions, TypeResult};
pub use error::{InputError, Result};
pub use forward::CommandForwarder;
pub use recording::{ExecutorCall, RecordingExecutor};

/// OS-level actions the dispatcher can request.
///
/// Implementations are not required to be `Send`: the local controller wraps
/// platform event sources that must stay on the thread that created them.
pub trait ActionExecutor {
    /// Move the cursor to absolute screen coordinates.
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<()>;

    /// Single left click.
    fn click(&mut self) -> Result<()>;

    /// One scroll tick.
    fn scroll(&mut self, direction: ScrollDirection) -> Result<()>;

    /// Press every key in order, then release in reverse.
    fn send_keys(&mut self, combo: &KeyCombo) -> Result<()>;

    fn type_text(&mut self, text: &str) -> Result<()>;

    /// Press and release a single named key.
    fn tap(&mut self, key: NamedKey) -> Result<()> {
        self.send_keys(&KeyCombo::single(KeyToken::Named(key)))
    }

    /// Size of the main display, when the executor can tell.
    fn screen_size(&self) -> Option<ScreenSize> {
        None
    }
}

impl<E: ActionExecutor + ?Sized> ActionExecutor for Box<E> {
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<()> {
        (**self).move_cursor(x, y)
    }

    fn click(&mut self) -> Result<()> {
        (**self).click()
    }

    fn scroll(&mut self, direction: ScrollDirection) -> Result<()> {
        (**self).scroll(direction)
    }

    fn send_keys(&mut self, combo: &KeyCombo) -> Result<()> {
        (**self).send_keys(combo)
    }

    fn type_text(&mut self, text: &str) -> Result<()> {
        (**self).type_text(text)
    }

    fn tap(&mut self, key: NamedKey) -> Result<()> {
        (**self).tap(key)
    }

    fn screen_size(&self) -> Option<ScreenSize> {
        (**self).screen_size()
    }
}

/// Check if the application has accessibility permissions.
///
/// On macOS, input simulation requires Accessibility permission.
/// On other platforms, always returns `true`.
pub fn has_accessibility_access() -> bool {
    #[cfg(target_os = "macos")]
    {
        macos::has_accessibility_access()
    }
    #[cfg(not(target_os = "macos"))]
    {
        true
    }
}

/// Check if accessibility is granted, prompting if not.
///
/// Note: Even after prompting, this will return `false` until the user
/// actually grants permission and restarts the app.
pub fn ensure_accessibility_access() -> bool {
    #[cfg(target_os = "macos")]
    {
        macos::ensure_accessibility_access()
    }
    #[cfg(not(target_os = "macos"))]
    {
        true
    }
}
