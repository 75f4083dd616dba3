//! Local action executor backed by `enigo`.

use crate::error::{InputError, Result};
use crate::ActionExecutor;
use enigo::{Axis, Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};
use lazyhand_gesture::{ScreenSize, ScrollDirection};
use lazyhand_protocol::{KeyCombo, KeyToken, NamedKey};
use std::thread;
use std::time::Duration;

/// Default delay between keystrokes (10ms).
pub const DEFAULT_TYPING_DELAY_MS: u64 = 10;

/// Threshold for auto-switching to paste mode (characters).
/// Text longer than this will use clipboard paste instead of typing.
pub const SMART_PASTE_THRESHOLD: usize = 50;

/// Options for text typing.
#[derive(Debug, Clone)]
pub struct TypeOptions {
    /// Delay between each character in milliseconds.
    pub delay_ms: u64,
    /// Auto-select paste vs type based on text length.
    pub smart_mode: bool,
}

impl Default for TypeOptions {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_TYPING_DELAY_MS,
            smart_mode: true,
        }
    }
}

/// Result of a typing operation.
#[derive(Debug)]
pub struct TypeResult {
    /// Number of characters typed.
    pub chars_typed: usize,
    /// Whether paste was used instead of typing (smart mode).
    pub used_paste: bool,
}

/// Injects cursor, click, scroll and keyboard events on the local machine.
///
/// Not `Send`: create it on the thread that will use it.
pub struct InputController {
    enigo: Enigo,
    type_options: TypeOptions,
}

impl InputController {
    /// Create a new input controller.
    ///
    /// # Errors
    ///
    /// Returns an error if accessibility permissions are not granted (macOS)
    /// or if the input system fails to initialize.
    pub fn new() -> Result<Self> {
        if !crate::has_accessibility_access() {
            return Err(InputError::AccessibilityNotGranted);
        }

        let enigo =
            Enigo::new(&Settings::default()).map_err(|e| InputError::InitFailed(e.to_string()))?;

        Ok(Self {
            enigo,
            type_options: TypeOptions::default(),
        })
    }

    pub fn with_type_options(mut self, options: TypeOptions) -> Self {
        self.type_options = options;
        self
    }

    /// Type text, switching to clipboard paste for long strings in smart mode.
    pub fn type_with_options(&mut self, text: &str, options: &TypeOptions) -> Result<TypeResult> {
        if options.smart_mode && should_use_paste(text) {
            return self.type_via_paste(text);
        }
        self.type_chars(text, options)
    }

    /// Type text using clipboard paste with original clipboard restoration.
    fn type_via_paste(&mut self, text: &str) -> Result<TypeResult> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| InputError::TypeFailed(format!("Clipboard init failed: {}", e)))?;
        let original_text = clipboard.get_text().ok();

        clipboard
            .set_text(text)
            .map_err(|e| InputError::TypeFailed(format!("Clipboard set failed: {}", e)))?;

        // Let the clipboard owner settle before pasting.
        thread::sleep(Duration::from_millis(20));

        self.paste()?;

        thread::sleep(Duration::from_millis(50));

        if let Some(original) = original_text {
            let _ = clipboard.set_text(original);
        } else {
            let _ = clipboard.clear();
        }

        tracing::debug!(
            chars = text.chars().count(),
            "Used paste-to-type with clipboard restore"
        );

        Ok(TypeResult {
            chars_typed: text.chars().count(),
            used_paste: true,
        })
    }

    fn type_chars(&mut self, text: &str, options: &TypeOptions) -> Result<TypeResult> {
        let delay = Duration::from_millis(options.delay_ms);
        let mut chars_typed = 0;

        for ch in text.chars() {
            self.enigo
                .text(&ch.to_string())
                .map_err(|e| InputError::TypeFailed(e.to_string()))?;

            chars_typed += 1;

            if options.delay_ms > 0 {
                thread::sleep(delay);
            }
        }

        Ok(TypeResult {
            chars_typed,
            used_paste: false,
        })
    }

    /// Simulate a paste operation (Cmd+V on macOS, Ctrl+V elsewhere).
    fn paste(&mut self) -> Result<()> {
        #[cfg(target_os = "macos")]
        let modifier = NamedKey::Meta;
        #[cfg(not(target_os = "macos"))]
        let modifier = NamedKey::Control;

        let combo = KeyCombo::from_keys(vec![KeyToken::Named(modifier), KeyToken::Char('v')]);
        self.send_keys(&combo)
    }

    fn key(&mut self, key: Key, direction: Direction) -> Result<()> {
        self.enigo
            .key(key, direction)
            .map_err(|e| InputError::KeyFailed(e.to_string()))
    }
}

impl ActionExecutor for InputController {
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<()> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| InputError::MouseFailed(e.to_string()))
    }

    fn click(&mut self) -> Result<()> {
        self.enigo
            .button(Button::Left, Direction::Click)
            .map_err(|e| InputError::MouseFailed(e.to_string()))
    }

    fn scroll(&mut self, direction: ScrollDirection) -> Result<()> {
        // enigo scrolls down for positive lengths.
        let length = match direction {
            ScrollDirection::Up => -1,
            ScrollDirection::Down => 1,
        };
        self.enigo
            .scroll(length, Axis::Vertical)
            .map_err(|e| InputError::MouseFailed(e.to_string()))
    }

    fn send_keys(&mut self, combo: &KeyCombo) -> Result<()> {
        let keys: Vec<Key> = combo.press_order().map(to_enigo_key).collect();

        if let [single] = keys.as_slice() {
            return self.key(*single, Direction::Click);
        }

        let mut pressed = Vec::with_capacity(keys.len());
        let mut outcome = Ok(());
        for key in &keys {
            if let Err(e) = self.key(*key, Direction::Press) {
                outcome = Err(e);
                break;
            }
            pressed.push(*key);
            // Give the OS time to register held modifiers.
            thread::sleep(Duration::from_millis(10));
        }

        // Release whatever went down, even after a failure, so no key sticks.
        for key in pressed.into_iter().rev() {
            if let Err(e) = self.key(key, Direction::Release) {
                tracing::warn!(error = %e, ?key, "Failed to release key");
                if outcome.is_ok() {
                    outcome = Err(e);
                }
            }
        }

        tracing::debug!(keys = %combo, ok = outcome.is_ok(), "Sent key combination");
        outcome
    }

    fn type_text(&mut self, text: &str) -> Result<()> {
        let options = self.type_options.clone();
        self.type_with_options(text, &options).map(|_| ())
    }

    fn screen_size(&self) -> Option<ScreenSize> {
        match self.enigo.main_display() {
            Ok((w, h)) => Some(ScreenSize::new(w as f32, h as f32)),
            Err(e) => {
                tracing::warn!(error = %e, "Could not query display size");
                None
            }
        }
    }
}

fn to_enigo_key(token: &KeyToken) -> Key {
    match token {
        KeyToken::Char(c) => Key::Unicode(*c),
        KeyToken::Named(named) => match named {
            NamedKey::Control => Key::Control,
            NamedKey::Shift => Key::Shift,
            NamedKey::Alt => Key::Alt,
            NamedKey::Meta => Key::Meta,
            NamedKey::Enter => Key::Return,
            NamedKey::Backspace => Key::Backspace,
            NamedKey::Tab => Key::Tab,
            NamedKey::Escape => Key::Escape,
            NamedKey::Space => Key::Space,
            NamedKey::Delete => Key::Delete,
            NamedKey::Home => Key::Home,
            NamedKey::End => Key::End,
            NamedKey::PageUp => Key::PageUp,
            NamedKey::PageDown => Key::PageDown,
            NamedKey::Up => Key::UpArrow,
            NamedKey::Down => Key::DownArrow,
            NamedKey::Left => Key::LeftArrow,
            NamedKey::Right => Key::RightArrow,
            NamedKey::CapsLock => Key::CapsLock,
            NamedKey::Function(n) => function_key(*n),
        },
    }
}

fn function_key(n: u8) -> Key {
    match n {
        1 => Key::F1,
        2 => Key::F2,
        3 => Key::F3,
        4 => Key::F4,
        5 => Key::F5,
        6 => Key::F6,
        7 => Key::F7,
        8 => Key::F8,
        9 => Key::F9,
        10 => Key::F10,
        11 => Key::F11,
        _ => Key::F12,
    }
}

/// Text longer than SMART_PASTE_THRESHOLD characters is pasted.
fn should_use_paste(text: &str) -> bool {
    let chars = text.chars().count();
    if chars > SMART_PASTE_THRESHOLD {
        tracing::debug!(
            chars,
            threshold = SMART_PASTE_THRESHOLD,
            "Using paste due to text length"
        );
        return true;
    }
    false
}

impl std::fmt::Debug for InputController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputController")
            .field("type_options", &self.type_options)
            .finish_non_exhaustive()
    }
}
