//! Executor that forwards every action as a protocol command.

use lazyhand_gesture::{ScreenSize, ScrollDirection};
use lazyhand_protocol::{Command, KeyCombo, KeyToken, MessageSinkRef, NamedKey};

use crate::error::Result;
use crate::ActionExecutor;

/// Emits [`Command`]s to a sink instead of touching the local OS.
///
/// Used when the executor lives on the far side of a process boundary.
pub struct CommandForwarder {
    sink: MessageSinkRef,
    screen: Option<ScreenSize>,
}

impl CommandForwarder {
    pub fn new(sink: MessageSinkRef) -> Self {
        Self { sink, screen: None }
    }

    /// Report a fixed screen size to the pipeline.
    pub fn with_screen_size(mut self, screen: ScreenSize) -> Self {
        self.screen = Some(screen);
        self
    }

    fn forward(&self, command: Command) -> Result<()> {
        tracing::trace!(command = ?command.message_type(), "Forwarding command");
        self.sink.emit(command.into());
        Ok(())
    }
}

impl ActionExecutor for CommandForwarder {
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<()> {
        self.forward(Command::MouseMove { x, y })
    }

    fn click(&mut self) -> Result<()> {
        self.forward(Command::MouseClick)
    }

    fn scroll(&mut self, direction: ScrollDirection) -> Result<()> {
        self.forward(Command::MouseScroll(direction))
    }

    fn send_keys(&mut self, combo: &KeyCombo) -> Result<()> {
        self.forward(Command::SendKeys {
            key_str: combo.to_string(),
        })
    }

    fn type_text(&mut self, text: &str) -> Result<()> {
        self.forward(Command::TypeText {
            text: text.to_string(),
        })
    }

    fn tap(&mut self, key: NamedKey) -> Result<()> {
        match key {
            NamedKey::Backspace => self.forward(Command::Backspace),
            other => self.send_keys(&KeyCombo::single(KeyToken::Named(other))),
        }
    }

    fn screen_size(&self) -> Option<ScreenSize> {
        self.screen
    }
}
