//! Executor side of the command protocol.
//!
//! Applies inbound [`Command`]s to a local executor and answers each one
//! with a `success` or `error` notice. No audio capture backend ships on
//! this side, so `voice_record` and `voice_stop` are answered with errors.

use lazyhand_input::ActionExecutor;
use lazyhand_protocol::{parse_key_combo, Command, Message, MessageSinkRef, NamedKey, Notice};

use crate::{PipelineError, Result};

pub struct CommandHandler {
    executor: Box<dyn ActionExecutor>,
    replies: MessageSinkRef,
}

impl CommandHandler {
    pub fn new(executor: Box<dyn ActionExecutor>, replies: MessageSinkRef) -> Self {
        Self { executor, replies }
    }

    /// Parse and apply one JSON line, replying with the outcome.
    pub fn handle_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        match Message::from_json(line) {
            Ok(Message::Command(command)) => {
                let kind = command.message_type();
                let reply = match self.apply(command) {
                    Ok(()) => Notice::success(format!("{kind} done")),
                    Err(e) => {
                        tracing::warn!(error = %e, %kind, "Command failed");
                        Notice::error(format!("{kind} failed: {e}"))
                    }
                };
                self.replies.emit(reply.into());
            }
            Ok(Message::Notice(notice)) => {
                tracing::debug!(level = ?notice.level, msg = %notice.msg, "Ignoring inbound notice");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rejected inbound message");
                self.replies
                    .emit(Notice::error(format!("Invalid message: {e}")).into());
            }
        }
    }

    /// Apply one command to the executor.
    pub fn apply(&mut self, command: Command) -> Result<()> {
        tracing::debug!(kind = %command.message_type(), "Applying command");
        match command {
            Command::MouseMove { x, y } => self.executor.move_cursor(x, y)?,
            Command::MouseClick => self.executor.click()?,
            Command::MouseScroll(direction) => self.executor.scroll(direction)?,
            Command::SendKeys { key_str } => {
                let combo = parse_key_combo(&key_str)?;
                self.executor.send_keys(&combo)?;
            }
            Command::TypeText { text } => self.executor.type_text(&text)?,
            Command::Backspace => self.executor.tap(NamedKey::Backspace)?,
            Command::VoiceRecord | Command::VoiceStop => {
                return Err(PipelineError::VoiceUnavailable);
            }
        }
        Ok(())
    }
}
