//! Outbound message sinks.
//!
//! The pipeline never talks to a transport directly. It hands messages to a
//! `MessageSink`, which lets the same dispatch code drive a socket, stdout,
//! or a test buffer.

use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::message::{Command, Message, Notice};

/// Receives messages bound for the executor boundary or the user.
pub trait MessageSink: Send + Sync {
    fn emit(&self, message: Message);
}

/// Type alias for shared sink reference.
pub type MessageSinkRef = Arc<dyn MessageSink>;

/// In-memory sink for testing.
///
/// Captures every emitted message for later inspection.
#[derive(Default)]
pub struct InMemorySink {
    messages: Mutex<Vec<Message>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<Command> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter_map(|m| match m {
                Message::Command(c) => Some(c.clone()),
                Message::Notice(_) => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter_map(|m| match m {
                Message::Notice(n) => Some(n.clone()),
                Message::Command(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.messages.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().unwrap().is_empty()
    }
}

impl MessageSink for InMemorySink {
    fn emit(&self, message: Message) {
        self.messages.lock().unwrap().push(message);
    }
}

/// Sink that discards everything.
pub struct NullSink;

impl MessageSink for NullSink {
    fn emit(&self, _message: Message) {}
}

/// Writes each message as one line of JSON.
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> MessageSink for JsonLinesSink<W> {
    fn emit(&self, message: Message) {
        let line = match message.to_json() {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode message");
                return;
            }
        };

        let mut writer = self.writer.lock().expect("json sink mutex poisoned");
        if let Err(e) = writeln!(writer, "{line}").and_then(|_| writer.flush()) {
            tracing::warn!(error = %e, "failed to write message");
        }
    }
}
