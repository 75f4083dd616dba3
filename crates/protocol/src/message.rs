//! Typed commands and notices, and their `{type, data, ...}` wire shape.

use lazyhand_gesture::ScrollDirection;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::ProtocolError;

/// Default title shown on notices.
pub const DEFAULT_NOTICE_TITLE: &str = "Lazyhand";

/// Default notice display time, in seconds.
pub const DEFAULT_NOTICE_DURATION: f32 = 1.0;

/// Every tag that may appear in a message's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
    MouseMove,
    MouseClick,
    MouseScrollUp,
    MouseScrollDown,
    SendKeys,
    VoiceRecord,
    VoiceStop,
    Backspace,
    TypeText,
}

impl MessageType {
    /// The wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Info => "info",
            MessageType::Success => "success",
            MessageType::Warning => "warning",
            MessageType::Error => "error",
            MessageType::MouseMove => "mouse_move",
            MessageType::MouseClick => "mouse_click",
            MessageType::MouseScrollUp => "mouse_scroll_up",
            MessageType::MouseScrollDown => "mouse_scroll_down",
            MessageType::SendKeys => "send_keys",
            MessageType::VoiceRecord => "voice_record",
            MessageType::VoiceStop => "voice_stop",
            MessageType::Backspace => "backspace",
            MessageType::TypeText => "type_text",
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message as it travels on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    #[serde(rename = "type")]
    pub kind: MessageType,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f32>,
}

impl WireMessage {
    fn bare(kind: MessageType, data: Value) -> Self {
        Self {
            kind,
            data,
            msg: None,
            title: None,
            duration: None,
        }
    }
}

/// An instruction for the action executor boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    MouseMove { x: i32, y: i32 },
    MouseClick,
    MouseScroll(ScrollDirection),
    SendKeys { key_str: String },
    VoiceRecord,
    VoiceStop,
    Backspace,
    TypeText { text: String },
}

impl Command {
    pub fn message_type(&self) -> MessageType {
        match self {
            Command::MouseMove { .. } => MessageType::MouseMove,
            Command::MouseClick => MessageType::MouseClick,
            Command::MouseScroll(ScrollDirection::Up) => MessageType::MouseScrollUp,
            Command::MouseScroll(ScrollDirection::Down) => MessageType::MouseScrollDown,
            Command::SendKeys { .. } => MessageType::SendKeys,
            Command::VoiceRecord => MessageType::VoiceRecord,
            Command::VoiceStop => MessageType::VoiceStop,
            Command::Backspace => MessageType::Backspace,
            Command::TypeText { .. } => MessageType::TypeText,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A user-visible toast.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub msg: String,
    pub duration: f32,
}

impl Notice {
    pub fn new(level: NoticeLevel, msg: impl Into<String>) -> Self {
        Self {
            level,
            title: DEFAULT_NOTICE_TITLE.to_string(),
            msg: msg.into(),
            duration: DEFAULT_NOTICE_DURATION,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, msg)
    }

    pub fn success(msg: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, msg)
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, msg)
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, msg)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Anything exchanged with the executor boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Command(Command),
    Notice(Notice),
}

impl Message {
    pub fn from_json(line: &str) -> crate::Result<Self> {
        let wire: WireMessage = serde_json::from_str(line)?;
        Self::try_from(wire)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(&WireMessage::from(self))?)
    }
}

impl From<Command> for Message {
    fn from(command: Command) -> Self {
        Message::Command(command)
    }
}

impl From<Notice> for Message {
    fn from(notice: Notice) -> Self {
        Message::Notice(notice)
    }
}

#[derive(Deserialize)]
struct PointPayload {
    x: i32,
    y: i32,
}

#[derive(Deserialize)]
struct KeysPayload {
    key_str: String,
}

#[derive(Deserialize)]
struct TextPayload {
    text: String,
}

fn payload<T: DeserializeOwned>(kind: MessageType, data: Value) -> crate::Result<T> {
    serde_json::from_value(data).map_err(|e| ProtocolError::InvalidPayload {
        kind,
        reason: e.to_string(),
    })
}

impl TryFrom<WireMessage> for Message {
    type Error = ProtocolError;

    fn try_from(wire: WireMessage) -> crate::Result<Self> {
        let command = match wire.kind {
            MessageType::Info => return Ok(notice_from_wire(NoticeLevel::Info, wire)),
            MessageType::Success => return Ok(notice_from_wire(NoticeLevel::Success, wire)),
            MessageType::Warning => return Ok(notice_from_wire(NoticeLevel::Warning, wire)),
            MessageType::Error => return Ok(notice_from_wire(NoticeLevel::Error, wire)),
            MessageType::MouseMove => {
                let p: PointPayload = payload(wire.kind, wire.data)?;
                Command::MouseMove { x: p.x, y: p.y }
            }
            MessageType::MouseClick => Command::MouseClick,
            MessageType::MouseScrollUp => Command::MouseScroll(ScrollDirection::Up),
            MessageType::MouseScrollDown => Command::MouseScroll(ScrollDirection::Down),
            MessageType::SendKeys => {
                let p: KeysPayload = payload(wire.kind, wire.data)?;
                Command::SendKeys { key_str: p.key_str }
            }
            MessageType::VoiceRecord => Command::VoiceRecord,
            MessageType::VoiceStop => Command::VoiceStop,
            MessageType::Backspace => Command::Backspace,
            MessageType::TypeText => {
                let p: TextPayload = payload(wire.kind, wire.data)?;
                Command::TypeText { text: p.text }
            }
        };
        Ok(Message::Command(command))
    }
}

fn notice_from_wire(level: NoticeLevel, wire: WireMessage) -> Message {
    Message::Notice(Notice {
        level,
        title: wire
            .title
            .unwrap_or_else(|| DEFAULT_NOTICE_TITLE.to_string()),
        msg: wire.msg.unwrap_or_default(),
        duration: wire.duration.unwrap_or(DEFAULT_NOTICE_DURATION),
    })
}

impl From<&Command> for WireMessage {
    fn from(command: &Command) -> Self {
        let kind = command.message_type();
        let data = match command {
            Command::MouseMove { x, y } => json!({ "x": x, "y": y }),
            Command::SendKeys { key_str } => json!({ "key_str": key_str }),
            Command::TypeText { text } => json!({ "text": text }),
            _ => json!({}),
        };
        WireMessage::bare(kind, data)
    }
}

impl From<&Notice> for WireMessage {
    fn from(notice: &Notice) -> Self {
        let kind = match notice.level {
            NoticeLevel::Info => MessageType::Info,
            NoticeLevel::Success => MessageType::Success,
            NoticeLevel::Warning => MessageType::Warning,
            NoticeLevel::Error => MessageType::Error,
        };
        WireMessage {
            kind,
            data: Value::Null,
            msg: Some(notice.msg.clone()),
            title: Some(notice.title.clone()),
            duration: Some(notice.duration),
        }
    }
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        match message {
            Message::Command(c) => c.into(),
            Message::Notice(n) => n.into(),
        }
    }
}
