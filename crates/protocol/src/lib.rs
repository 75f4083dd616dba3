//! Command protocol spoken at the action-executor boundary.
//!
//! Every message is a JSON object with a `type` tag and a kind-specific
//! `data` payload. Notices ("toasts") reuse the same envelope with `msg`,
//! `title` and `duration` fields.
//!
//! ```text
//! {"type":"send_keys","data":{"key_str":"ctrl+r"}}
//! {"type":"info","msg":"Detection paused","title":"Lazyhand","duration":1.0}
//! ```

mod keys;
mod message;
mod sink;

pub use keys::{parse_key_combo, KeyCombo, KeyParseError, KeyToken, NamedKey};
pub use message::{
    Command, Message, MessageType, Notice, NoticeLevel, WireMessage, DEFAULT_NOTICE_DURATION,
    DEFAULT_NOTICE_TITLE,
};
pub use sink::{InMemorySink, JsonLinesSink, MessageSink, MessageSinkRef, NullSink};

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid payload for {kind:?}: {reason}")]
    InvalidPayload { kind: MessageType, reason: String },
    #[error(transparent)]
    Keys(#[from] KeyParseError),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
