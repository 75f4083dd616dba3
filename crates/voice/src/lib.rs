//! Speech capture for lazyhand.
//!
//! The gesture pipeline only ever sees a [`SpeechRecognizer`]: something
//! that can start and stop capture and hand back the final text. Because
//! capture and transcription block, the pipeline drives the recognizer
//! through a [`VoiceWorker`] on its own thread.
//!
//! [`ForwardingRecognizer`] is the one shipped implementation; it hands
//! capture off to a remote executor over the command protocol.

mod forward;
mod worker;

pub use forward::ForwardingRecognizer;
pub use worker::{VoiceEvent, VoiceStatus, VoiceWorker};

/// Capture-and-transcribe capability.
///
/// Calls may block; never invoke them from the frame loop directly.
pub trait SpeechRecognizer: Send {
    /// Begin capturing audio.
    fn start(&mut self) -> Result<()>;

    /// Stop capturing audio.
    fn stop(&mut self) -> Result<()>;

    fn is_active(&self) -> bool;

    /// Final transcript of the most recent capture, if there is one.
    fn fetch_result(&mut self) -> Result<Option<String>>;
}

#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("speech recognizer unavailable: {0}")]
    Unavailable(String),
    #[error("audio capture failed: {0}")]
    CaptureFailed(String),
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
}

pub type Result<T> = std::result::Result<T, VoiceError>;
