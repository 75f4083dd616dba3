//! Recognizer that delegates capture to the remote executor boundary.

use lazyhand_protocol::{Command, MessageSinkRef};

use crate::{Result, SpeechRecognizer};

/// Emits `voice_record` / `voice_stop` commands and leaves capture,
/// transcription and typing to whoever consumes them.
pub struct ForwardingRecognizer {
    sink: MessageSinkRef,
    active: bool,
}

impl ForwardingRecognizer {
    pub fn new(sink: MessageSinkRef) -> Self {
        Self {
            sink,
            active: false,
        }
    }
}

impl SpeechRecognizer for ForwardingRecognizer {
    fn start(&mut self) -> Result<()> {
        self.sink.emit(Command::VoiceRecord.into());
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.sink.emit(Command::VoiceStop.into());
        self.active = false;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }

    /// The remote side types its own transcript.
    fn fetch_result(&mut self) -> Result<Option<String>> {
        Ok(None)
    }
}
