//! Frame pipeline and action dispatch for lazyhand.
//!
//! Wires the pure gesture core to the executor and voice capabilities:
//!
//! - [`GesturePipeline`]: arbitrate, debounce and dispatch one frame
//! - [`FrameWorker`]: runs the pipeline on its own thread, dropping late frames
//! - [`PipelineControl`]: the shared detection flag and key binding
//! - [`CommandHandler`]: applies inbound protocol commands to an executor
//! - [`PipelineSettings`]: user configuration

mod control;
mod dispatcher;
mod pipeline;
mod remote;
mod settings;
mod state;
mod worker;

pub use control::{ControlState, PipelineControl};
pub use dispatcher::{Action, Dispatcher};
pub use pipeline::GesturePipeline;
pub use remote::CommandHandler;
pub use settings::{PipelineSettings, SettingsError, DEFAULT_FOUR_FINGERS_UP_SEND};
pub use state::PipelineState;
pub use worker::FrameWorker;

use lazyhand_input::InputError;
use lazyhand_protocol::{KeyParseError, ProtocolError};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Keys(#[from] KeyParseError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("voice capture is not available here")]
    VoiceUnavailable,
    #[error("frame worker failed to start: {0}")]
    WorkerStartup(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
