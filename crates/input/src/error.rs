//! Error types for the action executor.

use thiserror::Error;

/// Errors that can occur while injecting input.
#[derive(Debug, Error)]
pub enum InputError {
    /// Accessibility permission not granted (macOS).
    #[error("accessibility permission not granted - open System Settings > Privacy & Security > Accessibility")]
    AccessibilityNotGranted,

    /// Failed to initialize the input controller.
    #[error("failed to initialize input controller: {0}")]
    InitFailed(String),

    /// Failed to move or click the mouse.
    #[error("failed to drive mouse: {0}")]
    MouseFailed(String),

    /// Failed to type text.
    #[error("failed to type text: {0}")]
    TypeFailed(String),

    /// Failed to simulate key press.
    #[error("failed to simulate key: {0}")]
    KeyFailed(String),
}

pub type Result<T> = std::result::Result<T, InputError>;
