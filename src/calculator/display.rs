//! What a front end shows for a session.

use serde::Serialize;

/// Message shown for every evaluation failure.
pub const DEFAULT_ERROR_MESSAGE: &str = "Calculation error";

/// The externally visible rendering of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    /// Error message, buffer contents, or `"0"` for an empty buffer.
    pub text: String,
    pub is_error: bool,
}

impl DisplayState {
    /// Render a buffer with no active error.
    pub fn from_buffer(buffer: &str) -> Self {
        let text = if buffer.is_empty() { "0" } else { buffer };
        Self {
            text: text.to_string(),
            is_error: false,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            text: message.to_string(),
            is_error: true,
        }
    }
}
