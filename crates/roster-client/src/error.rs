use thiserror::Error;

/// Errors returned by [`crate::StudentsApi`] implementations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("server returned {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Api {
        status: u16,
        /// The `error` field of the response body, when there was one.
        message: Option<String>,
    },

    /// The request never produced a usable response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// The server's own message, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => message.as_deref(),
            ClientError::Transport(_) => None,
        }
    }
}
