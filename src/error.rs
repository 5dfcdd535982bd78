//! Crate-level error type.
//!
//! Every fallible library call returns [`ClientError`]. The session controller
//! never lets one escape: it converts each failure into user-facing text with
//! [`ClientError::user_message`].

use thiserror::Error;

/// Shown when the request never produced a usable HTTP response.
pub const NETWORK_FAILURE_MESSAGE: &str = "Could not reach the server.";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-2xx status. `detail` is the `detail`
    /// field of the JSON error body when one could be read.
    #[error("server returned HTTP {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Server { status: u16, detail: Option<String> },

    /// Connection refused, DNS failure, timeout, or a body that could not be
    /// read off the wire.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A 2xx body did not match the expected JSON shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// Upload refused locally because the file is not a PDF.
    #[error("not a PDF: {0}")]
    NotPdf(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Text to surface to the user for this failure.
    ///
    /// * server errors with a `detail` → the detail, verbatim
    /// * server errors without one → `fallback`
    /// * transport and decode failures → a generic network message
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Server {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => detail.clone(),
            ClientError::Server { .. } => fallback.to_string(),
            ClientError::Transport(_) | ClientError::Decode(_) => {
                NETWORK_FAILURE_MESSAGE.to_string()
            }
            ClientError::NotPdf(_) => "Please choose a PDF file.".to_string(),
            ClientError::Io(e) => format!("Could not read the file: {e}"),
            ClientError::Config(msg) => msg.clone(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}
