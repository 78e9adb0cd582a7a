use thiserror::Error;

/// Failure of a gallery or thumbnail fetch.
///
/// Delivered to completion callbacks as a value; fetches never panic across
/// the callback boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connectivity, DNS, TLS, timeout, or a non-2xx HTTP status.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        /// HTTP status when the server answered with a non-success code.
        status: Option<u16>,
    },

    /// The response body did not have the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The endpoint or image URL (or the credential) cannot form a request.
    #[error("invalid input '{input}': {reason}")]
    InvalidInput { input: String, reason: String },
}

impl FetchError {
    pub fn invalid_input(input: &str, reason: impl Into<String>) -> Self {
        FetchError::InvalidInput {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// HTTP status carried by a transport failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}
