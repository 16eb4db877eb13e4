/// Why an operation did not produce data.
///
/// Kept `Clone` so it can sit inside a [`crate::RequestState`] snapshot,
/// which means transport errors are captured as their message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("Request failed: {status} {status_text}")]
    RequestFailed { status: u16, status_text: String },
    #[error("Network error: {0}")]
    Transport(String),
    /// The body did not parse as its content type implies.
    #[error("Could not decode response: {0}")]
    Decode(String),
    /// The operation was aborted through its cancellation token. Never
    /// surfaced in a controller's state.
    #[error("Request cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() || e.is_body() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
