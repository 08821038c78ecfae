use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single weather fetch.
///
/// `Network` means the server answered but the answer was unusable;
/// `Transport` means no usable answer arrived at all.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("weather API responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("weather API response did not match the expected schema: {0}")]
    Schema(#[source] serde_json::Error),

    #[error("failed to reach weather API: {0}")]
    Request(#[source] reqwest::Error),

    #[error("weather API response body is malformed: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Coarse classification the controller and callers care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Network,
    Transport,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Status { .. } | FetchError::Schema(_) => FetchErrorKind::Network,
            FetchError::Request(_) | FetchError::Malformed(_) => FetchErrorKind::Transport,
        }
    }

    pub fn is_network(&self) -> bool {
        self.kind() == FetchErrorKind::Network
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == FetchErrorKind::Transport
    }

    /// Split a JSON decode failure: well-formed JSON of the wrong shape is the
    /// server's fault, broken bytes are a transport problem.
    pub(crate) fn from_decode(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        match err.classify() {
            Category::Data => FetchError::Schema(err),
            Category::Syntax | Category::Eof | Category::Io => FetchError::Malformed(err),
        }
    }
}
