use thiserror::Error;

/// Failures of a single request against the scorecard server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The request could not complete (connection refused, timeout, DNS).
    #[error("network failure: {0}")]
    NetworkFailure(String),
    /// The server answered with a non-success status or refused the action.
    #[error("server error {status}: {message}")]
    ServerError { status: u16, message: String },
    /// The body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
    /// The response belongs to a state the grid has already left. Never shown.
    #[error("stale response")]
    StaleResponse,
}

impl GridError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        GridError::ServerError {
            status,
            message: message.into(),
        }
    }

    /// Whether the user should be told about this error.
    pub fn is_visible(&self) -> bool {
        !matches!(self, GridError::StaleResponse)
    }
}

pub type GridResult<T> = std::result::Result<T, GridError>;
