use crate::endpoint::Operation;
use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`], for callers that map failures onto
/// their own status codes or retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rejected on the client before any request was sent.
    Validation,
    /// The request never produced a complete response.
    Transport,
    /// The server answered with a status outside the operation's success set.
    Api,
    /// The server answered with a success status but an unreadable body.
    Decode,
    /// The client itself could not be constructed.
    Configuration,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{operation}: connector name cannot be empty")]
    EmptyConnectorName { operation: Operation },

    #[error("{operation}: '{name}' is not a valid connector name")]
    InvalidConnectorName { operation: Operation, name: String },

    #[error("{operation}: failed to encode request body: {source}")]
    Encode {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },

    #[error("{operation}: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: TransportError,
    },

    #[error("{operation}: {message}")]
    Api {
        operation: Operation,
        status: StatusCode,
        error_code: i32,
        message: String,
    },

    #[error("{operation}: failed to decode error body (status {status}): {source}")]
    ErrorBody {
        operation: Operation,
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    #[error("{operation}: failed to decode response body (status {status}): {source}")]
    Decode {
        operation: Operation,
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyConnectorName { .. }
            | Error::InvalidConnectorName { .. }
            | Error::Encode { .. } => ErrorKind::Validation,
            Error::Transport { .. } => ErrorKind::Transport,
            Error::Api { .. } | Error::ErrorBody { .. } => ErrorKind::Api,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// The operation that failed, if the error came from one.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Error::EmptyConnectorName { operation }
            | Error::InvalidConnectorName { operation, .. }
            | Error::Encode { operation, .. }
            | Error::Transport { operation, .. }
            | Error::Api { operation, .. }
            | Error::ErrorBody { operation, .. }
            | Error::Decode { operation, .. } => Some(*operation),
            Error::Configuration(_) => None,
        }
    }

    /// HTTP status returned by the server, if a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. }
            | Error::ErrorBody { status, .. }
            | Error::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::Api && self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::Transport {
                source: TransportError::Timeout,
                ..
            }
        )
    }
}

/// Failure below the HTTP status level: nothing usable came back.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,

    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Http(err)
        }
    }
}
