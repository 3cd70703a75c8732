use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by every client operation.
#[derive(Debug, Error)]
pub enum MogileError {
    /// No configured tracker accepted a connection. Carries the last dial error.
    #[error("no tracker reachable: {0}")]
    Connection(#[source] std::io::Error),

    /// The tracker reply matched neither the `OK` nor the `ERR` grammar.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The tracker answered `ERR <code> ...`.
    #[error("tracker error: {code}{}", describe(.message))]
    Application {
        code: String,
        message: Option<String>,
    },

    /// A storage node answered a PUT or GET with a status other than 200.
    #[error("storage node returned http status {0}")]
    StorageHttp(StatusCode),

    /// I/O failure on an established tracker connection.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Network failure talking to a storage node.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A tracker read or write deadline elapsed.
    #[error("timeout")]
    Timeout,

    /// The caller's cancellation token fired.
    #[error("operation cancelled")]
    Cancelled,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The tracker knows no storage path for the key.
    #[error("no paths for key: {0}")]
    NoPaths(String),
}

impl MogileError {
    pub(crate) fn application(code: impl Into<String>, message: Option<String>) -> Self {
        MogileError::Application {
            code: code.into(),
            message,
        }
    }

    /// Returns the tracker error code for [`MogileError::Application`].
    pub fn code(&self) -> Option<&str> {
        match self {
            MogileError::Application { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Returns true if the error came from failing to reach any tracker.
    pub fn is_connection(&self) -> bool {
        matches!(self, MogileError::Connection(_))
    }
}

fn describe(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(" ({})", m),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, MogileError>;
