//! Error types for the lottery results pipeline
//!
//! Every failure a refresh cycle can produce is one of these variants.
//! None of them is fatal to the host: the coordinator keeps the previous
//! record and flags the data as unavailable.

use std::fmt;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// The results page could not be retrieved
    #[error("Connectivity error ({url}): {cause}")]
    Connectivity {
        /// URL that was requested
        url: String,
        /// What went wrong
        cause: ConnectivityCause,
    },

    /// The markup could not be turned into a document tree
    #[error("Parse error: {0}")]
    Parse(String),

    /// Fewer valid numeric tokens than a draw needs
    #[error("Insufficient data: found {found} valid numbers, need at least {required}")]
    InsufficientData {
        /// Number of accepted tokens
        found: usize,
        /// Number of tokens a draw needs
        required: usize,
    },

    /// The page was reachable but did not look like a results page
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A draw record was built from out-of-range values
    #[error("Invalid draw: {0}")]
    InvalidDraw(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Underlying cause of a [`Error::Connectivity`] failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityCause {
    /// The server answered with something other than 200 OK
    Status(u16),
    /// The request did not complete within the configured timeout
    Timeout,
    /// DNS, connection, TLS or body read failure
    Transport(String),
}

impl fmt::Display for ConnectivityCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectivityCause::Status(code) => write!(f, "HTTP {}", code),
            ConnectivityCause::Timeout => write!(f, "request timed out"),
            ConnectivityCause::Transport(msg) => write!(f, "{}", msg),
        }
    }
}

impl Error {
    /// Create a connectivity error
    pub fn connectivity(url: impl Into<String>, cause: ConnectivityCause) -> Self {
        Self::Connectivity {
            url: url.into(),
            cause,
        }
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an insufficient data error
    pub fn insufficient(found: usize, required: usize) -> Self {
        Self::InsufficientData { found, required }
    }

    /// Create an invalid data error
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Create an invalid draw error
    pub fn invalid_draw(msg: impl Into<String>) -> Self {
        Self::InvalidDraw(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the next scheduled cycle may succeed where this one failed
    ///
    /// Configuration and construction errors will not fix themselves.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Connectivity { .. }
                | Error::Parse(_)
                | Error::InsufficientData { .. }
                | Error::InvalidData(_)
        )
    }
}
