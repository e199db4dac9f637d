//! Error types for the ojclient core library
//!
//! Every failure surfaced by the access layer is one of these variants. The
//! layer never swallows an error: a notification may be shown first, but the
//! caller always receives the rejection.

use thiserror::Error;

use crate::http::error::{ErrorClassification, HttpError};

/// Main error type for ojclient operations
#[derive(Error, Debug)]
pub enum Error {
    /// No response reached the client (timeout, DNS, connection refused)
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        /// Whether the fixed client timeout elapsed
        timeout: bool,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The server answered with a non-success status
    #[error("HTTP error [{status_code}]: {message}")]
    Http {
        status_code: u16,
        message: String,
        classification: ErrorClassification,
        body: Option<serde_json::Value>,
    },

    /// HTTP 200 with an envelope whose `code` reports failure
    #[error("API error [{code}]: {message}")]
    Api { code: i64, message: String },

    /// The pre-send interceptor failed before the request left the client
    #[error("Interceptor error: {message}")]
    Interceptor {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The request could not be assembled
    #[error("HTTP request error: {message}")]
    HttpRequest {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// HTTP status code, if the server produced a response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Http { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// True when no structured response was received
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }

    /// True when the fixed client timeout elapsed
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport { timeout: true, .. })
    }

    /// Classification of an HTTP failure
    pub fn classification(&self) -> Option<ErrorClassification> {
        match self {
            Error::Http { classification, .. } => Some(*classification),
            Error::Transport { .. } => Some(ErrorClassification::Network),
            _ => None,
        }
    }

    /// Create a configuration error without a source
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            source: None,
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<HttpError> for Error {
    fn from(http_error: HttpError) -> Self {
        match http_error.status_code {
            Some(status_code) => Error::Http {
                status_code,
                message: http_error.message,
                classification: http_error.classification,
                body: http_error.details,
            },
            None => Error::Transport {
                message: http_error.message,
                timeout: false,
                source: None,
            },
        }
    }
}
