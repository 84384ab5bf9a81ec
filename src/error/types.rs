//! Core error types

use thiserror::Error;

/// Result type for portal operations
pub type Result<T> = std::result::Result<T, PortalError>;

/// Errors produced by the portal clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortalError {
    /// Transport-level failure while sending a request or reading a body
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The service answered with a non-success status
    #[error("API error {code}: {message}")]
    ApiError { code: u16, message: String },

    /// Credentials were rejected or a token is no longer valid
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The connection could not be established
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request did not complete in time
    #[error("Timeout error: {0}")]
    TimeoutError(String),

    /// Failure while reading a streamed response body
    #[error("Stream error: {0}")]
    StreamError(String),

    /// A response could not be interpreted
    #[error("Parse error: {0}")]
    ParseError(String),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Invalid client configuration (header, proxy, URL)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Caller supplied input that cannot be sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Local filesystem failure
    #[error("IO error: {0}")]
    IoError(String),

    /// The ingestion job ended with a terminal failure reported in-stream
    #[error("Ingestion error: {0}")]
    IngestionError(String),
}

/// Coarse classification of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Authentication,
    Client,
    Server,
    Parsing,
    Validation,
    Processing,
    Io,
}

impl PortalError {
    /// Build an `ApiError` for the given status and message.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_)
            | Self::ConnectionError(_)
            | Self::TimeoutError(_)
            | Self::StreamError(_) => ErrorCategory::Network,
            Self::AuthenticationError(_) => ErrorCategory::Authentication,
            Self::ApiError { code, .. } if *code == 401 || *code == 403 => {
                ErrorCategory::Authentication
            }
            Self::ApiError { code, .. } if *code >= 500 => ErrorCategory::Server,
            Self::ApiError { .. } => ErrorCategory::Client,
            Self::ParseError(_) | Self::JsonError(_) => ErrorCategory::Parsing,
            Self::ConfigurationError(_) | Self::InvalidInput(_) => ErrorCategory::Validation,
            Self::IngestionError(_) => ErrorCategory::Processing,
            Self::IoError(_) => ErrorCategory::Io,
        }
    }

    /// Whether repeating the same request might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::TimeoutError(_) | Self::StreamError(_) => true,
            Self::ApiError { code, .. } => *code == 429 || *code >= 500,
            _ => false,
        }
    }

    /// The message without the variant prefix, suitable for showing to a user.
    pub fn user_message(&self) -> String {
        match self {
            Self::ApiError { message, .. } => message.clone(),
            Self::HttpError(m)
            | Self::AuthenticationError(m)
            | Self::ConnectionError(m)
            | Self::TimeoutError(m)
            | Self::StreamError(m)
            | Self::ParseError(m)
            | Self::JsonError(m)
            | Self::ConfigurationError(m)
            | Self::InvalidInput(m)
            | Self::IoError(m)
            | Self::IngestionError(m) => m.clone(),
        }
    }
}
