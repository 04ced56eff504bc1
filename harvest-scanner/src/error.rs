use std::fmt;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Upstream returned HTTP {status_code} for {url}")]
    UpstreamHttp { status_code: u16, url: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Content not found: {0}")]
    ContentNotFound(String),

    #[error("No code blocks or asset links found on {0}")]
    NoContentFound(String),

    #[error("Packaging error: {0}")]
    Packaging(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Coarse classification of a [`ScrapeError`], for shells that need to map
/// failures onto their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    Network,
    Timeout,
    UpstreamHttp,
    AuthenticationFailed,
    ContentNotFound,
    NoContentFound,
    Packaging,
    Unexpected,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Network => "network_error",
            ErrorKind::Timeout => "timeout",
            ErrorKind::UpstreamHttp => "upstream_http_error",
            ErrorKind::AuthenticationFailed => "authentication_failed",
            ErrorKind::ContentNotFound => "content_not_found",
            ErrorKind::NoContentFound => "no_content_found",
            ErrorKind::Packaging => "packaging_error",
            ErrorKind::Unexpected => "unexpected",
        }
    }

    /// Conventional HTTP status for this kind of failure.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::InvalidInput => 400,
            ErrorKind::AuthenticationFailed => 401,
            ErrorKind::ContentNotFound | ErrorKind::NoContentFound => 404,
            ErrorKind::Timeout => 408,
            ErrorKind::UpstreamHttp => 502,
            ErrorKind::Network => 503,
            ErrorKind::Packaging | ErrorKind::Unexpected => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ScrapeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScrapeError::InvalidInput(_) => ErrorKind::InvalidInput,
            ScrapeError::Network(_) => ErrorKind::Network,
            ScrapeError::Timeout(_) => ErrorKind::Timeout,
            ScrapeError::UpstreamHttp { .. } => ErrorKind::UpstreamHttp,
            ScrapeError::AuthenticationFailed(_) => ErrorKind::AuthenticationFailed,
            ScrapeError::ContentNotFound(_) => ErrorKind::ContentNotFound,
            ScrapeError::NoContentFound(_) => ErrorKind::NoContentFound,
            ScrapeError::Packaging(_) => ErrorKind::Packaging,
            ScrapeError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Logs the full failure and returns an `Unexpected` error that only
    /// names the operation, so internals never leak to the caller.
    pub fn unexpected(operation: &str, cause: impl fmt::Display) -> Self {
        error!(operation, error = %cause, "unexpected failure");
        ScrapeError::Unexpected(format!("{} failed unexpectedly", operation))
    }
}

impl From<tokio::task::JoinError> for ScrapeError {
    fn from(err: tokio::task::JoinError) -> Self {
        ScrapeError::unexpected("background task", err)
    }
}

impl From<zip::result::ZipError> for ScrapeError {
    fn from(err: zip::result::ZipError) -> Self {
        ScrapeError::Packaging(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
