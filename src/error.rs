use thiserror::Error;
use x509_parser::prelude::X509Error;

/// Validation-related errors
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Business rejection of a certificate. Ends the validation call
    /// with a human-readable message.
    #[error("{0}")]
    Failed(String),

    #[error("Certificate bucket error: {0}")]
    Bucket(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("X.509 parsing failed: {0}")]
    Parse(#[from] X509Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timeout while fetching CRL")]
    Timeout,

    #[error("Custom error: {0}")]
    Custom(String),
}

impl ValidationError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Whether this is a terminal rule failure rather than an
    /// infrastructure problem.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Convenient Result type alias
pub type ValidationResult<T> = Result<T, ValidationError>;
