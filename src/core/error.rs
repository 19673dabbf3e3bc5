use std::io;
use thiserror::Error;

/// Unified error type for termsage
#[derive(Error, Debug)]
pub enum TermsageError {
    /// The inference service answered, but not with something usable
    #[error("API error: {0}")]
    Api(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// Command execution errors
    #[error("Execution error: {0}")]
    Execution(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The inference service did not answer in time
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The inference service could not be reached at all
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Unknown or unexpected errors
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<reqwest::Error> for TermsageError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TermsageError::Timeout(err.to_string())
        } else if err.is_connect() {
            TermsageError::Unavailable(err.to_string())
        } else if err.is_status() {
            TermsageError::Api(format!("service returned error status: {}", err))
        } else if err.is_decode() {
            TermsageError::Serialization(format!("malformed response: {}", err))
        } else {
            TermsageError::Unknown(format!("request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for TermsageError {
    fn from(err: serde_json::Error) -> Self {
        TermsageError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for TermsageError {
    fn from(err: serde_yml::Error) -> Self {
        TermsageError::Serialization(format!("YAML error: {}", err))
    }
}

impl From<String> for TermsageError {
    fn from(err: String) -> Self {
        TermsageError::Unknown(err)
    }
}

impl From<&str> for TermsageError {
    fn from(err: &str) -> Self {
        TermsageError::Unknown(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TermsageError>;
