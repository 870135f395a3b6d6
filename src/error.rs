// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Query conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Search execution failed: {0}")]
    SearchExecution(String),

    #[error("Client initialization failed: {0}")]
    ClientInitialization(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl QueryError {
    /// Startup failures abort the process; everything else is per-query.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            QueryError::Configuration(_) | QueryError::ClientInitialization(_)
        )
    }
}

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("model request failed: {0}")]
    Transport(String),

    #[error("model request timed out after {0:?}")]
    Timeout(Duration),

    #[error("model endpoint returned status {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    #[error("model response could not be decoded: {0}")]
    MalformedResponse(String),

    #[error("model response contained no content")]
    EmptyResponse,

    #[error("model response is not valid JSON: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Failed(String),
}
