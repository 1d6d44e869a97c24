//! Domain errors

use thiserror::Error;

/// Errors raised by the read paths. `Clone` so a coalesced fetch can hand
/// the same failure to every waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Row {index} could not be decoded: {reason}")]
    Decode { index: usize, reason: String },
}

#[derive(Error, Debug)]
pub enum TimeLabelError {
    #[error("Invalid date '{input}': {source}")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),
}
