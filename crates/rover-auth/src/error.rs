//! Error types for credential exchange operations
//!
//! Only transport and parse failures are errors. A missing credential or a
//! denied login is an [`ExchangeOutcome`](crate::ExchangeOutcome) value.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("upstream did not respond within {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("invalid provider configuration: {0}")]
    Config(String),
}

impl Error {
    /// Whether the provider could not be reached at all (as opposed to
    /// answering with something unusable).
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
