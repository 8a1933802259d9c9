//! Failure taxonomy for rate lookups

use thiserror::Error;

/// Everything that can go wrong while answering a rate request.
///
/// Client-caused conditions map to 400, provider-caused ones to 500.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RateError {
    #[error("Invalid amount")]
    InvalidAmount,
    #[error("Invalid currency code")]
    InvalidCurrency,
    #[error("{0}")]
    UpstreamUnavailable(String),
}

impl RateError {
    pub fn upstream(message: impl Into<String>) -> Self {
        RateError::UpstreamUnavailable(message.into())
    }

    /// HTTP status code this condition is surfaced with.
    pub fn status_code(&self) -> u16 {
        match self {
            RateError::InvalidAmount | RateError::InvalidCurrency => 400,
            RateError::UpstreamUnavailable(_) => 500,
        }
    }
}
