//! Rate source errors

use thiserror::Error;

/// Why a rate table could not be obtained from a source
#[derive(Error, Debug)]
pub enum RateSourceError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("rate source returned status {status}")]
    Status { status: u16 },

    #[error("invalid rate payload: {0}")]
    Parse(String),

    #[error("rate payload has no table for base '{0}'")]
    MissingBase(String),

    #[error("rate source unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for RateSourceError {
    fn from(err: serde_json::Error) -> Self {
        RateSourceError::Parse(err.to_string())
    }
}
