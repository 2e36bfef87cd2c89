use thiserror::Error;

use crate::model::BulletinKind;

/// Why a single (station, kind) fetch did not produce a payload.
///
/// These are recoverable: the coordinator records one per failed request
/// and keeps going with the others.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("timed out waiting for response")]
    Timeout,

    #[error("rate limit exceeded (HTTP 429); try again in a minute")]
    RateLimited,

    #[error("HTTP error {0}")]
    HttpStatus(u16),

    #[error("empty response body")]
    EmptyBody,

    #[error("transport error: {0}")]
    Transport(String),
}

/// Why a fetched payload could not be turned into a bulletin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("payload is not valid JSON: {0}")]
    InvalidEncoding(String),

    #[error("no {0} data in response")]
    NoData(BulletinKind),
}
