//! Error types for the SocialSeed API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the user does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the raw
//! status code and body, so the backend's own message reaches the caller
//! untouched. Errors are returned exactly as produced; nothing re-wraps them
//! on the way up.

use thiserror::Error;

/// Errors returned by the relationship services and the authenticated client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found: {body}")]
    NotFound { body: String },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response (DNS, refused connection, I/O).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// A list query asked for pages of zero elements.
    #[error("page size must be greater than zero")]
    InvalidPageSize,

    /// Query parameters could not be encoded into the URL.
    #[error("query encoding failed: {0}")]
    QueryEncoding(#[from] serde_urlencoded::ser::Error),
}

/// Errors raised while reading or writing the persisted session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A value exists under the session key but is not a valid user record.
    #[error("stored session is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors raised while loading locale bundles.
#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("unsupported locale: {0}")]
    Unsupported(String),

    #[error("failed to read bundle for {locale}: {source}")]
    Io {
        locale: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bundle for {locale} is not valid JSON: {source}")]
    Malformed {
        locale: String,
        #[source]
        source: serde_json::Error,
    },
}
