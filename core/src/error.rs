//! Error types for the PetFriends API client.
//!
//! # Design
//! HTTP status codes are never errors here: a 403 or 415 is an ordinary
//! `ApiResponse` that callers assert on. `ApiError` covers only the failures
//! that make a call impossible to complete or a body impossible to read.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the client, the transport and configuration loading.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, TLS, read).
    #[error("transport failed: {0}")]
    Transport(String),

    /// A photo attachment does not exist on disk. Raised before any request
    /// is built.
    #[error("photo file {} not found", .0.display())]
    MissingPhoto(PathBuf),

    /// A photo attachment exists but could not be read.
    #[error("failed to read photo {}: {source}", path.display())]
    PhotoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The response body could not be viewed as the requested type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A required configuration value is absent.
    #[error("missing setting {0}")]
    MissingSetting(&'static str),
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}
