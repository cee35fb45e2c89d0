//! Error types for enrichment and the song service.

use songlib_core::SongId;
use thiserror::Error;

/// Errors that can occur while fetching song metadata.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// The request never produced a response (connect failure, timeout).
    #[error("HTTP error from {source_name}: {message}")]
    Http {
        source_name: String,
        message: String,
    },

    /// The source answered with a non-success status.
    #[error("{source_name} returned status {status}")]
    Status { source_name: String, status: u16 },

    /// A response from the source could not be decoded.
    #[error("parse error from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// The configured base URL is not usable.
    #[error("invalid URL for {source_name}: {url}")]
    InvalidUrl { source_name: String, url: String },

    /// An error propagated from `reqwest` while building the client.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl EnrichError {
    /// Returns `true` when the error is transient and the request may
    /// succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Convenience alias for enrichment results.
pub type EnrichResult<T> = std::result::Result<T, EnrichError>;

/// Errors surfaced by [`crate::SongService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The caller supplied input that can never succeed.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The referenced song does not exist.
    #[error("song {id} not found")]
    NotFound { id: String },

    /// Metadata enrichment failed and creation was aborted.
    #[error("enrichment failed: {0}")]
    Enrichment(#[from] EnrichError),

    /// The store failed.
    #[error("storage error: {0}")]
    Storage(songlib_core::Error),

    /// A blocking store task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ServiceError {
    pub(crate) fn not_found(id: SongId) -> Self {
        Self::NotFound { id: id.to_string() }
    }
}

impl From<songlib_core::Error> for ServiceError {
    fn from(err: songlib_core::Error) -> Self {
        match err {
            songlib_core::Error::NotFound { id, .. } => Self::NotFound { id },
            songlib_core::Error::InvalidData(message) => Self::Validation(message),
            other => Self::Storage(other),
        }
    }
}

/// Convenience alias for service results.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
