//! Unified error types for carta-sw.

use tokio_rusqlite::rusqlite;

/// Unified error types for the offline cache worker.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input (e.g., storing a non-200 response).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Network fetch failed.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Precaching the install manifest failed; installation is aborted.
    #[error("PRECACHE_FAILED: {0}")]
    PrecacheFailed(String),

    /// Malformed precache manifest.
    #[error("INVALID_MANIFEST: {0}")]
    InvalidManifest(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
