//! Error types for the persistence medium and the description client.
//!
//! Most [`crate::RecordStore`] methods log these and fall back to an empty
//! result or a no-op; only the `try_` toggles hand them out.

/// Failure of the key-value persistence medium.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No persistent storage context exists (or it was disabled).
    #[error("persistent storage is not available")]
    Unavailable,

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// The stored blob exists but does not decode as the expected record
    /// type. Writes to the key are refused so the blob is not clobbered.
    #[error("stored value under `{key}` could not be decoded: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("value could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Failure of a description generation call.
#[derive(Debug, thiserror::Error)]
pub enum DescriptionError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response contained no text")]
    EmptyResponse,
}
