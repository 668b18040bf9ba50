//! Error types for the content layer.
//!
//! Store failures never reach page readers: the provider catches them at its
//! boundary and degrades to the default content. These types exist for the
//! callers that do care (the provider itself, the operator CLI, tests).

use thiserror::Error;

/// Failures talking to the remote content store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed for {target}: {source}")]
    Io {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stored document at {target} is not valid JSON: {source}")]
    Decode {
        target: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("store returned HTTP {status} for {target}")]
    Status { target: String, status: u16 },

    #[error("store transport failed: {0}")]
    Transport(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failures of the content provider and reconciler.
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("content was already loaded for this session")]
    AlreadyLoaded,

    #[error("content has not been loaded yet")]
    NotLoaded,

    #[error("content store was unreadable at load ({0}); refusing edits that would overwrite it")]
    Degraded(String),

    #[error("content patch must be a JSON object, got {0}")]
    InvalidPatch(&'static str),

    #[error("merged content does not fit the document schema: {0}")]
    Schema(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("persistence task ended abnormally: {0}")]
    WriteTask(String),
}

pub type CmsResult<T> = Result<T, CmsError>;

/// Failures of the device-local preference store.
#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("preference {key} could not be written: {source}")]
    Io {
        key: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("preference {key} could not be encoded: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("primary colour {0:?} is not a #rgb or #rrggbb hex value")]
    InvalidColor(String),
}
