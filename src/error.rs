//! Error types for document projection.

use thiserror::Error;

/// Errors raised by the projector.
///
/// The resolver never fails: dangling identifiers and malformed relationship
/// shapes degrade to empty values instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("serializer has no source data")]
    MissingSourceData,

    #[error("failed to render document: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
