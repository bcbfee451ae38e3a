//! Error types and handling for the signing library
//! Created: 2025-06-11
//!
//! Only failures that abort a whole operation live here. Per-field
//! problems are reported as [`crate::types::FieldIssue`] values instead.

use std::{io, result::Result as StdResult};

use thiserror::Error;

use crate::types::FieldId;

/// Custom result type for signing operations
pub type Result<T> = StdResult<T, Error>;

/// Core error type for signing operations
#[derive(Error, Debug)]
#[non_exhaustive]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    /// Missing document, missing signature image, or an empty field list.
    #[error("Input error: {0}")]
    InputError(String),

    /// The signature image is not a PNG or JPEG we can decode.
    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("PDF error: {0}")]
    PdfError(#[from] lopdf::Error),

    #[error("PDF structure error: {0}")]
    StructureError(String),

    #[error("Editor error: {0}")]
    EditorError(#[from] EditorError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl Error {
    pub fn input(reason: impl Into<String>) -> Self {
        Error::InputError(reason.into())
    }

    pub fn decode(reason: impl Into<String>) -> Self {
        Error::DecodeError(reason.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::DecodeError(err.to_string())
    }
}

// -------------------- Sub-Error Categories --------------------

/// Rejected editor gestures.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EditorError {
    #[error("Unknown field: {0}")]
    UnknownField(FieldId),

    #[error("Field {0} already exists")]
    DuplicateField(FieldId),

    #[error("Field {0} must be selected first")]
    NotSelected(FieldId),

    #[error("Another gesture is already in progress")]
    GestureInProgress,

    #[error("Page {page} does not exist (document has {page_count} pages)")]
    PageOutOfRange { page: u32, page_count: u32 },

    #[error("No document is open")]
    NoDocument,
}
