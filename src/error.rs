//! Error types for the whiteboard subsystems.
//!
//! Every failure is local to the action that triggered it: callers log or
//! report the error and carry on with the state they already had.

use thiserror::Error;

/// Errors raised by the key/value blob store and the slide codec
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("not a PNG data URL")]
    NotDataUrl,
}

/// Errors raised while acquiring an image to paste
#[derive(Error, Debug)]
pub enum AcquireError {
    /// The source cannot be used on this system, or access was denied
    #[error("{source_name} unavailable: {reason}")]
    Unavailable {
        source_name: &'static str,
        reason: String,
    },

    #[error("no image found in clipboard")]
    NoImage,

    #[error("image selection cancelled")]
    Cancelled,

    #[error("could not load image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("could not load image: {0} has no pixels")]
    Empty(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no image sources configured")]
    NoSources,
}

impl AcquireError {
    /// Whether an acquisition chain should go on to its next source. Only a
    /// source that cannot be used at all hands over; an empty clipboard or a
    /// bad image is reported as is.
    pub fn falls_through(&self) -> bool {
        matches!(self, AcquireError::Unavailable { .. })
    }
}

/// Errors raised while building the exported document
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("nothing to export")]
    NoPages,

    #[error("PDF library unavailable: {0}")]
    LibraryUnavailable(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading the settings file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;
