//! Error types for the capture engine

use thiserror::Error;

/// Result type alias for capture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while planning or executing a capture
#[derive(Error, Debug)]
pub enum Error {
    /// The requested capture area has negative dimensions
    #[error("Invalid capture area: {0}")]
    InvalidArea(String),

    /// The document is wider than the single-capture pixel budget allows.
    /// No section height would satisfy the budget, so the operation is fatal.
    #[error("The capture budget of {budget} pixels must be at least one times the document width ({document_width}); raise the budget")]
    ResolutionBudget { budget: u64, document_width: u64 },

    /// A block-out rectangle spec is missing fields or has non-numeric fields
    #[error("Malformed rectangle: {0}")]
    MalformedRect(String),

    /// A block-out spec is neither a selector string, a rectangle, nor an element
    #[error("Unknown block-out type: {0}")]
    UnknownBlockOut(String),

    /// Invalid capture configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A remote call failed (propagated unchanged from the collaborator)
    #[error("Remote call failed: {0}")]
    Remote(String),

    /// The remote target returned data the capture scripts cannot interpret
    #[error("Unexpected remote payload: {0}")]
    Protocol(String),

    /// A captured raster could not be decoded
    #[error("Raster decode failed: {0}")]
    Decode(String),

    /// Baseline store I/O failure
    #[error("Comparison store error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Decode(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::Decode(format!("invalid base64 capture payload: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Protocol(err.to_string())
    }
}
