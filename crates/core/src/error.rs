//! Error types for rastats

use crate::raster::SampleType;
use thiserror::Error;

/// Main error type for rastats operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("Invalid raster dimensions: shape {shape:?} does not hold {len} samples")]
    InvalidDimensions { shape: Vec<usize>, len: usize },

    #[error("Index out of bounds: {index:?} in raster of shape {shape:?}")]
    IndexOutOfBounds { index: Vec<usize>, shape: Vec<usize> },

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("Sample type mismatch: expected {expected}, found {found}")]
    SampleTypeMismatch {
        expected: SampleType,
        found: SampleType,
    },

    #[error("No images to analyze")]
    EmptyFolder,

    #[error("Image {label} contains no samples")]
    EmptyImage { label: String },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Attach a path to a decoding failure.
    pub fn decode(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        Error::Decode {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for rastats operations
pub type Result<T> = std::result::Result<T, Error>;
