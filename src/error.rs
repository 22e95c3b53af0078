use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("failed to allocate memory for {what}")]
    AllocationFailure {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },

    #[error("expected a vector of dimension {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("index {index} out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("value {value} outside of [0, {max}]")]
    ValueOutOfRange { value: f64, max: f64 },

    #[error("buffer length {len} does not match expected length {expected}")]
    BufferLength { len: usize, expected: usize },

    #[error("failed to load image {}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write image {}", path.display())]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl ClusterError {
    pub(crate) fn alloc(what: &'static str) -> impl FnOnce(TryReserveError) -> Self {
        move |source| Self::AllocationFailure { what, source }
    }
}
