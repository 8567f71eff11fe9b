// src/error.rs
//! Crate-level error type and `Result` alias.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Two grids that must line up pixel for pixel do not.
    #[error("Shape mismatch: expected {expected:?} (rows, cols), got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Grid of shape {shape:?} needs {expected} samples, got {actual}")]
    DataLength {
        shape: (usize, usize),
        expected: usize,
        actual: usize,
    },

    #[error("Ragged rows: row {row} has {actual} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Not enough input bands provided. Required: {required}, provided: {provided}")]
    MissingBands { required: usize, provided: usize },

    #[error("Band index {index} out of range (1..={count})")]
    BandOutOfRange { index: usize, count: usize },

    /// A sentinel that an index value could also take, or NaN.
    #[error("Invalid no-data sentinel {0}: must be a number outside [-1, 1]")]
    InvalidSentinel(f64),

    #[error("Cannot summarize an empty grid")]
    EmptyGrid,

    #[error("No valid pixels to summarize ({nodata} no-data pixels)")]
    NoValidPixels { nodata: usize },

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "gdal")]
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[cfg(feature = "gdal")]
    #[error("Unsupported band sample type: {0}")]
    UnsupportedSampleType(String),
}
