// src/processing/indices/mod.rs
//! Normalized-difference spectral indices.
//!
//! NDVI is `(NIR - RED) / (NIR + RED)`. Bands of any sample type are widened
//! to `f64` first, so two integer bands with red = 2 and nir = 3 give 0.2
//! rather than a truncated 0.
pub mod ndi;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::grid::{with_typed_grid, Grid, TypedGrid};

// Re-export indices
pub use ndi::NormalizedDifference;

/// Value written for pixels where the index is undefined: a zero
/// denominator, a NaN input, or a masked input sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoData {
    /// IEEE NaN
    #[default]
    Nan,
    /// A fixed value outside [-1, 1], e.g. `-999.0`; recorded on the output grid
    Sentinel(f64),
}

impl NoData {
    pub fn value(self) -> f64 {
        match self {
            NoData::Nan => f64::NAN,
            NoData::Sentinel(value) => value,
        }
    }

    /// A sentinel inside [-1, 1] could not be told apart from a real index
    /// value once the grid is summarized.
    pub fn validate(self) -> Result<()> {
        match self {
            NoData::Sentinel(value) if value.is_nan() || (-1.0..=1.0).contains(&value) => {
                Err(Error::InvalidSentinel(value))
            }
            _ => Ok(()),
        }
    }

    pub fn sentinel(self) -> Option<f64> {
        match self {
            NoData::Nan => None,
            NoData::Sentinel(value) => Some(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndexOptions {
    pub nodata: NoData,
    /// Input sample value treated as no-data in every band
    pub input_nodata: Option<f64>,
}

/// Compute NDVI from a red and a near-infrared band.
///
/// Fails with [`Error::ShapeMismatch`] when the bands differ in shape.
pub fn compute_index(red: &TypedGrid, nir: &TypedGrid, options: &IndexOptions) -> Result<Grid<f64>> {
    if red.shape() != nir.shape() {
        return Err(Error::ShapeMismatch {
            expected: red.shape(),
            actual: nir.shape(),
        });
    }

    debug!(
        shape = ?red.shape(),
        red_type = %red.sample_type(),
        nir_type = %nir.sample_type(),
        nodata = ?options.nodata,
        "computing NDVI"
    );

    with_typed_grid!(nir, n => with_typed_grid!(red, r => {
        ndi::normalized_difference(n, r, options)
    }))
}

/// [`compute_index`] with NaN for undefined pixels and no input masking.
pub fn ndvi(red: &TypedGrid, nir: &TypedGrid) -> Result<Grid<f64>> {
    compute_index(red, nir, &IndexOptions::default())
}
