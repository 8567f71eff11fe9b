// src/io/mod.rs
//! Band sources.
//!
//! Band indices are 1-based everywhere, following GDAL.
pub mod memory;
#[cfg(feature = "gdal")]
pub mod reader;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::grid::{Grid, SampleType, TypedGrid};
use crate::processing::indices::{compute_index, IndexOptions};

pub use memory::MemorySource;
#[cfg(feature = "gdal")]
pub use reader::GdalSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RasterShape {
    pub height: usize,
    pub width: usize,
    pub band_count: usize,
}

/// Something that can hand out whole raster bands.
pub trait RasterSource {
    fn shape(&self) -> RasterShape;

    fn band_type(&self, index: usize) -> Result<SampleType>;

    fn get_band(&self, index: usize) -> Result<TypedGrid>;

    fn check_band(&self, index: usize) -> Result<()> {
        let count = self.shape().band_count;
        if index == 0 || index > count {
            return Err(Error::BandOutOfRange { index, count });
        }
        Ok(())
    }
}

/// Load the red and near-infrared bands from `source` and compute NDVI.
pub fn compute_from_source(
    source: &dyn RasterSource,
    red_band: usize,
    nir_band: usize,
    options: &IndexOptions,
) -> Result<Grid<f64>> {
    let red = source.get_band(red_band)?;
    let nir = source.get_band(nir_band)?;
    compute_index(&red, &nir, options)
}
