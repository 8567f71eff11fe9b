// src/io/memory.rs
use crate::error::{Error, Result};
use crate::grid::{SampleType, TypedGrid};
use crate::io::{RasterShape, RasterSource};

/// Bands that are already in memory, e.g. decoded elsewhere or synthetic.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    bands: Vec<TypedGrid>,
}

impl MemorySource {
    /// All bands must share one shape.
    pub fn new(bands: Vec<TypedGrid>) -> Result<Self> {
        if let Some(first) = bands.first() {
            let expected = first.shape();
            if let Some(other) = bands.iter().find(|b| b.shape() != expected) {
                return Err(Error::ShapeMismatch {
                    expected,
                    actual: other.shape(),
                });
            }
        }

        Ok(Self { bands })
    }
}

impl RasterSource for MemorySource {
    fn shape(&self) -> RasterShape {
        let (height, width) = self.bands.first().map_or((0, 0), TypedGrid::shape);
        RasterShape {
            height,
            width,
            band_count: self.bands.len(),
        }
    }

    fn band_type(&self, index: usize) -> Result<SampleType> {
        self.check_band(index)?;
        Ok(self.bands[index - 1].sample_type())
    }

    fn get_band(&self, index: usize) -> Result<TypedGrid> {
        self.check_band(index)?;
        Ok(self.bands[index - 1].clone())
    }
}
