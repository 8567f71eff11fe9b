// src/io/reader.rs
use std::path::Path;

use gdal::raster::{GdalDataType, GdalType, RasterBand};
use gdal::Dataset;
use tracing::debug;

use crate::error::{Error, Result};
use crate::grid::{Grid, SampleType, TypedGrid};
use crate::io::{RasterShape, RasterSource};

/// Any raster dataset GDAL can open (GeoTIFF, JP2, ENVI, ...).
pub struct GdalSource {
    dataset: Dataset,
    shape: RasterShape,
}

impl GdalSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = Self::from_dataset(Dataset::open(path.as_ref())?);
        debug!(path = %path.as_ref().display(), shape = ?source.shape, "opened raster");
        Ok(source)
    }

    /// Wrap an already open dataset, e.g. one built with the `MEM` driver.
    pub fn from_dataset(dataset: Dataset) -> Self {
        let (width, height) = dataset.raster_size();
        let shape = RasterShape {
            height,
            width,
            band_count: dataset.raster_count() as usize,
        };
        Self { dataset, shape }
    }

    fn read<T: GdalType + Copy>(&self, band: &RasterBand) -> Result<Grid<T>> {
        let window = (self.shape.width, self.shape.height);
        let buffer = band.read_as::<T>((0, 0), window, window, None)?;

        Ok(Grid::new((self.shape.height, self.shape.width), buffer.data().to_vec())?
            .with_nodata(band.no_data_value()))
    }
}

fn sample_type(data_type: GdalDataType) -> Result<SampleType> {
    match data_type {
        GdalDataType::UInt8 => Ok(SampleType::U8),
        GdalDataType::UInt16 => Ok(SampleType::U16),
        GdalDataType::Int16 => Ok(SampleType::I16),
        GdalDataType::UInt32 => Ok(SampleType::U32),
        GdalDataType::Int32 => Ok(SampleType::I32),
        GdalDataType::Float32 => Ok(SampleType::F32),
        GdalDataType::Float64 => Ok(SampleType::F64),
        other => Err(Error::UnsupportedSampleType(format!("{other:?}"))),
    }
}

impl RasterSource for GdalSource {
    fn shape(&self) -> RasterShape {
        self.shape
    }

    fn band_type(&self, index: usize) -> Result<SampleType> {
        self.check_band(index)?;
        sample_type(self.dataset.rasterband(index)?.band_type())
    }

    fn get_band(&self, index: usize) -> Result<TypedGrid> {
        self.check_band(index)?;
        let band = self.dataset.rasterband(index)?;

        // Read in the native type; widening happens in the index computation
        let grid = match sample_type(band.band_type())? {
            SampleType::U8 => self.read::<u8>(&band)?.into(),
            SampleType::U16 => self.read::<u16>(&band)?.into(),
            SampleType::I16 => self.read::<i16>(&band)?.into(),
            SampleType::U32 => self.read::<u32>(&band)?.into(),
            SampleType::I32 => self.read::<i32>(&band)?.into(),
            SampleType::F32 => self.read::<f32>(&band)?.into(),
            SampleType::F64 => self.read::<f64>(&band)?.into(),
        };

        debug!(band = index, sample_type = %grid.sample_type(), "band read");
        Ok(grid)
    }
}

#[cfg(all(test, feature = "gdal"))]
mod tests {
    use super::*;
    use gdal::raster::Buffer;
    use gdal::DriverManager;

    /// 3 x 2 in-memory dataset, one `(samples, nodata)` pair per band
    fn mem_dataset<T: GdalType + Copy>(bands: &[(Vec<T>, Option<f64>)]) -> Dataset {
        let driver = DriverManager::get_driver_by_name("MEM").unwrap();
        let dataset = driver
            .create_with_band_type::<T, _>("", 3, 2, bands.len())
            .unwrap();

        for (i, (data, nodata)) in bands.iter().enumerate() {
            let mut band = dataset.rasterband(i + 1).unwrap();
            let mut buffer = Buffer::new((3, 2), data.clone());
            band.write((0, 0), (3, 2), &mut buffer).unwrap();
            band.set_no_data_value(*nodata).unwrap();
        }
        dataset
    }

    #[test]
    fn test_u16_bands_keep_native_type_and_nodata() {
        let source = GdalSource::from_dataset(mem_dataset(&[
            (vec![0u16, 100, 200, 300, 400, 500], Some(0.0)),
            (vec![600u16, 500, 400, 300, 200, 100], None),
        ]));

        assert_eq!(
            source.shape(),
            RasterShape {
                height: 2,
                width: 3,
                band_count: 2
            }
        );
        assert_eq!(source.band_type(1).unwrap(), SampleType::U16);

        let red = source.get_band(1).unwrap();
        assert_eq!(red.sample_type(), SampleType::U16);
        assert_eq!(red.shape(), (2, 3));
        assert_eq!(red.nodata(), Some(0.0));
        match &red {
            TypedGrid::U16(grid) => {
                assert_eq!(grid.data(), &[0, 100, 200, 300, 400, 500]);
                assert_eq!(grid.get(1, 0), Some(&300));
            }
            other => panic!("expected u16 band, got {}", other.sample_type()),
        }

        assert_eq!(source.get_band(2).unwrap().nodata(), None);
    }

    #[test]
    fn test_f32_band() {
        let source = GdalSource::from_dataset(mem_dataset(&[(
            vec![0.5f32, 1.5, -2.0, 4.0, 8.0, 16.0],
            Some(-9999.0),
        )]));

        assert_eq!(source.band_type(1).unwrap(), SampleType::F32);
        let band = source.get_band(1).unwrap();
        assert_eq!(band.nodata(), Some(-9999.0));
        assert_eq!(band.to_f64().data(), &[0.5, 1.5, -2.0, 4.0, 8.0, 16.0]);
    }

    #[test]
    fn test_band_index_is_one_based() {
        let source = GdalSource::from_dataset(mem_dataset(&[(vec![1u16; 6], None)]));

        assert!(matches!(source.get_band(0), Err(Error::BandOutOfRange { index: 0, count: 1 })));
        assert!(matches!(source.band_type(2), Err(Error::BandOutOfRange { index: 2, count: 1 })));
    }

    #[test]
    fn test_sample_type_mapping() {
        assert_eq!(sample_type(GdalDataType::UInt8).unwrap(), SampleType::U8);
        assert_eq!(sample_type(GdalDataType::Int16).unwrap(), SampleType::I16);
        assert_eq!(sample_type(GdalDataType::Int32).unwrap(), SampleType::I32);
        assert_eq!(sample_type(GdalDataType::Float64).unwrap(), SampleType::F64);
        assert!(matches!(
            sample_type(GdalDataType::Unknown),
            Err(Error::UnsupportedSampleType(_))
        ));
    }

    #[test]
    fn test_ndvi_from_gdal_bands() {
        let source = GdalSource::from_dataset(mem_dataset(&[
            (vec![0u16, 100, 200, 300, 400, 500], Some(0.0)),
            (vec![0u16, 300, 200, 100, 400, 1500], None),
        ]));

        let options = crate::IndexOptions {
            nodata: crate::NoData::Sentinel(-999.0),
            input_nodata: None,
        };
        let index = crate::io::compute_from_source(&source, 1, 2, &options).unwrap();
        assert_eq!(index.data(), &[-999.0, 0.5, 0.0, -0.5, 0.0, 0.5]);
    }
}
