// src/processing/indices/ndi.rs
use num_traits::AsPrimitive;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::grid::{with_typed_grid, Grid, Sample, TypedGrid};
use crate::processing::indices::IndexOptions;
use crate::processing::parallel::IndexCalculator;

/// Normalized Difference Index (NDI) calculator: `(A - B) / (A + B)`
pub struct NormalizedDifference {
    band_a_index: usize,
    band_b_index: usize,
    name: String,
    options: IndexOptions,
}

impl NormalizedDifference {
    pub fn new(band_a_index: usize, band_b_index: usize, name: Option<String>) -> Self {
        Self {
            band_a_index,
            band_b_index,
            name: name.unwrap_or_else(|| "NDI".to_string()),
            options: IndexOptions::default(),
        }
    }

    /// NDVI: `(NIR - RED) / (NIR + RED)`
    pub fn ndvi(nir_index: usize, red_index: usize) -> Self {
        Self::new(nir_index, red_index, Some("NDVI".to_string()))
    }

    /// NDWI: `(GREEN - NIR) / (GREEN + NIR)`
    pub fn ndwi(green_index: usize, nir_index: usize) -> Self {
        Self::new(green_index, nir_index, Some("NDWI".to_string()))
    }

    /// NDSI: `(GREEN - SWIR) / (GREEN + SWIR)`
    pub fn ndsi(green_index: usize, swir_index: usize) -> Self {
        Self::new(green_index, swir_index, Some("NDSI".to_string()))
    }

    pub fn with_options(mut self, options: IndexOptions) -> Self {
        self.options = options;
        self
    }
}

impl IndexCalculator for NormalizedDifference {
    fn calculate(&self, inputs: &[TypedGrid]) -> Result<Grid<f64>> {
        if inputs.len() < self.required_bands() {
            return Err(Error::MissingBands {
                required: self.required_bands(),
                provided: inputs.len(),
            });
        }

        let band_a = &inputs[self.band_a_index];
        let band_b = &inputs[self.band_b_index];

        with_typed_grid!(band_a, a => with_typed_grid!(band_b, b => {
            normalized_difference(a, b, &self.options)
        }))
    }

    fn required_bands(&self) -> usize {
        self.band_a_index.max(self.band_b_index) + 1
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Per-pixel `(a - b) / (a + b)` in `f64`.
///
/// Both bands are widened before any arithmetic, so integer bands never go
/// through integer division. Pixels whose sum is exactly zero, that hold NaN
/// or infinity, or that match a no-data value (the grid's own tag or
/// `options.input_nodata`) get the output no-data value.
pub(crate) fn normalized_difference<A: Sample, B: Sample>(
    band_a: &Grid<A>,
    band_b: &Grid<B>,
    options: &IndexOptions,
) -> Result<Grid<f64>> {
    if band_a.shape() != band_b.shape() {
        return Err(Error::ShapeMismatch {
            expected: band_a.shape(),
            actual: band_b.shape(),
        });
    }

    options.nodata.validate()?;

    let fill = options.nodata.value();
    let masks_a = [band_a.nodata(), options.input_nodata];
    let masks_b = [band_b.nodata(), options.input_nodata];

    let cols = band_a.cols();
    let mut result_data = vec![fill; band_a.len()];

    // Each task owns one output row
    if cols > 0 {
        result_data
            .par_chunks_mut(cols)
            .zip(band_a.data().par_chunks(cols))
            .zip(band_b.data().par_chunks(cols))
            .for_each(|((out, row_a), row_b)| {
                for ((result, &a), &b) in out.iter_mut().zip(row_a).zip(row_b) {
                    let a: f64 = a.as_();
                    let b: f64 = b.as_();

                    if is_masked(a, &masks_a) || is_masked(b, &masks_b) {
                        continue;
                    }

                    let sum = a + b;
                    if sum != 0.0 {
                        *result = (a - b) / sum;
                    }
                }
            });
    }

    Ok(Grid::new(band_a.shape(), result_data)?.with_nodata(options.nodata.sentinel()))
}

fn is_masked(value: f64, masks: &[Option<f64>]) -> bool {
    !value.is_finite() || masks.iter().flatten().any(|&m| m == value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::indices::NoData;

    #[test]
    fn test_ndvi_known_values() {
        let nir = Grid::new((2, 2), vec![5000.0f32, 3000.0, 1000.0, 0.0]).unwrap();
        let red = Grid::new((2, 2), vec![2500.0f32, 3000.0, 500.0, 0.0]).unwrap();

        let ndvi = NormalizedDifference::ndvi(0, 1);
        let result = ndvi.calculate(&[nir.into(), red.into()]).unwrap();
        let values = result.data();

        assert!((values[0] - 0.33333).abs() < 0.0001);
        assert_eq!(values[1], 0.0);
        assert!((values[2] - 0.33333).abs() < 0.0001);
        assert!(values[3].is_nan());
    }

    #[test]
    fn test_mixed_sample_types() {
        let nir = Grid::new((1, 1), vec![3u8]).unwrap();
        let red = Grid::new((1, 1), vec![2.0f64]).unwrap();

        let result = NormalizedDifference::ndvi(0, 1)
            .calculate(&[nir.into(), red.into()])
            .unwrap();
        assert!((result.data()[0] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_missing_bands() {
        let only = Grid::new((1, 1), vec![1u16]).unwrap();
        let err = NormalizedDifference::new(0, 2, None)
            .calculate(&[only.into()])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingBands {
                required: 3,
                provided: 1
            }
        ));
    }

    #[test]
    fn test_band_nodata_tag_masks_pixel() {
        let a = Grid::new((1, 2), vec![0i16, 300]).unwrap().with_nodata(Some(-1.0));
        let b = Grid::new((1, 2), vec![-1i16, 100]).unwrap();
        let b = b.with_nodata(Some(-1.0));

        let options = IndexOptions {
            nodata: NoData::Sentinel(-999.0),
            input_nodata: None,
        };
        let result = normalized_difference(&a, &b, &options).unwrap();
        assert_eq!(result.data(), &[-999.0, 0.5]);
        assert_eq!(result.nodata(), Some(-999.0));
    }

    #[test]
    fn test_infinite_input_gets_sentinel() {
        let red = Grid::new((1, 3), vec![f32::INFINITY, 1.0, 2.0]).unwrap();
        let nir = Grid::new((1, 3), vec![1.0f32, 1.0, f32::NEG_INFINITY]).unwrap();

        let options = IndexOptions {
            nodata: NoData::Sentinel(-999.0),
            input_nodata: None,
        };
        let result = NormalizedDifference::ndvi(0, 1)
            .with_options(options)
            .calculate(&[nir.into(), red.into()])
            .unwrap();
        assert_eq!(result.data(), &[-999.0, 0.0, -999.0]);
    }

    #[test]
    fn test_calculator_rejects_in_range_sentinel() {
        let a = Grid::new((1, 1), vec![1u8]).unwrap();
        let b = Grid::new((1, 1), vec![1u8]).unwrap();
        let ndvi = NormalizedDifference::ndvi(0, 1).with_options(IndexOptions {
            nodata: NoData::Sentinel(0.5),
            input_nodata: None,
        });
        assert!(matches!(
            ndvi.calculate(&[a.into(), b.into()]),
            Err(Error::InvalidSentinel(v)) if v == 0.5
        ));
    }

    #[test]
    fn test_zero_columns() {
        let a: Grid<u8> = Grid::new((3, 0), vec![]).unwrap();
        let b: Grid<u8> = Grid::new((3, 0), vec![]).unwrap();
        let result = normalized_difference(&a, &b, &IndexOptions::default()).unwrap();
        assert_eq!(result.shape(), (3, 0));
        assert!(result.is_empty());
    }

    #[test]
    fn test_custom_name_and_presets() {
        assert_eq!(NormalizedDifference::new(0, 1, Some("Custom".to_string())).name(), "Custom");
        assert_eq!(NormalizedDifference::new(0, 1, None).name(), "NDI");
        assert_eq!(NormalizedDifference::ndwi(0, 1).name(), "NDWI");
        assert_eq!(NormalizedDifference::ndsi(0, 1).name(), "NDSI");
        assert_eq!(NormalizedDifference::ndvi(0, 1).required_bands(), 2);
    }
}
