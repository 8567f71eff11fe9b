// src/processing/parallel.rs
use rayon::ThreadPoolBuilder;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::grid::{Grid, TypedGrid};
use crate::io::RasterSource;

/// Runs an [`IndexCalculator`] over bands pulled from a [`RasterSource`] on a
/// dedicated rayon pool.
pub struct ParallelProcessor {
    threads: usize,
}

impl ParallelProcessor {
    pub fn new(threads: Option<usize>) -> Self {
        let threads = threads.unwrap_or_else(num_cpus::get).max(1);
        Self { threads }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Read `bands` (1-based, in the calculator's input order) and compute
    /// the index.
    pub fn process<I: IndexCalculator + ?Sized>(
        &self,
        calculator: &I,
        source: &dyn RasterSource,
        bands: &[usize],
    ) -> Result<Grid<f64>> {
        if bands.len() < calculator.required_bands() {
            return Err(Error::MissingBands {
                required: calculator.required_bands(),
                provided: bands.len(),
            });
        }

        let inputs = bands
            .iter()
            .map(|&band| source.get_band(band))
            .collect::<Result<Vec<TypedGrid>>>()?;

        debug!(
            index = calculator.name(),
            ?bands,
            threads = self.threads,
            "bands loaded"
        );

        let pool = ThreadPoolBuilder::new().num_threads(self.threads).build()?;
        let result = pool.install(|| calculator.calculate(&inputs))?;

        info!(
            index = calculator.name(),
            rows = result.rows(),
            cols = result.cols(),
            "index computed"
        );
        Ok(result)
    }
}

/// Trait for spectral index calculators
pub trait IndexCalculator: Send + Sync {
    /// Calculate the index from the provided input bands
    fn calculate(&self, inputs: &[TypedGrid]) -> Result<Grid<f64>>;

    /// Return the number of required input bands
    fn required_bands(&self) -> usize;

    /// Return the name of the index
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemorySource;
    use crate::processing::indices::NormalizedDifference;

    fn source() -> MemorySource {
        MemorySource::new(vec![
            Grid::new((1, 3), vec![10u16, 20, 30]).unwrap().into(),
            Grid::new((1, 3), vec![30u16, 20, 10]).unwrap().into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_process_uses_band_order() {
        let processor = ParallelProcessor::new(Some(2));
        let ndvi = NormalizedDifference::ndvi(0, 1);

        let result = processor.process(&ndvi, &source(), &[2, 1]).unwrap();
        assert_eq!(result.data(), &[0.5, 0.0, -0.5]);
    }

    #[test]
    fn test_process_rejects_short_band_list() {
        let processor = ParallelProcessor::new(None);
        let err = processor
            .process(&NormalizedDifference::ndvi(0, 1), &source(), &[1])
            .unwrap_err();
        assert!(matches!(err, Error::MissingBands { required: 2, provided: 1 }));
    }

    #[test]
    fn test_process_band_out_of_range() {
        let processor = ParallelProcessor::new(Some(1));
        let err = processor
            .process(&NormalizedDifference::ndvi(0, 1), &source(), &[3, 1])
            .unwrap_err();
        assert!(matches!(err, Error::BandOutOfRange { index: 3, count: 2 }));
    }

    #[test]
    fn test_thread_count_floor() {
        assert_eq!(ParallelProcessor::new(Some(0)).threads(), 1);
        assert!(ParallelProcessor::new(None).threads() >= 1);
    }
}
