// src/main.rs
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use raster_ndvi::cli::Cli;
use raster_ndvi::io::{GdalSource, RasterSource};
use raster_ndvi::processing::indices::NormalizedDifference;
use raster_ndvi::processing::ParallelProcessor;
use raster_ndvi::summarize;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.run_config()?;

    let source = GdalSource::open(&cli.input)?;
    tracing::info!(
        input = %cli.input.display(),
        red_type = %source.band_type(config.red_band)?,
        nir_type = %source.band_type(config.nir_band)?,
        "reading bands"
    );

    let processor = ParallelProcessor::new(Some(config.threads()));
    let ndvi = NormalizedDifference::ndvi(0, 1).with_options(config.index_options());
    let index = processor.process(&ndvi, &source, &[config.nir_band, config.red_band])?;

    let summary = summarize(&index, config.nan_policy)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{summary}");
    }

    Ok(())
}
