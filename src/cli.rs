use clap::Parser;
use std::path::PathBuf;

use crate::config::RunConfig;
use crate::error::Result;
use crate::processing::indices::NoData;
use crate::processing::stats::NanPolicy;

#[derive(Parser, Debug)]
#[command(name = "raster-ndvi")]
#[command(about = "NDVI calculator: (NIR-RED)/(NIR+RED) with summary statistics")]
pub struct Cli {
    /// Multi-band input raster
    #[arg(short, long)]
    pub input: PathBuf,

    /// Red band (1-based)
    #[arg(short, long)]
    pub red: Option<usize>,

    /// Near-infrared band (1-based)
    #[arg(short, long)]
    pub nir: Option<usize>,

    /// JSON run configuration; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write this value instead of NaN for undefined pixels
    #[arg(long, allow_hyphen_values = true)]
    pub sentinel: Option<f64>,

    /// Input sample value to treat as no-data
    #[arg(long, allow_hyphen_values = true)]
    pub input_nodata: Option<f64>,

    /// Report NaN statistics when any pixel is no-data
    #[arg(long)]
    pub propagate_nan: bool,

    /// Worker threads (default: number of CPUs)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Print the summary as JSON (NaN statistics are written as null)
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(red) = self.red {
            config.red_band = red;
        }
        if let Some(nir) = self.nir {
            config.nir_band = nir;
        }
        if let Some(value) = self.sentinel {
            config.nodata = NoData::Sentinel(value);
        }
        if self.input_nodata.is_some() {
            config.input_nodata = self.input_nodata;
        }
        if self.propagate_nan {
            config.nan_policy = NanPolicy::Propagate;
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }

        config.validate()?;
        Ok(config)
    }
}
