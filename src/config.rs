// src/config.rs
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::processing::indices::{IndexOptions, NoData};
use crate::processing::stats::NanPolicy;

/// Run parameters, usually loaded from a JSON file:
///
/// ```json
/// { "red_band": 3, "nir_band": 4, "nodata": { "sentinel": -999.0 }, "nan_policy": "propagate" }
/// ```
///
/// Every key is optional.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// 1-based band index of the red channel
    #[serde(default = "default_red_band")]
    pub red_band: usize,
    /// 1-based band index of the near-infrared channel
    #[serde(default = "default_nir_band")]
    pub nir_band: usize,
    #[serde(default)]
    pub nodata: NoData,
    /// Input sample value treated as no-data in both bands
    #[serde(default)]
    pub input_nodata: Option<f64>,
    #[serde(default)]
    pub nan_policy: NanPolicy,
    /// Worker threads for the per-pixel pass; defaults to the CPU count
    #[serde(default)]
    pub threads: Option<usize>,
}

// Blue, green, red, near-infrared band order of 4-band surface reflectance products
fn default_red_band() -> usize {
    3
}

fn default_nir_band() -> usize {
    4
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            red_band: default_red_band(),
            nir_band: default_nir_band(),
            nodata: NoData::default(),
            input_nodata: None,
            nan_policy: NanPolicy::default(),
            threads: None,
        }
    }
}

impl RunConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.nodata.validate()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&content)?;
        debug!(path = %path.as_ref().display(), ?config, "loaded run config");
        Ok(config)
    }

    pub fn index_options(&self) -> IndexOptions {
        IndexOptions {
            nodata: self.nodata,
            input_nodata: self.input_nodata,
        }
    }

    pub fn threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}
