// src/lib.rs
//! Normalized Difference Vegetation Index (NDVI) for raster bands.
//!
//! ```
//! use raster_ndvi::{grid::Grid, ndvi, summarize, NanPolicy};
//!
//! let red = Grid::from_rows(vec![vec![2u16, 4]]).unwrap().into();
//! let nir = Grid::from_rows(vec![vec![3u16, 4]]).unwrap().into();
//!
//! let index = ndvi(&red, &nir).unwrap();
//! let summary = summarize(&index, NanPolicy::Ignore).unwrap();
//! assert!((summary.mean - 0.1).abs() < 1e-12);
//! ```
pub mod cli;
pub mod config;
pub mod error;
pub mod grid;
pub mod io;
pub mod processing;

pub use error::{Error, Result};
pub use processing::indices::{compute_index, ndvi, IndexOptions, NoData};
pub use processing::stats::{summarize, NanPolicy, Summary};

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
