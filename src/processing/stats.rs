// src/processing/stats.rs
//! Whole-grid summary statistics.
use std::fmt;

use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::Grid;

/// How no-data pixels (NaN, or the grid's sentinel) enter the reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NanPolicy {
    /// Any no-data pixel turns every statistic into NaN
    Propagate,
    /// Skip no-data pixels
    #[default]
    Ignore,
}

/// Index statistics. Under [`NanPolicy::Propagate`] the four statistics can
/// be NaN; `serde_json` writes those as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    /// Pixels that entered the statistics
    pub count: usize,
    /// Pixels excluded as no-data
    pub nodata: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "max:    {:.4}", self.max)?;
        writeln!(f, "mean:   {:.4}", self.mean)?;
        writeln!(f, "median: {:.4}", self.median)?;
        writeln!(f, "min:    {:.4}", self.min)?;
        write!(f, "pixels: {} valid, {} no-data", self.count, self.nodata)
    }
}

/// Reduce an index grid to max, mean, median and min.
///
/// Fails with [`Error::EmptyGrid`] on a grid without pixels, and with
/// [`Error::NoValidPixels`] under [`NanPolicy::Ignore`] when every pixel is
/// no-data.
pub fn summarize(grid: &Grid<f64>, policy: NanPolicy) -> Result<Summary> {
    if grid.is_empty() {
        return Err(Error::EmptyGrid);
    }

    let sentinel = grid.nodata();
    let mut values: Vec<f64> = grid
        .data()
        .iter()
        .copied()
        .filter(|&v| !v.is_nan() && sentinel != Some(v))
        .collect();

    let count = values.len();
    let nodata = grid.len() - count;

    if nodata > 0 && policy == NanPolicy::Propagate {
        return Ok(Summary {
            max: f64::NAN,
            mean: f64::NAN,
            median: f64::NAN,
            min: f64::NAN,
            count,
            nodata,
        });
    }

    let (min, max) = match values.iter().copied().minmax_by(f64::total_cmp) {
        MinMaxResult::NoElements => return Err(Error::NoValidPixels { nodata }),
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(min, max) => (min, max),
    };

    let mean = values.iter().sum::<f64>() / count as f64;
    let median = median(&mut values);

    Ok(Summary {
        max,
        mean,
        median,
        min,
        count,
        nodata,
    })
}

/// Median of a non-empty slice; reorders the slice.
fn median(values: &mut [f64]) -> f64 {
    let len = values.len();
    let mid = len / 2;
    let (lower, pivot, _) = values.select_nth_unstable_by(mid, f64::total_cmp);
    let pivot = *pivot;

    if len % 2 == 1 {
        return pivot;
    }

    // Even count: the other middle value is the largest of the lower half
    let below = lower.iter().copied().max_by(f64::total_cmp).unwrap_or(pivot);
    (below + pivot) / 2.0
}
