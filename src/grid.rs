// src/grid.rs
//! In-memory band and index grids.
//!
//! A [`Grid`] is a row-major block of samples with a `(rows, cols)` shape.
//! Raster bands arrive in whatever sample type the source stores, so
//! [`TypedGrid`] tags a grid with its numeric type; the index computation
//! widens every variant to `f64` before doing arithmetic.
use std::fmt;

use num_traits::AsPrimitive;
use serde::Serialize;

use crate::error::{Error, Result};

/// Row-major 2D grid of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    shape: (usize, usize),
    data: Vec<T>,
    nodata: Option<f64>,
}

impl<T> Grid<T> {
    /// Create a grid from a `(rows, cols)` shape and row-major samples.
    pub fn new(shape: (usize, usize), data: Vec<T>) -> Result<Self> {
        let expected = shape.0 * shape.1;
        if data.len() != expected {
            return Err(Error::DataLength {
                shape,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            shape,
            data,
            nodata: None,
        })
    }

    /// Build a grid from nested rows, e.g. `vec![vec![2, 4]]` for a 1x2 grid.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let height = rows.len();
        let mut data = Vec::with_capacity(height * cols);

        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != cols {
                return Err(Error::RaggedRows {
                    row,
                    expected: cols,
                    actual: values.len(),
                });
            }
            data.extend(values);
        }

        // An empty first row makes every row empty, so the grid is 0 x 0.
        let shape = if cols == 0 { (0, 0) } else { (height, cols) };
        Self::new(shape, data)
    }

    /// Tag the grid with the value that marks invalid pixels.
    pub fn with_nodata(mut self, nodata: Option<f64>) -> Self {
        self.nodata = nodata;
        self
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.0
    }

    pub fn cols(&self) -> usize {
        self.shape.1
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.shape.0 || col >= self.shape.1 {
            return None;
        }
        self.data.get(row * self.shape.1 + col)
    }
}

impl<T: Clone> Grid<T> {
    pub fn filled(shape: (usize, usize), value: T) -> Self {
        Self {
            shape,
            data: vec![value; shape.0 * shape.1],
            nodata: None,
        }
    }

    pub fn to_rows(&self) -> Vec<Vec<T>> {
        if self.shape.1 == 0 {
            return Vec::new();
        }
        self.data.chunks(self.shape.1).map(<[T]>::to_vec).collect()
    }
}

/// Numeric type of a raster band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleType {
    U8,
    U16,
    I16,
    U32,
    I32,
    F32,
    F64,
}

impl SampleType {
    pub fn is_integer(self) -> bool {
        !matches!(self, SampleType::F32 | SampleType::F64)
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleType::U8 => "u8",
            SampleType::U16 => "u16",
            SampleType::I16 => "i16",
            SampleType::U32 => "u32",
            SampleType::I32 => "i32",
            SampleType::F32 => "f32",
            SampleType::F64 => "f64",
        };
        f.write_str(name)
    }
}

/// A primitive that can be stored in a band and widened losslessly enough
/// to `f64` for index arithmetic.
pub trait Sample: AsPrimitive<f64> + Send + Sync {
    const TYPE: SampleType;
}

/// Band grid tagged with its sample type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedGrid {
    U8(Grid<u8>),
    U16(Grid<u16>),
    I16(Grid<i16>),
    U32(Grid<u32>),
    I32(Grid<i32>),
    F32(Grid<f32>),
    F64(Grid<f64>),
}

/// Run `$body` with `$g` bound to the concrete `&Grid<T>` inside a [`TypedGrid`].
macro_rules! with_typed_grid {
    ($grid:expr, $g:ident => $body:expr) => {
        match $grid {
            $crate::grid::TypedGrid::U8($g) => $body,
            $crate::grid::TypedGrid::U16($g) => $body,
            $crate::grid::TypedGrid::I16($g) => $body,
            $crate::grid::TypedGrid::U32($g) => $body,
            $crate::grid::TypedGrid::I32($g) => $body,
            $crate::grid::TypedGrid::F32($g) => $body,
            $crate::grid::TypedGrid::F64($g) => $body,
        }
    };
}
pub(crate) use with_typed_grid;

macro_rules! impl_sample {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Sample for $ty {
                const TYPE: SampleType = SampleType::$variant;
            }

            impl From<Grid<$ty>> for TypedGrid {
                fn from(grid: Grid<$ty>) -> Self {
                    TypedGrid::$variant(grid)
                }
            }
        )*
    };
}

impl_sample! {
    u8 => U8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    f32 => F32,
    f64 => F64,
}

impl TypedGrid {
    pub fn shape(&self) -> (usize, usize) {
        with_typed_grid!(self, g => g.shape())
    }

    pub fn nodata(&self) -> Option<f64> {
        with_typed_grid!(self, g => g.nodata())
    }

    pub fn sample_type(&self) -> SampleType {
        match self {
            TypedGrid::U8(_) => SampleType::U8,
            TypedGrid::U16(_) => SampleType::U16,
            TypedGrid::I16(_) => SampleType::I16,
            TypedGrid::U32(_) => SampleType::U32,
            TypedGrid::I32(_) => SampleType::I32,
            TypedGrid::F32(_) => SampleType::F32,
            TypedGrid::F64(_) => SampleType::F64,
        }
    }

    /// Copy every sample into an `f64` grid, keeping shape and no-data tag.
    pub fn to_f64(&self) -> Grid<f64> {
        with_typed_grid!(self, g => widen(g))
    }
}

fn widen<T: Sample>(grid: &Grid<T>) -> Grid<f64> {
    Grid {
        shape: grid.shape,
        data: grid.data.iter().map(|v| v.as_()).collect(),
        nodata: grid.nodata,
    }
}
