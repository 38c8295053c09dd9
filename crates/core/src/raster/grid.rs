//! Main Raster type

use crate::error::{Error, Result};
use crate::raster::CardinalNeighbors;
use ndarray::Array2;
use serde::Serialize;

/// A 2D raster positionally aligned with a [`SampleGrid`](crate::SampleGrid).
///
/// Cells are stored as `Option<T>`: `None` is the undefined sentinel
/// ("not computed / not applicable"), which is distinct from a valid zero.
/// Border cells of derived rasters and holes in fetched elevation data are
/// both represented this way.
///
/// # Example
///
/// ```
/// use avarisk_core::Raster;
///
/// let mut raster: Raster<f64> = Raster::new(3, 3);
/// raster.set(1, 1, 42.0).unwrap();
///
/// assert_eq!(raster.get(1, 1).unwrap(), Some(42.0));
/// assert_eq!(raster.get(0, 0).unwrap(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T> {
    /// Cell data in row-major order (row, col)
    data: Array2<Option<T>>,
}

impl<T: Copy> Raster<T> {
    /// Create a raster with every cell undefined
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), None),
        }
    }

    /// Create a raster with every cell set to `value`
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), Some(value)),
        }
    }

    /// Create a fully defined raster from row-major values
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        Self::from_cells(data.into_iter().map(Some).collect(), rows, cols)
    }

    /// Create a raster from row-major cells, `None` marking undefined cells
    pub fn from_cells(cells: Vec<Option<T>>, rows: usize, cols: usize) -> Result<Self> {
        if cells.len() != rows * cols {
            return Err(Error::InvalidDimensions { rows, cols });
        }

        let data = Array2::from_shape_vec((rows, cols), cells)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self { data })
    }

    /// Create a raster from an ndarray
    pub fn from_array(data: Array2<Option<T>>) -> Self {
        Self { data }
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the raster is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether (row, col) lies on the outer ring of the raster
    pub fn is_border(&self, row: usize, col: usize) -> bool {
        row == 0 || col == 0 || row + 1 >= self.rows() || col + 1 >= self.cols()
    }

    // Data access

    /// Get the cell at (row, col); `Ok(None)` for an undefined cell
    pub fn get(&self, row: usize, col: usize) -> Result<Option<T>> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Set the cell at (row, col) to a defined value
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.put(row, col, Some(value))
    }

    /// Mark the cell at (row, col) undefined
    pub fn clear(&mut self, row: usize, col: usize) -> Result<()> {
        self.put(row, col, None)
    }

    fn put(&mut self, row: usize, col: usize, cell: Option<T>) -> Result<()> {
        let (rows, cols) = self.shape();
        match self.data.get_mut((row, col)) {
            Some(slot) => {
                *slot = cell;
                Ok(())
            }
            None => Err(Error::IndexOutOfBounds { row, col, rows, cols }),
        }
    }

    /// The four edge-adjacent neighbors of an interior cell.
    ///
    /// Returns `None` for border cells, which lack a full neighborhood.
    /// North is row - 1, east is col + 1.
    pub fn cardinal_neighbors(&self, row: usize, col: usize) -> Option<CardinalNeighbors<Option<T>>> {
        if row >= self.rows() || col >= self.cols() || self.is_border(row, col) {
            return None;
        }
        Some(CardinalNeighbors::from_fn(|dir| {
            let (dr, dc) = dir.offset();
            let r = (row as isize + dr) as usize;
            let c = (col as isize + dc) as usize;
            self.data[(r, c)]
        }))
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<Option<T>> {
        &self.data
    }

    // Iteration

    /// Iterate over defined cells as (row, col, value)
    pub fn iter_defined(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        self.data
            .indexed_iter()
            .filter_map(|((r, c), cell)| cell.map(|v| (r, c, v)))
    }

    /// Number of defined cells
    pub fn defined_count(&self) -> usize {
        self.data.iter().filter(|cell| cell.is_some()).count()
    }

    /// Apply `f` to every defined cell; undefined cells stay undefined
    pub fn map<U: Copy, F: Fn(T) -> U>(&self, f: F) -> Raster<U> {
        Raster {
            data: self.data.map(|cell| cell.map(&f)),
        }
    }
}

impl Raster<f64> {
    /// Build a raster from sampled values, treating non-finite samples as holes
    pub fn from_samples(samples: Vec<Option<f64>>, rows: usize, cols: usize) -> Result<Self> {
        let cells = samples
            .into_iter()
            .map(|s| s.filter(|v| v.is_finite()))
            .collect();
        Self::from_cells(cells, rows, cols)
    }

    /// Calculate basic statistics over defined cells
    pub fn statistics(&self) -> RasterStatistics {
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        let mut sum = 0.0;
        let mut count = 0usize;

        for (_, _, value) in self.iter_defined() {
            min = Some(min.map_or(value, |m| m.min(value)));
            max = Some(max.map_or(value, |m| m.max(value)));
            sum += value;
            count += 1;
        }

        let mean = if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        };

        RasterStatistics {
            min,
            max,
            mean,
            valid_count: count,
            nodata_count: self.len() - count,
        }
    }
}

/// Basic statistics for a raster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RasterStatistics {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub nodata_count: usize,
}
