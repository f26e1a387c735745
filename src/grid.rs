//! Flat row-major scalar grid shared by every generator
//!
//! All generators in this crate read and write a [`GridBuffer`]. Cells are
//! stored contiguously with `index = x + y * width`. Reads outside the grid
//! return `0.0` and writes outside the grid are ignored, so edge handling in
//! the algorithms stays simple.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

/// A fixed-size 2D grid of `f32` cells in row-major order
///
/// The buffer can be reused across regenerations with [`GridBuffer::reset`]
/// and [`GridBuffer::resize`], which keep the existing allocation whenever it
/// is large enough.
///
/// # Example
///
/// ```
/// use rust_terrain_synth::GridBuffer;
///
/// let mut grid = GridBuffer::new(4, 3).unwrap();
/// grid.set(1, 2, 5.0);
/// assert_eq!(grid.get(1, 2), 5.0);
/// assert_eq!(grid.get(10, 10), 0.0); // out of bounds reads return 0.0
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGrid"))]
#[derive(Debug, Clone, PartialEq)]
pub struct GridBuffer {
    width: usize,
    height: usize,
    cells: Vec<f32>,
}

impl GridBuffer {
    /// Allocate a zero-filled grid
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if either dimension is zero and
    /// `AllocationFailed` if the cells cannot be reserved.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        check_dimensions(width, height)?;
        let mut cells = Vec::new();
        reserve_cells(&mut cells, width, height)?;
        cells.resize(width * height, 0.0);
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Wrap existing row-major data
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if a dimension is zero or `cells.len()`
    /// does not equal `width * height`.
    pub fn from_vec(width: usize, height: usize, cells: Vec<f32>) -> Result<Self> {
        check_dimensions(width, height)?;
        if width.checked_mul(height) != Some(cells.len()) {
            return Err(TerrainError::InvalidParameter(format!(
                "a {}x{} grid cannot hold {} cells",
                width,
                height,
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Grid width in cells
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for a constructed grid; kept for slice-like ergonomics
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat index of `(x, y)`, or `None` outside the grid
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| x + y * self.width)
    }

    /// Read a cell, returning `0.0` outside the grid
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.index(x, y).map(|i| self.cells[i]).unwrap_or(0.0)
    }

    /// Read a cell at signed coordinates
    ///
    /// Returns `None` when either coordinate falls outside the grid. Used by
    /// algorithms that probe past the edges and need to know how many
    /// neighbours actually exist.
    #[inline]
    pub fn get_signed(&self, x: isize, y: isize) -> Option<f32> {
        if x < 0 || y < 0 {
            return None;
        }
        self.index(x as usize, y as usize).map(|i| self.cells[i])
    }

    /// Write a cell; writes outside the grid are ignored
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = value;
        }
    }

    /// Add to a cell; ignored outside the grid
    #[inline]
    pub fn add(&mut self, x: usize, y: usize, delta: f32) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] += delta;
        }
    }

    /// Set every cell to `value`
    pub fn fill(&mut self, value: f32) {
        self.cells.fill(value);
    }

    /// Zero every cell without reallocating
    pub fn reset(&mut self) {
        self.fill(0.0);
    }

    /// Change the grid dimensions, zeroing all cells
    ///
    /// The existing allocation is reused when it is large enough.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for a zero dimension and
    /// `AllocationFailed` if growing the storage fails. The grid is left
    /// unchanged on error.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        check_dimensions(width, height)?;
        if width * height > self.cells.capacity() {
            let mut cells = Vec::new();
            reserve_cells(&mut cells, width, height)?;
            self.cells = cells;
        }
        self.cells.clear();
        self.cells.resize(width * height, 0.0);
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Smallest and largest cell value
    pub fn min_max(&self) -> (f32, f32) {
        self.cells
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// One row of cells, or an empty slice outside the grid
    pub fn row(&self, y: usize) -> &[f32] {
        if y >= self.height {
            return &[];
        }
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }

    /// Raw row-major cell data
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.cells
    }

    /// Mutable raw row-major cell data
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.cells
    }

    /// Consume the grid and return its cells
    pub fn into_vec(self) -> Vec<f32> {
        self.cells
    }
}

/// Unchecked wire form; deserialization goes through [`GridBuffer::from_vec`]
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawGrid {
    width: usize,
    height: usize,
    cells: Vec<f32>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGrid> for GridBuffer {
    type Error = TerrainError;

    fn try_from(raw: RawGrid) -> Result<Self> {
        Self::from_vec(raw.width, raw.height, raw.cells)
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(TerrainError::InvalidParameter(format!(
            "grid dimensions must be at least 1x1 (got {}x{})",
            width, height
        )));
    }
    Ok(())
}

fn reserve_cells(cells: &mut Vec<f32>, width: usize, height: usize) -> Result<()> {
    let failed = TerrainError::AllocationFailed { width, height };
    let len = width.checked_mul(height).ok_or_else(|| failed.clone())?;
    cells.try_reserve_exact(len).map_err(|_| failed)
}
