//! Thermal erosion
//!
//! Material slides from a cell to its lower neighbours whenever the height
//! difference exceeds a threshold, relaxing slopes that are too steep.

use crate::error::{Result, TerrainError};
use crate::grid::GridBuffer;

const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Thermal erosion filter
///
/// The threshold is a fraction of the grid's full height range, measured once
/// before the first iteration.
///
/// Each iteration visits the cells row by row. Height differences are read
/// from a snapshot taken at the start of the iteration, while the material
/// moved by each cell lands in the grid immediately. For a cell with
/// qualifying neighbours (those lower by more than the threshold), with
/// `max_diff` the largest and `total_diff` the sum of their differences,
/// `0.5 * (max_diff - threshold)` is removed from the cell and shared between
/// those neighbours in proportion to `diff / total_diff`. Total material is
/// conserved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalErosion {
    iterations: usize,
    threshold_percent: f32,
}

impl ThermalErosion {
    /// iterations - how many passes to run
    /// threshold_percent - slope threshold as a fraction of the height range
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `threshold_percent` is negative or not
    /// finite.
    pub fn new(iterations: usize, threshold_percent: f32) -> Result<Self> {
        if !(threshold_percent.is_finite() && threshold_percent >= 0.0) {
            return Err(TerrainError::InvalidParameter(format!(
                "erosion threshold must be finite and >= 0 (got {})",
                threshold_percent
            )));
        }
        Ok(Self {
            iterations,
            threshold_percent,
        })
    }

    /// Number of passes
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Threshold as a fraction of the height range
    pub fn threshold_percent(&self) -> f32 {
        self.threshold_percent
    }

    /// In-place apply erosion to the height field
    pub fn apply(&self, map: &mut GridBuffer) {
        let (min, max) = map.min_max();
        let threshold = (max - min) * self.threshold_percent;
        let (w, h) = (map.width(), map.height());

        let mut snapshot: Vec<f32> = Vec::with_capacity(map.len());
        let mut lower: Vec<(usize, f32)> = Vec::with_capacity(NEIGHBOURS.len());

        for _ in 0..self.iterations {
            snapshot.clear();
            snapshot.extend_from_slice(map.as_slice());
            let cells = map.as_mut_slice();
            let mut moved = 0.0f32;

            for y in 0..h {
                for x in 0..w {
                    let idx = x + y * w;
                    let current = snapshot[idx];

                    lower.clear();
                    let mut max_diff = 0.0f32;
                    let mut total_diff = 0.0f32;
                    for &(dx, dy) in &NEIGHBOURS {
                        let nx = x as isize + dx;
                        let ny = y as isize + dy;
                        if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                            continue;
                        }
                        let n = nx as usize + ny as usize * w;
                        let diff = current - snapshot[n];
                        if diff > threshold {
                            lower.push((n, diff));
                            max_diff = max_diff.max(diff);
                            total_diff += diff;
                        }
                    }

                    if total_diff > 0.0 {
                        let amount = 0.5 * (max_diff - threshold);
                        cells[idx] -= amount;
                        for &(n, diff) in &lower {
                            cells[n] += amount * diff / total_diff;
                        }
                        moved += amount;
                    }
                }
            }

            if moved == 0.0 {
                // Nothing exceeds the threshold; later passes would be no-ops
                break;
            }
        }

        log::trace!(
            "Thermal erosion on {}x{} grid (threshold {}, {} iterations)",
            w,
            h,
            threshold,
            self.iterations
        );
    }
}

/// Erode `map` in place
///
/// # Errors
///
/// Returns `InvalidParameter` if `threshold_percent` is negative or not
/// finite; `map` is left untouched in that case.
///
/// # Example
///
/// ```
/// use rust_terrain_synth::{erode, generate_fractal};
///
/// let mut map = generate_fractal(6, 0.5, 3).unwrap();
/// erode(&mut map, 0.05, 10).unwrap();
/// ```
pub fn erode(map: &mut GridBuffer, threshold_percent: f32, iterations: usize) -> Result<()> {
    ThermalErosion::new(iterations, threshold_percent)?.apply(map);
    Ok(())
}
