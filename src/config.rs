//! Generation parameters and their builders
//!
//! Every generator takes a plain parameter struct. The builders apply
//! defaults and validate ranges up front so a bad parameter is rejected
//! before any grid is allocated. Structs built by hand are validated again
//! by the generators.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

/// Largest accepted Diamond-Square complexity
pub const MAX_COMPLEXITY: u32 = 10;

/// Largest grid side accepted by any generator
pub const MAX_GRID_SIDE: usize = 2049;

/// Upper bound on Voronoi feature points
pub const MAX_FEATURE_COUNT: usize = 65_536;

/// Engine-imposed chunk limit used as the tessellation default
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 200;

/// Largest chunk side whose vertices still fit `u32` indices
pub const MAX_CHUNK_SIDE: usize = 65_535;

/// Configuration for Diamond-Square height-field synthesis
///
/// The same configuration always produces the identical height field.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalConfig {
    /// Grid side is `2^complexity + 1` (1..=10)
    pub complexity: u32,

    /// Controls how fast the random amplitude decays, in (0, 1]
    ///
    /// The amplitude at half-step `h` is `h^(1 - fractal_dimension)`, so a
    /// value of 1.0 keeps a constant amplitude at every level.
    pub fractal_dimension: f32,

    /// Random seed for deterministic replay
    pub seed: u64,
}

impl FractalConfig {
    /// Side length of the generated square grid
    #[inline]
    pub fn size(&self) -> usize {
        ((1usize << self.complexity.min(usize::BITS - 1)) + 1).min(MAX_GRID_SIDE)
    }

    /// Check every field against its documented range
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        check_complexity(self.complexity)?;
        check_fractal_dimension(self.fractal_dimension)
    }
}

impl Default for FractalConfig {
    fn default() -> Self {
        Self {
            complexity: 8,
            fractal_dimension: 0.5,
            seed: 0,
        }
    }
}

/// Builder for [`FractalConfig`]
///
/// # Example
///
/// ```rust
/// use rust_terrain_synth::*;
///
/// let config = FractalConfigBuilder::new()
///     .complexity(6)
///     .unwrap()
///     .fractal_dimension(0.7)
///     .unwrap()
///     .seed(2025)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.size(), 65);
/// ```
#[derive(Debug, Clone)]
pub struct FractalConfigBuilder {
    complexity: u32,
    fractal_dimension: f32,
    seed: Option<u64>,
}

impl FractalConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - complexity: 8 (257×257)
    /// - fractal_dimension: 0.5
    /// - seed: Random (generated from thread_rng)
    pub fn new() -> Self {
        let defaults = FractalConfig::default();
        Self {
            complexity: defaults.complexity,
            fractal_dimension: defaults.fractal_dimension,
            seed: None,
        }
    }

    /// Set the subdivision depth
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if complexity is outside 1..=10
    pub fn complexity(mut self, complexity: u32) -> Result<Self> {
        check_complexity(complexity)?;
        self.complexity = complexity;
        Ok(self)
    }

    /// Set the fractal dimension
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` unless `0 < dimension <= 1`
    pub fn fractal_dimension(mut self, dimension: f32) -> Result<Self> {
        check_fractal_dimension(dimension)?;
        self.fractal_dimension = dimension;
        Ok(self)
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    pub fn build(self) -> Result<FractalConfig> {
        let config = FractalConfig {
            complexity: self.complexity,
            fractal_dimension: self.fractal_dimension,
            seed: self.seed.unwrap_or_else(rand::random),
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for FractalConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn check_complexity(complexity: u32) -> Result<()> {
    if !(1..=MAX_COMPLEXITY).contains(&complexity) {
        return Err(TerrainError::InvalidParameter(format!(
            "complexity must be in 1..={} (got {})",
            MAX_COMPLEXITY, complexity
        )));
    }
    Ok(())
}

pub(crate) fn check_fractal_dimension(dimension: f32) -> Result<()> {
    if !(dimension > 0.0 && dimension <= 1.0) {
        return Err(TerrainError::InvalidParameter(format!(
            "fractal dimension must be in (0, 1] (got {})",
            dimension
        )));
    }
    Ok(())
}

/// Configuration for weighted multi-order Voronoi diagrams
///
/// Each cell value is `c1*d1 + c2*d2 (+ c3*d3)` where `dN` is the squared
/// distance to the N-th nearest feature point.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoronoiConfig {
    /// Number of feature points to scatter
    pub feature_count: usize,
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Weight of the nearest distance
    pub c1: f32,
    /// Weight of the second nearest distance
    pub c2: f32,
    /// Weight of the third nearest distance (only with `use_third_coefficient`)
    pub c3: f32,
    /// Track the third nearest distance
    pub use_third_coefficient: bool,
    /// Maximum displacement as a fraction of the grid size, in [0, 1]
    pub perturbation: f32,
    /// Zone grid side; 0 or 1 disables zoning
    pub zone_count: usize,
}

impl VoronoiConfig {
    /// Whether features are spread over an N×N zone grid
    #[inline]
    pub fn zoned(&self) -> bool {
        self.zone_count > 1
    }

    /// Check every field against its documented range
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        check_feature_count(self.feature_count)?;
        check_grid_side("width", self.width)?;
        check_grid_side("height", self.height)?;
        for (name, c) in [("c1", self.c1), ("c2", self.c2), ("c3", self.c3)] {
            if !c.is_finite() {
                return Err(TerrainError::InvalidParameter(format!(
                    "coefficient {} must be finite (got {})",
                    name, c
                )));
            }
        }
        check_perturbation(self.perturbation)?;
        check_zone_count(self.zone_count, self.width, self.height)
    }
}

impl Default for VoronoiConfig {
    fn default() -> Self {
        // F2 - F1 gives the classic cell-border pattern
        Self {
            feature_count: 32,
            width: 256,
            height: 256,
            c1: -1.0,
            c2: 1.0,
            c3: 0.0,
            use_third_coefficient: false,
            perturbation: 0.0,
            zone_count: 0,
        }
    }
}

/// Builder for [`VoronoiConfig`]
///
/// # Example
///
/// ```rust
/// use rust_terrain_synth::*;
///
/// let config = VoronoiConfigBuilder::new()
///     .dimensions(128, 64)
///     .unwrap()
///     .feature_count(20)
///     .unwrap()
///     .coefficients(-1.0, 1.0, 0.5)
///     .use_third_coefficient(true)
///     .perturbation(0.02)
///     .unwrap()
///     .zone_count(4)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert!(config.zoned());
/// ```
#[derive(Debug, Clone)]
pub struct VoronoiConfigBuilder {
    config: VoronoiConfig,
}

impl VoronoiConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - feature_count: 32
    /// - dimensions: 256×256
    /// - coefficients: c1 = -1, c2 = 1, c3 = 0 (third disabled)
    /// - perturbation: 0.0
    /// - zone_count: 0 (no zoning)
    pub fn new() -> Self {
        Self {
            config: VoronoiConfig::default(),
        }
    }

    /// Set the number of feature points
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if count is 0 or above the feature limit
    pub fn feature_count(mut self, count: usize) -> Result<Self> {
        check_feature_count(count)?;
        self.config.feature_count = count;
        Ok(self)
    }

    /// Set the grid dimensions
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if either side is outside 1..=2049
    pub fn dimensions(mut self, width: usize, height: usize) -> Result<Self> {
        check_grid_side("width", width)?;
        check_grid_side("height", height)?;
        self.config.width = width;
        self.config.height = height;
        Ok(self)
    }

    /// Set the weights of the 1st, 2nd and 3rd nearest distances
    pub fn coefficients(mut self, c1: f32, c2: f32, c3: f32) -> Self {
        self.config.c1 = c1;
        self.config.c2 = c2;
        self.config.c3 = c3;
        self
    }

    /// Include the third nearest distance
    pub fn use_third_coefficient(mut self, enabled: bool) -> Self {
        self.config.use_third_coefficient = enabled;
        self
    }

    /// Set the domain perturbation strength
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` unless `0 <= perturbation <= 1`
    pub fn perturbation(mut self, perturbation: f32) -> Result<Self> {
        check_perturbation(perturbation)?;
        self.config.perturbation = perturbation;
        Ok(self)
    }

    /// Spread features over an N×N zone grid (0 or 1 disables zoning)
    ///
    /// Must be called after [`dimensions`](Self::dimensions) when both are
    /// customised, since zones may not be narrower than one cell.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if zones would be smaller than a cell
    pub fn zone_count(mut self, zones: usize) -> Result<Self> {
        check_zone_count(zones, self.config.width, self.config.height)?;
        self.config.zone_count = zones;
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<VoronoiConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for VoronoiConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn check_feature_count(count: usize) -> Result<()> {
    if !(1..=MAX_FEATURE_COUNT).contains(&count) {
        return Err(TerrainError::InvalidParameter(format!(
            "feature count must be in 1..={} (got {})",
            MAX_FEATURE_COUNT, count
        )));
    }
    Ok(())
}

pub(crate) fn check_grid_side(name: &str, side: usize) -> Result<()> {
    if !(1..=MAX_GRID_SIDE).contains(&side) {
        return Err(TerrainError::InvalidParameter(format!(
            "{} must be in 1..={} (got {})",
            name, MAX_GRID_SIDE, side
        )));
    }
    Ok(())
}

pub(crate) fn check_perturbation(perturbation: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&perturbation) {
        return Err(TerrainError::InvalidParameter(format!(
            "perturbation must be in [0, 1] (got {})",
            perturbation
        )));
    }
    Ok(())
}

pub(crate) fn check_zone_count(zones: usize, width: usize, height: usize) -> Result<()> {
    if zones > width.min(height) {
        return Err(TerrainError::InvalidParameter(format!(
            "zone count {} exceeds the smaller grid side {}",
            zones,
            width.min(height)
        )));
    }
    Ok(())
}

/// How each grid quad is split into two triangles
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagonalMode {
    /// Always split along the top-left to bottom-right diagonal
    Fixed,
    /// Split along whichever diagonal has the smaller height difference
    #[default]
    Adaptive,
}

/// Configuration for converting a grid into mesh chunks
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TessellationConfig {
    /// Maximum vertices per chunk along either axis (2..=65535)
    pub max_chunk_size: usize,
    /// Heights are remapped from the grid's range onto `[0, spatial_extent]`
    pub spatial_extent: f32,
    /// World distance between adjacent vertices
    pub cell_spacing: f32,
    /// World position of grid cell (0, 0)
    pub origin: [f32; 2],
    /// Quad split policy
    pub diagonal: DiagonalMode,
}

impl TessellationConfig {
    /// Create a configuration with default spacing, origin and diagonal mode
    pub fn new(max_chunk_size: usize, spatial_extent: f32) -> Self {
        Self {
            max_chunk_size,
            spatial_extent,
            ..Default::default()
        }
    }

    /// Use the given quad split policy
    pub fn with_diagonal(mut self, diagonal: DiagonalMode) -> Self {
        self.diagonal = diagonal;
        self
    }

    /// Use the given vertex spacing
    pub fn with_cell_spacing(mut self, spacing: f32) -> Self {
        self.cell_spacing = spacing;
        self
    }

    /// Place grid cell (0, 0) at the given world position
    pub fn with_origin(mut self, origin: [f32; 2]) -> Self {
        self.origin = origin;
        self
    }

    /// Check every field against its documented range
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !(2..=MAX_CHUNK_SIDE).contains(&self.max_chunk_size) {
            return Err(TerrainError::InvalidParameter(format!(
                "max chunk size must be in 2..={} (got {})",
                MAX_CHUNK_SIDE, self.max_chunk_size
            )));
        }
        if !(self.spatial_extent.is_finite() && self.spatial_extent >= 0.0) {
            return Err(TerrainError::InvalidParameter(format!(
                "spatial extent must be finite and >= 0 (got {})",
                self.spatial_extent
            )));
        }
        if !(self.cell_spacing.is_finite() && self.cell_spacing > 0.0) {
            return Err(TerrainError::InvalidParameter(format!(
                "cell spacing must be finite and positive (got {})",
                self.cell_spacing
            )));
        }
        if !self.origin.iter().all(|o| o.is_finite()) {
            return Err(TerrainError::InvalidParameter(format!(
                "origin must be finite (got {:?})",
                self.origin
            )));
        }
        Ok(())
    }
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            spatial_extent: 1.0,
            cell_spacing: 1.0,
            origin: [0.0, 0.0],
            diagonal: DiagonalMode::default(),
        }
    }
}
