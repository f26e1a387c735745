//! VoronoiDiagram main structure

use crate::config::VoronoiConfig;
use crate::error::Result;
use crate::generation::{voronoi_field_into, FeatureSet};
use crate::grayscale::normalize_to_grayscale;
use crate::grid::GridBuffer;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A generated weighted Voronoi diagram
///
/// Keeps everything a caller may want after generation: the placed
/// features, the raw weighted distance field and its normalized copy.
/// [`generate_voronoi`](crate::generate_voronoi) returns only the normalized
/// buffer.
///
/// # Examples
///
/// ```
/// use rust_terrain_synth::*;
///
/// let config = VoronoiConfigBuilder::new()
///     .dimensions(64, 48)
///     .unwrap()
///     .feature_count(16)
///     .unwrap()
///     .zone_count(4)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let diagram = VoronoiDiagram::generate(config, 42).unwrap();
/// println!("Placed {} features", diagram.feature_count());
///
/// let owner = diagram.nearest_feature(10.0, 20.0).unwrap();
/// println!("Cell (10, 20) belongs to feature {}", owner);
/// ```
#[derive(Clone)]
pub struct VoronoiDiagram {
    /// Configuration used to generate this diagram
    config: VoronoiConfig,

    /// Seed used to generate this diagram
    seed: u64,

    /// Feature points in placement order
    features: FeatureSet,

    /// Weighted distance field before normalization
    field: GridBuffer,

    /// Field normalized to [0, 1]
    buffer: GridBuffer,

    /// Spatial index for fast position-to-feature lookups (optional, requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl VoronoiDiagram {
    /// Generate a diagram
    ///
    /// The normalized buffer is identical to what
    /// [`generate_voronoi`](crate::generate_voronoi) returns for the same
    /// configuration and seed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the configuration is out of range and
    /// `AllocationFailed` if the grids cannot be allocated.
    pub fn generate(config: VoronoiConfig, seed: u64) -> Result<Self> {
        config.validate()?;

        let mut field = GridBuffer::new(config.width, config.height)?;
        let features = voronoi_field_into(&mut field, &config, seed)?;
        let buffer = normalize_to_grayscale(&field);

        #[cfg(feature = "spatial-index")]
        let spatial_index = SpatialIndex::new(features.points());

        Ok(Self {
            config,
            seed,
            features,
            field,
            buffer,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Get the configuration used to generate this diagram
    #[inline]
    pub fn config(&self) -> &VoronoiConfig {
        &self.config
    }

    /// Get the seed used to generate this diagram
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the placed feature points
    #[inline]
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Get the number of feature points
    #[inline]
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Raw weighted distance field (after perturbation, before normalization)
    #[inline]
    pub fn field(&self) -> &GridBuffer {
        &self.field
    }

    /// Distance field normalized to [0, 1]
    #[inline]
    pub fn buffer(&self) -> &GridBuffer {
        &self.buffer
    }

    /// Consume the diagram, keeping only the normalized buffer
    pub fn into_buffer(self) -> GridBuffer {
        self.buffer
    }

    /// Index of the feature nearest to `(x, y)`
    ///
    /// Linear scan over all features; the first feature seen wins ties, which
    /// matches the selection used to build the distance field.
    pub fn nearest_feature(&self, x: f32, y: f32) -> Option<usize> {
        self.features.nearest(x, y)
    }

    /// Find the feature owning a position (requires spatial-index feature)
    ///
    /// Uses the KD-tree for an O(log n) lookup. Equidistant features may
    /// resolve differently from [`nearest_feature`](Self::nearest_feature).
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_terrain_synth::*;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// # let diagram = VoronoiDiagram::generate(VoronoiConfig::default(), 1).unwrap();
    /// let feature = diagram.find_feature_at(100.0, 50.0);
    /// assert!(feature.is_some());
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_feature_at(&self, x: f32, y: f32) -> Option<usize> {
        self.spatial_index.find_nearest(x, y)
    }
}
