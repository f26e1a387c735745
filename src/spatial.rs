//! Spatial indexing for fast position-to-feature lookups
//!
//! This module is only available with the `spatial-index` feature.

use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

use crate::generation::FeaturePoint;

/// KD-tree over Voronoi feature points
///
/// Answers "which feature owns this position" in O(log n) instead of the
/// O(n) scan used while building the distance field. Useful for picking and
/// region queries on large diagrams.
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[derive(Clone)]
pub struct SpatialIndex {
    /// `None` for an empty feature set
    tree: Option<ImmutableKdTree<f32, usize, 2, 32>>,
}

impl SpatialIndex {
    /// Build spatial index from feature positions
    ///
    /// # Example
    ///
    /// ```
    /// use rust_terrain_synth::*;
    ///
    /// let features = vec![
    ///     FeaturePoint::new(1.0, 1.0),
    ///     FeaturePoint::new(30.0, 2.0),
    ///     FeaturePoint::new(15.0, 40.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&features);
    /// assert_eq!(index.find_nearest(28.0, 5.0), Some(1));
    /// ```
    pub fn new(features: &[FeaturePoint]) -> Self {
        if features.is_empty() {
            return Self { tree: None };
        }

        let points: Vec<[f32; 2]> = features.iter().map(|f| [f.x, f.y]).collect();
        Self {
            tree: Some(ImmutableKdTree::new_from_slice(&points)),
        }
    }

    /// Index of the feature nearest to `(x, y)`
    ///
    /// Returns `None` only when the index was built from no features. When
    /// several features are equally close, any of them may be returned.
    pub fn find_nearest(&self, x: f32, y: f32) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&[x, y]);
        Some(result.item)
    }
}
