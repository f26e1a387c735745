//! Feature point placement for Voronoi diagrams
//!
//! Features are scattered uniformly at random, either over the whole grid or
//! spread over an N×N zone grid. With zoning, feature `i` goes to zone
//! `i mod N²` (zones numbered row by row) and is placed uniformly inside that
//! zone's sub-rectangle, which keeps large empty patches from forming.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rand::Rng;

use crate::config::{check_feature_count, check_grid_side, check_zone_count};
use crate::error::Result;

/// A feature point in grid coordinates
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeaturePoint {
    /// Column coordinate, in `[0, width)`
    pub x: f32,
    /// Row coordinate, in `[0, height)`
    pub y: f32,
}

impl FeaturePoint {
    /// Create a feature point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `(x, y)`
    #[inline]
    pub fn distance_squared(&self, x: f32, y: f32) -> f32 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }
}

/// Ordered feature points of one diagram
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    points: Vec<FeaturePoint>,
    zone_count: usize,
}

impl FeatureSet {
    /// Wrap already placed points
    pub fn new(points: Vec<FeaturePoint>, zone_count: usize) -> Self {
        Self { points, zone_count }
    }

    /// All points in placement order
    #[inline]
    pub fn points(&self) -> &[FeaturePoint] {
        &self.points
    }

    /// Number of feature points
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when there are no feature points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Zone grid side used for placement (0 or 1 means unzoned)
    #[inline]
    pub fn zone_count(&self) -> usize {
        self.zone_count
    }

    /// Feature by index
    #[inline]
    pub fn get(&self, index: usize) -> Option<&FeaturePoint> {
        self.points.get(index)
    }

    /// Index of the feature nearest to `(x, y)`
    ///
    /// Linear scan; the first feature seen wins ties. Returns `None` for an
    /// empty set.
    pub fn nearest(&self, x: f32, y: f32) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, p) in self.points.iter().enumerate() {
            let d = p.distance_squared(x, y);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }
}

/// Scatter `count` features over a `width × height` grid
///
/// Draws `x` then `y` for each feature from `rng`. `zone_count` of 0 or 1
/// places features over the whole grid; larger values spread them
/// round-robin over `zone_count × zone_count` zones, each at least one cell
/// wide.
///
/// # Errors
///
/// Returns `InvalidParameter` if `count` is 0 or above the feature limit, a
/// side is outside 1..=2049, or `zone_count` exceeds the smaller side. No
/// random numbers are drawn in that case.
pub fn place_features<R: Rng>(
    rng: &mut R,
    count: usize,
    width: usize,
    height: usize,
    zone_count: usize,
) -> Result<FeatureSet> {
    check_feature_count(count)?;
    check_grid_side("width", width)?;
    check_grid_side("height", height)?;
    check_zone_count(zone_count, width, height)?;

    let (w, h) = (width as f32, height as f32);

    let points = if zone_count > 1 {
        let n = zone_count;
        let zone_w = w / n as f32;
        let zone_h = h / n as f32;
        (0..count)
            .map(|i| {
                let zone = i % (n * n);
                let x0 = (zone % n) as f32 * zone_w;
                let y0 = (zone / n) as f32 * zone_h;
                let x = rng.gen_range(x0..x0 + zone_w);
                let y = rng.gen_range(y0..y0 + zone_h);
                FeaturePoint::new(x, y)
            })
            .collect()
    } else {
        (0..count)
            .map(|_| {
                let x = rng.gen_range(0.0..w);
                let y = rng.gen_range(0.0..h);
                FeaturePoint::new(x, y)
            })
            .collect()
    };

    Ok(FeatureSet::new(points, zone_count))
}
