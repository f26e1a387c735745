//! Weighted multi-order Voronoi distance field
//!
//! For every cell the squared distances to the nearest, second nearest and
//! (optionally) third nearest feature are found with one linear scan over
//! the features. The scan keeps a running order of two or three slots and
//! never sorts the full distance list. Comparisons are strict, so among equal
//! distances the feature seen first keeps the lower slot.

use crate::config::VoronoiConfig;
use crate::generation::features::{FeaturePoint, FeatureSet};
use crate::grid::GridBuffer;

/// Squared distances to the three nearest features of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestDistances {
    /// Nearest
    pub d1: f32,
    /// Second nearest
    pub d2: f32,
    /// Third nearest
    pub d3: f32,
}

impl NearestDistances {
    /// Weighted combination `c1*d1 + c2*d2 (+ c3*d3)`
    #[inline]
    pub fn weighted(&self, c1: f32, c2: f32, c3: Option<f32>) -> f32 {
        let value = c1 * self.d1 + c2 * self.d2;
        match c3 {
            Some(c3) => value + c3 * self.d3,
            None => value,
        }
    }
}

/// Find the nearest squared distances from `(x, y)` to `features`
///
/// With `track_third == false` only two slots are maintained and `d3`
/// mirrors `d2`. Orders that do not exist (fewer features than slots) repeat
/// the farthest distance found, so a single feature gives
/// `d1 == d2 == d3`. An empty slice gives infinite distances.
pub fn nearest_distances(
    features: &[FeaturePoint],
    x: f32,
    y: f32,
    track_third: bool,
) -> NearestDistances {
    let (mut d1, mut d2, mut d3) = (f32::INFINITY, f32::INFINITY, f32::INFINITY);

    for feature in features {
        let d = feature.distance_squared(x, y);
        if d < d1 {
            if track_third {
                d3 = d2;
            }
            d2 = d1;
            d1 = d;
        } else if d < d2 {
            if track_third {
                d3 = d2;
            }
            d2 = d;
        } else if track_third && d < d3 {
            d3 = d;
        }
    }

    if d2 == f32::INFINITY {
        d2 = d1;
    }
    if !track_third || d3 == f32::INFINITY {
        d3 = d2;
    }

    NearestDistances { d1, d2, d3 }
}

/// Write the weighted distance field for `features` into `map`
///
/// `map` is expected to be `config.width × config.height`.
pub fn distance_field(map: &mut GridBuffer, features: &FeatureSet, config: &VoronoiConfig) {
    let track_third = config.use_third_coefficient;
    let c3 = track_third.then_some(config.c3);
    let width = map.width();

    for (i, cell) in map.as_mut_slice().iter_mut().enumerate() {
        let (x, y) = ((i % width) as f32, (i / width) as f32);
        let nearest = nearest_distances(features.points(), x, y, track_third);
        *cell = nearest.weighted(config.c1, config.c2, c3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::features::place_features;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Sort-based reference: the three smallest distances, padded like the scan
    fn brute_force(features: &[FeaturePoint], x: f32, y: f32) -> [f32; 3] {
        let mut all: Vec<f32> = features.iter().map(|f| f.distance_squared(x, y)).collect();
        all.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let pick = |i: usize| all[i.min(all.len() - 1)];
        [pick(0), pick(1), pick(2)]
    }

    #[test]
    fn test_single_feature_degenerate() {
        let features = [FeaturePoint::new(3.0, 4.0)];
        for track_third in [false, true] {
            let n = nearest_distances(&features, 0.0, 0.0, track_third);
            assert_eq!(n.d1, 25.0);
            assert_eq!(n.d2, 25.0);
            assert_eq!(n.d3, 25.0);
        }
    }

    #[test]
    fn test_two_features_pad_third() {
        let features = [FeaturePoint::new(1.0, 0.0), FeaturePoint::new(0.0, 3.0)];
        let n = nearest_distances(&features, 0.0, 0.0, true);
        assert_eq!((n.d1, n.d2, n.d3), (1.0, 9.0, 9.0));
    }

    #[test]
    fn test_matches_sort_reference() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let set = place_features(&mut rng, 5, 10, 10, 0).unwrap();

        for y in 0..10 {
            for x in 0..10 {
                let (fx, fy) = (x as f32, y as f32);
                let expected = brute_force(set.points(), fx, fy);

                let three = nearest_distances(set.points(), fx, fy, true);
                assert_eq!([three.d1, three.d2, three.d3], expected);

                let two = nearest_distances(set.points(), fx, fy, false);
                assert_eq!([two.d1, two.d2], [expected[0], expected[1]]);
            }
        }
    }

    #[test]
    fn test_ties_keep_equal_distances() {
        // Four features equidistant from the origin plus one farther away
        let features = [
            FeaturePoint::new(1.0, 0.0),
            FeaturePoint::new(0.0, 1.0),
            FeaturePoint::new(-1.0, 0.0),
            FeaturePoint::new(0.0, -1.0),
            FeaturePoint::new(5.0, 5.0),
        ];
        let n = nearest_distances(&features, 0.0, 0.0, true);
        assert_eq!((n.d1, n.d2, n.d3), (1.0, 1.0, 1.0));
    }

    #[test]
    fn test_weighted_combination() {
        let n = NearestDistances {
            d1: 1.0,
            d2: 4.0,
            d3: 9.0,
        };
        assert_eq!(n.weighted(-1.0, 1.0, None), 3.0);
        assert_eq!(n.weighted(1.0, 1.0, Some(2.0)), 23.0);
    }

    #[test]
    fn test_distance_field_single_feature() {
        let config = VoronoiConfig {
            feature_count: 1,
            width: 6,
            height: 4,
            c1: 1.0,
            c2: 0.0,
            c3: 0.0,
            ..Default::default()
        };
        let set = FeatureSet::new(vec![FeaturePoint::new(2.0, 1.0)], 0);
        let mut map = GridBuffer::new(6, 4).unwrap();
        distance_field(&mut map, &set, &config);

        for y in 0..4 {
            for x in 0..6 {
                let dx = x as f32 - 2.0;
                let dy = y as f32 - 1.0;
                assert_eq!(map.get(x, y), dx * dx + dy * dy);
            }
        }
    }

    #[test]
    fn test_third_coefficient_ignored_when_disabled() {
        let set = FeatureSet::new(
            vec![
                FeaturePoint::new(0.0, 0.0),
                FeaturePoint::new(3.0, 0.0),
                FeaturePoint::new(0.0, 3.0),
            ],
            0,
        );
        let mut config = VoronoiConfig {
            width: 4,
            height: 4,
            c1: 0.0,
            c2: 0.0,
            c3: 1.0,
            ..Default::default()
        };
        let mut map = GridBuffer::new(4, 4).unwrap();

        distance_field(&mut map, &set, &config);
        assert!(map.as_slice().iter().all(|&v| v == 0.0));

        config.use_third_coefficient = true;
        distance_field(&mut map, &set, &config);
        // At the origin the third nearest feature is 3 away
        assert_eq!(map.get(0, 0), 9.0);
    }
}
