//! Grid generators
//!
//! Diamond-Square fractal terrain and weighted Voronoi diagrams. Each call
//! validates its parameters before touching a buffer, seeds a fresh
//! `ChaCha8Rng` from the given seed, and runs to completion.

pub mod diamond_square;
pub mod features;
pub mod perturb;
pub mod voronoi;

pub use diamond_square::diamond_square;
pub use features::{place_features, FeaturePoint, FeatureSet};
pub use perturb::perturb;
pub use voronoi::{distance_field, nearest_distances, NearestDistances};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{FractalConfig, VoronoiConfig};
use crate::error::Result;
use crate::grayscale::normalize_in_place;
use crate::grid::GridBuffer;

/// Generate a Diamond-Square height field
///
/// The grid side is `2^complexity + 1`.
///
/// # Errors
///
/// Returns `InvalidParameter` if `complexity` is outside 1..=10 or
/// `fractal_dimension` is outside (0, 1].
///
/// # Example
///
/// ```
/// use rust_terrain_synth::generate_fractal;
///
/// let map = generate_fractal(5, 0.6, 42).unwrap();
/// assert_eq!((map.width(), map.height()), (33, 33));
/// ```
pub fn generate_fractal(complexity: u32, fractal_dimension: f32, seed: u64) -> Result<GridBuffer> {
    generate_fractal_with_config(&FractalConfig {
        complexity,
        fractal_dimension,
        seed,
    })
}

/// Generate a Diamond-Square height field from a configuration
pub fn generate_fractal_with_config(config: &FractalConfig) -> Result<GridBuffer> {
    config.validate()?;
    let size = config.size();
    let mut map = GridBuffer::new(size, size)?;
    fill_fractal(&mut map, config)?;
    Ok(map)
}

/// Generate a Diamond-Square height field into an existing buffer
///
/// The buffer is resized to the configured side, reusing its allocation when
/// it is large enough.
///
/// # Errors
///
/// Returns `InvalidParameter` for an invalid configuration; `map` is left
/// untouched in that case.
pub fn generate_fractal_into(map: &mut GridBuffer, config: &FractalConfig) -> Result<()> {
    config.validate()?;
    let size = config.size();
    map.resize(size, size)?;
    fill_fractal(map, config)
}

fn fill_fractal(map: &mut GridBuffer, config: &FractalConfig) -> Result<()> {
    diamond_square(map, config.fractal_dimension, config.seed)?;
    log::debug!(
        "Generated {0}x{0} fractal height field (dimension {1}, seed {2})",
        map.width(),
        config.fractal_dimension,
        config.seed
    );
    Ok(())
}

/// Generate a Voronoi diagram normalized to [0, 1]
///
/// Features are placed, the weighted distance field is computed, the
/// optional perturbation is applied, and the result is normalized. A flat
/// result (all cells equal) normalizes to 0.5.
///
/// # Errors
///
/// Returns `InvalidParameter` if the configuration is out of range.
///
/// # Example
///
/// ```
/// use rust_terrain_synth::*;
///
/// let config = VoronoiConfigBuilder::new()
///     .dimensions(64, 64)
///     .unwrap()
///     .feature_count(10)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let map = generate_voronoi(&config, 7).unwrap();
/// assert!(map.as_slice().iter().all(|&v| (0.0..=1.0).contains(&v)));
/// ```
pub fn generate_voronoi(config: &VoronoiConfig, seed: u64) -> Result<GridBuffer> {
    config.validate()?;
    let mut map = GridBuffer::new(config.width, config.height)?;
    generate_voronoi_into(&mut map, config, seed)?;
    Ok(map)
}

/// Generate a normalized Voronoi diagram into an existing buffer
///
/// Returns the placed features.
pub fn generate_voronoi_into(
    map: &mut GridBuffer,
    config: &VoronoiConfig,
    seed: u64,
) -> Result<FeatureSet> {
    let features = voronoi_field_into(map, config, seed)?;
    normalize_in_place(map);
    Ok(features)
}

/// Compute the raw (unnormalized) Voronoi field into `map`
///
/// Feature placement and perturbation share one random stream seeded from
/// `seed`, in that order.
///
/// # Errors
///
/// Returns `InvalidParameter` if the configuration is out of range; `map` is
/// left untouched in that case.
pub fn voronoi_field_into(
    map: &mut GridBuffer,
    config: &VoronoiConfig,
    seed: u64,
) -> Result<FeatureSet> {
    config.validate()?;
    map.resize(config.width, config.height)?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let features = place_features(
        &mut rng,
        config.feature_count,
        config.width,
        config.height,
        config.zone_count,
    )?;

    distance_field(map, &features, config);
    perturb(map, config.perturbation, &mut rng)?;

    log::debug!(
        "Generated {}x{} Voronoi field ({} features, {} zones, perturbation {}, seed {})",
        config.width,
        config.height,
        features.len(),
        config.zone_count,
        config.perturbation,
        seed
    );

    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VoronoiConfigBuilder;
    use crate::error::TerrainError;
    use rand::Rng;

    #[test]
    fn test_fractal_dimensions() {
        for complexity in 1..=7 {
            let map = generate_fractal(complexity, 0.5, 1).unwrap();
            let side = (1usize << complexity) + 1;
            assert_eq!(map.width(), side);
            assert_eq!(map.height(), side);
            assert_eq!(map.len(), side * side);
        }
    }

    #[test]
    fn test_fractal_largest_complexity() {
        let map = generate_fractal(10, 0.9, 3).unwrap();
        assert_eq!(map.len(), 1025 * 1025);
    }

    #[test]
    fn test_fractal_determinism() {
        let a = generate_fractal(6, 0.8, 42).unwrap();
        let b = generate_fractal(6, 0.8, 42).unwrap();
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_fractal_corners_are_seeded_draws() {
        let seed = 31337;
        let map = generate_fractal(4, 0.5, seed).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let c0 = 17f32.powf(0.5);
        let nw: f32 = rng.gen_range(-c0..=c0);
        let ne: f32 = rng.gen_range(-c0..=c0);
        let se: f32 = rng.gen_range(-c0..=c0);
        let sw: f32 = rng.gen_range(-c0..=c0);

        assert_eq!(map.get(0, 0), nw);
        assert_eq!(map.get(16, 0), ne);
        assert_eq!(map.get(16, 16), se);
        assert_eq!(map.get(0, 16), sw);
    }

    #[test]
    fn test_fractal_rejects_invalid_parameters() {
        assert!(matches!(
            generate_fractal(0, 0.5, 1),
            Err(TerrainError::InvalidParameter(_))
        ));
        assert!(generate_fractal(11, 0.5, 1).is_err());
        assert!(generate_fractal(4, 0.0, 1).is_err());
        assert!(generate_fractal(4, 1.01, 1).is_err());
    }

    #[test]
    fn test_fractal_into_reuses_buffer() {
        let config = FractalConfig {
            complexity: 5,
            fractal_dimension: 0.7,
            seed: 11,
        };
        let mut map = GridBuffer::new(65, 65).unwrap();
        generate_fractal_into(&mut map, &config).unwrap();
        assert_eq!(map, generate_fractal_with_config(&config).unwrap());

        // Regenerating into a dirty buffer gives the same result
        map.fill(123.0);
        generate_fractal_into(&mut map, &config).unwrap();
        assert_eq!(map, generate_fractal_with_config(&config).unwrap());
    }

    #[test]
    fn test_fractal_into_leaves_buffer_on_error() {
        let mut map = GridBuffer::new(3, 3).unwrap();
        map.fill(2.0);
        let bad = FractalConfig {
            complexity: 0,
            ..Default::default()
        };
        assert!(generate_fractal_into(&mut map, &bad).is_err());
        assert!(map.as_slice().iter().all(|&v| v == 2.0));
    }

    #[test]
    fn test_voronoi_normalized_range() {
        let config = VoronoiConfigBuilder::new()
            .dimensions(48, 32)
            .unwrap()
            .feature_count(12)
            .unwrap()
            .perturbation(0.05)
            .unwrap()
            .build()
            .unwrap();

        let map = generate_voronoi(&config, 99).unwrap();
        assert_eq!((map.width(), map.height()), (48, 32));
        let (min, max) = map.min_max();
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn test_voronoi_determinism() {
        let config = VoronoiConfigBuilder::new()
            .dimensions(40, 40)
            .unwrap()
            .feature_count(9)
            .unwrap()
            .zone_count(3)
            .unwrap()
            .perturbation(0.1)
            .unwrap()
            .build()
            .unwrap();

        let a = generate_voronoi(&config, 5).unwrap();
        let b = generate_voronoi(&config, 5).unwrap();
        assert_eq!(a, b);

        let c = generate_voronoi(&config, 6).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_voronoi_single_feature_field() {
        let config = VoronoiConfigBuilder::new()
            .dimensions(16, 16)
            .unwrap()
            .feature_count(1)
            .unwrap()
            .coefficients(1.0, 0.0, 0.0)
            .build()
            .unwrap();

        let mut raw = GridBuffer::new(1, 1).unwrap();
        let features = voronoi_field_into(&mut raw, &config, 17).unwrap();
        let f = features.points()[0];

        for y in 0..16 {
            for x in 0..16 {
                let n = nearest_distances(features.points(), x as f32, y as f32, true);
                assert_eq!(n.d1, f.distance_squared(x as f32, y as f32));
                assert_eq!(n.d1, n.d2);
                assert_eq!(n.d2, n.d3);
                assert_eq!(raw.get(x, y), n.d1);
            }
        }
    }

    #[test]
    fn test_voronoi_flat_field_normalizes_to_half() {
        // c1 = c2 = 0 gives a constant field
        let config = VoronoiConfigBuilder::new()
            .dimensions(8, 8)
            .unwrap()
            .coefficients(0.0, 0.0, 0.0)
            .build()
            .unwrap();
        let map = generate_voronoi(&config, 1).unwrap();
        assert!(map.as_slice().iter().all(|&v| v == 0.5));
    }

    #[test]
    fn test_voronoi_rejects_hand_built_invalid_config() {
        let config = VoronoiConfig {
            feature_count: 0,
            ..Default::default()
        };
        assert!(generate_voronoi(&config, 1).is_err());
    }
}
