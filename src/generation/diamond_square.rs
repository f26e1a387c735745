//! Diamond-Square fractal height-field synthesis
//!
//! Builds a `(2^n + 1)²` height field by recursive midpoint displacement.
//!
//! # Algorithm
//!
//! 1. Seed the four corners (NW, NE, SE, SW) with draws from `[-c0, c0]`,
//!    where `c0 = size^(1 - D)`.
//! 2. With step `s` starting at `size - 1`, repeat while `s > 1`:
//!    - **Square pass**: every square center gets the mean of its diagonal
//!      corners plus a draw from `[-c, c]`, `c = (s/2)^(1 - D)`.
//!    - **Diamond pass**: every diamond center gets the mean of its axis
//!      neighbours at distance `s/2` plus a draw from `[-c, c]`.
//!    - Halve `s`.
//!
//! Neighbours outside the grid are skipped rather than wrapped or clamped,
//! and the mean only divides by the neighbours that exist.
//!
//! The draw order (corners, then square centers row by row, then diamond
//! centers row by row) is fixed: the same seed always yields the same terrain.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::check_fractal_dimension;
use crate::error::{Result, TerrainError};
use crate::grid::GridBuffer;

/// Fill `map` with a Diamond-Square height field
///
/// `map` must already be `size × size` with `size = 2^n + 1`;
/// [`generate_fractal_into`](crate::generation::generate_fractal_into) sizes
/// the buffer from a configuration.
///
/// # Errors
///
/// Returns `InvalidParameter` if `fractal_dimension` is outside (0, 1] or
/// the grid is not a square of side `2^n + 1` with `n >= 1`. `map` is left
/// untouched in that case.
pub fn diamond_square(map: &mut GridBuffer, fractal_dimension: f32, seed: u64) -> Result<()> {
    check_fractal_dimension(fractal_dimension)?;
    let size = map.width();
    if size != map.height() || size < 3 || !(size - 1).is_power_of_two() {
        return Err(TerrainError::InvalidParameter(format!(
            "Diamond-Square needs a square grid of side 2^n + 1 (got {}x{})",
            map.width(),
            map.height()
        )));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let roughness = 1.0 - fractal_dimension;
    let last = size - 1;

    let c0 = (size as f32).powf(roughness);
    for (x, y) in [(0, 0), (last, 0), (last, last), (0, last)] {
        map.set(x, y, rng.gen_range(-c0..=c0));
    }

    let mut step = last;
    while step > 1 {
        let half = step / 2;
        let amplitude = (half as f32).powf(roughness);

        // Square pass
        for y in (half..size).step_by(step) {
            for x in (half..size).step_by(step) {
                let mean = square_mean(map, x, y, half);
                map.set(x, y, mean + rng.gen_range(-amplitude..=amplitude));
            }
        }

        // Diamond pass
        for y in (0..size).step_by(half) {
            let start = if (y / half) % 2 == 0 { half } else { 0 };
            for x in (start..size).step_by(step) {
                let mean = diamond_mean(map, x, y, half);
                map.set(x, y, mean + rng.gen_range(-amplitude..=amplitude));
            }
        }

        step = half;
    }

    Ok(())
}

/// Mean of the in-bounds diagonal corners around `(x, y)`
fn square_mean(map: &GridBuffer, x: usize, y: usize, half: usize) -> f32 {
    let (x, y, h) = (x as isize, y as isize, half as isize);
    mean_of_present([
        map.get_signed(x - h, y - h), // NW
        map.get_signed(x + h, y - h), // NE
        map.get_signed(x + h, y + h), // SE
        map.get_signed(x - h, y + h), // SW
    ])
}

/// Mean of the in-bounds axis neighbours around `(x, y)`
fn diamond_mean(map: &GridBuffer, x: usize, y: usize, half: usize) -> f32 {
    let (x, y, h) = (x as isize, y as isize, half as isize);
    mean_of_present([
        map.get_signed(x, y - h),
        map.get_signed(x + h, y),
        map.get_signed(x, y + h),
        map.get_signed(x - h, y),
    ])
}

/// Average of the samples that exist; 0.0 when none do
fn mean_of_present(samples: [Option<f32>; 4]) -> f32 {
    let (sum, count) = samples
        .iter()
        .flatten()
        .fold((0.0f32, 0u32), |(sum, count), &v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(size: usize) -> GridBuffer {
        GridBuffer::new(size, size).unwrap()
    }

    #[test]
    fn test_mean_of_present() {
        assert_eq!(mean_of_present([None, None, None, None]), 0.0);
        assert_eq!(mean_of_present([Some(2.0), None, Some(4.0), None]), 3.0);
        assert_eq!(
            mean_of_present([Some(1.0), Some(2.0), Some(3.0), Some(6.0)]),
            3.0
        );
    }

    #[test]
    fn test_square_mean_reads_all_four_corners() {
        // Distinct corner values catch a corner read twice
        let mut map = fresh(3);
        map.set(0, 0, 1.0); // NW
        map.set(2, 0, 2.0); // NE
        map.set(2, 2, 4.0); // SE
        map.set(0, 2, 8.0); // SW
        assert_eq!(square_mean(&map, 1, 1, 1), 15.0 / 4.0);
    }

    #[test]
    fn test_diamond_mean_skips_missing_neighbours() {
        let mut map = fresh(3);
        map.set(0, 0, 3.0);
        map.set(2, 0, 5.0);
        map.set(1, 1, 10.0);
        // (1, 0) has no northern neighbour: mean of W, E and S only
        assert_eq!(diamond_mean(&map, 1, 0, 1), (3.0 + 5.0 + 10.0) / 3.0);
    }

    #[test]
    fn test_corners_match_first_draws() {
        let seed = 1234;
        let dimension = 0.6;
        let mut map = fresh(17);
        diamond_square(&mut map, dimension, seed).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let c0 = 17f32.powf(1.0 - dimension);
        let expected: Vec<f32> = (0..4).map(|_| rng.gen_range(-c0..=c0)).collect();

        assert_eq!(map.get(0, 0), expected[0]);
        assert_eq!(map.get(16, 0), expected[1]);
        assert_eq!(map.get(16, 16), expected[2]);
        assert_eq!(map.get(0, 16), expected[3]);
    }

    #[test]
    fn test_smallest_grid_follows_draw_order() {
        // 3×3 with D = 1: every amplitude is 1, one square and four diamonds.
        // Neighbour sums follow the N, E, S, W read order.
        let seed = 77;
        let mut map = fresh(3);
        diamond_square(&mut map, 1.0, seed).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut draw = || rng.gen_range(-1.0f32..=1.0);
        let (nw, ne, se, sw) = (draw(), draw(), draw(), draw());
        let center = (nw + ne + se + sw) / 4.0 + draw();
        let top = (ne + center + nw) / 3.0 + draw();
        let left = (nw + center + sw) / 3.0 + draw();
        let right = (ne + se + center) / 3.0 + draw();
        let bottom = (center + se + sw) / 3.0 + draw();

        assert_eq!(map.get(1, 1), center);
        assert_eq!(map.get(1, 0), top);
        assert_eq!(map.get(0, 1), left);
        assert_eq!(map.get(2, 1), right);
        assert_eq!(map.get(1, 2), bottom);
    }

    #[test]
    fn test_two_levels_follow_draw_order() {
        // 5×5 with D = 1: every amplitude is 1 on both levels
        let seed = 2024;
        let mut map = fresh(5);
        diamond_square(&mut map, 1.0, seed).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut g = [[0.0f32; 5]; 5]; // g[y][x]
        for (x, y) in [(0, 0), (4, 0), (4, 4), (0, 4)] {
            g[y][x] = rng.gen_range(-1.0f32..=1.0);
        }

        // Mean of the in-bounds cells at the given offsets, summed in order
        let mean = |g: &[[f32; 5]; 5], x: usize, y: usize, offsets: [(isize, isize); 4]| {
            let (mut sum, mut count) = (0.0f32, 0u32);
            for (dx, dy) in offsets {
                let (nx, ny) = (x as isize + dx, y as isize + dy);
                if (0..5).contains(&nx) && (0..5).contains(&ny) {
                    sum += g[ny as usize][nx as usize];
                    count += 1;
                }
            }
            sum / count as f32
        };
        let diagonal = |h: isize| [(-h, -h), (h, -h), (h, h), (-h, h)];
        let axis = |h: isize| [(0, -h), (h, 0), (0, h), (-h, 0)];

        let levels: [(isize, &[(usize, usize)], &[(usize, usize)]); 2] = [
            (2, &[(2, 2)], &[(2, 0), (0, 2), (4, 2), (2, 4)]),
            (
                1,
                &[(1, 1), (3, 1), (1, 3), (3, 3)],
                &[
                    (1, 0),
                    (3, 0),
                    (0, 1),
                    (2, 1),
                    (4, 1),
                    (1, 2),
                    (3, 2),
                    (0, 3),
                    (2, 3),
                    (4, 3),
                    (1, 4),
                    (3, 4),
                ],
            ),
        ];

        let mut visited = 4;
        for (half, squares, diamonds) in levels {
            for &(x, y) in squares {
                g[y][x] = mean(&g, x, y, diagonal(half)) + rng.gen_range(-1.0f32..=1.0);
            }
            for &(x, y) in diamonds {
                g[y][x] = mean(&g, x, y, axis(half)) + rng.gen_range(-1.0f32..=1.0);
            }
            visited += squares.len() + diamonds.len();
        }
        assert_eq!(visited, 25);

        for y in 0..5 {
            for x in 0..5 {
                assert_eq!(map.get(x, y), g[y][x], "cell ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_rejects_invalid_input() {
        for dimension in [f32::NAN, 0.0, 1.5] {
            let mut map = fresh(5);
            assert!(matches!(
                diamond_square(&mut map, dimension, 1),
                Err(TerrainError::InvalidParameter(_))
            ));
            assert!(map.as_slice().iter().all(|&v| v == 0.0));
        }

        for (w, h) in [(4, 4), (5, 3), (1, 1), (2, 2)] {
            let mut map = GridBuffer::new(w, h).unwrap();
            assert!(diamond_square(&mut map, 0.5, 1).is_err());
            assert!(map.as_slice().iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_every_cell_is_written() {
        let mut map = fresh(33);
        map.fill(f32::NAN);
        diamond_square(&mut map, 0.5, 9).unwrap();
        assert!(map.as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_determinism() {
        let mut a = fresh(65);
        let mut b = fresh(65);
        diamond_square(&mut a, 0.8, 42).unwrap();
        diamond_square(&mut b, 0.8, 42).unwrap();
        assert_eq!(a, b);

        let mut c = fresh(65);
        diamond_square(&mut c, 0.8, 43).unwrap();
        assert_ne!(a, c);
    }
}
