//! Backward-warp domain perturbation
//!
//! Every output cell samples the unperturbed field at a randomly displaced
//! source coordinate. This distorts cell borders without blurring them.

use rand::Rng;

use crate::config::check_perturbation;
use crate::error::Result;
use crate::grid::GridBuffer;

/// Displace `map` by up to `perturbation * width` cells in X and
/// `perturbation * height` cells in Y
///
/// Output cells are visited row by row and each draws `dx` then `dy`
/// uniformly from its symmetric range. Source coordinates are rounded to the
/// nearest cell and clamped to the grid. A perturbation of zero leaves
/// `map` untouched and consumes no random numbers.
///
/// # Errors
///
/// Returns `InvalidParameter` unless `0 <= perturbation <= 1`; `map` and
/// `rng` are left untouched in that case.
pub fn perturb<R: Rng>(map: &mut GridBuffer, perturbation: f32, rng: &mut R) -> Result<()> {
    check_perturbation(perturbation)?;
    if perturbation == 0.0 {
        return Ok(());
    }

    let (width, height) = (map.width(), map.height());
    let max_dx = perturbation * width as f32;
    let max_dy = perturbation * height as f32;
    let source = map.clone();

    for y in 0..height {
        for x in 0..width {
            let dx = rng.gen_range(-max_dx..=max_dx);
            let dy = rng.gen_range(-max_dy..=max_dy);
            let sx = clamp_to_grid(x as f32 + dx, width);
            let sy = clamp_to_grid(y as f32 + dy, height);
            map.set(x, y, source.get(sx, sy));
        }
    }
    Ok(())
}

#[inline]
fn clamp_to_grid(coord: f32, len: usize) -> usize {
    coord.round().clamp(0.0, (len - 1) as f32) as usize
}
