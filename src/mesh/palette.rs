//! Height palettes for mesh chunks
//!
//! Mesh chunks carry a 1D palette coordinate per vertex (normalized height).
//! A [`Palette`] turns that coordinate into a color, and [`palette_strip`]
//! bakes a palette into the 1D texture a renderer samples with it.

use crate::error::{Result, TerrainError};

/// RGBA color type
pub type TerrainColor = [f32; 4];

/// Maps a normalized height in [0, 1] to a color
pub trait Palette {
    /// Color for normalized height `t`
    fn sample(&self, t: f32) -> TerrainColor;
}

/// Black at the lowest point, white at the highest
#[derive(Debug, Clone, Copy, Default)]
pub struct GrayscalePalette;

impl Palette for GrayscalePalette {
    fn sample(&self, t: f32) -> TerrainColor {
        let t = clamp_unit(t);
        [t, t, t, 1.0]
    }
}

/// Piecewise-linear gradient through sorted color stops
///
/// Two stops at the same position make a hard band edge.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainPalette {
    stops: Vec<(f32, TerrainColor)>,
}

impl TerrainPalette {
    /// Build a palette from `(position, color)` stops
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if there are no stops, a position lies
    /// outside [0, 1], or positions decrease.
    pub fn new(stops: Vec<(f32, TerrainColor)>) -> Result<Self> {
        if stops.is_empty() {
            return Err(TerrainError::InvalidParameter(
                "palette needs at least one stop".into(),
            ));
        }
        for (i, &(pos, _)) in stops.iter().enumerate() {
            if !(0.0..=1.0).contains(&pos) {
                return Err(TerrainError::InvalidParameter(format!(
                    "palette stop {} lies outside [0, 1] (got {})",
                    i, pos
                )));
            }
            if i > 0 && pos < stops[i - 1].0 {
                return Err(TerrainError::InvalidParameter(format!(
                    "palette stops must be sorted (stop {} at {} follows {})",
                    i,
                    pos,
                    stops[i - 1].0
                )));
            }
        }
        Ok(Self { stops })
    }

    /// The gradient stops
    pub fn stops(&self) -> &[(f32, TerrainColor)] {
        &self.stops
    }
}

impl Default for TerrainPalette {
    /// Water, sand, grass, rock and snow bands
    fn default() -> Self {
        Self {
            stops: vec![
                (0.0, [0.0, 0.0, 0.5, 1.0]),    // deep water
                (0.3, [0.0, 0.5, 1.0, 1.0]),    // shallow water
                (0.3, [0.76, 0.70, 0.50, 1.0]), // sand
                (0.4, [0.86, 0.78, 0.63, 1.0]),
                (0.4, [0.13, 0.55, 0.13, 1.0]), // grass
                (0.6, [0.20, 0.80, 0.20, 1.0]),
                (0.6, [0.50, 0.50, 0.50, 1.0]), // rock
                (0.8, [0.75, 0.75, 0.75, 1.0]),
                (0.8, [0.86, 0.86, 0.86, 1.0]), // snow
                (1.0, [1.0, 1.0, 1.0, 1.0]),
            ],
        }
    }
}

impl Palette for TerrainPalette {
    fn sample(&self, t: f32) -> TerrainColor {
        let t = clamp_unit(t);
        let (first_pos, first_color) = self.stops[0];
        if t <= first_pos {
            return first_color;
        }
        for pair in self.stops.windows(2) {
            let (a_pos, a_color) = pair[0];
            let (b_pos, b_color) = pair[1];
            if t <= b_pos {
                let span = b_pos - a_pos;
                if span <= 0.0 {
                    return b_color;
                }
                return lerp_color(a_color, b_color, (t - a_pos) / span);
            }
        }
        self.stops[self.stops.len() - 1].1
    }
}

/// Bake `palette` into a strip of `len` texels
///
/// Texel `i` samples the palette at `i / (len - 1)`, so the first and last
/// texels hold the colors for heights 0 and 1.
pub fn palette_strip<P: Palette + ?Sized>(palette: &P, len: usize) -> Vec<TerrainColor> {
    match len {
        0 => Vec::new(),
        1 => vec![palette.sample(0.5)],
        _ => (0..len)
            .map(|i| palette.sample(i as f32 / (len - 1) as f32))
            .collect(),
    }
}

fn lerp_color(a: TerrainColor, b: TerrainColor, t: f32) -> TerrainColor {
    let s = 1.0 - t;
    [
        a[0] * s + b[0] * t,
        a[1] * s + b[1] * t,
        a[2] * s + b[2] * t,
        a[3] * s + b[3] * t,
    ]
}

#[inline]
fn clamp_unit(t: f32) -> f32 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}
