//! Grayscale normalization for display
//!
//! Maps a grid onto [0, 1] with `(v - min) / (max - min)`. A flat grid
//! (`max == min`) has no range to stretch, so every cell becomes 0.5 rather
//! than dividing by zero.

use crate::grid::GridBuffer;

/// Value written to every cell of a flat grid
pub const FLAT_GRAY: f32 = 0.5;

/// Return a copy of `map` normalized to [0, 1]
///
/// # Example
///
/// ```
/// use rust_terrain_synth::{normalize_to_grayscale, GridBuffer};
///
/// let map = GridBuffer::from_vec(3, 1, vec![-2.0, 0.0, 2.0]).unwrap();
/// let gray = normalize_to_grayscale(&map);
/// assert_eq!(gray.as_slice(), &[0.0, 0.5, 1.0]);
/// ```
pub fn normalize_to_grayscale(map: &GridBuffer) -> GridBuffer {
    let mut gray = map.clone();
    normalize_in_place(&mut gray);
    gray
}

/// Normalize `map` to [0, 1] in place
pub fn normalize_in_place(map: &mut GridBuffer) {
    let (min, max) = map.min_max();
    let range = max - min;

    if range <= 0.0 || !range.is_finite() {
        log::debug!(
            "Degenerate grayscale range [{}, {}], filling with {}",
            min,
            max,
            FLAT_GRAY
        );
        map.fill(FLAT_GRAY);
        return;
    }

    for v in map.as_mut_slice() {
        *v = (*v - min) / range;
    }
}

/// Convert a grid to an 8-bit grayscale image
///
/// The grid is normalized first; a flat grid becomes mid gray.
#[cfg(feature = "image")]
pub fn to_gray_image(map: &GridBuffer) -> image::GrayImage {
    let gray = normalize_to_grayscale(map);
    let pixels = gray
        .as_slice()
        .iter()
        .map(|&v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
        .collect();

    // Length always matches width * height, so from_raw cannot fail
    image::GrayImage::from_raw(gray.width() as u32, gray.height() as u32, pixels)
        .unwrap_or_else(|| image::GrayImage::new(gray.width() as u32, gray.height() as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_range() {
        let map = GridBuffer::from_vec(2, 2, vec![10.0, 20.0, 15.0, 30.0]).unwrap();
        let gray = normalize_to_grayscale(&map);
        assert_eq!(gray.as_slice(), &[0.0, 0.5, 0.25, 1.0]);
        // source is untouched
        assert_eq!(map.get(0, 0), 10.0);
    }

    #[test]
    fn test_flat_buffer_is_mid_gray() {
        for value in [0.0, -3.5, 1e6] {
            let mut map = GridBuffer::new(4, 4).unwrap();
            map.fill(value);
            let gray = normalize_to_grayscale(&map);
            assert!(gray.as_slice().iter().all(|&v| v == FLAT_GRAY));
            assert!(gray.as_slice().iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_single_cell_is_mid_gray() {
        let map = GridBuffer::from_vec(1, 1, vec![42.0]).unwrap();
        assert_eq!(normalize_to_grayscale(&map).get(0, 0), FLAT_GRAY);
    }

    #[test]
    fn test_normalize_in_place_matches_copy() {
        let mut map = GridBuffer::from_vec(3, 1, vec![1.0, 4.0, 2.5]).unwrap();
        let copy = normalize_to_grayscale(&map);
        normalize_in_place(&mut map);
        assert_eq!(map, copy);
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_gray_image() {
        let map = GridBuffer::from_vec(3, 1, vec![0.0, 1.0, 2.0]).unwrap();
        let img = to_gray_image(&map);
        assert_eq!(img.dimensions(), (3, 1));
        assert_eq!(img.get_pixel(0, 0).0, [0]);
        assert_eq!(img.get_pixel(1, 0).0, [128]);
        assert_eq!(img.get_pixel(2, 0).0, [255]);
    }
}
