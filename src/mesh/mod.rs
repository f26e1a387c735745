//! Chunked mesh tessellation of height grids
//!
//! Produces engine-agnostic [`MeshChunk`]s from a [`GridBuffer`]. A renderer
//! usually caps the vertex count of a single mesh, so the grid is split into
//! chunks of at most `max_chunk_size` vertices per side. Neighbouring chunks
//! share their seam row or column, so no welding is needed afterwards.
//!
//! Output can be consumed by any engine:
//! - Bevy: insert the arrays as `Mesh` attributes
//! - Godot: pack them into an `ArrayMesh`
//! - wgpu: upload them directly as vertex and index buffers

mod palette;

pub use palette::{palette_strip, GrayscalePalette, Palette, TerrainColor, TerrainPalette};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::Vec3;

use crate::config::{DiagonalMode, TessellationConfig};
use crate::error::Result;
use crate::grayscale::FLAT_GRAY;
use crate::grid::GridBuffer;

/// One renderable piece of a tessellated grid
///
/// Vertices are stored row-major over the chunk's grid rectangle, so the
/// vertex for grid cell `(x, y)` sits at `(x - x0) + (y - y0) * columns`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshChunk {
    /// First grid column covered
    pub x0: usize,
    /// First grid row covered
    pub y0: usize,
    /// Vertex columns in this chunk
    pub columns: usize,
    /// Vertex rows in this chunk
    pub rows: usize,
    /// Vertex positions; Z holds the remapped height
    pub positions: Vec<[f32; 3]>,
    /// Smooth vertex normals, identical on both sides of a seam
    pub normals: Vec<[f32; 3]>,
    /// Globally normalized height, for sampling a 1D palette texture
    pub palette_coords: Vec<f32>,
    /// Planar texture coordinates over the whole grid, in [0, 1]
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices, counter-clockwise seen from +Z
    pub indices: Vec<u32>,
}

impl MeshChunk {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Covered grid rectangle as `(x0, y0, columns, rows)`
    pub fn grid_rect(&self) -> (usize, usize, usize, usize) {
        (self.x0, self.y0, self.columns, self.rows)
    }

    /// Local vertex index of grid cell `(x, y)`, if this chunk covers it
    pub fn vertex_index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.x0 || y < self.y0 {
            return None;
        }
        let (lx, ly) = (x - self.x0, y - self.y0);
        if lx >= self.columns || ly >= self.rows {
            return None;
        }
        Some(lx + ly * self.columns)
    }

    /// Per-vertex colors from a palette
    pub fn vertex_colors<P: Palette + ?Sized>(&self, palette: &P) -> Vec<TerrainColor> {
        self.palette_coords
            .iter()
            .map(|&t| palette.sample(t))
            .collect()
    }
}

/// Split `len` grid lines into spans of at most `max` lines
///
/// Returns half-open `(start, end)` ranges. The first span starts at 0 and
/// each later span starts on the last line of the previous one, so adjacent
/// spans overlap by exactly one line. `max` must be at least 2.
///
/// # Example
///
/// ```
/// use rust_terrain_synth::chunk_spans;
///
/// assert_eq!(chunk_spans(300, 200), vec![(0, 200), (199, 300)]);
/// ```
pub fn chunk_spans(len: usize, max: usize) -> Vec<(usize, usize)> {
    let max = max.max(2);
    let mut spans = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + max).min(len);
        spans.push((start, end));
        if end >= len {
            break;
        }
        start = end - 1;
    }
    spans
}

/// Tessellate a height grid into mesh chunks
///
/// Heights are remapped from the grid's global range onto
/// `[0, spatial_extent]`; a flat grid lies at Z = 0. Chunks are returned
/// row-major over the chunk grid.
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
/// let map = generate_fractal(8, 0.5, 1).unwrap(); // 257x257
/// let chunks = tessellate(&map, &TessellationConfig::new(200, 10.0)).unwrap();
/// assert_eq!(chunks.len(), 4);
/// assert_eq!(chunks[1].grid_rect(), (199, 0, 58, 200));
/// ```
pub fn tessellate(map: &GridBuffer, config: &TessellationConfig) -> Result<Vec<MeshChunk>> {
    config.validate()?;

    let surface = Surface::new(map, config);
    let normals = surface.vertex_normals();

    let column_spans = chunk_spans(map.width(), config.max_chunk_size);
    let row_spans = chunk_spans(map.height(), config.max_chunk_size);

    let mut chunks = Vec::with_capacity(column_spans.len() * row_spans.len());
    for &(y0, y1) in &row_spans {
        for &(x0, x1) in &column_spans {
            chunks.push(surface.build_chunk(x0, x1, y0, y1, &normals));
        }
    }

    log::debug!(
        "Tessellated {}x{} grid into {} chunks (max {} per side, {:?} diagonals)",
        map.width(),
        map.height(),
        chunks.len(),
        config.max_chunk_size,
        config.diagonal
    );

    Ok(chunks)
}

/// A grid seen as a surface in world space
struct Surface<'a> {
    map: &'a GridBuffer,
    config: &'a TessellationConfig,
    z_min: f32,
    /// `None` when the grid is flat
    z_range: Option<f32>,
}

impl<'a> Surface<'a> {
    fn new(map: &'a GridBuffer, config: &'a TessellationConfig) -> Self {
        let (z_min, z_max) = map.min_max();
        let range = z_max - z_min;
        let z_range = (range > 0.0 && range.is_finite()).then_some(range);
        Self {
            map,
            config,
            z_min,
            z_range,
        }
    }

    /// Height at `(x, y)` mapped onto [0, 1]
    #[inline]
    fn normalized(&self, x: usize, y: usize) -> Option<f32> {
        self.z_range
            .map(|range| (self.map.get(x, y) - self.z_min) / range)
    }

    #[inline]
    fn position(&self, x: usize, y: usize) -> Vec3 {
        let spacing = self.config.cell_spacing;
        let [ox, oy] = self.config.origin;
        let z = self.normalized(x, y).unwrap_or(0.0) * self.config.spatial_extent;
        Vec3::new(ox + x as f32 * spacing, oy + y as f32 * spacing, z)
    }

    /// The two triangles of the quad whose top-left corner is `(x, y)`
    ///
    /// Corners: D `(x, y)`, C `(x+1, y)`, B `(x, y+1)`, A `(x+1, y+1)`.
    fn quad_triangles(&self, x: usize, y: usize) -> [[(usize, usize); 3]; 2] {
        let d = (x, y);
        let c = (x + 1, y);
        let b = (x, y + 1);
        let a = (x + 1, y + 1);

        let split_ad = match self.config.diagonal {
            DiagonalMode::Fixed => true,
            DiagonalMode::Adaptive => {
                let h = |(px, py): (usize, usize)| self.map.get(px, py);
                (h(a) - h(d)).abs() <= (h(b) - h(c)).abs()
            }
        };

        if split_ad {
            [[d, c, a], [a, b, d]]
        } else {
            [[d, c, b], [c, a, b]]
        }
    }

    /// Area-weighted smooth normals for every grid vertex
    fn vertex_normals(&self) -> Vec<Vec3> {
        let (w, h) = (self.map.width(), self.map.height());
        let mut normals = vec![Vec3::ZERO; w * h];

        for y in 0..h.saturating_sub(1) {
            for x in 0..w.saturating_sub(1) {
                for tri in self.quad_triangles(x, y) {
                    let [p0, p1, p2] = tri.map(|(px, py)| self.position(px, py));
                    // Cross product length is twice the triangle area
                    let face = (p1 - p0).cross(p2 - p0);
                    for (px, py) in tri {
                        normals[px + py * w] += face;
                    }
                }
            }
        }

        for n in &mut normals {
            *n = n.try_normalize().unwrap_or(Vec3::Z);
        }
        normals
    }

    fn build_chunk(
        &self,
        x0: usize,
        x1: usize,
        y0: usize,
        y1: usize,
        normals: &[Vec3],
    ) -> MeshChunk {
        let (w, h) = (self.map.width(), self.map.height());
        let columns = x1 - x0;
        let rows = y1 - y0;
        let vertex_count = columns * rows;

        let mut chunk = MeshChunk {
            x0,
            y0,
            columns,
            rows,
            positions: Vec::with_capacity(vertex_count),
            normals: Vec::with_capacity(vertex_count),
            palette_coords: Vec::with_capacity(vertex_count),
            uvs: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(
                columns.saturating_sub(1) * rows.saturating_sub(1) * 6,
            ),
        };

        for y in y0..y1 {
            for x in x0..x1 {
                chunk.positions.push(self.position(x, y).to_array());
                chunk.normals.push(normals[x + y * w].to_array());
                chunk
                    .palette_coords
                    .push(self.normalized(x, y).unwrap_or(FLAT_GRAY));
                chunk.uvs.push([unit_coord(x, w), unit_coord(y, h)]);
            }
        }

        // Chunk sides never exceed MAX_CHUNK_SIDE, so local indices fit u32
        let local = |(x, y): (usize, usize)| ((x - x0) + (y - y0) * columns) as u32;
        for y in y0..y1.saturating_sub(1) {
            for x in x0..x1.saturating_sub(1) {
                for tri in self.quad_triangles(x, y) {
                    chunk.indices.extend(tri.map(local));
                }
            }
        }

        chunk
    }
}

#[inline]
fn unit_coord(i: usize, len: usize) -> f32 {
    if len > 1 {
        i as f32 / (len - 1) as f32
    } else {
        0.0
    }
}
