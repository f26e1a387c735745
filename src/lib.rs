//! Procedural terrain synthesis on 2D grids
//!
//! A standalone library for generating Diamond-Square height fields, eroding
//! them, building weighted Voronoi diagrams, and cutting the results into
//! mesh chunks suitable for any game engine (Bevy, Godot, etc.)
//!
//! # Quick Start
//!
//! ```rust
//! use rust_terrain_synth::*;
//!
//! // Generate and erode a 129x129 height field
//! let mut terrain = generate_fractal(7, 0.6, 42).unwrap();
//! erode(&mut terrain, 0.02, 8).unwrap();
//!
//! // Cut it into renderable chunks
//! let chunks = tessellate(&terrain, &TessellationConfig::new(64, 20.0)).unwrap();
//! let triangles: usize = chunks.iter().map(|c| c.triangle_count()).sum();
//! println!("Generated {} triangles in {} chunks", triangles, chunks.len());
//!
//! // Voronoi diagrams come out normalized for display
//! let config = VoronoiConfigBuilder::new()
//!     .dimensions(128, 128).unwrap()
//!     .feature_count(24).unwrap()
//!     .build().unwrap();
//! let gray = generate_voronoi(&config, 7).unwrap();
//! assert_eq!(gray.len(), 128 * 128);
//! ```
//!
//! Every generator takes its seed explicitly and builds a fresh
//! `ChaCha8Rng` from it, so identical inputs always give identical grids.
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-feature lookups using KD-tree
//! - `serde`: Enables serialization support for configuration, grids and mesh chunks
//! - `image`: Enables conversion of grids to `image::GrayImage`

// Modules
pub mod error;
pub mod config;
pub mod grid;
pub mod generation;
pub mod erosion;
pub mod grayscale;
pub mod diagram;
pub mod mesh;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{TerrainError, Result};
pub use config::{
    DiagonalMode, FractalConfig, FractalConfigBuilder, TessellationConfig, VoronoiConfig,
    VoronoiConfigBuilder,
};
pub use grid::GridBuffer;
pub use generation::{
    generate_fractal, generate_fractal_into, generate_fractal_with_config, generate_voronoi,
    generate_voronoi_into, FeaturePoint, FeatureSet,
};
pub use erosion::{erode, ThermalErosion};
pub use grayscale::{normalize_in_place, normalize_to_grayscale};
pub use diagram::VoronoiDiagram;
pub use mesh::{
    chunk_spans, palette_strip, tessellate, GrayscalePalette, MeshChunk, Palette, TerrainColor,
    TerrainPalette,
};

#[cfg(feature = "image")]
pub use grayscale::to_gray_image;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;
