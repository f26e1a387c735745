//! Demonstration of the terrain pipeline: generate, erode, tessellate

use rust_terrain_synth::*;

fn main() -> Result<()> {
    println!("Generating terrain...");

    let config = FractalConfigBuilder::new()
        .complexity(9)?
        .fractal_dimension(0.55)?
        .seed(42)
        .build()?;

    let mut terrain = generate_fractal_with_config(&config)?;
    let (min, max) = terrain.min_max();
    println!(
        "Generated {}x{} height field, range [{:.3}, {:.3}]",
        terrain.width(),
        terrain.height(),
        min,
        max
    );

    // Relax steep slopes
    erode(&mut terrain, 0.01, 20)?;
    let (min, max) = terrain.min_max();
    println!("After erosion: range [{:.3}, {:.3}]", min, max);

    let chunks = tessellate(&terrain, &TessellationConfig::new(200, 40.0))?;

    println!("\nMesh statistics:");
    println!("  Chunks: {}", chunks.len());
    for chunk in &chunks {
        let (x0, y0, columns, rows) = chunk.grid_rect();
        println!(
            "  [{:>3}, {:>3}] {:>3}x{:<3} {:>6} vertices {:>6} triangles",
            x0,
            y0,
            columns,
            rows,
            chunk.vertex_count(),
            chunk.triangle_count()
        );
    }

    // Memory estimate
    let bytes: usize = chunks
        .iter()
        .map(|c| {
            c.positions.len() * 12 // 3 floats * 4 bytes
                + c.normals.len() * 12
                + c.palette_coords.len() * 4
                + c.uvs.len() * 8
                + c.indices.len() * 4
        })
        .sum();
    println!("  Total: {} bytes ({:.2} MB)", bytes, bytes as f32 / 1024.0 / 1024.0);

    // Palette texture for the palette coordinates
    let strip = palette_strip(&TerrainPalette::default(), 256);
    println!("\nPalette strip: {} texels, top {:?}", strip.len(), strip[255]);

    // Compare diagonal policies
    println!("\n=== Diagonal modes ===");
    for diagonal in [DiagonalMode::Fixed, DiagonalMode::Adaptive] {
        let config = TessellationConfig::new(200, 40.0).with_diagonal(diagonal);
        let chunks = tessellate(&terrain, &config)?;
        let triangles: usize = chunks.iter().map(|c| c.triangle_count()).sum();
        println!("{:?}: {} triangles", diagonal, triangles);
    }

    Ok(())
}
