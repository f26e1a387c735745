//! Render Voronoi diagrams and a fractal height field to PNG files
//!
//! Run with `cargo run --example voronoi_image --features image`.

use rust_terrain_synth::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let variants = [
        ("voronoi_cells.png", -1.0, 1.0, 0.0, false, 0.0),
        ("voronoi_crackle.png", 1.0, 0.0, 0.0, false, 0.0),
        ("voronoi_third.png", -1.0, 0.5, 0.5, true, 0.0),
        ("voronoi_perturbed.png", -1.0, 1.0, 0.0, false, 0.02),
    ];

    for (name, c1, c2, c3, third, perturbation) in variants {
        let config = VoronoiConfigBuilder::new()
            .dimensions(512, 512)?
            .feature_count(48)?
            .zone_count(4)?
            .coefficients(c1, c2, c3)
            .use_third_coefficient(third)
            .perturbation(perturbation)?
            .build()?;

        let diagram = VoronoiDiagram::generate(config, 2025)?;
        to_gray_image(diagram.buffer()).save(name)?;
        println!("Saved {} ({} features)", name, diagram.feature_count());
    }

    let mut terrain = generate_fractal(9, 0.6, 2025)?;
    erode(&mut terrain, 0.01, 10)?;
    to_gray_image(&terrain).save("terrain.png")?;
    println!("Saved terrain.png");

    Ok(())
}
