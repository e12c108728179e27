//! Renders a small Whitted scene and saves it as a PPM.
//!
//! Usage: `cargo run --example single_sphere -- [config.json] [output.ppm]`

use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use whitted_core::{Material, PointLight, PolygonMesh};
use whitted_renderer::{
    Color, ImageBuffer, Pinhole, Projection, Quad, RenderConfig, Renderer, Scene, Sphere, Vec3,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => RenderConfig::from_path(&path)
            .with_context(|| format!("Failed to load render config {}", path))?,
        None => RenderConfig::default().with_projection(Projection::Camera),
    };
    let output = args.next().unwrap_or_else(|| "whitted.ppm".to_string());

    let scene = build_scene().context("Failed to build scene")?;
    let camera = Pinhole::new(640, 480)
        .with_position(Vec3::new(0.0, 1.0, 3.0), Vec3::new(0.0, 0.0, -5.0), Vec3::Y)
        .with_fov(50.0);

    let renderer = Renderer::new(scene, config)?;
    let image = renderer.render(&camera)?;

    save_ppm(&image, &output).with_context(|| format!("Failed to save {}", output))?;
    log::info!("Saved to {}", output);
    Ok(())
}

fn build_scene() -> Result<Scene> {
    let red = Arc::new(
        Material::new("red", Color::new(0.9, 0.2, 0.2))
            .with_phong(0.8, 0.5, 32.0),
    );
    let mirror = Arc::new(
        Material::new("mirror", Color::new(0.9, 0.9, 0.9))
            .with_phong(0.2, 0.8, 64.0)
            .with_reflectivity(0.7),
    );
    let floor = Arc::new(
        Material::new("floor", Color::new(0.6, 0.6, 0.5))
            .with_phong(1.0, 0.0, 1.0),
    );
    let blue = Arc::new(
        Material::new("blue", Color::new(0.2, 0.3, 0.9))
            .with_phong(0.9, 0.3, 16.0),
    );

    let ball = PolygonMesh::poly_sphere(Vec3::new(2.2, -0.4, -5.5), 0.6, 24);
    let warm = Color::new(1.0, 0.9, 0.8);

    let mut scene = Scene::new()
        .with_shape(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, red))
        .with_shape(Sphere::new(Vec3::new(-2.2, 0.0, -6.0), 1.0, mirror))
        .with_shape(Quad::new(
            Vec3::new(-10.0, -1.0, 5.0),
            Vec3::new(10.0, -1.0, 5.0),
            Vec3::new(-10.0, -1.0, -20.0),
            Vec3::new(10.0, -1.0, -20.0),
            floor,
        ))
        .with_light(PointLight::new(Vec3::new(0.0, 3.0, -5.0)).with_color(Color::ONE, 400.0))
        .with_light(PointLight::new(Vec3::new(-4.0, 5.0, 2.0)).with_color(warm, 600.0));
    scene.add_polygon_mesh(&ball, blue)?;

    Ok(scene)
}

fn save_ppm(image: &ImageBuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for rgb in image.to_rgb8().chunks_exact(3) {
        writeln!(writer, "{} {} {}", rgb[0], rgb[1], rgb[2])?;
    }

    writer.flush()
}
