//! Whitted ray tracer.
//!
//! Implements recursive ray tracing with:
//! - Phong local shading per point light, with shadow rays
//! - Mirror reflection bounded by a configurable depth
//! - Bucketed parallel rendering into a linear image buffer

use std::time::Instant;

use rayon::prelude::*;
use whitted_core::TextureCache;
use whitted_math::{Color, Interval, Ray, RayKind, Vec3};

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::camera::Camera;
use crate::config::{Projection, RenderConfig};
use crate::error::{RenderError, RenderResult};
use crate::hittable::{HitRecord, Hittable};
use crate::scene::Scene;
use crate::shading::{evaluate, reflect};

/// Outcome of a nearest-hit search.
#[derive(Debug)]
pub enum Trace<'a> {
    Miss,
    Hit(HitRecord<'a>),
    /// A shadow ray was blocked; the blocker is not identified.
    Occluded,
}

impl<'a> Trace<'a> {
    pub fn is_miss(&self) -> bool {
        matches!(self, Trace::Miss)
    }

    pub fn hit(self) -> Option<HitRecord<'a>> {
        match self {
            Trace::Hit(rec) => Some(rec),
            _ => None,
        }
    }
}

/// Search `world` for the nearest surface closer than `max_distance`.
///
/// Shadow rays stop at the first blocker strictly closer than
/// `max_distance` and report only `Occluded`.
pub fn trace<'a, H: Hittable + ?Sized>(ray: &Ray, world: &'a H, max_distance: f32) -> Trace<'a> {
    if ray.is_shadow() {
        return if world.occluded(ray, Interval::half_open(0.0, max_distance)) {
            Trace::Occluded
        } else {
            Trace::Miss
        };
    }

    match world.hit(ray, Interval::new(0.0, max_distance)) {
        Some(rec) => Trace::Hit(rec),
        None => Trace::Miss,
    }
}

/// Direct illumination at `hit` summed over every light.
pub fn local_shading(ray: &Ray, hit: &HitRecord, scene: &Scene, config: &RenderConfig) -> Color {
    let material = hit.material;
    let base_color = material.color_at(hit.uv);
    let ray_dir = ray.direction().normalize_or_zero();
    let shadow_origin = hit.point + hit.normal * config.shadow_bias;

    let mut color = Color::ZERO;
    for light in &scene.lights {
        let Some(lit) = light.illuminate(hit.point) else {
            continue;
        };

        let shadow_ray = Ray::shadow(shadow_origin, -lit.direction);
        let visible = trace(&shadow_ray, &scene.shapes, lit.distance).is_miss();
        let intensity = light.intensity_at(hit.point, hit.normal);

        color += evaluate(
            ray_dir,
            hit,
            material,
            intensity,
            base_color,
            lit.direction,
            visible,
        );
    }
    color
}

/// Color seen along `ray` at recursion level `depth`.
///
/// Returns the background once `depth` exceeds `max_depth` or when nothing
/// is hit. Reflective materials spawn a mirror ray while
/// `depth < max_depth`.
pub fn cast_ray(ray: &Ray, scene: &Scene, config: &RenderConfig, depth: u32) -> Color {
    if depth > config.max_depth {
        return config.background;
    }

    let Some(hit) = trace(ray, &scene.shapes, f32::INFINITY).hit() else {
        return config.background;
    };

    let mut color = local_shading(ray, &hit, scene, config);

    if let Some(kr) = hit.material.reflectivity() {
        if kr > 0.0 && depth < config.max_depth {
            let ray_dir = ray.direction().normalize_or_zero();
            let direction = reflect(ray_dir, hit.normal).normalize_or_zero();
            let offset = hit.normal * config.shadow_bias;
            let origin = if direction.dot(hit.normal) >= 0.0 {
                hit.point + offset
            } else {
                hit.point - offset
            };

            let bounce = Ray::new(origin, direction, RayKind::Secondary);
            color += cast_ray(&bounce, scene, config, depth + 1) * kr;
        }
    }

    color
}

/// Primary ray through pixel (`x`, `y`), row 0 at the top.
pub fn primary_ray<C: Camera + ?Sized>(camera: &C, projection: Projection, x: u32, y: u32) -> Ray {
    let width = camera.width().max(1) as f32;
    let height = camera.height().max(1) as f32;

    match projection {
        Projection::FixedAspect => {
            let px = (2.0 * x as f32 / width - 1.0) * camera.aspect_ratio();
            let py = 1.0 - 2.0 * y as f32 / height;
            Ray::primary(camera.position(), Vec3::new(px, py, -1.0).normalize())
        }
        Projection::Camera => {
            let ndc_x = 2.0 * (x as f32 + 0.5) / width - 1.0;
            let ndc_y = 1.0 - 2.0 * (y as f32 + 0.5) / height;
            camera.camera_ray(ndc_x, ndc_y)
        }
    }
}

/// Render a single pixel.
pub fn render_pixel<C: Camera + ?Sized>(
    camera: &C,
    scene: &Scene,
    config: &RenderConfig,
    x: u32,
    y: u32,
) -> Color {
    let ray = primary_ray(camera, config.projection, x, y);
    cast_ray(&ray, scene, config, 0)
}

/// Clamp a value to [0, 1] range.
#[inline]
fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Clamp a linear color to `[0, 1]` and scale it to 8 bits per channel.
pub fn tonemap(color: Color) -> [u8; 3] {
    let r = (255.0 * clamp_01(color.x)) as u8;
    let g = (255.0 * clamp_01(color.y)) as u8;
    let b = (255.0 * clamp_01(color.z)) as u8;
    [r, g, b]
}

/// Linear RGB render output, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let x = bucket.x + i as u32 % bucket.width;
            let y = bucket.y + i as u32 / bucket.width;
            self.set(x, y, *color);
        }
    }

    /// Tone-mapped RGB bytes, three per pixel.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| tonemap(*c)).collect()
    }
}

/// Render the scene as seen by `camera`.
///
/// Buckets are traced in parallel on a dedicated rayon pool sized by
/// `config.threads`. The scene must be fully prepared (textures decoded,
/// accelerator built) before this is called.
pub fn render<C: Camera + ?Sized>(
    camera: &C,
    scene: &Scene,
    config: &RenderConfig,
) -> RenderResult<ImageBuffer> {
    let (width, height) = (camera.width(), camera.height());
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidResolution { width, height });
    }

    if scene.lights.is_empty() {
        log::warn!("Scene has no lights; only background and reflections will show");
    }
    for material in scene.unresolved_textures() {
        log::warn!(
            "Material '{}' texture {:?} was never loaded; using diffuse color",
            material.name,
            material.texture_path
        );
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads.unwrap_or(0))
        .build()?;
    let buckets = generate_buckets(width, height, config.bucket_size);

    log::info!(
        "Rendering {}x{}: {} buckets, {} threads, max depth {}",
        width,
        height,
        buckets.len(),
        pool.current_num_threads(),
        config.max_depth
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = pool.install(|| {
        buckets
            .par_iter()
            .map(|bucket| BucketResult::new(*bucket, render_bucket(bucket, camera, scene, config)))
            .collect()
    });

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    Ok(image)
}

/// A prepared scene plus the settings to render it with.
pub struct Renderer {
    scene: Scene,
    config: RenderConfig,
}

impl Renderer {
    /// Decodes material textures, then builds the configured accelerator
    /// over the scene.
    ///
    /// Relative texture paths resolve against `config.texture_dir`.
    pub fn new(scene: Scene, config: RenderConfig) -> RenderResult<Self> {
        let mut cache = match &config.texture_dir {
            Some(dir) => TextureCache::with_base_dir(dir),
            None => TextureCache::new(),
        };
        Self::with_texture_cache(scene, config, &mut cache)
    }

    /// Like [`Renderer::new`], but decodes through a caller-owned cache.
    pub fn with_texture_cache(
        mut scene: Scene,
        config: RenderConfig,
        cache: &mut TextureCache,
    ) -> RenderResult<Self> {
        scene.resolve_textures(cache)?;
        let scene = scene.accelerate(config.accelerator)?;
        Ok(Self { scene, config })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn render<C: Camera + ?Sized>(&self, camera: &C) -> RenderResult<ImageBuffer> {
        render(camera, &self.scene, &self.config)
    }
}
