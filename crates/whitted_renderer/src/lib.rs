//! Whitted Renderer - CPU Whitted-style ray tracing
//!
//! Traces primary rays per pixel, shades hits with Phong terms from point
//! lights, casts shadow rays, and follows mirror reflections up to a fixed
//! depth. Rendering is split into buckets traced in parallel with rayon.

mod bucket;
mod bvh;
mod camera;
mod config;
mod error;
mod hittable;
mod mesh;
mod quad;
mod renderer;
mod scene;
mod shading;
mod shape;
mod sphere;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult};
pub use bvh::BvhNode;
pub use camera::{Camera, Pinhole};
pub use config::{Accelerator, Projection, RenderConfig, DEFAULT_BUCKET_SIZE};
pub use error::{BvhError, RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, ShapeList};
pub use mesh::TriangleMesh;
pub use quad::Quad;
pub use renderer::{
    cast_ray, local_shading, primary_ray, render, render_pixel, tonemap, trace, ImageBuffer,
    Renderer, Trace,
};
pub use scene::Scene;
pub use shading::{evaluate, reflect, refract, INDEX_OF_REFRACTION};
pub use shape::Shape;
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export common math types from whitted_math
pub use whitted_math::{Aabb, Color, Interval, Ray, RayKind, Vec2, Vec3};
