//! Whitted Math - value types shared by every stage of the ray tracer.
//!
//! Vectors come straight from `glam`; this crate adds the ray, interval and
//! bounding-box types the intersection code is written against.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::{Ray, RayKind};

/// Color type alias (linear RGB, nominally 0-1)
pub type Color = Vec3;
