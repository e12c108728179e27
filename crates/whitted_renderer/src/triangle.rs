//! Triangle primitive for ray tracing.
//!
//! Uses the plane-normal method: intersect the supporting plane, then
//! keep the point if it lies on the inner side of all three edges.
//! Quads and meshes reuse the same routine.

use std::sync::Arc;

use whitted_core::Material;
use whitted_math::{Aabb, Interval, Ray, Vec2, Vec3};

use crate::hittable::{clamp_uv, HitRecord, Hittable};

/// Below this |N·D| the ray is treated as parallel to the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Pad thin dimensions to avoid degenerate AABBs
const BOUNDS_PADDING: f32 = 0.0001;

/// Triangles with less (doubled) area than this have no usable
/// barycentric coordinates.
const MIN_DOUBLE_AREA: f32 = 1e-12;

/// Raw result of a ray-triangle test.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TriangleHit {
    pub t: f32,
    pub point: Vec3,
    /// Unit normal following the v0 -> v1 -> v2 winding
    pub normal: Vec3,
}

/// Intersect a ray with the triangle (v0, v1, v2).
///
/// Degenerate triangles and rays parallel to the plane are misses. A point
/// exactly on an edge counts as inside.
pub(crate) fn intersect_triangle(
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    ray: &Ray,
    ray_t: Interval,
) -> Option<TriangleHit> {
    let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
    if normal == Vec3::ZERO {
        return None;
    }

    let denom = normal.dot(ray.direction());
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = normal.dot(v0 - ray.origin()) / denom;
    if !ray_t.contains(t) {
        return None;
    }

    let point = ray.at(t);
    let edges = [(v0, v1), (v1, v2), (v2, v0)];
    for (a, b) in edges {
        if normal.dot((b - a).cross(point - a)) < 0.0 {
            return None;
        }
    }

    Some(TriangleHit { t, point, normal })
}

/// Area-ratio barycentric weights of `p` with respect to (v0, v1, v2).
///
/// Component `i` is the weight of vertex `i`. Returns `None` for a
/// degenerate triangle.
pub(crate) fn barycentric(v0: Vec3, v1: Vec3, v2: Vec3, p: Vec3) -> Option<Vec3> {
    let total = (v1 - v0).cross(v2 - v0).length();
    if total < MIN_DOUBLE_AREA {
        return None;
    }

    let w0 = (v2 - v1).cross(p - v1).length() / total;
    let w1 = (v0 - v2).cross(p - v2).length() / total;
    let w2 = (v1 - v0).cross(p - v0).length() / total;
    Some(Vec3::new(w0, w1, w2))
}

/// Bounds grown by `BOUNDS_PADDING` on every side.
pub(crate) fn padded_bounds(min: Vec3, max: Vec3) -> Aabb {
    let delta = Vec3::splat(BOUNDS_PADDING);
    Aabb::from_points(min - delta, max + delta)
}

/// Texture coordinate for a standalone triangle: v0 maps to (0, 1),
/// v1 to (1, 1) and v2 to (1, 0).
fn triangle_uv(weights: Vec3) -> Vec2 {
    clamp_uv(
        Vec2::new(0.0, 1.0) * weights.x
            + Vec2::new(1.0, 1.0) * weights.y
            + Vec2::new(1.0, 0.0) * weights.z,
    )
}

/// A triangle primitive.
#[derive(Clone, Debug)]
pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<Material>) -> Self {
        let min = v0.min(v1).min(v2);
        let max = v0.max(v1).max(v2);

        Self {
            v0,
            v1,
            v2,
            material,
            bbox: padded_bounds(min, max),
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub(crate) fn material_mut(&mut self) -> &mut Arc<Material> {
        &mut self.material
    }
}

impl Hittable for Triangle {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let tri = intersect_triangle(self.v0, self.v1, self.v2, ray, ray_t)?;

        let mut rec = HitRecord::new(ray, tri.t, tri.normal, &self.material);
        rec.uv = self.uv_at(&rec);
        Some(rec)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.bbox)
    }

    fn uv_at(&self, rec: &HitRecord) -> Vec2 {
        barycentric(self.v0, self.v1, self.v2, rec.point)
            .map(triangle_uv)
            .unwrap_or(Vec2::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whitted_math::Color;

    fn grey() -> Arc<Material> {
        Arc::new(Material::new("grey", Color::splat(0.5)))
    }

    fn xy_triangle() -> Triangle {
        // Triangle in XY plane at z=-1
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            grey(),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = xy_triangle();

        // Ray pointing at triangle center
        let ray = Ray::primary(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = tri.intersect(&ray).unwrap();

        assert!((rec.t - 1.0).abs() < 0.001);
        assert!(rec.front_face);
        assert_eq!(rec.geometric_normal, Vec3::Z);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = xy_triangle();

        // Ray pointing away
        let ray = Ray::primary(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(tri.intersect(&ray).is_none());

        // Ray passing beside the triangle
        let ray = Ray::primary(Vec3::new(2.0, 0.0, 0.0), Vec3::NEG_Z);
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let tri = xy_triangle();
        let ray = Ray::primary(Vec3::new(0.0, 0.0, -1.0), Vec3::X);
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_degenerate_triangle_misses() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0, grey());
        let ray = Ray::primary(Vec3::new(0.5, 0.0, 1.0), Vec3::NEG_Z);
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_barycentric_weights_at_vertices() {
        let [a, b, c] = xy_triangle().vertices();

        let w = barycentric(a, b, c, a).unwrap();
        assert!((w - Vec3::X).length() < 1e-6);

        let centroid = (a + b + c) / 3.0;
        let w = barycentric(a, b, c, centroid).unwrap();
        assert!((w - Vec3::splat(1.0 / 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_triangle_uv_corners() {
        let tri = xy_triangle();
        let at = |p: Vec3| {
            let ray = Ray::primary(p + Vec3::Z, Vec3::NEG_Z);
            tri.intersect(&ray).unwrap().uv
        };

        assert!((at(Vec3::new(-1.0, -1.0, -1.0)) - Vec2::new(0.0, 1.0)).length() < 1e-5);
        assert!((at(Vec3::new(1.0, -1.0, -1.0)) - Vec2::new(1.0, 1.0)).length() < 1e-5);
        assert!((at(Vec3::new(0.0, 1.0, -1.0)) - Vec2::new(1.0, 0.0)).length() < 1e-5);
    }
}
