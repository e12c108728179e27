//! Four-sided planar primitive, stored as two triangles sharing the
//! v1-v2 diagonal.

use std::sync::Arc;

use whitted_core::Material;
use whitted_math::{Aabb, Interval, Ray, Vec2, Vec3};

use crate::hittable::{clamp_uv, HitRecord, Hittable};
use crate::triangle::{barycentric, intersect_triangle, padded_bounds};

/// Sub-triangle (v0, v1, v2).
const LOWER: usize = 0;
/// Sub-triangle (v3, v2, v1).
const UPPER: usize = 1;

/// A planar quad.
///
/// Corners map to texture space as v0 (0, 0), v1 (1, 0), v2 (0, 1) and
/// v3 (1, 1), so v1 and v2 are the diagonal shared by the two triangles.
#[derive(Clone, Debug)]
pub struct Quad {
    corners: [Vec3; 4],
    material: Arc<Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, v3: Vec3, material: Arc<Material>) -> Self {
        let min = v0.min(v1).min(v2).min(v3);
        let max = v0.max(v1).max(v2).max(v3);

        Self {
            corners: [v0, v1, v2, v3],
            material,
            bbox: padded_bounds(min, max),
        }
    }

    /// Parallelogram spanned by `u` and `v` from `origin`.
    pub fn from_edges(origin: Vec3, u: Vec3, v: Vec3, material: Arc<Material>) -> Self {
        Self::new(origin, origin + u, origin + v, origin + u + v, material)
    }

    pub fn corners(&self) -> [Vec3; 4] {
        self.corners
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub(crate) fn material_mut(&mut self) -> &mut Arc<Material> {
        &mut self.material
    }

    fn sub_triangle(&self, index: usize) -> [Vec3; 3] {
        let [v0, v1, v2, v3] = self.corners;
        if index == UPPER {
            [v3, v2, v1]
        } else {
            [v0, v1, v2]
        }
    }
}

impl Hittable for Quad {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let mut closest = None;
        let mut interval = ray_t;

        for index in [LOWER, UPPER] {
            let [a, b, c] = self.sub_triangle(index);
            if let Some(tri) = intersect_triangle(a, b, c, ray, interval) {
                interval = ray_t.with_max(tri.t);
                closest = Some((index, tri));
            }
        }

        let (index, tri) = closest?;
        let mut rec =
            HitRecord::new(ray, tri.t, tri.normal, &self.material).with_triangle_index(index);
        rec.uv = self.uv_at(&rec);
        Some(rec)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.bbox)
    }

    fn uv_at(&self, rec: &HitRecord) -> Vec2 {
        let index = rec.triangle_index.unwrap_or(LOWER);
        let [a, b, c] = self.sub_triangle(index);
        let Some(w) = barycentric(a, b, c, rec.point) else {
            return Vec2::ZERO;
        };

        let uv = if index == UPPER {
            // v3 is (1, 1), v2 is (0, 1), v1 is (1, 0)
            Vec2::new(w.x + w.z, w.x + w.y)
        } else {
            // v0 is (0, 0), v1 is (1, 0), v2 is (0, 1)
            Vec2::new(w.y, w.z)
        };
        clamp_uv(uv)
    }
}
