//! Triangle mesh primitive built from a polygon mesh.

use std::sync::Arc;

use whitted_core::{Material, MeshResult, PolygonMesh};
use whitted_math::{Aabb, Interval, Ray, Vec2, Vec3};

use crate::hittable::{clamp_uv, HitRecord, Hittable};
use crate::triangle::{barycentric, intersect_triangle, padded_bounds};

/// A fan-triangulated mesh searched linearly.
///
/// Per-corner normals, when present, are interpolated for smooth shading;
/// per-corner UVs are interpolated for texturing.
#[derive(Clone, Debug)]
pub struct TriangleMesh {
    positions: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    normals: Option<Vec<[Vec3; 3]>>,
    uvs: Option<Vec<[Vec2; 3]>>,
    material: Arc<Material>,
    bbox: Option<Aabb>,
}

impl TriangleMesh {
    /// Triangulate and validate `mesh`.
    pub fn new(mesh: &PolygonMesh, material: Arc<Material>) -> MeshResult<Self> {
        let buffers = mesh.triangulate()?;

        let bbox = Aabb::enclosing(
            buffers
                .indices
                .iter()
                .flatten()
                .map(|&i| buffers.positions[i as usize]),
        )
        .map(|b| padded_bounds(b.min(), b.max()));

        log::debug!(
            "Built triangle mesh '{}': {} faces -> {} triangles",
            material.name,
            mesh.face_count(),
            buffers.indices.len()
        );

        Ok(Self {
            positions: buffers.positions,
            triangles: buffers.indices,
            normals: buffers.normals,
            uvs: buffers.uvs,
            material,
            bbox,
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub(crate) fn material_mut(&mut self) -> &mut Arc<Material> {
        &mut self.material
    }

    /// Corner positions of triangle `index`.
    pub fn triangle(&self, index: usize) -> Option<[Vec3; 3]> {
        self.triangles
            .get(index)
            .map(|tri| tri.map(|i| self.positions[i as usize]))
    }
}

impl Hittable for TriangleMesh {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let mut closest = None;
        let mut interval = ray_t;

        for index in 0..self.triangles.len() {
            let Some([a, b, c]) = self.triangle(index) else {
                continue;
            };
            if let Some(tri) = intersect_triangle(a, b, c, ray, interval) {
                interval = ray_t.with_max(tri.t);
                closest = Some((index, tri));
            }
        }

        let (index, tri) = closest?;
        let mut rec =
            HitRecord::new(ray, tri.t, tri.normal, &self.material).with_triangle_index(index);

        if let Some(normals) = &self.normals {
            let [a, b, c] = self.triangle(index)?;
            if let Some(w) = barycentric(a, b, c, tri.point) {
                let [n0, n1, n2] = normals[index];
                let smooth = (n0 * w.x + n1 * w.y + n2 * w.z).normalize_or_zero();
                if smooth != Vec3::ZERO {
                    rec.set_face_normal(ray, smooth);
                }
            }
        }

        rec.uv = self.uv_at(&rec);
        Some(rec)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.bbox
    }

    fn uv_at(&self, rec: &HitRecord) -> Vec2 {
        let Some(index) = rec.triangle_index else {
            return Vec2::ZERO;
        };
        let Some([a, b, c]) = self.triangle(index) else {
            return Vec2::ZERO;
        };
        let Some(w) = barycentric(a, b, c, rec.point) else {
            return Vec2::ZERO;
        };

        let [uv0, uv1, uv2] = match &self.uvs {
            Some(uvs) => uvs[index],
            None => [Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0)],
        };
        clamp_uv(uv0 * w.x + uv1 * w.y + uv2 * w.z)
    }

    fn occluded(&self, ray: &Ray, ray_t: Interval) -> bool {
        (0..self.triangles.len()).any(|index| {
            self.triangle(index)
                .and_then(|[a, b, c]| intersect_triangle(a, b, c, ray, ray_t))
                .is_some()
        })
    }
}
