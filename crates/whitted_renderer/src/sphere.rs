//! Sphere primitive for ray tracing.

use std::f32::consts::PI;
use std::sync::Arc;

use whitted_core::Material;
use whitted_math::{Aabb, Interval, Ray, Vec2, Vec3};

use crate::hittable::{clamp_uv, HitRecord, Hittable};

/// Directions shorter than this cannot define a ray.
const MIN_DIRECTION_LENGTH_SQUARED: f32 = 1e-12;

/// A sphere primitive.
#[derive(Clone, Debug)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub(crate) fn material_mut(&mut self) -> &mut Arc<Material> {
        &mut self.material
    }

    /// Spherical texture coordinate of a surface point.
    ///
    /// Longitude comes from the direction back to the center, measured
    /// around +Y; latitude from its height.
    fn sphere_uv(&self, point: Vec3) -> Vec2 {
        let d = (self.center - point).normalize_or_zero();
        let u = 0.5 - d.x.atan2(d.z) / (2.0 * PI);
        let v = 0.5 + d.y.clamp(-1.0, 1.0).asin() / PI;
        clamp_uv(Vec2::new(u, v))
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        if a < MIN_DIRECTION_LENGTH_SQUARED {
            return None;
        }
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.contains(root) {
            root = (h + sqrtd) / a;
            if !ray_t.contains(root) {
                return None;
            }
        }

        let point = ray.at(root);
        let outward_normal = if self.radius > 0.0 {
            (point - self.center) / self.radius
        } else {
            -ray.direction().normalize_or_zero()
        };

        let mut rec = HitRecord::new(ray, root, outward_normal, &self.material);
        rec.uv = self.uv_at(&rec);
        Some(rec)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.bbox)
    }

    fn uv_at(&self, rec: &HitRecord) -> Vec2 {
        self.sphere_uv(rec.point)
    }
}
