//! Hittable trait and HitRecord for ray-object intersection.

use whitted_core::Material;
use whitted_math::{Aabb, Interval, Ray, Vec2, Vec3};

use crate::shape::Shape;

/// Record of a ray-object intersection.
#[derive(Clone, Debug)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub point: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Shading normal, always pointing against the ray
    pub normal: Vec3,
    /// Outward geometric normal as given by the primitive's winding
    pub geometric_normal: Vec3,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Material at the intersection point
    pub material: &'a Material,
    /// Texture coordinate in `[0, 1]²`
    pub uv: Vec2,
    /// Sub-triangle of a quad, or triangle index within a mesh
    pub triangle_index: Option<usize>,
}

impl<'a> HitRecord<'a> {
    /// Build a record at parameter `t` with the normal oriented against
    /// the ray. UV and triangle index are filled in by the primitive.
    pub fn new(ray: &Ray, t: f32, outward_normal: Vec3, material: &'a Material) -> Self {
        let mut rec = Self {
            point: ray.at(t),
            t,
            normal: outward_normal,
            geometric_normal: outward_normal,
            front_face: true,
            material,
            uv: Vec2::ZERO,
            triangle_index: None,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the shading normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }

    pub fn with_triangle_index(mut self, index: usize) -> Self {
        self.triangle_index = Some(index);
        self
    }
}

/// Clamp a texture coordinate into the unit square.
#[inline]
pub fn clamp_uv(uv: Vec2) -> Vec2 {
    uv.clamp(Vec2::ZERO, Vec2::ONE)
}

/// Trait for objects that can be hit by rays.
///
/// `hit` is the single intersection routine each primitive implements;
/// `intersect` and `bounded_intersect` are views of it.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `t` inside `ray_t`, fully populated.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>>;

    /// Axis-aligned bounds, `None` if the object has no extent.
    fn bounding_box(&self) -> Option<Aabb>;

    /// Texture coordinate for a hit produced by this object.
    fn uv_at(&self, rec: &HitRecord) -> Vec2 {
        clamp_uv(rec.uv)
    }

    /// Nearest intersection at or ahead of the ray origin.
    fn intersect<'a>(&'a self, ray: &Ray) -> Option<HitRecord<'a>> {
        self.hit(ray, Interval::FORWARD)
    }

    /// Nearest intersection with `t` in `[t_min, t_max]`.
    fn bounded_intersect<'a>(&'a self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord<'a>> {
        self.hit(ray, Interval::new(t_min, t_max))
    }

    /// True if anything blocks the ray within `ray_t`. Implementations may
    /// stop at the first blocker.
    fn occluded(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.hit(ray, ray_t).is_some()
    }
}

/// A flat list of shapes searched linearly.
#[derive(Default)]
pub struct ShapeList {
    shapes: Vec<Shape>,
    bbox: Option<Aabb>,
}

impl ShapeList {
    /// Create a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape to the list.
    pub fn add(&mut self, shape: impl Into<Shape>) {
        let shape = shape.into();
        if let Some(b) = shape.bounding_box() {
            self.bbox = Some(match self.bbox {
                Some(acc) => Aabb::surrounding(&acc, &b),
                None => b,
            });
        }
        self.shapes.push(shape);
    }

    /// Remove all shapes.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.bbox = None;
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    pub fn into_shapes(self) -> Vec<Shape> {
        self.shapes
    }
}

impl FromIterator<Shape> for ShapeList {
    fn from_iter<I: IntoIterator<Item = Shape>>(iter: I) -> Self {
        let mut list = ShapeList::new();
        for shape in iter {
            list.add(shape);
        }
        list
    }
}

impl Hittable for ShapeList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;

        for shape in &self.shapes {
            let interval = closest.as_ref().map_or(ray_t, |rec| ray_t.with_max(rec.t));
            if let Some(rec) = shape.hit(ray, interval) {
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.bbox
    }

    fn occluded(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.shapes.iter().any(|shape| shape.occluded(ray, ray_t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sphere;
    use std::sync::Arc;
    use whitted_math::Color;

    fn sphere_at(z: f32) -> Sphere {
        Sphere::new(
            Vec3::new(0.0, 0.0, z),
            0.5,
            Arc::new(Material::new("grey", Color::splat(0.5))),
        )
    }

    #[test]
    fn test_face_normal_orientation() {
        let mat = Material::default();
        let ray = Ray::primary(Vec3::ZERO, Vec3::NEG_Z);

        let front = HitRecord::new(&ray, 1.0, Vec3::Z, &mat);
        assert!(front.front_face);
        assert_eq!(front.normal, Vec3::Z);

        let back = HitRecord::new(&ray, 1.0, Vec3::NEG_Z, &mat);
        assert!(!back.front_face);
        assert_eq!(back.normal, Vec3::Z);
        assert_eq!(back.geometric_normal, Vec3::NEG_Z);
    }

    #[test]
    fn test_list_returns_nearest() {
        let mut list = ShapeList::new();
        list.add(sphere_at(-10.0));
        list.add(sphere_at(-3.0));
        list.add(sphere_at(-6.0));

        let ray = Ray::primary(Vec3::ZERO, Vec3::NEG_Z);
        let rec = list.intersect(&ray).unwrap();
        assert!((rec.t - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_list_bounded_and_occluded() {
        let list: ShapeList = [sphere_at(-3.0)].into_iter().map(Shape::from).collect();
        let ray = Ray::shadow(Vec3::ZERO, Vec3::NEG_Z);

        assert!(list.bounded_intersect(&ray, 0.0, 2.0).is_none());
        assert!(!list.occluded(&ray, Interval::new(0.0, 2.0)));
        assert!(list.occluded(&ray, Interval::new(0.0, 10.0)));
    }

    #[test]
    fn test_empty_list() {
        let list = ShapeList::new();
        assert!(list.is_empty());
        assert!(list.bounding_box().is_none());
        assert!(list.intersect(&Ray::default()).is_none());
    }
}
