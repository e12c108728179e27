//! Closed set of renderable shapes.

use std::sync::Arc;

use whitted_core::Material;
use whitted_math::{Aabb, Interval, Ray, Vec2};

use crate::bvh::BvhNode;
use crate::hittable::{HitRecord, Hittable};
use crate::mesh::TriangleMesh;
use crate::quad::Quad;
use crate::sphere::Sphere;
use crate::triangle::Triangle;

/// Any shape the tracer can intersect, including BVH subtrees.
#[derive(Clone, Debug)]
pub enum Shape {
    Sphere(Sphere),
    Triangle(Triangle),
    Quad(Quad),
    Mesh(TriangleMesh),
    Bvh(BvhNode),
}

impl Shape {
    /// Call `f` on every material reachable from this shape.
    pub fn visit_materials<'a>(&'a self, f: &mut impl FnMut(&'a Material)) {
        match self {
            Shape::Sphere(s) => f(s.material()),
            Shape::Triangle(t) => f(t.material()),
            Shape::Quad(q) => f(q.material()),
            Shape::Mesh(m) => f(m.material()),
            Shape::Bvh(BvhNode::Leaf { shape, .. }) => shape.visit_materials(f),
            Shape::Bvh(BvhNode::Branch { left, right, .. }) => {
                left.visit_materials(f);
                right.visit_materials(f);
            }
        }
    }

    /// Call `f` on every material handle owned by this shape, stopping at
    /// the first error.
    pub fn try_for_each_material_mut<E>(
        &mut self,
        f: &mut impl FnMut(&mut Arc<Material>) -> Result<(), E>,
    ) -> Result<(), E> {
        match self {
            Shape::Sphere(s) => f(s.material_mut()),
            Shape::Triangle(t) => f(t.material_mut()),
            Shape::Quad(q) => f(q.material_mut()),
            Shape::Mesh(m) => f(m.material_mut()),
            Shape::Bvh(BvhNode::Leaf { shape, .. }) => shape.try_for_each_material_mut(f),
            Shape::Bvh(BvhNode::Branch { left, right, .. }) => {
                left.try_for_each_material_mut(f)?;
                right.try_for_each_material_mut(f)
            }
        }
    }
}

macro_rules! dispatch {
    ($self:expr, $shape:ident => $body:expr) => {
        match $self {
            Shape::Sphere($shape) => $body,
            Shape::Triangle($shape) => $body,
            Shape::Quad($shape) => $body,
            Shape::Mesh($shape) => $body,
            Shape::Bvh($shape) => $body,
        }
    };
}

impl Hittable for Shape {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        dispatch!(self, s => s.hit(ray, ray_t))
    }

    fn bounding_box(&self) -> Option<Aabb> {
        dispatch!(self, s => s.bounding_box())
    }

    fn uv_at(&self, rec: &HitRecord) -> Vec2 {
        dispatch!(self, s => s.uv_at(rec))
    }

    fn occluded(&self, ray: &Ray, ray_t: Interval) -> bool {
        dispatch!(self, s => s.occluded(ray, ray_t))
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<Triangle> for Shape {
    fn from(triangle: Triangle) -> Self {
        Shape::Triangle(triangle)
    }
}

impl From<Quad> for Shape {
    fn from(quad: Quad) -> Self {
        Shape::Quad(quad)
    }
}

impl From<TriangleMesh> for Shape {
    fn from(mesh: TriangleMesh) -> Self {
        Shape::Mesh(mesh)
    }
}

impl From<BvhNode> for Shape {
    fn from(node: BvhNode) -> Self {
        Shape::Bvh(node)
    }
}
