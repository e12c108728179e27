//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over shapes. Each branch owns two children that are
//! either primitive shapes or further BVH nodes, and its box is exactly
//! the union of the children's boxes.

use whitted_math::{Aabb, Interval, Ray};

use crate::error::BvhError;
use crate::hittable::{HitRecord, Hittable};
use crate::shape::Shape;

/// BVH node.
///
/// Using an enum keeps traversal free of dynamic dispatch; both
/// variants are also a `Shape`, so the tree composes with shape lists.
#[derive(Clone, Debug)]
pub enum BvhNode {
    /// A single shape. Only produced for a one-shape input, where both
    /// children would alias the same shape.
    Leaf { shape: Box<Shape>, bbox: Aabb },
    /// Internal node with two children.
    Branch {
        left: Box<Shape>,
        right: Box<Shape>,
        bbox: Aabb,
    },
}

impl BvhNode {
    /// Create a BVH from a list of shapes.
    ///
    /// Fails without building anything if the list is empty or any shape
    /// cannot report a bounding box.
    pub fn new(shapes: Vec<Shape>) -> Result<Self, BvhError> {
        if shapes.is_empty() {
            return Err(BvhError::Empty);
        }

        let items = shapes
            .into_iter()
            .enumerate()
            .map(|(index, shape)| match shape.bounding_box() {
                Some(bbox) => Ok((bbox, shape)),
                None => Err(BvhError::MissingBoundingBox { index }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let count = items.len();
        let node = Self::build(items);
        log::debug!(
            "Built BVH over {} shapes: {} nodes, depth {}",
            count,
            node.node_count(),
            node.depth()
        );
        Ok(node)
    }

    /// Recursive BVH construction.
    ///
    /// Median split: sort by bounding-box minimum along the longest axis of
    /// the range's bounds, split in half, recurse.
    fn build(mut items: Vec<(Aabb, Shape)>) -> Self {
        if items.len() == 1 {
            let (bbox, shape) = items.remove(0);
            return BvhNode::Leaf {
                shape: Box::new(shape),
                bbox,
            };
        }

        let bounds = items
            .iter()
            .skip(1)
            .fold(items[0].0, |acc, (b, _)| Aabb::surrounding(&acc, b));
        let axis = bounds.longest_axis();

        items.sort_by(|(a, _), (b, _)| {
            a.axis_interval(axis)
                .min
                .total_cmp(&b.axis_interval(axis).min)
        });

        // Split at midpoint
        let mid = items.len() / 2;
        let right_items = items.split_off(mid);

        let (left_box, left) = Self::subtree(items);
        let (right_box, right) = Self::subtree(right_items);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox: Aabb::surrounding(&left_box, &right_box),
        }
    }

    /// A lone shape becomes a direct child; anything more gets its own node.
    fn subtree(mut items: Vec<(Aabb, Shape)>) -> (Aabb, Shape) {
        if items.len() == 1 {
            return items.remove(0);
        }
        let node = Self::build(items);
        (node.bbox(), Shape::Bvh(node))
    }

    pub fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } | BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    /// Number of BVH nodes in this subtree.
    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => {
                1 + child_node_count(left) + child_node_count(right)
            }
        }
    }

    /// Longest path from this node to a primitive, counting nodes.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + child_depth(left).max(child_depth(right)),
        }
    }
}

fn child_node_count(shape: &Shape) -> usize {
    match shape {
        Shape::Bvh(node) => node.node_count(),
        _ => 0,
    }
}

fn child_depth(shape: &Shape) -> usize {
    match shape {
        Shape::Bvh(node) => node.depth(),
        _ => 0,
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        match self {
            BvhNode::Leaf { shape, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }
                shape.hit(ray, ray_t)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t);

                // Only check right up to closest hit
                let right_t = hit_left.as_ref().map_or(ray_t, |rec| ray_t.with_max(rec.t));
                let hit_right = right.hit(ray, right_t);

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.bbox())
    }

    fn occluded(&self, ray: &Ray, ray_t: Interval) -> bool {
        match self {
            BvhNode::Leaf { shape, bbox } => bbox.hit(ray, ray_t) && shape.occluded(ray, ray_t),
            BvhNode::Branch { left, right, bbox } => {
                bbox.hit(ray, ray_t)
                    && (left.occluded(ray, ray_t) || right.occluded(ray, ray_t))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Sphere, TriangleMesh};
    use std::sync::Arc;
    use whitted_core::{Material, PolygonMesh};
    use whitted_math::{Color, Vec3};

    fn sphere(center: Vec3) -> Shape {
        let material = Arc::new(Material::new("grey", Color::new(0.5, 0.5, 0.5)));
        Sphere::new(center, 0.5, material).into()
    }

    /// Every branch box must equal the union of its children's boxes.
    fn assert_tight(node: &BvhNode) {
        if let BvhNode::Branch { left, right, bbox } = node {
            let union = Aabb::surrounding(
                &left.bounding_box().unwrap(),
                &right.bounding_box().unwrap(),
            );
            assert_eq!(*bbox, union);
            for child in [left, right] {
                if let Shape::Bvh(inner) = child.as_ref() {
                    assert_tight(inner);
                }
            }
        }
    }

    #[test]
    fn test_bvh_empty() {
        assert_eq!(BvhNode::new(vec![]).unwrap_err(), BvhError::Empty);
    }

    #[test]
    fn test_bvh_missing_bounding_box() {
        let empty_mesh = TriangleMesh::new(&PolygonMesh::default(), Arc::new(Material::default()))
            .unwrap();
        let shapes = vec![sphere(Vec3::ZERO), empty_mesh.into()];

        assert_eq!(
            BvhNode::new(shapes).unwrap_err(),
            BvhError::MissingBoundingBox { index: 1 }
        );
    }

    #[test]
    fn test_bvh_single_sphere() {
        let bvh = BvhNode::new(vec![sphere(Vec3::new(0.0, 0.0, -1.0))]).unwrap();

        // Should create a leaf
        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let ray = Ray::primary(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(bvh.intersect(&ray).is_some());
    }

    #[test]
    fn test_bvh_two_spheres_are_ordered() {
        let far = sphere(Vec3::new(3.0, 0.0, 0.0));
        let near = sphere(Vec3::new(-3.0, 0.0, 0.0));
        let bvh = BvhNode::new(vec![far, near]).unwrap();

        let BvhNode::Branch { left, right, .. } = &bvh else {
            panic!("two shapes should form a branch");
        };
        let left_x = left.bounding_box().unwrap().x.min;
        let right_x = right.bounding_box().unwrap().x.min;
        assert!(left_x < right_x);
        assert_eq!(bvh.node_count(), 1);
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let spheres: Vec<Shape> = (0..10)
            .map(|i| sphere(Vec3::new(i as f32, 0.0, -5.0)))
            .collect();
        let bvh = BvhNode::new(spheres).unwrap();
        assert_tight(&bvh);
        assert!(bvh.depth() <= 5);

        // Test ray that hits sphere at x=5
        let ray = Ray::primary(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = bvh.intersect(&ray).unwrap();

        // Hit point should be near z = -4.5 (sphere at z=-5, radius 0.5)
        assert!((rec.point.z - (-4.5)).abs() < 0.01);
        assert!((rec.point.x - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_bvh_occluded() {
        let spheres: Vec<Shape> = (0..6)
            .map(|i| sphere(Vec3::new(0.0, 0.0, -2.0 * (i + 1) as f32)))
            .collect();
        let bvh = BvhNode::new(spheres).unwrap();

        let ray = Ray::shadow(Vec3::ZERO, Vec3::NEG_Z);
        assert!(bvh.occluded(&ray, Interval::new(0.0, 100.0)));
        assert!(!bvh.occluded(&ray, Interval::new(0.0, 1.0)));

        let aside = Ray::shadow(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_Z);
        assert!(!bvh.occluded(&aside, Interval::FORWARD));
    }
}
