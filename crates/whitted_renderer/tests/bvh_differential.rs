//! BVH traversal must agree with a brute-force scan over the same shapes.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use whitted_core::{Material, PolygonMesh};
use whitted_renderer::{
    BvhNode, Color, Hittable, Interval, Quad, Ray, Shape, ShapeList, Sphere, Triangle,
    TriangleMesh, Vec3,
};

fn random_point(rng: &mut StdRng, extent: f32) -> Vec3 {
    Vec3::new(
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
    )
}

fn random_shapes(rng: &mut StdRng, count: usize) -> Vec<Shape> {
    (0..count)
        .map(|i| {
            let material = Arc::new(Material::new(format!("shape{}", i), Color::ONE));
            let center = random_point(rng, 20.0);
            match i % 4 {
                0 => Sphere::new(center, rng.gen_range(0.2..2.0), material).into(),
                1 => Triangle::new(
                    center,
                    center + random_point(rng, 2.0),
                    center + random_point(rng, 2.0),
                    material,
                )
                .into(),
                2 => Quad::from_edges(
                    center,
                    random_point(rng, 2.0),
                    random_point(rng, 2.0),
                    material,
                )
                .into(),
                _ => {
                    let mesh = PolygonMesh::poly_sphere(center, rng.gen_range(0.3..1.5), 6);
                    TriangleMesh::new(&mesh, material).unwrap().into()
                }
            }
        })
        .collect()
}

fn random_ray(rng: &mut StdRng) -> Ray {
    let origin = random_point(rng, 30.0);
    // Aim at the populated region so most rays hit something
    let target = random_point(rng, 20.0);
    Ray::primary(origin, (target - origin).normalize())
}

#[test]
fn test_bvh_matches_linear_scan() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for &count in &[1usize, 2, 3, 17, 120] {
        let shapes = random_shapes(&mut rng, count);
        let linear: ShapeList = shapes.iter().cloned().collect();
        let bvh = BvhNode::new(shapes).unwrap();

        let mut hits = 0;
        for _ in 0..500 {
            let ray = random_ray(&mut rng);
            let expected = linear.intersect(&ray);
            let actual = bvh.intersect(&ray);

            match (expected, actual) {
                (None, None) => {}
                (Some(e), Some(a)) => {
                    hits += 1;
                    assert!((e.t - a.t).abs() < 1e-4, "t {} vs {}", e.t, a.t);
                    assert!((e.point - a.point).length() < 1e-3);
                    assert_eq!(e.material.name, a.material.name);
                    assert_eq!(e.triangle_index, a.triangle_index);
                }
                (e, a) => panic!(
                    "linear hit {:?} but bvh hit {:?} for {:?}",
                    e.map(|r| r.t),
                    a.map(|r| r.t),
                    ray
                ),
            }
        }

        if count >= 17 {
            assert!(hits > 0, "no rays hit {} shapes", count);
        }
    }
}

#[test]
fn test_bvh_bounded_queries_match_linear_scan() {
    let mut rng = StdRng::seed_from_u64(7);
    let shapes = random_shapes(&mut rng, 60);
    let linear: ShapeList = shapes.iter().cloned().collect();
    let bvh = BvhNode::new(shapes).unwrap();

    for _ in 0..1000 {
        let ray = random_ray(&mut rng);
        let t_min = rng.gen_range(0.0..10.0);
        let t_max = t_min + rng.gen_range(0.0..30.0);

        let expected = linear.bounded_intersect(&ray, t_min, t_max).map(|r| r.t);
        let actual = bvh.bounded_intersect(&ray, t_min, t_max).map(|r| r.t);
        match (expected, actual) {
            (Some(e), Some(a)) => assert!((e - a).abs() < 1e-4),
            (e, a) => assert_eq!(e, a),
        }

        let interval = Interval::new(t_min, t_max);
        assert_eq!(linear.occluded(&ray, interval), bvh.occluded(&ray, interval));
    }
}

#[test]
fn test_bvh_box_bounds_every_shape() {
    let mut rng = StdRng::seed_from_u64(99);
    let shapes = random_shapes(&mut rng, 40);
    let boxes: Vec<_> = shapes.iter().map(|s| s.bounding_box().unwrap()).collect();

    let root = BvhNode::new(shapes).unwrap().bounding_box().unwrap();
    for b in &boxes {
        assert!(root.encloses(b));
    }
}
