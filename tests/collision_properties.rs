use glam::Vec3;
use proptest::prelude::*;
use skinned_mesh_collision::physics::collision_detection::collision_result_sink::CollisionResultSink;
use skinned_mesh_collision::physics::collision_detection::collision_tasks::sphere_pair_tester::SpherePairTester;
use skinned_mesh_collision::physics::collision_detection::collision_tasks::sphere_triangle_tester::{
    CheckTriangle, SphereTriangleTester,
};
use skinned_mesh_collision::{BoundingBox, CollisionResult, ResultOrientation};

fn point() -> impl Strategy<Value = Vec3> {
    (-5.0f32..5.0, -5.0f32..5.0, -5.0f32..5.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    #[test]
    fn sphere_depth_matches_center_distance(
        center_a in point(),
        center_b in point(),
        radius_a in 0.01f32..3.0,
        radius_b in 0.01f32..3.0,
    ) {
        let distance = (center_b - center_a).length();
        let bound = radius_a + radius_b;
        match SpherePairTester::test(center_a, radius_a, center_b, radius_b) {
            Some(result) => {
                prop_assert!(distance < bound);
                prop_assert!((result.depth - (distance - bound)).abs() < 1e-4);
                prop_assert!((result.normal_on_b.length() - 1.0).abs() < 1e-4);
                prop_assert!(result.normal_on_b.dot(center_b - center_a) >= 0.0);
            }
            None => prop_assert!(distance >= bound - 1e-4 || distance <= 1e-4),
        }
    }

    #[test]
    fn disjoint_bounds_never_touch(
        center_a in point(),
        center_b in point(),
        radius_a in 0.01f32..2.0,
        radius_b in 0.01f32..2.0,
        corners in (point(), point(), point()),
        margin in 0.0f32..0.5,
    ) {
        // A little slack keeps rounding at the box boundary out of the picture.
        let box_a = BoundingBox::from_sphere(center_a, radius_a + 1e-3);
        if !box_a.intersects(&BoundingBox::from_sphere(center_b, radius_b)) {
            prop_assert!(SpherePairTester::test(center_a, radius_a, center_b, radius_b).is_none());
        }
        let (p0, p1, p2) = corners;
        let triangle_box = BoundingBox::from_points(&[p0, p1, p2]).dilated(margin + 1e-3);
        if !box_a.intersects(&triangle_box) {
            let triangle = CheckTriangle::new(p0, p1, p2, margin, 0.0);
            prop_assert!(SphereTriangleTester::test(center_a, radius_a, &triangle).is_none());
        }
    }

    #[test]
    fn sphere_triangle_results_are_finite_and_unit(
        center in point(),
        radius in 0.01f32..3.0,
        corners in (point(), point(), point()),
        margin in 0.0f32..0.5,
        penetration in -0.5f32..0.5,
    ) {
        let (p0, p1, p2) = corners;
        let triangle = CheckTriangle::new(p0, p1, p2, margin, penetration);
        if let Some(result) = SphereTriangleTester::test(center, radius, &triangle) {
            prop_assert!(result.depth < 0.0);
            prop_assert!(result.depth >= -(radius + margin) - 1e-3 - triangle.penetration);
            prop_assert!((result.normal_on_b.length() - 1.0).abs() < 1e-3);
            prop_assert!(result.pos_a.is_finite() && result.pos_b.is_finite());
        }
    }

    #[test]
    fn swapped_results_mirror_direct_results(
        center in point(),
        radius in 0.01f32..3.0,
        corners in (point(), point(), point()),
        collider_a in 0u32..1000,
        collider_b in 0u32..1000,
    ) {
        let (p0, p1, p2) = corners;
        let triangle = CheckTriangle::new(p0, p1, p2, 0.1, 0.0);
        if let Some(result) = SphereTriangleTester::test(center, radius, &triangle) {
            let direct = CollisionResult { collider_a, collider_b, ..result };
            let swapped = ResultOrientation::Swapped.orient(&direct);
            prop_assert_eq!(swapped.pos_a, direct.pos_b);
            prop_assert_eq!(swapped.pos_b, direct.pos_a);
            prop_assert_eq!(swapped.normal_on_b, -direct.normal_on_b);
            prop_assert_eq!(swapped.depth.to_bits(), direct.depth.to_bits());
            prop_assert_eq!((swapped.collider_a, swapped.collider_b), (collider_b, collider_a));
        }
    }

    #[test]
    fn sink_never_exceeds_capacity(
        capacity in 1usize..300,
        per_thread in 0usize..500,
        threads in 1usize..5,
    ) {
        let mut sink = CollisionResultSink::new(capacity);
        let result = CollisionResult { depth: -1.0, ..Default::default() };
        crossbeam_utils::thread::scope(|scope| {
            for _ in 0..threads {
                scope.spawn(|_| {
                    for _ in 0..per_thread {
                        sink.add_result(&result);
                    }
                });
            }
        })
        .unwrap();
        let submitted = per_thread * threads;
        prop_assert_eq!(sink.requested_count(), submitted);
        prop_assert_eq!(sink.accepted_count(), submitted.min(capacity));
        prop_assert_eq!(sink.results().len(), submitted.min(capacity));
    }
}
