use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use skinned_mesh_collision::{
    AlgorithmSettings, Bodies, BodyDescription, BodyHandle, BodyMaterial, BoneInfluence, Collider, ColliderNode,
    ColliderShape, ColliderTree, ManifoldCache, RigidPose, ShapeKind, ShapeProperties, SkinnedBone, SkinnedMeshAlgorithm,
    SkinnedMeshBody, SkinnedMeshShape, ThreadDispatcher, VertexPos,
};

/// Square cloth patch in the XZ plane with one bone and one tree leaf per row.
fn cloth_patch(origin: Vec3, side: usize, bones: &[BodyHandle], with_triangles: bool) -> SkinnedMeshBody {
    let row_bone = |z: usize| (z % bones.len()) as u32;
    let vertices: Vec<VertexPos> = (0..side * side)
        .map(|v| VertexPos::new(origin + Vec3::new((v % side) as f32, 0.0, (v / side) as f32), 1.0))
        .collect();

    let points = ColliderShape::new(
        ShapeKind::PerVertex,
        ShapeProperties::new(0.4, 0.0),
        (0..(side * side) as u32).map(|v| Collider::point(v, 1.0)).collect(),
        1,
        (0..side * side).map(|v| BoneInfluence::new(row_bone(v / side), 1.0)).collect(),
        ColliderTree::from_leaves((0..side).map(|z| ColliderNode::leaf(z * side, side, side, false))),
    )
    .unwrap();

    let triangles = with_triangles.then(|| {
        let cells = side - 1;
        let s = side as u32;
        let mut colliders = Vec::new();
        let mut influences = Vec::new();
        for z in 0..cells {
            for x in 0..cells {
                let i = (z * side + x) as u32;
                colliders.push(Collider::triangle([i, i + s, i + 1], 1.0));
                colliders.push(Collider::triangle([i + 1, i + s, i + s + 1], 1.0));
                influences.extend([BoneInfluence::new(row_bone(z), 1.0); 2]);
            }
        }
        ColliderShape::new(
            ShapeKind::PerTriangle,
            ShapeProperties::new(0.4, 0.0),
            colliders,
            1,
            influences,
            ColliderTree::from_leaves((0..cells).map(|z| ColliderNode::leaf(z * cells * 2, cells * 2, cells * 2, false))),
        )
        .unwrap()
    });

    SkinnedMeshBody::new(
        vertices,
        bones.iter().map(|&b| SkinnedBone::new(b, 0.0, false)).collect(),
        SkinnedMeshShape::new(points, triangles).unwrap(),
    )
    .unwrap()
}

fn setup(side: usize) -> (Bodies, SkinnedMeshBody, SkinnedMeshBody) {
    let mut bodies = Bodies::new();
    let handles: Vec<BodyHandle> = (0..8)
        .map(|_| bodies.add(BodyDescription::new(RigidPose::IDENTITY, BodyMaterial::default())))
        .collect();
    let a = cloth_patch(Vec3::ZERO, side, &handles[..4], true);
    let b = cloth_patch(Vec3::new(0.25, 0.3, 0.25), side, &handles[4..], true);
    (bodies, a, b)
}

fn bench_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("cloth_pair_sequential");
    for side in [8usize, 16, 32].iter() {
        let (bodies, a, b) = setup(*side);
        let mut algorithm =
            SkinnedMeshAlgorithm::with_dispatcher(AlgorithmSettings::default(), ThreadDispatcher::new(1)).unwrap();
        let mut cache = ManifoldCache::new();
        group.bench_with_input(BenchmarkId::from_parameter(side), side, |bench, _| {
            bench.iter(|| {
                cache.clear_points();
                black_box(algorithm.process_collision(&a, &b, &bodies, &mut cache))
            })
        });
    }
    group.finish();
}

fn bench_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("cloth_pair_parallel");
    for side in [8usize, 16, 32].iter() {
        let (bodies, a, b) = setup(*side);
        let settings = AlgorithmSettings {
            parallel_threshold: Some(1),
            ..AlgorithmSettings::default()
        };
        let mut algorithm =
            SkinnedMeshAlgorithm::with_dispatcher(settings, ThreadDispatcher::with_available_parallelism()).unwrap();
        let mut cache = ManifoldCache::new();
        group.bench_with_input(BenchmarkId::from_parameter(side), side, |bench, _| {
            bench.iter(|| {
                cache.clear_points();
                black_box(algorithm.process_collision(&a, &b, &bodies, &mut cache))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sequential, bench_parallel);
criterion_main!(benches);
