#![allow(dead_code)]

use glam::Vec3;
use skinned_mesh_collision::{
    Bodies, BodyDescription, BodyHandle, BodyMaterial, BoneInfluence, Collider, ColliderNode, ColliderShape,
    ColliderTree, ManifoldCache, ManifoldPoint, RigidPose, ShapeKind, ShapeProperties, SkinnedBone, SkinnedMeshBody,
    SkinnedMeshShape, VertexPos,
};

/// Parameters of a square cloth patch in the XZ plane.
pub struct GridSpec {
    pub origin: Vec3,
    pub side: usize,
    pub spacing: f32,
    pub margin: f32,
    pub with_triangles: bool,
}

impl GridSpec {
    pub fn new(origin: Vec3, side: usize) -> Self {
        Self {
            origin,
            side,
            spacing: 1.0,
            margin: 0.4,
            with_triangles: false,
        }
    }
}

/// Builds a cloth patch. Row `z` of vertices is skinned to bone `row_bone(z)`, and every row gets its own tree leaf.
pub fn grid_body(spec: &GridSpec, bones: Vec<SkinnedBone>, row_bone: impl Fn(usize) -> u32) -> SkinnedMeshBody {
    let side = spec.side;
    let mut vertices = Vec::with_capacity(side * side);
    for z in 0..side {
        for x in 0..side {
            vertices.push(VertexPos::new(
                spec.origin + Vec3::new(x as f32, 0.0, z as f32) * spec.spacing,
                1.0,
            ));
        }
    }

    let points = ColliderShape::new(
        ShapeKind::PerVertex,
        ShapeProperties::new(spec.margin, 0.0),
        (0..(side * side) as u32).map(|v| Collider::point(v, 1.0)).collect(),
        1,
        (0..side * side)
            .map(|v| BoneInfluence::new(row_bone(v / side), 1.0))
            .collect(),
        ColliderTree::from_leaves((0..side).map(|z| ColliderNode::leaf(z * side, side, side, false))),
    )
    .unwrap();

    let triangles = spec.with_triangles.then(|| {
        let cells = side - 1;
        let mut colliders = Vec::new();
        let mut influences = Vec::new();
        for z in 0..cells {
            for x in 0..cells {
                let i = (z * side + x) as u32;
                let s = side as u32;
                colliders.push(Collider::triangle([i, i + s, i + 1], 1.0));
                colliders.push(Collider::triangle([i + 1, i + s, i + s + 1], 1.0));
                influences.push(BoneInfluence::new(row_bone(z), 1.0));
                influences.push(BoneInfluence::new(row_bone(z), 1.0));
            }
        }
        ColliderShape::new(
            ShapeKind::PerTriangle,
            ShapeProperties::new(spec.margin, 0.0),
            colliders,
            1,
            influences,
            ColliderTree::from_leaves(
                (0..cells).map(|z| ColliderNode::leaf(z * cells * 2, cells * 2, cells * 2, false)),
            ),
        )
        .unwrap()
    });

    SkinnedMeshBody::new(vertices, bones, SkinnedMeshShape::new(points, triangles).unwrap()).unwrap()
}

/// A body made of a single vertex sphere skinned to one bone.
pub fn sphere_body(center: Vec3, radius: f32, bone: SkinnedBone) -> SkinnedMeshBody {
    let points = ColliderShape::new(
        ShapeKind::PerVertex,
        ShapeProperties::new(radius, 0.0),
        vec![Collider::point(0, 1.0)],
        1,
        vec![BoneInfluence::new(0, 1.0)],
        ColliderTree::single_node(1, 1, false),
    )
    .unwrap();
    SkinnedMeshBody::new(
        vec![VertexPos::new(center, 1.0)],
        vec![bone],
        SkinnedMeshShape::new(points, None).unwrap(),
    )
    .unwrap()
}

/// A body made of a single triangle, with corner spheres that are too small to reach anything.
pub fn triangle_body(corners: [Vec3; 3], margin: f32, bone: SkinnedBone) -> SkinnedMeshBody {
    let points = ColliderShape::new(
        ShapeKind::PerVertex,
        ShapeProperties::new(0.01, 0.0),
        (0..3).map(|v| Collider::point(v, 1.0)).collect(),
        1,
        vec![BoneInfluence::new(0, 1.0); 3],
        ColliderTree::single_node(3, 3, false),
    )
    .unwrap();
    let triangles = ColliderShape::new(
        ShapeKind::PerTriangle,
        ShapeProperties::new(margin, 0.0),
        vec![Collider::triangle([0, 1, 2], 1.0)],
        1,
        vec![BoneInfluence::new(0, 1.0)],
        ColliderTree::single_node(1, 1, false),
    )
    .unwrap();
    SkinnedMeshBody::new(
        corners.iter().map(|&c| VertexPos::new(c, 1.0)).collect(),
        vec![bone],
        SkinnedMeshShape::new(points, Some(triangles)).unwrap(),
    )
    .unwrap()
}

/// A rigid body set holding `count` bodies at the origin.
pub fn bodies(count: usize) -> (Bodies, Vec<BodyHandle>) {
    let mut bodies = Bodies::new();
    let handles = (0..count)
        .map(|_| bodies.add(BodyDescription::new(RigidPose::IDENTITY, BodyMaterial::default())))
        .collect();
    (bodies, handles)
}

/// Every point in the cache, ordered by body pair and then by position.
pub fn sorted_points(cache: &ManifoldCache) -> Vec<(BodyHandle, BodyHandle, ManifoldPoint)> {
    let mut points: Vec<_> = cache
        .manifolds()
        .flat_map(|m| m.points().iter().map(move |p| (m.body_a, m.body_b, *p)))
        .collect();
    points.sort_by(|a, b| {
        (a.0, a.1)
            .cmp(&(b.0, b.1))
            .then(a.2.position_world_on_a.x.total_cmp(&b.2.position_world_on_a.x))
            .then(a.2.position_world_on_a.z.total_cmp(&b.2.position_world_on_a.z))
    });
    points
}

pub fn assert_points_close(a: &[(BodyHandle, BodyHandle, ManifoldPoint)], b: &[(BodyHandle, BodyHandle, ManifoldPoint)]) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b) {
        assert_eq!((x.0, x.1), (y.0, y.1));
        assert!((x.2.distance - y.2.distance).abs() < 1e-4);
        assert!((x.2.normal_world_on_b - y.2.normal_world_on_b).length() < 1e-4);
        assert!((x.2.position_world_on_a - y.2.position_world_on_a).length() < 1e-4);
        assert!((x.2.position_world_on_b - y.2.position_world_on_b).length() < 1e-4);
    }
}
