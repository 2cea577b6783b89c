use super::contact_manifold::{IContactDispatcher, ManifoldPoint};
use super::merge_buffer::MergeBuffer;
use crate::physics::bodies::IRigidBodies;
use crate::physics::body_properties::PairMaterialProperties;
use crate::physics::skinned_mesh_body::SkinnedMeshBody;

impl MergeBuffer {
    /// Turns every populated cell into one contact point on the manifold of its two bones' rigid bodies.
    ///
    /// Cells are skipped when their weight is below epsilon, when both bones are kinematic, when both bones drive the
    /// same rigid body, when either body's collision filter excludes the other bone's rigid body, and when the averaged
    /// normal is near zero or averages out to no penetration.
    ///
    /// # Arguments
    ///
    /// * `body_a` - Body on side A of the merged contacts.
    /// * `body_b` - Body on side B of the merged contacts.
    /// * `bodies` - Source of rigid body transforms and materials.
    /// * `dispatcher` - Receives the contact points.
    ///
    /// # Returns
    ///
    /// * Number of contact points emitted.
    pub fn apply<B, D>(&self, body_a: &SkinnedMeshBody, body_b: &SkinnedMeshBody, bodies: &B, dispatcher: &mut D) -> usize
    where
        B: IRigidBodies + ?Sized,
        D: IContactDispatcher + ?Sized,
    {
        let mut emitted = 0;
        for (i, bone_a) in body_a.skinned_bones().iter().enumerate() {
            if !body_b.can_collide_with(bone_a.rigid_body) {
                continue;
            }
            for (j, bone_b) in body_b.skinned_bones().iter().enumerate() {
                if !body_a.can_collide_with(bone_b.rigid_body) {
                    continue;
                }
                let cell = self.get(i, j);
                if cell.weight < f32::EPSILON
                    || (bone_a.is_kinematic && bone_b.is_kinematic)
                    || bone_a.rigid_body == bone_b.rigid_body
                {
                    continue;
                }

                let inverse_weight = 1.0 / cell.weight;
                let normal = cell.normal * inverse_weight;
                if normal.length_squared() < f32::EPSILON * f32::EPSILON {
                    continue;
                }
                let depth = -normal.length();
                if depth >= -f32::EPSILON {
                    continue;
                }
                let normal = -normal.normalize();

                let world_a = cell.pos_a * inverse_weight;
                let world_b = cell.pos_b * inverse_weight;
                let point = ManifoldPoint {
                    local_point_a: bodies.world_transform(bone_a.rigid_body).transform_by_inverse(world_a),
                    local_point_b: bodies.world_transform(bone_b.rigid_body).transform_by_inverse(world_b),
                    position_world_on_a: world_a,
                    position_world_on_b: world_b,
                    normal_world_on_b: normal,
                    distance: depth,
                    material: PairMaterialProperties::combine(
                        &bodies.material(bone_a.rigid_body),
                        &bodies.material(bone_b.rigid_body),
                    ),
                };
                dispatcher
                    .get_or_create_manifold(bone_a.rigid_body, bone_b.rigid_body)
                    .add_manifold_point(point);
                emitted += 1;
            }
        }
        emitted
    }
}

#[cfg(test)]
mod tests {
    use crate::physics::bodies::{Bodies, BodyDescription};
    use crate::physics::body_properties::{BodyMaterial, RigidPose};
    use crate::physics::collidables::collider::{BoneInfluence, Collider, VertexPos};
    use crate::physics::collidables::collider_shape::{ColliderShape, ShapeKind, ShapeProperties};
    use crate::physics::collision_detection::collision_result::CollisionResult;
    use crate::physics::collision_detection::contact_manifold::ManifoldCache;
    use crate::physics::collision_detection::merge_buffer::MergeBuffer;
    use crate::physics::handles::BodyHandle;
    use crate::physics::skinned_mesh_body::{SkinnedBone, SkinnedMeshBody, SkinnedMeshShape};
    use crate::physics::trees::collider_tree::ColliderTree;
    use glam::Vec3;

    fn body(bone: SkinnedBone) -> SkinnedMeshBody {
        let shape = ColliderShape::new(
            ShapeKind::PerVertex,
            ShapeProperties::default(),
            vec![Collider::point(0, 1.0)],
            1,
            vec![BoneInfluence::new(0, 1.0)],
            ColliderTree::single_node(1, 1, false),
        )
        .unwrap();
        SkinnedMeshBody::new(vec![VertexPos::default()], vec![bone], SkinnedMeshShape::new(shape, None).unwrap()).unwrap()
    }

    fn world() -> (Bodies, BodyHandle, BodyHandle) {
        let mut bodies = Bodies::new();
        let a = bodies.add(BodyDescription::new(
            RigidPose::from_position(Vec3::new(0.0, 1.0, 0.0)),
            BodyMaterial::new(0.5, 0.2, 0.1),
        ));
        let b = bodies.add(BodyDescription::new(
            RigidPose::from_position(Vec3::new(0.0, -1.0, 0.0)),
            BodyMaterial::new(0.4, 0.5, 0.3),
        ));
        (bodies, a, b)
    }

    fn merged(a: &SkinnedMeshBody, b: &SkinnedMeshBody) -> MergeBuffer {
        let contact = CollisionResult {
            pos_a: Vec3::new(1.0, 0.0, 0.0),
            pos_b: Vec3::new(1.0, 0.5, 0.0),
            normal_on_b: Vec3::Y,
            depth: -0.5,
            collider_a: 0,
            collider_b: 0,
        };
        let mut buffer = MergeBuffer::new();
        buffer.alloc(1, 1);
        let shape_a = a.shape().as_per_vertex_shape();
        let shape_b = b.shape().as_per_vertex_shape();
        buffer.do_merge(a, shape_a, b, shape_b, &[contact]);
        buffer
    }

    #[test]
    fn test_single_contact_round_trips_through_merge() {
        let (bodies, handle_a, handle_b) = world();
        let a = body(SkinnedBone::new(handle_a, 0.0, false));
        let b = body(SkinnedBone::new(handle_b, 0.0, false));
        let mut cache = ManifoldCache::new();
        assert_eq!(merged(&a, &b).apply(&a, &b, &bodies, &mut cache), 1);

        let manifold = cache.find(handle_a, handle_b).unwrap();
        let point = manifold.points()[0];
        assert!((point.distance + 0.5).abs() < 1e-6);
        assert!((point.normal_world_on_b - Vec3::Y).length() < 1e-6);
        assert!((point.position_world_on_a - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
        assert!((point.local_point_a - Vec3::new(1.0, -1.0, 0.0)).length() < 1e-6);
        assert!((point.local_point_b - Vec3::new(1.0, 1.5, 0.0)).length() < 1e-6);
        assert!((point.material.combined_friction - 0.2).abs() < 1e-6);
        assert!((point.material.combined_restitution - 0.1).abs() < 1e-6);
        assert!((point.material.combined_rolling_friction - 0.03).abs() < 1e-6);
    }

    #[test]
    fn test_excluded_bone_pairs_emit_nothing() {
        let (bodies, handle_a, handle_b) = world();
        let mut cache = ManifoldCache::new();

        let a = body(SkinnedBone::new(handle_a, 0.0, false));
        let same = body(SkinnedBone::new(handle_a, 0.0, false));
        assert_eq!(merged(&a, &same).apply(&a, &same, &bodies, &mut cache), 0);

        let a = body(SkinnedBone::new(handle_a, 0.0, false))
            .with_collision_filter(Vec::new(), vec![handle_b]);
        let b = body(SkinnedBone::new(handle_b, 0.0, false));
        assert_eq!(merged(&a, &b).apply(&a, &b, &bodies, &mut cache), 0);

        let a = body(SkinnedBone::new(handle_a, 0.0, false));
        let mut empty = MergeBuffer::new();
        empty.alloc(1, 1);
        assert_eq!(empty.apply(&a, &b, &bodies, &mut cache), 0);
        assert_eq!(cache.total_point_count(), 0);
    }
}
