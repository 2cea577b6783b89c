use crate::error::{CollisionError, Result};
use crate::physics::collidables::collider::VertexPos;
use crate::physics::collidables::collider_shape::{ColliderShape, ShapeKind};
use crate::physics::handles::BodyHandle;

/// Skeleton bone of a skinned body, as seen by contact merging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinnedBone {
    /// Rigid body this bone drives. Owned by the surrounding simulation world.
    pub rigid_body: BodyHandle,
    /// A collider only contributes to this bone when its skinning weight is strictly greater than this threshold.
    pub weight_threshold: f32,
    /// Whether the bone is animation driven rather than simulated.
    pub is_kinematic: bool,
}

impl SkinnedBone {
    /// Creates a bone.
    #[inline(always)]
    pub fn new(rigid_body: BodyHandle, weight_threshold: f32, is_kinematic: bool) -> Self {
        Self {
            rigid_body,
            weight_threshold,
            is_kinematic,
        }
    }
}

/// Collision geometry of a skinned body.
///
/// Every body collides through its per-vertex spheres; bodies with a triangle shape additionally collide their triangles
/// against the other body's spheres.
#[derive(Debug, Clone)]
pub struct SkinnedMeshShape {
    vertex_shape: ColliderShape,
    triangle_shape: Option<ColliderShape>,
}

impl SkinnedMeshShape {
    /// Creates the collision geometry of a body.
    pub fn new(vertex_shape: ColliderShape, triangle_shape: Option<ColliderShape>) -> Result<Self> {
        if vertex_shape.kind() != ShapeKind::PerVertex {
            return Err(CollisionError::ColliderKindMismatch {
                collider: 0,
                expected: ShapeKind::PerVertex.name(),
            });
        }
        if let Some(triangles) = &triangle_shape {
            if triangles.kind() != ShapeKind::PerTriangle {
                return Err(CollisionError::ColliderKindMismatch {
                    collider: 0,
                    expected: ShapeKind::PerTriangle.name(),
                });
            }
        }
        Ok(Self {
            vertex_shape,
            triangle_shape,
        })
    }

    /// Gets the per-vertex sphere shape.
    #[inline(always)]
    pub fn as_per_vertex_shape(&self) -> &ColliderShape {
        &self.vertex_shape
    }

    /// Gets the triangle shape, if the body has one.
    #[inline(always)]
    pub fn as_per_triangle_shape(&self) -> Option<&ColliderShape> {
        self.triangle_shape.as_ref()
    }

    fn shapes(&self) -> impl Iterator<Item = &ColliderShape> {
        std::iter::once(&self.vertex_shape).chain(self.triangle_shape.as_ref())
    }

    fn shapes_mut(&mut self) -> impl Iterator<Item = &mut ColliderShape> {
        std::iter::once(&mut self.vertex_shape).chain(self.triangle_shape.as_mut())
    }
}

/// Skinned soft body: deforming vertices, the bones they are skinned to, and the collision geometry over them.
#[derive(Debug, Clone)]
pub struct SkinnedMeshBody {
    vertices: Vec<VertexPos>,
    skinned_bones: Vec<SkinnedBone>,
    shape: SkinnedMeshShape,
    can_collide_with_bones: Vec<BodyHandle>,
    no_collide_with_bones: Vec<BodyHandle>,
}

impl SkinnedMeshBody {
    /// Creates a body and computes the initial collider bounds from `vertices`.
    pub fn new(
        vertices: Vec<VertexPos>,
        skinned_bones: Vec<SkinnedBone>,
        shape: SkinnedMeshShape,
    ) -> Result<Self> {
        for collider_shape in shape.shapes() {
            collider_shape.validate_against(vertices.len(), skinned_bones.len())?;
        }
        let mut body = Self {
            vertices,
            skinned_bones,
            shape,
            can_collide_with_bones: Vec::new(),
            no_collide_with_bones: Vec::new(),
        };
        body.update_bounds();
        Ok(body)
    }

    /// Restricts which rigid bodies this body's contacts may be emitted against.
    ///
    /// # Arguments
    ///
    /// * `can_collide_with` - When non-empty, only bones driving one of these bodies are collided with.
    /// * `no_collide_with` - Bones driving one of these bodies are never collided with.
    pub fn with_collision_filter(
        mut self,
        can_collide_with: Vec<BodyHandle>,
        no_collide_with: Vec<BodyHandle>,
    ) -> Self {
        self.can_collide_with_bones = can_collide_with;
        self.no_collide_with_bones = no_collide_with;
        self
    }

    /// Gets whether contacts may be emitted against a bone driving `rigid_body`.
    #[inline]
    pub fn can_collide_with(&self, rigid_body: BodyHandle) -> bool {
        if !self.can_collide_with_bones.is_empty()
            && !self.can_collide_with_bones.contains(&rigid_body)
        {
            return false;
        }
        !self.no_collide_with_bones.contains(&rigid_body)
    }

    /// Gets the current vertex positions.
    #[inline(always)]
    pub fn vertices(&self) -> &[VertexPos] {
        &self.vertices
    }

    /// Gets the bones of the body.
    #[inline(always)]
    pub fn skinned_bones(&self) -> &[SkinnedBone] {
        &self.skinned_bones
    }

    /// Gets the collision geometry of the body.
    #[inline(always)]
    pub fn shape(&self) -> &SkinnedMeshShape {
        &self.shape
    }

    /// Replaces the vertex positions with this frame's skinned positions and refreshes all collider bounds.
    pub fn update_vertices(&mut self, vertices: &[VertexPos]) -> Result<()> {
        if vertices.len() != self.vertices.len() {
            return Err(CollisionError::VertexCountMismatch {
                expected: self.vertices.len(),
                found: vertices.len(),
            });
        }
        self.vertices.copy_from_slice(vertices);
        self.update_bounds();
        Ok(())
    }

    /// Recomputes every collider's bounds from the current vertex positions.
    pub fn update_bounds(&mut self) {
        let vertices = &self.vertices;
        for collider_shape in self.shape.shapes_mut() {
            collider_shape.update_bounds(vertices);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collidables::collider::{BoneInfluence, Collider};
    use crate::physics::collidables::collider_shape::ShapeProperties;
    use crate::physics::trees::collider_tree::ColliderTree;
    use glam::Vec3;

    fn point_shape(count: u32) -> ColliderShape {
        ColliderShape::new(
            ShapeKind::PerVertex,
            ShapeProperties::default(),
            (0..count).map(|vertex| Collider::point(vertex, 1.0)).collect(),
            1,
            vec![BoneInfluence::new(0, 1.0); count as usize],
            ColliderTree::single_node(count as usize, count as usize, false),
        )
        .unwrap()
    }

    #[test]
    fn test_collision_filter() {
        let shape = SkinnedMeshShape::new(point_shape(1), None).unwrap();
        let body = SkinnedMeshBody::new(
            vec![VertexPos::default()],
            vec![SkinnedBone::new(BodyHandle(0), 0.0, false)],
            shape,
        )
        .unwrap();
        assert!(body.can_collide_with(BodyHandle(7)));

        let body = body.with_collision_filter(vec![BodyHandle(1), BodyHandle(2)], vec![BodyHandle(2)]);
        assert!(body.can_collide_with(BodyHandle(1)));
        assert!(!body.can_collide_with(BodyHandle(2)));
        assert!(!body.can_collide_with(BodyHandle(3)));
    }

    #[test]
    fn test_rejects_shape_referencing_missing_vertices() {
        let shape = SkinnedMeshShape::new(point_shape(3), None).unwrap();
        let result = SkinnedMeshBody::new(
            vec![VertexPos::default(); 2],
            vec![SkinnedBone::new(BodyHandle(0), 0.0, false)],
            shape,
        );
        assert!(matches!(
            result,
            Err(CollisionError::VertexOutOfRange { vertex: 2, .. })
        ));
    }

    #[test]
    fn test_update_vertices_refreshes_bounds() {
        let shape = SkinnedMeshShape::new(point_shape(1), None).unwrap();
        let mut body = SkinnedMeshBody::new(
            vec![VertexPos::default()],
            vec![SkinnedBone::new(BodyHandle(0), 0.0, false)],
            shape,
        )
        .unwrap();
        body.update_vertices(&[VertexPos::new(Vec3::new(5.0, 0.0, 0.0), 1.0)])
            .unwrap();
        let aabb = body.shape().as_per_vertex_shape().aabbs()[0];
        assert_eq!(aabb.min, Vec3::new(4.0, -1.0, -1.0));
        assert!(matches!(
            body.update_vertices(&[]),
            Err(CollisionError::VertexCountMismatch { expected: 1, found: 0 })
        ));
    }
}
