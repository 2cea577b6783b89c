use super::collider::{BoneInfluence, Collider, ColliderKind, VertexPos};
use crate::error::{CollisionError, Result};
use crate::physics::trees::collider_tree::ColliderTree;
use crate::utilities::bounding_box::BoundingBox;

/// Kind of primitive a collider shape is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// One sphere per vertex.
    PerVertex,
    /// One triangle per mesh face.
    PerTriangle,
}

impl ShapeKind {
    /// Gets a human readable name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::PerVertex => "point",
            ShapeKind::PerTriangle => "triangle",
        }
    }

    #[inline(always)]
    fn accepts(&self, kind: &ColliderKind) -> bool {
        matches!(
            (self, kind),
            (ShapeKind::PerVertex, ColliderKind::Point { .. })
                | (ShapeKind::PerTriangle, ColliderKind::Triangle { .. })
        )
    }
}

/// Collision properties shared by every collider of a shape.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeProperties {
    /// Base collision margin. Each primitive scales it by its vertices' margin multipliers.
    pub margin: f32,
    /// Base penetration allowance of triangles. Scaled like the margin. Zero makes triangles two-sided; a positive
    /// value makes them one-sided with that much thickness behind the face, a negative value flips the front face.
    pub penetration: f32,
}

impl Default for ShapeProperties {
    fn default() -> Self {
        Self {
            margin: 1.0,
            penetration: 0.0,
        }
    }
}

impl ShapeProperties {
    /// Creates shape properties.
    #[inline(always)]
    pub fn new(margin: f32, penetration: f32) -> Self {
        Self {
            margin,
            penetration,
        }
    }
}

/// Per-body collider buffer: primitive colliders, their bounding boxes (paired index for index), the bone influences
/// of every collider, and the collider tree grouping them.
#[derive(Debug, Clone)]
pub struct ColliderShape {
    kind: ShapeKind,
    properties: ShapeProperties,
    colliders: Vec<Collider>,
    aabbs: Vec<BoundingBox>,
    bones_per_collider: usize,
    bone_influences: Vec<BoneInfluence>,
    tree: ColliderTree,
}

impl ColliderShape {
    /// Creates a collider shape. Bounding boxes start empty until [`ColliderShape::update_bounds`] or
    /// [`ColliderShape::set_bounds`] runs.
    ///
    /// # Arguments
    ///
    /// * `kind` - Kind of every collider in the shape.
    /// * `properties` - Margin and penetration shared by the colliders.
    /// * `colliders` - Primitive colliders.
    /// * `bones_per_collider` - Number of bone influences stored per collider.
    /// * `bone_influences` - `colliders.len() * bones_per_collider` influences, grouped by collider.
    /// * `tree` - Hierarchy over the collider buffer.
    pub fn new(
        kind: ShapeKind,
        properties: ShapeProperties,
        colliders: Vec<Collider>,
        bones_per_collider: usize,
        bone_influences: Vec<BoneInfluence>,
        tree: ColliderTree,
    ) -> Result<Self> {
        if let Some(collider) = colliders.iter().position(|c| !kind.accepts(&c.kind)) {
            return Err(CollisionError::ColliderKindMismatch {
                collider,
                expected: kind.name(),
            });
        }
        let expected = colliders.len() * bones_per_collider;
        if bone_influences.len() != expected {
            return Err(CollisionError::InfluenceCountMismatch {
                expected,
                found: bone_influences.len(),
            });
        }
        tree.validate(colliders.len())?;
        let aabbs = vec![BoundingBox::EMPTY; colliders.len()];
        Ok(Self {
            kind,
            properties,
            colliders,
            aabbs,
            bones_per_collider,
            bone_influences,
            tree,
        })
    }

    /// Checks the shape's indices against the owning body's vertex and bone counts.
    pub fn validate_against(&self, vertex_count: usize, bone_count: usize) -> Result<()> {
        for (index, collider) in self.colliders.iter().enumerate() {
            if let Some(&vertex) = collider
                .vertices()
                .iter()
                .find(|&&vertex| vertex as usize >= vertex_count)
            {
                return Err(CollisionError::VertexOutOfRange {
                    collider: index,
                    vertex,
                    vertex_count,
                });
            }
            if let Some(influence) = self
                .bone_influences(index)
                .iter()
                .find(|influence| influence.bone as usize >= bone_count)
            {
                return Err(CollisionError::BoneOutOfRange {
                    collider: index,
                    bone: influence.bone,
                    bone_count,
                });
            }
        }
        Ok(())
    }

    /// Gets the kind of the shape.
    #[inline(always)]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Gets the shape's collision properties.
    #[inline(always)]
    pub fn properties(&self) -> &ShapeProperties {
        &self.properties
    }

    /// Gets a collider by index.
    #[inline(always)]
    pub fn collider(&self, index: usize) -> &Collider {
        &self.colliders[index]
    }

    /// Gets the bounding boxes, paired index for index with [`ColliderShape::colliders`].
    #[inline(always)]
    pub fn aabbs(&self) -> &[BoundingBox] {
        &self.aabbs
    }

    /// Gets the collider tree.
    #[inline(always)]
    pub fn tree(&self) -> &ColliderTree {
        &self.tree
    }

    /// Gets the bone influences of one collider.
    #[inline(always)]
    pub fn bone_influences(&self, collider: usize) -> &[BoneInfluence] {
        let start = collider * self.bones_per_collider;
        &self.bone_influences[start..start + self.bones_per_collider]
    }

    /// Replaces the bounding boxes with externally computed ones and refits the tree.
    pub fn set_bounds(&mut self, aabbs: Vec<BoundingBox>) -> Result<()> {
        if aabbs.len() != self.colliders.len() {
            return Err(CollisionError::BufferLengthMismatch {
                colliders: self.colliders.len(),
                bounds: aabbs.len(),
            });
        }
        self.aabbs = aabbs;
        self.tree.refit(&self.aabbs);
        Ok(())
    }

    /// Recomputes every collider's bounding box from the current vertex positions, then refits the tree.
    ///
    /// A point collider is bounded by its sphere, radius `margin_multiplier * margin`. A triangle is bounded by its
    /// corners dilated by the averaged triangle margin, or by its scaled penetration allowance when that is larger.
    /// Colliders touching a non-finite vertex get an empty box.
    pub fn update_bounds(&mut self, vertices: &[VertexPos]) {
        let properties = self.properties;
        for (aabb, collider) in self.aabbs.iter_mut().zip(&self.colliders) {
            *aabb = match collider.kind {
                ColliderKind::Point { vertex } => {
                    let v = vertices[vertex as usize];
                    BoundingBox::from_sphere(v.pos(), v.margin_multiplier() * properties.margin)
                }
                ColliderKind::Triangle { vertices: [i0, i1, i2] } => {
                    let (p0, p1, p2) = (
                        vertices[i0 as usize],
                        vertices[i1 as usize],
                        vertices[i2 as usize],
                    );
                    let multiplier = (p0.margin_multiplier()
                        + p1.margin_multiplier()
                        + p2.margin_multiplier())
                        / 3.0;
                    let dilation = (multiplier * properties.margin)
                        .max(multiplier * properties.penetration.abs());
                    let corners = BoundingBox::from_points(&[p0.pos(), p1.pos(), p2.pos()]);
                    if corners.is_empty() || !dilation.is_finite() {
                        BoundingBox::EMPTY
                    } else {
                        corners.dilated(dilation)
                    }
                }
            };
        }
        self.tree.refit(&self.aabbs);
    }
}
