use glam::Vec3;

/// Skinned vertex as seen by collision detection: a world space position plus the per-vertex margin multiplier.
///
/// Positions are refreshed upstream once per frame before any collision query runs.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexPos {
    /// World space position of the vertex.
    pub position: Vec3,
    /// Scale applied to the owning shape's margin to get this vertex's collision radius.
    pub margin_multiplier: f32,
}

const _: () = {
    assert!(std::mem::size_of::<VertexPos>() == 16);
    assert!(std::mem::offset_of!(VertexPos, position) == 0);
    assert!(std::mem::offset_of!(VertexPos, margin_multiplier) == 12);
};

impl Default for VertexPos {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            margin_multiplier: 1.0,
        }
    }
}

impl VertexPos {
    /// Creates a vertex.
    #[inline(always)]
    pub fn new(position: Vec3, margin_multiplier: f32) -> Self {
        Self {
            position,
            margin_multiplier,
        }
    }

    /// Gets the position of the vertex.
    #[inline(always)]
    pub fn pos(&self) -> Vec3 {
        self.position
    }

    /// Gets the margin multiplier of the vertex.
    #[inline(always)]
    pub fn margin_multiplier(&self) -> f32 {
        self.margin_multiplier
    }
}

/// Geometry of a primitive collider, expressed as indices into the owning body's vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderKind {
    /// Sphere centered on a vertex.
    Point {
        /// Vertex at the center of the sphere.
        vertex: u32,
    },
    /// Triangle spanning three vertices.
    Triangle {
        /// Vertices at the corners of the triangle.
        vertices: [u32; 3],
    },
}

/// Primitive collider of a skinned shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// Geometry of the collider.
    pub kind: ColliderKind,
    /// Softness of the collider. Contacts involving stiffer colliders carry less weight when merged; a pair where
    /// both sides are below epsilon contributes nothing.
    pub flexible: f32,
}

impl Collider {
    /// Creates a point collider.
    #[inline(always)]
    pub fn point(vertex: u32, flexible: f32) -> Self {
        Self {
            kind: ColliderKind::Point { vertex },
            flexible,
        }
    }

    /// Creates a triangle collider.
    #[inline(always)]
    pub fn triangle(vertices: [u32; 3], flexible: f32) -> Self {
        Self {
            kind: ColliderKind::Triangle { vertices },
            flexible,
        }
    }

    /// Gets the vertex indices referenced by the collider.
    #[inline(always)]
    pub fn vertices(&self) -> &[u32] {
        match &self.kind {
            ColliderKind::Point { vertex } => std::slice::from_ref(vertex),
            ColliderKind::Triangle { vertices } => vertices,
        }
    }
}

/// Influence of a skeleton bone on a collider.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoneInfluence {
    /// Index of the bone in the owning body's bone list.
    pub bone: u32,
    /// Skinning weight of the bone for this collider.
    pub weight: f32,
}

impl BoneInfluence {
    /// Creates a bone influence.
    #[inline(always)]
    pub fn new(bone: u32, weight: f32) -> Self {
        Self { bone, weight }
    }
}
