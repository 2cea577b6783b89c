use glam::Vec3;

/// Contact between two primitive colliders.
///
/// By convention the depth is negative for penetrating primitives; anything at or above `-f32::EPSILON` is treated as
/// not touching. The normal is a unit vector pointing from collider A toward collider B.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionResult {
    /// Contact position on the surface of collider A.
    pub pos_a: Vec3,
    /// Contact position on the surface of collider B.
    pub pos_b: Vec3,
    /// Unit contact normal, pointing from A toward B.
    pub normal_on_b: Vec3,
    /// Signed penetration depth. Negative values represent overlap.
    pub depth: f32,
    /// Index of collider A in its shape's collider buffer.
    pub collider_a: u32,
    /// Index of collider B in its shape's collider buffer.
    pub collider_b: u32,
}

impl CollisionResult {
    /// Gets the mirror of this contact: sides exchanged, normal negated, depth unchanged.
    #[inline(always)]
    pub fn swapped(&self) -> Self {
        Self {
            pos_a: self.pos_b,
            pos_b: self.pos_a,
            normal_on_b: -self.normal_on_b,
            depth: self.depth,
            collider_a: self.collider_b,
            collider_b: self.collider_a,
        }
    }

    /// Gets whether the contact represents real interpenetration.
    #[inline(always)]
    pub fn is_penetrating(&self) -> bool {
        self.depth < -f32::EPSILON
    }
}

/// How results of a collision check map back onto the caller's A/B ordering.
///
/// Checks always run with a sphere on side A. When the caller's A is the triangle side, the check runs with the shapes
/// exchanged and every result is mirrored on the way out instead of duplicating the narrow phase for the other order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultOrientation {
    /// Results are stored as computed.
    #[default]
    Direct,
    /// Results are mirrored with [`CollisionResult::swapped`] before being stored.
    Swapped,
}

impl ResultOrientation {
    /// Maps a computed result onto the caller's ordering.
    #[inline(always)]
    pub fn orient(self, result: &CollisionResult) -> CollisionResult {
        match self {
            ResultOrientation::Direct => *result,
            ResultOrientation::Swapped => result.swapped(),
        }
    }
}
