use glam::{Quat, Vec3};

/// Represents a rigid transformation.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidPose {
    /// Orientation of the pose.
    pub orientation: Quat,
    /// Position of the pose.
    pub position: Vec3,
}

impl Default for RigidPose {
    #[inline(always)]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RigidPose {
    /// Returns a pose with a position at (0,0,0) and identity orientation.
    pub const IDENTITY: Self = Self {
        orientation: Quat::IDENTITY,
        position: Vec3::ZERO,
    };

    /// Creates a rigid pose with the given position and orientation.
    #[inline(always)]
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Creates a rigid pose with the given position and identity orientation.
    #[inline(always)]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }

    /// Transforms a point by the rigid pose: v * pose.Orientation + pose.Position.
    #[inline(always)]
    pub fn transform(&self, v: Vec3) -> Vec3 {
        self.orientation * v + self.position
    }

    /// Transforms a point by the inverse of a rigid pose: (v - pose.Position) * pose.Orientation^-1.
    #[inline(always)]
    pub fn transform_by_inverse(&self, v: Vec3) -> Vec3 {
        self.orientation.conjugate() * (v - self.position)
    }
}

/// Surface coefficients of a rigid body, consumed when building contact points.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyMaterial {
    /// Coefficient of friction.
    pub friction: f32,
    /// Coefficient of restitution.
    pub restitution: f32,
    /// Coefficient of rolling friction.
    pub rolling_friction: f32,
}

impl Default for BodyMaterial {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.0,
            rolling_friction: 0.0,
        }
    }
}

impl BodyMaterial {
    /// Creates a material from its coefficients.
    #[inline(always)]
    pub fn new(friction: f32, restitution: f32, rolling_friction: f32) -> Self {
        Self {
            friction,
            restitution,
            rolling_friction,
        }
    }
}

/// Material properties governing the interaction between two colliding bodies.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PairMaterialProperties {
    /// Combined coefficient of friction.
    pub combined_friction: f32,
    /// Combined coefficient of restitution.
    pub combined_restitution: f32,
    /// Combined coefficient of rolling friction.
    pub combined_rolling_friction: f32,
}

impl PairMaterialProperties {
    /// Combines two materials. Every coefficient is the product of the two bodies' coefficients.
    #[inline(always)]
    pub fn combine(a: &BodyMaterial, b: &BodyMaterial) -> Self {
        Self {
            combined_friction: a.friction * b.friction,
            combined_restitution: a.restitution * b.restitution,
            combined_rolling_friction: a.rolling_friction * b.rolling_friction,
        }
    }
}
