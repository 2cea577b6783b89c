use super::body_properties::{BodyMaterial, RigidPose};
use super::handles::BodyHandle;

/// Read access to the rigid bodies driven by skinned bones.
///
/// The surrounding simulation world owns the bodies; the collision pipeline only reads their world transforms and
/// surface coefficients while emitting contacts.
pub trait IRigidBodies {
    /// Gets the current world transform of a body.
    fn world_transform(&self, handle: BodyHandle) -> RigidPose;

    /// Gets the surface coefficients of a body.
    fn material(&self, handle: BodyHandle) -> BodyMaterial;
}

/// Description of a rigid body added to a [`Bodies`] set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyDescription {
    /// World transform of the body.
    pub pose: RigidPose,
    /// Surface coefficients of the body.
    pub material: BodyMaterial,
}

impl BodyDescription {
    /// Creates a body description.
    #[inline(always)]
    pub fn new(pose: RigidPose, material: BodyMaterial) -> Self {
        Self { pose, material }
    }
}

/// Minimal dense rigid body set. Handles are indices in insertion order.
#[derive(Debug, Default, Clone)]
pub struct Bodies {
    descriptions: Vec<BodyDescription>,
}

impl Bodies {
    /// Creates an empty body set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a body and returns its handle.
    pub fn add(&mut self, description: BodyDescription) -> BodyHandle {
        let handle = BodyHandle(self.descriptions.len() as u32);
        self.descriptions.push(description);
        handle
    }

    /// Gets the number of bodies in the set.
    #[inline(always)]
    pub fn count(&self) -> usize {
        self.descriptions.len()
    }

    /// Gets whether a handle refers to a body in this set.
    #[inline(always)]
    pub fn contains(&self, handle: BodyHandle) -> bool {
        (handle.0 as usize) < self.descriptions.len()
    }

    /// Gets a body's description, if the handle is valid.
    #[inline(always)]
    pub fn get(&self, handle: BodyHandle) -> Option<&BodyDescription> {
        self.descriptions.get(handle.0 as usize)
    }

    /// Moves a body. Invalid handles are ignored.
    pub fn set_pose(&mut self, handle: BodyHandle, pose: RigidPose) {
        if let Some(description) = self.descriptions.get_mut(handle.0 as usize) {
            description.pose = pose;
        }
    }
}

impl IRigidBodies for Bodies {
    /// Unknown handles report the identity transform.
    fn world_transform(&self, handle: BodyHandle) -> RigidPose {
        self.get(handle).map(|body| body.pose).unwrap_or_default()
    }

    /// Unknown handles report the default material.
    fn material(&self, handle: BodyHandle) -> BodyMaterial {
        self.get(handle).map(|body| body.material).unwrap_or_default()
    }
}
