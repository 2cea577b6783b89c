/// Non-owning reference to a rigid body living in the surrounding simulation world.
///
/// Skinned bones refer to the rigid body they drive through this handle. The world owns the body; two bones refer to
/// the same body exactly when their handles compare equal.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u32);

impl std::fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "BodyHandle<{}>", self.0)
    }
}
