use crate::physics::body_properties::PairMaterialProperties;
use crate::physics::handles::BodyHandle;
use glam::Vec3;
use std::collections::HashMap;
use std::fmt;

/// Contact point handed to the rigid body solver.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ManifoldPoint {
    /// Contact position on body A, in body A's local space.
    pub local_point_a: Vec3,
    /// Contact position on body B, in body B's local space.
    pub local_point_b: Vec3,
    /// Contact position on body A, in world space.
    pub position_world_on_a: Vec3,
    /// Contact position on body B, in world space.
    pub position_world_on_b: Vec3,
    /// Unit contact normal in world space.
    pub normal_world_on_b: Vec3,
    /// Penetration depth. Negative values represent overlap.
    pub distance: f32,
    /// Combined surface coefficients of the two bodies.
    pub material: PairMaterialProperties,
}

/// Trait for contact manifolds.
pub trait IContactManifold {
    /// Appends a contact point.
    fn add_manifold_point(&mut self, point: ManifoldPoint);

    /// Gets the number of contact points in the manifold.
    fn count(&self) -> usize;
}

/// Source of the persistent manifolds contact points are emitted into.
pub trait IContactDispatcher {
    /// Gets the manifold for a pair of rigid bodies, creating it if the pair has none yet.
    fn get_or_create_manifold(&mut self, body_a: BodyHandle, body_b: BodyHandle) -> &mut dyn IContactManifold;
}

/// Contact points collected for one pair of rigid bodies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistentManifold {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    points: Vec<ManifoldPoint>,
}

impl PersistentManifold {
    /// Creates an empty manifold for a body pair.
    pub fn new(body_a: BodyHandle, body_b: BodyHandle) -> Self {
        Self {
            body_a,
            body_b,
            points: Vec::new(),
        }
    }

    /// Gets the contact points.
    #[inline(always)]
    pub fn points(&self) -> &[ManifoldPoint] {
        &self.points
    }

    /// Removes every contact point.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl IContactManifold for PersistentManifold {
    #[inline(always)]
    fn add_manifold_point(&mut self, point: ManifoldPoint) {
        self.points.push(point);
    }

    #[inline(always)]
    fn count(&self) -> usize {
        self.points.len()
    }
}

impl fmt::Display for PersistentManifold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Manifold({} <-> {}, {} points)",
            self.body_a,
            self.body_b,
            self.points.len()
        )
    }
}

/// Manifolds keyed by the ordered body pair they were requested for.
///
/// `(a, b)` and `(b, a)` are distinct entries: points in a manifold are expressed with A and B in request order.
#[derive(Debug, Default)]
pub struct ManifoldCache {
    manifolds: HashMap<(BodyHandle, BodyHandle), PersistentManifold>,
}

impl ManifoldCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the manifold of a body pair.
    pub fn find(&self, body_a: BodyHandle, body_b: BodyHandle) -> Option<&PersistentManifold> {
        self.manifolds.get(&(body_a, body_b))
    }

    /// Iterates over every manifold.
    pub fn manifolds(&self) -> impl Iterator<Item = &PersistentManifold> {
        self.manifolds.values()
    }

    /// Gets the number of manifolds.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.manifolds.len()
    }

    /// Gets whether the cache holds no manifolds.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.manifolds.is_empty()
    }

    /// Gets the number of contact points over all manifolds.
    pub fn total_point_count(&self) -> usize {
        self.manifolds.values().map(|m| m.count()).sum()
    }

    /// Removes the points of every manifold, keeping the manifolds themselves for the next frame.
    pub fn clear_points(&mut self) {
        for manifold in self.manifolds.values_mut() {
            manifold.clear();
        }
    }
}

impl IContactDispatcher for ManifoldCache {
    fn get_or_create_manifold(&mut self, body_a: BodyHandle, body_b: BodyHandle) -> &mut dyn IContactManifold {
        self.manifolds
            .entry((body_a, body_b))
            .or_insert_with(|| PersistentManifold::new(body_a, body_b))
    }
}
