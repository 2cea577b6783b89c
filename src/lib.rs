//! Collision detection between skinned soft body meshes.
//!
//! Each skinned body collides through spheres centered on its vertices and, optionally, through its triangles. For a
//! pair of bodies, [`SkinnedMeshAlgorithm`] prunes collider groups with their collider trees, tests the surviving
//! primitive pairs in parallel into a bounded sink, and merges the contacts into one weighted contact point per pair of
//! skeleton bones. The merged points are emitted into the persistent manifolds of the bones' rigid bodies.

pub mod error;
pub mod physics;
pub mod utilities;

pub use error::{CollisionError, Result};
pub use physics::bodies::{Bodies, BodyDescription, IRigidBodies};
pub use physics::body_properties::{BodyMaterial, PairMaterialProperties, RigidPose};
pub use physics::collidables::collider::{BoneInfluence, Collider, ColliderKind, VertexPos};
pub use physics::collidables::collider_shape::{ColliderShape, ShapeKind, ShapeProperties};
pub use physics::collision_detection::algorithm_settings::{AlgorithmSettings, CandidateRefinement, MAX_COLLISION_COUNT};
pub use physics::collision_detection::collision_result::{CollisionResult, ResultOrientation};
pub use physics::collision_detection::collision_task_registry::{
    CollisionTaskRegistry, ICollisionAlgorithm, SKINNED_MESH_SHAPE_TYPE,
};
pub use physics::collision_detection::contact_manifold::{
    IContactDispatcher, IContactManifold, ManifoldCache, ManifoldPoint, PersistentManifold,
};
pub use physics::collision_detection::skinned_mesh_algorithm::SkinnedMeshAlgorithm;
pub use physics::handles::BodyHandle;
pub use physics::skinned_mesh_body::{SkinnedBone, SkinnedMeshBody, SkinnedMeshShape};
pub use physics::trees::collider_tree::{ColliderNode, ColliderTree};
pub use utilities::bounding_box::BoundingBox;
pub use utilities::thread_dispatcher::{IThreadDispatcher, ThreadDispatcher};
