use super::algorithm_settings::AlgorithmSettings;
use super::collision_checker::CollisionCheckContext;
use super::collision_result::ResultOrientation;
use super::collision_result_sink::CollisionResultSink;
use super::collision_task_registry::{CollisionTaskRegistry, ICollisionAlgorithm, SKINNED_MESH_SHAPE_TYPE};
use super::contact_manifold::IContactDispatcher;
use super::merge_buffer::MergeBuffer;
use super::pair_dispatcher::PairDispatcher;
use crate::error::Result;
use crate::physics::bodies::IRigidBodies;
use crate::physics::collidables::collider_shape::ColliderShape;
use crate::physics::skinned_mesh_body::SkinnedMeshBody;
use crate::utilities::thread_dispatcher::{IThreadDispatcher, ThreadDispatcher};
use tracing::{debug, trace};

/// Narrow phase between two skinned mesh bodies.
///
/// Every run tests one body's vertex spheres against the other body's spheres or triangles, keeps the deepest contact
/// of each overlapping collider tree node pair, and folds the contacts into per bone pair merge cells. Once every run
/// for the body pair is done, each populated cell becomes one contact point on the manifold of its two bones' rigid
/// bodies.
///
/// Which runs happen depends on which bodies carry triangles:
///
/// | A has triangles | B has triangles | Runs                                          |
/// |-----------------|-----------------|-----------------------------------------------|
/// | yes             | yes             | A triangles vs B spheres, A spheres vs B triangles |
/// | yes             | no              | A triangles vs B spheres                      |
/// | no              | yes             | A spheres vs B triangles                      |
/// | no              | no              | A spheres vs B spheres                        |
///
/// The algorithm owns all of its scratch memory, so steady state processing allocates nothing.
#[derive(Debug)]
pub struct SkinnedMeshAlgorithm<D: IThreadDispatcher = ThreadDispatcher> {
    settings: AlgorithmSettings,
    pair_dispatcher: PairDispatcher<D>,
    sink: CollisionResultSink,
    merge_buffer: MergeBuffer,
    pairs: Vec<(usize, usize)>,
}

impl SkinnedMeshAlgorithm<ThreadDispatcher> {
    /// Creates an algorithm running on one worker per hardware thread.
    pub fn new(settings: AlgorithmSettings) -> Result<Self> {
        Self::with_dispatcher(settings, ThreadDispatcher::default())
    }

    /// Installs the algorithm as the handler of skinned mesh vs skinned mesh pairs.
    pub fn register_algorithm(registry: &mut CollisionTaskRegistry) {
        registry.register_collision_create_fn(
            SKINNED_MESH_SHAPE_TYPE,
            SKINNED_MESH_SHAPE_TYPE,
            create_skinned_mesh_algorithm,
        );
        debug!(
            shape_type = SKINNED_MESH_SHAPE_TYPE,
            "registered skinned mesh collision algorithm"
        );
    }
}

fn create_skinned_mesh_algorithm(settings: &AlgorithmSettings) -> Result<Box<dyn ICollisionAlgorithm>> {
    Ok(Box::new(SkinnedMeshAlgorithm::new(*settings)?))
}

impl<D: IThreadDispatcher> SkinnedMeshAlgorithm<D> {
    /// Creates an algorithm running on the given thread dispatcher.
    pub fn with_dispatcher(settings: AlgorithmSettings, dispatcher: D) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            pair_dispatcher: PairDispatcher::new(dispatcher, settings.effective_parallel_threshold()),
            sink: CollisionResultSink::new(settings.max_collision_count),
            merge_buffer: MergeBuffer::new(),
            pairs: Vec::new(),
            settings,
        })
    }

    /// Gets the settings of the algorithm.
    #[inline(always)]
    pub fn settings(&self) -> &AlgorithmSettings {
        &self.settings
    }

    /// Gets the merge cells of the most recent [`SkinnedMeshAlgorithm::process_collision`] call.
    #[inline(always)]
    pub fn merge_buffer(&self) -> &MergeBuffer {
        &self.merge_buffer
    }

    /// Generates contacts between two skinned bodies and emits them into the dispatcher's manifolds.
    ///
    /// # Arguments
    ///
    /// * `body_a` - First body of the pair.
    /// * `body_b` - Second body of the pair.
    /// * `bodies` - Rigid bodies driven by the two bodies' bones.
    /// * `dispatcher` - Receives one contact point per colliding bone pair.
    ///
    /// # Returns
    ///
    /// * Number of manifold points emitted.
    pub fn process_collision<B, C>(
        &mut self,
        body_a: &SkinnedMeshBody,
        body_b: &SkinnedMeshBody,
        bodies: &B,
        dispatcher: &mut C,
    ) -> usize
    where
        B: IRigidBodies + ?Sized,
        C: IContactDispatcher + ?Sized,
    {
        self.merge_buffer
            .alloc(body_a.skinned_bones().len(), body_b.skinned_bones().len());

        let points_a = body_a.shape().as_per_vertex_shape();
        let points_b = body_b.shape().as_per_vertex_shape();
        let contacts = match (
            body_a.shape().as_per_triangle_shape(),
            body_b.shape().as_per_triangle_shape(),
        ) {
            (Some(triangles_a), Some(triangles_b)) => {
                self.collide_shapes(body_b, points_b, body_a, triangles_a, ResultOrientation::Swapped)
                    + self.collide_shapes(body_a, points_a, body_b, triangles_b, ResultOrientation::Direct)
            }
            (Some(triangles_a), None) => {
                self.collide_shapes(body_b, points_b, body_a, triangles_a, ResultOrientation::Swapped)
            }
            (None, Some(triangles_b)) => {
                self.collide_shapes(body_a, points_a, body_b, triangles_b, ResultOrientation::Direct)
            }
            (None, None) => self.collide_shapes(body_a, points_a, body_b, points_b, ResultOrientation::Direct),
        };

        let emitted = if contacts > 0 {
            self.merge_buffer.apply(body_a, body_b, bodies, dispatcher)
        } else {
            0
        };
        trace!(contacts, emitted, "processed skinned mesh pair");
        emitted
    }

    /// Runs one shape pair and merges its contacts.
    ///
    /// The sphere shape is always tested as side A. With [`ResultOrientation::Swapped`] the sphere body is the caller's
    /// body B, and contacts are mirrored into the caller's ordering before they are merged.
    ///
    /// # Returns
    ///
    /// * Number of contacts merged.
    fn collide_shapes(
        &mut self,
        sphere_body: &SkinnedMeshBody,
        sphere_shape: &ColliderShape,
        target_body: &SkinnedMeshBody,
        target_shape: &ColliderShape,
        orientation: ResultOrientation,
    ) -> usize {
        self.sink.reset(orientation);
        self.pairs.clear();
        sphere_shape
            .tree()
            .check_collision_candidates(target_shape.tree(), &mut self.pairs);
        if self.pairs.is_empty() {
            return 0;
        }

        let context = CollisionCheckContext::new(
            sphere_body.vertices(),
            sphere_shape,
            target_body.vertices(),
            target_shape,
            orientation,
            self.settings.refinement,
        );
        let parallel = self.pair_dispatcher.runs_in_parallel(self.pairs.len());
        let count = self
            .pair_dispatcher
            .process(&context, &self.pairs, &self.sink);
        if self.sink.requested_count() > count {
            debug!(
                requested = self.sink.requested_count(),
                capacity = self.sink.capacity(),
                "contact sink full, dropping contacts"
            );
        }
        trace!(
            coarse_pairs = self.pairs.len(),
            parallel,
            accepted = count,
            orientation = ?orientation,
            test = ?context.strategy.test,
            "collided shape pair"
        );
        if count == 0 {
            return 0;
        }

        let contacts = self.sink.results_mut();
        contacts.sort_unstable_by(|a, b| a.depth.total_cmp(&b.depth));
        match orientation {
            ResultOrientation::Direct => {
                self.merge_buffer
                    .do_merge(sphere_body, sphere_shape, target_body, target_shape, contacts)
            }
            ResultOrientation::Swapped => {
                self.merge_buffer
                    .do_merge(target_body, target_shape, sphere_body, sphere_shape, contacts)
            }
        }
        count
    }
}

impl<D: IThreadDispatcher> ICollisionAlgorithm for SkinnedMeshAlgorithm<D> {
    fn process_collision(
        &mut self,
        body_a: &SkinnedMeshBody,
        body_b: &SkinnedMeshBody,
        bodies: &dyn IRigidBodies,
        dispatcher: &mut dyn IContactDispatcher,
    ) -> usize {
        SkinnedMeshAlgorithm::process_collision(self, body_a, body_b, bodies, dispatcher)
    }
}
