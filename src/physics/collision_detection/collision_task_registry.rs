use super::algorithm_settings::AlgorithmSettings;
use super::contact_manifold::IContactDispatcher;
use crate::error::Result;
use crate::physics::bodies::IRigidBodies;
use crate::physics::skinned_mesh_body::SkinnedMeshBody;

/// Shape type id of skinned mesh bodies in the collision dispatch table.
pub const SKINNED_MESH_SHAPE_TYPE: usize = 0;

/// Narrow phase handler for one shape type pair.
pub trait ICollisionAlgorithm: Send {
    /// Generates contacts between two bodies and emits them into the dispatcher's manifolds.
    ///
    /// # Returns
    ///
    /// * Number of manifold points emitted.
    fn process_collision(
        &mut self,
        body_a: &SkinnedMeshBody,
        body_b: &SkinnedMeshBody,
        bodies: &dyn IRigidBodies,
        dispatcher: &mut dyn IContactDispatcher,
    ) -> usize;
}

/// Factory creating the algorithm of a shape type pair.
pub type CreateFn = fn(&AlgorithmSettings) -> Result<Box<dyn ICollisionAlgorithm>>;

/// Dispatch table mapping shape type pairs to algorithm factories.
pub struct CollisionTaskRegistry {
    top_level_matrix: Vec<Vec<Option<CreateFn>>>,
    settings: AlgorithmSettings,
}

impl CollisionTaskRegistry {
    /// Creates a registry with room for `initial_shape_count` shape types. Factories get default settings.
    pub fn new(initial_shape_count: usize) -> Self {
        Self::with_settings(initial_shape_count, AlgorithmSettings::default())
    }

    /// Creates a registry whose factories are handed `settings`.
    pub fn with_settings(initial_shape_count: usize, settings: AlgorithmSettings) -> Self {
        let mut registry = Self {
            top_level_matrix: Vec::new(),
            settings,
        };
        registry.resize_matrix(initial_shape_count);
        registry
    }

    fn resize_matrix(&mut self, new_size: usize) {
        self.top_level_matrix.resize_with(new_size, Vec::new);
        for row in &mut self.top_level_matrix {
            row.resize(new_size, None);
        }
    }

    /// Gets the settings handed to factories.
    #[inline(always)]
    pub fn settings(&self) -> &AlgorithmSettings {
        &self.settings
    }

    /// Gets the number of shape types the table has room for.
    #[inline(always)]
    pub fn shape_type_count(&self) -> usize {
        self.top_level_matrix.len()
    }

    /// Registers the factory of a shape type pair, for both orderings of the pair. Replaces any previous factory.
    pub fn register_collision_create_fn(&mut self, shape_type_a: usize, shape_type_b: usize, create: CreateFn) {
        let highest = shape_type_a.max(shape_type_b);
        if highest >= self.top_level_matrix.len() {
            self.resize_matrix(highest + 1);
        }
        self.top_level_matrix[shape_type_a][shape_type_b] = Some(create);
        self.top_level_matrix[shape_type_b][shape_type_a] = Some(create);
    }

    /// Gets the factory of a shape type pair.
    #[inline]
    pub fn find_create_fn(&self, shape_type_a: usize, shape_type_b: usize) -> Option<CreateFn> {
        self.top_level_matrix
            .get(shape_type_a)
            .and_then(|row| row.get(shape_type_b))
            .copied()
            .flatten()
    }

    /// Creates the algorithm of a shape type pair.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` if no factory is registered for the pair, or the factory's error if it rejects the settings.
    pub fn create_algorithm(
        &self,
        shape_type_a: usize,
        shape_type_b: usize,
    ) -> Result<Option<Box<dyn ICollisionAlgorithm>>> {
        self.find_create_fn(shape_type_a, shape_type_b)
            .map(|create| create(&self.settings))
            .transpose()
    }
}

impl Default for CollisionTaskRegistry {
    fn default() -> Self {
        Self::new(SKINNED_MESH_SHAPE_TYPE + 1)
    }
}

impl std::fmt::Debug for CollisionTaskRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registered = self
            .top_level_matrix
            .iter()
            .flatten()
            .filter(|entry| entry.is_some())
            .count();
        f.debug_struct("CollisionTaskRegistry")
            .field("shape_type_count", &self.shape_type_count())
            .field("registered", &registered)
            .field("settings", &self.settings)
            .finish()
    }
}
