use crate::error::{CollisionError, Result};
use crate::utilities::thread_dispatcher::hardware_concurrency;
use serde::{Deserialize, Serialize};

/// Default capacity of the per-run contact sink.
pub const MAX_COLLISION_COUNT: usize = 256;

/// How the candidate refiner narrows one coarse node pair down to primitive tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateRefinement {
    /// Alternately tightens both sides' candidate bounds before testing the surviving lists against each other.
    #[default]
    Iterative,
    /// Collects the smaller side's candidates once and tests the other side's overlapping colliders against them.
    SinglePass,
}

/// Tuning of the skinned mesh collision pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmSettings {
    /// Capacity of the contact sink used for one shape pair run. Contacts past it are dropped.
    pub max_collision_count: usize,
    /// Candidate refinement mode.
    pub refinement: CandidateRefinement,
    /// Minimum number of coarse pairs processed in parallel. `None` uses the hardware thread count.
    pub parallel_threshold: Option<usize>,
}

impl Default for AlgorithmSettings {
    fn default() -> Self {
        Self {
            max_collision_count: MAX_COLLISION_COUNT,
            refinement: CandidateRefinement::Iterative,
            parallel_threshold: None,
        }
    }
}

impl AlgorithmSettings {
    /// Checks that the settings describe a usable pipeline.
    pub fn validate(&self) -> Result<()> {
        if self.max_collision_count == 0 {
            return Err(CollisionError::InvalidSettings(
                "max_collision_count must be at least 1".to_string(),
            ));
        }
        if self.parallel_threshold == Some(0) {
            return Err(CollisionError::InvalidSettings(
                "parallel_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Gets the coarse pair count at which processing goes parallel.
    #[inline]
    pub fn effective_parallel_threshold(&self) -> usize {
        self.parallel_threshold.unwrap_or_else(hardware_concurrency)
    }
}
