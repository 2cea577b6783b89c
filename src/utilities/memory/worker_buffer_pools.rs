/// Reusable candidate lists owned by a single worker.
///
/// The lists hold indices into a collider buffer. They are cleared after every body pair, but keep their capacity so
/// steady state processing allocates nothing.
#[derive(Debug, Default)]
pub struct CandidateLists {
    /// Candidate collider indices on side A.
    pub list_a: Vec<usize>,
    /// Candidate collider indices on side B.
    pub list_b: Vec<usize>,
}

impl CandidateLists {
    /// Creates empty candidate lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures both lists can hold at least the given number of entries without reallocating.
    #[inline]
    pub fn reserve(&mut self, capacity_a: usize, capacity_b: usize) {
        self.list_a.reserve(capacity_a.saturating_sub(self.list_a.len()));
        self.list_b.reserve(capacity_b.saturating_sub(self.list_b.len()));
    }

    /// Empties both lists. Capacity is retained.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.list_a.clear();
        self.list_b.clear();
    }

    /// Gets whether both lists are empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.list_a.is_empty() && self.list_b.is_empty()
    }
}

/// Collection of scratch lists used by worker threads, one per worker.
///
/// Worker `i` of a dispatch only ever touches `lists_mut()[i]`; nothing in here is shared between workers.
#[derive(Debug, Default)]
pub struct WorkerBufferPools {
    pools: Vec<CandidateLists>,
}

impl WorkerBufferPools {
    /// Creates a new set of worker pools.
    ///
    /// # Arguments
    ///
    /// * `initial_worker_count` - Initial number of workers to allocate lists for.
    pub fn new(initial_worker_count: usize) -> Self {
        let mut pools = Self::default();
        pools.ensure_worker_count(initial_worker_count);
        pools
    }

    /// Makes sure at least `worker_count` workers have lists available.
    pub fn ensure_worker_count(&mut self, worker_count: usize) {
        if self.pools.len() < worker_count {
            self.pools.resize_with(worker_count, CandidateLists::new);
        }
    }

    /// Gets the number of workers with lists available.
    #[inline(always)]
    pub fn worker_count(&self) -> usize {
        self.pools.len()
    }

    /// Gets the lists associated with a worker.
    ///
    /// # Arguments
    ///
    /// * `worker_index` - Worker index of the lists to look up.
    #[inline(always)]
    pub fn get_pool(&mut self, worker_index: usize) -> &mut CandidateLists {
        &mut self.pools[worker_index]
    }

    /// Gets the lists of every worker, indexed by worker.
    #[inline(always)]
    pub fn lists_mut(&mut self) -> &mut [CandidateLists] {
        &mut self.pools
    }

    /// Clears every worker's lists. Lists can still be used after being cleared.
    pub fn clear(&mut self) {
        for pool in &mut self.pools {
            pool.clear();
        }
    }

    /// Gets whether every worker's lists are currently empty.
    pub fn all_empty(&self) -> bool {
        self.pools.iter().all(CandidateLists::is_empty)
    }
}
