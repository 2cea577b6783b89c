use super::candidate_refiner::CandidateRefiner;
use super::collision_checker::CollisionCheckContext;
use super::collision_result_sink::CollisionResultSink;
use crate::utilities::memory::worker_buffer_pools::WorkerBufferPools;
use crate::utilities::thread_dispatcher::{IThreadDispatcher, ThreadDispatcher};
use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fans coarse node pairs out to the candidate refiner.
///
/// Pair lists at least as long as the parallel threshold are spread across the thread dispatcher's workers, which claim
/// pairs from a shared counter. Shorter lists run on the calling thread. Either way each worker refines into its own
/// scratch lists and writes only through the sink.
#[derive(Debug)]
pub struct PairDispatcher<D: IThreadDispatcher = ThreadDispatcher> {
    dispatcher: D,
    scratch: WorkerBufferPools,
    parallel_threshold: usize,
}

impl<D: IThreadDispatcher> PairDispatcher<D> {
    /// Creates a pair dispatcher.
    ///
    /// # Arguments
    ///
    /// * `dispatcher` - Thread dispatcher used for parallel runs.
    /// * `parallel_threshold` - Minimum number of pairs processed in parallel.
    pub fn new(dispatcher: D, parallel_threshold: usize) -> Self {
        let scratch = WorkerBufferPools::new(dispatcher.thread_count());
        Self {
            dispatcher,
            scratch,
            parallel_threshold: parallel_threshold.max(1),
        }
    }

    /// Gets the minimum number of pairs processed in parallel.
    #[inline(always)]
    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Gets whether a list of `pair_count` pairs would be processed in parallel.
    #[inline(always)]
    pub fn runs_in_parallel(&self, pair_count: usize) -> bool {
        pair_count >= self.parallel_threshold && self.dispatcher.thread_count() > 1
    }

    /// Refines every coarse pair into the sink.
    ///
    /// # Arguments
    ///
    /// * `context` - Shapes and strategy of the current run.
    /// * `pairs` - Overlapping `(node in shape A, node in shape B)` pairs.
    /// * `sink` - Receives the deepest contact of each pair until full.
    ///
    /// # Returns
    ///
    /// * Number of contacts held by the sink, never more than its capacity.
    pub fn process(
        &mut self,
        context: &CollisionCheckContext,
        pairs: &[(usize, usize)],
        sink: &CollisionResultSink,
    ) -> usize {
        if self.runs_in_parallel(pairs.len()) {
            self.scratch.ensure_worker_count(self.dispatcher.thread_count());
            let next_pair = CachePadded::new(AtomicUsize::new(0));
            self.dispatcher
                .dispatch_workers(self.scratch.lists_mut(), |_, lists| loop {
                    let index = next_pair.fetch_add(1, Ordering::Relaxed);
                    let Some(&(node_a, node_b)) = pairs.get(index) else {
                        break;
                    };
                    CandidateRefiner::refine(context, node_a, node_b, lists, sink);
                });
        } else {
            self.scratch.ensure_worker_count(1);
            let lists = self.scratch.get_pool(0);
            for &(node_a, node_b) in pairs {
                CandidateRefiner::refine(context, node_a, node_b, lists, sink);
            }
        }
        debug_assert!(self.scratch.all_empty());
        sink.accepted_count()
    }
}
