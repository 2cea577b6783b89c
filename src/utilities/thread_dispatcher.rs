use rayon::{ThreadPool, ThreadPoolBuilder};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::warn;

/// Provides multithreading dispatch primitives and a thread count for the collision pipeline to use.
///
/// Note that the pipeline does not require a true load balancing for loop implementation. All that's needed is a way to
/// jumpstart some workers, each of which owns one entry of worker-local state for the duration of the dispatch.
/// Workers balance the load among themselves by claiming work items from a shared atomic counter.
///
/// This is important when a user wants to share some other thread pool, but doesn't have the time to guarantee extremely
/// high performance and high quality load balancing. Instead of worrying about that, they can just wrap whatever
/// implementation they happen to have and it'll probably work fine.
pub trait IThreadDispatcher: Send + Sync {
    /// Gets the number of workers available in the thread dispatcher.
    fn thread_count(&self) -> usize;

    /// Dispatches one worker per entry of `worker_states`, and returns once every worker has returned.
    ///
    /// # Arguments
    ///
    /// * `worker_states` - Worker-local state. Worker `i` receives exclusive access to `worker_states[i]`.
    /// * `worker_body` - Function invoked on every worker with its worker index and its state.
    ///
    /// A panic on any worker is propagated to the caller after all workers have stopped.
    fn dispatch_workers<S, F>(&self, worker_states: &mut [S], worker_body: F)
    where
        S: Send,
        F: Fn(usize, &mut S) + Sync;
}

/// Thread dispatcher backed by a persistent worker pool.
///
/// The pool is started once and its threads are reused by every dispatch. A dispatcher with a single worker owns no pool
/// and runs the worker on the calling thread.
#[derive(Debug, Clone)]
pub struct ThreadDispatcher {
    thread_count: usize,
    pool: Option<Arc<ThreadPool>>,
}

impl ThreadDispatcher {
    /// Creates a dispatcher with the given number of workers. A count of zero is treated as one.
    ///
    /// If the worker pool cannot be started, the dispatcher falls back to a single worker.
    pub fn new(thread_count: usize) -> Self {
        let thread_count = thread_count.max(1);
        if thread_count == 1 {
            return Self {
                thread_count,
                pool: None,
            };
        }
        match ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .thread_name(|index| format!("collision-worker-{index}"))
            .build()
        {
            Ok(pool) => Self {
                thread_count,
                pool: Some(Arc::new(pool)),
            },
            Err(error) => {
                warn!(thread_count, %error, "failed to start collision worker pool, running single threaded");
                Self {
                    thread_count: 1,
                    pool: None,
                }
            }
        }
    }

    /// Creates a dispatcher with one worker per hardware thread.
    pub fn with_available_parallelism() -> Self {
        Self::new(hardware_concurrency())
    }
}

impl Default for ThreadDispatcher {
    fn default() -> Self {
        Self::with_available_parallelism()
    }
}

impl IThreadDispatcher for ThreadDispatcher {
    #[inline(always)]
    fn thread_count(&self) -> usize {
        self.thread_count
    }

    fn dispatch_workers<S, F>(&self, worker_states: &mut [S], worker_body: F)
    where
        S: Send,
        F: Fn(usize, &mut S) + Sync,
    {
        let worker_count = worker_states.len().min(self.thread_count);
        let (local, remote) = match worker_states[..worker_count].split_first_mut() {
            Some(split) => split,
            None => return,
        };
        let pool = match &self.pool {
            Some(pool) if !remote.is_empty() => pool,
            _ => {
                worker_body(0, local);
                return;
            }
        };
        let worker_body = &worker_body;
        // Panics inside the scope are rethrown by rayon once every worker has stopped.
        pool.scope(|scope| {
            for (offset, state) in remote.iter_mut().enumerate() {
                scope.spawn(move |_| worker_body(offset + 1, state));
            }
            worker_body(0, local);
        });
    }
}

/// Gets the number of hardware threads, falling back to one when it cannot be determined.
pub fn hardware_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
