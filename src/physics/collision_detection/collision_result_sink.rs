use super::collision_result::{CollisionResult, ResultOrientation};
use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixed capacity result array shared by every worker of a collision check.
///
/// Workers reserve slots by atomically incrementing a position counter; a reservation at or beyond the capacity is
/// dropped. Accepted results are mapped through the sink's [`ResultOrientation`] as they are stored.
pub struct CollisionResultSink {
    slots: Box<[UnsafeCell<CollisionResult>]>,
    position: CachePadded<AtomicUsize>,
    orientation: ResultOrientation,
}

// SAFETY: every slot is written by at most one thread per fill, the one whose fetch_add returned its index. Reads of
// the slots require `&mut self`, which cannot coexist with any concurrent `add_result`.
unsafe impl Sync for CollisionResultSink {}

impl CollisionResultSink {
    /// Creates a sink with room for `capacity` results.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity)
                .map(|_| UnsafeCell::new(CollisionResult::default()))
                .collect(),
            position: CachePadded::new(AtomicUsize::new(0)),
            orientation: ResultOrientation::Direct,
        }
    }

    /// Gets the maximum number of results the sink holds.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Empties the sink and sets the orientation for the next fill.
    #[inline]
    pub fn reset(&mut self, orientation: ResultOrientation) {
        *self.position.get_mut() = 0;
        self.orientation = orientation;
    }

    /// Attempts to store a result.
    ///
    /// # Returns
    ///
    /// * `true` if the result was stored, `false` if the sink was already full and the result was dropped.
    #[inline(always)]
    pub fn add_result(&self, result: &CollisionResult) -> bool {
        let index = self.position.fetch_add(1, Ordering::AcqRel);
        match self.slots.get(index) {
            Some(slot) => {
                // SAFETY: the fetch_add above handed `index` to this call alone.
                unsafe {
                    *slot.get() = self.orientation.orient(result);
                }
                true
            }
            None => false,
        }
    }

    /// Gets whether no further results will be accepted.
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.position.load(Ordering::Acquire) >= self.slots.len()
    }

    /// Gets the number of results submitted since the last reset, including dropped ones.
    #[inline(always)]
    pub fn requested_count(&self) -> usize {
        self.position.load(Ordering::Acquire)
    }

    /// Gets the number of results stored since the last reset. Never exceeds the capacity.
    #[inline(always)]
    pub fn accepted_count(&self) -> usize {
        self.requested_count().min(self.slots.len())
    }

    /// Gets the stored results.
    pub fn results(&mut self) -> &[CollisionResult] {
        self.results_mut()
    }

    /// Gets the stored results for in-place reordering.
    pub fn results_mut(&mut self) -> &mut [CollisionResult] {
        let count = self.accepted_count();
        let slots = &mut self.slots[..count];
        // SAFETY: UnsafeCell<T> has the same memory layout as T, and `&mut self` rules out concurrent writers.
        unsafe { std::slice::from_raw_parts_mut(slots.as_mut_ptr().cast::<CollisionResult>(), count) }
    }
}

impl std::fmt::Debug for CollisionResultSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionResultSink")
            .field("capacity", &self.capacity())
            .field("requested", &self.requested_count())
            .field("orientation", &self.orientation)
            .finish()
    }
}
