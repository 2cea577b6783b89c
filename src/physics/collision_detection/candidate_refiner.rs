use super::algorithm_settings::CandidateRefinement;
use super::collision_checker::CollisionCheckContext;
use super::collision_result::CollisionResult;
use super::collision_result_sink::CollisionResultSink;
use crate::physics::trees::collider_tree::ColliderNode;
use crate::utilities::bounding_box::BoundingBox;
use crate::utilities::memory::worker_buffer_pools::CandidateLists;

/// Narrows one coarse node pair down to its single deepest primitive contact.
///
/// Only primitive pairs whose bounding boxes intersect are tested. Both refinement modes see the same set of such
/// pairs, so they agree on the deepest contact up to ties.
pub struct CandidateRefiner;

impl CandidateRefiner {
    /// Refines the node pair `(node_a, node_b)` and submits its deepest contact to the sink.
    ///
    /// # Arguments
    ///
    /// * `context` - Shapes and strategy of the current run.
    /// * `node_a` - Index of a node in shape A's tree.
    /// * `node_b` - Index of a node in shape B's tree.
    /// * `lists` - Scratch lists owned by the calling worker. Empty on entry and on return.
    /// * `sink` - Receives at most one contact.
    #[inline]
    pub fn refine(
        context: &CollisionCheckContext,
        node_a: usize,
        node_b: usize,
        lists: &mut CandidateLists,
        sink: &CollisionResultSink,
    ) {
        if sink.is_full() {
            return;
        }
        let node_a = context.shape_a.tree().node(node_a);
        let node_b = context.shape_b.tree().node(node_b);
        let best = match context.strategy.refinement {
            CandidateRefinement::Iterative => Self::iterative(context, node_a, node_b, lists),
            CandidateRefinement::SinglePass => Self::single_pass(context, node_a, node_b, lists),
        };
        lists.clear();
        if let Some(best) = best {
            sink.add_result(&best);
        }
    }

    /// Alternately tightens the bounds of both candidate lists, then tests the survivors pairwise.
    fn iterative(
        context: &CollisionCheckContext,
        node_a: &ColliderNode,
        node_b: &ColliderNode,
        lists: &mut CandidateLists,
    ) -> Option<CollisionResult> {
        let aabbs_a = context.shape_a.aabbs();
        let aabbs_b = context.shape_b.aabbs();
        let size_a = node_a.scan_count_against(node_b);
        let size_b = node_b.scan_count_against(node_a);
        lists.reserve(size_a, size_b);

        let mut aabb_a = BoundingBox::EMPTY;
        for index in node_a.begin..node_a.begin + size_a {
            if aabbs_a[index].intersects(&node_b.aabb_me) {
                lists.list_a.push(index);
                aabb_a.merge(&aabbs_a[index]);
            }
        }
        if lists.list_a.is_empty() {
            return None;
        }

        let mut aabb_b = BoundingBox::EMPTY;
        for index in node_b.begin..node_b.begin + size_b {
            if aabbs_b[index].intersects(&aabb_a) {
                lists.list_b.push(index);
                aabb_b.merge(&aabbs_b[index]);
            }
        }
        if lists.list_b.is_empty() {
            return None;
        }
        lists.list_a.retain(|&index| aabbs_a[index].intersects(&aabb_b));

        let mut best: Option<CollisionResult> = None;
        for &a in &lists.list_a {
            for &b in &lists.list_b {
                if aabbs_a[a].intersects(&aabbs_b[b]) {
                    Self::keep_deepest(&mut best, context.check_collide(a, b));
                }
            }
        }
        best
    }

    /// Collects the smaller side's candidates once and streams the larger side's overlapping colliders past them.
    fn single_pass(
        context: &CollisionCheckContext,
        node_a: &ColliderNode,
        node_b: &ColliderNode,
        lists: &mut CandidateLists,
    ) -> Option<CollisionResult> {
        let aabbs_a = context.shape_a.aabbs();
        let aabbs_b = context.shape_b.aabbs();
        let size_a = node_a.scan_count_against(node_b);
        let size_b = node_b.scan_count_against(node_a);
        let mut best: Option<CollisionResult> = None;

        if size_a > size_b {
            lists.reserve(0, size_b);
            lists.list_b.extend(
                (node_b.begin..node_b.begin + size_b).filter(|&b| aabbs_b[b].intersects(&node_a.aabb_me)),
            );
            if lists.list_b.is_empty() {
                return None;
            }
            for a in node_a.begin..node_a.begin + size_a {
                if !aabbs_a[a].intersects(&node_b.aabb_me) {
                    continue;
                }
                for &b in &lists.list_b {
                    if aabbs_a[a].intersects(&aabbs_b[b]) {
                        Self::keep_deepest(&mut best, context.check_collide(a, b));
                    }
                }
            }
        } else {
            lists.reserve(size_a, 0);
            lists.list_a.extend(
                (node_a.begin..node_a.begin + size_a).filter(|&a| aabbs_a[a].intersects(&node_b.aabb_me)),
            );
            if lists.list_a.is_empty() {
                return None;
            }
            for b in node_b.begin..node_b.begin + size_b {
                if !aabbs_b[b].intersects(&node_a.aabb_me) {
                    continue;
                }
                for &a in &lists.list_a {
                    if aabbs_a[a].intersects(&aabbs_b[b]) {
                        Self::keep_deepest(&mut best, context.check_collide(a, b));
                    }
                }
            }
        }
        best
    }

    #[inline(always)]
    fn keep_deepest(best: &mut Option<CollisionResult>, candidate: Option<CollisionResult>) {
        if let Some(candidate) = candidate {
            if best.map_or(true, |current| candidate.depth < current.depth) {
                *best = Some(candidate);
            }
        }
    }
}
