use super::collider_tree::{ColliderNode, ColliderTree};

impl ColliderTree {
    /// Collects every pair of nodes, one from each tree, whose own colliders might touch.
    ///
    /// A pair is reported when both nodes own colliders and their own bounds intersect. Subtrees are pruned by their
    /// aggregate bounds. Each qualifying pair is reported exactly once, as `(node index in self, node index in other)`.
    ///
    /// # Arguments
    ///
    /// * `other` - Tree to test against.
    /// * `pairs` - Receives the overlapping node pairs. Existing contents are kept.
    pub fn check_collision_candidates(&self, other: &ColliderTree, pairs: &mut Vec<(usize, usize)>) {
        if self.is_empty() || other.is_empty() {
            return;
        }
        self.test_subtrees(0, other, 0, pairs);
    }

    /// Reports every qualifying pair between the subtree at `index_a` and the subtree at `index_b`.
    fn test_subtrees(
        &self,
        index_a: usize,
        other: &ColliderTree,
        index_b: usize,
        pairs: &mut Vec<(usize, usize)>,
    ) {
        let node_a = &self.nodes[index_a];
        let node_b = &other.nodes[index_b];
        if !node_a.aabb_all.intersects(&node_b.aabb_all) {
            return;
        }
        Self::report_if_overlapping(index_a, node_a, index_b, node_b, pairs);
        // Descendants of A against the whole subtree of B.
        for &child_a in &node_a.children {
            self.test_subtrees(child_a, other, index_b, pairs);
        }
        // A's own colliders against descendants of B.
        if node_a.num_collider > 0 {
            for &child_b in &node_b.children {
                self.test_own_against_subtree(index_a, other, child_b, pairs);
            }
        }
    }

    /// Reports every qualifying pair between the node at `index_a` alone and the subtree at `index_b`.
    fn test_own_against_subtree(
        &self,
        index_a: usize,
        other: &ColliderTree,
        index_b: usize,
        pairs: &mut Vec<(usize, usize)>,
    ) {
        let node_a = &self.nodes[index_a];
        let node_b = &other.nodes[index_b];
        if !node_a.aabb_me.intersects(&node_b.aabb_all) {
            return;
        }
        Self::report_if_overlapping(index_a, node_a, index_b, node_b, pairs);
        for &child_b in &node_b.children {
            self.test_own_against_subtree(index_a, other, child_b, pairs);
        }
    }

    #[inline(always)]
    fn report_if_overlapping(
        index_a: usize,
        node_a: &ColliderNode,
        index_b: usize,
        node_b: &ColliderNode,
        pairs: &mut Vec<(usize, usize)>,
    ) {
        if node_a.num_collider > 0
            && node_b.num_collider > 0
            && node_a.aabb_me.intersects(&node_b.aabb_me)
        {
            pairs.push((index_a, index_b));
        }
    }
}
