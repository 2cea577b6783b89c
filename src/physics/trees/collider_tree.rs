use crate::error::{CollisionError, Result};
use crate::utilities::bounding_box::BoundingBox;

/// Node of a collider tree.
///
/// A node owns a contiguous range of the shape's collider buffer, `begin..begin + num_collider`. Colliders in that
/// range are partitioned so the first `dyn_collider` of them are the ones that still matter when the opposing node is
/// kinematic; the rest are only tested against dynamic opponents.
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderNode {
    /// First collider owned by this node.
    pub begin: usize,
    /// Number of colliders owned by this node.
    pub num_collider: usize,
    /// Length of the prefix of this node's colliders which is tested against kinematic opponents.
    pub dyn_collider: usize,
    /// Whether this node is driven purely by kinematic bones.
    pub is_kinematic: bool,
    /// Bounds of this node's own colliders.
    pub aabb_me: BoundingBox,
    /// Bounds of this node's own colliders and of every descendant.
    pub aabb_all: BoundingBox,
    /// Indices of child nodes. Children always come after their parent in the node array.
    pub children: Vec<usize>,
}

impl ColliderNode {
    /// Creates a childless node owning a range of colliders. Bounds start empty until the tree is refit.
    pub fn leaf(begin: usize, num_collider: usize, dyn_collider: usize, is_kinematic: bool) -> Self {
        Self {
            begin,
            num_collider,
            dyn_collider,
            is_kinematic,
            aabb_me: BoundingBox::EMPTY,
            aabb_all: BoundingBox::EMPTY,
            children: Vec::new(),
        }
    }

    /// Gets the range of colliders owned by this node.
    #[inline(always)]
    pub fn colliders(&self) -> std::ops::Range<usize> {
        self.begin..self.begin + self.num_collider
    }

    /// Gets the number of colliders to scan on this node when tested against `other`.
    ///
    /// Only the dynamic prefix is scanned against a kinematic opponent.
    #[inline(always)]
    pub fn scan_count_against(&self, other: &ColliderNode) -> usize {
        if other.is_kinematic {
            self.dyn_collider
        } else {
            self.num_collider
        }
    }
}

/// Hierarchy of collider groups over one shape's collider buffer. Node zero is the root.
///
/// Building a good hierarchy is the job of whoever authors the shape; this type only stores it, refits its bounds, and
/// answers overlap queries against another tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColliderTree {
    pub(crate) nodes: Vec<ColliderNode>,
}

impl ColliderTree {
    /// Creates a tree from its nodes. Node zero is the root.
    pub fn new(nodes: Vec<ColliderNode>) -> Self {
        Self { nodes }
    }

    /// Creates a tree with a single node owning `num_collider` colliders starting at zero.
    pub fn single_node(num_collider: usize, dyn_collider: usize, is_kinematic: bool) -> Self {
        Self::new(vec![ColliderNode::leaf(
            0,
            num_collider,
            dyn_collider,
            is_kinematic,
        )])
    }

    /// Creates a two level tree: an empty root with the given leaves as its children.
    pub fn from_leaves(leaves: impl IntoIterator<Item = ColliderNode>) -> Self {
        let mut nodes = vec![ColliderNode::leaf(0, 0, 0, false)];
        for leaf in leaves {
            let index = nodes.len();
            nodes[0].children.push(index);
            nodes.push(leaf);
        }
        Self::new(nodes)
    }

    /// Gets all nodes of the tree.
    #[inline(always)]
    pub fn nodes(&self) -> &[ColliderNode] {
        &self.nodes
    }

    /// Gets a node by index.
    #[inline(always)]
    pub fn node(&self, index: usize) -> &ColliderNode {
        &self.nodes[index]
    }

    /// Gets the root node, if the tree has any nodes.
    #[inline(always)]
    pub fn root(&self) -> Option<&ColliderNode> {
        self.nodes.first()
    }

    /// Gets whether the tree has no nodes.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Checks that every node addresses colliders inside a buffer of `collider_count` entries, that child links only
    /// point forward, and that no node has more than one parent.
    pub fn validate(&self, collider_count: usize) -> Result<()> {
        let mut has_parent = vec![false; self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate() {
            let end = node.begin + node.num_collider;
            if end > collider_count {
                return Err(CollisionError::NodeOutOfRange {
                    node: index,
                    begin: node.begin,
                    end,
                    collider_count,
                });
            }
            if node.dyn_collider > node.num_collider {
                return Err(CollisionError::InvalidDynamicRange {
                    node: index,
                    dyn_collider: node.dyn_collider,
                    num_collider: node.num_collider,
                });
            }
            if let Some(&child) = node
                .children
                .iter()
                .find(|&&child| child <= index || child >= self.nodes.len())
            {
                return Err(CollisionError::InvalidTreeChild { node: index, child });
            }
            for &child in &node.children {
                if std::mem::replace(&mut has_parent[child], true) {
                    return Err(CollisionError::SharedTreeChild { node: index, child });
                }
            }
        }
        Ok(())
    }

    /// Recomputes every node's bounds from the per-collider bounding boxes.
    ///
    /// Children are stored after their parents, so walking the node array backwards visits every child before its
    /// parent.
    pub fn refit(&mut self, aabbs: &[BoundingBox]) {
        for index in (0..self.nodes.len()).rev() {
            let mut aabb_me = BoundingBox::EMPTY;
            for aabb in &aabbs[self.nodes[index].colliders()] {
                aabb_me.merge(aabb);
            }
            let mut aabb_all = aabb_me;
            for &child in &self.nodes[index].children {
                aabb_all.merge(&self.nodes[child].aabb_all);
            }
            let node = &mut self.nodes[index];
            node.aabb_me = aabb_me;
            node.aabb_all = aabb_all;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn unit_box_at(x: f32) -> BoundingBox {
        BoundingBox::new(Vec3::new(x, 0.0, 0.0), Vec3::new(x + 1.0, 1.0, 1.0))
    }

    #[test]
    fn test_refit_propagates_to_root() {
        let mut tree = ColliderTree::from_leaves([
            ColliderNode::leaf(0, 2, 2, false),
            ColliderNode::leaf(2, 1, 1, false),
        ]);
        let aabbs = [unit_box_at(0.0), unit_box_at(2.0), unit_box_at(10.0)];
        tree.refit(&aabbs);
        assert_eq!(tree.node(1).aabb_me.max.x, 3.0);
        assert_eq!(tree.node(2).aabb_me.min.x, 10.0);
        let root = tree.root().unwrap();
        assert!(root.aabb_me.is_empty());
        assert_eq!(root.aabb_all.min.x, 0.0);
        assert_eq!(root.aabb_all.max.x, 11.0);
    }

    #[test]
    fn test_validate_rejects_bad_nodes() {
        let tree = ColliderTree::single_node(4, 2, false);
        assert!(tree.validate(4).is_ok());
        assert_eq!(
            tree.validate(3),
            Err(CollisionError::NodeOutOfRange {
                node: 0,
                begin: 0,
                end: 4,
                collider_count: 3
            })
        );
        let tree = ColliderTree::single_node(2, 3, false);
        assert!(matches!(
            tree.validate(2),
            Err(CollisionError::InvalidDynamicRange { .. })
        ));
        let mut tree = ColliderTree::single_node(1, 1, false);
        tree.nodes[0].children.push(0);
        assert_eq!(
            tree.validate(1),
            Err(CollisionError::InvalidTreeChild { node: 0, child: 0 })
        );
    }

    #[test]
    fn test_validate_rejects_shared_children() {
        let mut tree = ColliderTree::from_leaves([
            ColliderNode::leaf(0, 1, 1, false),
            ColliderNode::leaf(1, 1, 1, false),
            ColliderNode::leaf(2, 1, 1, false),
        ]);
        assert!(tree.validate(3).is_ok());

        // Node 3 reachable from both the root and node 1.
        tree.nodes[1].children.push(3);
        assert_eq!(
            tree.validate(3),
            Err(CollisionError::SharedTreeChild { node: 1, child: 3 })
        );

        let mut tree = ColliderTree::from_leaves([ColliderNode::leaf(0, 1, 1, false)]);
        tree.nodes[0].children.push(1);
        assert_eq!(
            tree.validate(1),
            Err(CollisionError::SharedTreeChild { node: 0, child: 1 })
        );
    }

    #[test]
    fn test_kinematic_opponent_limits_scan() {
        let node = ColliderNode::leaf(0, 10, 4, false);
        let kinematic = ColliderNode::leaf(0, 3, 0, true);
        let dynamic = ColliderNode::leaf(0, 3, 3, false);
        assert_eq!(node.scan_count_against(&kinematic), 4);
        assert_eq!(node.scan_count_against(&dynamic), 10);
    }
}
