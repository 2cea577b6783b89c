pub mod collider_tree;
pub mod tree_intertree_queries;
