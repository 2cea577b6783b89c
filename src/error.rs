//! Error types for constructing collision data.
//!
//! Only setup paths are fallible. Once shapes, trees and settings have been validated, per-frame processing reports
//! degenerate input as "no contact" rather than as an error.

use thiserror::Error;

/// Errors raised while building or validating collision inputs.
#[derive(Debug, Error, PartialEq)]
pub enum CollisionError {
    /// The bounding box buffer and the collider buffer of a shape are not paired index for index.
    #[error("collider buffer holds {colliders} colliders but {bounds} bounding boxes")]
    BufferLengthMismatch { colliders: usize, bounds: usize },

    /// A collider references a vertex the owning body does not have.
    #[error("collider {collider} references vertex {vertex}, but the body has {vertex_count} vertices")]
    VertexOutOfRange {
        collider: usize,
        vertex: u32,
        vertex_count: usize,
    },

    /// A bone influence references a bone the owning body does not have.
    #[error("collider {collider} is influenced by bone {bone}, but the body has {bone_count} bones")]
    BoneOutOfRange {
        collider: usize,
        bone: u32,
        bone_count: usize,
    },

    /// The bone influence table does not hold exactly `bones_per_collider` entries per collider.
    #[error("expected {expected} bone influences, found {found}")]
    InfluenceCountMismatch { expected: usize, found: usize },

    /// A collider tree node covers colliders outside the shape's collider buffer.
    #[error("tree node {node} covers colliders {begin}..{end}, but the shape has {collider_count}")]
    NodeOutOfRange {
        node: usize,
        begin: usize,
        end: usize,
        collider_count: usize,
    },

    /// A tree node lists a child that does not come after it in the node array.
    #[error("tree node {node} lists invalid child {child}")]
    InvalidTreeChild { node: usize, child: usize },

    /// A tree node lists a child that another node, or the same node, already lists.
    #[error("tree node {node} lists child {child}, which already has a parent")]
    SharedTreeChild { node: usize, child: usize },

    /// A vertex update does not match the body's vertex count.
    #[error("expected {expected} vertices, found {found}")]
    VertexCountMismatch { expected: usize, found: usize },

    /// A tree node claims more dynamic colliders than it has colliders.
    #[error("tree node {node} has {dyn_collider} dynamic colliders out of {num_collider}")]
    InvalidDynamicRange {
        node: usize,
        dyn_collider: usize,
        num_collider: usize,
    },

    /// A collider's kind does not match the kind of the shape holding it.
    #[error("collider {collider} is not a {expected} collider")]
    ColliderKindMismatch {
        collider: usize,
        expected: &'static str,
    },

    /// Algorithm settings are unusable.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Convenience alias for `Result<T, CollisionError>`.
pub type Result<T> = std::result::Result<T, CollisionError>;
