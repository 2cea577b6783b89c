//! Worker-local scratch memory for the collision pipeline.

pub mod worker_buffer_pools;

pub use worker_buffer_pools::{CandidateLists, WorkerBufferPools};
