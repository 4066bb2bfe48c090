//! Buffer pool management.
//!
//! The buffer pool is the in-memory cache layer between callers and the
//! backing store. It manages a fixed table of frames, each holding at most
//! one block.
//!
//! # Components
//! - [`BufferPoolManager`] - The block cache
//! - [`Frame`] - A slot in the pool holding a block + metadata
//! - [`FetchOutcome`] / [`Eviction`] / [`ShutdownReport`] - Operation results
//! - [`BufferPoolStats`] - Performance statistics

mod buffer_pool_manager;
mod frame;
mod outcome;
mod stats;

pub use buffer_pool_manager::BufferPoolManager;
pub use frame::{Frame, FrameState};
pub use outcome::{Eviction, FetchOutcome, ShutdownReport};
pub use stats::BufferPoolStats;
