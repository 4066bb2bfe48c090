//! Common types shared across framepool.
//!
//! This module contains the primitives used throughout the codebase:
//! - Pool configuration ([`PoolConfig`])
//! - Error types
//! - Identifiers (BlockId, FrameId)

pub mod config;
pub mod error;
mod block_id;
mod frame_id;

pub use block_id::BlockId;
pub use config::PoolConfig;
pub use error::{Error, Result};
pub use frame_id::FrameId;
