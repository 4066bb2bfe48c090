//! framepool - a fixed-size buffer pool over a block store.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          framepool                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │         Client (menu binary, tests, your code)        │  │
//! │  │     fetch / write_to_frame / evict / power_off        │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! │                             ↓                               │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │               Buffer Pool (buffer/)                   │  │
//! │  │   BufferPoolManager + Frame + Statistics              │  │
//! │  │   caller-chosen victims, write-back on eviction       │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! │                             ↓                               │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │               Storage Layer (storage/)                │  │
//! │  │     StorageBackend: FileBackend | MemoryBackend       │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (BlockId, FrameId, PoolConfig, Error)
//! - [`buffer`] - Buffer pool management
//! - [`storage`] - Block I/O backends
//!
//! # Quick Start
//! ```no_run
//! use framepool::{BlockId, BufferPoolManager, FetchOutcome, FrameId, PoolConfig};
//!
//! let mut bpm = BufferPoolManager::open("abc.txt", PoolConfig::default()).unwrap();
//!
//! let frame = match bpm.fetch(BlockId::new(2)).unwrap() {
//!     FetchOutcome::NeedsVictim => bpm
//!         .fetch_evicting(BlockId::new(2), FrameId::new(0))
//!         .unwrap()
//!         .frame()
//!         .unwrap(),
//!     outcome => outcome.frame().unwrap(),
//! };
//! bpm.write_to_frame(frame, b"WXYZ").unwrap();
//! bpm.power_off().unwrap();
//! ```

pub mod buffer;
pub mod common;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::{BlockId, Error, FrameId, PoolConfig, Result};

pub use buffer::{
    BufferPoolManager, BufferPoolStats, Eviction, FetchOutcome, Frame, FrameState, ShutdownReport,
};
pub use storage::{FileBackend, MemoryBackend, StorageBackend};
