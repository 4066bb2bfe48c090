//! Storage layer - block I/O against the backing store.
//!
//! The buffer pool talks to storage only through [`StorageBackend`]:
//! - [`FileBackend`] - a single file, block `N` at offset `N × page_size`
//! - [`MemoryBackend`] - an in-memory store with I/O counters, for tests
//!   and tooling

mod file_backend;
mod memory_backend;

pub use file_backend::FileBackend;
pub use memory_backend::MemoryBackend;

use crate::common::{BlockId, Result};

/// Fixed-size block access over an open backing store.
///
/// Implementations own the handle and no pool state. Every call either
/// transfers exactly one whole block or fails; a partially transferred
/// block is reported as an error, never returned as data.
pub trait StorageBackend {
    /// Size of one block in bytes.
    fn page_size(&self) -> usize;

    /// Number of addressable blocks.
    fn num_blocks(&self) -> u32;

    /// Fill `buf` with the contents of `block`.
    ///
    /// # Errors
    /// - `Error::BlockOutOfRange` if `block` is past the end of the store
    /// - `Error::PayloadSize` if `buf` is not `page_size` bytes
    /// - `Error::ShortRead` / `Error::Io` on device failure
    fn read_block(&mut self, block: BlockId, buf: &mut [u8]) -> Result<()>;

    /// Overwrite `block` with `data`.
    ///
    /// # Errors
    /// - `Error::BlockOutOfRange` if `block` is past the end of the store
    /// - `Error::PayloadSize` if `data` is not `page_size` bytes
    /// - `Error::Io` on device failure
    fn write_block(&mut self, block: BlockId, data: &[u8]) -> Result<()>;

    /// Release the store.
    fn close(&mut self) -> Result<()>;
}
