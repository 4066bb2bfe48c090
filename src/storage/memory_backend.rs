//! In-memory backend with I/O instrumentation.

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::common::{BlockId, Error, PoolConfig, Result};
use crate::storage::StorageBackend;

/// A zero-initialised block store held in memory.
///
/// Clones share the same store, so a test can keep one handle, move
/// another into a pool, and still inspect stored bytes and call counts
/// afterwards.
///
/// # Example
/// ```
/// use framepool::storage::{MemoryBackend, StorageBackend};
/// use framepool::BlockId;
///
/// let store = MemoryBackend::new(4, 5);
/// let mut backend = store.clone();
/// backend.write_block(BlockId::new(2), b"WXYZ").unwrap();
///
/// assert_eq!(store.block(BlockId::new(2)), b"WXYZ");
/// assert_eq!(store.writes_to(BlockId::new(2)), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    page_size: usize,
    num_blocks: u32,
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    data: Vec<u8>,
    reads: u64,
    /// Every successful write, in order.
    write_log: Vec<BlockId>,
    closes: u64,
    fail_next_read: bool,
    fail_next_write: bool,
}

impl MemoryBackend {
    /// Create a zeroed store of `num_blocks` blocks.
    pub fn new(page_size: usize, num_blocks: u32) -> Self {
        let inner = Inner {
            data: vec![0u8; page_size * num_blocks as usize],
            ..Inner::default()
        };

        Self {
            page_size,
            num_blocks,
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Create a store sized for `config`.
    pub fn for_config(config: &PoolConfig) -> Self {
        Self::new(config.page_size(), config.num_blocks())
    }

    /// Seed a block without counting it as a write.
    ///
    /// # Panics
    /// Panics if `block` is out of range or `data` is the wrong length.
    pub fn set_block(&self, block: BlockId, data: &[u8]) {
        assert_eq!(data.len(), self.page_size, "block must be page_size bytes");
        let range = self.byte_range(block);
        self.inner.lock().data[range].copy_from_slice(data);
    }

    /// Current stored contents of `block`.
    ///
    /// # Panics
    /// Panics if `block` is out of range.
    pub fn block(&self, block: BlockId) -> Vec<u8> {
        let range = self.byte_range(block);
        self.inner.lock().data[range].to_vec()
    }

    /// Number of successful block reads.
    pub fn reads(&self) -> u64 {
        self.inner.lock().reads
    }

    /// Number of successful block writes.
    pub fn writes(&self) -> u64 {
        self.inner.lock().write_log.len() as u64
    }

    /// Number of successful writes to one block.
    pub fn writes_to(&self, block: BlockId) -> u64 {
        self.inner
            .lock()
            .write_log
            .iter()
            .filter(|&&b| b == block)
            .count() as u64
    }

    /// Blocks written so far, in write order.
    pub fn write_log(&self) -> Vec<BlockId> {
        self.inner.lock().write_log.clone()
    }

    /// Whether `close` has been called at least once.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().closes > 0
    }

    /// Number of `close` calls.
    pub fn closes(&self) -> u64 {
        self.inner.lock().closes
    }

    /// Make the next `read_block` fail with an I/O error.
    pub fn fail_next_read(&self) {
        self.inner.lock().fail_next_read = true;
    }

    /// Make the next `write_block` fail with an I/O error.
    pub fn fail_next_write(&self) {
        self.inner.lock().fail_next_write = true;
    }

    fn byte_range(&self, block: BlockId) -> std::ops::Range<usize> {
        assert!(block.0 < self.num_blocks, "{} out of range", block);
        let start = block.index() * self.page_size;
        start..start + self.page_size
    }

    fn check(&self, block: BlockId, len: usize) -> Result<()> {
        if block.0 >= self.num_blocks {
            return Err(Error::BlockOutOfRange {
                block,
                num_blocks: self.num_blocks,
            });
        }
        if len != self.page_size {
            return Err(Error::PayloadSize {
                expected: self.page_size,
                actual: len,
            });
        }
        Ok(())
    }
}

impl StorageBackend for MemoryBackend {
    fn page_size(&self) -> usize {
        self.page_size
    }

    fn num_blocks(&self) -> u32 {
        self.num_blocks
    }

    fn read_block(&mut self, block: BlockId, buf: &mut [u8]) -> Result<()> {
        self.check(block, buf.len())?;
        let range = self.byte_range(block);

        let mut inner = self.inner.lock();
        if std::mem::take(&mut inner.fail_next_read) {
            return Err(Error::io(
                block,
                io::Error::new(io::ErrorKind::Other, "injected read failure"),
            ));
        }

        buf.copy_from_slice(&inner.data[range]);
        inner.reads += 1;
        Ok(())
    }

    fn write_block(&mut self, block: BlockId, data: &[u8]) -> Result<()> {
        self.check(block, data.len())?;
        let range = self.byte_range(block);

        let mut inner = self.inner.lock();
        if std::mem::take(&mut inner.fail_next_write) {
            return Err(Error::io(
                block,
                io::Error::new(io::ErrorKind::Other, "injected write failure"),
            ));
        }

        inner.data[range].copy_from_slice(data);
        inner.write_log.push(block);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.inner.lock().closes += 1;
        Ok(())
    }
}
