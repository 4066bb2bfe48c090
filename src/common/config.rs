//! Pool sizing.
//!
//! The frame count, block size and store size are fixed for the lifetime of
//! a pool. They travel as a [`PoolConfig`] value into the constructor, so
//! pools with different sizing can live side by side.

use crate::common::{Error, Result};

/// Frames in the default pool.
pub const DEFAULT_NUM_FRAMES: usize = 3;

/// Bytes per block in the default pool.
pub const DEFAULT_PAGE_SIZE: usize = 4;

/// Blocks in the default backing store.
pub const DEFAULT_NUM_BLOCKS: u32 = 5;

/// Immutable sizing for a buffer pool and its backing store.
///
/// # Example
/// ```
/// use framepool::PoolConfig;
///
/// let config = PoolConfig::new(3, 4, 5).unwrap();
/// assert_eq!(config.store_size(), 20);
/// assert!(PoolConfig::new(0, 4, 5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    num_frames: usize,
    page_size: usize,
    num_blocks: u32,
}

impl PoolConfig {
    /// Build a config, rejecting zero-sized dimensions.
    ///
    /// # Errors
    /// `Error::InvalidConfig` if any value is zero.
    pub fn new(num_frames: usize, page_size: usize, num_blocks: u32) -> Result<Self> {
        if num_frames == 0 {
            return Err(Error::InvalidConfig("num_frames must be > 0".into()));
        }
        if page_size == 0 {
            return Err(Error::InvalidConfig("page_size must be > 0".into()));
        }
        if num_blocks == 0 {
            return Err(Error::InvalidConfig("num_blocks must be > 0".into()));
        }

        Ok(Self {
            num_frames,
            page_size,
            num_blocks,
        })
    }

    /// Number of frames in the pool.
    #[inline]
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Size of every frame and block, in bytes.
    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of blocks in the backing store.
    #[inline]
    pub fn num_blocks(&self) -> u32 {
        self.num_blocks
    }

    /// Total size of the backing store in bytes.
    #[inline]
    pub fn store_size(&self) -> u64 {
        (self.num_blocks as u64) * (self.page_size as u64)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_frames: DEFAULT_NUM_FRAMES,
            page_size: DEFAULT_PAGE_SIZE,
            num_blocks: DEFAULT_NUM_BLOCKS,
        }
    }
}
