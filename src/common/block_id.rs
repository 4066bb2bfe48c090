//! Block identifier type.

use std::fmt;

/// Identifies a block in the backing store.
///
/// Block `N` lives at byte offset `N × page_size` in the store. Whether a
/// given id is in range depends on the pool's [`PoolConfig`](super::PoolConfig),
/// so range checks happen in the pool, not here.
///
/// # Example
/// ```
/// use framepool::BlockId;
///
/// let block = BlockId::new(2);
/// assert_eq!(block.0, 2);
/// assert_eq!(block.offset(4), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl BlockId {
    /// Create a new BlockId.
    #[inline]
    pub fn new(id: u32) -> Self {
        BlockId(id)
    }

    /// Byte offset of this block for the given block size.
    #[inline]
    pub fn offset(&self, page_size: usize) -> u64 {
        (self.0 as u64) * (page_size as u64)
    }

    /// Position of this block in a `Vec` of blocks.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_id_new() {
        let block = BlockId::new(42);
        assert_eq!(block.0, 42);
        assert_eq!(block.index(), 42);
    }

    #[test]
    fn test_block_id_offset() {
        assert_eq!(BlockId::new(0).offset(4), 0);
        assert_eq!(BlockId::new(3).offset(4), 12);
        assert_eq!(BlockId::new(u32::MAX).offset(4096), (u32::MAX as u64) * 4096);
    }

    #[test]
    fn test_block_id_ordering() {
        assert!(BlockId::new(1) < BlockId::new(2));
        assert!(BlockId::new(5) > BlockId::new(3));
    }

    #[test]
    fn test_block_id_display() {
        assert_eq!(format!("{}", BlockId::new(42)), "Block(42)");
    }
}
