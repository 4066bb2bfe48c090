//! Buffer pool statistics tracking.

use std::fmt;

/// Counters kept by the buffer pool.
///
/// The pool is single-threaded, so these are plain integers; `stats()`
/// hands out a copy.
///
/// # Example
/// ```
/// use framepool::BufferPoolStats;
///
/// let stats = BufferPoolStats {
///     cache_hits: 3,
///     cache_misses: 1,
///     ..BufferPoolStats::default()
/// };
/// assert_eq!(stats.hit_rate(), 0.75);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferPoolStats {
    /// Fetches served by a resident frame.
    pub cache_hits: u64,

    /// Fetches that loaded the block from the backend.
    pub cache_misses: u64,

    /// Occupied frames released, dirty or clean.
    pub evictions: u64,

    /// Blocks read from the backend.
    pub blocks_read: u64,

    /// Blocks written back to the backend.
    pub blocks_written: u64,
}

impl BufferPoolStats {
    /// Calculate cache hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for BufferPoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ hits: {}, misses: {}, evictions: {}, reads: {}, writes: {}, hit_rate: {:.2}% }}",
            self.cache_hits,
            self.cache_misses,
            self.evictions,
            self.blocks_read,
            self.blocks_written,
            self.hit_rate() * 100.0
        )
    }
}
