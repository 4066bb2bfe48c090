//! Results of pool operations that are not errors.

use crate::common::{BlockId, FrameId};

/// What `fetch` did with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The block was already resident. No I/O happened.
    Hit(FrameId),

    /// The block was read into a free frame.
    Loaded(FrameId),

    /// The victim frame was evicted and the block read into it.
    Replaced { frame: FrameId, evicted: Eviction },

    /// Every frame is occupied. Nothing changed; call
    /// `fetch_evicting` with a victim of your choosing.
    NeedsVictim,
}

impl FetchOutcome {
    /// The frame now holding the block, unless a victim is still needed.
    pub fn frame(&self) -> Option<FrameId> {
        match *self {
            FetchOutcome::Hit(frame) | FetchOutcome::Loaded(frame) => Some(frame),
            FetchOutcome::Replaced { frame, .. } => Some(frame),
            FetchOutcome::NeedsVictim => None,
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, FetchOutcome::Hit(_))
    }
}

/// What `evict` found in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eviction {
    /// The frame was already empty.
    Empty,

    /// The frame held a clean block; no write happened.
    Clean(BlockId),

    /// The frame was dirty and its bytes were written to this block.
    WrittenBack(BlockId),
}

impl Eviction {
    /// The block that left the pool, if any.
    pub fn block(&self) -> Option<BlockId> {
        match *self {
            Eviction::Empty => None,
            Eviction::Clean(block) | Eviction::WrittenBack(block) => Some(block),
        }
    }
}

/// Summary of a power-off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Blocks written back, in frame order.
    pub written_back: Vec<BlockId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_outcome_frame() {
        assert_eq!(FetchOutcome::Hit(FrameId::new(1)).frame(), Some(FrameId::new(1)));
        assert_eq!(
            FetchOutcome::Replaced {
                frame: FrameId::new(0),
                evicted: Eviction::Clean(BlockId::new(4)),
            }
            .frame(),
            Some(FrameId::new(0))
        );
        assert_eq!(FetchOutcome::NeedsVictim.frame(), None);
        assert!(!FetchOutcome::Loaded(FrameId::new(2)).is_hit());
    }

    #[test]
    fn test_eviction_block() {
        assert_eq!(Eviction::Empty.block(), None);
        assert_eq!(Eviction::Clean(BlockId::new(1)).block(), Some(BlockId::new(1)));
        assert_eq!(
            Eviction::WrittenBack(BlockId::new(2)).block(),
            Some(BlockId::new(2))
        );
    }
}
