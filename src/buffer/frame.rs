//! Frame - a slot in the buffer pool.
//!
//! A [`Frame`] holds one block's bytes plus the metadata the pool needs:
//! - Which block is loaded (if any)
//! - Dirty flag for write-back tracking

use std::fmt;

use crate::common::{BlockId, FrameId};

/// A frame in the buffer pool.
///
/// The byte buffer is allocated once, at pool construction, and is exactly
/// `page_size` bytes for the frame's whole life.
///
/// # Invariant
/// An empty frame (`block() == None`) is never dirty.
#[derive(Debug)]
pub struct Frame {
    /// The block's bytes. Contents are meaningless while the frame is empty.
    data: Box<[u8]>,

    /// Which block is currently loaded, or None if the frame is empty.
    block: Option<BlockId>,

    /// Whether the bytes have been modified since loading.
    dirty: bool,
}

impl Frame {
    /// Create a new empty frame with a zeroed buffer.
    pub(crate) fn new(page_size: usize) -> Self {
        Self {
            data: vec![0u8; page_size].into_boxed_slice(),
            block: None,
            dirty: false,
        }
    }

    /// The frame's bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The block held by this frame.
    #[inline]
    pub fn block(&self) -> Option<BlockId> {
        self.block
    }

    /// Whether the frame holds a block.
    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.block.is_some()
    }

    /// Check if the frame is dirty.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record that the buffer now mirrors `block` as stored.
    pub(crate) fn install(&mut self, block: BlockId) {
        self.block = Some(block);
        self.dirty = false;
    }

    /// Replace the buffer contents and mark the frame dirty.
    ///
    /// The caller has already checked occupancy and length.
    pub(crate) fn overwrite(&mut self, data: &[u8]) {
        debug_assert!(self.is_occupied(), "overwrite of an empty frame");
        self.data.copy_from_slice(data);
        self.dirty = true;
    }

    /// Reset the frame to empty.
    pub(crate) fn reset(&mut self) {
        self.data.fill(0);
        self.block = None;
        self.dirty = false;
    }

    /// Copy out a displayable snapshot.
    pub(crate) fn state(&self, frame: FrameId) -> FrameState {
        FrameState {
            frame,
            block: self.block,
            dirty: self.dirty,
            data: self.data.to_vec(),
        }
    }
}

/// A point-in-time copy of one frame, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameState {
    pub frame: FrameId,
    pub block: Option<BlockId>,
    pub dirty: bool,
    pub data: Vec<u8>,
}

impl FrameState {
    /// Whether the frame held a block.
    pub fn is_occupied(&self) -> bool {
        self.block.is_some()
    }
}

/// `[]` for an empty frame, `[2:WXYZ]` for a clean one holding block 2,
/// `[*2:WXYZ]` when dirty.
impl fmt::Display for FrameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.block {
            None => write!(f, "[]"),
            Some(block) => write!(
                f,
                "[{}{}:{}]",
                if self.dirty { "*" } else { "" },
                block.0,
                String::from_utf8_lossy(&self.data)
            ),
        }
    }
}
