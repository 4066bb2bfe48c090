//! Error types for framepool.

use std::path::PathBuf;

use thiserror::Error;

use crate::common::{BlockId, FrameId};

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in framepool.
///
/// Variants fall into three classes:
/// - configuration: the pool cannot be brought up at all
/// - I/O: a block read or write failed mid-operation
/// - invalid argument: the request was rejected before touching any state
///
/// The first two are fatal (see [`Error::is_fatal`]). Callers should stop
/// using the pool rather than risk serving stale data. Invalid arguments
/// leave the pool unchanged and usable.
#[derive(Debug, Error)]
pub enum Error {
    /// The backing store could not be opened or created.
    #[error("cannot open backing store {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The pool sizing is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A block read or write failed.
    #[error("I/O error on {block}: {source}")]
    Io {
        block: BlockId,
        #[source]
        source: std::io::Error,
    },

    /// Releasing the backing store failed. Logged by the pool, never fatal.
    #[error("error closing backing store: {0}")]
    Close(#[source] std::io::Error),

    /// The backing store returned fewer bytes than a full block.
    #[error("short read on {block}: expected {expected} bytes, got {actual}")]
    ShortRead {
        block: BlockId,
        expected: usize,
        actual: usize,
    },

    /// Block index past the end of the backing store.
    #[error("{block} out of range (store has {num_blocks} blocks)")]
    BlockOutOfRange { block: BlockId, num_blocks: u32 },

    /// Frame index past the end of the frame table.
    #[error("{frame} out of range (pool has {num_frames} frames)")]
    FrameOutOfRange { frame: FrameId, num_frames: usize },

    /// Write payload is not exactly one block long.
    #[error("data size must be {expected} bytes, got {actual}")]
    PayloadSize { expected: usize, actual: usize },

    /// Attempted to write into a frame that holds no block.
    #[error("{0} is not in use")]
    FrameNotOccupied(FrameId),
}

impl Error {
    /// Whether the error leaves the pool in a state the caller should not
    /// keep using.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Open { .. } | Error::InvalidConfig(_) | Error::Io { .. } | Error::ShortRead { .. }
        )
    }

    pub(crate) fn io(block: BlockId, source: std::io::Error) -> Self {
        Error::Io { block, source }
    }
}
