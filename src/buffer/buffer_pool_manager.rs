//! Buffer Pool Manager - the core block caching layer.
//!
//! The [`BufferPoolManager`] provides:
//! - Block caching between the backing store and a fixed frame table
//! - Dirty tracking with write-back on eviction
//! - Caller-chosen eviction when the pool is full
//! - Flush-on-power-off

use std::path::Path;

use log::{debug, error, info, warn};

use crate::buffer::{BufferPoolStats, Eviction, FetchOutcome, Frame, FrameState, ShutdownReport};
use crate::common::{BlockId, Error, FrameId, PoolConfig, Result};
use crate::storage::{FileBackend, StorageBackend};

/// Manages a fixed table of frames caching blocks from a backend.
///
/// # Architecture
/// ```text
/// ┌─────────────────────────────────────────────────────┐
/// │                  BufferPoolManager                  │
/// │  ┌───────────────────────────────────────────────┐  │
/// │  │           frames: Vec<Frame>                  │  │
/// │  │  [Frame0] [Frame1] [Frame2] ...               │  │
/// │  │  block + dirty + page_size bytes each         │  │
/// │  └───────────────────────────────────────────────┘  │
/// │  ┌──────────────┐  ┌──────────────┐  ┌──────────┐   │
/// │  │    config    │  │   backend    │  │  stats   │   │
/// │  │  PoolConfig  │  │ B: Storage.. │  │ counters │   │
/// │  └──────────────┘  └──────────────┘  └──────────┘   │
/// └─────────────────────────────────────────────────────┘
/// ```
///
/// # Frame lifecycle
/// ```text
/// Empty --fetch (miss)--> Clean --write--> Dirty
///   ^                       |                |
///   +-------evict-----------+----evict-------+  (dirty: write-back first)
/// ```
/// A hit leaves the frame in whatever state it was in.
///
/// # Eviction
/// The pool never picks a victim. When every frame is occupied, `fetch`
/// returns [`FetchOutcome::NeedsVictim`] and the caller names one through
/// [`fetch_evicting`](Self::fetch_evicting) or [`fetch_with`](Self::fetch_with).
/// Every write-back in the pool goes through [`evict`](Self::evict).
///
/// # Usage
/// ```
/// use framepool::{BlockId, BufferPoolManager, PoolConfig};
/// use framepool::storage::MemoryBackend;
///
/// let config = PoolConfig::default();
/// let mut bpm = BufferPoolManager::new(config, MemoryBackend::for_config(&config)).unwrap();
///
/// let frame = bpm.fetch(BlockId::new(2)).unwrap().frame().unwrap();
/// bpm.write_to_frame(frame, b"WXYZ").unwrap();
///
/// let report = bpm.power_off().unwrap();
/// assert_eq!(report.written_back, vec![BlockId::new(2)]);
/// ```
pub struct BufferPoolManager<B: StorageBackend> {
    /// Sizing, fixed at construction.
    config: PoolConfig,

    /// Fixed pool of frames allocated at startup.
    frames: Vec<Frame>,

    /// Handles all block I/O.
    backend: B,

    /// Performance statistics.
    stats: BufferPoolStats,

    /// Set once shutdown has run, so drop does not run it again.
    powered_off: bool,

    /// Set after a fatal I/O error. Shutdown then closes the backend
    /// without writing anything back.
    failed: bool,
}

impl BufferPoolManager<FileBackend> {
    /// Power on a pool over the file at `path`, creating it if needed.
    ///
    /// # Errors
    /// `Error::Open` if the file cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P, config: PoolConfig) -> Result<Self> {
        let backend = FileBackend::open(path, config.page_size(), config.num_blocks())?;
        Self::new(config, backend)
    }
}

impl<B: StorageBackend> BufferPoolManager<B> {
    /// Power on a pool over an already opened backend.
    ///
    /// All frames start empty.
    ///
    /// # Errors
    /// `Error::InvalidConfig` if the backend's block size differs from the
    /// config, or it has fewer blocks than the config expects.
    pub fn new(config: PoolConfig, backend: B) -> Result<Self> {
        if backend.page_size() != config.page_size() {
            return Err(Error::InvalidConfig(format!(
                "backend block size {} does not match page size {}",
                backend.page_size(),
                config.page_size()
            )));
        }
        if backend.num_blocks() < config.num_blocks() {
            return Err(Error::InvalidConfig(format!(
                "backend has {} blocks, pool needs {}",
                backend.num_blocks(),
                config.num_blocks()
            )));
        }

        // Allocate all frames upfront
        let frames = (0..config.num_frames())
            .map(|_| Frame::new(config.page_size()))
            .collect();

        debug!(
            "power on: {} frames, {} byte pages, {} blocks",
            config.num_frames(),
            config.page_size(),
            config.num_blocks()
        );

        Ok(Self {
            config,
            frames,
            backend,
            stats: BufferPoolStats::default(),
            powered_off: false,
            failed: false,
        })
    }

    // ========================================================================
    // Public API: Fetch blocks
    // ========================================================================

    /// Bring `block` into the pool.
    ///
    /// Returns `Hit` if it is already resident, `Loaded` after reading it
    /// into the lowest-numbered free frame, or `NeedsVictim` (with nothing
    /// changed) when every frame is occupied.
    ///
    /// # Errors
    /// - `Error::BlockOutOfRange` if `block` is past the end of the store
    /// - `Error::Io` / `Error::ShortRead` if the read fails
    pub fn fetch(&mut self, block: BlockId) -> Result<FetchOutcome> {
        self.check_block(block)?;

        if let Some(frame_id) = self.frame_of(block) {
            return Ok(self.hit(frame_id, block));
        }

        match self.first_free_frame() {
            Some(frame_id) => {
                self.load(frame_id, block)?;
                Ok(FetchOutcome::Loaded(frame_id))
            }
            None => {
                debug!("no free frame for {}, victim needed", block);
                Ok(FetchOutcome::NeedsVictim)
            }
        }
    }

    /// Bring `block` into the pool, evicting `victim` if no frame is free.
    ///
    /// A resident block is a hit and a free frame is used if one exists; in
    /// both cases `victim` is left alone.
    ///
    /// # Errors
    /// - `Error::BlockOutOfRange` / `Error::FrameOutOfRange`, before any
    ///   state changes
    /// - I/O errors from the victim's write-back or the block read
    pub fn fetch_evicting(&mut self, block: BlockId, victim: FrameId) -> Result<FetchOutcome> {
        self.check_block(block)?;
        self.check_frame(victim)?;

        if let Some(frame_id) = self.frame_of(block) {
            return Ok(self.hit(frame_id, block));
        }

        if let Some(frame_id) = self.first_free_frame() {
            self.load(frame_id, block)?;
            return Ok(FetchOutcome::Loaded(frame_id));
        }

        let evicted = self.evict(victim)?;
        self.load(victim, block)?;

        Ok(FetchOutcome::Replaced {
            frame: victim,
            evicted,
        })
    }

    /// Bring `block` into the pool, asking `choose` for a victim only if
    /// the pool is full.
    ///
    /// `choose` sees the frame table, indexed by frame id.
    pub fn fetch_with<F>(&mut self, block: BlockId, choose: F) -> Result<FetchOutcome>
    where
        F: FnOnce(&[Frame]) -> FrameId,
    {
        match self.fetch(block)? {
            FetchOutcome::NeedsVictim => {
                let victim = choose(&self.frames);
                self.fetch_evicting(block, victim)
            }
            outcome => Ok(outcome),
        }
    }

    // ========================================================================
    // Public API: Modify and evict frames
    // ========================================================================

    /// Overwrite an occupied frame with `data` and mark it dirty.
    ///
    /// Nothing is written to the backend until the frame is evicted or the
    /// pool powers off.
    ///
    /// # Errors
    /// Rejected without touching the frame if `frame_id` is out of range,
    /// the frame is empty, or `data` is not exactly one page.
    pub fn write_to_frame(&mut self, frame_id: FrameId, data: &[u8]) -> Result<()> {
        self.check_frame(frame_id)?;

        if !self.frames[frame_id.0].is_occupied() {
            warn!("write rejected: {} is not in use", frame_id);
            return Err(Error::FrameNotOccupied(frame_id));
        }

        if data.len() != self.config.page_size() {
            warn!(
                "write rejected: {} bytes for a {} byte page",
                data.len(),
                self.config.page_size()
            );
            return Err(Error::PayloadSize {
                expected: self.config.page_size(),
                actual: data.len(),
            });
        }

        self.frames[frame_id.0].overwrite(data);
        debug!("data written to {}, marked dirty", frame_id);

        Ok(())
    }

    /// Release a frame, writing it back first if dirty.
    ///
    /// Evicting an empty frame is a no-op returning `Eviction::Empty`.
    ///
    /// # Errors
    /// - `Error::FrameOutOfRange` for a dangling index
    /// - I/O errors from the write-back. The frame then keeps its block and
    ///   dirty bit.
    pub fn evict(&mut self, frame_id: FrameId) -> Result<Eviction> {
        self.check_frame(frame_id)?;

        let frame = &mut self.frames[frame_id.0];

        let Some(block) = frame.block() else {
            debug!("{} is empty, nothing to evict", frame_id);
            return Ok(Eviction::Empty);
        };

        let eviction = if frame.is_dirty() {
            info!("{} is dirty, writing back to {}", frame_id, block);
            if let Err(e) = self.backend.write_block(block, frame.data()) {
                error!("write-back of {} from {} failed: {}", block, frame_id, e);
                self.failed |= e.is_fatal();
                return Err(e);
            }
            self.stats.blocks_written += 1;
            Eviction::WrittenBack(block)
        } else {
            debug!("{} is not dirty, no write", frame_id);
            Eviction::Clean(block)
        };

        frame.reset();
        self.stats.evictions += 1;

        Ok(eviction)
    }

    /// Write back every dirty frame, then close the backend.
    ///
    /// Clean frames are left as they are. If a write-back fails the
    /// remaining frames are not attempted, the backend is still closed, and
    /// the error is returned.
    ///
    /// After an earlier fatal I/O error nothing is written back; the
    /// backend is only closed.
    pub fn power_off(mut self) -> Result<ShutdownReport> {
        self.shutdown()
    }

    // ========================================================================
    // Public API: Inspection
    // ========================================================================

    /// Snapshot of every frame, in frame order.
    pub fn describe_frames(&self) -> Vec<FrameState> {
        self.frames
            .iter()
            .enumerate()
            .map(|(i, frame)| frame.state(FrameId::new(i)))
            .collect()
    }

    /// Snapshot of one frame.
    pub fn frame_state(&self, frame_id: FrameId) -> Result<FrameState> {
        self.check_frame(frame_id)?;
        Ok(self.frames[frame_id.0].state(frame_id))
    }

    /// Bytes currently held by a frame.
    pub fn frame_data(&self, frame_id: FrameId) -> Result<&[u8]> {
        self.check_frame(frame_id)?;
        Ok(self.frames[frame_id.0].data())
    }

    /// The frame holding `block`, if it is resident. Never does I/O.
    pub fn frame_of(&self, block: BlockId) -> Option<FrameId> {
        self.frames
            .iter()
            .position(|frame| frame.block() == Some(block))
            .map(FrameId::new)
    }

    /// The pool's sizing.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Get buffer pool statistics.
    pub fn stats(&self) -> BufferPoolStats {
        self.stats
    }

    /// Get the number of empty frames.
    pub fn free_frame_count(&self) -> usize {
        self.frames.iter().filter(|f| !f.is_occupied()).count()
    }

    /// Get the number of resident blocks.
    pub fn resident_count(&self) -> usize {
        self.frames.iter().filter(|f| f.is_occupied()).count()
    }

    // ========================================================================
    // Internal
    // ========================================================================

    fn check_block(&self, block: BlockId) -> Result<()> {
        if block.0 >= self.config.num_blocks() {
            warn!("invalid block number: {}", block);
            return Err(Error::BlockOutOfRange {
                block,
                num_blocks: self.config.num_blocks(),
            });
        }
        Ok(())
    }

    fn check_frame(&self, frame_id: FrameId) -> Result<()> {
        if frame_id.0 >= self.frames.len() {
            warn!("invalid frame id: {}", frame_id);
            return Err(Error::FrameOutOfRange {
                frame: frame_id,
                num_frames: self.frames.len(),
            });
        }
        Ok(())
    }

    fn hit(&mut self, frame_id: FrameId, block: BlockId) -> FetchOutcome {
        debug!("{} is already fetched, {}", block, frame_id);
        self.stats.cache_hits += 1;
        FetchOutcome::Hit(frame_id)
    }

    /// Lowest-numbered empty frame.
    fn first_free_frame(&self) -> Option<FrameId> {
        self.frames
            .iter()
            .position(|frame| !frame.is_occupied())
            .map(FrameId::new)
    }

    /// Read `block` into an empty frame.
    fn load(&mut self, frame_id: FrameId, block: BlockId) -> Result<()> {
        let frame = &mut self.frames[frame_id.0];
        debug_assert!(!frame.is_occupied(), "load into an occupied frame");

        if let Err(e) = self.backend.read_block(block, frame.data_mut()) {
            error!("reading {} into {} failed: {}", block, frame_id, e);
            // Drop whatever partial bytes landed in the buffer.
            frame.reset();
            self.failed |= e.is_fatal();
            return Err(e);
        }

        frame.install(block);
        self.stats.cache_misses += 1;
        self.stats.blocks_read += 1;
        debug!("{} loaded into {}", block, frame_id);

        Ok(())
    }

    fn shutdown(&mut self) -> Result<ShutdownReport> {
        self.powered_off = true;

        let mut report = ShutdownReport::default();
        let mut result = Ok(());

        if self.failed {
            let stranded = self.frames.iter().filter(|f| f.is_dirty()).count();
            warn!("skipping write-back after a fatal I/O error ({} dirty frames dropped)", stranded);
        }

        for i in 0..self.frames.len() {
            // A failed write-back is not retried.
            if self.failed {
                break;
            }

            let frame = &self.frames[i];
            if !(frame.is_occupied() && frame.is_dirty()) {
                continue;
            }

            match self.evict(FrameId::new(i)) {
                Ok(eviction) => report.written_back.extend(eviction.block()),
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }

        if let Err(e) = self.backend.close() {
            warn!("{}", e);
        }

        info!("halt ({} blocks written back)", report.written_back.len());
        result.map(|()| report)
    }
}

impl<B: StorageBackend> Drop for BufferPoolManager<B> {
    fn drop(&mut self) {
        if !self.powered_off {
            if let Err(e) = self.shutdown() {
                error!("power off during drop failed: {}", e);
            }
        }
    }
}
