//! File backend - block I/O over a single file.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::common::{BlockId, Error, Result};
use crate::storage::StorageBackend;

/// A backing store kept in one file.
///
/// # File Layout
/// Blocks are laid out back to back with no header:
/// ```text
/// ┌─────────┬─────────┬─────────┬─────────┐
/// │ Block 0 │ Block 1 │  ...    │ Block N │
/// └─────────┴─────────┴─────────┴─────────┘
/// Offset:  0    page_size   ...  N×page_size
/// ```
///
/// # Durability
/// Every write is followed by `sync_data()`.
pub struct FileBackend {
    file: File,
    path: PathBuf,
    page_size: usize,
    num_blocks: u32,
}

impl FileBackend {
    /// Open the store at `path`, creating it if it does not exist.
    ///
    /// A file shorter than `num_blocks × page_size` is extended with zeros
    /// so every in-range block can be read in full. Longer files are left
    /// alone.
    ///
    /// # Errors
    /// `Error::Open` if the file cannot be opened, created or extended.
    pub fn open<P: AsRef<Path>>(path: P, page_size: usize, num_blocks: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let open_err = |source| Error::Open {
            path: path.clone(),
            source,
        };

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(open_err)?;

        let wanted = (num_blocks as u64) * (page_size as u64);
        let current = file.metadata().map_err(open_err)?.len();
        if current < wanted {
            debug!(
                "extending {} from {} to {} bytes",
                path.display(),
                current,
                wanted
            );
            file.set_len(wanted).map_err(open_err)?;
        }

        Ok(Self {
            file,
            path,
            page_size,
            num_blocks,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_range(&self, block: BlockId, len: usize) -> Result<()> {
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

impl StorageBackend for FileBackend {
    fn page_size(&self) -> usize {
        self.page_size
    }

    fn num_blocks(&self) -> u32 {
        self.num_blocks
    }

    fn read_block(&mut self, block: BlockId, buf: &mut [u8]) -> Result<()> {
        self.check_range(block, buf.len())?;
        trace!("reading {} from {}", block, self.path.display());

        self.file
            .seek(SeekFrom::Start(block.offset(self.page_size)))
            .map_err(|e| Error::io(block, e))?;

        // Keep reading until the block is full or the file ends.
        let mut filled = 0;
        while filled < buf.len() {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::io(block, e)),
            }
        }

        if filled < buf.len() {
            return Err(Error::ShortRead {
                block,
                expected: buf.len(),
                actual: filled,
            });
        }

        Ok(())
    }

    fn write_block(&mut self, block: BlockId, data: &[u8]) -> Result<()> {
        self.check_range(block, data.len())?;
        trace!("writing {} to {}", block, self.path.display());

        self.file
            .seek(SeekFrom::Start(block.offset(self.page_size)))
            .map_err(|e| Error::io(block, e))?;
        self.file.write_all(data).map_err(|e| Error::io(block, e))?;
        self.file.sync_data().map_err(|e| Error::io(block, e))?;

        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        // The descriptor itself is released on drop.
        self.file.sync_all().map_err(Error::Close)
    }
}
