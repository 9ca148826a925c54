//! Memory-mapped offset index.
//!
//! The index maps a record's offset relative to its segment's base onto the
//! byte position of that record in the store. Entries are fixed-width, so a
//! lookup is a single bounds-checked slice of the mapping:
//!
//! ```text
//! [rel offset:u32 BE][position:u64 BE]   <- 12 bytes per entry
//! ```
//!
//! # Recovery protocol
//!
//! On open the backing file is grown to its full capacity (`max_bytes`) and
//! memory-mapped; the in-memory `size` — the live-entry byte count — is taken
//! from the file length *before* that growth. On close the mapping is
//! flushed, the file is fsynced and truncated back down to `size`. The
//! stat-before-truncate at open and truncate-at-close together are the
//! entire crash-recovery story: a freshly created file reports zero live
//! entries, a cleanly closed one reports exactly the entries it held.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::MmapMut;

use crate::Error;

/// Width of the relative-offset field of an entry.
pub(crate) const OFFSET_WIDTH: u64 = 4;
/// Width of the position field of an entry.
pub(crate) const POSITION_WIDTH: u64 = 8;
/// Total width of an index entry.
pub(crate) const ENTRY_WIDTH: u64 = OFFSET_WIDTH + POSITION_WIDTH;

/// Fixed-width table associating relative record offsets with store
/// positions.
///
/// The index is single-writer by construction: exactly one segment owns it,
/// and the log serializes that segment's appends. Reads are plain loads from
/// the mapping and are safe whenever no writer is active.
#[derive(Debug)]
pub struct Index {
    file: File,
    path: PathBuf,
    mmap: MmapMut,
    /// Live bytes, not file bytes: the file is `max_bytes` long while open.
    size: u64,
}

impl Index {
    /// Creates an index over an open file, pre-allocated to `max_bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyIndexFile`] when `max_bytes` is zero — a
    /// zero-length mapping can hold nothing and cannot be created.
    pub fn new(file: File, path: impl Into<PathBuf>, max_bytes: u64) -> Result<Self, Error> {
        if max_bytes == 0 {
            return Err(Error::EmptyIndexFile);
        }

        // Captured before the truncation below: this is how many bytes of
        // entries a previous, cleanly closed index left behind.
        let size = file.metadata()?.len();

        file.set_len(max_bytes)?;

        // SAFETY: the file stays open for as long as the mapping lives (both
        // are owned by this Index and dropped together), and the map covers
        // exactly the `max_bytes` the file was just extended to.
        let mmap = unsafe { MmapMut::map_mut(&file)? };

        Ok(Self {
            file,
            path: path.into(),
            mmap,
            size,
        })
    }

    /// Appends an entry associating `rel_offset` with `position`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexFull`] when no room remains; the caller decides
    /// whether that means rotating to a fresh segment.
    pub fn write(&mut self, rel_offset: u32, position: u64) -> Result<(), Error> {
        if (self.mmap.len() as u64) < self.size + ENTRY_WIDTH {
            return Err(Error::IndexFull);
        }

        let at = self.size as usize;
        self.mmap[at..at + OFFSET_WIDTH as usize].copy_from_slice(&rel_offset.to_be_bytes());
        self.mmap[at + OFFSET_WIDTH as usize..at + ENTRY_WIDTH as usize]
            .copy_from_slice(&position.to_be_bytes());

        self.size += ENTRY_WIDTH;

        Ok(())
    }

    /// Returns the entry at `slot` as `(relative offset, position)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] when `slot` is past the live
    /// entries.
    pub fn read(&self, slot: u32) -> Result<(u32, u64), Error> {
        self.entry(slot)
    }

    /// Returns the last live entry, or `None` when the index is empty.
    ///
    /// A reopened segment derives its next offset from this entry.
    pub fn read_last(&self) -> Option<(u32, u64)> {
        if self.size == 0 {
            return None;
        }

        let last = (self.size / ENTRY_WIDTH - 1) as u32;
        self.entry(last).ok()
    }

    /// Bounds-checked entry accessor; the mapped region is never handed out
    /// raw.
    fn entry(&self, slot: u32) -> Result<(u32, u64), Error> {
        let at = u64::from(slot) * ENTRY_WIDTH;
        let end = at + ENTRY_WIDTH;

        if self.size < end || (self.mmap.len() as u64) < end {
            return Err(Error::IndexOutOfBounds { slot });
        }

        let at = at as usize;
        let rel_offset = u32::from_be_bytes(
            self.mmap[at..at + OFFSET_WIDTH as usize]
                .try_into()
                .expect("slice is exactly 4 bytes after bounds check"),
        );
        let position = u64::from_be_bytes(
            self.mmap[at + OFFSET_WIDTH as usize..at + ENTRY_WIDTH as usize]
                .try_into()
                .expect("slice is exactly 8 bytes after bounds check"),
        );

        Ok((rel_offset, position))
    }

    /// Returns the live size of the index in bytes.
    ///
    /// This counts written entries, not the pre-allocated file length.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the path of the file backing the index.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes the mapping to disk and truncates the file down to its live
    /// size.
    ///
    /// The truncation is what makes the pre-truncation stat in
    /// [`Index::new`] a reliable recovery signal on the next open. The
    /// mapping is dropped before the file descriptor.
    pub fn close(self) -> Result<(), Error> {
        let Index {
            file, mmap, size, ..
        } = self;

        mmap.flush()?;
        file.sync_all()?;
        file.set_len(size)?;

        drop(mmap);
        drop(file);

        Ok(())
    }
}
