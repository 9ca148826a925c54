//! Segment: one store paired with one index.
//!
//! A segment covers a contiguous offset range `[base_offset, next_offset)`.
//! Its two backing files are named by the base offset: `{base}.store` and
//! `{base}.index`. The segment is the only layer that touches the record
//! codec; the store below it sees opaque payloads.

use std::fs::{self, OpenOptions};
use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use crate::{Config, Error, Index, Record, Store};

/// A contiguous slice of the log: a store and the index into it.
///
/// # Invariants
///
/// - `base_offset` is immutable; `next_offset` only grows, by one per append
/// - for every offset in `[base_offset, next_offset)` the index holds an
///   entry for `offset - base_offset`, and the store holds a decodable
///   record at that entry's position whose embedded offset is `offset`
#[derive(Debug)]
pub struct Segment {
    store: Store,
    index: Index,
    base_offset: u64,
    next_offset: u64,
    max_store_bytes: u64,
    max_index_bytes: u64,
}

impl Segment {
    /// Opens the segment based at `base_offset` under `dir`, creating its
    /// files if absent.
    ///
    /// A reopened segment recovers `next_offset` from the last index entry;
    /// a fresh one starts at `base_offset`.
    pub fn new(dir: impl AsRef<Path>, base_offset: u64, config: &Config) -> Result<Self, Error> {
        let dir = dir.as_ref();

        let store_path = dir.join(format!("{base_offset}.store"));
        let store_file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&store_path)?;
        let store = Store::new(store_file, store_path)?;

        let index_path = dir.join(format!("{base_offset}.index"));
        let index_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&index_path)?;
        let index = Index::new(index_file, index_path, config.max_index_bytes)?;

        // The index is the single source of truth for how far this segment
        // got: one past the last indexed relative offset, or the base when
        // nothing was ever written.
        let next_offset = match index.read_last() {
            Some((rel, _)) => base_offset + u64::from(rel) + 1,
            None => base_offset,
        };

        debug!(base_offset, next_offset, "segment opened");

        Ok(Self {
            store,
            index,
            base_offset,
            next_offset,
            max_store_bytes: config.max_store_bytes,
            max_index_bytes: config.max_index_bytes,
        })
    }

    /// Appends `value` to the segment, returning the offset assigned to it.
    ///
    /// The record is encoded with `next_offset` as its authoritative offset,
    /// stored, and indexed under the offset relative to the segment base.
    /// An index with no room left fails with [`Error::IndexFull`] and the
    /// record already written to the store is abandoned; the caller is
    /// expected to rotate to a fresh segment instead of retrying here.
    pub fn append(&mut self, value: Bytes) -> Result<u64, Error> {
        let offset = self.next_offset;

        let record = Record::new(offset, value);
        let (_, position) = self.store.append(&record.encode())?;

        let rel_offset = (offset - self.base_offset) as u32;
        self.index.write(rel_offset, position)?;

        self.next_offset += 1;

        Ok(offset)
    }

    /// Returns the record at the absolute `offset`.
    pub fn read(&self, offset: u64) -> Result<Record, Error> {
        let rel_offset = offset
            .checked_sub(self.base_offset)
            .ok_or(Error::OffsetOutOfRange { offset })? as u32;

        let (_, position) = self.index.read(rel_offset)?;
        let data = self.store.read(position)?;

        Record::decode(&data)
    }

    /// Reports whether the segment has reached either of its size limits.
    ///
    /// A full segment stays readable; it just must not receive further
    /// appends.
    pub fn is_full(&self) -> Result<bool, Error> {
        Ok(self.index.size() >= self.max_index_bytes || self.store.size()? >= self.max_store_bytes)
    }

    /// Returns the absolute offset of the segment's first record.
    pub fn base_offset(&self) -> u64 {
        self.base_offset
    }

    /// Returns one past the absolute offset of the segment's last record.
    pub fn next_offset(&self) -> u64 {
        self.next_offset
    }

    /// Closes the index, then the store.
    pub fn close(self) -> Result<(), Error> {
        self.index.close()?;
        self.store.close()?;

        Ok(())
    }

    /// Closes the segment and deletes both backing files.
    pub fn remove(self) -> Result<(), Error> {
        let store_path = self.store.path().to_path_buf();
        let index_path = self.index.path().to_path_buf();

        self.close()?;

        fs::remove_file(&index_path)?;
        fs::remove_file(&store_path)?;

        Ok(())
    }
}
