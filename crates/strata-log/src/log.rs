//! The log: an ordered set of segments with an active tail.
//!
//! The log owns every segment under its directory. Appends always go to the
//! last (active) segment; when that segment reaches a size limit, the next
//! append rotates to a fresh segment based at the current tail offset.
//! Historical segments are immutable and can only disappear through
//! [`Log::compact`].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use bytes::Bytes;
use tracing::{debug, info};

use crate::{Config, Error, Record, Segment};

/// An ordered collection of segments sharing a directory.
///
/// # Invariants
///
/// - segments are sorted by base offset and contiguous: each segment's base
///   equals its predecessor's next offset
/// - the active segment is always the last element, and the only one that
///   grows
///
/// # Concurrency
///
/// Reads take a shared lock; appends, compaction, and close take an
/// exclusive one. The store's internal flush-before-read mutex makes shared
/// reads safe against the buffered write path.
#[derive(Debug)]
pub struct Log {
    dir: PathBuf,
    config: Config,
    segments: RwLock<Vec<Segment>>,
}

impl Log {
    /// Opens the log under `dir`, creating the directory if needed.
    ///
    /// Existing segment files are discovered by their `{offset}.{ext}`
    /// names; one segment is opened per store/index pair and the one with
    /// the largest base offset becomes active. A fresh directory gets a
    /// single segment based at `config.initial_offset`.
    pub fn new(dir: impl Into<PathBuf>, config: Config) -> Result<Self, Error> {
        let dir = dir.into();
        let config = config.normalized();

        fs::create_dir_all(&dir)?;

        let mut base_offsets = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let name = entry?.file_name().to_string_lossy().into_owned();

            // Segment files are named {base offset}.{store|index}; the stem
            // is the base offset.
            let base = Path::new(&name)
                .file_stem()
                .and_then(|stem| stem.to_string_lossy().parse::<u64>().ok());

            match base {
                Some(base) => base_offsets.push(base),
                None => return Err(Error::InvalidSegmentFile { name }),
            }
        }

        // The store and the index of a segment share a base offset, so the
        // sorted list holds each base twice; one segment per unique base.
        base_offsets.sort_unstable();
        base_offsets.dedup();

        let mut segments = Vec::with_capacity(base_offsets.len().max(1));
        for base in &base_offsets {
            segments.push(Segment::new(&dir, *base, &config)?);
        }

        if segments.is_empty() {
            segments.push(Segment::new(&dir, config.initial_offset, &config)?);
        }

        info!(
            dir = %dir.display(),
            segments = segments.len(),
            next_offset = segments
                .last()
                .map(Segment::next_offset)
                .expect("at least one segment exists"),
            "log opened"
        );

        Ok(Self {
            dir,
            config,
            segments: RwLock::new(segments),
        })
    }

    /// Appends `value` to the log, returning the offset assigned to it.
    ///
    /// A full active segment is rotated out before the write: the new
    /// segment is based at the tail offset, appended to the segment list,
    /// and promoted to active. The returned offset is always that of the
    /// record just written.
    pub fn append(&self, value: Bytes) -> Result<u64, Error> {
        let mut segments = self.segments.write().map_err(|_| Error::LockPoisoned)?;

        let active = segments.last().ok_or(Error::Closed)?;

        if active.is_full()? {
            let base = active.next_offset();
            debug!(base_offset = base, "active segment full, rolling over");

            segments.push(Segment::new(&self.dir, base, &self.config)?);
        }

        segments
            .last_mut()
            .expect("at least one segment exists")
            .append(value)
    }

    /// Returns the record stored at `offset`.
    ///
    /// The owning segment is found by binary search over the sorted segment
    /// list.
    pub fn read(&self, offset: u64) -> Result<Record, Error> {
        let segments = self.segments.read().map_err(|_| Error::LockPoisoned)?;

        if segments.is_empty() {
            return Err(Error::Closed);
        }

        // Last segment whose base does not exceed the target.
        let idx = segments.partition_point(|seg| seg.base_offset() <= offset);
        let segment = idx
            .checked_sub(1)
            .and_then(|idx| segments.get(idx))
            .filter(|seg| offset < seg.next_offset())
            .ok_or(Error::OffsetOutOfRange { offset })?;

        segment.read(offset)
    }

    /// Returns the base offset of the first segment: the lowest offset any
    /// read can target.
    pub fn lowest_offset(&self) -> Result<u64, Error> {
        let segments = self.segments.read().map_err(|_| Error::LockPoisoned)?;

        segments
            .first()
            .map(Segment::base_offset)
            .ok_or(Error::Closed)
    }

    /// Returns the highest occupied offset, or 0 when the log is empty.
    pub fn highest_offset(&self) -> Result<u64, Error> {
        let segments = self.segments.read().map_err(|_| Error::LockPoisoned)?;

        let next = segments
            .last()
            .map(Segment::next_offset)
            .ok_or(Error::Closed)?;

        Ok(next.saturating_sub(1))
    }

    /// Removes every segment whose highest offset is below `lowest`.
    ///
    /// Segments are sorted, so removal stops at the first survivor. The
    /// active segment is never removed, which keeps the log non-empty and
    /// the append path valid.
    pub fn compact(&self, lowest: u64) -> Result<(), Error> {
        let mut segments = self.segments.write().map_err(|_| Error::LockPoisoned)?;

        if segments.is_empty() {
            return Err(Error::Closed);
        }

        let keep_from = segments
            .iter()
            .position(|seg| seg.next_offset() > lowest)
            .unwrap_or(segments.len() - 1);

        if keep_from == 0 {
            return Ok(());
        }

        info!(lowest, removed = keep_from, "compacting log");

        for segment in segments.drain(..keep_from) {
            segment.remove()?;
        }

        Ok(())
    }

    /// Closes every segment, flushing buffered records and truncating each
    /// index down to its live size.
    ///
    /// Further operations on the log fail with [`Error::Closed`].
    pub fn close(&self) -> Result<(), Error> {
        let mut segments = self.segments.write().map_err(|_| Error::LockPoisoned)?;

        for segment in segments.drain(..) {
            segment.close()?;
        }

        Ok(())
    }

    /// Closes the log and deletes its directory tree.
    pub fn remove(&self) -> Result<(), Error> {
        self.close()?;

        fs::remove_dir_all(&self.dir)?;

        Ok(())
    }

    /// Returns the directory the log lives in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
