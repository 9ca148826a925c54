//! Error types for commit log operations.

use std::io;

/// Errors that can occur while operating on the commit log.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Filesystem or memory-map I/O error, propagated verbatim.
    #[error("filesystem error: {0}")]
    Io(#[from] io::Error),

    /// No segment in the log covers the requested offset.
    #[error("offset {offset} out of range")]
    OffsetOutOfRange { offset: u64 },

    /// An index cannot be backed by a zero-capacity file.
    #[error("index cannot be backed by an empty file")]
    EmptyIndexFile,

    /// The index has no room for another entry.
    #[error("index is full")]
    IndexFull,

    /// A positional index read past the live entries.
    #[error("no index entry at slot {slot}")]
    IndexOutOfBounds { slot: u32 },

    /// A stored record is too short to decode.
    #[error("record truncated: {actual} bytes, need at least {expected}")]
    TruncatedRecord { expected: usize, actual: usize },

    /// A stored record's length field disagrees with the bytes present.
    #[error("record length mismatch: header claims {claimed} bytes, found {actual}")]
    RecordLengthMismatch { claimed: usize, actual: usize },

    /// A file in the log directory does not follow `{offset}.{ext}` naming.
    #[error("unrecognized file in log directory: {name}")]
    InvalidSegmentFile { name: String },

    /// The log has been closed.
    #[error("log is closed")]
    Closed,

    /// A lock was poisoned by a panic on another thread.
    #[error("lock poisoned")]
    LockPoisoned,
}
