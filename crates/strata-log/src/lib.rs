//! strata-log: Append-only segmented commit log
//!
//! This crate implements a durable, ordered sequence of opaque records
//! addressable by a monotonically increasing 64-bit offset. Records are
//! stored in segment files on disk; each segment pairs a record file with a
//! memory-mapped offset index so any record can be located with two reads.
//!
//! # Architecture
//!
//! ```text
//! Log          ordered set of segments, active tail, rollover, compaction
//!  └── Segment one store + one index under a base offset
//!       ├── Store  length-prefixed append-only record file
//!       └── Index  fixed-width mmap'd table: relative offset -> position
//! ```
//!
//! Appends flow down: the log routes to the active segment, which encodes
//! the record, appends it to the store, and writes the (relative offset,
//! byte position) pair into the index. Reads flow the same path in reverse.
//!
//! # File Layout
//!
//! ```text
//! data_dir/
//!   0.store      <- records: [len:u64 BE][payload] repeated
//!   0.index      <- entries: [rel offset:u32 BE][position:u64 BE] repeated
//!   1024.store   <- next segment, named by its base offset
//!   1024.index
//! ```
//!
//! All integers on disk are big-endian.
//!
//! # Durability
//!
//! Store writes are buffered; durability is reached on [`Log::close`] (or
//! when a read forces a flush). Index recovery relies on the close protocol:
//! the index file is truncated down to its live size on close, and the
//! pre-truncation length observed on the next open tells the index how many
//! entries survived.
//!
//! # Example
//!
//! ```ignore
//! use strata_log::{Config, Log};
//! use bytes::Bytes;
//!
//! let log = Log::new("/data/strata", Config::default())?;
//!
//! let offset = log.append(Bytes::from("hello"))?;
//! let record = log.read(offset)?;
//! assert_eq!(record.value().as_ref(), b"hello");
//!
//! log.close()?;
//! ```

mod config;
mod error;
mod index;
mod log;
mod record;
mod segment;
mod store;

pub use config::Config;
pub use error::Error;
pub use index::Index;
pub use log::Log;
pub use record::Record;
pub use segment::Segment;
pub use store::Store;
