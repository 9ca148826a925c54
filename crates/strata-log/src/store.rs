//! Length-prefixed record store.
//!
//! The store is an append-only byte file holding a tight sequence of
//! records, each preceded by its length:
//!
//! ```text
//! [len:u64 BE][payload][len:u64 BE][payload]...
//!      8B      len B
//! ```
//!
//! Appends go through a write buffer; a read flushes the buffer first so the
//! positional read always observes every completed append. The shadow `size`
//! counts buffered and flushed bytes alike and is therefore the position the
//! next append will start at.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use bytes::Bytes;

use crate::Error;

/// Width of the length prefix preceding each record.
pub(crate) const LEN_WIDTH: u64 = 8;

/// Append-only record file with buffered writes and positional reads.
///
/// All operations serialize on an internal mutex, so a `Store` can be shared
/// between readers while a writer is active; the flush-before-read inside
/// [`read`](Store::read) keeps the two from racing on the file descriptor.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    inner: Mutex<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    writer: BufWriter<File>,
    /// Total bytes appended, buffered or flushed.
    size: u64,
}

impl Store {
    /// Creates a store over an open file.
    ///
    /// The file's current length becomes the starting size, so reopening a
    /// store resumes appending where the previous instance left off. No scan
    /// of record boundaries is needed.
    pub fn new(file: File, path: impl Into<PathBuf>) -> Result<Self, Error> {
        let size = file.metadata()?.len();

        Ok(Self {
            path: path.into(),
            inner: Mutex::new(StoreInner {
                writer: BufWriter::new(file),
                size,
            }),
        })
    }

    /// Appends `payload` to the store.
    ///
    /// Returns the number of bytes written (length prefix included) and the
    /// byte position the record starts at. The bytes land in the write
    /// buffer; durability is reached on [`close`](Store::close) or when a
    /// read forces a flush.
    pub fn append(&self, payload: &[u8]) -> Result<(u64, u64), Error> {
        let mut inner = self.inner.lock().map_err(|_| Error::LockPoisoned)?;

        // The current size is the position of the new record.
        let pos = inner.size;

        inner
            .writer
            .write_all(&(payload.len() as u64).to_be_bytes())?;
        inner.writer.write_all(payload)?;

        let written = LEN_WIDTH + payload.len() as u64;
        inner.size += written;

        Ok((written, pos))
    }

    /// Returns the record stored at byte position `pos`.
    ///
    /// The write buffer is flushed first so buffered appends are visible.
    /// Reading a position past the end of the store surfaces the OS
    /// short-read error as [`Error::Io`].
    pub fn read(&self, pos: u64) -> Result<Bytes, Error> {
        let mut inner = self.inner.lock().map_err(|_| Error::LockPoisoned)?;
        inner.writer.flush()?;

        let file = inner.writer.get_ref();

        let mut len_buf = [0u8; LEN_WIDTH as usize];
        file.read_exact_at(&mut len_buf, pos)?;
        let length = u64::from_be_bytes(len_buf);

        let mut payload = vec![0u8; length as usize];
        file.read_exact_at(&mut payload, pos + LEN_WIDTH)?;

        Ok(Bytes::from(payload))
    }

    /// Fills `buf` with bytes starting at `off`, flushing buffered appends
    /// first.
    pub fn read_at(&self, buf: &mut [u8], off: u64) -> Result<usize, Error> {
        let mut inner = self.inner.lock().map_err(|_| Error::LockPoisoned)?;
        inner.writer.flush()?;

        inner.writer.get_ref().read_exact_at(buf, off)?;

        Ok(buf.len())
    }

    /// Returns the store size in bytes, counting buffered appends.
    pub fn size(&self) -> Result<u64, Error> {
        let inner = self.inner.lock().map_err(|_| Error::LockPoisoned)?;

        Ok(inner.size)
    }

    /// Returns the path of the file backing the store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes any buffered bytes and closes the store.
    pub fn close(self) -> Result<(), Error> {
        let inner = self.inner.into_inner().map_err(|_| Error::LockPoisoned)?;
        let mut writer = inner.writer;

        writer.flush()?;

        Ok(())
    }
}
