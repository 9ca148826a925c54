//! Log configuration.

/// Default cap on a segment's store file, in bytes.
pub const DEFAULT_MAX_STORE_BYTES: u64 = 1024;

/// Default cap on a segment's index file, in bytes.
///
/// Also the size of the index memory map while the segment is open.
pub const DEFAULT_MAX_INDEX_BYTES: u64 = 1024;

/// Configuration for a [`Log`](crate::Log) and its segments.
///
/// A zero value for either byte limit means "use the default"; limits are
/// normalized when the log is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Base offset of the first segment of a freshly created log.
    pub initial_offset: u64,
    /// Upper bound on a segment's store file; reaching it marks the segment
    /// full.
    pub max_store_bytes: u64,
    /// Upper bound on a segment's index file; reaching it marks the segment
    /// full.
    pub max_index_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_offset: 0,
            max_store_bytes: DEFAULT_MAX_STORE_BYTES,
            max_index_bytes: DEFAULT_MAX_INDEX_BYTES,
        }
    }
}

impl Config {
    /// Creates a configuration with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base offset of the first segment.
    #[must_use]
    pub fn with_initial_offset(mut self, offset: u64) -> Self {
        self.initial_offset = offset;
        self
    }

    /// Sets the store size limit per segment.
    #[must_use]
    pub fn with_max_store_bytes(mut self, bytes: u64) -> Self {
        self.max_store_bytes = bytes;
        self
    }

    /// Sets the index size limit per segment.
    #[must_use]
    pub fn with_max_index_bytes(mut self, bytes: u64) -> Self {
        self.max_index_bytes = bytes;
        self
    }

    /// Replaces zero limits with the defaults.
    pub(crate) fn normalized(mut self) -> Self {
        if self.max_store_bytes == 0 {
            self.max_store_bytes = DEFAULT_MAX_STORE_BYTES;
        }
        if self.max_index_bytes == 0 {
            self.max_index_bytes = DEFAULT_MAX_INDEX_BYTES;
        }
        self
    }
}
