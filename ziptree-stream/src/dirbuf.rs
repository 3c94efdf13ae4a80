//! The central-directory arena.
//!
//! Central directory records accumulate in memory for the whole build and
//! are flushed as one contiguous write by the trailer writer. The arena is
//! append-only: records are never removed or reordered.
//!
//! Capacity grows in fixed 1 MiB increments rather than by doubling, which
//! bounds peak overhead for small archives while keeping reallocation
//! amortized for large ones. Allocation failure is surfaced as a fatal
//! error instead of aborting the process.

use crate::record::{CENTRAL_HEADER_LEN, EntryRecord};
use ziptree_core::{Result, ZipTreeError};

/// Growth increment for the directory arena.
pub const DIR_GROWTH_STEP: usize = 1024 * 1024;

/// The growable byte region holding all central-directory records in
/// emission order.
#[derive(Debug)]
pub struct DirectoryBuffer {
    buf: Vec<u8>,
    entries: u64,
}

impl DirectoryBuffer {
    /// Create an arena with one growth step pre-allocated.
    pub fn new() -> Result<Self> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(DIR_GROWTH_STEP)
            .map_err(|_| ZipTreeError::resource_exhausted(DIR_GROWTH_STEP))?;
        Ok(Self { buf, entries: 0 })
    }

    /// Make sure `additional` more bytes fit, growing in whole steps.
    fn ensure(&mut self, additional: usize) -> Result<()> {
        let needed = self.buf.len() + additional;
        if needed <= self.buf.capacity() {
            return Ok(());
        }
        let mut target = self.buf.capacity();
        while target < needed {
            target += DIR_GROWTH_STEP;
        }
        self.buf
            .try_reserve_exact(target - self.buf.len())
            .map_err(|_| ZipTreeError::resource_exhausted(target))?;
        Ok(())
    }

    /// Append one central record and its path bytes.
    ///
    /// `offset` is the stream position of the entry's local header.
    pub fn append(&mut self, record: &EntryRecord, offset: u32, path: &[u8]) -> Result<()> {
        self.ensure(CENTRAL_HEADER_LEN + path.len())?;
        record.encode_central(offset, &mut self.buf);
        self.buf.extend_from_slice(path);
        self.entries += 1;
        Ok(())
    }

    /// Current fill in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when no record has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of records appended so far.
    #[must_use]
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// The accumulated directory bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}
