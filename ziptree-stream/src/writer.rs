//! The per-entry writer and the trailer writer.
//!
//! [`ZipStreamer`] owns the whole archive state for one build: the sink, the
//! output cursor, the shared timestamp, the compression level and the
//! central-directory arena. It is driven once per tree node by the external
//! walker and finalized exactly once by [`ZipStreamer::finish`].
//!
//! Per entry, the write order on the stream is fixed: local header, path
//! bytes, then the payload (omitted when empty). The matching central record
//! is appended to the arena first, capturing the cursor value at which the
//! local header is about to land.

use crate::compress::deflate_payload;
use crate::dirbuf::DirectoryBuffer;
use crate::path::{EntryPath, display_joined};
use crate::record::{EntryRecord, LOCAL_HEADER_LEN, TRAILER_LEN, TrailerRecord, fit_u16, fit_u32};
use std::fmt;
use std::io::Write;
use ziptree_core::{
    Crc32, DosDateTime, EntryKind, ObjectId, ObjectKind, ObjectStore, Result, WalkControl,
    ZipTreeError,
};

/// Why a single entry was left out of the archive.
///
/// Both conditions are local to one entry; the build continues. The driver
/// is expected to report them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The constructed path exceeds the format's 16-bit length field.
    PathTooLong {
        /// The length the path would have had.
        len: usize,
        /// Id of the entry's object.
        id: ObjectId,
        /// Lossy rendering of the path, for diagnostics.
        path: String,
    },
    /// A node kind the format cannot represent (symlink, submodule, ...).
    UnsupportedMode {
        /// The raw tree-entry mode.
        mode: u32,
        /// Id of the entry's object.
        id: ObjectId,
        /// Lossy rendering of the path, for diagnostics.
        path: String,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathTooLong { len, id, path } => {
                write!(f, "path too long ({len} bytes, object {id}): {path}")
            }
            Self::UnsupportedMode { mode, id, path } => {
                write!(f, "unsupported file mode 0{mode:o} (object {id}): {path}")
            }
        }
    }
}

/// The entry writer's verdict on one tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// A directory entry was written; the walker should descend.
    Directory,
    /// A file entry was written.
    File,
    /// Nothing was written; the reason says why.
    Skipped(SkipReason),
}

impl EntryOutcome {
    /// Map the outcome onto the walker protocol.
    ///
    /// An oversized path skips one entry and the walk carries on; an
    /// unsupported kind additionally stops any descent into that node.
    #[must_use]
    pub fn control(&self) -> WalkControl {
        match self {
            Self::Directory => WalkControl::Recurse,
            Self::File => WalkControl::Continue,
            Self::Skipped(SkipReason::PathTooLong { .. }) => WalkControl::Continue,
            Self::Skipped(SkipReason::UnsupportedMode { .. }) => WalkControl::Stop,
        }
    }
}

/// Streamed ZIP assembly over a forward-only sink.
///
/// Created once per archive build, mutated only by the entry writer during
/// the single traversal pass, and consumed by [`finish`].
///
/// [`finish`]: ZipStreamer::finish
pub struct ZipStreamer<W: Write> {
    sink: W,
    /// Bytes written to the sink so far; each central record captures this
    /// cursor before the corresponding local header goes out.
    offset: u64,
    dir: DirectoryBuffer,
    level: u32,
    stamp: DosDateTime,
}

impl<W: Write> ZipStreamer<W> {
    /// Create a streamer writing to `sink`.
    ///
    /// `level` is the DEFLATE effort, 0-9; 0 stores every entry verbatim.
    /// `stamp` is the single timestamp shared by all entries.
    pub fn new(sink: W, level: u32, stamp: DosDateTime) -> Result<Self> {
        Ok(Self {
            sink,
            offset: 0,
            dir: DirectoryBuffer::new()?,
            level: level.min(9),
            stamp,
        })
    }

    /// Bytes written to the sink so far.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.offset
    }

    /// Entries recorded in the central directory so far.
    #[must_use]
    pub fn entries(&self) -> u64 {
        self.dir.entries()
    }

    /// Convert one tree node into archive records.
    ///
    /// Invoked once per node, directories before their contents. `base` is
    /// the parent path prefix (with trailing `/` for non-empty prefixes) and
    /// `mode` the raw tree-entry mode.
    pub fn write_entry(
        &mut self,
        store: &dyn ObjectStore,
        id: &ObjectId,
        base: &[u8],
        name: &[u8],
        mode: u32,
    ) -> Result<EntryOutcome> {
        let kind = EntryKind::from_mode(mode);
        if kind.is_tree() {
            self.write_directory(id, base, name)
        } else if kind.is_file() {
            self.write_file(store, id, base, name)
        } else {
            Ok(EntryOutcome::Skipped(SkipReason::UnsupportedMode {
                mode,
                id: *id,
                path: display_joined(base, name),
            }))
        }
    }

    /// Write a directory entry: stored, empty payload, CRC of nothing.
    fn write_directory(&mut self, id: &ObjectId, base: &[u8], name: &[u8]) -> Result<EntryOutcome> {
        let Some(path) = EntryPath::build(base, name, true) else {
            return Ok(EntryOutcome::Skipped(self.too_long(id, base, name, true)));
        };
        self.emit(&path, 0, 0, &[], 0)?;
        Ok(EntryOutcome::Directory)
    }

    /// Write a regular-file entry, deflated when that pays off.
    fn write_file(
        &mut self,
        store: &dyn ObjectStore,
        id: &ObjectId,
        base: &[u8],
        name: &[u8],
    ) -> Result<EntryOutcome> {
        let Some(path) = EntryPath::build(base, name, false) else {
            return Ok(EntryOutcome::Skipped(self.too_long(id, base, name, false)));
        };

        let obj = store.read(id)?;
        if obj.kind != ObjectKind::Blob {
            return Err(ZipTreeError::object_corrupt(
                *id,
                format!("expected blob, found {}", obj.kind.as_str()),
            ));
        }

        let crc32 = Crc32::compute(&obj.data);
        let deflated = if self.level == 0 {
            None
        } else {
            deflate_payload(&obj.data, self.level)
        };
        match deflated {
            Some(payload) => self.emit(&path, 8, crc32, &payload, obj.data.len())?,
            None => self.emit(&path, 0, crc32, &obj.data, obj.data.len())?,
        }
        Ok(EntryOutcome::File)
    }

    fn too_long(&self, id: &ObjectId, base: &[u8], name: &[u8], is_dir: bool) -> SkipReason {
        SkipReason::PathTooLong {
            len: base.len() + name.len() + usize::from(is_dir),
            id: *id,
            path: display_joined(base, name),
        }
    }

    /// Append the central record, then write header + path + payload.
    fn emit(
        &mut self,
        path: &EntryPath,
        method: u16,
        crc32: u32,
        payload: &[u8],
        uncompressed: usize,
    ) -> Result<()> {
        let record = EntryRecord {
            method,
            mtime: self.stamp.time,
            mdate: self.stamp.date,
            crc32,
            compressed_size: fit_u32("compressed size", payload.len() as u64)?,
            uncompressed_size: fit_u32("uncompressed size", uncompressed as u64)?,
            path_len: path.len_u16(),
        };
        let offset = fit_u32("local header offset", self.offset)?;
        self.dir.append(&record, offset, path.as_bytes())?;

        let mut header = Vec::with_capacity(LOCAL_HEADER_LEN);
        record.encode_local(&mut header);
        self.sink.write_all(&header)?;
        self.sink.write_all(path.as_bytes())?;
        if !payload.is_empty() {
            self.sink.write_all(payload)?;
        }
        self.offset += (LOCAL_HEADER_LEN + path.len() + payload.len()) as u64;
        Ok(())
    }

    /// Flush the central directory and the trailer, consuming the streamer.
    ///
    /// When `commit` is given, its 40-character hex id becomes the archive
    /// comment, identifying the source revision.
    pub fn finish(mut self, commit: Option<&ObjectId>) -> Result<W> {
        let dir_offset = fit_u32("central directory offset", self.offset)?;
        let dir_size = fit_u32("central directory size", self.dir.len() as u64)?;
        let entries = fit_u16("entry count", self.dir.entries())?;

        self.sink.write_all(self.dir.as_bytes())?;

        let mut tail = Vec::with_capacity(TRAILER_LEN + ObjectId::HEX_LEN);
        TrailerRecord {
            entries,
            dir_size,
            dir_offset,
            comment_len: if commit.is_some() {
                ObjectId::HEX_LEN as u16
            } else {
                0
            },
        }
        .encode(&mut tail);
        if let Some(id) = commit {
            tail.extend_from_slice(id.to_hex().as_bytes());
        }
        self.sink.write_all(&tail)?;
        self.sink.flush()?;
        Ok(self.sink)
    }
}
