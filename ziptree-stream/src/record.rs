//! Bit-exact ZIP record encoding.
//!
//! The three fixed-layout records of the classic (non-ZIP64) ZIP format.
//! Every multi-byte field is little-endian; the fixed portions are 30, 46
//! and 22 bytes, each followed by the variable-length path or comment bytes.
//!
//! Values are range-checked on the way in: the format gives sizes, offsets
//! and the directory position 32 bits and the entry count 16 bits, and
//! ziptree rejects anything wider instead of emitting the ZIP64 extension.

use ziptree_core::{Result, ZipTreeError};

/// Local file header signature ("PK\x03\x04").
pub const LOCAL_HEADER_SIG: u32 = 0x04034B50;

/// Central directory record signature ("PK\x01\x02").
pub const CENTRAL_HEADER_SIG: u32 = 0x02014B50;

/// End-of-central-directory (trailer) signature ("PK\x05\x06").
pub const TRAILER_SIG: u32 = 0x06054B50;

/// Fixed size of a local file header.
pub const LOCAL_HEADER_LEN: usize = 30;

/// Fixed size of a central directory record.
pub const CENTRAL_HEADER_LEN: usize = 46;

/// Fixed size of the trailer record.
pub const TRAILER_LEN: usize = 22;

/// Version needed to extract: 2.0, the level that introduced DEFLATE and
/// directory entries.
pub const VERSION_NEEDED: u16 = 20;

/// Append a little-endian u16.
#[inline]
pub fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// Append a little-endian u32.
#[inline]
pub fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// Narrow a value into a 16-bit record field, or fail naming the field.
#[inline]
pub fn fit_u16(field: &'static str, value: u64) -> Result<u16> {
    u16::try_from(value).map_err(|_| ZipTreeError::format_overflow(field, value))
}

/// Narrow a value into a 32-bit record field, or fail naming the field.
#[inline]
pub fn fit_u32(field: &'static str, value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| ZipTreeError::format_overflow(field, value))
}

/// The per-entry fields shared by the local and central records.
#[derive(Debug, Clone, Copy)]
pub struct EntryRecord {
    /// Compression method: 0 stored, 8 deflated.
    pub method: u16,
    /// DOS time field.
    pub mtime: u16,
    /// DOS date field.
    pub mdate: u16,
    /// CRC-32 of the uncompressed content.
    pub crc32: u32,
    /// Size of the payload as written to the stream.
    pub compressed_size: u32,
    /// Size of the original content.
    pub uncompressed_size: u32,
    /// Length of the path bytes that follow the fixed record.
    pub path_len: u16,
}

impl EntryRecord {
    /// Append the 30-byte local file header (path bytes not included).
    pub fn encode_local(&self, buf: &mut Vec<u8>) {
        put_u32(buf, LOCAL_HEADER_SIG);
        put_u16(buf, VERSION_NEEDED);
        put_u16(buf, 0); // flags
        put_u16(buf, self.method);
        put_u16(buf, self.mtime);
        put_u16(buf, self.mdate);
        put_u32(buf, self.crc32);
        put_u32(buf, self.compressed_size);
        put_u32(buf, self.uncompressed_size);
        put_u16(buf, self.path_len);
        put_u16(buf, 0); // extra field length
    }

    /// Append the 46-byte central directory record (path bytes not included).
    ///
    /// `offset` is the position of the matching local header in the output
    /// stream, captured before that header was written.
    pub fn encode_central(&self, offset: u32, buf: &mut Vec<u8>) {
        put_u32(buf, CENTRAL_HEADER_SIG);
        put_u16(buf, 0); // creator version
        put_u16(buf, VERSION_NEEDED);
        put_u16(buf, 0); // flags
        put_u16(buf, self.method);
        put_u16(buf, self.mtime);
        put_u16(buf, self.mdate);
        put_u32(buf, self.crc32);
        put_u32(buf, self.compressed_size);
        put_u32(buf, self.uncompressed_size);
        put_u16(buf, self.path_len);
        put_u16(buf, 0); // extra field length
        put_u16(buf, 0); // comment length
        put_u16(buf, 0); // disk number start
        put_u16(buf, 0); // internal attributes
        put_u32(buf, 0); // external attributes
        put_u32(buf, offset);
    }
}

/// The end-of-archive trailer.
#[derive(Debug, Clone, Copy)]
pub struct TrailerRecord {
    /// Number of central directory records (single disk, so the this-disk
    /// and total counts are always equal).
    pub entries: u16,
    /// Total byte size of the central directory.
    pub dir_size: u32,
    /// Stream offset at which the central directory starts.
    pub dir_offset: u32,
    /// Length of the archive comment that follows, 0 or 40.
    pub comment_len: u16,
}

impl TrailerRecord {
    /// Append the 22-byte trailer (comment bytes not included).
    pub fn encode(&self, buf: &mut Vec<u8>) {
        put_u32(buf, TRAILER_SIG);
        put_u16(buf, 0); // this disk
        put_u16(buf, 0); // disk where the directory starts
        put_u16(buf, self.entries);
        put_u16(buf, self.entries);
        put_u32(buf, self.dir_size);
        put_u32(buf, self.dir_offset);
        put_u16(buf, self.comment_len);
    }
}
