//! SHA-1 object identifiers.
//!
//! Fixed-size, zero-heap storage with hex parsing and formatting. ziptree
//! only handles SHA-1 object databases; the id length is fixed at 20 bytes.

use crate::error::{Result, ZipTreeError};
use std::fmt;

/// A 20-byte SHA-1 object id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; 20]);

impl ObjectId {
    /// Raw id length in bytes.
    pub const RAW_LEN: usize = 20;
    /// Hex id length in characters.
    pub const HEX_LEN: usize = 40;

    /// Create an id from its raw bytes.
    #[inline]
    #[must_use]
    pub const fn from_raw(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Create an id from a raw byte slice, which must be exactly 20 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; 20] = bytes
            .try_into()
            .map_err(|_| ZipTreeError::bad_object_name(format!("{} raw bytes", bytes.len())))?;
        Ok(Self(raw))
    }

    /// Parse a 40-character hex id.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let bytes = hex.as_bytes();
        if bytes.len() != Self::HEX_LEN {
            return Err(ZipTreeError::bad_object_name(hex));
        }
        let mut raw = [0u8; 20];
        for (i, out) in raw.iter_mut().enumerate() {
            let hi = hex_val(bytes[2 * i]).ok_or_else(|| ZipTreeError::bad_object_name(hex))?;
            let lo = hex_val(bytes[2 * i + 1]).ok_or_else(|| ZipTreeError::bad_object_name(hex))?;
            *out = (hi << 4) | lo;
        }
        Ok(Self(raw))
    }

    /// The raw id bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// The lowercase hex form, always 40 characters.
    #[must_use]
    pub fn to_hex(&self) -> String {
        let mut s = String::with_capacity(Self::HEX_LEN);
        for &b in &self.0 {
            s.push(char::from_digit((b >> 4) as u32, 16).unwrap_or('0'));
            s.push(char::from_digit((b & 0xF) as u32, 16).unwrap_or('0'));
        }
        s
    }
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}
