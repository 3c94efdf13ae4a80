//! The DEFLATE adapter.
//!
//! ZIP method 8 wants raw DEFLATE, but the transform is driven through its
//! zlib wrapping (RFC 1950): compress the whole buffer, then strip the
//! 2-byte CMF/FLG header and the 4-byte Adler-32 trailer.
//!
//! The result is only kept when it is strictly smaller than the input;
//! otherwise the entry is stored (method 0) with the original bytes, so the
//! archive never grows past what storing raw would cost. A transform that
//! fails to reach a clean end state is treated the same as one that gained
//! nothing.

use flate2::Compression;
use flate2::write::ZlibEncoder;
use std::io::Write;

/// Bytes of zlib framing around the raw DEFLATE stream: CMF/FLG in front,
/// Adler-32 behind.
const ZLIB_HEADER_LEN: usize = 2;
const ZLIB_TRAILER_LEN: usize = 4;

/// Compress `data` at `level` (1-9) into a raw-deflate payload.
///
/// Returns `None` when the entry should be stored instead: the compressed
/// form was not strictly smaller, or the transform failed.
#[must_use]
pub fn deflate_payload(data: &[u8], level: u32) -> Option<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2 + 64), Compression::new(level));
    if encoder.write_all(data).is_err() {
        return None;
    }
    let mut wrapped = match encoder.finish() {
        Ok(out) => out,
        Err(_) => return None,
    };
    if wrapped.len() < ZLIB_HEADER_LEN + ZLIB_TRAILER_LEN {
        return None;
    }

    wrapped.truncate(wrapped.len() - ZLIB_TRAILER_LEN);
    wrapped.drain(..ZLIB_HEADER_LEN);

    if wrapped.len() < data.len() {
        Some(wrapped)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::DeflateDecoder;
    use std::io::Read;

    fn inflate_raw(payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        DeflateDecoder::new(payload)
            .read_to_end(&mut out)
            .expect("raw deflate payload must inflate");
        out
    }

    #[test]
    fn test_compressible_input_round_trips() {
        let data = b"a repeated phrase, a repeated phrase, a repeated phrase".repeat(40);
        let payload = deflate_payload(&data, 6).expect("highly repetitive data must shrink");
        assert!(payload.len() < data.len());
        assert_eq!(inflate_raw(&payload), data);
    }

    #[test]
    fn test_tiny_input_falls_back() {
        // Two bytes can never shrink through DEFLATE framing.
        assert!(deflate_payload(b"hi", 9).is_none());
        assert!(deflate_payload(b"x", 9).is_none());
    }

    #[test]
    fn test_empty_input_falls_back() {
        assert!(deflate_payload(b"", 6).is_none());
    }

    #[test]
    fn test_incompressible_input_falls_back() {
        // Already-deflated bytes do not shrink again.
        let data = b"the quick brown fox jumps over the lazy dog".repeat(50);
        let once = deflate_payload(&data, 9).unwrap();
        assert!(deflate_payload(&once, 9).is_none());
    }

    #[test]
    fn test_level_changes_effort_not_content() {
        let data = b"zip zip zip zip zip zip zip zip zip zip zip zip".repeat(30);
        for level in 1..=9 {
            let payload = deflate_payload(&data, level).unwrap();
            assert_eq!(inflate_raw(&payload), data);
        }
    }
}
