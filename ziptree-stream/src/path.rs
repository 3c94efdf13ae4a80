//! Entry path construction.
//!
//! An archive path is `base + name`, with a trailing `/` appended for
//! directories so standard readers recognize them. Paths are byte strings;
//! git imposes no encoding on them and neither does ziptree.
//!
//! The ZIP record stores the path length in a 16-bit field, so 65535 bytes
//! is a hard ceiling. A longer path fails construction and the caller skips
//! that one entry.

/// Widest path the record format can describe.
pub const MAX_PATH_LEN: usize = 0xFFFF;

/// A constructed archive path, guaranteed to fit the 16-bit length field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPath {
    bytes: Vec<u8>,
}

impl EntryPath {
    /// Build `base + name [+ '/']`, or `None` when the result would exceed
    /// [`MAX_PATH_LEN`].
    #[must_use]
    pub fn build(base: &[u8], name: &[u8], is_dir: bool) -> Option<Self> {
        let len = base.len() + name.len() + usize::from(is_dir);
        if len > MAX_PATH_LEN {
            return None;
        }
        let mut bytes = Vec::with_capacity(len);
        bytes.extend_from_slice(base);
        bytes.extend_from_slice(name);
        if is_dir {
            bytes.push(b'/');
        }
        Some(Self { bytes })
    }

    /// The path bytes as written to the archive.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Path length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for the empty path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The length as the record field, which it is guaranteed to fit.
    #[must_use]
    pub fn len_u16(&self) -> u16 {
        self.bytes.len() as u16
    }

    /// Lossy display form for diagnostics.
    #[must_use]
    pub fn display(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Lossy display form of a path that failed construction.
#[must_use]
pub fn display_joined(base: &[u8], name: &[u8]) -> String {
    let mut joined = Vec::with_capacity(base.len() + name.len());
    joined.extend_from_slice(base);
    joined.extend_from_slice(name);
    String::from_utf8_lossy(&joined).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_join() {
        let p = EntryPath::build(b"proj/", b"a.txt", false).unwrap();
        assert_eq!(p.as_bytes(), b"proj/a.txt");
        assert_eq!(p.len_u16(), 10);
    }

    #[test]
    fn test_directory_gets_trailing_slash() {
        let p = EntryPath::build(b"proj/", b"src", true).unwrap();
        assert_eq!(p.as_bytes(), b"proj/src/");
    }

    #[test]
    fn test_empty_base() {
        let p = EntryPath::build(b"", b"README", false).unwrap();
        assert_eq!(p.as_bytes(), b"README");
    }

    #[test]
    fn test_exact_ceiling_accepted() {
        let base = vec![b'b'; MAX_PATH_LEN - 4];
        let p = EntryPath::build(&base, b"name", false).unwrap();
        assert_eq!(p.len(), MAX_PATH_LEN);
        assert_eq!(p.len_u16(), 0xFFFF);
    }

    #[test]
    fn test_one_past_ceiling_rejected() {
        let base = vec![b'b'; MAX_PATH_LEN - 4];
        assert!(EntryPath::build(&base, b"names", false).is_none());
        // The directory slash counts toward the limit too.
        assert!(EntryPath::build(&base, b"name", true).is_none());
    }

    #[test]
    fn test_non_utf8_paths_survive() {
        let p = EntryPath::build(b"\xC0dir/", b"f\xFF", false).unwrap();
        assert_eq!(p.as_bytes(), b"\xC0dir/f\xFF");
        // Display form is lossy but total.
        assert!(!p.display().is_empty());
    }
}
