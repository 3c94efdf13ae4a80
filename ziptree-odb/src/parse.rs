//! Commit and tag header parsing.
//!
//! A commit's headers are `key value` lines up to the first blank line; the
//! archiver only needs the `tree` pointer and the committer timestamp. A
//! committer line ends with `<epoch> <tz-offset>`; the timestamp is taken
//! as-is (it is already UTC seconds).

use ziptree_core::{ObjectId, Result, ZipTreeError};

/// The pieces of a commit the archiver uses.
#[derive(Debug, Clone, Copy)]
pub struct CommitInfo {
    /// The commit's root tree.
    pub tree: ObjectId,
    /// The committer timestamp, when the line was parseable.
    pub committer_time: Option<i64>,
}

/// Parse a commit object's content.
pub fn parse_commit(id: &ObjectId, data: &[u8]) -> Result<CommitInfo> {
    let mut tree = None;
    let mut committer_time = None;

    for line in header_lines(data) {
        if let Some(rest) = line.strip_prefix(b"tree ".as_slice()) {
            let hex = std::str::from_utf8(rest)
                .map_err(|_| ZipTreeError::object_corrupt(*id, "tree header is not hex"))?;
            tree = Some(ObjectId::from_hex(hex)
                .map_err(|_| ZipTreeError::object_corrupt(*id, "tree header is not hex"))?);
        } else if let Some(rest) = line.strip_prefix(b"committer ".as_slice()) {
            committer_time = parse_ident_time(rest);
        }
    }

    let tree = tree.ok_or_else(|| ZipTreeError::object_corrupt(*id, "commit without tree header"))?;
    Ok(CommitInfo {
        tree,
        committer_time,
    })
}

/// Parse an annotated tag's content, returning the object it points to.
pub fn parse_tag_target(id: &ObjectId, data: &[u8]) -> Result<ObjectId> {
    for line in header_lines(data) {
        if let Some(rest) = line.strip_prefix(b"object ".as_slice()) {
            let hex = std::str::from_utf8(rest)
                .map_err(|_| ZipTreeError::object_corrupt(*id, "object header is not hex"))?;
            return ObjectId::from_hex(hex)
                .map_err(|_| ZipTreeError::object_corrupt(*id, "object header is not hex"));
        }
    }
    Err(ZipTreeError::object_corrupt(*id, "tag without object header"))
}

/// The header lines of a commit or tag, stopping at the blank separator.
fn header_lines(data: &[u8]) -> impl Iterator<Item = &[u8]> {
    data.split(|&b| b == b'\n').take_while(|line| !line.is_empty())
}

/// Pull the epoch out of `Name <email> <epoch> <tz>`.
fn parse_ident_time(ident: &[u8]) -> Option<i64> {
    let text = std::str::from_utf8(ident).ok()?;
    let mut fields = text.split_ascii_whitespace().rev();
    let _tz = fields.next()?;
    fields.next()?.parse().ok()
}
