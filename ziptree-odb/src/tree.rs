//! Tree-entry iteration and the recursive walker.
//!
//! A tree object is a sequence of records:
//!
//! ```text
//! <octal mode> SP <name> NUL <20-byte oid>
//! ```
//!
//! Names are non-empty, contain no `/` and no NUL. The iterator is fused:
//! after one malformed record it yields nothing further.
//!
//! [`walk`] drives a visitor over a whole tree in pre-order, directories
//! before their contents, exactly one visit per node. The visitor decides
//! descent through [`WalkControl`]; skipping a subtree never aborts the
//! rest of the walk.

use ziptree_core::{ObjectId, ObjectKind, ObjectStore, Result, WalkControl, ZipTreeError};

/// One parsed tree record, borrowing from the tree buffer.
#[derive(Clone, Copy, Debug)]
pub struct TreeEntry<'a> {
    /// Raw mode bits as stored (e.g. 0o100644).
    pub mode: u32,
    /// Entry name, no path prefix.
    pub name: &'a [u8],
    /// Id of the referenced object.
    pub id: ObjectId,
}

/// Iterator over the records of one tree payload.
pub struct TreeIter<'a> {
    rest: &'a [u8],
    failed: bool,
}

impl<'a> TreeIter<'a> {
    /// Iterate over `data`, the content of a tree object.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            rest: data,
            failed: false,
        }
    }

    fn parse_one(&mut self) -> Result<TreeEntry<'a>> {
        let buf = self.rest;

        let space = buf
            .iter()
            .position(|&b| b == b' ')
            .ok_or_else(|| corrupt("unterminated mode"))?;
        let mut mode = 0u32;
        if space == 0 {
            return Err(corrupt("empty mode"));
        }
        for &b in &buf[..space] {
            if !(b'0'..=b'7').contains(&b) {
                return Err(corrupt("non-octal mode digit"));
            }
            mode = mode * 8 + u32::from(b - b'0');
        }

        let after_mode = &buf[space + 1..];
        let nul = after_mode
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| corrupt("unterminated name"))?;
        let name = &after_mode[..nul];
        if name.is_empty() {
            return Err(corrupt("empty entry name"));
        }
        if name.contains(&b'/') {
            return Err(corrupt("slash in entry name"));
        }

        let after_name = &after_mode[nul + 1..];
        if after_name.len() < ObjectId::RAW_LEN {
            return Err(corrupt("truncated object id"));
        }
        let id = ObjectId::from_bytes(&after_name[..ObjectId::RAW_LEN])?;

        self.rest = &after_name[ObjectId::RAW_LEN..];
        Ok(TreeEntry { mode, name, id })
    }
}

fn corrupt(message: &str) -> ZipTreeError {
    ZipTreeError::object_corrupt(ObjectId::from_raw([0; 20]), message)
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = Result<TreeEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }
        match self.parse_one() {
            Ok(entry) => Some(Ok(entry)),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Recursively visit every entry under `tree`, pre-order.
///
/// The visitor receives `(id, base, name, mode)`; `base` is the parent path
/// with a trailing `/` whenever it is non-empty. A [`WalkControl::Recurse`]
/// verdict on a subtree descends into it with `base + name + "/"`.
pub fn walk<V>(store: &dyn ObjectStore, tree: &ObjectId, base: &[u8], visit: &mut V) -> Result<()>
where
    V: FnMut(&ObjectId, &[u8], &[u8], u32) -> Result<WalkControl>,
{
    let obj = store.read(tree)?;
    if obj.kind != ObjectKind::Tree {
        return Err(ZipTreeError::object_corrupt(
            *tree,
            format!("expected tree, found {}", obj.kind.as_str()),
        ));
    }

    for entry in TreeIter::new(&obj.data) {
        // Re-home parse errors on the tree being read.
        let entry = entry.map_err(|e| match e {
            ZipTreeError::ObjectCorrupt { message, .. } => {
                ZipTreeError::object_corrupt(*tree, message)
            }
            other => other,
        })?;
        match visit(&entry.id, base, entry.name, entry.mode)? {
            WalkControl::Recurse => {
                let mut sub = Vec::with_capacity(base.len() + entry.name.len() + 1);
                sub.extend_from_slice(base);
                sub.extend_from_slice(entry.name);
                sub.push(b'/');
                walk(store, &entry.id, &sub, visit)?;
            }
            WalkControl::Continue | WalkControl::Stop => {}
        }
    }
    Ok(())
}
