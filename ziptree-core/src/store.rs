//! The object-store trait and the walk-control protocol.
//!
//! The archive stream never touches the filesystem itself; it reads object
//! content through [`ObjectStore`] and is driven by an external recursive
//! tree walker. The walker's visitor returns a [`WalkControl`] telling it
//! whether to descend into the entry just visited.

use crate::entry::RawObject;
use crate::error::Result;
use crate::oid::ObjectId;

/// Read access to a content-addressed object database.
///
/// A missing object is a fatal consistency violation for callers archiving
/// a valid tree, so implementations report it as an error rather than an
/// `Option`.
pub trait ObjectStore {
    /// Read and decompress the object with the given id.
    fn read(&self, id: &ObjectId) -> Result<RawObject>;
}

/// The visitor's verdict on one tree entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkControl {
    /// The entry is a handled directory; descend into its children.
    Recurse,
    /// The entry is a handled leaf; keep walking siblings.
    Continue,
    /// Do not descend into this entry; keep walking the rest of the tree.
    Stop,
}
