//! Object and tree-entry classification.
//!
//! Git uses a subset of Unix mode bits in tree entries. The high bits encode
//! the object type:
//!
//! | Type mask | Kind    | Canonical mode(s) |
//! |-----------|---------|-------------------|
//! | 0o040000  | Tree    | 040000            |
//! | 0o100000  | Blob    | 100644, 100755    |
//! | 0o120000  | Symlink | 120000            |
//! | 0o160000  | Gitlink | 160000            |
//!
//! Historical tools wrote non-canonical blob modes (100664, 100600, ...);
//! classification therefore checks the type mask and the executable bit
//! rather than exact values.

/// High bits of a tree-entry mode that encode the object type.
const MODE_TYPE_MASK: u32 = 0o170000;

/// Classification of a tree entry by its mode bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// Subdirectory (mode 040000).
    Tree,
    /// Regular file without the executable bit.
    RegularFile,
    /// Regular file with the executable bit.
    ExecutableFile,
    /// Symbolic link (mode 120000).
    Symlink,
    /// Gitlink / submodule (mode 160000).
    Gitlink,
    /// Mode whose type bits match nothing known.
    Unknown,
}

impl EntryKind {
    /// Classify a raw tree-entry mode.
    #[must_use]
    pub const fn from_mode(mode: u32) -> Self {
        match mode & MODE_TYPE_MASK {
            0o040000 => Self::Tree,
            0o100000 => {
                if mode & 0o111 != 0 {
                    Self::ExecutableFile
                } else {
                    Self::RegularFile
                }
            }
            0o120000 => Self::Symlink,
            0o160000 => Self::Gitlink,
            _ => Self::Unknown,
        }
    }

    /// True for subdirectories.
    #[inline]
    #[must_use]
    pub const fn is_tree(self) -> bool {
        matches!(self, Self::Tree)
    }

    /// True for regular and executable files.
    #[inline]
    #[must_use]
    pub const fn is_file(self) -> bool {
        matches!(self, Self::RegularFile | Self::ExecutableFile)
    }
}

/// The type of a stored object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    /// A commit object.
    Commit,
    /// A tree object.
    Tree,
    /// A blob object.
    Blob,
    /// An annotated tag object.
    Tag,
}

impl ObjectKind {
    /// Parse the type name found in a loose-object header.
    #[must_use]
    pub fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"commit" => Some(Self::Commit),
            b"tree" => Some(Self::Tree),
            b"blob" => Some(Self::Blob),
            b"tag" => Some(Self::Tag),
            _ => None,
        }
    }

    /// The on-disk type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Commit => "commit",
            Self::Tree => "tree",
            Self::Blob => "blob",
            Self::Tag => "tag",
        }
    }
}

/// A decompressed object as returned by an [`ObjectStore`].
///
/// [`ObjectStore`]: crate::store::ObjectStore
#[derive(Debug, Clone)]
pub struct RawObject {
    /// The object's type.
    pub kind: ObjectKind,
    /// The object's content, without the loose-object header.
    pub data: Vec<u8>,
}
