//! Error types for ziptree operations.
//!
//! All fatal conditions funnel through [`ZipTreeError`]. Conditions that only
//! skip a single archive entry (path too long, unsupported entry kind) are
//! not errors; they are carried as data in the entry writer's outcome so the
//! build can continue.

use crate::oid::ObjectId;
use std::io;
use thiserror::Error;

/// The main error type for ziptree operations.
///
/// Every variant is fatal to the archive build: the output stream cannot be
/// rewound, so there is nothing to recover once one of these surfaces.
#[derive(Debug, Error)]
pub enum ZipTreeError {
    /// I/O error from the object database or the output sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A referenced object is absent from the object database.
    ///
    /// For a valid tree this cannot happen, so it is treated as a
    /// consistency violation rather than a recoverable miss.
    #[error("cannot read object {id}")]
    ObjectMissing {
        /// Id of the missing object.
        id: ObjectId,
    },

    /// An object was present but its content is not what its header claims.
    #[error("corrupt object {id}: {message}")]
    ObjectCorrupt {
        /// Id of the corrupt object.
        id: ObjectId,
        /// Description of the corruption.
        message: String,
    },

    /// A tree-ish argument did not resolve to any object.
    #[error("not a valid object name: {name}")]
    BadObjectName {
        /// The name as given on the command line.
        name: String,
    },

    /// A resolved object could not be peeled to a tree.
    #[error("object {id} is not a tree")]
    NotATree {
        /// Id of the offending object.
        id: ObjectId,
    },

    /// A value does not fit the fixed-width field the ZIP format gives it.
    ///
    /// Covers sizes and offsets past 4 GiB and entry counts past 65535;
    /// ziptree does not emit the ZIP64 extension.
    #[error("{field} {value} exceeds the archive format's field width")]
    Format32Overflow {
        /// Name of the record field that overflowed.
        field: &'static str,
        /// The value that did not fit.
        value: u64,
    },

    /// Growing the central-directory buffer failed.
    #[error("out of memory growing the central directory to {needed} bytes")]
    ResourceExhausted {
        /// Capacity that could not be allocated.
        needed: usize,
    },
}

/// Result type alias for ziptree operations.
pub type Result<T> = std::result::Result<T, ZipTreeError>;

impl ZipTreeError {
    /// Create an object missing error.
    pub fn object_missing(id: ObjectId) -> Self {
        Self::ObjectMissing { id }
    }

    /// Create a corrupt object error.
    pub fn object_corrupt(id: ObjectId, message: impl Into<String>) -> Self {
        Self::ObjectCorrupt {
            id,
            message: message.into(),
        }
    }

    /// Create a bad object name error.
    pub fn bad_object_name(name: impl Into<String>) -> Self {
        Self::BadObjectName { name: name.into() }
    }

    /// Create a not-a-tree error.
    pub fn not_a_tree(id: ObjectId) -> Self {
        Self::NotATree { id }
    }

    /// Create a field overflow error.
    pub fn format_overflow(field: &'static str, value: u64) -> Self {
        Self::Format32Overflow { field, value }
    }

    /// Create a resource exhaustion error.
    pub fn resource_exhausted(needed: usize) -> Self {
        Self::ResourceExhausted { needed }
    }
}
