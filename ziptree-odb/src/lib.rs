//! # ziptree ODB
//!
//! Read-only access to a git object database, scoped to what the archiver
//! needs: loose-object reading, tree/commit/tag parsing, tree-ish
//! resolution and a recursive pre-order tree walk.
//!
//! - [`db`]: the on-disk store ([`ObjectDb`]) and loose-object decoding
//! - [`parse`]: commit and tag headers
//! - [`tree`]: tree-entry iteration and the recursive walker
//! - [`resolve`]: names (hex ids, refs, `HEAD`) to a tree, peeling
//!   commits and annotated tags on the way
//!
//! Pack files are out of scope; the store trait is the seam where a packed
//! implementation would slot in.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod db;
pub mod parse;
pub mod resolve;
pub mod tree;

// Re-exports for convenience
pub use db::ObjectDb;
pub use parse::{CommitInfo, parse_commit, parse_tag_target};
pub use resolve::{ResolvedTree, resolve_treeish};
pub use tree::{TreeEntry, TreeIter, walk};
