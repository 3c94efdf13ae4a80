//! # ziptree Stream
//!
//! Forward-only streamed ZIP assembly.
//!
//! This crate turns a pre-order traversal of a git tree into a standard ZIP
//! archive on an append-only sink. Nothing is ever seeked or read back, so a
//! pipe is a first-class destination. The archive is built in one pass:
//!
//! 1. each visited node is encoded as a local header + path + payload and
//!    written immediately, while the matching central-directory record is
//!    appended to an in-memory arena;
//! 2. after the walk, [`ZipStreamer::finish`] emits the accumulated central
//!    directory, the end-of-archive trailer and, when the tree came from a
//!    commit, that commit's hex id as the archive comment.
//!
//! Peak memory is proportional to the largest single file plus the central
//! directory, never to the whole archive.
//!
//! - [`record`]: bit-exact local/central/trailer record encoding
//! - [`dirbuf`]: the growable central-directory arena
//! - [`compress`]: DEFLATE adapter with fall-back-to-stored
//! - [`path`]: entry path construction and the 65535-byte ceiling
//! - [`writer`]: the per-entry state machine and trailer writer

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod compress;
pub mod dirbuf;
pub mod path;
pub mod record;
pub mod writer;

// Re-exports for convenience
pub use dirbuf::DirectoryBuffer;
pub use path::EntryPath;
pub use record::{CENTRAL_HEADER_SIG, LOCAL_HEADER_SIG, TRAILER_SIG};
pub use writer::{EntryOutcome, SkipReason, ZipStreamer};
