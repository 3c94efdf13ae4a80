//! # ziptree Core
//!
//! Core components for the ziptree archiver.
//!
//! This crate provides the building blocks shared by the object-database and
//! archive-stream layers:
//!
//! - [`crc`]: CRC-32 (ISO 3309) as required by the ZIP format
//! - [`dostime`]: the legacy two-field DOS date/time encoding
//! - [`oid`]: SHA-1 object identifiers
//! - [`entry`]: object and tree-entry classification
//! - [`store`]: the object-store trait and walk-control protocol
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! ziptree is a small layered stack:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ ziptree-cli: argument surface, wiring       │
//! ├──────────────────────┬──────────────────────┤
//! │ ziptree-odb          │ ziptree-stream       │
//! │ loose objects, refs, │ ZIP records, central │
//! │ tree walk            │ directory, trailer   │
//! ├──────────────────────┴──────────────────────┤
//! │ ziptree-core (this crate)                   │
//! │ Crc32, DosDateTime, ObjectId, traits        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use ziptree_core::crc::Crc32;
//! use ziptree_core::dostime::DosDateTime;
//!
//! let crc = Crc32::compute(b"Hello, World!");
//! assert_eq!(crc, 0xEC4AC3D0);
//!
//! // 2001-09-09 01:46:40 UTC
//! let stamp = DosDateTime::from_unix(1_000_000_000);
//! assert_eq!(stamp.date >> 9, 2001 - 1980);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod crc;
pub mod dostime;
pub mod entry;
pub mod error;
pub mod oid;
pub mod store;

// Re-exports for convenience
pub use crc::Crc32;
pub use dostime::DosDateTime;
pub use entry::{EntryKind, ObjectKind, RawObject};
pub use error::{Result, ZipTreeError};
pub use oid::ObjectId;
pub use store::{ObjectStore, WalkControl};
