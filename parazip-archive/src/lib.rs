//! # parazip archive
//!
//! The ZIP container layer: entries, local file headers, the central
//! directory and the end-of-central-directory record (PKWARE APPNOTE /
//! ZIP32). Compression itself lives in `parazip-deflate`; this crate wraps
//! each compressed payload in the record layout any unzipper understands.
//!
//! The whole archive is laid out in one in-memory buffer and written to disk
//! in a single pass, so a failed run never leaves a partial archive behind.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod zip;

// Re-exports
pub use zip::entry::{CompressionMethod, ZipEntry};
pub use zip::time::DosDateTime;
pub use zip::writer::ZipWriter;
