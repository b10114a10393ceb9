//! # parazip core
//!
//! Core components for the parazip DEFLATE ZIP writer.
//!
//! This crate provides the building blocks shared by the codec and container
//! layers:
//!
//! - [`bitsink`]: an append-only bit buffer supporting LSB- and MSB-first
//!   writes and bit-exact concatenation of whole buffers
//! - [`crc`]: CRC-32 (ISO 3309) over the uncompressed entry bytes
//! - [`progress`]: an atomic byte counter updated by compression workers
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! parazip is layered bottom-up:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ CLI (parazip-cli)                            │
//! ├──────────────────────────────────────────────┤
//! │ Container: ZIP headers (parazip-archive)     │
//! ├──────────────────────────────────────────────┤
//! │ Codec: LZ77 + Huffman (parazip-deflate)      │
//! ├──────────────────────────────────────────────┤
//! │ BitSink / CRC / Progress (this crate)        │
//! └──────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitsink;
pub mod crc;
pub mod error;
pub mod progress;

// Re-exports for convenience
pub use bitsink::{BitOrder, BitSink, reverse_bits};
pub use crc::Crc32;
pub use error::{Error, Result};
pub use progress::{Progress, ProgressTicker};
