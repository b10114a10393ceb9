//! # parazip deflate
//!
//! Parallel DEFLATE compression engine (RFC 1951).
//!
//! The input is cut into 1 MiB blocks distributed over a bounded pool of
//! worker threads. Each worker runs a sliding-window LZ77 match finder with a
//! fresh dictionary per block, encodes every block as the smallest of the
//! three RFC 1951 formats (stored, fixed Huffman, dynamic Huffman), and
//! accumulates its output in an independent [`BitSink`](parazip_core::BitSink).
//! The driver splices worker sinks together at arbitrary bit offsets, so the
//! result is a single well-formed deflate stream with exactly one final block.
//!
//! ## Example
//!
//! ```rust
//! use parazip_deflate::{DeflateOptions, deflate};
//!
//! let data = b"Hello, Hello, Hello!";
//! let compressed = deflate(data, &DeflateOptions::default()).unwrap();
//! assert!(!compressed.is_empty());
//! ```
//!
//! Decompression is out of scope; any standards-compliant inflater can read
//! the output.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod block;
pub mod deflate;
pub mod huffman;
pub mod lz77;
pub mod tables;

// Re-exports
pub use block::{CodingMode, encode_block};
pub use deflate::{BLOCK_SIZE, DeflateOptions, deflate, deflate_with_progress};
pub use huffman::{HuffmanBuilder, HuffmanCodes};
pub use lz77::{Lz77Level, MatchFinder, Token};
