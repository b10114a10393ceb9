//! Error types for parazip operations.

use std::io;
use thiserror::Error;

/// The main error type for parazip operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unknown compression method name.
    #[error("Unsupported compression method: {method}")]
    UnsupportedMethod {
        /// The method string as given.
        method: String,
    },

    /// LZ77 level outside 0..=3.
    #[error("LZ77 level out of range: {level} (expected 0..=3)")]
    LevelOutOfRange {
        /// The rejected level.
        level: u32,
    },

    /// A Huffman tree was requested over an empty alphabet.
    #[error("Huffman: empty frequency source")]
    EmptyHuffmanSource,

    /// Package-merge produced lengths violating the Kraft inequality.
    /// Unreachable for valid inputs, but checked.
    #[error("Huffman: code lengths overflow the {max_len}-bit limit")]
    CodeLengthOverflow {
        /// Configured maximum code length.
        max_len: u8,
    },

    /// Entry size does not fit the 32-bit ZIP fields.
    #[error("Entry too large for ZIP32: {name} ({size} bytes)")]
    EntryTooLarge {
        /// Entry name.
        name: String,
        /// Offending size in bytes.
        size: u64,
    },

    /// The compression worker pool could not be built.
    #[error("Worker pool: {message}")]
    WorkerPool {
        /// Description from the pool builder.
        message: String,
    },
}

/// Result type alias for parazip operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an unsupported-method error.
    pub fn unsupported_method(method: impl Into<String>) -> Self {
        Self::UnsupportedMethod {
            method: method.into(),
        }
    }

    /// Create a level-out-of-range error.
    pub fn level_out_of_range(level: u32) -> Self {
        Self::LevelOutOfRange { level }
    }

    /// Create an entry-too-large error.
    pub fn entry_too_large(name: impl Into<String>, size: u64) -> Self {
        Self::EntryTooLarge {
            name: name.into(),
            size,
        }
    }

    /// Create a worker-pool error.
    pub fn worker_pool(message: impl Into<String>) -> Self {
        Self::WorkerPool {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::unsupported_method("lzma");
        assert!(err.to_string().contains("lzma"));

        let err = Error::level_out_of_range(7);
        assert!(err.to_string().contains('7'));

        let err = Error::entry_too_large("big.bin", 5_000_000_000);
        assert!(err.to_string().contains("big.bin"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
