//! Archive assembly.
//!
//! Entries are collected first; [`ZipWriter::finish`] lays the archive out in
//! one buffer (local headers and payloads, then the central directory, then
//! the end-of-central-directory record) and [`ZipWriter::write_to`] puts it
//! on disk in a single pass.

use crate::zip::END_OF_CENTRAL_DIR_SIG;
use crate::zip::entry::{ZipEntry, put_u16, put_u32};
use parazip_core::error::Result;
use std::fs;
use std::path::Path;

/// A write-only ZIP archive under construction.
#[derive(Debug, Default)]
pub struct ZipWriter {
    entries: Vec<ZipEntry>,
    comment: String,
}

impl ZipWriter {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the archive comment recorded in the EOCD.
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    /// Add a finished entry.
    pub fn add_entry(&mut self, entry: ZipEntry) {
        self.entries.push(entry);
    }

    /// Number of entries added so far.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Lay out the complete archive.
    pub fn finish(&self) -> Vec<u8> {
        let payload: usize = self
            .entries
            .iter()
            .map(|e| 30 + e.name().len() + e.compressed_size() as usize)
            .sum();
        let mut buf = Vec::with_capacity(payload + 64 * self.entries.len());

        let mut local_offsets = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            local_offsets.push(buf.len() as u32);
            entry.write_local(&mut buf);
        }

        let cd_offset = buf.len() as u32;
        for (entry, &offset) in self.entries.iter().zip(&local_offsets) {
            entry.write_central(&mut buf, offset);
        }
        let cd_size = buf.len() as u32 - cd_offset;

        put_u32(&mut buf, END_OF_CENTRAL_DIR_SIG);
        put_u16(&mut buf, 0); // this disk
        put_u16(&mut buf, 0); // disk with the central directory
        put_u16(&mut buf, self.entries.len() as u16);
        put_u16(&mut buf, self.entries.len() as u16);
        put_u32(&mut buf, cd_size);
        put_u32(&mut buf, cd_offset);
        put_u16(&mut buf, self.comment.len() as u16);
        buf.extend_from_slice(self.comment.as_bytes());

        buf
    }

    /// Write the archive to `path` in a single pass.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.finish())?;
        Ok(())
    }
}
