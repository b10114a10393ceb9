//! A single archive entry: metadata plus its finished payload.

use crate::zip::time::DosDateTime;
use crate::zip::{CENTRAL_DIR_HEADER_SIG, LOCAL_FILE_HEADER_SIG};
use parazip_core::crc::Crc32;
use parazip_core::error::{Error, Result};
use parazip_core::progress::Progress;
use parazip_deflate::{DeflateOptions, deflate_with_progress};
use std::fs;
use std::path::Path;

/// "version made by" / "version needed to extract": 2.0, plain deflate.
const VERSION_MADE_BY: u16 = 20;
const VERSION_NEEDED: u16 = 20;

/// Entry compression method (the ZIP method id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionMethod {
    /// Stored verbatim (method 0).
    Store,
    /// RFC 1951 deflate (method 8).
    #[default]
    Deflate,
}

impl CompressionMethod {
    /// Parse a method name as given on the command line.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "store" => Ok(Self::Store),
            "deflate" => Ok(Self::Deflate),
            other => Err(Error::unsupported_method(other)),
        }
    }

    /// The on-disk method id.
    pub fn id(self) -> u16 {
        match self {
            Self::Store => 0x0000,
            Self::Deflate => 0x0008,
        }
    }
}

/// One file's worth of archive content, compressed and checksummed.
#[derive(Debug, Clone)]
pub struct ZipEntry {
    name: String,
    method: CompressionMethod,
    modified: DosDateTime,
    crc32: u32,
    uncompressed_size: u32,
    data: Vec<u8>,
    comment: String,
}

impl ZipEntry {
    /// Build an entry from an in-memory buffer.
    ///
    /// Computes the CRC-32 over `raw`, compresses it per `method`, and
    /// rejects anything whose sizes do not fit the 32-bit ZIP fields.
    pub fn from_bytes(
        name: impl Into<String>,
        raw: &[u8],
        method: CompressionMethod,
        modified: DosDateTime,
        options: &DeflateOptions,
        progress: &Progress,
    ) -> Result<Self> {
        let name = name.into();
        if raw.len() as u64 > u32::MAX as u64 {
            return Err(Error::entry_too_large(name, raw.len() as u64));
        }

        let crc32 = Crc32::compute(raw);
        let data = match method {
            CompressionMethod::Store => {
                progress.add(raw.len() as u64);
                raw.to_vec()
            }
            CompressionMethod::Deflate => deflate_with_progress(raw, options, progress)?,
        };
        if data.len() as u64 > u32::MAX as u64 {
            return Err(Error::entry_too_large(name, data.len() as u64));
        }

        Ok(Self {
            name,
            method,
            modified,
            crc32,
            uncompressed_size: raw.len() as u32,
            data,
            comment: String::new(),
        })
    }

    /// Build an entry from a file on disk, named by the path as given and
    /// stamped with the file's modification time.
    pub fn from_file(
        path: impl AsRef<Path>,
        method: CompressionMethod,
        options: &DeflateOptions,
        progress: &Progress,
    ) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read(path)?;
        let modified = fs::metadata(path)?
            .modified()
            .map(DosDateTime::from_system_time)
            .unwrap_or_default();
        Self::from_bytes(
            path.to_string_lossy(),
            &raw,
            method,
            modified,
            options,
            progress,
        )
    }

    /// Entry name as recorded in the archive.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compression method.
    pub fn method(&self) -> CompressionMethod {
        self.method
    }

    /// CRC-32 of the uncompressed bytes.
    pub fn crc32(&self) -> u32 {
        self.crc32
    }

    /// Size of the payload as stored in the archive.
    pub fn compressed_size(&self) -> u32 {
        self.data.len() as u32
    }

    /// Original size.
    pub fn uncompressed_size(&self) -> u32 {
        self.uncompressed_size
    }

    fn name_bytes(&self) -> &[u8] {
        self.name.as_bytes()
    }

    /// Append the local file header and payload.
    pub(crate) fn write_local(&self, buf: &mut Vec<u8>) {
        put_u32(buf, LOCAL_FILE_HEADER_SIG);
        put_u16(buf, VERSION_NEEDED);
        put_u16(buf, 0); // general purpose flags
        put_u16(buf, self.method.id());
        put_u16(buf, self.modified.time);
        put_u16(buf, self.modified.date);
        put_u32(buf, self.crc32);
        put_u32(buf, self.compressed_size());
        put_u32(buf, self.uncompressed_size);
        put_u16(buf, self.name_bytes().len() as u16);
        put_u16(buf, 0); // no extra field
        buf.extend_from_slice(self.name_bytes());
        buf.extend_from_slice(&self.data);
    }

    /// Append the central directory header pointing back at `local_offset`.
    pub(crate) fn write_central(&self, buf: &mut Vec<u8>, local_offset: u32) {
        put_u32(buf, CENTRAL_DIR_HEADER_SIG);
        put_u16(buf, VERSION_MADE_BY);
        put_u16(buf, VERSION_NEEDED);
        put_u16(buf, 0); // general purpose flags
        put_u16(buf, self.method.id());
        put_u16(buf, self.modified.time);
        put_u16(buf, self.modified.date);
        put_u32(buf, self.crc32);
        put_u32(buf, self.compressed_size());
        put_u32(buf, self.uncompressed_size);
        put_u16(buf, self.name_bytes().len() as u16);
        put_u16(buf, 0); // no extra field
        put_u16(buf, self.comment.len() as u16);
        put_u16(buf, 0); // disk number start
        put_u16(buf, 0); // internal attributes
        put_u32(buf, 0); // external attributes
        put_u32(buf, local_offset);
        buf.extend_from_slice(self.name_bytes());
        buf.extend_from_slice(self.comment.as_bytes());
    }
}

pub(crate) fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

pub(crate) fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}
