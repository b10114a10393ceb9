//! End-to-end archive checks: the produced bytes must parse as a ZIP any
//! unzipper accepts, and deflated payloads must inflate back to the input.

use flate2::read::DeflateDecoder;
use parazip_archive::{CompressionMethod, DosDateTime, ZipEntry, ZipWriter};
use parazip_core::{Crc32, Progress};
use parazip_deflate::DeflateOptions;
use std::io::Read;

fn build_entry(name: &str, raw: &[u8], method: CompressionMethod) -> ZipEntry {
    ZipEntry::from_bytes(
        name,
        raw,
        method,
        DosDateTime::default(),
        &DeflateOptions {
            workers: 2,
            ..DeflateOptions::default()
        },
        &Progress::new(),
    )
    .unwrap()
}

/// Minimal reader for the archives this crate writes: walks local headers
/// and returns (name, method, crc, payload) per entry.
fn parse_entries(archive: &[u8]) -> Vec<(String, u16, u32, Vec<u8>)> {
    let mut entries = Vec::new();
    let mut pos = 0;
    while u32::from_le_bytes(archive[pos..pos + 4].try_into().unwrap()) == 0x04034B50 {
        let method = u16::from_le_bytes([archive[pos + 8], archive[pos + 9]]);
        let crc = u32::from_le_bytes(archive[pos + 14..pos + 18].try_into().unwrap());
        let csize =
            u32::from_le_bytes(archive[pos + 18..pos + 22].try_into().unwrap()) as usize;
        let name_len = u16::from_le_bytes([archive[pos + 26], archive[pos + 27]]) as usize;
        let extra_len = u16::from_le_bytes([archive[pos + 28], archive[pos + 29]]) as usize;
        let name = String::from_utf8(archive[pos + 30..pos + 30 + name_len].to_vec()).unwrap();
        let data_start = pos + 30 + name_len + extra_len;
        let payload = archive[data_start..data_start + csize].to_vec();
        entries.push((name, method, crc, payload));
        pos = data_start + csize;
    }
    entries
}

#[test]
fn archive_extracts_with_reference_decoder() {
    let text: Vec<u8> = b"pack my box with five dozen liquor jugs. ".repeat(500);
    let blob: Vec<u8> = (0u32..10_000)
        .map(|i| (i.wrapping_mul(2654435761) >> 24) as u8)
        .collect();

    let mut writer = ZipWriter::new();
    writer.add_entry(build_entry("text.txt", &text, CompressionMethod::Deflate));
    writer.add_entry(build_entry("blob.bin", &blob, CompressionMethod::Store));
    let archive = writer.finish();

    let entries = parse_entries(&archive);
    assert_eq!(entries.len(), 2);

    let (name, method, crc, payload) = &entries[0];
    assert_eq!(name, "text.txt");
    assert_eq!(*method, 0x0008);
    let mut inflated = Vec::new();
    DeflateDecoder::new(payload.as_slice())
        .read_to_end(&mut inflated)
        .unwrap();
    assert_eq!(inflated, text);
    assert_eq!(*crc, Crc32::compute(&text));

    let (name, method, crc, payload) = &entries[1];
    assert_eq!(name, "blob.bin");
    assert_eq!(*method, 0x0000);
    assert_eq!(payload, &blob);
    assert_eq!(*crc, Crc32::compute(&blob));
}

#[test]
fn central_directory_agrees_with_local_headers() {
    let raw = b"central directory agreement check".repeat(10);
    let mut writer = ZipWriter::new();
    writer.add_entry(build_entry("one", &raw, CompressionMethod::Deflate));
    writer.add_entry(build_entry("two", &raw, CompressionMethod::Store));
    let archive = writer.finish();

    let eocd = archive.len() - 22;
    let cd_offset =
        u32::from_le_bytes(archive[eocd + 16..eocd + 20].try_into().unwrap()) as usize;

    let mut pos = cd_offset;
    let mut locals = Vec::new();
    for _ in 0..2 {
        assert_eq!(
            u32::from_le_bytes(archive[pos..pos + 4].try_into().unwrap()),
            0x02014B50
        );
        let crc = u32::from_le_bytes(archive[pos + 16..pos + 20].try_into().unwrap());
        let csize = u32::from_le_bytes(archive[pos + 20..pos + 24].try_into().unwrap());
        let usize_ = u32::from_le_bytes(archive[pos + 24..pos + 28].try_into().unwrap());
        let name_len = u16::from_le_bytes([archive[pos + 28], archive[pos + 29]]) as usize;
        let comment_len = u16::from_le_bytes([archive[pos + 32], archive[pos + 33]]) as usize;
        let offset =
            u32::from_le_bytes(archive[pos + 42..pos + 46].try_into().unwrap()) as usize;
        locals.push((crc, csize, usize_, offset));
        pos += 46 + name_len + comment_len;
    }
    assert_eq!(pos, eocd);

    // Each central record's offset lands on a matching local header.
    for (crc, csize, usize_, offset) in locals {
        assert_eq!(
            u32::from_le_bytes(archive[offset..offset + 4].try_into().unwrap()),
            0x04034B50
        );
        let lcrc = u32::from_le_bytes(archive[offset + 14..offset + 18].try_into().unwrap());
        let lcsize = u32::from_le_bytes(archive[offset + 18..offset + 22].try_into().unwrap());
        let lusize = u32::from_le_bytes(archive[offset + 22..offset + 26].try_into().unwrap());
        assert_eq!(lcrc, crc);
        assert_eq!(lcsize, csize);
        assert_eq!(lusize, usize_);
        assert_eq!(usize_, raw.len() as u32);
    }
}

#[test]
fn empty_file_entry_has_two_byte_payload() {
    let mut writer = ZipWriter::new();
    writer.add_entry(build_entry("empty", b"", CompressionMethod::Deflate));
    let archive = writer.finish();

    let entries = parse_entries(&archive);
    let (_, method, crc, payload) = &entries[0];
    assert_eq!(*method, 0x0008);
    assert_eq!(*crc, 0);
    assert_eq!(payload, &[0x03, 0x00]);

    let mut inflated = Vec::new();
    DeflateDecoder::new(payload.as_slice())
        .read_to_end(&mut inflated)
        .unwrap();
    assert!(inflated.is_empty());
}
