//! Parallel DEFLATE driver.
//!
//! Partitions the input into 1 MiB blocks, hands contiguous block ranges to
//! a bounded pool of workers, and splices the per-worker bitstreams back
//! together in input order. Workers share nothing but the read-only input
//! and the progress counter: each block starts with a fresh dictionary, so
//! every block is a self-contained RFC 1951 block and ranges can be
//! compressed fully independently, at a small ratio cost across boundaries.

use crate::block::{CodingMode, encode_block};
use crate::lz77::{Lz77Level, MatchFinder, Token};
use parazip_core::bitsink::BitSink;
use parazip_core::error::{Error, Result};
use parazip_core::progress::{Progress, ProgressTicker};
use rayon::prelude::*;

/// Compression block size (1 MiB).
pub const BLOCK_SIZE: usize = 1024 << 10;

/// Tuning knobs for one compression run.
#[derive(Debug, Clone, Copy)]
pub struct DeflateOptions {
    /// Huffman flavour for compressed blocks.
    pub mode: CodingMode,
    /// LZ77 effort level.
    pub level: Lz77Level,
    /// Worker thread budget; clamped to the block count, minimum 1.
    pub workers: usize,
}

impl Default for DeflateOptions {
    fn default() -> Self {
        Self {
            mode: CodingMode::Dynamic,
            level: Lz77Level::default(),
            workers: 1,
        }
    }
}

/// Compress `src` into a complete deflate stream.
pub fn deflate(src: &[u8], options: &DeflateOptions) -> Result<Vec<u8>> {
    deflate_with_progress(src, options, &Progress::new())
}

/// Compress `src`, reporting finalized input bytes into `progress`.
///
/// Exactly one block in the result carries `BFINAL=1`, and it is the last.
pub fn deflate_with_progress(
    src: &[u8],
    options: &DeflateOptions,
    progress: &Progress,
) -> Result<Vec<u8>> {
    // An empty entry still needs one terminating block; the two-byte empty
    // fixed block is the smallest well-formed stream.
    if src.is_empty() {
        let mut sink = BitSink::with_capacity(16);
        encode_block(&mut sink, src, &[], CodingMode::Fixed, true)?;
        return Ok(sink.into_bytes());
    }

    let block_cnt = src.len().div_ceil(BLOCK_SIZE);
    let workers = options.workers.max(1).min(block_cnt);
    let span = block_cnt.div_ceil(workers) * BLOCK_SIZE;

    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    while start < src.len() {
        let end = (start + span).min(src.len());
        ranges.push((start, end));
        start = end;
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(ranges.len())
        .build()
        .map_err(|e| Error::worker_pool(e.to_string()))?;
    let sinks: Vec<BitSink> = pool.install(|| {
        ranges
            .par_iter()
            .map(|&(start, end)| {
                compress_range(&src[start..end], end == src.len(), options, progress)
            })
            .collect::<Result<Vec<_>>>()
    })?;

    let mut out = BitSink::with_capacity(src.len());
    for sink in &sinks {
        out.append(sink);
    }
    Ok(out.into_bytes())
}

/// Compress one worker's contiguous byte range, block by block, into its own
/// sink. Only the final block of the final range is marked last.
fn compress_range(
    src: &[u8],
    last_range: bool,
    options: &DeflateOptions,
    progress: &Progress,
) -> Result<BitSink> {
    let mut sink = BitSink::with_capacity(src.len());
    let mut finder = MatchFinder::new(options.level);
    let mut tokens: Vec<Token> = Vec::new();
    let mut ticker = ProgressTicker::new(progress);

    let mut offset = 0;
    while offset < src.len() {
        let end = (offset + BLOCK_SIZE).min(src.len());
        let block = &src[offset..end];
        finder.find(block, &mut tokens, &mut ticker);
        encode_block(
            &mut sink,
            block,
            &tokens,
            options.mode,
            last_range && end == src.len(),
        )?;
        offset = end;
    }

    ticker.flush();
    Ok(sink)
}
