//! DEFLATE block emission.
//!
//! For one tokenized block this module produces the bitstream for one of the
//! three RFC 1951 block formats:
//!
//! - **Stored** (`BTYPE=00`): byte-aligned LEN/NLEN framing around the raw
//!   slice, split at 65535 bytes.
//! - **Fixed Huffman** (`BTYPE=01`): the code tables defined by the standard.
//! - **Dynamic Huffman** (`BTYPE=10`): per-block trees built by package-merge
//!   and shipped run-length-encoded in the block header.
//!
//! Selection happens per block: the Huffman candidate (fixed or dynamic,
//! depending on the coding mode) is built into a scratch sink and discarded
//! in favour of a stored block whenever it fails to beat the raw slice.

use crate::huffman::{
    CODELEN_ALPHABET_SIZE, CODELEN_MAX_LENGTH, DISTANCE_ALPHABET_SIZE, END_OF_BLOCK,
    HuffmanBuilder, HuffmanCodes, LITLEN_ALPHABET_SIZE, MAX_CODE_LENGTH,
};
use crate::lz77::Token;
use crate::tables::{
    CODELEN_ORDER, distance_to_code, fixed_distance_codes, fixed_litlen_codes, length_to_code,
};
use parazip_core::bitsink::{BitOrder, BitSink};
use parazip_core::error::Result;

/// Maximum payload of one stored block (16-bit LEN field).
const MAX_STORED_BLOCK: usize = 65535;

/// Huffman flavour used for compressed blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodingMode {
    /// The standard's fixed code tables.
    Fixed,
    /// Per-block trees, transmitted in the block header.
    #[default]
    Dynamic,
}

/// Encode one block, choosing between the Huffman candidate and a stored
/// fallback, and append it to `sink`.
///
/// `is_last` must be set only for the globally final block of the stream.
pub fn encode_block(
    sink: &mut BitSink,
    src: &[u8],
    tokens: &[Token],
    mode: CodingMode,
    is_last: bool,
) -> Result<()> {
    let mut candidate = BitSink::with_capacity(src.len());
    write_huffman_block(&mut candidate, tokens, mode, is_last)?;

    if !src.is_empty() && candidate.len_bytes() >= stored_size(src.len()) {
        write_stored(sink, src, is_last);
    } else {
        sink.append(&candidate);
    }
    Ok(())
}

/// Byte size of `len` bytes emitted as stored blocks, framing included.
fn stored_size(len: usize) -> usize {
    len + 5 * len.div_ceil(MAX_STORED_BLOCK).max(1)
}

/// Emit `src` as stored blocks: BFINAL, BTYPE=00, zero padding to the byte
/// boundary, then LEN, NLEN and the raw bytes. Slices beyond 65535 bytes
/// split into sub-blocks; only the final one may carry BFINAL.
pub fn write_stored(sink: &mut BitSink, src: &[u8], is_last: bool) {
    let mut rest = src;
    loop {
        let take = rest.len().min(MAX_STORED_BLOCK);
        let (chunk, tail) = rest.split_at(take);

        sink.write_bit(is_last && tail.is_empty());
        sink.write_bits(0b00, 2, BitOrder::Lsb);
        sink.align_to_byte(false);
        sink.write_bits(take as u64, 16, BitOrder::Lsb);
        sink.write_bits(!(take as u16) as u64, 16, BitOrder::Lsb);
        sink.write_bytes(chunk);

        rest = tail;
        if rest.is_empty() {
            break;
        }
    }
}

/// Emit a fixed or dynamic Huffman block for `tokens`, including the EOB.
pub fn write_huffman_block(
    sink: &mut BitSink,
    tokens: &[Token],
    mode: CodingMode,
    is_last: bool,
) -> Result<()> {
    sink.write_bit(is_last);
    match mode {
        CodingMode::Fixed => {
            sink.write_bits(0b01, 2, BitOrder::Lsb);
            write_tokens(sink, tokens, fixed_litlen_codes(), fixed_distance_codes());
        }
        CodingMode::Dynamic => {
            sink.write_bits(0b10, 2, BitOrder::Lsb);
            write_dynamic_body(sink, tokens)?;
        }
    }
    Ok(())
}

/// Token stream emission shared by fixed and dynamic blocks: Huffman codes
/// MSB-first, length/distance extra bits LSB-first, EOB terminator.
fn write_tokens(sink: &mut BitSink, tokens: &[Token], litlen: &HuffmanCodes, dist: &HuffmanCodes) {
    for token in tokens {
        match *token {
            Token::Literal(byte) => litlen.write_symbol(sink, byte as u16),
            Token::Match { length, distance } => {
                let (code, extra_bits, extra) = length_to_code(length);
                litlen.write_symbol(sink, code);
                if extra_bits > 0 {
                    sink.write_bits(extra as u64, extra_bits as usize, BitOrder::Lsb);
                }

                let (dcode, dextra_bits, dextra) = distance_to_code(distance);
                dist.write_symbol(sink, dcode);
                if dextra_bits > 0 {
                    sink.write_bits(dextra as u64, dextra_bits as usize, BitOrder::Lsb);
                }
            }
        }
    }
    litlen.write_symbol(sink, END_OF_BLOCK);
}

/// Dynamic block body: HLIT/HDIST/HCLEN header, the code-length tree, the
/// run-length-encoded literal/length and distance trees, then the tokens.
fn write_dynamic_body(sink: &mut BitSink, tokens: &[Token]) -> Result<()> {
    let mut litlen = HuffmanBuilder::new(LITLEN_ALPHABET_SIZE, MAX_CODE_LENGTH);
    let mut dist = HuffmanBuilder::new(DISTANCE_ALPHABET_SIZE, MAX_CODE_LENGTH);
    for token in tokens {
        match *token {
            Token::Literal(byte) => litlen.add(byte as u16),
            Token::Match { length, distance } => {
                litlen.add(length_to_code(length).0);
                dist.add(distance_to_code(distance).0);
            }
        }
    }
    litlen.add(END_OF_BLOCK);
    if !dist.has_counts() {
        // No back-references in this block: plant one synthetic distance
        // code so the transmitted tree still decodes.
        dist.add(0);
    }

    let litlen_codes = litlen.build()?;
    let dist_codes = dist.build()?;

    let hlit = litlen_codes.last_used_symbol().map_or(257, |s| (s + 1).max(257));
    let hdist = dist_codes.last_used_symbol().map_or(1, |s| (s + 1).max(1));

    let mut combined = Vec::with_capacity(hlit + hdist);
    combined.extend_from_slice(&litlen_codes.lengths()[..hlit]);
    combined.extend_from_slice(&dist_codes.lengths()[..hdist]);
    let (rle, rle_freqs) = rle_encode_lengths(&combined);

    let mut codelen = HuffmanBuilder::new(CODELEN_ALPHABET_SIZE, CODELEN_MAX_LENGTH);
    for (sym, &freq) in rle_freqs.iter().enumerate() {
        if freq > 0 {
            codelen.add_count(sym as u16, freq);
        }
    }
    let codelen_codes = codelen.build()?;

    let mut hclen_codes = 4;
    for (i, &sym) in CODELEN_ORDER.iter().enumerate() {
        if codelen_codes.length(sym as u16) != 0 {
            hclen_codes = hclen_codes.max(i + 1);
        }
    }

    sink.write_bits((hlit - 257) as u64, 5, BitOrder::Lsb);
    sink.write_bits((hdist - 1) as u64, 5, BitOrder::Lsb);
    sink.write_bits((hclen_codes - 4) as u64, 4, BitOrder::Lsb);
    for &sym in &CODELEN_ORDER[..hclen_codes] {
        sink.write_bits(codelen_codes.length(sym as u16) as u64, 3, BitOrder::Lsb);
    }
    for &(sym, extra, extra_bits) in &rle {
        codelen_codes.write_symbol(sink, sym as u16);
        if extra_bits > 0 {
            sink.write_bits(extra as u64, extra_bits as usize, BitOrder::Lsb);
        }
    }

    write_tokens(sink, tokens, &litlen_codes, &dist_codes);
    Ok(())
}

/// Run-length encode a code length array with the code-length alphabet:
/// 0-15 raw, 16 repeats the previous length 3-6 times (2 extra bits), 17
/// repeats zero 3-10 times (3 extra bits), 18 repeats zero 11-138 times
/// (7 extra bits). Returns `(symbol, extra_value, extra_bits)` emissions and
/// symbol frequencies for the code-length tree.
fn rle_encode_lengths(lengths: &[u8]) -> (Vec<(u8, u8, u8)>, [u64; CODELEN_ALPHABET_SIZE]) {
    let mut out = Vec::with_capacity(lengths.len());
    let mut freqs = [0u64; CODELEN_ALPHABET_SIZE];
    let mut emit = |symbols: &mut Vec<(u8, u8, u8)>, sym: u8, extra: u8, extra_bits: u8| {
        symbols.push((sym, extra, extra_bits));
        freqs[sym as usize] += 1;
    };

    let mut i = 0;
    while i < lengths.len() {
        let value = lengths[i];
        let mut run = 1;
        while i + run < lengths.len() && lengths[i + run] == value {
            run += 1;
        }
        i += run;

        if value == 0 {
            let mut left = run;
            while left >= 11 {
                let take = left.min(138);
                emit(&mut out, 18, (take - 11) as u8, 7);
                left -= take;
            }
            while left >= 3 {
                let take = left.min(10);
                emit(&mut out, 17, (take - 3) as u8, 3);
                left -= take;
            }
            for _ in 0..left {
                emit(&mut out, 0, 0, 0);
            }
        } else {
            emit(&mut out, value, 0, 0);
            let mut left = run - 1;
            while left >= 3 {
                let take = left.min(6);
                emit(&mut out, 16, (take - 3) as u8, 2);
                left -= take;
            }
            for _ in 0..left {
                emit(&mut out, value, 0, 0);
            }
        }
    }

    (out, freqs)
}
