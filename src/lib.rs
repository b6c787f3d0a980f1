//! huf-compress: lossless byte-stream compression with Huffman coding.
//!
//! The pipeline for compression is
//! - count byte frequencies,
//! - merge the two lightest pending nodes through a min-heap until one root
//!   remains, building the tree in an index-addressed arena,
//! - derive one bit code per symbol with an iterative depth-first walk,
//! - write the header, the tree records and the packed bit stream.
//!
//! Decompression reads the header and tree back and walks the tree bit by
//! bit until the declared number of bytes has been produced.
//!
//! Both directions build their whole output in memory and hand it to the
//! sink only on success, so a failed call writes nothing.

pub mod bitio;
pub mod codes;
pub mod config;
pub mod error;
pub mod format;
pub mod frequency;
pub mod pqueue;
pub mod tree;

use std::io::{Read, Write};

use serde::Serialize;
use tracing::debug;

use crate::codes::CodeTable;
use crate::config::HufConfig;
use crate::error::{HufError, HufResult};
use crate::format::{Dump, Header, HEADER_LEN, RECORD_LEN};
use crate::frequency::{FrequencyTable, ALPHABET_SIZE};
use crate::tree::{TreeBuilder, MAX_NODES};

/// Summary of one compression.
#[derive(Debug, Clone, Serialize)]
pub struct CompressionReport {
    pub original_size: u64,
    pub compressed_size: u64,
    pub distinct_symbols: usize,
    pub tree_size: usize,
    pub payload_bits: u64,
    pub ratio: f64,
    pub entropy_bits: f64,
}

/// Summary of one decompression.
#[derive(Debug, Clone, Serialize)]
pub struct DecompressionReport {
    pub compressed_size: u64,
    pub original_size: u64,
    pub tree_size: usize,
}

/// The main compressor engine
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    config: HufConfig,
}

impl Compressor {
    pub fn new(config: HufConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HufConfig {
        &self.config
    }

    /// Compress everything `input` yields and write the result to `output`.
    pub fn compress<R: Read, W: Write>(
        &self,
        input: R,
        mut output: W,
    ) -> HufResult<CompressionReport> {
        let data = self.read_input(input)?;
        let (encoded, report) = self.encode(&data)?;
        output.write_all(&encoded)?;
        output.flush()?;
        Ok(report)
    }

    /// Decompress a compressed stream from `input` into `output`.
    pub fn decompress<R: Read, W: Write>(
        &self,
        mut input: R,
        mut output: W,
    ) -> HufResult<DecompressionReport> {
        let limit = self.max_compressed_size();
        let mut compressed = Vec::new();
        input.take(limit.saturating_add(1)).read_to_end(&mut compressed)?;
        let (decoded, report) = self.decode(&compressed)?;
        output.write_all(&decoded)?;
        output.flush()?;
        Ok(report)
    }

    /// Describe a compressed stream's header and tree.
    pub fn inspect<R: Read>(&self, input: R) -> HufResult<Dump> {
        Dump::read_from(input)
    }

    pub fn compress_bytes(&self, data: &[u8]) -> HufResult<Vec<u8>> {
        self.encode(data).map(|(encoded, _)| encoded)
    }

    pub fn decompress_bytes(&self, data: &[u8]) -> HufResult<Vec<u8>> {
        self.decode(data).map(|(decoded, _)| decoded)
    }

    fn read_input<R: Read>(&self, input: R) -> HufResult<Vec<u8>> {
        let limit = self.config.max_input_size;
        let mut data = Vec::new();
        input.take(limit.saturating_add(1)).read_to_end(&mut data)?;
        if data.len() as u64 > limit {
            return Err(HufError::InvalidParameter(format!(
                "input exceeds max_input_size of {limit} bytes"
            )));
        }
        Ok(data)
    }

    /// Longest stream that can decode to at most `max_input_size` bytes:
    /// a header, the largest tree and a payload of worst-case codes.
    fn max_compressed_size(&self) -> u64 {
        let longest_code = (ALPHABET_SIZE - 1) as u64;
        let payload = self
            .config
            .max_input_size
            .saturating_mul(longest_code)
            .div_ceil(8);
        ((HEADER_LEN + RECORD_LEN * MAX_NODES) as u64).saturating_add(payload)
    }

    fn encode(&self, data: &[u8]) -> HufResult<(Vec<u8>, CompressionReport)> {
        if data.is_empty() {
            return Err(HufError::invalid_resource("empty input"));
        }
        let total_chars = u32::try_from(data.len())
            .ok()
            .filter(|&n| n as u64 <= self.config.max_input_size)
            .ok_or_else(|| {
                HufError::InvalidParameter(format!(
                    "input of {} bytes exceeds max_input_size of {} bytes",
                    data.len(),
                    self.config.max_input_size
                ))
            })?;

        let freq = FrequencyTable::from_bytes(data);
        let mut working = TreeBuilder::build(&freq, self.config.initial_tree_capacity)?;
        let codes = CodeTable::generate(&mut working)?;
        let tree = working.finish()?;

        let header = Header {
            total_chars,
            tree_size: tree.len() as u16,
        };
        let payload_bytes = codes.encoded_bits(&freq).div_ceil(8) as usize;
        let mut out = Vec::new();
        out.try_reserve_exact(HEADER_LEN + RECORD_LEN * tree.len() + payload_bytes)?;
        header.write_to(&mut out)?;
        format::write_tree(&tree, &mut out)?;
        let (out, stats) = bitio::pack(data, &codes, out)?;

        let report = CompressionReport {
            original_size: data.len() as u64,
            compressed_size: out.len() as u64,
            distinct_symbols: freq.distinct_count(),
            tree_size: tree.len(),
            payload_bits: stats.bits,
            ratio: out.len() as f64 / data.len() as f64,
            entropy_bits: freq.entropy_bits(),
        };
        debug!(
            original = report.original_size,
            compressed = report.compressed_size,
            payload_bits = report.payload_bits,
            "compressed"
        );
        Ok((out, report))
    }

    fn decode(&self, compressed: &[u8]) -> HufResult<(Vec<u8>, DecompressionReport)> {
        let limit = self.max_compressed_size();
        if compressed.len() as u64 > limit {
            return Err(HufError::InvalidParameter(format!(
                "compressed input exceeds {limit} bytes allowed by max_input_size of {} bytes",
                self.config.max_input_size
            )));
        }
        let mut cursor = compressed;
        let header = Header::read_from(&mut cursor)?;
        if header.total_chars as u64 > self.config.max_input_size {
            return Err(HufError::InvalidParameter(format!(
                "declared size {} exceeds max_input_size of {} bytes",
                header.total_chars, self.config.max_input_size
            )));
        }
        let tree = format::read_tree(&mut cursor, header.tree_size)?;
        // every symbol costs at least one payload bit
        if header.total_chars as u64 > cursor.len() as u64 * 8 {
            return Err(HufError::UnexpectedEof);
        }

        let mut decoded = Vec::new();
        bitio::unpack(cursor, &tree, header.total_chars as u64, &mut decoded)?;

        let report = DecompressionReport {
            compressed_size: compressed.len() as u64,
            original_size: decoded.len() as u64,
            tree_size: tree.len(),
        };
        debug!(
            compressed = report.compressed_size,
            original = report.original_size,
            tree_size = report.tree_size,
            "decompressed"
        );
        Ok((decoded, report))
    }
}
