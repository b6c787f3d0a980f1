//! Bit packing of code sequences, most significant bit first.

use std::io::{self, Read, Write};

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::codes::{Code, CodeTable};
use crate::error::{HufError, HufResult};
use crate::tree::HuffmanTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackStats {
    /// Code bits written, excluding padding.
    pub bits: u64,
    /// Bytes written, including the padded final byte.
    pub bytes: u64,
}

/// Accumulates code bits into bytes on top of a writer.
pub struct BitPacker<W: Write> {
    writer: BitWriter<W, BigEndian>,
    bits: u64,
}

impl<W: Write> BitPacker<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BitWriter::endian(writer, BigEndian),
            bits: 0,
        }
    }

    pub fn write_code(&mut self, code: &Code) -> io::Result<()> {
        for bit in code.iter() {
            self.writer.write_bit(bit)?;
        }
        self.bits += code.len() as u64;
        Ok(())
    }

    /// Zero-pad the last partial byte and hand back the writer.
    pub fn finish(mut self) -> io::Result<(W, PackStats)> {
        self.writer.byte_align()?;
        let stats = PackStats {
            bits: self.bits,
            bytes: self.bits.div_ceil(8),
        };
        Ok((self.writer.into_writer(), stats))
    }
}

/// Encode every byte of `data` with its code from `codes`.
pub fn pack<W: Write>(data: &[u8], codes: &CodeTable, sink: W) -> HufResult<(W, PackStats)> {
    let mut packer = BitPacker::new(sink);
    for &b in data {
        let code = codes.get(b).ok_or_else(|| {
            HufError::InvalidArguments(format!("no code for byte 0x{b:02x}"))
        })?;
        packer.write_code(code)?;
    }
    Ok(packer.finish()?)
}

/// Decode exactly `total` symbols from `source` by walking `tree`.
///
/// Stops as soon as the last symbol is emitted; any remaining bits are
/// padding and are never read.
pub fn unpack<R: Read>(
    source: R,
    tree: &HuffmanTree,
    total: u64,
    out: &mut Vec<u8>,
) -> HufResult<()> {
    let additional = usize::try_from(total).map_err(|_| {
        HufError::invalid_resource(format!("{total} symbols do not fit in memory"))
    })?;
    out.try_reserve_exact(additional)?;

    let mut reader = BitReader::endian(source, BigEndian);
    let root = tree.root();
    let mut current = root;
    let mut emitted = 0u64;

    while emitted < total {
        let bit = reader.read_bit()?;
        let node = tree.node(current);
        let next = if bit { node.right } else { node.left };
        let next = next.ok_or_else(|| {
            HufError::invalid_resource(format!("bit stream enters a missing child of node {current}"))
        })?;
        let child = tree.node(next);
        if child.is_leaf() {
            out.push(child.symbol);
            emitted += 1;
            current = root;
        } else {
            current = next;
        }
    }
    Ok(())
}
