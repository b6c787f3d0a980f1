//! On-disk layout of a compressed file.
//!
//! ```text
//! [4 bytes] total_chars  u32 LE, number of original bytes
//! [2 bytes] tree_size    u16 LE, number of tree records
//! [tree_size records]    u8 symbol, i16 LE left, i16 LE right (-1 = no child)
//! [rest]                 packed bit stream, MSB first, zero padded
//! ```
//!
//! The root sits at array position `tree_size - 1` and its record is written
//! first; the other nodes follow in array order.

use std::io::{self, Read, Write};

use serde::Serialize;

use crate::error::{HufError, HufResult};
use crate::tree::{FinalNode, HuffmanTree, NodeIndex, MAX_NODES};

pub const HEADER_LEN: usize = 6;
pub const RECORD_LEN: usize = 5;
pub const NO_CHILD: i16 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Header {
    pub total_chars: u32,
    pub tree_size: u16,
}

impl Header {
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.total_chars.to_le_bytes())?;
        w.write_all(&self.tree_size.to_le_bytes())
    }

    pub fn read_from<R: Read>(r: &mut R) -> HufResult<Self> {
        let mut buf = [0u8; HEADER_LEN];
        r.read_exact(&mut buf)?;
        let header = Header {
            total_chars: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            tree_size: u16::from_le_bytes([buf[4], buf[5]]),
        };
        header.validate()?;
        Ok(header)
    }

    fn validate(&self) -> HufResult<()> {
        if self.total_chars == 0 {
            return Err(HufError::invalid_resource("header declares zero characters"));
        }
        if self.tree_size < 2 || self.tree_size as usize > MAX_NODES {
            return Err(HufError::invalid_resource(format!(
                "tree size {} outside 2..={MAX_NODES}",
                self.tree_size
            )));
        }
        Ok(())
    }
}

fn encode_index(index: Option<NodeIndex>) -> i16 {
    match index {
        Some(i) => i as i16,
        None => NO_CHILD,
    }
}

fn decode_index(raw: i16, tree_size: usize) -> HufResult<Option<NodeIndex>> {
    match raw {
        NO_CHILD => Ok(None),
        i if i >= 0 && (i as usize) < tree_size => Ok(Some(i as NodeIndex)),
        i => Err(HufError::invalid_resource(format!(
            "child index {i} outside tree of {tree_size} nodes"
        ))),
    }
}

fn write_record<W: Write>(node: &FinalNode, w: &mut W) -> io::Result<()> {
    let symbol = if node.is_leaf() { node.symbol } else { 0 };
    w.write_all(&[symbol])?;
    w.write_all(&encode_index(node.left).to_le_bytes())?;
    w.write_all(&encode_index(node.right).to_le_bytes())
}

fn read_record<R: Read>(r: &mut R, tree_size: usize) -> HufResult<FinalNode> {
    let mut buf = [0u8; RECORD_LEN];
    r.read_exact(&mut buf)?;
    Ok(FinalNode {
        symbol: buf[0],
        left: decode_index(i16::from_le_bytes([buf[1], buf[2]]), tree_size)?,
        right: decode_index(i16::from_le_bytes([buf[3], buf[4]]), tree_size)?,
    })
}

/// Write the root record, then every other node in array order.
pub fn write_tree<W: Write>(tree: &HuffmanTree, w: &mut W) -> HufResult<()> {
    let last = tree.len() - 1;
    if tree.root() as usize != last {
        return Err(HufError::InvalidArguments(format!(
            "root {} is not the last of {} nodes",
            tree.root(),
            tree.len()
        )));
    }
    write_record(tree.node(tree.root()), w)?;
    for node in &tree.nodes()[..last] {
        write_record(node, w)?;
    }
    Ok(())
}

/// Read `tree_size` records laid out by [`write_tree`].
pub fn read_tree<R: Read>(r: &mut R, tree_size: u16) -> HufResult<HuffmanTree> {
    let size = tree_size as usize;
    let root = read_record(r, size)?;
    let mut nodes = Vec::new();
    nodes.try_reserve_exact(size)?;
    for _ in 1..size {
        nodes.push(read_record(r, size)?);
    }
    nodes.push(root);
    HuffmanTree::new(nodes, tree_size - 1)
}

/// One tree record as shown by `huf --inspect`.
#[derive(Debug, Clone, Serialize)]
pub struct DumpNode {
    pub index: usize,
    pub leaf: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<u8>,
    pub left: i16,
    pub right: i16,
}

/// Description of a compressed file without decoding its payload.
#[derive(Debug, Clone, Serialize)]
pub struct Dump {
    pub header: Header,
    pub root: usize,
    pub nodes: Vec<DumpNode>,
    pub payload_bytes: u64,
}

impl Dump {
    pub fn read_from<R: Read>(mut r: R) -> HufResult<Self> {
        let header = Header::read_from(&mut r)?;
        let tree = read_tree(&mut r, header.tree_size)?;
        let payload_bytes = io::copy(&mut r, &mut io::sink())?;
        let nodes = tree
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, n)| DumpNode {
                index,
                leaf: n.is_leaf(),
                symbol: n.is_leaf().then_some(n.symbol),
                left: encode_index(n.left),
                right: encode_index(n.right),
            })
            .collect();
        Ok(Dump {
            header,
            root: tree.root() as usize,
            nodes,
            payload_bytes,
        })
    }
}
