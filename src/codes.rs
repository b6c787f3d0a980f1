//! Per-symbol bit codes derived from a finished working tree.

use std::fmt;

use tracing::debug;

use crate::error::{HufError, HufResult};
use crate::frequency::{FrequencyTable, ALPHABET_SIZE};
use crate::tree::{NodeIndex, WorkingTree};

/// Longest possible code: a fully skewed tree over 256 leaves is 255 deep.
pub const MAX_CODE_LEN: usize = ALPHABET_SIZE;

const WORDS: usize = MAX_CODE_LEN / 64;

/// Root-to-leaf path, `false` for left and `true` for right.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    words: [u64; WORDS],
    len: u16,
}

impl Code {
    pub fn from_path(path: &[bool]) -> HufResult<Self> {
        if path.len() > MAX_CODE_LEN {
            return Err(HufError::InvalidArguments(format!(
                "path of {} bits exceeds the {MAX_CODE_LEN}-bit code limit",
                path.len()
            )));
        }
        let mut words = [0u64; WORDS];
        for (i, &bit) in path.iter().enumerate() {
            if bit {
                words[i / 64] |= 1 << (i % 64);
            }
        }
        Ok(Self {
            words,
            len: path.len() as u16,
        })
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Step `i` of the path, counted from the root.
    pub fn bit(&self, i: usize) -> bool {
        debug_assert!(i < self.len());
        (self.words[i / 64] >> (i % 64)) & 1 == 1
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(move |i| self.bit(i))
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && (0..self.len()).all(|i| self.bit(i) == other.bit(i))
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({self})")
    }
}

/// Byte value to code mapping.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: [Option<Code>; ALPHABET_SIZE],
}

impl CodeTable {
    /// Walk `tree` depth-first with an explicit stack and record every leaf's path.
    ///
    /// A node's visited flag is set on first arrival, when the walk descends
    /// left. Arriving again means a child subtree is done; the path bit at
    /// the node's depth tells which one.
    pub fn generate(tree: &mut WorkingTree) -> HufResult<Self> {
        let root = tree
            .root()
            .ok_or_else(|| HufError::invalid_resource("tree has no root"))?;
        let nodes = tree.nodes_mut();
        for node in nodes.iter_mut() {
            node.visited = false;
        }

        let mut codes = [None; ALPHABET_SIZE];
        let mut path = [false; MAX_CODE_LEN];
        let mut stack: Vec<NodeIndex> = Vec::with_capacity(MAX_CODE_LEN + 1);
        stack.push(root);

        while let Some(&current) = stack.last() {
            let depth = stack.len() - 1;
            let node = &mut nodes[current as usize];

            let next = if node.is_leaf() {
                // a leaf root still needs one bit per symbol
                let code = if depth == 0 {
                    Code::from_path(&[false])?
                } else {
                    Code::from_path(&path[..depth])?
                };
                codes[node.symbol as usize] = Some(code);
                None
            } else if !node.visited {
                node.visited = true;
                match (node.left, node.right) {
                    (Some(left), _) => Some((false, left)),
                    (None, Some(right)) => Some((true, right)),
                    (None, None) => None,
                }
            } else if !path[depth] {
                node.right.map(|right| (true, right))
            } else {
                None
            };

            match next {
                Some((bit, child)) => {
                    if depth >= MAX_CODE_LEN {
                        return Err(HufError::invalid_resource("tree deeper than the code limit"));
                    }
                    path[depth] = bit;
                    stack.push(child);
                }
                None => {
                    stack.pop();
                }
            }
        }

        let table = Self { codes };
        debug!(
            symbols = table.iter().count(),
            max_len = table.iter().map(|(_, c)| c.len()).max().unwrap_or(0),
            "generated codes"
        );
        Ok(table)
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes[symbol as usize].as_ref()
    }

    /// Symbols with a code, in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(s, c)| c.as_ref().map(|c| (s as u8, c)))
    }

    /// Total payload length in bits for input with these frequencies.
    pub fn encoded_bits(&self, table: &FrequencyTable) -> u64 {
        self.iter()
            .map(|(s, code)| table.count(s) * code.len() as u64)
            .sum()
    }
}
