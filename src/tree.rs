//! Huffman tree construction over an index-addressed arena.
//!
//! Nodes live in one growable array and refer to each other only by
//! position. Leaves occupy the first slots in ascending byte order, internal
//! nodes are appended in creation order, and the root is always the last
//! node. A child therefore always has a smaller index than its parent.

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{HufError, HufResult};
use crate::frequency::{FrequencyTable, ALPHABET_SIZE};
use crate::pqueue::PriorityQueue;

/// Position of a node in a tree array.
pub type NodeIndex = u16;

/// Upper bound on node count: 256 leaves plus 255 merges.
pub const MAX_NODES: usize = 2 * ALPHABET_SIZE - 1;

/// Build-time node. Frequency and the visited flag never leave the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingNode {
    pub freq: u64,
    pub symbol: u8,
    pub left: Option<NodeIndex>,
    pub right: Option<NodeIndex>,
    pub visited: bool,
}

impl WorkingNode {
    pub fn leaf(symbol: u8, freq: u64) -> Self {
        Self {
            freq,
            symbol,
            left: None,
            right: None,
            visited: false,
        }
    }

    pub fn internal(freq: u64, left: Option<NodeIndex>, right: Option<NodeIndex>) -> Self {
        Self {
            freq,
            symbol: 0,
            left,
            right,
            visited: false,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Growable node arena with explicit capacity doubling.
#[derive(Debug)]
pub struct WorkingTree {
    nodes: Vec<WorkingNode>,
    capacity: usize,
    root: Option<NodeIndex>,
}

impl WorkingTree {
    pub fn with_capacity(capacity: usize) -> HufResult<Self> {
        let capacity = capacity.max(1);
        let mut nodes = Vec::new();
        nodes.try_reserve_exact(capacity)?;
        Ok(Self {
            nodes,
            capacity,
            root: None,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    pub fn get(&self, index: NodeIndex) -> Option<&WorkingNode> {
        self.nodes.get(index as usize)
    }

    pub fn nodes(&self) -> &[WorkingNode] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [WorkingNode] {
        &mut self.nodes
    }

    /// Append a node, doubling the capacity first if it is full.
    pub fn push(&mut self, node: WorkingNode) -> HufResult<NodeIndex> {
        if self.nodes.len() >= MAX_NODES {
            return Err(HufError::InvalidArguments(format!(
                "tree cannot hold more than {MAX_NODES} nodes"
            )));
        }
        if self.nodes.len() == self.capacity {
            let grown = self.capacity * 2;
            self.nodes.try_reserve_exact(grown - self.nodes.len())?;
            trace!(from = self.capacity, to = grown, "growing tree arena");
            self.capacity = grown;
        }
        let index = self.nodes.len() as NodeIndex;
        self.nodes.push(node);
        Ok(index)
    }

    /// Drop build-time state, keeping only symbols and child links.
    pub fn finish(&self) -> HufResult<HuffmanTree> {
        let root = self
            .root
            .ok_or_else(|| HufError::invalid_resource("tree has no root"))?;
        let nodes = self
            .nodes
            .iter()
            .map(|n| FinalNode {
                symbol: n.symbol,
                left: n.left,
                right: n.right,
            })
            .collect();
        HuffmanTree::new(nodes, root)
    }
}

/// Builds the working tree for one input.
pub struct TreeBuilder;

impl TreeBuilder {
    /// Seed leaves from `table` and merge them until one root remains.
    ///
    /// `initial_capacity` of 0 starts the arena with one slot per leaf.
    pub fn build(table: &FrequencyTable, initial_capacity: usize) -> HufResult<WorkingTree> {
        let distinct = table.distinct_count();
        if distinct == 0 {
            return Err(HufError::invalid_resource("cannot build a tree from empty input"));
        }

        let capacity = if initial_capacity == 0 {
            distinct
        } else {
            initial_capacity
        };
        let mut tree = WorkingTree::with_capacity(capacity)?;
        let mut queue = PriorityQueue::with_capacity(distinct)?;

        for entry in table.distinct() {
            let index = tree.push(WorkingNode::leaf(entry.symbol, entry.count))?;
            queue.insert(index, entry.count)?;
        }

        let root = if distinct == 1 {
            // A lone symbol still gets a real root so its code is one bit long.
            let only = queue.extract_min()?;
            tree.push(WorkingNode::internal(only.freq, Some(only.index), None))?
        } else {
            merge_queue(&mut queue, &mut tree)?
        };
        tree.root = Some(root);

        debug!(
            distinct_symbols = distinct,
            tree_size = tree.len(),
            root,
            "built huffman tree"
        );
        Ok(tree)
    }
}

/// Drain `queue` into `tree`, merging the two smallest entries each round.
///
/// Returns the root index once a single entry is left.
pub fn merge_queue(queue: &mut PriorityQueue, tree: &mut WorkingTree) -> HufResult<NodeIndex> {
    if tree.is_empty() {
        return Err(HufError::InvalidArguments(
            "destination tree is empty".into(),
        ));
    }
    if queue.is_empty() {
        return Err(HufError::QueueNotInitialized);
    }

    while queue.len() > 1 {
        let (left, right) = queue.extract_two_min()?;
        let freq = left.freq + right.freq;
        let index = tree.push(WorkingNode::internal(freq, Some(left.index), Some(right.index)))?;
        trace!(index, freq, left = left.index, right = right.index, "merged nodes");
        queue.insert(index, freq)?;
    }

    queue.extract_min().map(|entry| entry.index)
}

/// Serialized-form node: symbol plus child links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinalNode {
    pub symbol: u8,
    pub left: Option<NodeIndex>,
    pub right: Option<NodeIndex>,
}

impl FinalNode {
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Immutable tree used for serialization and decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<FinalNode>,
    root: NodeIndex,
}

impl HuffmanTree {
    /// Validate structure and wrap `nodes`.
    ///
    /// Every child index must lie below its parent's index, which rules out
    /// cycles, and the root must be an internal node.
    pub fn new(nodes: Vec<FinalNode>, root: NodeIndex) -> HufResult<Self> {
        if nodes.len() < 2 || nodes.len() > MAX_NODES {
            return Err(HufError::invalid_resource(format!(
                "tree size {} outside 2..={MAX_NODES}",
                nodes.len()
            )));
        }
        let root_node = nodes
            .get(root as usize)
            .ok_or_else(|| HufError::invalid_resource(format!("root {root} out of range")))?;
        if root_node.is_leaf() {
            return Err(HufError::invalid_resource("root is a leaf"));
        }
        for (i, node) in nodes.iter().enumerate() {
            for child in [node.left, node.right].into_iter().flatten() {
                if child as usize >= i {
                    return Err(HufError::invalid_resource(format!(
                        "node {i} links to child {child} that does not precede it"
                    )));
                }
            }
        }
        Ok(Self { nodes, root })
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[FinalNode] {
        &self.nodes
    }

    pub fn node(&self, index: NodeIndex) -> &FinalNode {
        &self.nodes[index as usize]
    }
}
