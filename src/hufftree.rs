use std::cmp::Ordering;
use std::io::Read;

use tracing::trace;

use crate::bit_io::BitReader;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;
use crate::symbol::{EofMode, Symbol};

/// Weight given to the end-of-stream leaf.
pub const EOF_WEIGHT: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u32,
        symbol: Symbol,
    },
    Internal {
        weight: u32,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(symbol: Symbol, weight: u32) -> Self {
        HuffNode::Leaf { weight, symbol }
    }

    pub fn weight(&self) -> u32 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    /// Join two subtrees; `a` becomes the 0-branch.
    pub fn merge(a: Self, b: Self) -> Result<Self> {
        let weight = a
            .weight()
            .checked_add(b.weight())
            .ok_or(HuffmanError::WeightOverflow)?;
        Ok(HuffNode::Internal {
            weight,
            left: Box::new(a),
            right: Box::new(b),
        })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

/// A node waiting in the build queue. Equal weights leave the queue in the
/// order they entered it, so encoder and decoder build the same tree.
#[derive(Debug)]
struct Queued {
    weight: u32,
    seq: u32,
    node: HuffNode,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    /// Build the tree for a frequency table.
    ///
    /// Present bytes are queued in ascending order, then the end-of-stream
    /// leaf. Both the compressor and the expander go through here.
    pub fn from_frequencies(frequencies: &FrequencyTable, eof: EofMode) -> Result<Self> {
        let nodes = frequencies
            .iter_present()
            .map(|(byte, count)| HuffNode::new(Symbol::from(byte), count))
            .chain(std::iter::once(HuffNode::new(eof.symbol(), EOF_WEIGHT)));
        Self::build(nodes)
    }

    /// Repeatedly merge the two lightest nodes until one remains.
    pub fn build(nodes: impl IntoIterator<Item = HuffNode>) -> Result<Self> {
        let queued: Vec<Queued> = nodes
            .into_iter()
            .zip(0u32..)
            .map(|(node, seq)| Queued {
                weight: node.weight(),
                seq,
                node,
            })
            .collect();
        let mut seq = queued.len() as u32;
        let mut heap = MinHeap::build(queued)?;

        while heap.heap_size() > 1 {
            let x = heap.extract_min()?;
            let y = heap.extract_min()?;
            let node = HuffNode::merge(x.node, y.node)?;
            heap.insert(Queued {
                weight: node.weight(),
                seq,
                node,
            });
            seq += 1;
        }

        let root = heap.extract_min()?.node;
        let tree = HuffmanTree { root };
        trace!(
            leaves = tree.root.leaf_count(),
            depth = tree.depth(),
            weight = tree.root.weight(),
            "huffman tree built"
        );
        Ok(tree)
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Walk from the root, one bit per edge, until a leaf is reached.
    /// A single-leaf tree consumes no bits.
    pub fn decode_one<R: Read>(&self, bits: &mut BitReader<R>) -> Result<Symbol> {
        let mut current_node = &self.root;
        loop {
            match current_node {
                HuffNode::Leaf { symbol, .. } => return Ok(*symbol),
                HuffNode::Internal { left, right, .. } => {
                    current_node = if bits.read_bit()? { right } else { left };
                }
            }
        }
    }
}
