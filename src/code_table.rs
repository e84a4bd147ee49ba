//! Per-symbol bit codes derived from a Huffman tree.

use crate::error::{HuffmanError, Result};
use crate::hufftree::{HuffNode, HuffmanTree};
use crate::symbol::{Symbol, ALPHABET_SIZE};

/// Widest code a [`Code`] can hold.
pub const MAX_CODE_BITS: u8 = 64;

/// Root-to-leaf path: the low `bit_length` bits of `bits`, first edge in
/// the highest of those bits. 0 is the left branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code {
    pub bits: u64,
    pub bit_length: u8,
}

impl Code {
    /// True if `self` is a proper or equal prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        if self.bit_length > other.bit_length {
            return false;
        }
        let shift = other.bit_length - self.bit_length;
        let head = if shift >= 64 { 0 } else { other.bits >> shift };
        head == self.bits
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Assign codes by pre-order traversal. Fails if any code would be
    /// longer than `max_len` bits.
    pub fn derive(tree: &HuffmanTree, max_len: u8) -> Result<Self> {
        let limit = max_len.min(MAX_CODE_BITS);
        let mut table = CodeTable {
            codes: vec![None; ALPHABET_SIZE],
        };
        table.walk(&tree.root, 0, 0, limit)?;
        Ok(table)
    }

    fn walk(&mut self, node: &HuffNode, code: u64, depth: usize, limit: u8) -> Result<()> {
        match node {
            HuffNode::Leaf { symbol, .. } => {
                if depth > usize::from(limit) {
                    return Err(HuffmanError::UnsupportedDistribution {
                        symbol: *symbol,
                        length: depth,
                        limit,
                    });
                }
                // depth <= limit <= 64 here
                self.codes[usize::from(*symbol)] = Some(Code {
                    bits: code,
                    bit_length: depth as u8,
                });
                Ok(())
            }
            HuffNode::Internal { left, right, .. } => {
                if depth >= usize::from(limit) {
                    // any leaf below this node is already too deep
                    return Self::too_deep(node, depth, limit);
                }
                self.walk(left, code << 1, depth + 1, limit)?;
                self.walk(right, (code << 1) | 1, depth + 1, limit)
            }
        }
    }

    /// Report the leftmost leaf under `node`, which is past the limit.
    fn too_deep(node: &HuffNode, depth: usize, limit: u8) -> Result<()> {
        let mut current = node;
        let mut length = depth;
        loop {
            match current {
                HuffNode::Leaf { symbol, .. } => {
                    return Err(HuffmanError::UnsupportedDistribution {
                        symbol: *symbol,
                        length,
                        limit,
                    })
                }
                HuffNode::Internal { left, .. } => {
                    current = left;
                    length += 1;
                }
            }
        }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(usize::from(symbol)).and_then(Option::as_ref)
    }

    /// `(symbol, code)` for every symbol with a leaf.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|c| (symbol as Symbol, c)))
    }

    pub fn max_length(&self) -> u8 {
        self.iter().map(|(_, c)| c.bit_length).max().unwrap_or(0)
    }
}
