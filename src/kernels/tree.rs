//! This module contains the prefix-tree kernels: building a Huffman tree from a
//! frequency table, walking it into a code table, and rebuilding a tree from a
//! code table read back out of a header.
//!
//! Trees live in an arena (`CodeTree`) and refer to each other by `NodeId`.
//! There is no parent pointer and no shared ownership, so both the encoder's
//! tree and the decoder's independently reconstructed tree are plain `Vec`s.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::HuffError;
use crate::types::{Code, CodeTable, FrequencyTable, Symbol};

//==================================================================================
// 1. Arena Types
//==================================================================================

/// Index of a node inside its `CodeTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Leaf(Symbol),
    /// A branch is `None` only in the single-symbol tree, or while a tree is
    /// being reconstructed from an incomplete code table.
    Internal {
        zero: Option<NodeId>,
        one: Option<NodeId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl CodeTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// The child reached from `id` by consuming `bit`. `None` for a vacant
    /// branch or when `id` is a leaf.
    pub fn child(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        match self.nodes[id.0] {
            Node::Internal { zero, one } => {
                if bit {
                    one
                } else {
                    zero
                }
            }
            Node::Leaf(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf(_)))
            .count()
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn set_child(&mut self, parent: NodeId, bit: bool, child: NodeId) -> Result<(), HuffError> {
        match &mut self.nodes[parent.0] {
            Node::Internal { zero, one } => {
                let slot = if bit { one } else { zero };
                *slot = Some(child);
                Ok(())
            }
            Node::Leaf(_) => Err(HuffError::InternalError(
                "attempted to attach a child to a leaf".to_string(),
            )),
        }
    }
}

//==================================================================================
// 2. Tree Construction
//==================================================================================

/// Priority key for the merge queue. Leaves rank by symbol index (0-256);
/// internal nodes rank from 257 upward in creation order. Ranks are unique,
/// so the queue order is total and independent of input iteration order.
type MergeKey = Reverse<(u64, u32, NodeId)>;

/// Builds a Huffman tree by repeatedly merging the two lightest nodes.
///
/// The first node popped becomes the `zero` branch of the merged node. A table
/// holding a single symbol produces a root whose `one` branch is vacant, so that
/// symbol still receives the one-bit code `0`.
pub fn build_tree(frequencies: &FrequencyTable) -> Result<CodeTree, HuffError> {
    if frequencies.is_empty() {
        return Err(HuffError::DegenerateInput);
    }

    let mut tree = CodeTree {
        nodes: Vec::with_capacity(frequencies.len() * 2),
        root: NodeId(0),
    };
    let mut queue: BinaryHeap<MergeKey> = BinaryHeap::with_capacity(frequencies.len());

    for (symbol, weight) in frequencies.iter() {
        let id = tree.push(Node::Leaf(symbol));
        queue.push(Reverse((weight, symbol.index() as u32, id)));
    }

    if queue.len() == 1 {
        let Some(Reverse((_, _, only))) = queue.pop() else {
            return Err(HuffError::InternalError("merge queue drained early".to_string()));
        };
        tree.root = tree.push(Node::Internal {
            zero: Some(only),
            one: None,
        });
        return Ok(tree);
    }

    let mut next_rank = Symbol::COUNT as u32;
    while queue.len() > 1 {
        let (Some(Reverse((w0, _, zero))), Some(Reverse((w1, _, one)))) = (queue.pop(), queue.pop())
        else {
            return Err(HuffError::InternalError("merge queue drained early".to_string()));
        };
        let merged = tree.push(Node::Internal {
            zero: Some(zero),
            one: Some(one),
        });
        queue.push(Reverse((w0.saturating_add(w1), next_rank, merged)));
        next_rank += 1;
    }

    let Some(Reverse((_, _, root))) = queue.pop() else {
        return Err(HuffError::InternalError("merge queue drained early".to_string()));
    };
    tree.root = root;
    Ok(tree)
}

//==================================================================================
// 3. Code Table Generation
//==================================================================================

/// Walks the tree and records the root-to-leaf path of every leaf.
/// Descending to `zero` appends a 0 bit, to `one` a 1 bit.
pub fn generate_codes(tree: &CodeTree) -> Result<CodeTable, HuffError> {
    if let Node::Leaf(symbol) = tree.node(tree.root()) {
        return Err(HuffError::InternalError(format!(
            "root of the code tree is the bare leaf {symbol}; codes would be empty"
        )));
    }

    let mut table = CodeTable::new();
    let mut stack: Vec<(NodeId, Code)> = vec![(tree.root(), Code::new())];

    while let Some((id, path)) = stack.pop() {
        match *tree.node(id) {
            Node::Leaf(symbol) => {
                table.insert(symbol, path);
            }
            Node::Internal { zero, one } => {
                // Push `one` first so `zero` subtrees are visited first.
                for (bit, child) in [(true, one), (false, zero)] {
                    if let Some(child) = child {
                        let mut child_path = path.clone();
                        child_path.push(bit);
                        stack.push((child, child_path));
                    }
                }
            }
        }
    }

    Ok(table)
}

//==================================================================================
// 4. Tree Reconstruction
//==================================================================================

/// Rebuilds a decoding tree from a code table by walking each code and creating
/// internal nodes on demand. Rejects tables that are not prefix-free.
pub fn reconstruct_tree(table: &CodeTable) -> Result<CodeTree, HuffError> {
    if table.is_empty() {
        return Err(HuffError::FormatError(
            "code table has no entries".to_string(),
        ));
    }

    let mut tree = CodeTree {
        nodes: Vec::with_capacity(table.len() * 2),
        root: NodeId(0),
    };
    tree.root = tree.push(Node::Internal {
        zero: None,
        one: None,
    });

    for (&symbol, code) in table {
        let Some((last_bit, path)) = code.split_last() else {
            return Err(HuffError::FormatError(format!(
                "symbol {symbol} has an empty code"
            )));
        };

        let mut current = tree.root;
        for bit in path.iter().by_vals() {
            current = match tree.child(current, bit) {
                Some(next) => match tree.node(next) {
                    Node::Internal { .. } => next,
                    Node::Leaf(other) => {
                        return Err(HuffError::FormatError(format!(
                            "code for {symbol} passes through the leaf of {other}"
                        )));
                    }
                },
                None => {
                    let created = tree.push(Node::Internal {
                        zero: None,
                        one: None,
                    });
                    tree.set_child(current, bit, created)?;
                    created
                }
            };
        }

        if tree.child(current, *last_bit).is_some() {
            return Err(HuffError::FormatError(format!(
                "code for {symbol} collides with another code"
            )));
        }
        let leaf = tree.push(Node::Leaf(symbol));
        tree.set_child(current, *last_bit, leaf)?;
    }

    Ok(tree)
}

//==================================================================================
// 5. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::frequency::analyze_slice;
    use crate::types::code_to_string;
    use bitvec::prelude::*;
    use rand::seq::SliceRandom;
    use rand::Rng;

    fn codes_as_strings(table: &CodeTable) -> Vec<(Symbol, String)> {
        table
            .iter()
            .map(|(&s, c)| (s, code_to_string(c)))
            .collect()
    }

    fn is_prefix_free(table: &CodeTable) -> bool {
        let codes: Vec<&Code> = table.values().collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j && b.len() >= a.len() && b[..a.len()] == a[..] {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn test_aab_codes_follow_tie_break_rule() {
        let table = generate_codes(&build_tree(&analyze_slice(b"aab")).unwrap()).unwrap();
        // b(1) and <EOF>(1) merge first (b ranks lower), then a(2) beats the
        // merged node(2) because leaves rank before internal nodes.
        assert_eq!(
            codes_as_strings(&table),
            vec![
                (Symbol::Byte(b'a'), "0".to_string()),
                (Symbol::Byte(b'b'), "10".to_string()),
                (Symbol::Terminator, "11".to_string()),
            ]
        );
    }

    #[test]
    fn test_single_symbol_gets_one_bit_code() {
        let tree = build_tree(&analyze_slice(b"")).unwrap();
        let table = generate_codes(&tree).unwrap();
        assert_eq!(
            codes_as_strings(&table),
            vec![(Symbol::Terminator, "0".to_string())]
        );
        assert_eq!(tree.child(tree.root(), true), None);
    }

    #[test]
    fn test_empty_table_is_degenerate() {
        let result = build_tree(&FrequencyTable::new());
        assert!(matches!(result, Err(HuffError::DegenerateInput)));
    }

    #[test]
    fn test_tie_break_ignores_iteration_order() {
        let mut rng = rand::rng();
        let mut entries: Vec<(Symbol, u64)> = (0u8..=255)
            .map(|b| (Symbol::Byte(b), rng.random_range(1..4)))
            .collect();
        entries.push((Symbol::Terminator, 1));

        let first: FrequencyTable = entries.iter().copied().collect();
        let reference = generate_codes(&build_tree(&first).unwrap()).unwrap();

        for _ in 0..8 {
            entries.shuffle(&mut rng);
            let table: FrequencyTable = entries.iter().copied().collect();
            let codes = generate_codes(&build_tree(&table).unwrap()).unwrap();
            assert_eq!(codes, reference);
        }
    }

    #[test]
    fn test_generated_codes_are_prefix_free_and_complete() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let len = rng.random_range(1..2000);
            let data: Vec<u8> = (0..len).map(|_| rng.random_range(0..40u8) * 3).collect();
            let table = generate_codes(&build_tree(&analyze_slice(&data)).unwrap()).unwrap();
            assert!(is_prefix_free(&table));

            // A full binary tree satisfies Kraft's inequality with equality.
            let kraft: f64 = table.values().map(|c| 0.5f64.powi(c.len() as i32)).sum();
            assert!((kraft - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_heavier_symbols_never_get_longer_codes() {
        let table = generate_codes(&build_tree(&analyze_slice(b"aaaaaaaabbbbccd")).unwrap()).unwrap();
        let len = |b: u8| table[&Symbol::Byte(b)].len();
        assert!(len(b'a') <= len(b'b'));
        assert!(len(b'b') <= len(b'c'));
        assert!(len(b'c') <= len(b'd'));
    }

    #[test]
    fn test_reconstruction_reproduces_code_table() {
        let data: Vec<u8> = (0u8..=255).chain(b"the quick brown fox".iter().copied()).collect();
        let built = build_tree(&analyze_slice(&data)).unwrap();
        let table = generate_codes(&built).unwrap();

        let rebuilt = reconstruct_tree(&table).unwrap();
        assert_eq!(generate_codes(&rebuilt).unwrap(), table);
        assert_eq!(rebuilt.leaf_count(), 257);
    }

    #[test]
    fn test_reconstruction_rejects_prefix_collision() {
        let mut table = CodeTable::new();
        table.insert(Symbol::Byte(b'a'), bitvec![u8, Msb0; 0]);
        table.insert(Symbol::Byte(b'b'), bitvec![u8, Msb0; 0, 1]);
        let err = reconstruct_tree(&table).unwrap_err();
        assert!(matches!(err, HuffError::FormatError(_)));

        let mut table = CodeTable::new();
        table.insert(Symbol::Byte(b'a'), bitvec![u8, Msb0; 1, 0]);
        table.insert(Symbol::Byte(b'b'), bitvec![u8, Msb0; 1]);
        assert!(matches!(
            reconstruct_tree(&table),
            Err(HuffError::FormatError(_))
        ));
    }

    #[test]
    fn test_reconstruction_rejects_empty_code_and_empty_table() {
        let mut table = CodeTable::new();
        table.insert(Symbol::Terminator, Code::new());
        assert!(matches!(
            reconstruct_tree(&table),
            Err(HuffError::FormatError(_))
        ));
        assert!(matches!(
            reconstruct_tree(&CodeTable::new()),
            Err(HuffError::FormatError(_))
        ));
    }
}
