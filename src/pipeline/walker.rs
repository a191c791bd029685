//! The decoder's tree-walk state machine.
//!
//! ```text
//!   AtRoot / EmitAndReset --bit--> AtInternalNode --bit--> ...
//!                 |                                          |
//!                 +--------------- byte leaf ----------------+--> EmitAndReset(b)
//!                 +--------------- terminator leaf ----------+--> Terminated
//! ```

use crate::error::HuffError;
use crate::kernels::tree::{CodeTree, Node, NodeId};
use crate::types::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    /// No code in progress.
    AtRoot,
    /// Part-way through a code.
    AtInternalNode(NodeId),
    /// The last bit completed a byte's code; the next bit starts at the root.
    EmitAndReset(u8),
    /// The terminator's code was read. No further bits are accepted.
    Terminated,
}

/// What one bit did to the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Emit(u8),
    Terminated,
}

#[derive(Debug)]
pub struct TreeWalker<'t> {
    tree: &'t CodeTree,
    state: WalkState,
}

impl<'t> TreeWalker<'t> {
    pub fn new(tree: &'t CodeTree) -> Self {
        Self {
            tree,
            state: WalkState::AtRoot,
        }
    }

    pub fn state(&self) -> WalkState {
        self.state
    }

    /// Consumes one bit: 0 follows the `zero` branch, 1 the `one` branch.
    pub fn feed(&mut self, bit: bool) -> Result<Step, HuffError> {
        let from = match self.state {
            WalkState::AtRoot | WalkState::EmitAndReset(_) => self.tree.root(),
            WalkState::AtInternalNode(id) => id,
            WalkState::Terminated => {
                return Err(HuffError::InternalError(
                    "bit fed to the walker after the terminator".to_string(),
                ));
            }
        };

        let next = self.tree.child(from, bit).ok_or_else(|| {
            HuffError::FormatError("payload bits lead to an unassigned code".to_string())
        })?;

        let (state, step) = match *self.tree.node(next) {
            Node::Leaf(Symbol::Terminator) => (WalkState::Terminated, Step::Terminated),
            Node::Leaf(Symbol::Byte(b)) => (WalkState::EmitAndReset(b), Step::Emit(b)),
            Node::Internal { .. } => (WalkState::AtInternalNode(next), Step::Continue),
        };
        self.state = state;
        Ok(step)
    }

    /// Checks the walk ended cleanly once the input is exhausted.
    pub fn finish(&self) -> Result<(), HuffError> {
        match self.state {
            WalkState::Terminated => Ok(()),
            WalkState::AtInternalNode(_) => Err(HuffError::FormatError(
                "payload ends in the middle of a code; the stream is truncated".to_string(),
            )),
            WalkState::AtRoot | WalkState::EmitAndReset(_) => Err(HuffError::FormatError(
                "payload ends without an end-of-payload marker".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::frequency::analyze_slice;
    use crate::kernels::tree::build_tree;

    /// a=0, b=10, <EOF>=11
    fn aab_tree() -> CodeTree {
        build_tree(&analyze_slice(b"aab")).unwrap()
    }

    fn feed_all(walker: &mut TreeWalker<'_>, bits: &[u8]) -> Vec<Step> {
        bits.iter().map(|&b| walker.feed(b == 1).unwrap()).collect()
    }

    #[test]
    fn test_walk_emits_and_terminates() {
        let tree = aab_tree();
        let mut walker = TreeWalker::new(&tree);
        let steps = feed_all(&mut walker, &[0, 0, 1, 0, 1, 1]);
        assert_eq!(
            steps,
            vec![
                Step::Emit(b'a'),
                Step::Emit(b'a'),
                Step::Continue,
                Step::Emit(b'b'),
                Step::Continue,
                Step::Terminated,
            ]
        );
        assert_eq!(walker.state(), WalkState::Terminated);
        assert!(walker.finish().is_ok());
    }

    #[test]
    fn test_states_track_progress() {
        let tree = aab_tree();
        let mut walker = TreeWalker::new(&tree);
        assert_eq!(walker.state(), WalkState::AtRoot);
        walker.feed(true).unwrap();
        assert!(matches!(walker.state(), WalkState::AtInternalNode(_)));
        walker.feed(false).unwrap();
        assert_eq!(walker.state(), WalkState::EmitAndReset(b'b'));
    }

    #[test]
    fn test_exhaustion_mid_code_is_truncation() {
        let tree = aab_tree();
        let mut walker = TreeWalker::new(&tree);
        feed_all(&mut walker, &[0, 1]);
        assert!(matches!(
            walker.finish(),
            Err(HuffError::FormatError(msg)) if msg.contains("truncated")
        ));
    }

    #[test]
    fn test_exhaustion_without_terminator_is_error() {
        let tree = aab_tree();
        let mut walker = TreeWalker::new(&tree);
        feed_all(&mut walker, &[0, 1, 0]);
        assert!(matches!(
            walker.finish(),
            Err(HuffError::FormatError(msg)) if msg.contains("end-of-payload")
        ));
    }

    #[test]
    fn test_vacant_branch_is_format_error() {
        // Empty input: <EOF>=0 and the `one` branch of the root is vacant.
        let tree = build_tree(&analyze_slice(b"")).unwrap();
        let mut walker = TreeWalker::new(&tree);
        assert!(matches!(walker.feed(true), Err(HuffError::FormatError(_))));
    }

    #[test]
    fn test_bits_after_terminator_are_refused() {
        let tree = build_tree(&analyze_slice(b"")).unwrap();
        let mut walker = TreeWalker::new(&tree);
        assert_eq!(walker.feed(false).unwrap(), Step::Terminated);
        assert!(matches!(walker.feed(false), Err(HuffError::InternalError(_))));
    }
}
