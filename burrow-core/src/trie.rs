//! Per-directory prefix trie keyed by codepoint.
//!
//! Nodes live in an arena owned by the [`Trie`]; parent links are plain ids,
//! so dropping the trie frees every node at once.

use crate::codec;
use crate::error::BurrowError;
use std::collections::HashMap;

/// Handle to a node inside one [`Trie`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<u32, NodeId>,
    parent: Option<NodeId>,
    /// Position of the entry whose name ends here
    terminal: Option<usize>,
}

#[derive(Debug)]
pub struct Trie {
    nodes: Vec<TrieNode>,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn child(&self, node: NodeId, codepoint: u32) -> Option<NodeId> {
        self.nodes[node.0].children.get(&codepoint).copied()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn terminal(&self, node: NodeId) -> Option<usize> {
        self.nodes[node.0].terminal
    }

    pub fn child_count(&self, node: NodeId) -> usize {
        self.nodes[node.0].children.len()
    }

    /// Total node count, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Walk from `node` as far as `sequence` allows.
    ///
    /// Returns the deepest node reached and the part of `sequence` that had no
    /// matching edge.
    pub fn search<'a>(&self, node: NodeId, sequence: &'a [u32]) -> (NodeId, &'a [u32]) {
        let mut current = node;
        for (consumed, &codepoint) in sequence.iter().enumerate() {
            match self.child(current, codepoint) {
                Some(next) => current = next,
                None => return (current, &sequence[consumed..]),
            }
        }
        (current, &[])
    }

    /// Insert `sequence` below `node`, marking its end with `entry`.
    ///
    /// Fails with `DuplicateKey` when the sequence already ends at a marked
    /// node; the existing marker is left untouched.
    pub fn insert(
        &mut self,
        node: NodeId,
        sequence: &[u32],
        entry: usize,
    ) -> crate::Result<NodeId> {
        let (mut current, suffix) = self.search(node, sequence);

        if suffix.is_empty() {
            if self.nodes[current.0].terminal.is_some() {
                return Err(BurrowError::DuplicateKey {
                    name: render_sequence(sequence),
                });
            }
            self.nodes[current.0].terminal = Some(entry);
            return Ok(current);
        }

        for &codepoint in suffix {
            let next = NodeId(self.nodes.len());
            self.nodes.push(TrieNode {
                children: HashMap::new(),
                parent: Some(current),
                terminal: None,
            });
            self.nodes[current.0].children.insert(codepoint, next);
            current = next;
        }
        self.nodes[current.0].terminal = Some(entry);
        Ok(current)
    }

    /// Follow forced single edges from `node` until the search branches,
    /// completes an entry, or hits a leaf.
    ///
    /// Every codepoint crossed is appended to `accumulator` as UTF-8.
    pub fn skip_to_junction(
        &self,
        node: NodeId,
        accumulator: &mut Vec<u8>,
    ) -> crate::Result<NodeId> {
        let mut current = node;
        loop {
            let data = &self.nodes[current.0];
            if data.terminal.is_some() || data.children.len() != 1 {
                return Ok(current);
            }
            let Some((&codepoint, &next)) = data.children.iter().next() else {
                return Ok(current);
            };
            codec::push_codepoint(accumulator, codepoint)?;
            current = next;
        }
    }
}

fn render_sequence(sequence: &[u32]) -> String {
    sequence
        .iter()
        .map(|&cp| char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}
