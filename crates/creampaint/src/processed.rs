//! Side-table of elements that have already been repainted.

use std::collections::HashSet;

use crate::dom::NodeId;

/// Membership set keyed by node handle.
///
/// Holding a [`NodeId`] never keeps a node alive. Hosts that learn about
/// destroyed nodes call [`forget`](ProcessedSet::forget); otherwise the set
/// grows with the page and is dropped with the session.
#[derive(Debug, Clone, Default)]
pub struct ProcessedSet {
    nodes: HashSet<NodeId>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Marks `node`; returns false if it was already marked.
    pub fn insert(&mut self, node: NodeId) -> bool {
        self.nodes.insert(node)
    }

    pub fn forget(&mut self, node: NodeId) -> bool {
        self.nodes.remove(&node)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
