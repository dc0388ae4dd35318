//! Matched node pairs between a before and an after tree.

use rustc_hash::FxHashMap;

use graft_ir::NodeId;

/// One-to-one before <-> after node correspondence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mapping {
    forward: FxHashMap<NodeId, NodeId>,
    backward: FxHashMap<NodeId, NodeId>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair `before` with `after`, replacing any pairing either had.
    pub fn link(&mut self, before: NodeId, after: NodeId) {
        self.unlink_before(before);
        self.unlink_after(after);
        self.forward.insert(before, after);
        self.backward.insert(after, before);
    }

    pub fn unlink_before(&mut self, before: NodeId) -> Option<NodeId> {
        let after = self.forward.remove(&before)?;
        self.backward.remove(&after);
        Some(after)
    }

    pub fn unlink_after(&mut self, after: NodeId) -> Option<NodeId> {
        let before = self.backward.remove(&after)?;
        self.forward.remove(&before);
        Some(before)
    }

    /// After-side partner of a before node.
    #[inline]
    pub fn after_of(&self, before: NodeId) -> Option<NodeId> {
        self.forward.get(&before).copied()
    }

    /// Before-side partner of an after node.
    #[inline]
    pub fn before_of(&self, after: NodeId) -> Option<NodeId> {
        self.backward.get(&after).copied()
    }

    #[inline]
    pub fn contains_before(&self, before: NodeId) -> bool {
        self.forward.contains_key(&before)
    }

    #[inline]
    pub fn contains_after(&self, after: NodeId) -> bool {
        self.backward.contains_key(&after)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// `(before, after)` pairs sorted by before id.
    pub fn pairs(&self) -> Vec<(NodeId, NodeId)> {
        let mut pairs: Vec<_> = self.forward.iter().map(|(&b, &a)| (b, a)).collect();
        pairs.sort_unstable();
        pairs
    }
}
