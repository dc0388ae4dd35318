//! Span-free structural hashing of subtrees.
//!
//! Produces, for every node of a subtree, a hash, height and size that
//! depend only on content: the kind, SIMPLE values (strings by text, so
//! hashes agree across interners) and child hashes tagged by role.
//! `NodeId`s, spans and type metadata are never hashed, so
//! `is_same(a, b)` implies equal hashes.
//!
//! # Strategy
//!
//! Post-order over the subtree. Each node's hash is computed from its
//! already-hashed children, so no recursion is needed.

use std::hash::{Hash, Hasher};
use std::mem;

use rustc_hash::FxHasher;

use crate::{NodeId, Slot, Tree, Value};

/// Content metrics of one subtree.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct SubtreeMetrics {
    pub hash: u64,
    /// Longest path to a leaf, counted in nodes (a leaf has height 1).
    pub height: u32,
    /// Number of nodes.
    pub size: u32,
}

/// Metrics for every node of one subtree, indexed by [`NodeId`].
#[derive(Clone, Debug)]
pub struct Metrics {
    by_node: Vec<Option<SubtreeMetrics>>,
}

impl Metrics {
    /// Metrics of `id`, `None` outside the measured subtree.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<SubtreeMetrics> {
        self.by_node.get(id.index()).copied().flatten()
    }

    #[inline]
    pub fn hash(&self, id: NodeId) -> u64 {
        self.get(id).map_or(0, |m| m.hash)
    }

    #[inline]
    pub fn height(&self, id: NodeId) -> u32 {
        self.get(id).map_or(0, |m| m.height)
    }

    #[inline]
    pub fn size(&self, id: NodeId) -> u32 {
        self.get(id).map_or(0, |m| m.size)
    }
}

/// Measure every node of the subtree at `root`.
pub fn subtree_metrics(tree: &Tree, root: NodeId) -> Metrics {
    let mut by_node = vec![None; tree.len()];
    for id in tree.postorder(root) {
        let mut state = FxHasher::default();
        tree.kind(id).hash(&mut state);
        let mut height = 0;
        let mut size = 1;
        for (index, slot) in tree.slots(id).iter().enumerate() {
            index.hash(&mut state);
            match slot {
                Slot::Simple(value) => hash_value(tree, *value, &mut state),
                Slot::Child(_) | Slot::List(_) => {
                    let children = slot.children();
                    children.len().hash(&mut state);
                    for &child in children {
                        let m: SubtreeMetrics = by_node[child.index()].unwrap_or_default();
                        m.hash.hash(&mut state);
                        height = height.max(m.height);
                        size += m.size;
                    }
                }
            }
        }
        by_node[id.index()] = Some(SubtreeMetrics {
            hash: state.finish(),
            height: height + 1,
            size,
        });
    }
    Metrics { by_node }
}

/// Hash only the subtree at `root`.
pub fn hash_subtree(tree: &Tree, root: NodeId) -> u64 {
    subtree_metrics(tree, root).hash(root)
}

fn hash_value(tree: &Tree, value: Option<Value>, state: &mut FxHasher) {
    let Some(value) = value else {
        u8::MAX.hash(state);
        return;
    };
    mem::discriminant(&value).hash(state);
    match value {
        Value::Name(n) | Value::Literal(n) => tree.text(n).hash(state),
        Value::Bool(b) => b.hash(state),
        Value::Op(op) => op.hash(state),
        Value::Modifiers(m) => m.bits().hash(state),
        Value::Count(c) => c.hash(state),
    }
}
