//! Deep copy with a node-to-node map.
//!
//! A copy walks the source subtree in pre-order: each node is shallow-cloned
//! into the destination, recorded in both directions of the [`CopyMap`],
//! and its children are copied and attached under the twin in the same
//! roles and order. After a full copy, the twin is `is_same` to the
//! original and the map is a bijection over both subtrees.

use std::sync::Arc;

use graft_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;

use crate::{CopyError, NodeId, Tree};

/// Bidirectional original <-> copy table from one copy operation.
#[derive(Clone, Debug, Default)]
pub struct CopyMap {
    forward: FxHashMap<NodeId, NodeId>,
    backward: FxHashMap<NodeId, NodeId>,
}

impl CopyMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, original: NodeId, copy: NodeId) {
        self.forward.insert(original, copy);
        self.backward.insert(copy, original);
    }

    /// Copy of `original`.
    #[inline]
    pub fn get(&self, original: NodeId) -> Option<NodeId> {
        self.forward.get(&original).copied()
    }

    /// Original that `copy` was made from.
    #[inline]
    pub fn original_of(&self, copy: NodeId) -> Option<NodeId> {
        self.backward.get(&copy).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// `(original, copy)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.forward.iter().map(|(&o, &c)| (o, c))
    }
}

/// Copy the subtree at `root` into a fresh tree sharing `tree`'s interner.
///
/// The copy's root is the twin of `root`.
#[tracing::instrument(level = "trace", skip(tree))]
pub fn deep_copy(tree: &Tree, root: NodeId) -> Result<(Tree, CopyMap), CopyError> {
    let mut dest = Tree::new(Arc::clone(tree.interner()));
    let mut map = CopyMap::new();
    let twin = copy_subtree_into(tree, root, &mut dest, &mut map)?;
    dest.set_root(twin);
    Ok((dest, map))
}

/// Copy the subtree at `root` of `src` into `dest` as a detached subtree.
///
/// Names are re-interned when the two trees use different interners.
pub fn copy_subtree_into(
    src: &Tree,
    root: NodeId,
    dest: &mut Tree,
    map: &mut CopyMap,
) -> Result<NodeId, CopyError> {
    copy_filtered_into(src, root, dest, map, &mut |_| true)
}

/// Like [`copy_subtree_into`], but descendants for which `keep` returns
/// `false` are skipped together with their subtrees, leaving their slot
/// positions empty in the copy. `root` itself is always copied.
pub fn copy_filtered_into(
    src: &Tree,
    root: NodeId,
    dest: &mut Tree,
    map: &mut CopyMap,
    keep: &mut dyn FnMut(NodeId) -> bool,
) -> Result<NodeId, CopyError> {
    if !src.contains(root) {
        return Err(CopyError::InvalidNode(root));
    }
    let kind = src.kind(root);
    let roles = kind.roles();
    let slots = src.slots(root);
    if roles.len() != slots.len() || !roles.iter().zip(slots).all(|(d, s)| s.fits(d)) {
        return Err(CopyError::SlotLayout { node: root, kind });
    }

    let twin = src.shallow_clone_into(root, dest);
    map.record(root, twin);

    ensure_sufficient_stack(|| {
        for (desc, slot) in roles.iter().zip(slots) {
            for &child in slot.children() {
                if !keep(child) {
                    continue;
                }
                let copy = copy_filtered_into(src, child, dest, map, keep)?;
                dest.try_attach(twin, desc.role, usize::MAX, copy)?;
            }
        }
        Ok(twin)
    })
}

#[cfg(test)]
mod tests;
