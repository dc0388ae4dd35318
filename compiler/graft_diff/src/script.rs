//! Edit scripts and their generation.
//!
//! Generation follows Chawathe et al.: walk the after tree breadth-first
//! while replaying every emitted operation on a private copy of the before
//! tree, so each decision sees the tree as the earlier operations left it.
//! Deletes come last.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use graft_ir::{deep_copy, CopyMap, Location, NodeId, Role, Slot, SlotKind, Tree, Value};

use crate::lcs::lcs;
use crate::{DiffError, Mapping, ReplayContext, ReplayError, Replayer, TreeIndex};

/// A node named by an edit operation.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeRef {
    /// A node of the before tree.
    Before(NodeId),
    /// A node of the after tree created by an earlier Insert.
    After(NodeId),
}

/// Target of an Insert or Move.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Placement {
    pub parent: NodeRef,
    pub role: Role,
    /// Index the node ended up at when the script was generated.
    pub position: usize,
}

/// One edit operation.
///
/// `Update` values and `Insert`ed subtrees are spelled in the after
/// tree's interner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOp {
    /// Copy the after subtree at `node`, minus matched descendants.
    /// `at: None` makes it the new region root.
    Insert { node: NodeId, at: Option<Placement> },
    /// Detach the before subtree at `node`.
    Delete { node: NodeId },
    /// Set SIMPLE `role` of before node `node` to `value`.
    Update {
        node: NodeId,
        after: NodeId,
        role: Role,
        value: Option<Value>,
    },
    /// Reattach before node `node` where its partner `after` sits.
    Move {
        node: NodeId,
        after: NodeId,
        at: Option<Placement>,
    },
}

impl EditOp {
    pub const fn name(&self) -> &'static str {
        match self {
            EditOp::Insert { .. } => "insert",
            EditOp::Delete { .. } => "delete",
            EditOp::Update { .. } => "update",
            EditOp::Move { .. } => "move",
        }
    }

    pub const fn placement(&self) -> Option<&Placement> {
        match self {
            EditOp::Insert { at, .. } | EditOp::Move { at, .. } => at.as_ref(),
            EditOp::Delete { .. } | EditOp::Update { .. } => None,
        }
    }
}

/// Ordered edit operations turning a before subtree into an after subtree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditScript {
    ops: Vec<EditOp>,
}

impl EditScript {
    #[inline]
    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EditOp> {
        self.ops.iter()
    }

    /// Number of operations with the given [`EditOp::name`].
    pub fn count(&self, name: &str) -> usize {
        self.ops.iter().filter(|op| op.name() == name).count()
    }
}

impl<'a> IntoIterator for &'a EditScript {
    type Item = &'a EditOp;
    type IntoIter = std::slice::Iter<'a, EditOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

/// Resolves before nodes through the copy made for generation.
pub(crate) struct CopyContext<'m> {
    pub copies: &'m CopyMap,
}

impl ReplayContext for CopyContext<'_> {
    fn working_node(&self, before: NodeId) -> Option<NodeId> {
        self.copies.get(before)
    }
}

struct Generator<'a> {
    after: &'a Tree,
    ai: &'a TreeIndex,
    mapping: &'a Mapping,
    copies: &'a CopyMap,
    work: Tree,
    replayer: Replayer<'a, CopyContext<'a>>,
    script: EditScript,
}

impl Generator<'_> {
    fn emit(&mut self, mut op: EditOp) -> Result<(), DiffError> {
        let placed = self.replayer.apply(&mut self.work, &op)?;
        if let (
            Some(w),
            EditOp::Insert { at: Some(p), .. } | EditOp::Move { at: Some(p), .. },
        ) = (placed, &mut op)
        {
            p.position = self.work.index_in_parent(w).unwrap_or(0);
        }
        tracing::trace!(?op, "emit");
        self.script.ops.push(op);
        Ok(())
    }

    fn working(&self, before: NodeId) -> Result<NodeId, DiffError> {
        self.copies
            .get(before)
            .ok_or(DiffError::Replay(ReplayError::Unbound(NodeRef::Before(before))))
    }

    /// Where after node `x` hangs, as seen from the script.
    fn placement(&self, x: NodeId) -> Option<Placement> {
        if x == self.ai.root() {
            return None;
        }
        let loc = self.after.location_in_parent(x)?;
        let parent = match self.mapping.before_of(loc.parent) {
            Some(b) => NodeRef::Before(b),
            None => NodeRef::After(loc.parent),
        };
        Some(Placement {
            parent,
            role: loc.role,
            position: 0,
        })
    }

    fn update(&mut self, b: NodeId, x: NodeId) -> Result<(), DiffError> {
        let w = self.working(b)?;
        let mut changes: SmallVec<[(Role, Option<Value>); 2]> = SmallVec::new();
        for (desc, slot) in self.after.roles_and_slots(x) {
            let Slot::Simple(target) = slot else {
                continue;
            };
            let current = self.work.simple(w, desc.role);
            let differs = match (current, target) {
                (None, None) => false,
                (Some(c), Some(t)) => !self.work.same_value(c, self.after, *t),
                _ => true,
            };
            if differs {
                changes.push((desc.role, *target));
            }
        }
        for (role, value) in changes {
            self.emit(EditOp::Update {
                node: b,
                after: x,
                role,
                value,
            })?;
        }
        Ok(())
    }

    fn move_if_misplaced(&mut self, b: NodeId, x: NodeId) -> Result<(), DiffError> {
        let w = self.working(b)?;
        let at = self.placement(x);
        let misplaced = match &at {
            None => w != self.replayer.region_root(),
            Some(p) => {
                let target = self
                    .replayer
                    .resolve(p.parent)
                    .map(|parent| Location {
                        parent,
                        role: p.role,
                    });
                target.is_none() || self.work.location_in_parent(w) != target
            }
        };
        if misplaced {
            self.emit(EditOp::Move {
                node: b,
                after: x,
                at,
            })?;
        }
        Ok(())
    }

    /// Reorder children of a matched pair that already share the parent.
    fn align_children(&mut self, b: NodeId, x: NodeId) -> Result<(), DiffError> {
        let w = self.working(b)?;
        for desc in self.after.kind(x).roles() {
            let SlotKind::List(_) = desc.slot else {
                continue;
            };
            let role = desc.role;
            let in_work_slot = Some(Location { parent: w, role });
            let in_after_slot = Some(Location { parent: x, role });

            let after_side: SmallVec<[NodeId; 8]> = self
                .after
                .list(x, role)
                .iter()
                .copied()
                .filter(|&c| {
                    self.mapping
                        .before_of(c)
                        .and_then(|cb| self.copies.get(cb))
                        .is_some_and(|cw| self.work.location_in_parent(cw) == in_work_slot)
                })
                .collect();
            let work_side: SmallVec<[NodeId; 8]> = self
                .work
                .list(w, role)
                .iter()
                .filter_map(|&cw| self.copies.original_of(cw))
                .filter_map(|cb| self.mapping.after_of(cb))
                .filter(|&ca| self.after.location_in_parent(ca) == in_after_slot)
                .collect();

            let aligned: FxHashSet<NodeId> = lcs(&work_side, &after_side, |p, q| p == q)
                .into_iter()
                .map(|(_, j)| after_side[j])
                .collect();
            for &c in &after_side {
                if aligned.contains(&c) {
                    continue;
                }
                let Some(cb) = self.mapping.before_of(c) else {
                    continue;
                };
                self.emit(EditOp::Move {
                    node: cb,
                    after: c,
                    at: Some(Placement {
                        parent: NodeRef::Before(b),
                        role,
                        position: 0,
                    }),
                })?;
            }
        }
        Ok(())
    }
}

/// Derive the edit script for a computed mapping.
pub(crate) fn generate(
    before: &Tree,
    bi: &TreeIndex,
    after: &Tree,
    ai: &TreeIndex,
    mapping: &Mapping,
) -> Result<EditScript, DiffError> {
    let (work, copies) = deep_copy(before, bi.root())?;
    let region_root = work.root();
    let mut generator = Generator {
        after,
        ai,
        mapping,
        copies: &copies,
        work,
        replayer: Replayer::new(after, mapping, CopyContext { copies: &copies }, region_root),
        script: EditScript::default(),
    };

    for x in after.breadth_first(ai.root()) {
        match mapping.before_of(x) {
            Some(b) => {
                generator.update(b, x)?;
                generator.move_if_misplaced(b, x)?;
                generator.align_children(b, x)?;
            }
            None if generator.replayer.inserted(x).is_none() => {
                let at = generator.placement(x);
                generator.emit(EditOp::Insert { node: x, at })?;
            }
            None => {}
        }
    }

    for &b in bi.preorder() {
        let parent_kept = bi
            .parent(before, b)
            .map_or(true, |p| mapping.contains_before(p));
        if !mapping.contains_before(b) && parent_kept {
            generator.emit(EditOp::Delete { node: b })?;
        }
    }

    Ok(generator.script)
}

#[cfg(test)]
mod tests;
