//! Edit-script replay against a working tree.
//!
//! One [`Replayer`] executes scripts both while they are generated (on a
//! private copy of the before tree) and when a pattern is applied to a
//! candidate. The two uses differ only in their [`ReplayContext`]: how a
//! before node resolves to a working node, and how values are rewritten.
//!
//! # Placement
//!
//! Inserted and moved nodes are positioned from their after-side siblings:
//! right after the nearest left sibling already present under the target,
//! else before the earliest present right sibling, else first. Positions
//! recorded in the script are informational.

use rustc_hash::FxHashMap;

use graft_ir::{
    copy_filtered_into, CopyError, CopyMap, Location, NodeId, Role, RoleError, Slot, Tree, Value,
};

use crate::{EditOp, EditScript, Mapping, NodeRef, Placement};

/// Failure to replay an operation on a working tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("{0:?} has no counterpart in the working tree")]
    Unbound(NodeRef),

    #[error("cannot delete {node}: role `{role}` of its parent is mandatory")]
    MandatorySlot { node: NodeId, role: Role },

    #[error("no value available for `{role}` of after node {node}")]
    UnboundValue { node: NodeId, role: Role },

    #[error(transparent)]
    Role(#[from] RoleError),

    #[error(transparent)]
    Copy(#[from] CopyError),
}

/// Resolution hooks for one replay.
pub trait ReplayContext {
    /// Working node standing in for `before`, if any.
    fn working_node(&self, before: NodeId) -> Option<NodeId>;

    /// Value to store in the working tree for SIMPLE `role` of after node
    /// `node`, whose after-side value is `value`.
    fn rewrite_value(
        &self,
        work: &Tree,
        after: &Tree,
        node: NodeId,
        role: Role,
        value: Value,
    ) -> Result<Value, ReplayError> {
        let _ = (node, role);
        Ok(work.translate_value(value, after))
    }
}

/// Stateful executor of edit operations.
pub struct Replayer<'a, C> {
    after: &'a Tree,
    mapping: &'a Mapping,
    ctx: C,
    /// After node -> working copy, for every node an Insert created.
    inserted: FxHashMap<NodeId, NodeId>,
    region_root: NodeId,
}

impl<'a, C: ReplayContext> Replayer<'a, C> {
    /// Replay against the region of a working tree rooted at `region_root`.
    pub fn new(after: &'a Tree, mapping: &'a Mapping, ctx: C, region_root: NodeId) -> Self {
        Replayer {
            after,
            mapping,
            ctx,
            inserted: FxHashMap::default(),
            region_root,
        }
    }

    /// Current root of the replay region; an Insert or Move without a
    /// target parent replaces it.
    #[inline]
    pub fn region_root(&self) -> NodeId {
        self.region_root
    }

    #[inline]
    pub fn context(&self) -> &C {
        &self.ctx
    }

    /// Working copy created for after node `node`, if an Insert made one.
    #[inline]
    pub fn inserted(&self, node: NodeId) -> Option<NodeId> {
        self.inserted.get(&node).copied()
    }

    /// Working node currently standing for after node `node`.
    pub fn working_of_after(&self, node: NodeId) -> Option<NodeId> {
        self.inserted(node).or_else(|| {
            self.mapping
                .before_of(node)
                .and_then(|b| self.ctx.working_node(b))
        })
    }

    pub fn resolve(&self, node: NodeRef) -> Option<NodeId> {
        match node {
            NodeRef::Before(b) => self.ctx.working_node(b),
            NodeRef::After(a) => self.working_of_after(a),
        }
    }

    fn working_node(&self, before: NodeId) -> Result<NodeId, ReplayError> {
        self.ctx
            .working_node(before)
            .ok_or(ReplayError::Unbound(NodeRef::Before(before)))
    }

    /// Run a whole script in order.
    pub fn run(&mut self, work: &mut Tree, script: &EditScript) -> Result<(), ReplayError> {
        for op in script {
            self.apply(work, op)?;
        }
        Ok(())
    }

    /// Execute one operation.
    ///
    /// Returns the working node the operation placed or changed; `None`
    /// for a Delete of an already detached node.
    pub fn apply(&mut self, work: &mut Tree, op: &EditOp) -> Result<Option<NodeId>, ReplayError> {
        match op {
            EditOp::Insert { node, at } => {
                let twin = self.copy_in(work, *node)?;
                self.place(work, twin, *node, at.as_ref())?;
                Ok(Some(twin))
            }
            EditOp::Move { node, after, at } => {
                let w = self.working_node(*node)?;
                self.place(work, w, *after, at.as_ref())?;
                Ok(Some(w))
            }
            EditOp::Update {
                node,
                after,
                role,
                value,
            } => {
                let w = self.working_node(*node)?;
                let value = value
                    .map(|v| self.ctx.rewrite_value(&*work, self.after, *after, *role, v))
                    .transpose()?;
                work.try_set_simple(w, *role, value)?;
                Ok(Some(w))
            }
            EditOp::Delete { node } => {
                let w = self.working_node(*node)?;
                let Some(loc) = work.location_in_parent(w) else {
                    return Ok(None);
                };
                let mandatory = work
                    .kind(loc.parent)
                    .role_desc(loc.role)
                    .is_some_and(|d| d.is_child() && d.mandatory);
                if mandatory {
                    return Err(ReplayError::MandatorySlot {
                        node: w,
                        role: loc.role,
                    });
                }
                work.detach(w);
                Ok(Some(w))
            }
        }
    }

    /// Copy the after subtree at `node` into `work`, leaving out matched
    /// descendants (they arrive by Move) and rewriting every value.
    fn copy_in(&mut self, work: &mut Tree, node: NodeId) -> Result<NodeId, ReplayError> {
        let mapping = self.mapping;
        let mut copies = CopyMap::new();
        let twin = copy_filtered_into(self.after, node, work, &mut copies, &mut |n| {
            !mapping.contains_after(n)
        })?;
        for (original, copy) in copies.iter() {
            for (desc, slot) in self.after.roles_and_slots(original) {
                if let Slot::Simple(Some(value)) = slot {
                    let value =
                        self.ctx
                            .rewrite_value(&*work, self.after, original, desc.role, *value)?;
                    work.try_set_simple(copy, desc.role, Some(value))?;
                }
            }
            self.inserted.insert(original, copy);
        }
        Ok(twin)
    }

    fn place(
        &mut self,
        work: &mut Tree,
        w: NodeId,
        after_node: NodeId,
        at: Option<&Placement>,
    ) -> Result<(), ReplayError> {
        let Some(at) = at else {
            return self.replace_region_root(work, w);
        };
        let parent = self.resolve(at.parent).ok_or(ReplayError::Unbound(at.parent))?;
        work.detach(w);
        let index = self.anchor_index(work, after_node, parent, at.role);
        work.try_attach(parent, at.role, index, w)?;
        Ok(())
    }

    fn replace_region_root(&mut self, work: &mut Tree, w: NodeId) -> Result<(), ReplayError> {
        let old = self.region_root;
        if old == w {
            return Ok(());
        }
        work.detach(w);
        if let Some(loc) = work.location_in_parent(old) {
            let index = work.index_in_parent(old).unwrap_or(0);
            work.detach(old);
            work.try_attach(loc.parent, loc.role, index, w)?;
        } else if work.root() == old {
            work.set_root(w);
        }
        self.region_root = w;
        Ok(())
    }

    /// Index under `(parent, role)` for the working twin of `after_node`.
    fn anchor_index(&self, work: &Tree, after_node: NodeId, parent: NodeId, role: Role) -> usize {
        let Some(loc) = self.after.location_in_parent(after_node) else {
            return 0;
        };
        let siblings = self.after.list(loc.parent, loc.role);
        let Some(pos) = siblings.iter().position(|&s| s == after_node) else {
            return 0;
        };
        let target = Some(Location { parent, role });
        let present = |s: NodeId| {
            self.working_of_after(s)
                .filter(|&ws| work.location_in_parent(ws) == target)
                .and_then(|ws| work.index_in_parent(ws))
        };
        if let Some(left) = siblings[..pos].iter().rev().find_map(|&s| present(s)) {
            return left + 1;
        }
        siblings[pos + 1..]
            .iter()
            .filter_map(|&s| present(s))
            .min()
            .unwrap_or(0)
    }
}
