//! Node matching between a before and an after subtree.
//!
//! Phases, in order:
//! 1. [`top_down`]: isomorphic subtrees of sufficient height, largest first.
//! 2. [`bottom_up`]: containers whose descendants are largely matched into
//!    one after-side container; roots of the same kind always match.
//! 3. [`recovery`]: below each bottom-up pair, per-role LCS alignment of
//!    the children still unmatched.
//!
//! Under [`DiffMode::DeleteInsert`] a final pass drops every pair whose
//! parents do not correspond, so those nodes surface as Delete + Insert.

use std::cmp::Ordering;

use graft_ir::{NodeId, Tree};

use crate::{DiffConfig, DiffMode, Mapping, TreeIndex};

mod bottom_up;
mod recovery;
mod top_down;

pub(crate) struct Matching<'a> {
    pub before: &'a Tree,
    pub bi: &'a TreeIndex,
    pub after: &'a Tree,
    pub ai: &'a TreeIndex,
    pub config: &'a DiffConfig,
    pub mapping: Mapping,
}

impl Matching<'_> {
    /// Whether neither side of either subtree is matched yet.
    fn subtrees_free(&self, b: NodeId, a: NodeId) -> bool {
        self.bi
            .subtree(b)
            .iter()
            .all(|&n| !self.mapping.contains_before(n))
            && self
                .ai
                .subtree(a)
                .iter()
                .all(|&n| !self.mapping.contains_after(n))
    }

    fn is_isomorphic(&self, b: NodeId, a: NodeId) -> bool {
        self.bi.hash(b) == self.ai.hash(a) && self.before.is_same(b, self.after, a)
    }

    /// Match two isomorphic subtrees node by node.
    fn link_isomorphic(&mut self, b: NodeId, a: NodeId) {
        for (&x, &y) in self.bi.subtree(b).iter().zip(self.ai.subtree(a)) {
            self.mapping.link(x, y);
        }
    }

    /// Share of descendants of `b` matched into descendants of `a`.
    fn dice(&self, b: NodeId, a: NodeId) -> f64 {
        let (db, da) = (self.bi.descendants(b), self.ai.descendants(a));
        let total = db.len() + da.len();
        if total == 0 {
            return 0.0;
        }
        let common = db
            .iter()
            .filter_map(|&d| self.mapping.after_of(d))
            .filter(|&p| self.ai.is_descendant(p, a))
            .count();
        #[expect(
            clippy::cast_precision_loss,
            reason = "subtree sizes are far below 2^52"
        )]
        let ratio = (2 * common) as f64 / total as f64;
        ratio
    }

    fn parent_dice(&self, b: NodeId, a: NodeId) -> f64 {
        match (self.bi.parent(self.before, b), self.ai.parent(self.after, a)) {
            (Some(pb), Some(pa)) => self.dice(pb, pa),
            _ => 0.0,
        }
    }

    /// Tie-break order for competing pairs: larger subtree first, then
    /// shallower, then earlier in declaration order.
    fn tie_break(&self, x: (NodeId, NodeId), y: (NodeId, NodeId)) -> Ordering {
        let size = |(b, a): (NodeId, NodeId)| self.bi.size(b) + self.ai.size(a);
        let depth = |(b, a): (NodeId, NodeId)| self.bi.depth(b) + self.ai.depth(a);
        let order = |(b, a): (NodeId, NodeId)| (self.bi.pre_index(b), self.ai.pre_index(a));
        size(y)
            .cmp(&size(x))
            .then_with(|| depth(x).cmp(&depth(y)))
            .then_with(|| order(x).cmp(&order(y)))
    }

    /// Whether a pair sits under corresponding parents in the same role.
    fn parents_agree(&self, b: NodeId, a: NodeId) -> bool {
        match (self.bi.parent(self.before, b), self.ai.parent(self.after, a)) {
            (None, None) => true,
            (Some(pb), Some(pa)) => {
                self.mapping.after_of(pb) == Some(pa)
                    && self.before.location_in_parent(b).map(|l| l.role)
                        == self.after.location_in_parent(a).map(|l| l.role)
            }
            _ => false,
        }
    }
}

/// Compute the node mapping between two indexed subtrees.
pub(crate) fn match_trees(
    before: &Tree,
    bi: &TreeIndex,
    after: &Tree,
    ai: &TreeIndex,
    config: &DiffConfig,
) -> Mapping {
    let mut m = Matching {
        before,
        bi,
        after,
        ai,
        config,
        mapping: Mapping::new(),
    };
    top_down::run(&mut m);
    tracing::trace!(pairs = m.mapping.len(), "top-down matching done");
    bottom_up::run(&mut m);
    tracing::trace!(pairs = m.mapping.len(), "bottom-up matching done");
    if config.mode == DiffMode::DeleteInsert {
        unmatch_displaced(&mut m);
    }
    m.mapping
}

/// Drop pairs (with their whole subtrees) whose parents do not correspond.
fn unmatch_displaced(m: &mut Matching<'_>) {
    for &b in m.bi.preorder() {
        let Some(a) = m.mapping.after_of(b) else {
            continue;
        };
        if !m.parents_agree(b, a) {
            for &n in m.bi.subtree(b) {
                m.mapping.unlink_before(n);
            }
        }
    }
}
