//! Locating a pattern's template in candidate trees.
//!
//! Every candidate node of the template root's kind is tried with a
//! top-down unification. Bindings go on a trail so a failed attempt can be
//! undone; alignment is greedy, so a failed attempt is never retried.

use rustc_hash::FxHashMap;

use graft_ir::{ListMode, NodeId, RoleDesc, Slot, SlotKind, Span, Tree, Value};
use graft_stack::ensure_sufficient_stack;

use crate::{MatchInstance, MetaVarId, Pattern};

/// Match search options.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MatchConfig {
    /// Source location the caller expects the match near.
    pub hint: Option<Span>,
    /// Most instances a search yields.
    pub max_results: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            hint: None,
            max_results: 32,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    pub fn new(config: MatchConfig) -> Self {
        Matcher { config }
    }

    #[inline]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Ranked instances of `pattern` in `candidate`, best first.
    ///
    /// The search runs on the first call to `next`.
    pub fn matches<'a>(&self, pattern: &'a Pattern, candidate: &'a Tree) -> MatchIter<'a> {
        MatchIter {
            pattern,
            candidate,
            config: self.config,
            ranked: None,
        }
    }
}

/// Lazy, finite sequence of match instances.
pub struct MatchIter<'a> {
    pattern: &'a Pattern,
    candidate: &'a Tree,
    config: MatchConfig,
    ranked: Option<std::vec::IntoIter<MatchInstance>>,
}

impl Iterator for MatchIter<'_> {
    type Item = MatchInstance;

    fn next(&mut self) -> Option<MatchInstance> {
        self.ranked
            .get_or_insert_with(|| search(self.pattern, self.candidate, &self.config).into_iter())
            .next()
    }
}

#[tracing::instrument(level = "debug", skip_all, fields(candidate_nodes = candidate.len()))]
fn search(pattern: &Pattern, candidate: &Tree, config: &MatchConfig) -> Vec<MatchInstance> {
    let template_root = pattern.template_root();
    let kind = pattern.before().kind(template_root);
    let mut found = Vec::new();
    for (order, node) in candidate.preorder(candidate.root()).enumerate() {
        if candidate.kind(node) != kind {
            continue;
        }
        let mut unifier = Unifier::new(pattern, candidate);
        if unifier.unify(template_root, node) {
            found.push(unifier.finish(node, order, config.hint));
        }
    }
    found.sort_by(MatchInstance::rank);
    found.truncate(config.max_results);
    tracing::debug!(found = found.len(), "matches ranked");
    found
}

#[derive(Copy, Clone)]
struct Mark {
    nodes: usize,
    values: usize,
    optional: u32,
    exact: u32,
}

struct Unifier<'a> {
    pattern: &'a Pattern,
    candidate: &'a Tree,
    /// Trail of (template, candidate) node bindings.
    nodes: Vec<(NodeId, NodeId)>,
    /// Trail of metavariable bindings.
    values: Vec<(MetaVarId, Value)>,
    /// Optional template slots seen, and those whose presence matched.
    optional: u32,
    exact: u32,
}

impl<'a> Unifier<'a> {
    fn new(pattern: &'a Pattern, candidate: &'a Tree) -> Self {
        Unifier {
            pattern,
            candidate,
            nodes: Vec::new(),
            values: Vec::new(),
            optional: 0,
            exact: 0,
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            nodes: self.nodes.len(),
            values: self.values.len(),
            optional: self.optional,
            exact: self.exact,
        }
    }

    fn rollback(&mut self, mark: Mark) {
        self.nodes.truncate(mark.nodes);
        self.values.truncate(mark.values);
        self.optional = mark.optional;
        self.exact = mark.exact;
    }

    fn bound(&self, var: MetaVarId) -> Option<Value> {
        self.values
            .iter()
            .find(|&&(v, _)| v == var)
            .map(|&(_, value)| value)
    }

    /// Unify template node `p` with candidate node `c`; on failure every
    /// binding made along the way is undone.
    fn unify(&mut self, p: NodeId, c: NodeId) -> bool {
        let mark = self.mark();
        let ok = ensure_sufficient_stack(|| self.unify_node(p, c));
        if !ok {
            self.rollback(mark);
        }
        ok
    }

    fn unify_node(&mut self, p: NodeId, c: NodeId) -> bool {
        let (pattern, candidate) = (self.pattern, self.candidate);
        let before = pattern.before();
        if before.kind(p) != candidate.kind(c) {
            return false;
        }
        let slots = candidate.slots(c);
        if before.slots(p).len() != slots.len() {
            return false;
        }
        for ((desc, ps), cs) in before.roles_and_slots(p).zip(slots) {
            let ok = match (ps, cs) {
                (Slot::Simple(pv), Slot::Simple(cv)) => self.unify_value(p, *pv, *cv),
                (Slot::Child(pc), Slot::Child(cc)) => self.unify_child(desc, *pc, *cc),
                (Slot::List(pl), Slot::List(cl)) => self.unify_list(desc, pl, cl),
                _ => false,
            };
            if !ok {
                return false;
            }
        }
        self.nodes.push((p, c));
        true
    }

    fn unify_value(&mut self, p: NodeId, pv: Option<Value>, cv: Option<Value>) -> bool {
        let (Some(pv), Some(cv)) = (pv, cv) else {
            return pv.is_none() && cv.is_none();
        };
        let pattern = self.pattern;
        let Some(var) = pattern.abstraction().before_var(p) else {
            return pattern.before().same_value(pv, self.candidate, cv);
        };
        if pv.kind() != cv.kind() {
            return false;
        }
        match self.bound(var) {
            Some(value) => value == cv,
            None => {
                self.values.push((var, cv));
                true
            }
        }
    }

    fn unify_child(&mut self, desc: &RoleDesc, pc: Option<NodeId>, cc: Option<NodeId>) -> bool {
        if !desc.mandatory {
            self.optional += 1;
            if pc.is_some() == cc.is_some() {
                self.exact += 1;
            }
        }
        match (pc, cc) {
            (Some(p), Some(c)) => self.unify(p, c),
            (Some(_), None) => false,
            (None, _) => true,
        }
    }

    fn unify_list(&mut self, desc: &RoleDesc, pl: &[NodeId], cl: &[NodeId]) -> bool {
        if desc.slot == SlotKind::List(ListMode::Exact) {
            return pl.len() == cl.len() && pl.iter().zip(cl).all(|(&p, &c)| self.unify(p, c));
        }
        // Ordered subsequence, first fit.
        let mut next = 0;
        for &p in pl {
            let Some(offset) = cl[next..].iter().position(|&c| self.unify(p, c)) else {
                return false;
            };
            next += offset + 1;
        }
        true
    }

    fn finish(self, root: NodeId, order: usize, hint: Option<Span>) -> MatchInstance {
        let specificity = if self.optional == 0 {
            1.0
        } else {
            f64::from(self.exact) / f64::from(self.optional)
        };
        let hint_distance = hint.and_then(|h| self.candidate.span(root).line_distance(&h));
        let nodes: FxHashMap<NodeId, NodeId> = self.nodes.into_iter().collect();
        let values: FxHashMap<MetaVarId, Value> = self.values.into_iter().collect();
        MatchInstance::new(
            self.pattern,
            root,
            nodes,
            values,
            specificity,
            hint_distance,
            order,
        )
    }
}

#[cfg(test)]
mod tests;
