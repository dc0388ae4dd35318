//! Bindings of a pattern template into a candidate tree.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;

use graft_ir::{CopyMap, NodeId, Value};

use crate::{MetaVarId, Pattern};

/// Why a match instance cannot be applied.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MatchProblem {
    #[error("metavariables {first:?} and {second:?} are bound to the same value")]
    Aliasing { first: MetaVarId, second: MetaVarId },

    #[error("template node {0} has no counterpart")]
    MissingBinding(NodeId),

    #[error("metavariable {0:?} is unbound")]
    UnboundMetaVar(MetaVarId),
}

/// One way the template of a pattern sits in a candidate tree.
///
/// Metavariable values are spelled in the candidate's interner.
#[derive(Clone, Debug)]
pub struct MatchInstance {
    template_root: NodeId,
    root: NodeId,
    nodes: FxHashMap<NodeId, NodeId>,
    values: FxHashMap<MetaVarId, Value>,
    specificity: f64,
    hint_distance: Option<u32>,
    order: usize,
    problems: Vec<MatchProblem>,
}

impl MatchInstance {
    pub(crate) fn new(
        pattern: &Pattern,
        root: NodeId,
        nodes: FxHashMap<NodeId, NodeId>,
        values: FxHashMap<MetaVarId, Value>,
        specificity: f64,
        hint_distance: Option<u32>,
        order: usize,
    ) -> Self {
        let problems = problems(pattern, &nodes, &values);
        MatchInstance {
            template_root: pattern.template_root(),
            root,
            nodes,
            values,
            specificity,
            hint_distance,
            order,
            problems,
        }
    }

    /// Candidate node bound to the template root.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Candidate node bound to template node `node`.
    #[inline]
    pub fn get(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).copied()
    }

    #[inline]
    pub fn value(&self, var: MetaVarId) -> Option<Value> {
        self.values.get(&var).copied()
    }

    /// `(template, candidate)` node pairs sorted by template id.
    pub fn bindings(&self) -> Vec<(NodeId, NodeId)> {
        let mut pairs: Vec<_> = self.nodes.iter().map(|(&p, &c)| (p, c)).collect();
        pairs.sort_unstable();
        pairs
    }

    /// Metavariable values sorted by variable id.
    pub fn values(&self) -> Vec<(MetaVarId, Value)> {
        let mut values: Vec<_> = self.values.iter().map(|(&v, &x)| (v, x)).collect();
        values.sort_unstable_by_key(|&(v, _)| v);
        values
    }

    /// Share of optional template slots whose presence the candidate
    /// reproduces exactly; 1.0 when the template has none.
    #[inline]
    pub fn specificity(&self) -> f64 {
        self.specificity
    }

    /// Lines between the match and the requested hint.
    #[inline]
    pub fn hint_distance(&self) -> Option<u32> {
        self.hint_distance
    }

    /// Pre-order position of the match root in the candidate.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn problems(&self) -> &[MatchProblem] {
        &self.problems
    }

    #[inline]
    pub fn is_legal(&self) -> bool {
        self.problems.is_empty()
    }

    /// The same instance on a copy of the candidate.
    ///
    /// Values carry over unchanged, so the copy must share the candidate's
    /// interner (as [`graft_ir::deep_copy`] copies do). Nodes the copy lacks
    /// surface as [`MatchProblem::MissingBinding`].
    #[must_use]
    pub fn translate(&self, copies: &CopyMap) -> MatchInstance {
        let mut problems = self.problems.clone();
        let mut nodes = FxHashMap::default();
        for (&p, &c) in &self.nodes {
            match copies.get(c) {
                Some(w) => {
                    nodes.insert(p, w);
                }
                None => problems.push(MatchProblem::MissingBinding(p)),
            }
        }
        problems.sort_by_key(problem_key);
        problems.dedup();
        MatchInstance {
            template_root: self.template_root,
            root: copies.get(self.root).unwrap_or(NodeId::INVALID),
            nodes,
            values: self.values.clone(),
            specificity: self.specificity,
            hint_distance: self.hint_distance,
            order: self.order,
            problems,
        }
    }

    /// Best first: more specific, closer to the hint, earlier.
    pub(crate) fn rank(&self, other: &MatchInstance) -> Ordering {
        let distance = |m: &MatchInstance| m.hint_distance.unwrap_or(u32::MAX);
        other
            .specificity
            .total_cmp(&self.specificity)
            .then_with(|| distance(self).cmp(&distance(other)))
            .then_with(|| self.order.cmp(&other.order))
    }
}

fn problem_key(problem: &MatchProblem) -> (u8, u32, u32) {
    match *problem {
        MatchProblem::Aliasing { first, second } => (0, first.raw(), second.raw()),
        MatchProblem::MissingBinding(node) => (1, node.raw(), 0),
        MatchProblem::UnboundMetaVar(var) => (2, var.raw(), 0),
    }
}

fn problems(
    pattern: &Pattern,
    nodes: &FxHashMap<NodeId, NodeId>,
    values: &FxHashMap<MetaVarId, Value>,
) -> Vec<MatchProblem> {
    let mut problems: Vec<MatchProblem> = pattern
        .template_nodes()
        .filter(|p| !nodes.contains_key(p))
        .map(MatchProblem::MissingBinding)
        .collect();

    let abstraction = pattern.abstraction();
    problems.extend(
        abstraction
            .vars()
            .iter()
            .filter(|v| !values.contains_key(&v.id))
            .map(|v| MatchProblem::UnboundMetaVar(v.id)),
    );

    let mut bound: Vec<(MetaVarId, Value)> = values.iter().map(|(&v, &x)| (v, x)).collect();
    bound.sort_unstable_by_key(|&(v, _)| v);
    for (i, &(first, x)) in bound.iter().enumerate() {
        for &(second, y) in &bound[i + 1..] {
            if x == y && !abstraction.shares_value(first, second) {
                problems.push(MatchProblem::Aliasing { first, second });
            }
        }
    }
    problems
}
