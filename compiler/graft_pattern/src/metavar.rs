//! Metavariables and the abstraction table of a pattern.

use std::fmt;

use rustc_hash::FxHashMap;

use graft_ir::{NodeId, TokenCategory};

use crate::Binding;

/// Index of a metavariable in its pattern's [`Abstraction`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaVarId(u32);

impl MetaVarId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        MetaVarId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A generalized token: category plus per-category ordinal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaVar {
    pub id: MetaVarId,
    pub category: TokenCategory,
    pub ordinal: u32,
}

impl fmt::Display for MetaVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}{}", self.category, self.ordinal)
    }
}

/// Which token nodes of a pattern stand for metavariables.
///
/// Empty until an abstractor runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Abstraction {
    vars: Vec<MetaVar>,
    /// Scope binding of the occurrences each variable was created from.
    bindings: Vec<Option<Binding>>,
    before: FxHashMap<NodeId, MetaVarId>,
    after: FxHashMap<NodeId, MetaVarId>,
    /// Pairs `(a, b)`, `a < b`, whose template tokens already hold the same
    /// value (a type and a name spelled alike).
    shared: Vec<(MetaVarId, MetaVarId)>,
}

impl Abstraction {
    #[inline]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn vars(&self) -> &[MetaVar] {
        &self.vars
    }

    #[inline]
    pub fn get(&self, id: MetaVarId) -> Option<MetaVar> {
        self.vars.get(id.index()).copied()
    }

    pub fn binding(&self, id: MetaVarId) -> Option<Binding> {
        self.bindings.get(id.index()).copied().flatten()
    }

    /// Variable standing at before-tree node `node`.
    #[inline]
    pub fn before_var(&self, node: NodeId) -> Option<MetaVarId> {
        self.before.get(&node).copied()
    }

    /// Variable standing at after-tree node `node`.
    #[inline]
    pub fn after_var(&self, node: NodeId) -> Option<MetaVarId> {
        self.after.get(&node).copied()
    }

    /// Before-tree occurrences of `id`, in id order.
    pub fn occurrences(&self, id: MetaVarId) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .before
            .iter()
            .filter(|&(_, &v)| v == id)
            .map(|(&n, _)| n)
            .collect();
        nodes.sort_unstable();
        nodes
    }

    /// Number of after-tree occurrences.
    pub fn after_len(&self) -> usize {
        self.after.len()
    }

    /// Whether the template itself binds `a` and `b` to one value, so a
    /// match doing the same is not aliasing.
    pub fn shares_value(&self, a: MetaVarId, b: MetaVarId) -> bool {
        let pair = if a < b { (a, b) } else { (b, a) };
        self.shared.contains(&pair)
    }

    pub(crate) fn fresh(&mut self, category: TokenCategory, binding: Option<Binding>) -> MetaVarId {
        let id = MetaVarId::new(u32::try_from(self.vars.len()).unwrap_or(u32::MAX));
        let ordinal = self.vars.iter().filter(|v| v.category == category).count();
        self.vars.push(MetaVar {
            id,
            category,
            ordinal: u32::try_from(ordinal).unwrap_or(u32::MAX),
        });
        self.bindings.push(binding);
        id
    }

    pub(crate) fn mark_before(&mut self, node: NodeId, id: MetaVarId) {
        self.before.insert(node, id);
    }

    pub(crate) fn mark_after(&mut self, node: NodeId, id: MetaVarId) {
        self.after.insert(node, id);
    }

    pub(crate) fn mark_shared(&mut self, a: MetaVarId, b: MetaVarId) {
        let pair = if a < b { (a, b) } else { (b, a) };
        if !self.shared.contains(&pair) {
            self.shared.push(pair);
        }
    }
}
