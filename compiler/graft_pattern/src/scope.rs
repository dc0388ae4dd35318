//! Identifier binding information supplied by a front end.

use rustc_hash::FxHashMap;

use graft_ir::{NodeId, NodeKind, Role, Tree, Value};

/// What a name occurrence refers to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Binding {
    /// A variable declared inside the routine, identified by a key the front
    /// end keeps stable across the before and after versions.
    Local(u32),
    /// Anything declared elsewhere: fields, methods, types, globals.
    Free,
}

/// Per-tree table from name nodes to their [`Binding`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct IdentifierScope {
    bindings: FxHashMap<NodeId, Binding>,
}

impl IdentifierScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, node: NodeId, binding: Binding) {
        self.bindings.insert(node, binding);
    }

    #[inline]
    pub fn binding(&self, node: NodeId) -> Option<Binding> {
        self.bindings.get(&node).copied()
    }

    /// Whether `node` is known to refer to something outside the routine.
    #[inline]
    pub fn is_free(&self, node: NodeId) -> bool {
        self.binding(node) == Some(Binding::Free)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Approximate scope from declarations alone.
    ///
    /// Names declared by parameters and local variables under `root` get a
    /// `Local` key in declaration order; every other occurrence of the same
    /// text shares that key. All remaining simple names are `Free`.
    pub fn infer(tree: &Tree, root: NodeId) -> Self {
        let mut keys: FxHashMap<&'static str, u32> = FxHashMap::default();
        for node in tree.preorder(root) {
            if !matches!(
                tree.kind(node),
                NodeKind::SingleVariableDeclaration | NodeKind::VariableDeclarationFragment
            ) {
                continue;
            }
            if let Some(text) = tree.child(node, Role::Name).and_then(|n| name_text(tree, n)) {
                let next = u32::try_from(keys.len()).unwrap_or(u32::MAX);
                keys.entry(text).or_insert(next);
            }
        }

        let mut scope = IdentifierScope::new();
        for node in tree.preorder(root) {
            if let Some(text) = name_text(tree, node) {
                let binding = keys.get(text).map_or(Binding::Free, |&k| Binding::Local(k));
                scope.bind(node, binding);
            }
        }
        scope
    }
}

fn name_text(tree: &Tree, node: NodeId) -> Option<&'static str> {
    if tree.kind(node) != NodeKind::SimpleName {
        return None;
    }
    match tree.simple(node, Role::Identifier)? {
        Value::Name(name) => Some(tree.text(name)),
        _ => None,
    }
}
