//! Arena-backed syntax tree.
//!
//! [`Tree`] stores nodes in struct-of-arrays layout (parallel `kinds`,
//! `spans`, `parents`, `slots`, `types` vectors indexed by [`NodeId`]).
//! Each node's slots follow the order of [`NodeKind::roles`], so a role is
//! resolved to a slot index through the static role table and never stored.
//!
//! # Ownership
//!
//! A node is owned by the slot that holds it; the `parents` column mirrors
//! that edge. Every mutator keeps both directions in agreement. Detached
//! nodes stay in the arena as unreachable garbage until the tree is dropped.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::node_id::to_u32;
use crate::{
    ConsistencyError, Name, NodeId, NodeKind, Role, RoleDesc, RoleError, SharedInterner,
    SlotKind, Span, Value,
};

/// Where a node hangs: its parent and the role it occupies there.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub parent: NodeId,
    pub role: Role,
}

/// Contents of one role of one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    Simple(Option<Value>),
    Child(Option<NodeId>),
    List(SmallVec<[NodeId; 4]>),
}

impl Slot {
    fn empty(desc: &RoleDesc) -> Slot {
        match desc.slot {
            SlotKind::Simple(_) => Slot::Simple(None),
            SlotKind::Child => Slot::Child(None),
            SlotKind::List(_) => Slot::List(SmallVec::new()),
        }
    }

    /// Whether this slot has the storage `desc` declares.
    pub fn fits(&self, desc: &RoleDesc) -> bool {
        match (self, desc.slot) {
            (Slot::Simple(value), SlotKind::Simple(kind)) => {
                value.map_or(true, |v| v.kind() == kind)
            }
            (Slot::Child(_), SlotKind::Child) | (Slot::List(_), SlotKind::List(_)) => true,
            _ => false,
        }
    }

    /// Children held by this slot, in order.
    pub fn children(&self) -> &[NodeId] {
        match self {
            Slot::Simple(_) => &[],
            Slot::Child(child) => child.as_slice(),
            Slot::List(items) => items,
        }
    }
}

/// Borrowed view of a slot returned by [`Tree::get`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlotRef<'a> {
    Simple(Option<Value>),
    Child(Option<NodeId>),
    List(&'a [NodeId]),
}

/// A syntax tree.
///
/// # Index Spaces
///
/// - `kinds`/`spans`/`parents`/`slots`/`types`: parallel arrays indexed by
///   [`NodeId`]
#[derive(Clone)]
pub struct Tree {
    interner: SharedInterner,
    /// Node kinds (parallel with all other columns).
    kinds: Vec<NodeKind>,
    /// Source provenance; never compared.
    spans: Vec<Span>,
    /// Back edge of the owning slot, `None` for the root and detached nodes.
    parents: Vec<Option<Location>>,
    /// Slot contents in declared role order.
    slots: Vec<SmallVec<[Slot; 4]>>,
    /// Resolved type names from the front end; never compared.
    types: Vec<Option<Name>>,
    root: NodeId,
}

impl Tree {
    /// Create an empty tree using `interner` for its tokens.
    pub fn new(interner: SharedInterner) -> Self {
        Tree {
            interner,
            kinds: Vec::new(),
            spans: Vec::new(),
            parents: Vec::new(),
            slots: Vec::new(),
            types: Vec::new(),
            root: NodeId::INVALID,
        }
    }

    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Whether both trees intern their tokens in the same interner.
    #[inline]
    pub fn shares_interner(&self, other: &Tree) -> bool {
        Arc::ptr_eq(&self.interner, &other.interner)
    }

    #[inline]
    pub fn intern(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    #[inline]
    pub fn text(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    /// Number of allocated nodes, including detached ones.
    #[inline]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Whether `id` was allocated by this tree.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.is_valid() && id.index() < self.kinds.len()
    }

    /// Allocate a detached node with empty slots.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId::new(to_u32(self.kinds.len(), "tree nodes"));
        self.kinds.push(kind);
        self.spans.push(span);
        self.parents.push(None);
        self.slots
            .push(kind.roles().iter().map(Slot::empty).collect());
        self.types.push(None);
        id
    }

    /// Root node, `NodeId::INVALID` for an empty tree.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.kinds[id.index()]
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.spans[id.index()]
    }

    #[inline]
    pub fn set_span(&mut self, id: NodeId, span: Span) {
        self.spans[id.index()] = span;
    }

    /// Resolved type name attached by the front end.
    #[inline]
    pub fn type_name(&self, id: NodeId) -> Option<Name> {
        self.types[id.index()]
    }

    #[inline]
    pub fn set_type_name(&mut self, id: NodeId, ty: Option<Name>) {
        self.types[id.index()] = ty;
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents[id.index()].map(|loc| loc.parent)
    }

    #[inline]
    pub fn location_in_parent(&self, id: NodeId) -> Option<Location> {
        self.parents[id.index()]
    }

    /// Position of `id` within its parent slot (0 for CHILD slots).
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let loc = self.parents[id.index()]?;
        let slot = self.slot(loc.parent, loc.role).ok()?;
        slot.children().iter().position(|&c| c == id)
    }

    fn check_node(&self, id: NodeId) -> Result<(), RoleError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(RoleError::InvalidNode(id))
        }
    }

    fn slot_index(&self, id: NodeId, role: Role) -> Result<usize, RoleError> {
        self.check_node(id)?;
        let kind = self.kind(id);
        kind.slot_index(role)
            .filter(|&i| i < self.slots[id.index()].len())
            .ok_or(RoleError::NotFound { kind, role })
    }

    fn slot(&self, id: NodeId, role: Role) -> Result<&Slot, RoleError> {
        let index = self.slot_index(id, role)?;
        Ok(&self.slots[id.index()][index])
    }

    /// Raw slots of a node in declared role order.
    #[inline]
    pub fn slots(&self, id: NodeId) -> &[Slot] {
        &self.slots[id.index()]
    }

    /// Overwrite slot `index` of `id` without any layout check.
    #[cfg(test)]
    pub(crate) fn corrupt_slot(&mut self, id: NodeId, index: usize, slot: Slot) {
        self.slots[id.index()][index] = slot;
    }

    /// Declared roles of a node zipped with their slots.
    pub fn roles_and_slots(&self, id: NodeId) -> impl Iterator<Item = (&'static RoleDesc, &Slot)> {
        self.kind(id).roles().iter().zip(self.slots(id))
    }

    pub fn try_get(&self, id: NodeId, role: Role) -> Result<SlotRef<'_>, RoleError> {
        Ok(match self.slot(id, role)? {
            Slot::Simple(value) => SlotRef::Simple(*value),
            Slot::Child(child) => SlotRef::Child(*child),
            Slot::List(items) => SlotRef::List(items),
        })
    }

    /// Read a role of a node. Undeclared roles are logged and yield `None`.
    pub fn get(&self, id: NodeId, role: Role) -> Option<SlotRef<'_>> {
        self.try_get(id, role)
            .inspect_err(|e| tracing::warn!(node = %id, "{e}"))
            .ok()
    }

    /// SIMPLE value of `role`, `None` if unset or not a SIMPLE role.
    pub fn simple(&self, id: NodeId, role: Role) -> Option<Value> {
        match self.slot(id, role) {
            Ok(Slot::Simple(value)) => *value,
            _ => None,
        }
    }

    /// Child in `role`, `None` if empty or not a CHILD role.
    pub fn child(&self, id: NodeId, role: Role) -> Option<NodeId> {
        match self.slot(id, role) {
            Ok(Slot::Child(child)) => *child,
            _ => None,
        }
    }

    /// Children in list `role`, empty if not a CHILDLIST role.
    pub fn list(&self, id: NodeId, role: Role) -> &[NodeId] {
        match self.slot(id, role) {
            Ok(Slot::List(items)) => items,
            _ => &[],
        }
    }

    pub fn try_set_simple(
        &mut self,
        id: NodeId,
        role: Role,
        value: Option<Value>,
    ) -> Result<(), RoleError> {
        let index = self.slot_index(id, role)?;
        let kind = self.kind(id);
        let SlotKind::Simple(expected) = kind.roles()[index].slot else {
            return Err(RoleError::WrongSlot {
                kind,
                role,
                expected: "SIMPLE",
            });
        };
        if let Some(found) = value.map(|v| v.kind()) {
            if found != expected {
                return Err(RoleError::ValueKind {
                    kind,
                    role,
                    expected,
                    found,
                });
            }
        }
        self.slots[id.index()][index] = Slot::Simple(value);
        Ok(())
    }

    /// Set a SIMPLE value; misuse is logged and ignored.
    pub fn set_simple(&mut self, id: NodeId, role: Role, value: Option<Value>) {
        if let Err(e) = self.try_set_simple(id, role, value) {
            tracing::warn!(node = %id, "{e}");
        }
    }

    fn occupies(&self, child: NodeId, parent: NodeId, role: Role) -> bool {
        self.parents.get(child.index()).copied().flatten() == Some(Location { parent, role })
    }

    fn check_attachable(&self, parent: NodeId, child: NodeId) -> Result<(), RoleError> {
        self.check_node(child)?;
        if self.is_ancestor(child, parent) {
            return Err(RoleError::Cycle { parent, child });
        }
        Ok(())
    }

    /// Fill (or clear) a CHILD slot, returning the displaced occupant.
    ///
    /// `child` is detached from wherever it was first. The displaced node
    /// becomes detached.
    pub fn try_set_child(
        &mut self,
        parent: NodeId,
        role: Role,
        child: Option<NodeId>,
    ) -> Result<Option<NodeId>, RoleError> {
        let index = self.slot_index(parent, role)?;
        let kind = self.kind(parent);
        let Slot::Child(current) = self.slots[parent.index()][index] else {
            return Err(RoleError::WrongSlot {
                kind,
                role,
                expected: "CHILD",
            });
        };
        if let Some(child) = child {
            if current == Some(child) {
                return Ok(None);
            }
            self.check_attachable(parent, child)?;
            self.detach(child);
        }
        if let Some(old) = current {
            self.parents[old.index()] = None;
        }
        self.slots[parent.index()][index] = Slot::Child(child);
        if let Some(child) = child {
            self.parents[child.index()] = Some(Location { parent, role });
        }
        Ok(current)
    }

    /// Fill (or clear) a CHILD slot; misuse is logged and ignored.
    pub fn set_child(&mut self, parent: NodeId, role: Role, child: Option<NodeId>) -> Option<NodeId> {
        self.try_set_child(parent, role, child)
            .inspect_err(|e| tracing::warn!(node = %parent, "{e}"))
            .ok()
            .flatten()
    }

    /// Insert `child` at `index` of a CHILDLIST slot.
    ///
    /// `child` is detached from wherever it was first; `index` is
    /// interpreted after that removal.
    pub fn try_insert_child(
        &mut self,
        parent: NodeId,
        role: Role,
        index: usize,
        child: NodeId,
    ) -> Result<(), RoleError> {
        let slot_index = self.slot_index(parent, role)?;
        let kind = self.kind(parent);
        let Slot::List(items) = &self.slots[parent.index()][slot_index] else {
            return Err(RoleError::WrongSlot {
                kind,
                role,
                expected: "CHILDLIST",
            });
        };
        self.check_attachable(parent, child)?;
        let len = items.len() - usize::from(self.occupies(child, parent, role));
        if index > len {
            return Err(RoleError::IndexOutOfBounds { role, index, len });
        }
        self.detach(child);
        if let Slot::List(items) = &mut self.slots[parent.index()][slot_index] {
            items.insert(index, child);
        }
        self.parents[child.index()] = Some(Location { parent, role });
        Ok(())
    }

    /// Insert into a CHILDLIST slot; misuse is logged and ignored.
    pub fn insert_child(&mut self, parent: NodeId, role: Role, index: usize, child: NodeId) {
        if let Err(e) = self.try_insert_child(parent, role, index, child) {
            tracing::warn!(node = %parent, "{e}");
        }
    }

    /// Append to a CHILDLIST slot; misuse is logged and ignored.
    pub fn push_child(&mut self, parent: NodeId, role: Role, child: NodeId) {
        let len = self.list(parent, role).len() - usize::from(self.occupies(child, parent, role));
        self.insert_child(parent, role, len, child);
    }

    /// Attach `child` under `parent` in `role`, whatever the slot kind.
    ///
    /// CHILD slots ignore `index` and return the displaced occupant;
    /// CHILDLIST slots clamp `index` to the list length.
    pub fn try_attach(
        &mut self,
        parent: NodeId,
        role: Role,
        index: usize,
        child: NodeId,
    ) -> Result<Option<NodeId>, RoleError> {
        let slot_index = self.slot_index(parent, role)?;
        self.check_node(child)?;
        match self.kind(parent).roles()[slot_index].slot {
            SlotKind::Child => self.try_set_child(parent, role, Some(child)),
            SlotKind::List(_) => {
                let len = self.slots[parent.index()][slot_index].children().len()
                    - usize::from(self.occupies(child, parent, role));
                self.try_insert_child(parent, role, index.min(len), child)?;
                Ok(None)
            }
            SlotKind::Simple(_) => Err(RoleError::WrongSlot {
                kind: self.kind(parent),
                role,
                expected: "CHILD or CHILDLIST",
            }),
        }
    }

    /// Remove `child` from its parent slot.
    ///
    /// Returns where it was and its index there, `None` if it was already
    /// detached.
    pub fn detach(&mut self, child: NodeId) -> Option<(Location, usize)> {
        let loc = self.parents.get(child.index()).copied().flatten()?;
        let slot_index = self.slot_index(loc.parent, loc.role).ok()?;
        let index = match &mut self.slots[loc.parent.index()][slot_index] {
            Slot::Child(current) if *current == Some(child) => {
                *current = None;
                0
            }
            Slot::List(items) => {
                let pos = items.iter().position(|&c| c == child)?;
                items.remove(pos);
                pos
            }
            _ => return None,
        };
        self.parents[child.index()] = None;
        Some((loc, index))
    }

    /// Children from CHILD and CHILDLIST roles in declaration order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.slots(id).iter().flat_map(|s| s.children().iter().copied())
    }

    /// Children paired with the role they occupy.
    pub fn children_with_roles(&self, id: NodeId) -> impl Iterator<Item = (Role, NodeId)> + '_ {
        self.roles_and_slots(id)
            .flat_map(|(desc, slot)| slot.children().iter().map(move |&c| (desc.role, c)))
    }

    #[inline]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.children(id).next().is_none()
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Number of edges between `id` and the top of its tree.
    pub fn depth(&self, id: NodeId) -> usize {
        std::iter::successors(self.parent(id), |&p| self.parent(p)).count()
    }

    /// Copy kind, span, SIMPLE values and type metadata of `id` into `dest`.
    ///
    /// CHILD and CHILDLIST slots of the new node are left empty.
    pub fn shallow_clone_into(&self, id: NodeId, dest: &mut Tree) -> NodeId {
        let span = self.span(id);
        let span = Span {
            file: dest.translate_name(span.file, self),
            ..span
        };
        let twin = dest.alloc(self.kind(id), span);
        for (index, slot) in self.slots(id).iter().enumerate() {
            if let Slot::Simple(Some(value)) = slot {
                let value = dest.translate_value(*value, self);
                if let Some(target @ Slot::Simple(_)) = dest.slots[twin.index()].get_mut(index) {
                    *target = Slot::Simple(Some(value));
                }
            }
        }
        dest.types[twin.index()] = self.type_name(id).map(|n| dest.translate_name(n, self));
        twin
    }

    /// Re-home a name interned by `source` into this tree's interner.
    pub fn translate_name(&self, name: Name, source: &Tree) -> Name {
        if self.shares_interner(source) {
            name
        } else {
            self.interner.intern(source.text(name))
        }
    }

    /// Re-home a value whose text was interned by `source`.
    pub fn translate_value(&self, value: Value, source: &Tree) -> Value {
        value.map_text(|n| self.translate_name(n, source))
    }

    /// Compare a value of this tree with a value of `other`.
    pub fn same_value(&self, a: Value, other: &Tree, b: Value) -> bool {
        match (a, b) {
            (Value::Name(x), Value::Name(y)) | (Value::Literal(x), Value::Literal(y)) => {
                if self.shares_interner(other) {
                    x == y
                } else {
                    self.text(x) == other.text(y)
                }
            }
            _ => a == b,
        }
    }

    /// Source-like text of a value.
    pub fn render_value(&self, value: Value) -> Cow<'static, str> {
        match value {
            Value::Name(n) | Value::Literal(n) => Cow::Borrowed(self.text(n)),
            Value::Bool(true) => Cow::Borrowed("true"),
            Value::Bool(false) => Cow::Borrowed("false"),
            Value::Op(op) => Cow::Borrowed(op.as_symbol()),
            Value::Modifiers(m) => Cow::Owned(m.to_keywords()),
            Value::Count(n) => Cow::Owned(n.to_string()),
        }
    }

    /// Nodes of the subtree at `root`, parents before children.
    pub fn preorder(&self, root: NodeId) -> Preorder<'_> {
        let stack = if self.contains(root) { vec![root] } else { Vec::new() };
        Preorder { tree: self, stack }
    }

    /// Nodes of the subtree at `root`, children before parents.
    pub fn postorder(&self, root: NodeId) -> std::vec::IntoIter<NodeId> {
        let mut out = Vec::new();
        if !self.contains(root) {
            return out.into_iter();
        }
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                out.push(id);
                continue;
            }
            stack.push((id, true));
            let children: SmallVec<[NodeId; 8]> = self.children(id).collect();
            stack.extend(children.into_iter().rev().map(|c| (c, false)));
        }
        out.into_iter()
    }

    /// Nodes of the subtree at `root`, level by level.
    pub fn breadth_first(&self, root: NodeId) -> BreadthFirst<'_> {
        let mut queue = VecDeque::new();
        if self.contains(root) {
            queue.push_back(root);
        }
        BreadthFirst { tree: self, queue }
    }

    /// Verify the ownership invariants of the subtree at `root`.
    ///
    /// Checks slot layout against the kind catalog, parent/slot agreement,
    /// duplicate list entries, nodes reachable twice, and that every
    /// mandatory CHILD slot is filled.
    pub fn check_consistency(&self, root: NodeId) -> Result<(), ConsistencyError> {
        if !self.contains(root) {
            return Err(ConsistencyError::InvalidNode(root));
        }
        let mut seen = FxHashSet::default();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                return Err(ConsistencyError::SharedNode { node });
            }
            let kind = self.kind(node);
            let roles = kind.roles();
            let slots = self.slots(node);
            if roles.len() != slots.len() || !roles.iter().zip(slots).all(|(d, s)| s.fits(d)) {
                return Err(ConsistencyError::SlotLayout { node, kind });
            }
            for (desc, slot) in roles.iter().zip(slots) {
                if desc.is_child() && desc.mandatory && slot.children().is_empty() {
                    return Err(ConsistencyError::MissingMandatory {
                        node,
                        kind,
                        role: desc.role,
                    });
                }
                let mut in_slot = FxHashSet::default();
                for &child in slot.children() {
                    if !self.contains(child) {
                        return Err(ConsistencyError::InvalidNode(child));
                    }
                    if !in_slot.insert(child) {
                        return Err(ConsistencyError::DuplicateInList {
                            parent: node,
                            role: desc.role,
                            child,
                        });
                    }
                    let expected = Location {
                        parent: node,
                        role: desc.role,
                    };
                    let found = self.location_in_parent(child);
                    if found != Some(expected) {
                        return Err(ConsistencyError::ParentMismatch {
                            node: child,
                            expected,
                            found,
                        });
                    }
                    stack.push(child);
                }
            }
        }
        Ok(())
    }
}

/// Pre-order iterator returned by [`Tree::preorder`].
pub struct Preorder<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let start = self.stack.len();
        self.stack.extend(self.tree.children(id));
        self.stack[start..].reverse();
        Some(id)
    }
}

/// Breadth-first iterator returned by [`Tree::breadth_first`].
pub struct BreadthFirst<'a> {
    tree: &'a Tree,
    queue: VecDeque<NodeId>,
}

impl Iterator for BreadthFirst<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.queue.pop_front()?;
        self.queue.extend(self.tree.children(id));
        Some(id)
    }
}

impl std::fmt::Debug for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.contains(self.root) {
            f.write_str(&crate::sexp::dump(self, self.root))
        } else {
            f.write_str("(empty tree)")
        }
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::Location;
    crate::static_assert_size!(Location, 8);
}

#[cfg(test)]
mod tests;
