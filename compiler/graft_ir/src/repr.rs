//! Interner-independent tree representation for persistence.
//!
//! [`TreeRepr`] spells every token as text so a tree can be stored and
//! reloaded into a different interner. Node ids are preserved: node `n` of
//! the representation is allocated as node `n` of the rebuilt tree, so
//! tables keyed by [`NodeId`] stay valid across a round trip.

use serde::{Deserialize, Serialize};

use crate::{
    Modifiers, NodeId, NodeKind, Operator, Role, RoleError, SharedInterner, Slot, SlotKind,
    Span, Tree, Value,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReprError {
    #[error("slots of {kind} node {node} do not match its declared roles")]
    SlotLayout { node: NodeId, kind: NodeKind },

    #[error("invalid modifier bits {0:#x}")]
    BadModifiers(u16),

    #[error(transparent)]
    Role(#[from] RoleError),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum ValueRepr {
    Name(String),
    Literal(String),
    Bool(bool),
    Op(Operator),
    Modifiers(u16),
    Count(u32),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum SlotRepr {
    Simple(Option<ValueRepr>),
    Child(Option<NodeId>),
    List(Vec<NodeId>),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct NodeRepr {
    kind: NodeKind,
    file: String,
    start_line: u32,
    end_line: u32,
    type_name: Option<String>,
    slots: Vec<SlotRepr>,
}

/// Serializable form of a [`Tree`], detached nodes included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeRepr {
    nodes: Vec<NodeRepr>,
    root: NodeId,
}

impl TreeRepr {
    pub fn from_tree(tree: &Tree) -> Self {
        let nodes = (0..tree.len())
            .map(|i| {
                let id = NodeId::new(crate::node_id::to_u32(i, "tree nodes"));
                let span = tree.span(id);
                NodeRepr {
                    kind: tree.kind(id),
                    file: tree.text(span.file).to_owned(),
                    start_line: span.start_line,
                    end_line: span.end_line,
                    type_name: tree.type_name(id).map(|n| tree.text(n).to_owned()),
                    slots: tree
                        .slots(id)
                        .iter()
                        .map(|slot| match slot {
                            Slot::Simple(v) => SlotRepr::Simple(v.map(|v| value_repr(tree, v))),
                            Slot::Child(c) => SlotRepr::Child(*c),
                            Slot::List(items) => SlotRepr::List(items.to_vec()),
                        })
                        .collect(),
                }
            })
            .collect();
        TreeRepr {
            nodes,
            root: tree.root(),
        }
    }

    /// Rebuild the tree, interning tokens in `interner`.
    pub fn into_tree(self, interner: &SharedInterner) -> Result<Tree, ReprError> {
        let mut tree = Tree::new(SharedInterner::clone(interner));
        for node in &self.nodes {
            let span = Span::new(tree.intern(&node.file), node.start_line, node.end_line);
            let id = tree.alloc(node.kind, span);
            tree.set_type_name(id, node.type_name.as_deref().map(|t| tree.intern(t)));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            let id = NodeId::new(crate::node_id::to_u32(i, "tree nodes"));
            let roles = node.kind.roles();
            if roles.len() != node.slots.len() {
                return Err(ReprError::SlotLayout {
                    node: id,
                    kind: node.kind,
                });
            }
            for (desc, slot) in roles.iter().zip(&node.slots) {
                let layout = || ReprError::SlotLayout {
                    node: id,
                    kind: node.kind,
                };
                match (slot, desc.slot) {
                    (SlotRepr::Simple(value), SlotKind::Simple(_)) => {
                        let value = value.as_ref().map(|v| to_value(&tree, v)).transpose()?;
                        tree.try_set_simple(id, desc.role, value)?;
                    }
                    (SlotRepr::Child(child), SlotKind::Child) => {
                        if let Some(child) = child {
                            attach(&mut tree, id, desc.role, *child)?;
                        }
                    }
                    (SlotRepr::List(items), SlotKind::List(_)) => {
                        for &child in items {
                            attach(&mut tree, id, desc.role, child)?;
                        }
                    }
                    _ => return Err(layout()),
                }
            }
        }
        tree.set_root(self.root);
        Ok(tree)
    }
}

fn attach(tree: &mut Tree, parent: NodeId, role: Role, child: NodeId) -> Result<(), ReprError> {
    if !tree.contains(child) {
        return Err(RoleError::InvalidNode(child).into());
    }
    if tree.parent(child).is_some() {
        return Err(ReprError::SlotLayout {
            node: child,
            kind: tree.kind(child),
        });
    }
    tree.try_attach(parent, role, usize::MAX, child)?;
    Ok(())
}

fn value_repr(tree: &Tree, value: Value) -> ValueRepr {
    match value {
        Value::Name(n) => ValueRepr::Name(tree.text(n).to_owned()),
        Value::Literal(n) => ValueRepr::Literal(tree.text(n).to_owned()),
        Value::Bool(b) => ValueRepr::Bool(b),
        Value::Op(op) => ValueRepr::Op(op),
        Value::Modifiers(m) => ValueRepr::Modifiers(m.bits()),
        Value::Count(c) => ValueRepr::Count(c),
    }
}

fn to_value(tree: &Tree, repr: &ValueRepr) -> Result<Value, ReprError> {
    Ok(match repr {
        ValueRepr::Name(t) => Value::Name(tree.intern(t)),
        ValueRepr::Literal(t) => Value::Literal(tree.intern(t)),
        ValueRepr::Bool(b) => Value::Bool(*b),
        ValueRepr::Op(op) => Value::Op(*op),
        ValueRepr::Modifiers(bits) => {
            Value::Modifiers(Modifiers::from_bits(*bits).ok_or(ReprError::BadModifiers(*bits))?)
        }
        ValueRepr::Count(c) => Value::Count(*c),
    })
}

#[cfg(test)]
mod tests;
