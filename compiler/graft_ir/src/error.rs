//! Structural error types of the tree model.

use crate::{Location, NodeId, NodeKind, Role, ValueKind};

/// Misuse of a role on a node.
///
/// The non-`try_` mutators of [`Tree`](crate::Tree) log these and do
/// nothing; the `try_` variants return them.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RoleError {
    #[error("{kind} has no role `{role}`")]
    NotFound { kind: NodeKind, role: Role },

    #[error("role `{role}` of {kind} is not a {expected} slot")]
    WrongSlot {
        kind: NodeKind,
        role: Role,
        expected: &'static str,
    },

    #[error("role `{role}` of {kind} holds {expected:?} values, got {found:?}")]
    ValueKind {
        kind: NodeKind,
        role: Role,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("index {index} out of bounds for `{role}` (length {len})")]
    IndexOutOfBounds { role: Role, index: usize, len: usize },

    #[error("{0} is not a node of this tree")]
    InvalidNode(NodeId),
}

/// A violated tree invariant found by
/// [`Tree::check_consistency`](crate::Tree::check_consistency).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyError {
    #[error("{0} is not a node of this tree")]
    InvalidNode(NodeId),

    #[error("{node} is reachable twice")]
    SharedNode { node: NodeId },

    #[error("{node} sits in {expected:?} but records {found:?}")]
    ParentMismatch {
        node: NodeId,
        expected: Location,
        found: Option<Location>,
    },

    #[error("{child} appears twice in `{role}` of {parent}")]
    DuplicateInList {
        parent: NodeId,
        role: Role,
        child: NodeId,
    },

    #[error("mandatory role `{role}` of {kind} {node} is empty")]
    MissingMandatory {
        node: NodeId,
        kind: NodeKind,
        role: Role,
    },

    #[error("slots of {kind} {node} do not match its declared roles")]
    SlotLayout { node: NodeId, kind: NodeKind },
}

/// Failure of a deep copy.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CopyError {
    #[error("{0} is not a node of the source tree")]
    InvalidNode(NodeId),

    #[error("slots of {kind} {node} do not match its declared roles")]
    SlotLayout { node: NodeId, kind: NodeKind },

    #[error(transparent)]
    Role(#[from] RoleError),
}
