//! Error types of pattern construction and application.

use graft_diff::{DiffError, ReplayError};
use graft_ir::{ConsistencyError, NodeId, Role};

use crate::MatchProblem;

/// Failure to mine a pattern from an example change.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern trees must not be empty")]
    EmptyTree,

    #[error(transparent)]
    Diff(#[from] DiffError),
}

/// Failure to apply a pattern to a working tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ModificationError {
    #[error("match instance is not legal ({} problem(s))", .0.len())]
    IllegalInstance(Vec<MatchProblem>),

    #[error("modification was already applied")]
    AlreadyApplied,

    #[error("cannot delete {node}: role `{role}` of its parent is mandatory")]
    MandatorySlot { node: NodeId, role: Role },

    #[error(transparent)]
    Replay(ReplayError),

    #[error("rewritten tree is inconsistent: {0}")]
    Consistency(#[from] ConsistencyError),
}

impl From<ReplayError> for ModificationError {
    fn from(err: ReplayError) -> Self {
        match err {
            ReplayError::MandatorySlot { node, role } => {
                ModificationError::MandatorySlot { node, role }
            }
            other => ModificationError::Replay(other),
        }
    }
}
