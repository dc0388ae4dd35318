//! Pattern persistence.
//!
//! Trees are stored in their interner-independent representation; the diff
//! is recomputed on load (it is deterministic for a given pair of trees and
//! configuration), and node ids survive the round trip so the abstraction
//! and scope tables stay valid.

use serde::{Deserialize, Serialize};

use graft_ir::repr::{ReprError, TreeRepr};
use graft_ir::SharedInterner;

use crate::{Abstraction, IdentifierScope, Pattern, PatternConfig, PatternError};

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to encode pattern: {0}")]
    Encode(#[source] bincode::Error),

    #[error("failed to decode pattern: {0}")]
    Decode(#[source] bincode::Error),

    #[error(transparent)]
    Repr(#[from] ReprError),

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

#[derive(Serialize, Deserialize)]
struct PatternRepr {
    before: TreeRepr,
    after: TreeRepr,
    config: PatternConfig,
    before_scope: Option<IdentifierScope>,
    after_scope: Option<IdentifierScope>,
    abstraction: Abstraction,
}

impl Pattern {
    pub fn to_bytes(&self) -> Result<Vec<u8>, CacheError> {
        let repr = PatternRepr {
            before: TreeRepr::from_tree(self.before()),
            after: TreeRepr::from_tree(self.after()),
            config: *self.config(),
            before_scope: self.before_scope().cloned(),
            after_scope: self.after_scope().cloned(),
            abstraction: self.abstraction().clone(),
        };
        bincode::serialize(&repr).map_err(CacheError::Encode)
    }

    /// Load a pattern, interning its tokens into `interner`.
    pub fn from_bytes(bytes: &[u8], interner: &SharedInterner) -> Result<Pattern, CacheError> {
        let repr: PatternRepr = bincode::deserialize(bytes).map_err(CacheError::Decode)?;
        let pattern = Pattern::from_parts(
            repr.before.into_tree(interner)?,
            repr.after.into_tree(interner)?,
            &repr.config,
            repr.before_scope,
            repr.after_scope,
            repr.abstraction,
        )?;
        Ok(pattern)
    }
}

#[cfg(test)]
mod tests;
