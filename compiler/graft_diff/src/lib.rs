//! Graft Diff - tree matching and edit scripts
//!
//! Computes how a before subtree turns into an after subtree:
//! - [`Mapping`]: matched node pairs (GumTree-style top-down anchors,
//!   bottom-up containers, LCS recovery)
//! - [`EditScript`]: Insert/Delete/Update/Move operations derived from the
//!   mapping (Chawathe et al.)
//! - [`Replayer`]: executes a script against any working tree
//!
//! The two trees may use different string interners; values are compared
//! and translated by text.

mod config;
mod index;
mod lcs;
mod mapping;
mod matching;
mod replay;
mod script;

pub use config::{DiffConfig, DiffMode};
pub use index::TreeIndex;
pub use mapping::Mapping;
pub use replay::{ReplayContext, ReplayError, Replayer};
pub use script::{EditOp, EditScript, NodeRef, Placement};

use graft_ir::{deep_copy, CopyError, NodeId, Tree};

use crate::script::CopyContext;

/// Failure to compute or replay a diff.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    #[error("node {0} is not part of the tree")]
    InvalidRoot(NodeId),

    #[error(transparent)]
    Copy(#[from] CopyError),

    #[error(transparent)]
    Replay(#[from] ReplayError),
}

/// Result of diffing two subtrees.
#[derive(Clone, Debug)]
pub struct Diff {
    mapping: Mapping,
    script: EditScript,
    before_root: NodeId,
    after_root: NodeId,
}

impl Diff {
    #[inline]
    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    #[inline]
    pub fn script(&self) -> &EditScript {
        &self.script
    }

    #[inline]
    pub fn before_root(&self) -> NodeId {
        self.before_root
    }

    #[inline]
    pub fn after_root(&self) -> NodeId {
        self.after_root
    }

    /// Replay the script on a fresh copy of the before subtree.
    ///
    /// The result should be `is_same` to the after subtree.
    pub fn replay_on(&self, before: &Tree, after: &Tree) -> Result<Tree, DiffError> {
        let (mut work, copies) = deep_copy(before, self.before_root)?;
        let region_root = work.root();
        let mut replayer = Replayer::new(
            after,
            &self.mapping,
            CopyContext { copies: &copies },
            region_root,
        );
        replayer.run(&mut work, &self.script)?;
        work.set_root(replayer.region_root());
        Ok(work)
    }
}

/// Diff two whole trees.
pub fn diff(before: &Tree, after: &Tree, config: &DiffConfig) -> Result<Diff, DiffError> {
    diff_subtrees(before, before.root(), after, after.root(), config)
}

/// Diff the subtree of `before` at `before_root` against the subtree of
/// `after` at `after_root`.
#[tracing::instrument(level = "debug", skip(before, after, config), fields(mode = ?config.mode))]
pub fn diff_subtrees(
    before: &Tree,
    before_root: NodeId,
    after: &Tree,
    after_root: NodeId,
    config: &DiffConfig,
) -> Result<Diff, DiffError> {
    if !before.contains(before_root) {
        return Err(DiffError::InvalidRoot(before_root));
    }
    if !after.contains(after_root) {
        return Err(DiffError::InvalidRoot(after_root));
    }
    let bi = TreeIndex::new(before, before_root);
    let ai = TreeIndex::new(after, after_root);
    let mapping = matching::match_trees(before, &bi, after, &ai, config);
    let script = script::generate(before, &bi, after, &ai, &mapping)?;
    tracing::debug!(pairs = mapping.len(), ops = script.len(), "diff computed");
    Ok(Diff {
        mapping,
        script,
        before_root,
        after_root,
    })
}
