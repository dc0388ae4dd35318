//! Match instances from a known correspondence instead of a search.

use rustc_hash::FxHashMap;

use graft_ir::{deep_copy, CopyError, CopyMap, NodeId, Tree};

use crate::{MatchInstance, Pattern};

/// Builds [`MatchInstance`]s without running the matcher.
pub struct MatchMock;

impl MatchMock {
    /// Bind every template node to its copy in `working`.
    ///
    /// Metavariables take the value of their first occurrence's copy.
    pub fn from_copy(pattern: &Pattern, copies: &CopyMap, working: &Tree) -> MatchInstance {
        let nodes: FxHashMap<NodeId, NodeId> = pattern
            .template_nodes()
            .filter_map(|p| copies.get(p).map(|w| (p, w)))
            .collect();

        let abstraction = pattern.abstraction();
        let mut values = FxHashMap::default();
        for var in abstraction.vars() {
            let value = abstraction
                .occurrences(var.id)
                .into_iter()
                .filter_map(|p| nodes.get(&p))
                .find_map(|&w| {
                    let (role, _) = working.kind(w).token_role()?;
                    working.simple(w, role)
                });
            if let Some(value) = value {
                values.insert(var.id, value);
            }
        }

        let root = copies
            .get(pattern.template_root())
            .unwrap_or(NodeId::INVALID);
        MatchInstance::new(pattern, root, nodes, values, 1.0, None, 0)
    }

    /// Copy the pattern's own before tree and bind the template to it.
    pub fn on_own_before(pattern: &Pattern) -> Result<(Tree, MatchInstance), CopyError> {
        let before = pattern.before();
        let (working, copies) = deep_copy(before, before.root())?;
        let instance = Self::from_copy(pattern, &copies, &working);
        Ok((working, instance))
    }
}

#[cfg(test)]
mod tests;
