//! Patterns mined from one example change.

use smallvec::SmallVec;

use graft_diff::{diff, Diff, DiffConfig, DiffMode, EditOp, EditScript, Mapping, NodeRef, Placement};
use graft_ir::{NodeId, Tree};

use crate::{Abstraction, IdentifierScope, PatternError};

/// How a pattern is mined.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternConfig {
    pub diff: DiffConfig,
}

impl PatternConfig {
    pub fn with_mode(mode: DiffMode) -> Self {
        PatternConfig {
            diff: DiffConfig::default().with_mode(mode),
        }
    }
}

/// A before/after example with its diff and precondition template.
///
/// The template is the subtree of the before tree at [`template_root`]:
/// the smallest statement-level region enclosing every edit. Matching
/// looks for it in candidates; application replays the script there.
///
/// [`template_root`]: Pattern::template_root
#[derive(Clone, Debug)]
pub struct Pattern {
    before: Tree,
    after: Tree,
    config: PatternConfig,
    diff: Diff,
    template_root: NodeId,
    before_scope: Option<IdentifierScope>,
    after_scope: Option<IdentifierScope>,
    abstraction: Abstraction,
}

impl Pattern {
    pub fn new(before: Tree, after: Tree, mode: DiffMode) -> Result<Self, PatternError> {
        Self::with_config(before, after, &PatternConfig::with_mode(mode))
    }

    /// Mine a pattern whose abstraction respects identifier scopes.
    pub fn with_scopes(
        before: Tree,
        after: Tree,
        mode: DiffMode,
        before_ids: IdentifierScope,
        after_ids: IdentifierScope,
    ) -> Result<Self, PatternError> {
        let mut pattern = Self::with_config(before, after, &PatternConfig::with_mode(mode))?;
        pattern.before_scope = Some(before_ids);
        pattern.after_scope = Some(after_ids);
        Ok(pattern)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(mode = ?config.diff.mode))]
    pub fn with_config(
        before: Tree,
        after: Tree,
        config: &PatternConfig,
    ) -> Result<Self, PatternError> {
        if before.is_empty() || after.is_empty() {
            return Err(PatternError::EmptyTree);
        }
        let diff = diff(&before, &after, &config.diff)?;
        let template_root = template_root(&before, diff.before_root(), diff.script());
        tracing::debug!(
            ops = diff.script().len(),
            template = %before.kind(template_root),
            "pattern mined"
        );
        Ok(Pattern {
            before,
            after,
            config: *config,
            diff,
            template_root,
            before_scope: None,
            after_scope: None,
            abstraction: Abstraction::default(),
        })
    }

    /// The before tree; the precondition template lives inside it.
    #[inline]
    pub fn before(&self) -> &Tree {
        &self.before
    }

    #[inline]
    pub fn after(&self) -> &Tree {
        &self.after
    }

    #[inline]
    pub fn template_root(&self) -> NodeId {
        self.template_root
    }

    /// Template nodes, parents first.
    pub fn template_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.before.preorder(self.template_root)
    }

    #[inline]
    pub fn diff(&self) -> &Diff {
        &self.diff
    }

    /// The rewrite template.
    #[inline]
    pub fn script(&self) -> &EditScript {
        self.diff.script()
    }

    #[inline]
    pub fn mapping(&self) -> &Mapping {
        self.diff.mapping()
    }

    #[inline]
    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    pub fn before_scope(&self) -> Option<&IdentifierScope> {
        self.before_scope.as_ref()
    }

    pub fn after_scope(&self) -> Option<&IdentifierScope> {
        self.after_scope.as_ref()
    }

    #[inline]
    pub fn abstraction(&self) -> &Abstraction {
        &self.abstraction
    }

    pub fn is_abstracted(&self) -> bool {
        !self.abstraction.is_empty()
    }

    /// Drop any previous abstraction; every token matches literally again.
    pub fn clear_abstraction(&mut self) {
        self.abstraction = Abstraction::default();
    }

    pub(crate) fn set_abstraction(&mut self, abstraction: Abstraction) {
        self.abstraction = abstraction;
    }

    /// Before nodes whose text an Update rewrites.
    pub fn update_targets(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.script().iter().filter_map(|op| match op {
            EditOp::Update { node, .. } => Some(*node),
            _ => None,
        })
    }

    #[cfg(feature = "cache")]
    pub(crate) fn from_parts(
        before: Tree,
        after: Tree,
        config: &PatternConfig,
        before_scope: Option<IdentifierScope>,
        after_scope: Option<IdentifierScope>,
        abstraction: Abstraction,
    ) -> Result<Self, PatternError> {
        let mut pattern = Self::with_config(before, after, config)?;
        pattern.before_scope = before_scope;
        pattern.after_scope = after_scope;
        pattern.abstraction = abstraction;
        Ok(pattern)
    }
}

/// Before nodes an edit touches or hangs something under.
fn anchors(root: NodeId, script: &EditScript) -> SmallVec<[NodeId; 8]> {
    let mut anchors = SmallVec::new();
    let target = |at: Option<&Placement>, anchors: &mut SmallVec<[NodeId; 8]>| match at {
        None => anchors.push(root),
        Some(Placement {
            parent: NodeRef::Before(parent),
            ..
        }) => anchors.push(*parent),
        // Hangs under an inserted node; that Insert is anchored already.
        Some(_) => {}
    };
    for op in script {
        match op {
            EditOp::Update { node, .. } | EditOp::Delete { node } => anchors.push(*node),
            EditOp::Move { node, at, .. } => {
                anchors.push(*node);
                target(at.as_ref(), &mut anchors);
            }
            EditOp::Insert { at, .. } => target(at.as_ref(), &mut anchors),
        }
    }
    anchors
}

/// Lowest common ancestor of all anchors, widened to statement level.
fn template_root(before: &Tree, root: NodeId, script: &EditScript) -> NodeId {
    let anchors = anchors(root, script);
    let Some((&first, rest)) = anchors.split_first() else {
        return root;
    };
    let mut node = rest
        .iter()
        .fold(first, |acc, &n| common_ancestor(before, acc, n, root));
    while node != root && !before.kind(node).is_statement_level() {
        match before.parent(node) {
            Some(parent) => node = parent,
            None => break,
        }
    }
    node
}

fn common_ancestor(tree: &Tree, a: NodeId, b: NodeId, root: NodeId) -> NodeId {
    let mut current = Some(a);
    while let Some(n) = current {
        if tree.is_ancestor(n, b) {
            return n;
        }
        if n == root {
            break;
        }
        current = tree.parent(n);
    }
    root
}

#[cfg(test)]
mod tests;
