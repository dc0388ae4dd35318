//! Applying a pattern's edit script at a match.

use graft_diff::{ReplayContext, ReplayError, Replayer};
use graft_ir::{NodeId, Role, Tree, Value};

use crate::{Abstraction, MatchInstance, ModificationError, Pattern};

/// Resolves script nodes through a match and substitutes metavariables.
struct Bindings<'a> {
    instance: &'a MatchInstance,
    abstraction: &'a Abstraction,
}

impl ReplayContext for Bindings<'_> {
    fn working_node(&self, before: NodeId) -> Option<NodeId> {
        self.instance.get(before)
    }

    fn rewrite_value(
        &self,
        work: &Tree,
        after: &Tree,
        node: NodeId,
        role: Role,
        value: Value,
    ) -> Result<Value, ReplayError> {
        let is_token = after
            .kind(node)
            .token_role()
            .is_some_and(|(token_role, _)| token_role == role);
        match self.abstraction.after_var(node) {
            Some(var) if is_token => self
                .instance
                .value(var)
                .ok_or(ReplayError::UnboundValue { node, role }),
            _ => Ok(work.translate_value(value, after)),
        }
    }
}

/// One application of a pattern to a working tree.
///
/// The working tree is owned and mutated in place; the instance must bind
/// the template into that tree (see [`MatchInstance::translate`]).
pub struct ApplyModification<'p> {
    pattern: &'p Pattern,
    right: Tree,
    instance: MatchInstance,
    applied: bool,
}

impl<'p> ApplyModification<'p> {
    pub fn new(pattern: &'p Pattern, working: Tree, instance: MatchInstance) -> Self {
        ApplyModification {
            pattern,
            right: working,
            instance,
            applied: false,
        }
    }

    /// Replay the pattern's script on the working tree.
    ///
    /// Illegal instances are refused before anything changes. On success
    /// the rewritten tree has passed [`Tree::check_consistency`].
    #[tracing::instrument(level = "debug", skip_all, fields(root = %self.instance.root()))]
    pub fn apply(&mut self) -> Result<(), ModificationError> {
        if self.applied {
            return Err(ModificationError::AlreadyApplied);
        }
        if !self.instance.is_legal() {
            return Err(ModificationError::IllegalInstance(
                self.instance.problems().to_vec(),
            ));
        }
        let pattern = self.pattern;
        let ctx = Bindings {
            instance: &self.instance,
            abstraction: pattern.abstraction(),
        };
        let mut replayer = Replayer::new(
            pattern.after(),
            pattern.mapping(),
            ctx,
            self.instance.root(),
        );
        replayer.run(&mut self.right, pattern.script())?;
        self.applied = true;
        self.right.check_consistency(self.right.root())?;
        tracing::debug!(ops = pattern.script().len(), "modification applied");
        Ok(())
    }

    /// The working tree, rewritten once [`apply`](Self::apply) succeeded.
    #[inline]
    pub fn right(&self) -> &Tree {
        &self.right
    }

    pub fn into_right(self) -> Tree {
        self.right
    }

    #[inline]
    pub fn instance(&self) -> &MatchInstance {
        &self.instance
    }
}
