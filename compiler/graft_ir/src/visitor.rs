//! Tree visitor.
//!
//! Override [`Visitor::enter`] and [`Visitor::leave`] to observe nodes; the
//! traversal itself lives in [`Tree::accept`]. The visitor may mutate its
//! own state, the tree stays immutable.
//!
//! # Example
//!
//! ```text
//! struct CountNames(usize);
//!
//! impl Visitor for CountNames {
//!     fn enter(&mut self, tree: &Tree, node: NodeId) -> Walk {
//!         if tree.kind(node) == NodeKind::SimpleName {
//!             self.0 += 1;
//!         }
//!         Walk::Continue
//!     }
//! }
//! ```

use graft_stack::ensure_sufficient_stack;

use crate::{NodeId, Tree};

/// Traversal control returned from [`Visitor::enter`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Walk {
    Continue,
    /// Do not descend into this node's children.
    SkipChildren,
    /// Abort the whole traversal.
    Stop,
}

pub trait Visitor {
    fn enter(&mut self, tree: &Tree, node: NodeId) -> Walk {
        let _ = (tree, node);
        Walk::Continue
    }

    /// Called after the children of `node`; skipped when the walk stops.
    fn leave(&mut self, tree: &Tree, node: NodeId) {
        let _ = (tree, node);
    }
}

impl Tree {
    /// Walk the subtree at `root` depth-first in declaration order.
    ///
    /// Returns [`Walk::Stop`] if the visitor aborted.
    pub fn accept<V: Visitor + ?Sized>(&self, root: NodeId, visitor: &mut V) -> Walk {
        if !self.contains(root) {
            return Walk::Continue;
        }
        ensure_sufficient_stack(|| match visitor.enter(self, root) {
            Walk::Stop => Walk::Stop,
            Walk::SkipChildren => {
                visitor.leave(self, root);
                Walk::Continue
            }
            Walk::Continue => {
                for child in self.children(root) {
                    if self.accept(child, visitor) == Walk::Stop {
                        return Walk::Stop;
                    }
                }
                visitor.leave(self, root);
                Walk::Continue
            }
        })
    }
}
