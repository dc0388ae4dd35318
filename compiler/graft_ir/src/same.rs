//! Structural equality across trees.
//!
//! Two subtrees are the same when their kinds agree and every slot agrees:
//! SIMPLE values by text, CHILD slots both empty or both the same,
//! CHILDLIST slots pairwise the same. Spans, node identity and type
//! metadata are ignored. Trees may use different interners.

use graft_stack::ensure_sufficient_stack;

use crate::{NodeId, Slot, Tree};

/// Compare the subtree at `a` in `left` with the subtree at `b` in `right`.
pub fn is_same(left: &Tree, a: NodeId, right: &Tree, b: NodeId) -> bool {
    if left.kind(a) != right.kind(b) {
        return false;
    }
    let (lhs, rhs) = (left.slots(a), right.slots(b));
    if lhs.len() != rhs.len() {
        return false;
    }
    ensure_sufficient_stack(|| {
        lhs.iter().zip(rhs).all(|pair| match pair {
            (Slot::Simple(x), Slot::Simple(y)) => match (x, y) {
                (None, None) => true,
                (Some(x), Some(y)) => left.same_value(*x, right, *y),
                _ => false,
            },
            (Slot::Child(x), Slot::Child(y)) => match (x, y) {
                (None, None) => true,
                (Some(x), Some(y)) => is_same(left, *x, right, *y),
                _ => false,
            },
            (Slot::List(xs), Slot::List(ys)) => {
                xs.len() == ys.len()
                    && xs.iter().zip(ys).all(|(x, y)| is_same(left, *x, right, *y))
            }
            _ => false,
        })
    })
}

impl Tree {
    /// Whether the subtree at `id` equals the subtree at `other_id` of `other`.
    #[inline]
    pub fn is_same(&self, id: NodeId, other: &Tree, other_id: NodeId) -> bool {
        is_same(self, id, other, other_id)
    }
}

#[cfg(test)]
mod tests;
