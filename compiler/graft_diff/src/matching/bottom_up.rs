//! Bottom-up phase: match containers by how much of their content matched.

use std::cmp::Ordering;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use graft_ir::NodeId;

use super::{recovery, Matching};

pub(super) fn run(m: &mut Matching<'_>) {
    let (root_b, root_a) = (m.bi.root(), m.ai.root());
    let roots_free = !m.mapping.contains_before(root_b) && !m.mapping.contains_after(root_a);
    if roots_free && m.before.kind(root_b) == m.after.kind(root_a) {
        m.mapping.link(root_b, root_a);
    }

    for &b in m.bi.postorder() {
        if b == root_b || m.mapping.contains_before(b) || m.before.is_leaf(b) {
            continue;
        }
        if let Some(a) = candidate(m, b) {
            m.mapping.link(b, a);
            recovery::recover(m, b, a);
        }
    }

    if m.mapping.after_of(root_b) == Some(root_a) {
        recovery::recover(m, root_b, root_a);
    }
}

/// Best unmatched after-side container for `b`, if any qualifies.
fn candidate(m: &Matching<'_>, b: NodeId) -> Option<NodeId> {
    let kind = m.before.kind(b);
    let eligible = |a: NodeId| {
        m.ai.contains(a) && m.after.kind(a) == kind && !m.mapping.contains_after(a)
    };

    // Every child already sits under one after node: take it outright.
    let children: SmallVec<[NodeId; 8]> = m.before.children(b).collect();
    let mut parents = children
        .iter()
        .map(|&c| m.mapping.after_of(c).and_then(|a| m.after.parent(a)));
    if let Some(Some(first)) = parents.next() {
        if parents.all(|p| p == Some(first)) && eligible(first) {
            return Some(first);
        }
    }

    let mut seen: FxHashSet<NodeId> = FxHashSet::default();
    let mut candidates: SmallVec<[NodeId; 4]> = SmallVec::new();
    for &d in m.bi.descendants(b) {
        let Some(partner) = m.mapping.after_of(d) else {
            continue;
        };
        let mut current = m.ai.parent(m.after, partner);
        while let Some(a) = current {
            if !seen.insert(a) {
                break;
            }
            if eligible(a) {
                candidates.push(a);
            }
            current = m.ai.parent(m.after, a);
        }
    }

    let threshold = m.config.similarity_threshold;
    candidates
        .into_iter()
        .map(|a| (a, m.dice(b, a)))
        .filter(|&(_, dice)| dice > threshold)
        .min_by(|(x, dx), (y, dy)| match dy.total_cmp(dx) {
            Ordering::Equal => m.tie_break((b, *x), (b, *y)),
            other => other,
        })
        .map(|(a, _)| a)
}
