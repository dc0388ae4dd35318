//! Recovery phase: fill unmatched holes below a matched pair.
//!
//! For each role, children still unmatched are aligned with an LCS, first
//! by isomorphism and then by kind; kind-matched pairs are recovered
//! recursively.

use smallvec::SmallVec;

use graft_ir::{NodeId, SlotKind};
use graft_stack::ensure_sufficient_stack;

use super::Matching;
use crate::lcs::lcs;

pub(super) fn recover(m: &mut Matching<'_>, b: NodeId, a: NodeId) {
    let limit = m.config.max_recovery_size;
    if m.bi.size(b) > limit || m.ai.size(a) > limit {
        tracing::trace!(?b, ?a, "subtree too large for recovery");
        return;
    }
    recover_below(m, b, a);
}

fn recover_below(m: &mut Matching<'_>, b: NodeId, a: NodeId) {
    ensure_sufficient_stack(|| {
        for desc in m.before.kind(b).roles() {
            match desc.slot {
                SlotKind::Simple(_) => {}
                SlotKind::Child => {
                    if let (Some(cb), Some(ca)) =
                        (m.before.child(b, desc.role), m.after.child(a, desc.role))
                    {
                        pair(m, cb, ca);
                    }
                }
                SlotKind::List(_) => recover_list(m, b, a, desc.role),
            }
        }
    });
}

fn recover_list(m: &mut Matching<'_>, b: NodeId, a: NodeId, role: graft_ir::Role) {
    let before_list = m.before.list(b, role);
    let after_list = m.after.list(a, role);

    // Children already matched to each other may still have holes below.
    let matched: SmallVec<[(NodeId, NodeId); 8]> = before_list
        .iter()
        .filter_map(|&cb| {
            let ca = m.mapping.after_of(cb)?;
            after_list.contains(&ca).then_some((cb, ca))
        })
        .collect();
    for (cb, ca) in matched {
        recover_below(m, cb, ca);
    }

    let free_before = |m: &Matching<'_>| -> SmallVec<[NodeId; 8]> {
        m.before
            .list(b, role)
            .iter()
            .copied()
            .filter(|&n| !m.mapping.contains_before(n))
            .collect()
    };
    let free_after = |m: &Matching<'_>| -> SmallVec<[NodeId; 8]> {
        m.after
            .list(a, role)
            .iter()
            .copied()
            .filter(|&n| !m.mapping.contains_after(n))
            .collect()
    };

    let (bs, as_) = (free_before(&*m), free_after(&*m));
    for (i, j) in lcs(&bs, &as_, |x, y| m.is_isomorphic(x, y)) {
        if m.subtrees_free(bs[i], as_[j]) {
            m.link_isomorphic(bs[i], as_[j]);
        }
    }

    let (bs, as_) = (free_before(&*m), free_after(&*m));
    let kinds = lcs(&bs, &as_, |x, y| m.before.kind(x) == m.after.kind(y));
    for (i, j) in kinds {
        pair(m, bs[i], as_[j]);
    }
}

/// Match two children found in corresponding positions, then descend.
fn pair(m: &mut Matching<'_>, cb: NodeId, ca: NodeId) {
    match (m.mapping.after_of(cb), m.mapping.before_of(ca)) {
        (None, None) if m.before.kind(cb) == m.after.kind(ca) => {
            if m.is_isomorphic(cb, ca) && m.subtrees_free(cb, ca) {
                m.link_isomorphic(cb, ca);
            } else {
                m.mapping.link(cb, ca);
                recover_below(m, cb, ca);
            }
        }
        (Some(partner), _) if partner == ca => recover_below(m, cb, ca),
        _ => {}
    }
}
