//! Top-down phase: anchor on isomorphic subtrees.

use std::cmp::{Ordering, Reverse};

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use graft_ir::NodeId;

use super::Matching;

type Bucket = SmallVec<[NodeId; 2]>;

fn buckets(nodes: &[NodeId], height: impl Fn(NodeId) -> u32, hash: impl Fn(NodeId) -> u64, min: u32) -> FxHashMap<u64, Bucket> {
    let mut map: FxHashMap<u64, Bucket> = FxHashMap::default();
    for &n in nodes {
        if height(n) >= min {
            map.entry(hash(n)).or_default().push(n);
        }
    }
    map
}

pub(super) fn run(m: &mut Matching<'_>) {
    let min = m.config.min_height;
    let before_by_hash = buckets(m.bi.preorder(), |n| m.bi.height(n), |n| m.bi.hash(n), min);
    let after_by_hash = buckets(m.ai.preorder(), |n| m.ai.height(n), |n| m.ai.hash(n), min);

    let mut order: Vec<NodeId> = m
        .bi
        .preorder()
        .iter()
        .copied()
        .filter(|&n| m.bi.height(n) >= min)
        .collect();
    order.sort_by_key(|&n| (Reverse(m.bi.height(n)), m.bi.pre_index(n)));

    let mut ambiguous: Vec<(NodeId, NodeId)> = Vec::new();
    let mut deferred: FxHashSet<NodeId> = FxHashSet::default();

    for b in order {
        if m.mapping.contains_before(b) || deferred.contains(&b) {
            continue;
        }
        let hash = m.bi.hash(b);
        let Some(afters) = after_by_hash.get(&hash) else {
            continue;
        };
        let partners: Bucket = afters
            .iter()
            .copied()
            .filter(|&a| !m.mapping.contains_after(a) && m.is_isomorphic(b, a))
            .collect();
        if partners.is_empty() {
            continue;
        }
        let twins = before_by_hash.get(&hash).map_or(0, |bs| {
            bs.iter()
                .filter(|&&o| !m.mapping.contains_before(o) && m.before.is_same(o, m.before, b))
                .count()
        });
        if partners.len() == 1 && twins == 1 {
            m.link_isomorphic(b, partners[0]);
        } else {
            ambiguous.extend(partners.iter().map(|&a| (b, a)));
            deferred.extend(m.bi.descendants(b).iter().copied());
        }
    }

    if ambiguous.is_empty() {
        return;
    }
    tracing::trace!(candidates = ambiguous.len(), "resolving ambiguous anchors");
    let mut ranked: Vec<((NodeId, NodeId), f64)> = ambiguous
        .into_iter()
        .map(|pair| (pair, m.parent_dice(pair.0, pair.1)))
        .collect();
    ranked.sort_by(|(x, dx), (y, dy)| match dy.total_cmp(dx) {
        Ordering::Equal => m.tie_break(*x, *y),
        other => other,
    });
    for ((b, a), _) in ranked {
        if m.subtrees_free(b, a) {
            m.link_isomorphic(b, a);
        }
    }
}
