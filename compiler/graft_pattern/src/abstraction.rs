//! Term-frequency abstraction.
//!
//! Tokens that are rare across a cluster of examples are specific to one
//! example (local variable names, magic literals) and become metavariables;
//! frequent tokens (common API names) stay concrete and must match
//! literally.

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

use std::collections::hash_map::Entry;

use graft_ir::{NodeId, TokenCategory, Tree, Value};

use crate::{Abstraction, Binding, MetaVarId, Pattern};

/// Generalizable token of `node`: its category and text.
pub(crate) fn token(tree: &Tree, node: NodeId) -> Option<(TokenCategory, &'static str)> {
    let (role, category) = tree.kind(node).token_role()?;
    let name = tree.simple(node, role)?.text()?;
    Some((category, tree.text(name)))
}

fn token_value(tree: &Tree, node: NodeId) -> Option<Value> {
    let (role, _) = tree.kind(node).token_role()?;
    tree.simple(node, role)
}

/// Document frequency of tokens over a cluster of trees.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenStatistics {
    documents: u32,
    frequency: FxHashMap<TokenCategory, FxHashMap<String, u32>>,
}

impl TokenStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count each distinct token of the subtree at `root` once.
    pub fn add_document(&mut self, tree: &Tree, root: NodeId) {
        self.merge(Self::of_document(tree, root));
    }

    pub fn from_trees(trees: &[Tree]) -> Self {
        trees
            .par_iter()
            .map(|tree| Self::of_document(tree, tree.root()))
            .reduce(Self::new, Self::merged)
    }

    /// One document per pattern: its precondition template.
    #[tracing::instrument(level = "debug", skip_all, fields(patterns = patterns.len()))]
    pub fn from_patterns(patterns: &[Pattern]) -> Self {
        patterns
            .par_iter()
            .map(|p| Self::of_document(p.before(), p.template_root()))
            .reduce(Self::new, Self::merged)
    }

    fn of_document(tree: &Tree, root: NodeId) -> Self {
        let seen: FxHashSet<(TokenCategory, &'static str)> =
            tree.preorder(root).filter_map(|n| token(tree, n)).collect();
        let mut stats = TokenStatistics {
            documents: 1,
            frequency: FxHashMap::default(),
        };
        for (category, text) in seen {
            stats
                .frequency
                .entry(category)
                .or_default()
                .insert(text.to_owned(), 1);
        }
        stats
    }

    fn merged(mut self, other: Self) -> Self {
        self.merge(other);
        self
    }

    pub fn merge(&mut self, other: Self) {
        self.documents += other.documents;
        for (category, texts) in other.frequency {
            let counts = self.frequency.entry(category).or_default();
            for (text, count) in texts {
                *counts.entry(text).or_default() += count;
            }
        }
    }

    /// Number of documents containing the token.
    pub fn frequency(&self, category: TokenCategory, text: &str) -> u32 {
        self.frequency
            .get(&category)
            .and_then(|texts| texts.get(text))
            .copied()
            .unwrap_or(0)
    }

    #[inline]
    pub fn documents(&self) -> u32 {
        self.documents
    }
}

/// Abstraction thresholds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct AbstractionConfig {
    /// Tokens found in at least this many documents stay concrete.
    pub min_frequency: u32,
}

impl Default for AbstractionConfig {
    fn default() -> Self {
        AbstractionConfig { min_frequency: 2 }
    }
}

/// Abstracts the rare tokens of a pattern into metavariables.
#[derive(Clone, Debug, Default)]
pub struct TermFrequencyAbstractor {
    stats: TokenStatistics,
    config: AbstractionConfig,
}

impl TermFrequencyAbstractor {
    pub fn new(stats: TokenStatistics) -> Self {
        Self::with_config(stats, AbstractionConfig::default())
    }

    pub fn with_config(stats: TokenStatistics, config: AbstractionConfig) -> Self {
        TermFrequencyAbstractor { stats, config }
    }

    #[inline]
    pub fn statistics(&self) -> &TokenStatistics {
        &self.stats
    }

    fn is_frequent(&self, category: TokenCategory, text: &str) -> bool {
        self.stats.frequency(category, text) >= self.config.min_frequency
    }

    /// Replace the pattern's abstraction; returns the number of variables.
    ///
    /// Eligible tokens are names, literal tokens and type names in the
    /// template, except Update targets, free names and frequent tokens.
    /// One variable per `(category, text)`. After-tree tokens with the
    /// same key (and, with scopes, the same binding) share it.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn do_abstraction(&self, pattern: &mut Pattern) -> usize {
        pattern.clear_abstraction();
        let targets: FxHashSet<NodeId> = pattern.update_targets().collect();
        let before = pattern.before();
        let before_scope = pattern.before_scope();

        let mut abstraction = Abstraction::default();
        let mut keys: FxHashMap<(TokenCategory, &'static str), MetaVarId> = FxHashMap::default();
        let mut firsts: Vec<(MetaVarId, Value)> = Vec::new();
        for node in pattern.template_nodes() {
            let Some((category, text)) = token(before, node) else {
                continue;
            };
            let binding = before_scope.and_then(|s| s.binding(node));
            if targets.contains(&node)
                || binding == Some(Binding::Free)
                || self.is_frequent(category, text)
            {
                continue;
            }
            let id = match keys.entry((category, text)) {
                Entry::Occupied(e) => *e.get(),
                Entry::Vacant(e) => {
                    let id = abstraction.fresh(category, binding);
                    if let Some(value) = token_value(before, node) {
                        firsts.push((id, value));
                    }
                    *e.insert(id)
                }
            };
            abstraction.mark_before(node, id);
        }
        // A type and a name spelled alike hold one value in the template.
        for (i, &(a, x)) in firsts.iter().enumerate() {
            for &(b, y) in &firsts[i + 1..] {
                if x == y {
                    abstraction.mark_shared(a, b);
                }
            }
        }

        let after = pattern.after();
        let after_scope = pattern.after_scope();
        for node in after.preorder(after.root()) {
            let Some(key) = token(after, node) else {
                continue;
            };
            let Some(&id) = keys.get(&key) else {
                continue;
            };
            if let Some(scope) = after_scope {
                if scope.binding(node) != abstraction.binding(id) {
                    continue;
                }
            }
            abstraction.mark_after(node, id);
        }

        let count = abstraction.len();
        tracing::debug!(
            vars = count,
            after_occurrences = abstraction.after_len(),
            "abstraction done"
        );
        pattern.set_abstraction(abstraction);
        count
    }
}

#[cfg(test)]
mod tests;
