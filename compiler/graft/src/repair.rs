//! Match, copy, translate, apply.
//!
//! The candidate passed in is never mutated: each attempt works on its own
//! deep copy, so a failed attempt leaves nothing behind and the next ranked
//! instance starts from a clean tree.

use rayon::prelude::*;

use graft_ir::{deep_copy, CopyError, Tree};
use graft_pattern::{ApplyModification, MatchConfig, MatchInstance, Matcher, ModificationError, Pattern};

/// How candidates are repaired.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RepairOptions {
    pub matching: MatchConfig,
    /// Legal instances tried before giving up on a candidate (at least one).
    pub max_attempts: usize,
}

impl Default for RepairOptions {
    fn default() -> Self {
        RepairOptions {
            matching: MatchConfig::default(),
            max_attempts: 8,
        }
    }
}

/// Why a candidate could not be repaired.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RepairError {
    #[error("the pattern's template does not occur in the candidate")]
    NoMatch,

    #[error("all {found} match(es) were illegal")]
    AllIllegal { found: usize },

    #[error("{attempts} application attempt(s) failed, last: {last}")]
    Failed {
        attempts: usize,
        #[source]
        last: ModificationError,
    },

    #[error(transparent)]
    Copy(#[from] CopyError),
}

/// A successfully rewritten candidate.
#[derive(Debug)]
pub struct Repair {
    tree: Tree,
    instance: MatchInstance,
    attempts: usize,
}

impl Repair {
    /// The rewritten copy of the candidate.
    #[inline]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }

    /// The instance that was applied, bound into [`Repair::tree`]'s
    /// pre-rewrite copy.
    #[inline]
    pub fn instance(&self) -> &MatchInstance {
        &self.instance
    }

    /// Legal instances tried, the successful one included.
    #[inline]
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

/// Apply `pattern` to `candidate` at the best instance that applies cleanly.
///
/// Instances are tried in rank order; illegal ones are skipped, failed
/// applications are logged and the next instance gets a fresh copy.
#[tracing::instrument(level = "debug", skip_all, fields(candidate_nodes = candidate.len()))]
pub fn repair(
    pattern: &Pattern,
    candidate: &Tree,
    options: &RepairOptions,
) -> Result<Repair, RepairError> {
    if candidate.is_empty() {
        return Err(RepairError::NoMatch);
    }
    let matcher = Matcher::new(options.matching);
    let max_attempts = options.max_attempts.max(1);
    let mut found = 0;
    let mut attempts = 0;
    let mut last = None;

    for instance in matcher.matches(pattern, candidate) {
        found += 1;
        if !instance.is_legal() {
            tracing::debug!(problems = ?instance.problems(), "skipping illegal match");
            continue;
        }
        if attempts == max_attempts {
            break;
        }
        attempts += 1;

        let (working, copies) = deep_copy(candidate, candidate.root())?;
        let mut modification = ApplyModification::new(pattern, working, instance.translate(&copies));
        match modification.apply() {
            Ok(()) => {
                tracing::debug!(attempts, "candidate repaired");
                let instance = modification.instance().clone();
                return Ok(Repair {
                    tree: modification.into_right(),
                    instance,
                    attempts,
                });
            }
            Err(e) => {
                tracing::warn!(attempt = attempts, "application failed: {e}");
                last = Some(e);
            }
        }
    }

    match last {
        Some(last) => Err(RepairError::Failed { attempts, last }),
        None if found == 0 => Err(RepairError::NoMatch),
        None => Err(RepairError::AllIllegal { found }),
    }
}

/// Outcome of a batch, in candidate order.
#[derive(Debug, Default)]
pub struct RepairReport {
    /// `(candidate index, repair)` for every candidate that was rewritten.
    pub repaired: Vec<(usize, Repair)>,
    /// `(candidate index, error)` for every candidate that was not.
    pub failures: Vec<(usize, RepairError)>,
}

impl RepairReport {
    #[inline]
    pub fn succeeded(&self) -> usize {
        self.repaired.len()
    }

    #[inline]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Indices of the candidates that could not be repaired.
    pub fn failing_indices(&self) -> Vec<usize> {
        self.failures.iter().map(|&(i, _)| i).collect()
    }
}

/// Repair every candidate in parallel; one failure never stops the batch.
#[tracing::instrument(level = "debug", skip_all, fields(candidates = candidates.len()))]
pub fn repair_many(pattern: &Pattern, candidates: &[Tree], options: &RepairOptions) -> RepairReport {
    let outcomes: Vec<(usize, Result<Repair, RepairError>)> = candidates
        .par_iter()
        .enumerate()
        .map(|(i, candidate)| (i, repair(pattern, candidate, options)))
        .collect();

    let mut report = RepairReport::default();
    for (i, outcome) in outcomes {
        match outcome {
            Ok(repair) => report.repaired.push((i, repair)),
            Err(e) => report.failures.push((i, e)),
        }
    }
    tracing::info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "batch repaired"
    );
    report
}
