//! Graft Pattern - mine, generalize and apply edit patterns
//!
//! This crate provides:
//! - [`Pattern`]: a before/after example, its diff and the precondition
//!   template (the statement-level region the edits touch)
//! - [`TermFrequencyAbstractor`]: turns rare tokens of a pattern into
//!   metavariables, using [`TokenStatistics`] from a cluster of examples
//! - [`Matcher`]: finds the template in candidate trees and yields ranked
//!   [`MatchInstance`]s
//! - [`ApplyModification`]: replays the pattern's edit script at a match
//!
//! # Lifecycle
//!
//! ```text
//! Pattern::new(before, after, mode)
//!     -> TermFrequencyAbstractor::do_abstraction(&mut pattern)
//!     -> Matcher::matches(&pattern, &candidate)
//!     -> deep_copy(candidate) + MatchInstance::translate(&copies)
//!     -> ApplyModification::new(&pattern, copy, instance).apply()
//! ```
//!
//! Every mutation happens on a private copy; the candidate is never touched.

mod abstraction;
mod apply;
#[cfg(feature = "cache")]
mod cache;
mod errors;
mod instance;
mod matcher;
mod metavar;
mod mock;
mod pattern;
mod scope;

pub use abstraction::{AbstractionConfig, TermFrequencyAbstractor, TokenStatistics};
pub use apply::ApplyModification;
#[cfg(feature = "cache")]
pub use cache::CacheError;
pub use errors::{ModificationError, PatternError};
pub use instance::{MatchInstance, MatchProblem};
pub use matcher::{MatchConfig, MatchIter, Matcher};
pub use metavar::{Abstraction, MetaVar, MetaVarId};
pub use mock::MatchMock;
pub use pattern::{Pattern, PatternConfig};
pub use scope::{Binding, IdentifierScope};

#[cfg(test)]
mod test_helpers;
