//! Graft - pattern-based AST repair
//!
//! Learns an edit from one before/after example and replays it on other
//! trees that contain the same shape.
//!
//! # Architecture
//!
//! ```text
//! graft_ir        tree model, interner, copy-with-mapping, sexp notation
//!     │
//!     ▼
//! graft_diff      node mapping + edit script (Insert/Delete/Update/Move)
//!     │
//!     ▼
//! graft_pattern   template, abstraction, matcher, applier
//!     │
//!     ▼
//! graft           repair / repair_many, tracing setup
//! ```
//!
//! # Example
//!
//! ```text
//! let mut pattern = Pattern::new(before, after, DiffMode::Move)?;
//! TermFrequencyAbstractor::new(stats).do_abstraction(&mut pattern);
//! let fixed = repair(&pattern, &candidate, &RepairOptions::default())?;
//! ```

mod repair;
mod tracing_setup;

pub use repair::{repair, repair_many, Repair, RepairError, RepairOptions, RepairReport};
pub use tracing_setup::init_tracing;

pub use graft_diff::{diff, Diff, DiffConfig, DiffMode, EditOp, EditScript};
pub use graft_ir::{deep_copy, sexp, NodeId, NodeKind, Role, SharedInterner, StringInterner, Tree};
pub use graft_pattern::{
    AbstractionConfig, ApplyModification, Binding, IdentifierScope, MatchConfig, MatchInstance,
    MatchMock, MatchProblem, Matcher, ModificationError, Pattern, PatternConfig, PatternError,
    TermFrequencyAbstractor, TokenStatistics,
};
