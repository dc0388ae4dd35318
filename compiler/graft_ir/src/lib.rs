//! Graft IR - the tree model
//!
//! This crate contains the data structures every other Graft crate works on:
//! - Spans for source provenance
//! - Names and the sharded string interner
//! - The closed node-kind catalog with per-kind roles
//! - The arena-backed [`Tree`] with role-addressed slots
//! - Structural equality, structural hashing and deep copy with mapping
//! - A textual tree notation for debugging and tests
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: token text -> `Name(u32)`
//! - **Flatten Everything**: no boxed children, nodes are `NodeId(u32)` indices
//! - **Static Roles**: a node kind fixes its roles at compile time; a role
//!   resolves to a slot index through one table built on first use
//!
//! Spans and type metadata ride along with nodes but never take part in
//! equality, hashing, diffing or matching.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod copy;
mod error;
pub mod hash;
mod interner;
mod kind;
mod name;
mod node_id;
#[cfg(feature = "cache")]
pub mod repr;
pub mod same;
pub mod sexp;
mod span;
mod tree;
mod value;
pub mod visitor;

pub use copy::{copy_filtered_into, copy_subtree_into, deep_copy, CopyMap};
pub use error::{ConsistencyError, CopyError, RoleError};
pub use hash::{subtree_metrics, Metrics, SubtreeMetrics};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use kind::{KindClass, ListMode, NodeKind, Role, RoleDesc, SlotKind};
pub use name::Name;
pub use node_id::NodeId;
pub use same::is_same;
pub use span::Span;
pub use tree::{BreadthFirst, Location, Preorder, Slot, SlotRef, Tree};
pub use value::{Modifiers, Operator, TokenCategory, Value, ValueKind};
pub use visitor::{Visitor, Walk};
