//! Stack growth guard for deep tree recursion.
//!
//! Copying, structural comparison, hashing and unification all recurse once
//! per tree level. Generated or machine-written code can nest far deeper than
//! a default thread stack allows, so every recursive walk in the engine enters
//! through [`ensure_sufficient_stack`].
//!
//! On native targets the `stacker` crate grows the stack on demand. On WASM
//! the guard is a passthrough.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
///
/// ```text
/// fn depth(tree: &Tree, id: NodeId) -> usize {
///     ensure_sufficient_stack(|| {
///         1 + tree.children(id).iter().map(|&c| depth(tree, c)).max().unwrap_or(0)
///     })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack; call straight through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
