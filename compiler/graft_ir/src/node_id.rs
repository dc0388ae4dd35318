//! Node identifiers.
//!
//! Nodes live in a per-tree arena; a [`NodeId`] is an index into it. Ids are
//! only meaningful together with the tree that issued them.

use std::fmt;

/// Index of a node in its tree's arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Sentinel for "no node".
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#INVALID")
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Convert an arena length to a `u32` index.
///
/// # Panics
/// Panics if a tree grows beyond `u32::MAX - 1` nodes.
#[inline]
pub(crate) fn to_u32(len: usize, what: &str) -> u32 {
    match u32::try_from(len) {
        Ok(v) if v != u32::MAX => v,
        _ => panic!("{what} exceeded u32 range ({len})"),
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::NodeId;
    crate::static_assert_size!(NodeId, 4);
}
