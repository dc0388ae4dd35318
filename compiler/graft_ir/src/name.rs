//! Interned token text.
//!
//! Identifiers, literal tokens, type names and file paths are stored once in
//! a [`StringInterner`](crate::StringInterner) and referenced by a 32-bit
//! [`Name`]. Two names from the same interner are equal iff their text is.

use std::fmt;

/// Interned string handle.
///
/// Layout: 32 bits split into shard (3 bits) and slot within the shard
/// (29 bits).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// The empty string, pre-interned in every interner.
    pub const EMPTY: Name = Name(0);

    /// Number of shards an interner is split into.
    pub const SHARDS: usize = 8;

    /// Largest slot index a shard can address.
    pub const MAX_SLOT: u32 = (1 << 29) - 1;

    const SHARD_SHIFT: u32 = 29;

    #[inline]
    pub const fn new(shard: u32, slot: u32) -> Self {
        debug_assert!(shard < 8);
        debug_assert!(slot <= Self::MAX_SLOT);
        Name((shard << Self::SHARD_SHIFT) | slot)
    }

    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 >> Self::SHARD_SHIFT) as usize
    }

    #[inline]
    pub const fn slot(self) -> usize {
        (self.0 & Self::MAX_SLOT) as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({}:{})", self.shard(), self.slot())
    }
}
