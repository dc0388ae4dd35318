//! Sharded string interner shared by every tree of one session.
//!
//! Trees built by the same front end share one [`SharedInterner`], which
//! makes token comparison an integer compare. Trees from different
//! interners can still be compared and combined; see
//! [`Tree::translate_name`](crate::Tree::translate_name).

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHasher};

use crate::Name;

/// Interner handle shared across trees and threads.
pub type SharedInterner = Arc<StringInterner>;

/// Error when a shard runs out of addressable slots.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("interner shard {shard} is full ({count} strings)")]
pub struct InternError {
    pub shard: usize,
    pub count: usize,
}

#[derive(Default)]
struct Shard {
    index: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl Shard {
    fn seeded_with_empty() -> Self {
        let mut shard = Shard::default();
        shard.index.insert("", 0);
        shard.strings.push("");
        shard
    }
}

/// Thread-safe string interner.
///
/// Each shard is guarded by its own `RwLock`; lookups only take read locks.
/// Interned strings are leaked and live for the rest of the process.
pub struct StringInterner {
    shards: [RwLock<Shard>; Name::SHARDS],
    len: AtomicUsize,
}

impl StringInterner {
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            RwLock::new(if i == 0 {
                Shard::seeded_with_empty()
            } else {
                Shard::default()
            })
        });
        StringInterner {
            shards,
            len: AtomicUsize::new(1),
        }
    }

    /// Create an interner already wrapped for sharing.
    pub fn shared() -> SharedInterner {
        Arc::new(Self::new())
    }

    fn shard_of(text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        let mut hasher = FxHasher::default();
        text.hash(&mut hasher);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "reduced modulo the shard count"
        )]
        let shard = (hasher.finish() % Name::SHARDS as u64) as usize;
        shard
    }

    /// Intern `text`, failing only if its shard is full.
    pub fn try_intern(&self, text: &str) -> Result<Name, InternError> {
        let shard_idx = Self::shard_of(text);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard index is below Name::SHARDS"
        )]
        let shard_tag = shard_idx as u32;
        let shard = &self.shards[shard_idx];

        if let Some(&slot) = shard.read().index.get(text) {
            return Ok(Name::new(shard_tag, slot));
        }

        let mut guard = shard.write();
        // Another thread may have won the race between the two locks.
        if let Some(&slot) = guard.index.get(text) {
            return Ok(Name::new(shard_tag, slot));
        }
        let count = guard.strings.len();
        let slot = u32::try_from(count)
            .ok()
            .filter(|&slot| slot <= Name::MAX_SLOT)
            .ok_or(InternError {
                shard: shard_idx,
                count,
            })?;
        let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
        guard.strings.push(leaked);
        guard.index.insert(leaked, slot);
        self.len.fetch_add(1, Ordering::Relaxed);
        Ok(Name::new(shard_tag, slot))
    }

    /// Intern `text`.
    ///
    /// # Panics
    /// Panics if a shard exceeds `Name::MAX_SLOT` strings.
    pub fn intern(&self, text: &str) -> Name {
        self.try_intern(text).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Text of an interned name.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.shards[name.shard()].read().strings[name.slot()]
    }

    /// Number of distinct strings interned so far, including the empty string.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    /// Always `false`: the empty string is pre-interned.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
