//! Source provenance for tree nodes.
//!
//! Spans are kept only so that a rewritten tree can be traced back to the
//! input it came from and so that the matcher can rank candidates by their
//! distance to a hint. They never take part in equality, hashing, diffing or
//! matching.

use std::fmt;

use crate::Name;

/// Source location of a node: the file it came from plus a line range.
///
/// Layout: 12 bytes (interned file name + two line numbers).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(C)]
pub struct Span {
    /// Interned file path, `Name::EMPTY` when unknown.
    pub file: Name,
    /// First line (1-based, 0 when unknown).
    pub start_line: u32,
    /// Last line, inclusive.
    pub end_line: u32,
}

impl Span {
    /// Span for synthesized nodes.
    pub const DUMMY: Span = Span {
        file: Name::EMPTY,
        start_line: 0,
        end_line: 0,
    };

    #[inline]
    pub const fn new(file: Name, start_line: u32, end_line: u32) -> Self {
        Span {
            file,
            start_line,
            end_line,
        }
    }

    /// A span covering a single line.
    #[inline]
    pub const fn line(file: Name, line: u32) -> Self {
        Span::new(file, line, line)
    }

    /// Returns `true` for spans carrying no location.
    #[inline]
    pub const fn is_dummy(&self) -> bool {
        self.start_line == 0 && self.end_line == 0
    }

    /// Check if `line` lies within this span.
    #[inline]
    pub fn contains_line(&self, line: u32) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    /// Smallest span covering both. Keeps `self`'s file.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            file: self.file,
            start_line: self.start_line.min(other.start_line),
            end_line: self.end_line.max(other.end_line),
        }
    }

    /// Line distance between two spans, `None` if they are in different files.
    ///
    /// Overlapping spans are at distance zero.
    pub fn line_distance(&self, other: &Span) -> Option<u32> {
        if self.file != other.file {
            return None;
        }
        if self.end_line < other.start_line {
            Some(other.start_line - self.end_line)
        } else if other.end_line < self.start_line {
            Some(self.start_line - other.end_line)
        } else {
            Some(0)
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}-{}", self.start_line, self.end_line)
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::Span;
    crate::static_assert_size!(Span, 12);
}
