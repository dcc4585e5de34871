//! Source positions for tokens, nodes and diagnostics.
//!
//! Offsets are character indices into the original compilation unit text,
//! before unicode escapes are translated. A range's `end` is exclusive; the
//! inclusive `source_end` form is derived on demand.

use std::fmt;
use std::ops::Range;

/// A character offset into a source buffer.
pub type TextPos = u32;

/// A half-open range `[pos, end)` of character offsets.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct TextRange {
    /// First character of the range.
    pub pos: TextPos,
    /// One past the last character of the range.
    pub end: TextPos,
}

impl TextRange {
    #[inline]
    pub fn new(pos: TextPos, end: TextPos) -> Self {
        debug_assert!(pos <= end, "inverted range {pos}..{end}");
        Self { pos, end }
    }

    /// A zero-width range, the shape of every synthesized "missing" node.
    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self { pos, end: pos }
    }

    #[inline]
    pub fn len(&self) -> TextPos {
        self.end - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    /// Inclusive start offset.
    #[inline]
    pub fn source_start(&self) -> i64 {
        self.pos as i64
    }

    /// Inclusive end offset. For an empty range this is `source_start - 1`,
    /// the conventional marker of an absent construct.
    #[inline]
    pub fn source_end(&self) -> i64 {
        self.end as i64 - 1
    }

    /// Whether `offset` lies in `[pos, end)`.
    #[inline]
    pub fn contains(&self, offset: TextPos) -> bool {
        offset >= self.pos && offset < self.end
    }

    /// Whether a cursor placed at `offset` touches this range, i.e. the
    /// range ends at or after the cursor and starts before it. An empty
    /// range at the cursor also touches it.
    #[inline]
    pub fn touches_cursor(&self, offset: TextPos) -> bool {
        (self.pos < offset && offset <= self.end) || (self.is_empty() && self.pos == offset)
    }

    /// Whether `other` lies entirely within this range.
    #[inline]
    pub fn contains_range(&self, other: TextRange) -> bool {
        self.pos <= other.pos && other.end <= self.end
    }

    /// The smallest range covering both `self` and `other`.
    #[inline]
    pub fn cover(&self, other: TextRange) -> TextRange {
        TextRange {
            pos: self.pos.min(other.pos),
            end: self.end.max(other.end),
        }
    }

    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.pos as usize..self.end as usize
    }

    #[inline]
    pub fn to_span(&self) -> TextSpan {
        TextSpan::new(self.pos, self.len())
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.pos, self.end)
    }
}

impl From<Range<TextPos>> for TextRange {
    fn from(r: Range<TextPos>) -> Self {
        TextRange::new(r.start, r.end)
    }
}

/// A range expressed as a start and a length, the shape diagnostics carry.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct TextSpan {
    pub start: TextPos,
    pub length: TextPos,
}

impl TextSpan {
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    #[inline]
    pub fn to_text_range(&self) -> TextRange {
        TextRange::new(self.start, self.end())
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl From<TextRange> for TextSpan {
    fn from(range: TextRange) -> Self {
        range.to_span()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusive_end_of_missing_range() {
        let missing = TextRange::empty(12);
        assert_eq!(missing.source_start(), 12);
        assert_eq!(missing.source_end(), 11);
        assert!(missing.source_end() < missing.source_start());

        let ident = TextRange::new(4, 8);
        assert_eq!(ident.source_end(), 7);
    }

    #[test]
    fn test_touches_cursor() {
        let ident = TextRange::new(4, 8);
        assert!(!ident.touches_cursor(4));
        assert!(ident.touches_cursor(5));
        assert!(ident.touches_cursor(8));
        assert!(!ident.touches_cursor(9));
        assert!(TextRange::empty(9).touches_cursor(9));
    }

    #[test]
    fn test_cover_and_contains_range() {
        let a = TextRange::new(2, 5);
        let b = TextRange::new(7, 9);
        let both = a.cover(b);
        assert_eq!(both, TextRange::new(2, 9));
        assert!(both.contains_range(a));
        assert!(!a.contains_range(both));
    }
}
