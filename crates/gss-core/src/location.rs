//! Source buffers and locations within them.
//!
//! A [`SourceCode`] is an immutable, named input buffer. It is read once before
//! any tree is built and shared by every location that points into it.
//!
//! A [`SourceLocation`] is a half-open span `[begin, end)` inside one buffer.
//! Each end is a [`SourcePoint`] carrying the byte offset, the character index
//! and the 1-indexed line and column. Locations are values: they are never
//! mutated, only merged into new ones.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::text::{line_char_starts, line_start_offsets};

// ============================================================================
// Source Code
// ============================================================================

/// A named, immutable input buffer.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SourceCode {
    file_name: String,
    text: String,
    /// Byte offset of the first byte of each line.
    line_starts: Vec<usize>,
    /// Char index of the first char of each line.
    line_char_starts: Vec<usize>,
}

impl SourceCode {
    /// Create a new source buffer.
    pub fn new(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = line_start_offsets(&text);
        let line_char_starts = line_char_starts(&text, &line_starts);
        SourceCode {
            file_name: file_name.into(),
            text,
            line_starts,
            line_char_starts,
        }
    }

    /// Create a source buffer already wrapped for sharing.
    pub fn shared(file_name: impl Into<String>, text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(file_name, text))
    }

    /// The name of the file this buffer was read from.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The full text of the buffer.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Build a [`SourcePoint`] for a byte offset into this buffer.
    ///
    /// Offsets past the end are clamped to the end of the text.
    pub fn point_at(&self, byte_offset: usize) -> SourcePoint {
        let mut byte_offset = byte_offset.min(self.text.len());
        while !self.text.is_char_boundary(byte_offset) {
            byte_offset -= 1;
        }
        let line_index = self
            .line_starts
            .partition_point(|&start| start <= byte_offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line_index];
        let column_chars = self.text[line_start..byte_offset].chars().count();
        SourcePoint {
            byte_offset,
            char_index: self.line_char_starts[line_index] + column_chars,
            line: line_index as u32 + 1,
            column: column_chars as u32 + 1,
        }
    }
}

// ============================================================================
// Source Point
// ============================================================================

/// One end of a [`SourceLocation`].
///
/// Lines and columns are 1-indexed; byte offsets and character indices are
/// 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourcePoint {
    pub byte_offset: usize,
    pub char_index: usize,
    pub line: u32,
    pub column: u32,
}

// ============================================================================
// Source Location
// ============================================================================

/// A half-open span of a [`SourceCode`] buffer, or the unknown location.
#[derive(Clone, Default)]
pub struct SourceLocation {
    source: Option<Arc<SourceCode>>,
    begin: SourcePoint,
    end: SourcePoint,
}

impl SourceLocation {
    /// Create a location spanning `begin..end`.
    ///
    /// # Panics
    /// Panics if `begin` lies after `end`.
    pub fn new(source: Arc<SourceCode>, begin: SourcePoint, end: SourcePoint) -> Self {
        assert!(
            begin.byte_offset <= end.byte_offset,
            "SourceLocation begin ({}) must be <= end ({})",
            begin.byte_offset,
            end.byte_offset
        );
        SourceLocation {
            source: Some(source),
            begin,
            end,
        }
    }

    /// Create a location from byte offsets into `source`.
    ///
    /// # Panics
    /// Panics if `begin > end`.
    pub fn from_offsets(source: &Arc<SourceCode>, begin: usize, end: usize) -> Self {
        let begin_point = source.point_at(begin);
        let end_point = source.point_at(end);
        Self::new(Arc::clone(source), begin_point, end_point)
    }

    /// The location of synthesized nodes that have no source text.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// True for [`SourceLocation::unknown`].
    pub fn is_unknown(&self) -> bool {
        self.source.is_none()
    }

    /// The source buffer, if known.
    pub fn source(&self) -> Option<&Arc<SourceCode>> {
        self.source.as_ref()
    }

    /// The file name of the buffer, or `"<unknown>"`.
    pub fn file_name(&self) -> &str {
        self.source
            .as_ref()
            .map(|s| s.file_name())
            .unwrap_or("<unknown>")
    }

    pub fn begin(&self) -> SourcePoint {
        self.begin
    }

    pub fn end(&self) -> SourcePoint {
        self.end
    }

    /// Byte length of the span.
    pub fn len(&self) -> usize {
        self.end.byte_offset - self.begin.byte_offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The text covered by this location, or `""` when unknown.
    pub fn excerpt(&self) -> &str {
        match &self.source {
            Some(source) => &source.text()[self.begin.byte_offset..self.end.byte_offset],
            None => "",
        }
    }

    /// True if both locations point into the same buffer.
    pub fn same_source(&self, other: &SourceLocation) -> bool {
        match (&self.source, &other.source) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Merge two locations into one spanning both.
    ///
    /// An unknown location yields the other one. Locations in different
    /// buffers cannot be merged and yield `first`.
    pub fn merge(first: &SourceLocation, second: &SourceLocation) -> SourceLocation {
        if first.is_unknown() {
            return second.clone();
        }
        if second.is_unknown() || !first.same_source(second) {
            return first.clone();
        }
        let begin = if first.begin.byte_offset <= second.begin.byte_offset {
            first.begin
        } else {
            second.begin
        };
        let end = if first.end.byte_offset >= second.end.byte_offset {
            first.end
        } else {
            second.end
        };
        SourceLocation {
            source: first.source.clone(),
            begin,
            end,
        }
    }

    /// Merge a sequence of locations, skipping unknown ones.
    pub fn merge_all<'a>(locations: impl IntoIterator<Item = &'a SourceLocation>) -> SourceLocation {
        locations
            .into_iter()
            .fold(SourceLocation::unknown(), |acc, loc| {
                SourceLocation::merge(&acc, loc)
            })
    }

    fn sort_key(&self) -> (&str, usize, usize) {
        match &self.source {
            Some(source) => (
                source.file_name(),
                self.begin.byte_offset,
                self.end.byte_offset,
            ),
            None => ("", 0, 0),
        }
    }
}

impl PartialEq for SourceLocation {
    fn eq(&self, other: &Self) -> bool {
        match (&self.source, &other.source) {
            (None, None) => true,
            (Some(_), Some(_)) => {
                self.same_source(other) && self.begin == other.begin && self.end == other.end
            }
            _ => false,
        }
    }
}

impl Eq for SourceLocation {}

impl PartialOrd for SourceLocation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SourceLocation {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_unknown(), other.is_unknown()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.sort_key().cmp(&other.sort_key()),
        }
    }
}

impl fmt::Debug for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(
                f,
                "{}:{}:{}..{}:{}",
                source.file_name(),
                self.begin.line,
                self.begin.column,
                self.end.line,
                self.end.column
            ),
            None => write!(f, "<unknown>"),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(
                f,
                "{}:{}:{}",
                source.file_name(),
                self.begin.line,
                self.begin.column
            ),
            None => write!(f, "<unknown>"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> Arc<SourceCode> {
        SourceCode::shared("a.gss", ".a {\n  color: red;\n}\n")
    }

    #[test]
    fn points_are_one_indexed() {
        let src = source();
        let loc = SourceLocation::from_offsets(&src, 7, 12);
        assert_eq!(loc.begin().line, 2);
        assert_eq!(loc.begin().column, 3);
        assert_eq!(loc.excerpt(), "color");
        assert_eq!(loc.to_string(), "a.gss:2:3");
    }

    #[test]
    fn merge_spans_both() {
        let src = source();
        let a = SourceLocation::from_offsets(&src, 0, 2);
        let b = SourceLocation::from_offsets(&src, 7, 12);
        let merged = SourceLocation::merge(&b, &a);
        assert_eq!(merged.begin().byte_offset, 0);
        assert_eq!(merged.end().byte_offset, 12);
    }

    #[test]
    fn merge_with_unknown_keeps_known() {
        let src = source();
        let a = SourceLocation::from_offsets(&src, 3, 4);
        assert_eq!(SourceLocation::merge(&SourceLocation::unknown(), &a), a);
        assert_eq!(SourceLocation::merge(&a, &SourceLocation::unknown()), a);
        assert!(SourceLocation::merge_all([]).is_unknown());
    }

    #[test]
    fn ordering_puts_unknown_first() {
        let src = source();
        let a = SourceLocation::from_offsets(&src, 0, 2);
        let b = SourceLocation::from_offsets(&src, 7, 12);
        let mut locs = vec![b.clone(), SourceLocation::unknown(), a.clone()];
        locs.sort();
        assert!(locs[0].is_unknown());
        assert_eq!(locs[1], a);
        assert_eq!(locs[2], b);
    }

    #[test]
    fn char_index_counts_scalars() {
        let src = SourceCode::shared("u.gss", "é{}");
        let point = src.point_at(2);
        assert_eq!(point.char_index, 1);
        assert_eq!(point.column, 2);
    }

    #[test]
    #[should_panic(expected = "must be <= end")]
    fn reversed_span_panics() {
        let src = source();
        let _ = SourceLocation::from_offsets(&src, 5, 2);
    }
}
