//! Source locations for tokens, nodes and diagnostics.

use std::ops::Range;

/// Location of a token or node in the source file.
///
/// `line` and the column pair are 1-based, with `column_end` exclusive.
/// `start` / `end` are byte offsets into the original source string,
/// so `&source[span.range()]` yields the covered text.
///
/// Node spans built with [`Span::to`] keep the line of their first
/// token; columns then describe first-token start to last-token end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub line: u32,
    pub column_start: u32,
    pub column_end: u32,
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(line: u32, column_start: u32, column_end: u32, start: u32, end: u32) -> Self {
        Span {
            line,
            column_start,
            column_end,
            start,
            end,
        }
    }

    /// A zero-width span, used for the synthetic EOF token.
    pub fn point(line: u32, column: u32, offset: u32) -> Self {
        Span::new(line, column, column, offset, offset)
    }

    /// Join two spans: start fields from `self`, end fields from `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            line: self.line,
            column_start: self.column_start,
            column_end: other.column_end,
            start: self.start,
            end: other.end.max(self.start),
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
