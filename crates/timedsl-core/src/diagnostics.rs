//! Source-location diagnostics
//!
//! Spans inside the syntax tree are raw byte offsets; errors surfaced to the
//! caller carry 1-based line/column positions instead, so the editing surface
//! can point at the offending text without re-deriving offsets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location span, 1-based lines and columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl SourceSpan {
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Create a span from byte offsets (requires source text for line/col calculation)
    pub fn from_byte_offset(source: &str, start: usize, end: usize) -> Self {
        let (start_line, start_col) = byte_to_line_col(source, start);
        let (end_line, end_col) = byte_to_line_col(source, end);
        Self::new(start_line, start_col, end_line, end_col)
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}, col {}", self.start_line, self.start_col)
    }
}

/// Convert byte offset to line and column
pub(crate) fn byte_to_line_col(source: &str, offset: usize) -> (u32, u32) {
    let mut line = 1u32;
    let mut col = 1u32;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_to_line_col() {
        let source = "line1\nline2\nline3";
        assert_eq!(byte_to_line_col(source, 0), (1, 1));
        assert_eq!(byte_to_line_col(source, 5), (1, 6));
        assert_eq!(byte_to_line_col(source, 6), (2, 1));
        assert_eq!(byte_to_line_col(source, 12), (3, 1));
    }

    #[test]
    fn test_from_byte_offset() {
        let source = "at 09:30\non monday";
        let span = SourceSpan::from_byte_offset(source, 12, 18);
        assert_eq!(span.start_line, 2);
        assert_eq!(span.start_col, 4);
        assert_eq!(span.end_line, 2);
        assert_eq!(span.end_col, 10);
    }

    #[test]
    fn test_display() {
        let span = SourceSpan::new(2, 5, 2, 7);
        assert_eq!(span.to_string(), "Line 2, col 5");
    }
}
