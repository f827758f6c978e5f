//! Source positions and ranges.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A caret position in the document.
///
/// `line` and `column` are 1-based and count characters; `offset` is the
/// 0-based byte offset into the UTF-8 document text. For any position taken
/// from real text all three agree. Ordering compares `(line, column)` first,
/// so the synthetic stop of an empty [`Range`] sorts before its start.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// 1-based line number
    pub line: u32,
    /// 1-based character column within the line
    pub column: u32,
    /// 0-based byte offset from the start of the document
    pub offset: usize,
}

impl Position {
    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// A span between two positions.
///
/// Grammar node ranges are inclusive of both ends (`stop` sits on the last
/// character). Completion replace ranges use editor semantics instead:
/// `stop` is the caret one past the replaced text, so `start == stop` is a
/// zero-width insertion point. A range with `start > stop` is the sentinel
/// for "no content" and is always treated as empty, never as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start: Position,
    pub stop: Position,
}

impl Range {
    pub fn new(start: Position, stop: Position) -> Self {
        Self { start, stop }
    }

    /// True for the `start > stop` no-content sentinel.
    pub fn is_empty(&self) -> bool {
        self.start > self.stop
    }
}
