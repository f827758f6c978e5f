//! Completion result types returned to the hosting editor.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Range;

/// Category of a completion item, shown by editors as the item icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum CompletionKind {
    Keyword,
    Label,
    RelationshipType,
    PropertyKey,
    Variable,
    Parameter,
    FunctionName,
    ProcedureName,
    ProcedureOutput,
    ConsoleCommandName,
    ConsoleCommandSubcommand,
}

/// One completion suggestion.
///
/// `view` is what the editor displays and what fuzzy ranking matches
/// against; `content` is the text actually inserted (escaped when the name
/// is not a plain identifier). Two items are the same suggestion for
/// ranking purposes when their `view`s are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    pub kind: CompletionKind,

    /// Display string, also the fuzzy-match key
    pub view: String,

    /// Text inserted into the document
    pub content: String,

    /// Trailing annotation, e.g. a signature or command description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postfix: Option<String>,
}

impl CompletionItem {
    pub fn new(kind: CompletionKind, view: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            view: view.into(),
            content: content.into(),
            postfix: None,
        }
    }

    pub fn with_postfix(mut self, postfix: impl Into<String>) -> Self {
        self.postfix = Some(postfix.into());
        self
    }
}

/// Result of a completion query.
///
/// `range` is the replace range in editor semantics: `stop` is the caret one
/// past the replaced text, and `start == stop` means "insert at the caret,
/// replace nothing".
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResult {
    pub range: Range,
    pub items: Vec<CompletionItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_postfix_skipped_when_absent() {
        let item = CompletionItem::new(CompletionKind::Label, ":Person", ":Person");
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("postfix"));

        let with = item.with_postfix(" :: STRING");
        let json = serde_json::to_string(&with).unwrap();
        assert!(json.contains(r#""postfix":" :: STRING""#));
    }

    #[test]
    fn test_kind_serializes_camel_case() {
        let json = serde_json::to_string(&CompletionKind::RelationshipType).unwrap();
        assert_eq!(json, r#""relationshipType""#);
    }
}
