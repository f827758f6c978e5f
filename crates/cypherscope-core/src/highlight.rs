//! Semantic highlight spans.
//!
//! Editors tokenize keywords, strings, and comments themselves; what they
//! cannot see lexically is which names are variables, labels, procedures,
//! and so on. This walker extracts exactly those spans from the tree.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tree::{NodeKind, NodeRef, SyntaxTree};
use crate::types::Range;

/// Highlight class of a span; serialized names double as CSS class names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum HighlightStyle {
    Variable,
    Label,
    RelationshipType,
    Property,
    Procedure,
    ProcedureOutput,
    Function,
    Parameter,
    ConsoleCommand,
}

/// One highlighted region of the document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HighlightSpan {
    pub style: HighlightStyle,
    pub range: Range,
}

/// Sigil-carrying nodes highlight whole (`:Person`, `$param`); name nodes
/// highlight just the name. Kinds not listed are walked through.
fn style_for(kind: NodeKind) -> Option<HighlightStyle> {
    match kind {
        NodeKind::Variable => Some(HighlightStyle::Variable),
        NodeKind::NodeLabel => Some(HighlightStyle::Label),
        NodeKind::RelationshipTypes => Some(HighlightStyle::RelationshipType),
        NodeKind::PropertyKeyName => Some(HighlightStyle::Property),
        NodeKind::ProcedureName => Some(HighlightStyle::Procedure),
        NodeKind::ProcedureOutput => Some(HighlightStyle::ProcedureOutput),
        NodeKind::FunctionName => Some(HighlightStyle::Function),
        NodeKind::Parameter => Some(HighlightStyle::Parameter),
        NodeKind::ConsoleCommandName => Some(HighlightStyle::ConsoleCommand),
        NodeKind::ConsoleCommandSubcommand => Some(HighlightStyle::Property),
        _ => None,
    }
}

/// Collects highlight spans in document order. A styled node is emitted as
/// one span and not descended into, so nested name nodes (a label name
/// inside its sigil node) never produce overlapping spans.
pub fn highlight(tree: &SyntaxTree) -> Vec<HighlightSpan> {
    let mut spans = Vec::new();
    visit(tree.node(tree.root()), &mut spans);
    spans
}

fn visit(node: NodeRef<'_>, spans: &mut Vec<HighlightSpan>) {
    let (start, end) = node.span();
    if start < end {
        if let Some(style) = style_for(node.kind()) {
            spans.push(HighlightSpan {
                style,
                range: node.range(),
            });
            return;
        }
    }
    for child in node.children() {
        visit(child, spans);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn styled_texts(text: &str) -> Vec<(HighlightStyle, String)> {
        let outcome = parse(text);
        highlight(&outcome.tree)
            .into_iter()
            .map(|span| {
                let start = span.range.start.offset;
                let stop = span.range.stop.offset;
                (span.style, text[start..=stop].to_string())
            })
            .collect()
    }

    #[test]
    fn test_pattern_spans_in_document_order() {
        let spans = styled_texts("MATCH (n:Person)-[r:KNOWS]->(m) RETURN n.name");
        assert_eq!(
            spans,
            vec![
                (HighlightStyle::Variable, "n".into()),
                (HighlightStyle::Label, ":Person".into()),
                (HighlightStyle::Variable, "r".into()),
                (HighlightStyle::RelationshipType, ":KNOWS".into()),
                (HighlightStyle::Variable, "m".into()),
                (HighlightStyle::Variable, "n".into()),
                (HighlightStyle::Property, "name".into()),
            ]
        );
    }

    #[test]
    fn test_procedure_call_spans() {
        let spans = styled_texts("CALL db.indexes() YIELD description RETURN $p");
        assert_eq!(
            spans,
            vec![
                (HighlightStyle::Procedure, "db.indexes".into()),
                (HighlightStyle::ProcedureOutput, "description".into()),
                (HighlightStyle::Parameter, "$p".into()),
            ]
        );
    }

    #[test]
    fn test_console_command_spans() {
        let spans = styled_texts(":play movies");
        assert_eq!(
            spans,
            vec![
                (HighlightStyle::ConsoleCommand, ":play".into()),
                (HighlightStyle::Property, "movies".into()),
            ]
        );
    }

    #[test]
    fn test_function_span() {
        let spans = styled_texts("RETURN toFloat('1')");
        assert_eq!(spans, vec![(HighlightStyle::Function, "toFloat".into())]);
    }

    #[test]
    fn test_nothing_styled_in_bare_clause() {
        let spans = styled_texts("MATCH (");
        assert!(spans.is_empty());
    }

    #[test]
    fn test_style_serializes_as_css_class() {
        let json = serde_json::to_string(&HighlightStyle::RelationshipType).unwrap();
        assert_eq!(json, r#""relationshipType""#);
    }
}
