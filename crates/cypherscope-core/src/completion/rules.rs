//! Completion-type resolution.
//!
//! Each rule is a pure function keyed by node kind in a lookup table.
//! Dispatch inspects the element itself, then its ancestors nearest-first.
//! A rule returns `None` to pass ("not my position, keep walking") or
//! `Some(requests)` to settle the lookup; `Some(vec![])` is a deliberate
//! zero-suggestion answer, as at closing delimiters, where the caller is
//! expected to retry one character to the left.

use crate::navigator;
use crate::tree::{NodeKind, NodeRef};

/// What to suggest at a position. Most variants name a plain category;
/// procedure outputs and console subcommands carry the context needed to
/// resolve them against the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CompletionTypeRequest {
    Keyword,
    Label,
    RelationshipType,
    PropertyKey,
    Variable,
    Parameter,
    FunctionName,
    ProcedureName,
    ConsoleCommandName,
    ProcedureOutput {
        procedure: String,
    },
    ConsoleCommandSubcommand {
        /// Path segments typed so far, command name first
        path: Vec<String>,
        /// True when the last segment is still being typed and should act
        /// as a filter rather than a completed path element
        filter_last: bool,
    },
}

type Rule = fn(NodeRef<'_>, NodeRef<'_>) -> Option<Vec<CompletionTypeRequest>>;

/// Kind-keyed rule table. Kinds not listed contribute nothing and the walk
/// continues to their parent.
const RULES: [(NodeKind, Rule); 17] = [
    (NodeKind::NodeLabel, rule_node_label),
    (NodeKind::RelationshipTypes, rule_relationship_types),
    (NodeKind::NodePattern, rule_node_pattern),
    (NodeKind::RelationshipDetail, rule_relationship_detail),
    (NodeKind::PropertyLookup, rule_property_lookup),
    (NodeKind::PropertyKeyName, rule_property_key_name),
    (NodeKind::Variable, rule_variable),
    (NodeKind::Parameter, rule_parameter),
    (NodeKind::FunctionName, rule_function_name),
    (NodeKind::ProcedureName, rule_procedure_name),
    (NodeKind::ProcedureOutput, rule_yield_position),
    (NodeKind::YieldItems, rule_yield_position),
    (NodeKind::ConsoleCommandName, rule_console_command_name),
    (NodeKind::ConsoleCommandSubcommand, rule_console_subcommand),
    (NodeKind::ConsoleCommandPath, rule_console_path),
    (NodeKind::MapLiteral, rule_map_literal),
    (NodeKind::MapEntry, rule_map_entry),
];

/// Categories offered when nothing up the ancestor chain claims the
/// position; this is what surfaces keywords while typing in open space.
/// Variable leads so in-scope names outrank schema suggestions on ties.
fn fallback() -> Vec<CompletionTypeRequest> {
    vec![
        CompletionTypeRequest::Variable,
        CompletionTypeRequest::Keyword,
        CompletionTypeRequest::Label,
        CompletionTypeRequest::RelationshipType,
        CompletionTypeRequest::PropertyKey,
        CompletionTypeRequest::FunctionName,
        CompletionTypeRequest::ProcedureName,
        CompletionTypeRequest::Parameter,
        CompletionTypeRequest::ConsoleCommandName,
    ]
}

fn rule_for(kind: NodeKind) -> Option<Rule> {
    RULES.iter().find(|(k, _)| *k == kind).map(|(_, rule)| *rule)
}

/// Resolves the completion-type requests for an element, walking the
/// element and then its ancestors until a rule settles the lookup.
pub(crate) fn resolve(element: NodeRef<'_>) -> Vec<CompletionTypeRequest> {
    let mut current = Some(element);
    while let Some(node) = current {
        if let Some(rule) = rule_for(node.kind()) {
            if let Some(requests) = rule(element, node) {
                return requests;
            }
        }
        current = node.parent();
    }
    fallback()
}

fn rule_node_label(_: NodeRef<'_>, _: NodeRef<'_>) -> Option<Vec<CompletionTypeRequest>> {
    Some(vec![CompletionTypeRequest::Label])
}

fn rule_relationship_types(_: NodeRef<'_>, _: NodeRef<'_>) -> Option<Vec<CompletionTypeRequest>> {
    Some(vec![CompletionTypeRequest::RelationshipType])
}

fn rule_node_pattern(
    element: NodeRef<'_>,
    _: NodeRef<'_>,
) -> Option<Vec<CompletionTypeRequest>> {
    match element.text() {
        "(" => Some(vec![
            CompletionTypeRequest::Variable,
            CompletionTypeRequest::Label,
        ]),
        ")" => Some(Vec::new()),
        _ => None,
    }
}

fn rule_relationship_detail(
    element: NodeRef<'_>,
    _: NodeRef<'_>,
) -> Option<Vec<CompletionTypeRequest>> {
    match element.text() {
        "[" => Some(vec![
            CompletionTypeRequest::Variable,
            CompletionTypeRequest::RelationshipType,
        ]),
        "]" => Some(Vec::new()),
        _ => None,
    }
}

fn rule_property_lookup(
    element: NodeRef<'_>,
    _: NodeRef<'_>,
) -> Option<Vec<CompletionTypeRequest>> {
    if element.text() == "." {
        return Some(vec![CompletionTypeRequest::PropertyKey]);
    }
    None
}

fn rule_property_key_name(_: NodeRef<'_>, _: NodeRef<'_>) -> Option<Vec<CompletionTypeRequest>> {
    Some(vec![CompletionTypeRequest::PropertyKey])
}

fn rule_variable(_: NodeRef<'_>, _: NodeRef<'_>) -> Option<Vec<CompletionTypeRequest>> {
    Some(vec![
        CompletionTypeRequest::Variable,
        CompletionTypeRequest::FunctionName,
    ])
}

fn rule_parameter(_: NodeRef<'_>, _: NodeRef<'_>) -> Option<Vec<CompletionTypeRequest>> {
    Some(vec![CompletionTypeRequest::Parameter])
}

fn rule_function_name(_: NodeRef<'_>, _: NodeRef<'_>) -> Option<Vec<CompletionTypeRequest>> {
    Some(vec![CompletionTypeRequest::FunctionName])
}

fn rule_procedure_name(_: NodeRef<'_>, _: NodeRef<'_>) -> Option<Vec<CompletionTypeRequest>> {
    Some(vec![CompletionTypeRequest::ProcedureName])
}

/// Caret in a YIELD list: suggest the outputs of the procedure being
/// called. No recognizable procedure name means zero suggestions, not a
/// fallback to unrelated categories.
fn rule_yield_position(
    _: NodeRef<'_>,
    node: NodeRef<'_>,
) -> Option<Vec<CompletionTypeRequest>> {
    let procedure = navigator::ancestor_of_kind(node, NodeKind::Clause)
        .and_then(|c| {
            c.children()
                .find(|child| child.kind() == NodeKind::ProcedureInvocation)
        })
        .and_then(|invocation| {
            invocation
                .children()
                .find(|child| child.kind() == NodeKind::ProcedureName)
        })
        .map(|name| name.text().to_string());
    Some(match procedure {
        Some(procedure) => vec![CompletionTypeRequest::ProcedureOutput { procedure }],
        None => Vec::new(),
    })
}

fn rule_console_command_name(
    _: NodeRef<'_>,
    _: NodeRef<'_>,
) -> Option<Vec<CompletionTypeRequest>> {
    Some(vec![CompletionTypeRequest::ConsoleCommandName])
}

fn rule_console_subcommand(
    element: NodeRef<'_>,
    node: NodeRef<'_>,
) -> Option<Vec<CompletionTypeRequest>> {
    let path = node
        .parent()
        .filter(|p| p.kind() == NodeKind::ConsoleCommandPath)?;
    Some(vec![console_request(path, element, true)])
}

fn rule_console_path(
    element: NodeRef<'_>,
    node: NodeRef<'_>,
) -> Option<Vec<CompletionTypeRequest>> {
    Some(vec![console_request(node, element, false)])
}

/// Builds the subcommand request from the path segments typed up to the
/// element's position, command name first.
fn console_request(
    path: NodeRef<'_>,
    element: NodeRef<'_>,
    filter_last: bool,
) -> CompletionTypeRequest {
    let limit = element.span().0;
    let mut segments = Vec::new();
    for child in path.children() {
        let named = matches!(
            child.kind(),
            NodeKind::ConsoleCommandName | NodeKind::ConsoleCommandSubcommand
        );
        if named && child.span().0 <= limit {
            segments.push(child.text().to_string());
        }
    }
    CompletionTypeRequest::ConsoleCommandSubcommand {
        path: segments,
        filter_last,
    }
}

fn rule_map_literal(
    element: NodeRef<'_>,
    node: NodeRef<'_>,
) -> Option<Vec<CompletionTypeRequest>> {
    if element.text() == "}" {
        return Some(Vec::new());
    }
    // Value positions live under a map entry; only elements directly in the
    // map body (brace, comma, space between entries) are key positions.
    if element.parent().map(|p| p.id()) == Some(node.id()) {
        return Some(vec![
            CompletionTypeRequest::PropertyKey,
            CompletionTypeRequest::Parameter,
        ]);
    }
    None
}

/// After the `:` of a map entry the caret is in value position.
fn rule_map_entry(
    element: NodeRef<'_>,
    node: NodeRef<'_>,
) -> Option<Vec<CompletionTypeRequest>> {
    let direct = element.parent().map(|p| p.id()) == Some(node.id());
    if direct && (element.text() == ":" || element.kind().is_trivia()) {
        return Some(vec![
            CompletionTypeRequest::Variable,
            CompletionTypeRequest::Parameter,
            CompletionTypeRequest::FunctionName,
        ]);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::engine::COMPLETION_UNITS;
    use crate::parser::parse;
    use crate::tree::SyntaxTree;

    fn requests_at(tree: &SyntaxTree, offset: usize) -> Vec<CompletionTypeRequest> {
        let element = navigator::element_at_with(tree, tree.position_at(offset), |n| {
            COMPLETION_UNITS.contains(&n.kind())
        });
        resolve(element)
    }

    #[test]
    fn test_label_inside_node_pattern() {
        let outcome = parse("MATCH (n) MATCH (a:b");
        let requests = requests_at(&outcome.tree, 20);
        assert_eq!(requests, vec![CompletionTypeRequest::Label]);
    }

    #[test]
    fn test_open_paren_offers_variables_and_labels() {
        let outcome = parse("MATCH (a) MATCH (");
        let requests = requests_at(&outcome.tree, 17);
        assert_eq!(
            requests,
            vec![
                CompletionTypeRequest::Variable,
                CompletionTypeRequest::Label
            ]
        );
    }

    #[test]
    fn test_open_bracket_offers_variables_and_types() {
        let outcome = parse("MATCH (n)-[");
        let requests = requests_at(&outcome.tree, 11);
        assert_eq!(
            requests,
            vec![
                CompletionTypeRequest::Variable,
                CompletionTypeRequest::RelationshipType
            ]
        );
    }

    #[test]
    fn test_closing_bracket_settles_with_zero() {
        let outcome = parse("MATCH (n)-[r]->(m)");
        let requests = requests_at(&outcome.tree, 12);
        assert_eq!(requests, Vec::new());
    }

    #[test]
    fn test_property_lookup_dot() {
        let outcome = parse("RETURN n.");
        let requests = requests_at(&outcome.tree, 9);
        assert_eq!(requests, vec![CompletionTypeRequest::PropertyKey]);
    }

    #[test]
    fn test_property_key_name_position() {
        let outcome = parse("RETURN n.prop");
        let requests = requests_at(&outcome.tree, 11);
        assert_eq!(requests, vec![CompletionTypeRequest::PropertyKey]);
    }

    #[test]
    fn test_variable_offers_functions_too() {
        let outcome = parse("RETURN co");
        let requests = requests_at(&outcome.tree, 9);
        assert_eq!(
            requests,
            vec![
                CompletionTypeRequest::Variable,
                CompletionTypeRequest::FunctionName
            ]
        );
    }

    #[test]
    fn test_parameter_sigil() {
        let outcome = parse("RETURN $");
        let requests = requests_at(&outcome.tree, 8);
        assert_eq!(requests, vec![CompletionTypeRequest::Parameter]);
    }

    #[test]
    fn test_yield_output_scoped_to_procedure() {
        let outcome = parse("CALL db.indexes() YIELD desc");
        let requests = requests_at(&outcome.tree, 26);
        assert_eq!(
            requests,
            vec![CompletionTypeRequest::ProcedureOutput {
                procedure: "db.indexes".to_string()
            }]
        );
    }

    #[test]
    fn test_console_subcommand_path() {
        let outcome = parse(":server user");
        let requests = requests_at(&outcome.tree, 10);
        assert_eq!(
            requests,
            vec![CompletionTypeRequest::ConsoleCommandSubcommand {
                path: vec![":server".to_string(), "user".to_string()],
                filter_last: true,
            }]
        );
    }

    #[test]
    fn test_console_path_space_keeps_full_path() {
        let outcome = parse(":server user ");
        let requests = requests_at(&outcome.tree, 13);
        assert_eq!(
            requests,
            vec![CompletionTypeRequest::ConsoleCommandSubcommand {
                path: vec![":server".to_string(), "user".to_string()],
                filter_last: false,
            }]
        );
    }

    #[test]
    fn test_console_command_name_position() {
        let outcome = parse(":pla");
        let requests = requests_at(&outcome.tree, 4);
        assert_eq!(requests, vec![CompletionTypeRequest::ConsoleCommandName]);
    }

    #[test]
    fn test_open_space_falls_back_to_all() {
        let outcome = parse("MATCH (n) ");
        let requests = requests_at(&outcome.tree, 10);
        assert_eq!(requests, fallback());
    }

    #[test]
    fn test_clause_start_word_falls_back_to_all() {
        let outcome = parse("MAT");
        let requests = requests_at(&outcome.tree, 3);
        assert_eq!(requests, fallback());
    }

    #[test]
    fn test_map_key_position() {
        let outcome = parse("MATCH (n {key: 1, ");
        let requests = requests_at(&outcome.tree, 18);
        assert_eq!(
            requests,
            vec![
                CompletionTypeRequest::PropertyKey,
                CompletionTypeRequest::Parameter
            ]
        );
    }
}
