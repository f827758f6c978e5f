//! The completion engine proper.
//!
//! Holds the schema snapshot and the per-category item lists derived from
//! it. The static lists (keywords, labels, functions, ...) are built once
//! per schema push; query-derived items (variables in the current
//! statement) and context-dependent items (procedure outputs, console
//! subcommands) are computed per query.

use crate::navigator;
use crate::references::ReferenceIndex;
use crate::tree::{NodeKind, NodeRef, SyntaxTree};
use crate::types::{
    CompletionItem, CompletionKind, CompletionResult, ConsoleCommand, Position, Range, Schema,
    SymbolicCategory,
};

use super::escape;
use super::ranking::{self, Scorer, SubsequenceScorer};
use super::rules::{self, CompletionTypeRequest};

/// Node kinds that settle the caret-to-element descent: once the walk
/// reaches one of these the whole unit is the completion target, not the
/// leaf under the caret. This is what makes a half-typed `:Lab` replace the
/// full label rather than one character of it.
pub(crate) const COMPLETION_UNITS: [NodeKind; 7] = [
    NodeKind::NodeLabel,
    NodeKind::RelationshipTypes,
    NodeKind::FunctionName,
    NodeKind::ProcedureName,
    NodeKind::ConsoleCommandName,
    NodeKind::ConsoleCommandSubcommand,
    NodeKind::ProcedureOutput,
];

pub(crate) struct CompletionEngine {
    schema: Schema,
    cached: CachedItems,
    scorer: Box<dyn Scorer>,
}

impl CompletionEngine {
    pub(crate) fn new() -> CompletionEngine {
        CompletionEngine::with_schema(Schema::default())
    }

    pub(crate) fn with_schema(schema: Schema) -> CompletionEngine {
        let cached = CachedItems::rebuild(&schema);
        CompletionEngine {
            schema,
            cached,
            scorer: Box::new(SubsequenceScorer),
        }
    }

    /// Replaces the schema snapshot and rebuilds the derived item lists.
    pub(crate) fn update_schema(&mut self, schema: Schema) {
        self.cached = CachedItems::rebuild(&schema);
        self.schema = schema;
    }

    pub(crate) fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Answers one completion query against a parsed document.
    ///
    /// `filter` is the text the editor wants matched (usually what the user
    /// typed since the last word boundary); empty means "everything, in
    /// merged order". The returned range uses editor semantics: `start ==
    /// stop` inserts at the caret, otherwise the range is the text to
    /// replace.
    pub(crate) fn complete(
        &self,
        tree: &SyntaxTree,
        index: &ReferenceIndex,
        position: Position,
        filter: &str,
    ) -> CompletionResult {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "complete",
            line = position.line,
            column = position.column
        )
        .entered();

        let element = navigator::element_at_with(tree, position, |node| {
            COMPLETION_UNITS.contains(&node.kind())
        });

        // A label or relationship-type node that swallowed a malformed name
        // gets surgical treatment: replace just the `:` and match everything
        // carrying the sigil.
        let (range, filter) = if smart_replace(element) {
            (sigil_range(tree, element), ":")
        } else {
            (replace_range(tree, element, position), filter)
        };

        let requests = rules::resolve(element);
        let statement = index.statement_for(position.offset.min(tree.text().len()));

        // Query-derived items first, schema-derived items second, each pass
        // in request order. The ranker is stable, so this order is what ties
        // fall back to.
        let mut items = Vec::new();
        for request in &requests {
            if matches!(request, CompletionTypeRequest::Variable) {
                let names = index.names(SymbolicCategory::Variable, statement);
                items.extend(
                    names
                        .into_iter()
                        .map(|name| CompletionItem::new(CompletionKind::Variable, name.clone(), name)),
                );
            }
        }
        for request in &requests {
            match request {
                CompletionTypeRequest::Variable => {}
                CompletionTypeRequest::Keyword => items.extend_from_slice(&self.cached.keywords),
                CompletionTypeRequest::Label => items.extend_from_slice(&self.cached.labels),
                CompletionTypeRequest::RelationshipType => {
                    items.extend_from_slice(&self.cached.relationship_types)
                }
                CompletionTypeRequest::PropertyKey => {
                    items.extend_from_slice(&self.cached.property_keys)
                }
                CompletionTypeRequest::FunctionName => {
                    items.extend_from_slice(&self.cached.functions)
                }
                CompletionTypeRequest::ProcedureName => {
                    items.extend_from_slice(&self.cached.procedures)
                }
                CompletionTypeRequest::Parameter => {
                    items.extend_from_slice(&self.cached.parameters)
                }
                CompletionTypeRequest::ConsoleCommandName => {
                    items.extend_from_slice(&self.cached.console_commands)
                }
                CompletionTypeRequest::ProcedureOutput { procedure } => {
                    items.extend(self.procedure_outputs(procedure))
                }
                CompletionTypeRequest::ConsoleCommandSubcommand { path, filter_last } => {
                    items.extend(self.subcommands(path, *filter_last))
                }
            }
        }

        let items = ranking::rank(items, filter, self.scorer.as_ref());
        CompletionResult { range, items }
    }

    /// Yieldable outputs of the named procedure; an unknown name yields
    /// nothing rather than falling back to unrelated suggestions.
    fn procedure_outputs(&self, procedure: &str) -> Vec<CompletionItem> {
        let Some(found) = self.schema.procedures.iter().find(|p| p.name == procedure) else {
            return Vec::new();
        };
        found
            .return_items
            .iter()
            .map(|output| {
                let item = CompletionItem::new(
                    CompletionKind::ProcedureOutput,
                    &output.name,
                    output.name.clone(),
                );
                if output.signature.is_empty() {
                    item
                } else {
                    item.with_postfix(format!(" :: {}", output.signature))
                }
            })
            .collect()
    }

    /// Walks the console-command tree along the typed path and returns the
    /// subcommands available one level deeper. With `filter_last` the final
    /// segment is still being typed, so the walk stops one segment short.
    fn subcommands(&self, path: &[String], filter_last: bool) -> Vec<CompletionItem> {
        let depth = if filter_last {
            path.len().saturating_sub(1)
        } else {
            path.len()
        };
        let mut current: Option<&ConsoleCommand> = None;
        for segment in &path[..depth] {
            let pool = match current {
                Some(command) => &command.commands,
                None => &self.schema.console_commands,
            };
            match pool.iter().find(|c| c.name == *segment) {
                Some(command) => current = Some(command),
                None => return Vec::new(),
            }
        }
        let Some(command) = current else {
            return Vec::new();
        };
        command
            .commands
            .iter()
            .map(|sub| {
                described(
                    CompletionItem::new(
                        CompletionKind::ConsoleCommandSubcommand,
                        &sub.name,
                        sub.name.clone(),
                    ),
                    &sub.description,
                )
            })
            .collect()
    }
}

/// Per-category item lists derived from the schema, rebuilt on every
/// schema push so queries never re-escape names.
struct CachedItems {
    keywords: Vec<CompletionItem>,
    labels: Vec<CompletionItem>,
    relationship_types: Vec<CompletionItem>,
    property_keys: Vec<CompletionItem>,
    functions: Vec<CompletionItem>,
    procedures: Vec<CompletionItem>,
    console_commands: Vec<CompletionItem>,
    parameters: Vec<CompletionItem>,
}

impl CachedItems {
    fn rebuild(schema: &Schema) -> CachedItems {
        CachedItems {
            keywords: crate::keywords::KEYWORDS
                .iter()
                .map(|kw| CompletionItem::new(CompletionKind::Keyword, *kw, *kw))
                .collect(),
            labels: schema
                .labels
                .iter()
                .map(|label| CompletionItem::new(CompletionKind::Label, label, escape(label)))
                .collect(),
            relationship_types: schema
                .relationship_types
                .iter()
                .map(|rel| {
                    CompletionItem::new(CompletionKind::RelationshipType, rel, escape(rel))
                })
                .collect(),
            property_keys: schema
                .property_keys
                .iter()
                .map(|key| CompletionItem::new(CompletionKind::PropertyKey, key, escape(key)))
                .collect(),
            functions: schema
                .functions
                .iter()
                .map(|f| {
                    signed(
                        CompletionItem::new(CompletionKind::FunctionName, &f.name, escape(&f.name)),
                        &f.signature,
                    )
                })
                .collect(),
            procedures: schema
                .procedures
                .iter()
                .map(|p| {
                    signed(
                        CompletionItem::new(CompletionKind::ProcedureName, &p.name, p.name.clone()),
                        &p.signature,
                    )
                })
                .collect(),
            console_commands: schema
                .console_commands
                .iter()
                .map(|c| {
                    described(
                        CompletionItem::new(
                            CompletionKind::ConsoleCommandName,
                            &c.name,
                            c.name.clone(),
                        ),
                        &c.description,
                    )
                })
                .collect(),
            parameters: schema
                .parameters
                .iter()
                .map(|p| CompletionItem::new(CompletionKind::Parameter, p, p.clone()))
                .collect(),
        }
    }
}

fn signed(item: CompletionItem, signature: &str) -> CompletionItem {
    if signature.is_empty() {
        item
    } else {
        item.with_postfix(signature)
    }
}

fn described(item: CompletionItem, description: &Option<String>) -> CompletionItem {
    match description {
        Some(text) => item.with_postfix(text),
        None => item,
    }
}

/// Whether the element under the caret is the text being completed (and so
/// should be replaced by the accepted item), as opposed to a delimiter or
/// blank space the item is inserted after.
fn should_be_replaced(element: NodeRef<'_>) -> bool {
    if element.kind().is_trivia() {
        return false;
    }
    let text = element.text();
    if text.trim().is_empty() {
        return false;
    }
    match text {
        "(" | "[" | "{" | "." | "$" => false,
        // The colon of a map entry separates key from value; the colon of a
        // half-typed label is the thing being completed.
        ":" => element
            .parent()
            .map_or(true, |parent| parent.kind() != NodeKind::MapEntry),
        _ => true,
    }
}

fn smart_replace(element: NodeRef<'_>) -> bool {
    matches!(
        element.kind(),
        NodeKind::NodeLabel | NodeKind::RelationshipTypes
    ) && navigator::has_error_descendant(element)
}

fn replace_range(tree: &SyntaxTree, element: NodeRef<'_>, position: Position) -> Range {
    if should_be_replaced(element) {
        let (start, end) = element.span();
        Range::new(tree.position_at(start), tree.position_at(end))
    } else {
        let caret = tree.position_at(position.offset.min(tree.text().len()));
        Range::new(caret, caret)
    }
}

/// Replace range covering exactly the leading `:` of a malformed label or
/// relationship-type node.
fn sigil_range(tree: &SyntaxTree, element: NodeRef<'_>) -> Range {
    let start = element.span().0;
    Range::new(tree.position_at(start), tree.position_at(start + 1))
}
