//! Statement splitting and reference indexing.
//!
//! A document is a sequence of statements separated by top-level `;`.
//! Reference resolution is scoped per statement: a variable bound in one
//! statement is invisible in a sibling statement, so "find all references"
//! and completion symbol tables never leak names across `;`.

use std::collections::HashMap;

use crate::navigator;
use crate::tree::{NodeKind, NodeRef, SyntaxTree};
use crate::types::{Position, Range, Reference, StatementInfo, SymbolicCategory};

/// Categories extracted during indexing, paired with the node kind their
/// occurrences are read from. Categories missing here (procedure outputs,
/// console subcommands) are resolved from schema data instead and have no
/// in-document occurrences to index.
const INDEXED_CATEGORIES: [(SymbolicCategory, NodeKind); 8] = [
    (SymbolicCategory::Variable, NodeKind::Variable),
    (SymbolicCategory::Label, NodeKind::LabelName),
    (SymbolicCategory::RelationshipType, NodeKind::RelTypeName),
    (SymbolicCategory::PropertyKey, NodeKind::PropertyKeyName),
    (SymbolicCategory::Parameter, NodeKind::ParameterName),
    (SymbolicCategory::FunctionName, NodeKind::FunctionName),
    (SymbolicCategory::ProcedureName, NodeKind::ProcedureName),
    (SymbolicCategory::ConsoleCommandName, NodeKind::ConsoleCommandName),
];

fn category_for_kind(kind: NodeKind) -> Option<SymbolicCategory> {
    INDEXED_CATEGORIES
        .iter()
        .find(|(_, k)| *k == kind)
        .map(|(category, _)| *category)
}

struct StatementBucket {
    /// Byte span of the statement node
    span: (usize, usize),
    range: Range,
    references: HashMap<SymbolicCategory, Vec<Reference>>,
}

/// Per-statement occurrence lists for every indexed category.
///
/// Built in one pass over a fresh tree and never mutated afterward.
/// Occurrences are stored in document order (depth-first, left to right),
/// which callers rely on for deterministic first-occurrence semantics.
pub struct ReferenceIndex {
    statements: Vec<StatementBucket>,
}

impl ReferenceIndex {
    pub fn build(tree: &SyntaxTree) -> ReferenceIndex {
        let root = tree.node(tree.root());
        let mut statements = Vec::new();
        for child in root.children() {
            if child.kind() != NodeKind::Statement {
                continue;
            }
            let mut bucket = StatementBucket {
                span: child.span(),
                range: child.range(),
                references: HashMap::new(),
            };
            collect(child, &mut bucket);
            statements.push(bucket);
        }
        // A document with no statement (empty, or trivia only) still gets
        // one empty bucket so position queries never face "no statement".
        if statements.is_empty() {
            statements.push(StatementBucket {
                span: (0, tree.text().len()),
                range: root.range(),
                references: HashMap::new(),
            });
        }
        ReferenceIndex { statements }
    }

    /// Index of the statement owning a byte offset: the containing statement
    /// (rightmost when the offset sits on a shared boundary), else the
    /// closest preceding one, else the first.
    pub fn statement_for(&self, offset: usize) -> usize {
        let mut containing = None;
        for (i, bucket) in self.statements.iter().enumerate() {
            if bucket.span.0 <= offset && offset <= bucket.span.1 {
                containing = Some(i);
            }
        }
        if let Some(i) = containing {
            return i;
        }
        let mut preceding = None;
        for (i, bucket) in self.statements.iter().enumerate() {
            if bucket.span.1 < offset {
                preceding = Some(i);
            }
        }
        preceding.unwrap_or(0)
    }

    /// Distinct names of a category within one statement, first-seen order.
    pub fn names(&self, category: SymbolicCategory, statement: usize) -> Vec<String> {
        let Some(bucket) = self.statements.get(statement) else {
            return Vec::new();
        };
        let occurrences = bucket
            .references
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let mut names: Vec<String> = Vec::new();
        for reference in occurrences {
            if !names.iter().any(|n| n == &reference.name) {
                names.push(reference.name.clone());
            }
        }
        names
    }

    /// All occurrences, within the statement at `position`, of the named
    /// entity under the caret. Empty when the caret is not on an indexed
    /// occurrence (keywords, punctuation, open space).
    pub fn references_at(&self, tree: &SyntaxTree, position: Position) -> Vec<Reference> {
        let element = navigator::element_at(tree, position);
        let Some((category, node)) = enclosing_occurrence(element) else {
            return Vec::new();
        };
        let name = node.text();
        let statement = self.statement_for(position.offset);
        let Some(bucket) = self.statements.get(statement) else {
            return Vec::new();
        };
        bucket
            .references
            .get(&category)
            .map(|refs| refs.iter().filter(|r| r.name == name).cloned().collect())
            .unwrap_or_default()
    }

    /// The document's statements in order.
    pub fn statements(&self) -> Vec<StatementInfo> {
        self.statements
            .iter()
            .enumerate()
            .map(|(index, bucket)| StatementInfo {
                index,
                range: bucket.range,
            })
            .collect()
    }
}

/// Depth-first walk of one statement, appending every category occurrence
/// in document order.
fn collect(statement: NodeRef<'_>, bucket: &mut StatementBucket) {
    let mut stack: Vec<NodeRef> = statement.children().collect();
    stack.reverse();
    while let Some(node) = stack.pop() {
        if let Some(category) = category_for_kind(node.kind()) {
            bucket
                .references
                .entry(category)
                .or_default()
                .push(Reference::new(node.text(), node.range()));
        }
        let mut children: Vec<NodeRef> = node.children().collect();
        children.reverse();
        stack.extend(children);
    }
}

/// The innermost indexed-category node at or above `element`.
fn enclosing_occurrence(element: NodeRef<'_>) -> Option<(SymbolicCategory, NodeRef<'_>)> {
    let mut current = Some(element);
    while let Some(node) = current {
        if let Some(category) = category_for_kind(node.kind()) {
            return Some((category, node));
        }
        current = node.parent();
    }
    None
}
