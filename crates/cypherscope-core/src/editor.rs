//! Editor-facing facade.
//!
//! [`EditorSupport`] owns one document snapshot (tree, reference index,
//! merged diagnostics) plus the completion engine, and answers every query
//! an editor integration needs through 1-based line/column coordinates.
//! Updating the text replaces the snapshot wholesale; handed-out node
//! references are lifetime-bound to the facade, so a stale reference across
//! an update is a compile error rather than a runtime surprise.

use crate::completion::CompletionEngine;
use crate::highlight::{self, HighlightSpan};
use crate::navigator;
use crate::parser::{parse, ParseOutcome};
use crate::references::ReferenceIndex;
use crate::tree::NodeRef;
use crate::types::{
    CompletionResult, Reference, Schema, StatementInfo, SyntaxError,
};

pub struct EditorSupport {
    outcome: ParseOutcome,
    index: ReferenceIndex,
    errors: Vec<SyntaxError>,
    engine: CompletionEngine,
}

impl EditorSupport {
    pub fn new(text: &str) -> EditorSupport {
        let outcome = parse(text);
        let errors = merged_errors(&outcome);
        let index = ReferenceIndex::build(&outcome.tree);
        EditorSupport {
            outcome,
            index,
            errors,
            engine: CompletionEngine::new(),
        }
    }

    /// Re-parses the document and replaces the whole snapshot.
    pub fn update_text(&mut self, text: &str) {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("update_text", bytes = text.len()).entered();

        self.outcome = parse(text);
        self.errors = merged_errors(&self.outcome);
        self.update_reference_providers();
    }

    /// Rebuilds the reference index from the current snapshot. Called by
    /// [`EditorSupport::update_text`]; exposed for hosts that wire custom
    /// invalidation.
    pub fn update_reference_providers(&mut self) {
        self.index = ReferenceIndex::build(&self.outcome.tree);
    }

    pub fn text(&self) -> &str {
        self.outcome.tree.text()
    }

    /// The innermost node at the given caret, or `None` for an empty
    /// document. Out-of-bounds positions clamp to the nearest element.
    pub fn element_at(&self, line: u32, column: u32) -> Option<NodeRef<'_>> {
        let tree = &self.outcome.tree;
        let element = navigator::element_at(tree, tree.position_of(line, column));
        if element.id() == tree.root() {
            return None;
        }
        Some(element)
    }

    /// All same-name occurrences, within the statement under the caret, of
    /// the nameable entity at the caret.
    pub fn references_at(&self, line: u32, column: u32) -> Vec<Reference> {
        let tree = &self.outcome.tree;
        self.index
            .references_at(tree, tree.position_of(line, column))
    }

    /// Completion items and replace range for the given caret. `filter` is
    /// matched fuzzily against item views; pass `""` for the full list.
    pub fn complete(&self, line: u32, column: u32, filter: &str) -> CompletionResult {
        let tree = &self.outcome.tree;
        self.engine
            .complete(tree, &self.index, tree.position_of(line, column), filter)
    }

    pub fn update_schema(&mut self, schema: Schema) {
        self.engine.update_schema(schema);
    }

    pub fn schema(&self) -> &Schema {
        self.engine.schema()
    }

    /// Lexer and parser diagnostics for the current text, merged and sorted
    /// by document position.
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    /// Top-level statements of the document, in order.
    pub fn statements(&self) -> Vec<StatementInfo> {
        self.index.statements()
    }

    /// Semantic highlight spans for the current text.
    pub fn highlight(&self) -> Vec<HighlightSpan> {
        highlight::highlight(&self.outcome.tree)
    }
}

impl Default for EditorSupport {
    fn default() -> Self {
        EditorSupport::new("")
    }
}

fn merged_errors(outcome: &ParseOutcome) -> Vec<SyntaxError> {
    let mut errors: Vec<SyntaxError> = outcome
        .lex_errors
        .iter()
        .chain(&outcome.parse_errors)
        .cloned()
        .collect();
    errors.sort_by_key(|error| error.range.start);
    errors
}
