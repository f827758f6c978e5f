//! Grammar front end.
//!
//! Everything the rest of the crate knows about Cypher text comes through
//! [`parse`]: a token stream, a full-coverage syntax tree, and the lexical
//! and grammatical problems found along the way. Parsing never fails and
//! never panics; malformed input produces a partial tree plus errors.

mod grammar;
mod lexer;

pub use lexer::{Token, TokenKind};

use crate::tree::SyntaxTree;
use crate::types::{Range, SyntaxError};

/// Result of parsing one document snapshot.
pub struct ParseOutcome {
    pub tree: SyntaxTree,
    /// Raw token stream, trivia included, covering the whole input.
    pub tokens: Vec<Token>,
    pub lex_errors: Vec<SyntaxError>,
    pub parse_errors: Vec<SyntaxError>,
}

impl ParseOutcome {
    pub fn is_valid(&self) -> bool {
        self.lex_errors.is_empty() && self.parse_errors.is_empty()
    }
}

/// Parses a document into a tree plus collected errors.
pub fn parse(text: &str) -> ParseOutcome {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("parse", bytes = text.len()).entered();

    let (tokens, lex_diagnostics) = lexer::lex(text);
    let (tree, parse_diagnostics) = grammar::parse_document(text, &tokens);
    let lex_errors = lex_diagnostics
        .into_iter()
        .map(|d| to_syntax_error(&tree, d))
        .collect();
    let parse_errors = parse_diagnostics
        .into_iter()
        .map(|d| to_syntax_error(&tree, d))
        .collect();
    ParseOutcome {
        tree,
        tokens,
        lex_errors,
        parse_errors,
    }
}

fn to_syntax_error(tree: &SyntaxTree, diagnostic: lexer::Diagnostic) -> SyntaxError {
    let start = tree.position_at(diagnostic.start);
    let stop = if diagnostic.end > diagnostic.start {
        tree.position_at(diagnostic.end - 1)
    } else {
        start
    };
    SyntaxError::error(diagnostic.message, Range::new(start, stop))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    #[test]
    fn test_valid_document_has_no_errors() {
        let outcome = parse("MATCH (n:Person)-[:KNOWS]->(m) WHERE n.age > 30 RETURN m.name;");
        assert!(outcome.is_valid());
        assert!(!outcome.tokens.is_empty());
    }

    #[test]
    fn test_unterminated_string_is_a_lex_error() {
        let outcome = parse("RETURN 'oops");
        assert_eq!(outcome.lex_errors.len(), 1);
        let error = &outcome.lex_errors[0];
        assert_eq!(error.severity, Severity::Error);
        assert!(error.message.contains("nterminated"));
        assert_eq!(error.range.start.line, 1);
        assert_eq!(error.range.start.column, 8);
    }

    #[test]
    fn test_unclosed_pattern_is_a_parse_error() {
        let outcome = parse("MATCH (n:Label");
        assert!(outcome.lex_errors.is_empty());
        assert_eq!(outcome.parse_errors.len(), 1);
        // The error points at the end of input.
        assert_eq!(outcome.parse_errors[0].range.start.offset, 14);
    }

    #[test]
    fn test_empty_document_parses() {
        let outcome = parse("");
        assert!(outcome.is_valid());
        assert_eq!(outcome.tree.text(), "");
    }

    #[test]
    fn test_multibyte_text_error_positions() {
        let outcome = parse("RETURN 'ä");
        assert_eq!(outcome.lex_errors.len(), 1);
        let range = outcome.lex_errors[0].range;
        assert_eq!(range.start.offset, 7);
        assert!(range.stop.offset >= range.start.offset);
    }
}
