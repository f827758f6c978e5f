//! Recursive-descent grammar over the token stream.
//!
//! The grammar is deliberately loose: it recognizes the structure the rest
//! of the crate cares about (statements, clauses, patterns, names) and
//! degrades to flat token runs everywhere else, so any input produces a
//! tree covering every byte. Problems are collected as [`Diagnostic`]s and
//! parsing always continues past them.

use crate::keywords::{is_clause_keyword, is_keyword};
use crate::parser::lexer::{Diagnostic, Token, TokenKind};
use crate::tree::{NodeKind, SyntaxTree, TreeBuilder};

/// Nesting bound for bracketed sub-expressions. Deeper input keeps parsing
/// but stays flat, which bounds stack depth on hostile documents.
const MAX_DEPTH: u32 = 128;

pub(crate) fn parse_document(text: &str, tokens: &[Token]) -> (SyntaxTree, Vec<Diagnostic>) {
    let mut parser = Parser {
        src: text,
        tokens,
        pos: 0,
        builder: TreeBuilder::new(),
        errors: Vec::new(),
        depth: 0,
    };
    parser.builder.start(NodeKind::Root, 0);
    parser.document();
    (parser.builder.build(text.to_string()), parser.errors)
}

struct Parser<'a> {
    src: &'a str,
    tokens: &'a [Token],
    pos: usize,
    builder: TreeBuilder,
    errors: Vec<Diagnostic>,
    depth: u32,
}

impl<'a> Parser<'a> {
    // Token access. Decision points call `drain_trivia` first, so `current`
    // is the next meaningful token; `adjacent` peeks without draining and is
    // used where a name must touch its sigil.

    fn current(&self) -> Option<Token> {
        self.tokens[self.pos..].iter().copied().find(|t| !t.is_trivia())
    }

    fn adjacent(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied().filter(|t| !t.is_trivia())
    }

    fn nth(&self, n: usize) -> Option<Token> {
        self.tokens[self.pos..]
            .iter()
            .copied()
            .filter(|t| !t.is_trivia())
            .nth(n)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().map_or(false, |t| t.kind == kind)
    }

    fn at_word(&self, word: &str) -> bool {
        self.current().map_or(false, |t| {
            t.kind == TokenKind::Word && t.text(self.src).eq_ignore_ascii_case(word)
        })
    }

    fn at_clause_boundary(&self) -> bool {
        match self.current() {
            None => true,
            Some(t) => match t.kind {
                TokenKind::Semicolon => true,
                TokenKind::Word => is_clause_keyword(t.text(self.src)),
                _ => false,
            },
        }
    }

    fn drain_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            let kind = match token.kind {
                TokenKind::Whitespace => NodeKind::Whitespace,
                TokenKind::LineComment | TokenKind::BlockComment => NodeKind::Comment,
                _ => break,
            };
            self.builder.leaf(kind, token.start, token.end);
            self.pos += 1;
        }
    }

    /// Emits the current token as a leaf of `kind`. Any trivia before it is
    /// drained into the currently open node first.
    fn bump(&mut self, kind: NodeKind) {
        self.drain_trivia();
        if let Some(token) = self.tokens.get(self.pos).copied() {
            self.builder.leaf(kind, token.start, token.end);
            self.pos += 1;
        }
    }

    fn diag(&mut self, message: impl Into<String>) {
        let (start, end) = self
            .current()
            .map_or((self.src.len(), self.src.len()), |t| (t.start, t.end));
        self.errors.push(Diagnostic {
            message: message.into(),
            start,
            end,
        });
    }

    /// Consumes the current token as a recovery leaf and records a problem.
    fn error_token(&mut self, message: impl Into<String>) {
        self.diag(message);
        self.bump(NodeKind::ErrorToken);
    }

    fn enter(&mut self) -> bool {
        if self.depth >= MAX_DEPTH {
            return false;
        }
        self.depth += 1;
        true
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // Productions.

    fn document(&mut self) {
        loop {
            self.drain_trivia();
            match self.current() {
                None => break,
                Some(t) if t.kind == TokenKind::Semicolon => self.bump(NodeKind::Punctuation),
                Some(_) => self.statement(),
            }
        }
    }

    fn statement(&mut self) {
        let offset = self.current().map_or(self.src.len(), |t| t.start);
        self.builder.start(NodeKind::Statement, offset);
        if self.at(TokenKind::Colon) {
            self.console_command();
        } else {
            loop {
                self.drain_trivia();
                match self.current() {
                    None => break,
                    Some(t) if t.kind == TokenKind::Semicolon => break,
                    Some(_) => self.clause(),
                }
            }
        }
        if self.at(TokenKind::Semicolon) {
            self.bump(NodeKind::Punctuation);
        }
        self.builder.finish();
    }

    fn console_command(&mut self) {
        let offset = self.current().map_or(self.src.len(), |t| t.start);
        self.builder.start(NodeKind::ConsoleCommand, offset);
        self.builder.start(NodeKind::ConsoleCommandPath, offset);

        // The command name is the colon plus the word glued to it.
        self.builder.start(NodeKind::ConsoleCommandName, offset);
        self.bump(NodeKind::Punctuation);
        if self.adjacent().map_or(false, |t| t.kind == TokenKind::Word) {
            self.bump(NodeKind::Identifier);
        }
        self.builder.finish();

        loop {
            self.drain_trivia();
            match self.current() {
                Some(t) if t.kind == TokenKind::Word => {
                    let offset = t.start;
                    self.builder.start(NodeKind::ConsoleCommandSubcommand, offset);
                    self.bump(NodeKind::Identifier);
                    self.builder.finish();
                }
                _ => break,
            }
        }
        self.builder.finish();

        // Remaining arguments up to the statement separator.
        loop {
            self.drain_trivia();
            match self.current() {
                None => break,
                Some(t) if t.kind == TokenKind::Semicolon => break,
                Some(_) => self.soup_element(false),
            }
        }
        self.builder.finish();
    }

    fn clause(&mut self) {
        let token = match self.current() {
            Some(t) => t,
            None => return,
        };
        self.builder.start(NodeKind::Clause, token.start);

        if token.kind == TokenKind::Word && is_clause_keyword(token.text(self.src)) {
            let keyword = token.text(self.src).to_ascii_uppercase();
            self.bump(NodeKind::Keyword);
            match keyword.as_str() {
                "MATCH" | "CREATE" | "MERGE" => self.clause_body(true),
                "OPTIONAL" => {
                    if self.at_word("MATCH") {
                        self.bump(NodeKind::Keyword);
                    }
                    self.clause_body(true);
                }
                "DETACH" => {
                    if self.at_word("DELETE") {
                        self.bump(NodeKind::Keyword);
                    }
                    self.clause_body(false);
                }
                "ORDER" => {
                    if self.at_word("BY") {
                        self.bump(NodeKind::Keyword);
                    }
                    self.clause_body(false);
                }
                "UNION" => {
                    if self.at_word("ALL") {
                        self.bump(NodeKind::Keyword);
                    }
                }
                "LOAD" => {
                    if self.at_word("CSV") {
                        self.bump(NodeKind::Keyword);
                    }
                    if self.at_word("WITH")
                        && self
                            .nth(1)
                            .map_or(false, |t| t.text(self.src).eq_ignore_ascii_case("HEADERS"))
                    {
                        self.bump(NodeKind::Keyword);
                        self.bump(NodeKind::Keyword);
                    }
                    self.clause_body(false);
                }
                "CALL" => self.call_tail(),
                "EXPLAIN" | "PROFILE" => {}
                _ => self.clause_body(false),
            }
        } else {
            // A clause that opens with something other than a keyword; the
            // leading word stays a bare identifier so callers see it as
            // unclassified input.
            if token.kind == TokenKind::Word {
                self.bump(NodeKind::Identifier);
            }
            self.clause_body(false);
        }
        self.builder.finish();
    }

    fn call_tail(&mut self) {
        self.drain_trivia();
        if self.at(TokenKind::Word) || self.at(TokenKind::QuotedName) {
            let offset = self.current().map_or(self.src.len(), |t| t.start);
            self.builder.start(NodeKind::ProcedureInvocation, offset);
            self.dotted_name(NodeKind::ProcedureName);
            self.drain_trivia();
            if self.at(TokenKind::LParen) {
                self.balanced_arguments();
            }
            self.builder.finish();
        }
        self.drain_trivia();
        if self.at_word("YIELD") {
            self.yield_items();
        }
        self.clause_body(false);
    }

    fn yield_items(&mut self) {
        let offset = self.current().map_or(self.src.len(), |t| t.start);
        self.builder.start(NodeKind::YieldItems, offset);
        self.bump(NodeKind::Keyword);
        loop {
            self.drain_trivia();
            match self.current() {
                Some(t) if t.kind == TokenKind::Word && is_clause_keyword(t.text(self.src)) => {
                    break
                }
                Some(t)
                    if t.kind == TokenKind::Word
                        && t.text(self.src).eq_ignore_ascii_case("AS") =>
                {
                    self.bump(NodeKind::Keyword);
                    self.drain_trivia();
                    if self.at(TokenKind::Word) || self.at(TokenKind::QuotedName) {
                        let offset = self.current().map_or(self.src.len(), |t| t.start);
                        self.builder.start(NodeKind::Variable, offset);
                        self.bump(NodeKind::Identifier);
                        self.builder.finish();
                    }
                }
                Some(t) if t.kind == TokenKind::Word || t.kind == TokenKind::QuotedName => {
                    let offset = t.start;
                    self.builder.start(NodeKind::ProcedureOutput, offset);
                    self.bump(NodeKind::Identifier);
                    self.builder.finish();
                }
                Some(t) if t.kind == TokenKind::Comma || t.kind == TokenKind::Star => {
                    self.bump(NodeKind::Punctuation)
                }
                _ => break,
            }
        }
        self.builder.finish();
    }

    fn clause_body(&mut self, pattern_context: bool) {
        loop {
            self.drain_trivia();
            if self.at_clause_boundary() {
                break;
            }
            self.soup_element(pattern_context);
        }
    }

    /// Parses one expression-level element. Always consumes at least one
    /// token, which keeps every enclosing loop finite.
    fn soup_element(&mut self, pattern_context: bool) {
        let token = match self.current() {
            Some(t) => t,
            None => return,
        };
        match token.kind {
            TokenKind::Word if is_keyword(token.text(self.src)) => self.bump(NodeKind::Keyword),
            TokenKind::Word | TokenKind::QuotedName => {
                if self.looks_like_function() {
                    self.function_invocation();
                } else {
                    self.variable_chain();
                }
            }
            TokenKind::Dollar => self.parameter(),
            TokenKind::LBrace => self.map_or_parameter(),
            TokenKind::Colon => self.node_label(),
            TokenKind::LParen => {
                if pattern_context || self.looks_like_node_pattern() {
                    self.node_pattern();
                } else {
                    self.balanced_arguments();
                }
            }
            TokenKind::LBracket => {
                if self.enter() {
                    self.bump(NodeKind::Punctuation);
                    self.delimited_soup(TokenKind::RBracket, "]");
                    if self.at(TokenKind::RBracket) {
                        self.bump(NodeKind::Punctuation);
                    }
                    self.leave();
                } else {
                    self.bump(NodeKind::Punctuation);
                }
            }
            TokenKind::Dash | TokenKind::Lt if self.at_relationship(pattern_context) => {
                self.relationship_pattern();
            }
            TokenKind::Str => self.bump(NodeKind::StringLiteral),
            TokenKind::Integer | TokenKind::Float => self.bump(NodeKind::NumberLiteral),
            TokenKind::RParen => self.error_token("Unexpected `)`"),
            TokenKind::RBracket => self.error_token("Unexpected `]`"),
            TokenKind::RBrace => self.error_token("Unexpected `}`"),
            TokenKind::Error => self.bump(NodeKind::ErrorToken),
            _ => self.bump(NodeKind::Punctuation),
        }
    }

    /// Plain parenthesized run: `(` soup `)` with no wrapper node.
    fn balanced_arguments(&mut self) {
        if self.enter() {
            self.bump(NodeKind::Punctuation);
            self.delimited_soup(TokenKind::RParen, ")");
            if self.at(TokenKind::RParen) {
                self.bump(NodeKind::Punctuation);
            }
            self.leave();
        } else {
            self.bump(NodeKind::Punctuation);
        }
    }

    /// Soup inside a delimiter pair; clause keywords do not end it.
    fn delimited_soup(&mut self, close: TokenKind, close_text: &str) {
        loop {
            self.drain_trivia();
            match self.current() {
                None => {
                    self.diag(format!("Expected `{close_text}`"));
                    break;
                }
                Some(t) if t.kind == close => break,
                Some(t) if t.kind == TokenKind::Semicolon => {
                    self.diag(format!("Expected `{close_text}`"));
                    break;
                }
                Some(_) => self.soup_element(false),
            }
        }
    }

    fn node_pattern(&mut self) {
        if !self.enter() {
            self.bump(NodeKind::Punctuation);
            return;
        }
        let offset = self.current().map_or(self.src.len(), |t| t.start);
        self.builder.start(NodeKind::NodePattern, offset);
        self.bump(NodeKind::Punctuation);
        loop {
            self.drain_trivia();
            match self.current() {
                None => {
                    self.diag("Expected `)`");
                    break;
                }
                Some(t) if t.kind == TokenKind::RParen => {
                    self.bump(NodeKind::Punctuation);
                    break;
                }
                Some(t) if t.kind == TokenKind::Semicolon => {
                    self.diag("Expected `)`");
                    break;
                }
                Some(t) if t.kind == TokenKind::Word && is_clause_keyword(t.text(self.src)) => {
                    self.diag("Expected `)`");
                    break;
                }
                Some(t) if t.kind == TokenKind::Colon => self.node_label(),
                Some(t) if t.kind == TokenKind::Word || t.kind == TokenKind::QuotedName => {
                    self.variable_chain()
                }
                Some(t) if t.kind == TokenKind::LBrace => self.map_or_parameter(),
                Some(t) if t.kind == TokenKind::Dollar => self.parameter(),
                Some(_) => self.soup_element(false),
            }
        }
        self.builder.finish();
        self.leave();
    }

    /// `:Label`, used in node patterns and in expression position
    /// (`WHERE n:Label`). The name must touch the colon; a clearly wrong
    /// adjacent token is consumed for recovery so completion can tell
    /// "typed `:`" apart from "typed `:` and the grammar ate the rest".
    fn node_label(&mut self) {
        let offset = self.current().map_or(self.src.len(), |t| t.start);
        self.builder.start(NodeKind::NodeLabel, offset);
        self.bump(NodeKind::Punctuation);
        match self.adjacent() {
            Some(t) if t.kind == TokenKind::Word || t.kind == TokenKind::QuotedName => {
                self.builder.start(NodeKind::LabelName, t.start);
                self.bump(NodeKind::Identifier);
                self.builder.finish();
            }
            Some(t)
                if matches!(
                    t.kind,
                    TokenKind::Integer | TokenKind::Float | TokenKind::Str | TokenKind::Error
                ) =>
            {
                self.error_token("Expected a label name after `:`");
            }
            _ => {}
        }
        self.builder.finish();
    }

    fn relationship_pattern(&mut self) {
        let offset = self.current().map_or(self.src.len(), |t| t.start);
        self.builder.start(NodeKind::RelationshipPattern, offset);
        if self.at(TokenKind::Lt) {
            self.bump(NodeKind::Punctuation);
        }
        if self.at(TokenKind::Dash) {
            self.bump(NodeKind::Punctuation);
        }
        self.drain_trivia();
        if self.at(TokenKind::LBracket) {
            self.relationship_detail();
        }
        self.drain_trivia();
        if self.at(TokenKind::Dash) {
            self.bump(NodeKind::Punctuation);
        }
        if self.at(TokenKind::Gt) {
            self.bump(NodeKind::Punctuation);
        }
        self.builder.finish();
    }

    fn relationship_detail(&mut self) {
        if !self.enter() {
            self.bump(NodeKind::Punctuation);
            return;
        }
        let offset = self.current().map_or(self.src.len(), |t| t.start);
        self.builder.start(NodeKind::RelationshipDetail, offset);
        self.bump(NodeKind::Punctuation);
        loop {
            self.drain_trivia();
            match self.current() {
                None => {
                    self.diag("Expected `]`");
                    break;
                }
                Some(t) if t.kind == TokenKind::RBracket => {
                    self.bump(NodeKind::Punctuation);
                    break;
                }
                Some(t) if t.kind == TokenKind::Semicolon => {
                    self.diag("Expected `]`");
                    break;
                }
                Some(t) if t.kind == TokenKind::Word && is_clause_keyword(t.text(self.src)) => {
                    self.diag("Expected `]`");
                    break;
                }
                Some(t) if t.kind == TokenKind::Colon => self.relationship_types(),
                Some(t) if t.kind == TokenKind::Word || t.kind == TokenKind::QuotedName => {
                    self.variable_chain()
                }
                Some(t) if t.kind == TokenKind::LBrace => self.map_or_parameter(),
                Some(t) if t.kind == TokenKind::Dollar => self.parameter(),
                Some(_) => self.soup_element(false),
            }
        }
        self.builder.finish();
        self.leave();
    }

    /// `:TYPE`, `:A|B`, `:A|:B` inside a relationship detail.
    fn relationship_types(&mut self) {
        let offset = self.current().map_or(self.src.len(), |t| t.start);
        self.builder.start(NodeKind::RelationshipTypes, offset);
        self.bump(NodeKind::Punctuation);
        self.rel_type_name();
        loop {
            match self.adjacent() {
                Some(t) if t.kind == TokenKind::Pipe => {
                    self.bump(NodeKind::Punctuation);
                    if self.adjacent().map_or(false, |t| t.kind == TokenKind::Colon) {
                        self.bump(NodeKind::Punctuation);
                    }
                    self.rel_type_name();
                }
                _ => break,
            }
        }
        self.builder.finish();
    }

    fn rel_type_name(&mut self) {
        match self.adjacent() {
            Some(t) if t.kind == TokenKind::Word || t.kind == TokenKind::QuotedName => {
                self.builder.start(NodeKind::RelTypeName, t.start);
                self.bump(NodeKind::Identifier);
                self.builder.finish();
            }
            Some(t)
                if matches!(
                    t.kind,
                    TokenKind::Integer | TokenKind::Float | TokenKind::Str | TokenKind::Error
                ) =>
            {
                self.error_token("Expected a relationship type after `:`");
            }
            _ => {}
        }
    }

    fn map_or_parameter(&mut self) {
        let legacy = self.nth(1).map_or(false, |t| t.kind == TokenKind::Word)
            && self.nth(2).map_or(false, |t| t.kind == TokenKind::RBrace);
        if legacy {
            let offset = self.current().map_or(self.src.len(), |t| t.start);
            self.builder.start(NodeKind::Parameter, offset);
            self.bump(NodeKind::Punctuation);
            self.drain_trivia();
            let offset = self.current().map_or(self.src.len(), |t| t.start);
            self.builder.start(NodeKind::ParameterName, offset);
            self.bump(NodeKind::Identifier);
            self.builder.finish();
            self.bump(NodeKind::Punctuation);
            self.builder.finish();
        } else {
            self.map_literal();
        }
    }

    fn map_literal(&mut self) {
        if !self.enter() {
            self.bump(NodeKind::Punctuation);
            return;
        }
        let offset = self.current().map_or(self.src.len(), |t| t.start);
        self.builder.start(NodeKind::MapLiteral, offset);
        self.bump(NodeKind::Punctuation);
        loop {
            self.drain_trivia();
            match self.current() {
                None => {
                    self.diag("Expected `}`");
                    break;
                }
                Some(t) if t.kind == TokenKind::RBrace => {
                    self.bump(NodeKind::Punctuation);
                    break;
                }
                Some(t) if t.kind == TokenKind::Semicolon => {
                    self.diag("Expected `}`");
                    break;
                }
                Some(t) if t.kind == TokenKind::Comma => self.bump(NodeKind::Punctuation),
                Some(t) if t.kind == TokenKind::Word || t.kind == TokenKind::QuotedName => {
                    self.map_entry()
                }
                Some(_) => self.soup_element(false),
            }
        }
        self.builder.finish();
        self.leave();
    }

    fn map_entry(&mut self) {
        let offset = self.current().map_or(self.src.len(), |t| t.start);
        self.builder.start(NodeKind::MapEntry, offset);
        self.builder.start(NodeKind::PropertyKeyName, offset);
        self.bump(NodeKind::Identifier);
        self.builder.finish();
        self.drain_trivia();
        if self.at(TokenKind::Colon) {
            self.bump(NodeKind::Punctuation);
            loop {
                self.drain_trivia();
                match self.current() {
                    None => break,
                    Some(t)
                        if matches!(
                            t.kind,
                            TokenKind::Comma | TokenKind::RBrace | TokenKind::Semicolon
                        ) =>
                    {
                        break
                    }
                    Some(_) => self.soup_element(false),
                }
            }
        }
        self.builder.finish();
    }

    /// `$name` (or a bare `$` mid-typing).
    fn parameter(&mut self) {
        let offset = self.current().map_or(self.src.len(), |t| t.start);
        self.builder.start(NodeKind::Parameter, offset);
        self.bump(NodeKind::Punctuation);
        match self.adjacent() {
            Some(t) if t.kind == TokenKind::Word || t.kind == TokenKind::QuotedName => {
                self.builder.start(NodeKind::ParameterName, t.start);
                self.bump(NodeKind::Identifier);
                self.builder.finish();
            }
            Some(t) if t.kind == TokenKind::Integer => {
                self.builder.start(NodeKind::ParameterName, t.start);
                self.bump(NodeKind::NumberLiteral);
                self.builder.finish();
            }
            _ => {}
        }
        self.builder.finish();
    }

    fn function_invocation(&mut self) {
        let offset = self.current().map_or(self.src.len(), |t| t.start);
        self.builder.start(NodeKind::FunctionInvocation, offset);
        self.dotted_name(NodeKind::FunctionName);
        self.drain_trivia();
        if self.at(TokenKind::LParen) {
            self.balanced_arguments();
        }
        self.builder.finish();
    }

    /// `a`, `a.b.c` wrapped as one name node; used for function and
    /// procedure names, which dot-qualify.
    fn dotted_name(&mut self, kind: NodeKind) {
        let offset = self.current().map_or(self.src.len(), |t| t.start);
        self.builder.start(kind, offset);
        self.bump(NodeKind::Identifier);
        loop {
            self.drain_trivia();
            let dotted = self.at(TokenKind::Dot)
                && self
                    .nth(1)
                    .map_or(false, |t| matches!(t.kind, TokenKind::Word | TokenKind::QuotedName));
            if !dotted {
                break;
            }
            self.bump(NodeKind::Punctuation);
            self.bump(NodeKind::Identifier);
        }
        self.builder.finish();
    }

    /// `variable` plus any `.property` lookups after it.
    fn variable_chain(&mut self) {
        let offset = self.current().map_or(self.src.len(), |t| t.start);
        self.builder.start(NodeKind::Variable, offset);
        self.bump(NodeKind::Identifier);
        self.builder.finish();
        loop {
            self.drain_trivia();
            if !self.at(TokenKind::Dot) {
                break;
            }
            let offset = self.current().map_or(self.src.len(), |t| t.start);
            self.builder.start(NodeKind::PropertyLookup, offset);
            self.bump(NodeKind::Punctuation);
            self.drain_trivia();
            if self.at(TokenKind::Word) || self.at(TokenKind::QuotedName) {
                let offset = self.current().map_or(self.src.len(), |t| t.start);
                self.builder.start(NodeKind::PropertyKeyName, offset);
                self.bump(NodeKind::Identifier);
                self.builder.finish();
            }
            self.builder.finish();
        }
    }

    // Lookahead heuristics.

    fn looks_like_function(&self) -> bool {
        let mut i = 1;
        loop {
            match (self.nth(i), self.nth(i + 1)) {
                (Some(dot), Some(word))
                    if dot.kind == TokenKind::Dot
                        && matches!(word.kind, TokenKind::Word | TokenKind::QuotedName) =>
                {
                    i += 2;
                }
                _ => break,
            }
        }
        self.nth(i).map_or(false, |t| t.kind == TokenKind::LParen)
    }

    fn looks_like_node_pattern(&self) -> bool {
        let arrow_after = |t: Option<Token>| {
            t.map_or(false, |t| matches!(t.kind, TokenKind::Dash | TokenKind::Lt))
        };
        match self.nth(1) {
            Some(t) if matches!(t.kind, TokenKind::Colon | TokenKind::LBrace) => true,
            Some(t) if t.kind == TokenKind::RParen => arrow_after(self.nth(2)),
            Some(t) if matches!(t.kind, TokenKind::Word | TokenKind::QuotedName) => {
                match self.nth(2) {
                    Some(t) if matches!(t.kind, TokenKind::Colon | TokenKind::LBrace) => true,
                    Some(t) if t.kind == TokenKind::RParen => arrow_after(self.nth(3)),
                    _ => false,
                }
            }
            _ => false,
        }
    }

    fn at_relationship(&self, pattern_context: bool) -> bool {
        match self.current().map(|t| t.kind) {
            Some(TokenKind::Lt) => self.nth(1).map_or(false, |t| t.kind == TokenKind::Dash),
            Some(TokenKind::Dash) => match self.nth(1).map(|t| t.kind) {
                Some(TokenKind::LBracket | TokenKind::Dash | TokenKind::Gt) => true,
                Some(TokenKind::LParen) => pattern_context,
                _ => false,
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::lex;
    use crate::tree::NodeId;

    fn parse(src: &str) -> (SyntaxTree, Vec<Diagnostic>) {
        let (tokens, _) = lex(src);
        parse_document(src, &tokens)
    }

    fn find_kind(tree: &SyntaxTree, kind: NodeKind) -> Option<NodeId> {
        (0..tree.node_count())
            .map(NodeId)
            .find(|&id| tree.kind(id) == kind)
    }

    fn kinds_of(tree: &SyntaxTree, kind: NodeKind) -> Vec<String> {
        (0..tree.node_count())
            .map(NodeId)
            .filter(|&id| tree.kind(id) == kind)
            .map(|id| tree.text_of(id).to_string())
            .collect()
    }

    #[test]
    fn test_simple_match_structure() {
        let (tree, errors) = parse("MATCH (n:Person) RETURN n");
        assert!(errors.is_empty());
        let label = find_kind(&tree, NodeKind::NodeLabel).unwrap();
        assert_eq!(tree.text_of(label), ":Person");
        let name = find_kind(&tree, NodeKind::LabelName).unwrap();
        assert_eq!(tree.text_of(name), "Person");
        assert_eq!(kinds_of(&tree, NodeKind::Variable), vec!["n", "n"]);
        assert_eq!(kinds_of(&tree, NodeKind::Clause).len(), 2);
    }

    #[test]
    fn test_relationship_pattern_structure() {
        let (tree, errors) = parse("MATCH (n)-[r:KNOWS|LIKES]->(m)");
        assert!(errors.is_empty());
        let detail = find_kind(&tree, NodeKind::RelationshipDetail).unwrap();
        assert_eq!(tree.text_of(detail), "[r:KNOWS|LIKES]");
        assert_eq!(kinds_of(&tree, NodeKind::RelTypeName), vec!["KNOWS", "LIKES"]);
        assert_eq!(kinds_of(&tree, NodeKind::NodePattern).len(), 2);
    }

    #[test]
    fn test_statements_split_on_semicolon() {
        let (tree, errors) = parse("MATCH (n:Label); MATCH (n:Label);");
        assert!(errors.is_empty());
        assert_eq!(kinds_of(&tree, NodeKind::Statement).len(), 2);
        // Clauses chained without a separator stay in one statement.
        let (tree, _) = parse("MATCH (n:Label) MATCH (m:Label)");
        assert_eq!(kinds_of(&tree, NodeKind::Statement).len(), 1);
    }

    #[test]
    fn test_parameters_old_and_new() {
        let (tree, errors) = parse("WITH $param RETURN {legacy}");
        assert!(errors.is_empty());
        assert_eq!(kinds_of(&tree, NodeKind::ParameterName), vec!["param", "legacy"]);
        let params = kinds_of(&tree, NodeKind::Parameter);
        assert_eq!(params, vec!["$param", "{legacy}"]);
    }

    #[test]
    fn test_map_literal_is_not_a_parameter() {
        let (tree, errors) = parse("MATCH (n {key: 1, other: 'x'})");
        assert!(errors.is_empty());
        assert!(find_kind(&tree, NodeKind::Parameter).is_none());
        assert_eq!(kinds_of(&tree, NodeKind::PropertyKeyName), vec!["key", "other"]);
    }

    #[test]
    fn test_dotted_function_and_procedure() {
        let (tree, errors) =
            parse("CALL db.labels() YIELD label RETURN apoc.text.join(['a'], ',')");
        assert!(errors.is_empty());
        let procedure = find_kind(&tree, NodeKind::ProcedureName).unwrap();
        assert_eq!(tree.text_of(procedure), "db.labels");
        let function = find_kind(&tree, NodeKind::FunctionName).unwrap();
        assert_eq!(tree.text_of(function), "apoc.text.join");
        assert_eq!(kinds_of(&tree, NodeKind::ProcedureOutput), vec!["label"]);
    }

    #[test]
    fn test_property_lookup_chain() {
        let (tree, errors) = parse("SET variable.propKey = 1");
        assert!(errors.is_empty());
        let lookup = find_kind(&tree, NodeKind::PropertyLookup).unwrap();
        assert_eq!(tree.text_of(lookup), ".propKey");
        assert_eq!(kinds_of(&tree, NodeKind::PropertyKeyName), vec!["propKey"]);
    }

    #[test]
    fn test_console_command_path() {
        let (tree, errors) = parse(":server user add");
        assert!(errors.is_empty());
        let name = find_kind(&tree, NodeKind::ConsoleCommandName).unwrap();
        assert_eq!(tree.text_of(name), ":server");
        assert_eq!(
            kinds_of(&tree, NodeKind::ConsoleCommandSubcommand),
            vec!["user", "add"]
        );
    }

    #[test]
    fn test_unclosed_node_pattern_reports_error() {
        let (tree, errors) = parse("MATCH (n:Label");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("Expected `)`"));
        // The partial structure is still in the tree.
        assert!(find_kind(&tree, NodeKind::LabelName).is_some());
    }

    #[test]
    fn test_label_recovery_consumes_bad_token() {
        let (tree, errors) = parse("MATCH (a:1)");
        assert_eq!(errors.len(), 1);
        let label = find_kind(&tree, NodeKind::NodeLabel).unwrap();
        let has_error_child = tree
            .children(label)
            .iter()
            .any(|&c| tree.kind(c) == NodeKind::ErrorToken);
        assert!(has_error_child);
    }

    #[test]
    fn test_editor_demo_document_is_valid() {
        let src = "// line comment\n\
                   /* block comment */\n\
                   :play \"http://example.com\";\n\
                   :play incommand-dash;\n\
                   MATCH (variable)\n\
                   MATCH (:Label)\n\
                   MATCH ()-[:RelationshipType]-()\n\
                   WITH $param\n\
                   WITH {param}\n\
                   RETURN some.functionNamme()\n\
                   CALL some.procedureName()\n\
                   CALL some.procedureName() YIELD param1, param2 as somethingElse\n\
                   MATCH (variable {propKey: 1})\n\
                   SET variable.propKey = 1;";
        let (tree, errors) = parse(src);
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(kinds_of(&tree, NodeKind::Statement).len(), 3);
    }

    #[test]
    fn test_where_expression_label_and_pattern() {
        let (tree, errors) = parse("MATCH (n) WHERE n:Person AND (n)-[:KNOWS]-() RETURN n");
        assert!(errors.is_empty());
        assert_eq!(kinds_of(&tree, NodeKind::NodeLabel), vec![":Person"]);
        assert_eq!(kinds_of(&tree, NodeKind::RelTypeName), vec!["KNOWS"]);
    }

    #[test]
    fn test_every_token_lands_in_the_tree() {
        let src = "MATCH (n) WHERE n.age > $min RETURN n; :help";
        let (tree, _) = parse(src);
        // Leaf spans must tile the whole input.
        let mut leaves: Vec<(usize, usize)> = (0..tree.node_count())
            .map(NodeId)
            .filter(|&id| tree.children(id).is_empty() && tree.kind(id) != NodeKind::Root)
            .map(|id| tree.span(id))
            .collect();
        leaves.sort();
        let mut offset = 0;
        for (start, end) in leaves {
            assert_eq!(start, offset);
            offset = end;
        }
        assert_eq!(offset, src.len());
    }

    #[test]
    fn test_deep_nesting_stays_flat_without_panic() {
        let src = "RETURN ".to_string() + &"(".repeat(400) + "1" + &")".repeat(400);
        let (tree, _errors) = parse(&src);
        assert!(tree.node_count() > 0);
    }
}
