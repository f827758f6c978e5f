//! Hand-written Cypher lexer.
//!
//! Produces a flat token stream over the raw source, including trivia
//! (whitespace and comments), so the tree built on top of it covers every
//! byte of the input. Lexical problems (unterminated strings, stray
//! characters) are reported as [`Diagnostic`]s rather than failures; the
//! offending bytes still become tokens so parsing can continue.

/// Lexical token categories.
///
/// Operators that the grammar never inspects individually are folded into
/// a handful of punctuation kinds; the parser only cares about the tokens
/// that steer Cypher's structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Whitespace,
    LineComment,
    BlockComment,
    /// Identifier or keyword; the parser decides which.
    Word,
    /// Backtick-escaped name, backticks included.
    QuotedName,
    Integer,
    Float,
    Str,
    Colon,
    Semicolon,
    Comma,
    Dot,
    Dollar,
    Pipe,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Lt,
    Gt,
    Dash,
    Plus,
    Star,
    Slash,
    Percent,
    Caret,
    Eq,
    Bang,
    Question,
    /// Byte the lexer could not place anywhere.
    Error,
}

/// A token as a byte span over the source text.
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.start..self.end]
    }

    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }
}

/// A lexical error, as a message plus the byte span it covers.
#[derive(Debug, Clone)]
pub(crate) struct Diagnostic {
    pub(crate) message: String,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

/// Tokenize `src` in a single pass.
///
/// Always returns a token stream that covers the whole input; problems are
/// reported through the diagnostics list.
pub(crate) fn lex(src: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut tokens = Vec::new();
    let mut diagnostics = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        let kind = match c {
            _ if c.is_whitespace() => {
                while chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
                TokenKind::Whitespace
            }
            '/' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, '/')) => {
                        while chars.next_if(|&(_, c)| c != '\n').is_some() {}
                        TokenKind::LineComment
                    }
                    Some(&(_, '*')) => {
                        chars.next();
                        let mut closed = false;
                        while let Some((_, c)) = chars.next() {
                            if c == '*' {
                                if chars.next_if(|&(_, c)| c == '/').is_some() {
                                    closed = true;
                                    break;
                                }
                            }
                        }
                        if !closed {
                            diagnostics.push(Diagnostic {
                                message: "unterminated block comment".into(),
                                start,
                                end: src.len(),
                            });
                        }
                        TokenKind::BlockComment
                    }
                    _ => TokenKind::Slash,
                }
            }
            '\'' | '"' => {
                chars.next();
                let quote = c;
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '\\' => {
                            chars.next();
                        }
                        _ if c == quote => {
                            closed = true;
                            break;
                        }
                        _ => {}
                    }
                }
                if !closed {
                    diagnostics.push(Diagnostic {
                        message: "unterminated string literal".into(),
                        start,
                        end: src.len(),
                    });
                }
                TokenKind::Str
            }
            '`' => {
                chars.next();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    if c == '`' {
                        // A doubled backtick is an escaped backtick inside
                        // the name, not a terminator.
                        if chars.next_if(|&(_, c)| c == '`').is_some() {
                            continue;
                        }
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    diagnostics.push(Diagnostic {
                        message: "unterminated escaped name".into(),
                        start,
                        end: src.len(),
                    });
                }
                TokenKind::QuotedName
            }
            _ if c.is_ascii_digit() => {
                let mut kind = TokenKind::Integer;
                while chars.next_if(|&(_, c)| c.is_ascii_digit()).is_some() {}
                if let Some(&(_, '.')) = chars.peek() {
                    // `1..2` is a range, not a float; only consume the dot
                    // when a digit follows it.
                    let mut ahead = chars.clone();
                    ahead.next();
                    if matches!(ahead.peek(), Some(&(_, d)) if d.is_ascii_digit()) {
                        chars.next();
                        while chars.next_if(|&(_, c)| c.is_ascii_digit()).is_some() {}
                        kind = TokenKind::Float;
                    }
                }
                if matches!(chars.peek(), Some(&(_, 'e' | 'E'))) {
                    let mut ahead = chars.clone();
                    ahead.next();
                    if matches!(ahead.peek(), Some(&(_, '+' | '-'))) {
                        ahead.next();
                    }
                    if matches!(ahead.peek(), Some(&(_, d)) if d.is_ascii_digit()) {
                        chars.next();
                        chars.next_if(|&(_, c)| c == '+' || c == '-');
                        while chars.next_if(|&(_, c)| c.is_ascii_digit()).is_some() {}
                        kind = TokenKind::Float;
                    }
                }
                kind
            }
            _ if c.is_alphabetic() || c == '_' => {
                while chars
                    .next_if(|&(_, c)| c.is_alphanumeric() || c == '_')
                    .is_some()
                {}
                TokenKind::Word
            }
            _ => {
                chars.next();
                match c {
                    ':' => TokenKind::Colon,
                    ';' => TokenKind::Semicolon,
                    ',' => TokenKind::Comma,
                    '.' => TokenKind::Dot,
                    '$' => TokenKind::Dollar,
                    '|' => TokenKind::Pipe,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    '<' => TokenKind::Lt,
                    '>' => TokenKind::Gt,
                    '-' => TokenKind::Dash,
                    '+' => TokenKind::Plus,
                    '*' => TokenKind::Star,
                    '%' => TokenKind::Percent,
                    '^' => TokenKind::Caret,
                    '=' => TokenKind::Eq,
                    '!' => TokenKind::Bang,
                    '?' => TokenKind::Question,
                    _ => {
                        diagnostics.push(Diagnostic {
                            message: format!("unexpected character `{c}`"),
                            start,
                            end: start + c.len_utf8(),
                        });
                        TokenKind::Error
                    }
                }
            }
        };
        let end = chars.peek().map_or(src.len(), |&(i, _)| i);
        tokens.push(Token { kind, start, end });
    }

    (tokens, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lexes_simple_match() {
        let (tokens, diagnostics) = lex("MATCH (n:Person)");
        assert!(diagnostics.is_empty());
        let texts: Vec<&str> = tokens.iter().map(|t| t.text("MATCH (n:Person)")).collect();
        assert_eq!(texts, vec!["MATCH", " ", "(", "n", ":", "Person", ")"]);
    }

    #[test]
    fn test_distinguishes_float_from_range() {
        assert_eq!(
            kinds("1.5"),
            vec![TokenKind::Float],
        );
        assert_eq!(
            kinds("1..2"),
            vec![
                TokenKind::Integer,
                TokenKind::Dot,
                TokenKind::Dot,
                TokenKind::Integer
            ],
        );
        assert_eq!(kinds("2e10"), vec![TokenKind::Float]);
        assert_eq!(kinds("2.5e-3"), vec![TokenKind::Float]);
    }

    #[test]
    fn test_string_escapes() {
        let (tokens, diagnostics) = lex(r#"'it\'s' "a""#);
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[2].kind, TokenKind::Str);
        assert!(diagnostics.is_empty());

        let (_, diagnostics) = lex("'open");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("unterminated"));
    }

    #[test]
    fn test_backtick_names() {
        let (tokens, diagnostics) = lex("`weird label` `a``b`");
        assert!(diagnostics.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::QuotedName);
        assert_eq!(tokens[0].text("`weird label` `a``b`"), "`weird label`");
        assert_eq!(tokens[2].kind, TokenKind::QuotedName);
    }

    #[test]
    fn test_comments() {
        let (tokens, diagnostics) = lex("// line\n/* block */ RETURN");
        assert!(diagnostics.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::LineComment);
        assert_eq!(tokens[2].kind, TokenKind::BlockComment);
        let (_, diagnostics) = lex("/* open");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_unknown_character_reported() {
        let (tokens, diagnostics) = lex("RETURN \u{1f600}");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Error));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("unexpected character"));
    }

    #[test]
    fn test_covers_every_byte() {
        let src = "MATCH (n)-[:KNOWS]->(m) WHERE n.age > $min RETURN m;";
        let (tokens, _) = lex(src);
        let mut offset = 0;
        for token in &tokens {
            assert_eq!(token.start, offset);
            offset = token.end;
        }
        assert_eq!(offset, src.len());
    }
}
