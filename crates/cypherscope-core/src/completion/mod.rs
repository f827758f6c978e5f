//! Context-aware completion.
//!
//! Split in three: [`rules`] turns a tree position into completion-type
//! requests, [`engine`] resolves requests against the schema and the
//! reference index and computes the replace range, [`ranking`] orders the
//! merged candidates against the typed filter text.

pub(crate) mod engine;
pub(crate) mod ranking;
pub(crate) mod rules;

use std::sync::OnceLock;

use regex::Regex;

pub(crate) use engine::CompletionEngine;

/// Quotes a name for insertion into a query.
///
/// A plain identifier passes through unchanged; anything else is wrapped in
/// backticks. A leading `:` sigil (labels, relationship types) stays outside
/// the backticks, so `:odd name` becomes ``:`odd name```.
pub(crate) fn escape(value: &str) -> String {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    let identifier = IDENTIFIER
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

    let (sigil, name) = match value.strip_prefix(':') {
        Some(rest) => (":", rest),
        None => ("", value),
    };
    if name.is_empty() || identifier.is_match(name) {
        return value.to_string();
    }
    format!("{sigil}`{name}`")
}
