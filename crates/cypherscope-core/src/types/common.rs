//! Diagnostics and reference types shared across the engine.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A lexer or parser diagnostic collected during a parse.
///
/// The front end never fails: every recognized problem becomes one of these
/// and the (partial) tree is still produced.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyntaxError {
    /// Severity level; the front end currently only emits `Error`
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Location in the document
    pub range: Range,
}

impl SyntaxError {
    pub fn error(message: impl Into<String>, range: Range) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            range,
        }
    }
}

/// A located occurrence of a named entity in the parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub name: String,
    pub range: Range,
}

impl Reference {
    pub fn new(name: impl Into<String>, range: Range) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }
}

/// One top-level statement of the document, in document order.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatementInfo {
    pub index: usize,
    pub range: Range,
}

/// Classes of nameable entity tracked for reference and completion queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolicCategory {
    Variable,
    Label,
    RelationshipType,
    PropertyKey,
    Parameter,
    FunctionName,
    ProcedureName,
    ProcedureOutput,
    ConsoleCommandName,
    ConsoleCommandSubcommand,
    ConsoleCommandPath,
}

impl SymbolicCategory {
    /// Every category, in indexing order.
    pub const ALL: [SymbolicCategory; 11] = [
        SymbolicCategory::Variable,
        SymbolicCategory::Label,
        SymbolicCategory::RelationshipType,
        SymbolicCategory::PropertyKey,
        SymbolicCategory::Parameter,
        SymbolicCategory::FunctionName,
        SymbolicCategory::ProcedureName,
        SymbolicCategory::ProcedureOutput,
        SymbolicCategory::ConsoleCommandName,
        SymbolicCategory::ConsoleCommandSubcommand,
        SymbolicCategory::ConsoleCommandPath,
    ];
}
