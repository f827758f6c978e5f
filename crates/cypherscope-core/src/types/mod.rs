//! Types for the editor-facing API.
//!
//! Everything the hosting editor sends or receives lives here: positions and
//! ranges, diagnostics, references, completion items, and the schema
//! snapshot. All host-facing types serialize as camelCase JSON.

mod common;
mod completion;
mod position;
mod schema;

pub use common::{Reference, Severity, StatementInfo, SymbolicCategory, SyntaxError};
pub use completion::{CompletionItem, CompletionKind, CompletionResult};
pub use position::{Position, Range};
pub use schema::{ConsoleCommand, ProcedureReturn, Schema, SchemaFunction, SchemaProcedure};
