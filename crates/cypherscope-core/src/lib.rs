pub mod editor;
pub mod error;
pub mod highlight;
pub mod keywords;
pub mod navigator;
pub mod parser;
pub mod references;
pub mod tree;
pub mod types;

mod completion;

// Re-export the main entry points
pub use editor::EditorSupport;
pub use error::SchemaError;
pub use highlight::{highlight, HighlightSpan, HighlightStyle};
pub use keywords::KEYWORDS;
pub use navigator::{ancestor_of_kind, element_at, element_at_with, has_error_descendant};
pub use parser::{parse, ParseOutcome, Token, TokenKind};
pub use references::ReferenceIndex;
pub use tree::{NodeId, NodeKind, NodeRef, SyntaxTree};

// Re-export host-facing types explicitly
pub use types::{
    CompletionItem,
    CompletionKind,
    CompletionResult,
    ConsoleCommand,
    Position,
    ProcedureReturn,
    Range,
    Reference,
    Schema,
    SchemaFunction,
    SchemaProcedure,
    Severity,
    StatementInfo,
    SymbolicCategory,
    SyntaxError,
};
