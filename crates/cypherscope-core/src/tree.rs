//! Arena syntax tree produced by the grammar front end.
//!
//! Nodes live in a single `Vec` and address each other by index: children
//! are owned edges, the parent link is a plain back-index, so ancestor walks
//! need no reference counting. Trivia (whitespace, comments) is kept as
//! leaves, which makes every in-bounds document offset resolvable to a leaf.
//! A tree is immutable once built and owns a copy of the text it was parsed
//! from; [`NodeRef`] handles borrow the tree and die with it.

use crate::types::{Position, Range};

/// Kind tag for every node, token leaves and grammar contexts alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Token leaves
    Whitespace,
    Comment,
    Identifier,
    Keyword,
    NumberLiteral,
    StringLiteral,
    Punctuation,
    /// Token the parser recognized as out of place and consumed for recovery
    ErrorToken,

    // Grammar contexts
    Root,
    Statement,
    Clause,
    ConsoleCommand,
    ConsoleCommandPath,
    ConsoleCommandName,
    ConsoleCommandSubcommand,
    NodePattern,
    RelationshipPattern,
    RelationshipDetail,
    NodeLabel,
    LabelName,
    RelationshipTypes,
    RelTypeName,
    Variable,
    PropertyLookup,
    PropertyKeyName,
    Parameter,
    ParameterName,
    MapLiteral,
    MapEntry,
    FunctionInvocation,
    FunctionName,
    ProcedureInvocation,
    ProcedureName,
    YieldItems,
    ProcedureOutput,
}

impl NodeKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, NodeKind::Whitespace | NodeKind::Comment)
    }

    pub fn is_error(self) -> bool {
        matches!(self, NodeKind::ErrorToken)
    }
}

/// Index of a node within its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    /// Byte span into the tree's text; `start == end` means no content
    start: usize,
    end: usize,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// The parse tree for one document snapshot.
pub struct SyntaxTree {
    text: String,
    nodes: Vec<NodeData>,
    /// Byte offset of the first character of each line
    line_starts: Vec<usize>,
}

impl SyntaxTree {
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0].kind
    }

    /// Byte span of the node, end exclusive.
    pub fn span(&self, id: NodeId) -> (usize, usize) {
        let node = &self.nodes[id.0];
        (node.start, node.end)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn text_of(&self, id: NodeId) -> &str {
        let (start, end) = self.span(id);
        &self.text[start..end]
    }

    /// Inclusive grammar-node range; empty nodes yield the `start > stop`
    /// sentinel (the stop is synthetic, one column left of the start).
    pub fn range_of(&self, id: NodeId) -> Range {
        let (start, end) = self.span(id);
        if start >= end {
            let at = self.position_at(start);
            let sentinel = Position::new(at.line, at.column.saturating_sub(1), at.offset);
            return Range::new(at, sentinel);
        }
        let mut last = end - 1;
        while !self.text.is_char_boundary(last) {
            last -= 1;
        }
        Range::new(self.position_at(start), self.position_at(last))
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    /// Converts a byte offset to a full position, clamping to the document
    /// and snapping to the nearest char boundary at or below the offset.
    pub fn position_at(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.line_starts[line_idx];
        let column = self.text[line_start..offset].chars().count() as u32 + 1;
        Position::new(line_idx as u32 + 1, column, offset)
    }

    /// Converts a 1-based line/column pair to a clamped caret position.
    ///
    /// Out-of-bounds lines clamp to the last line, out-of-bounds columns to
    /// the end of the line; the caret may sit one past the last character.
    pub fn position_of(&self, line: u32, column: u32) -> Position {
        let line_idx = (line.max(1) as usize - 1).min(self.line_starts.len() - 1);
        let line_start = self.line_starts[line_idx];
        let line_end = match self.line_starts.get(line_idx + 1) {
            Some(&next) => next - 1,
            None => self.text.len(),
        };
        let chars_wanted = column.max(1) - 1;
        let mut offset = line_start;
        let mut advanced = 0;
        for c in self.text[line_start..line_end].chars() {
            if advanced == chars_wanted {
                break;
            }
            offset += c.len_utf8();
            advanced += 1;
        }
        self.position_at(offset)
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Borrowed handle to one node.
///
/// Holding a `NodeRef` borrows the snapshot's tree, so the compiler rejects
/// keeping one across a re-parse.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a SyntaxTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.tree.kind(self.id)
    }

    pub fn text(&self) -> &'a str {
        self.tree.text_of(self.id)
    }

    pub fn range(&self) -> Range {
        self.tree.range_of(self.id)
    }

    pub fn span(&self) -> (usize, usize) {
        self.tree.span(self.id)
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.tree.parent(self.id).map(|id| self.tree.node(id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        tree.children(self.id).iter().map(move |id| tree.node(*id))
    }

    pub fn is_leaf(&self) -> bool {
        self.tree.children(self.id).is_empty()
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.span(), self.text())
    }
}

/// Builder used by the parser; nodes are closed innermost-first.
pub(crate) struct TreeBuilder {
    nodes: Vec<NodeData>,
    open: Vec<NodeId>,
}

impl TreeBuilder {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            open: Vec::new(),
        }
    }

    /// Opens a node at `offset`; its span grows to cover its children.
    pub(crate) fn start(&mut self, kind: NodeKind, offset: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = self.open.last().copied();
        self.nodes.push(NodeData {
            kind,
            start: offset,
            end: offset,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        self.open.push(id);
        id
    }

    /// Closes the innermost open node, setting its span from its children.
    pub(crate) fn finish(&mut self) {
        let id = self.open.pop().unwrap_or(NodeId(0));
        let (first, last) = {
            let node = &self.nodes[id.0];
            (node.children.first().copied(), node.children.last().copied())
        };
        if let (Some(first), Some(last)) = (first, last) {
            self.nodes[id.0].start = self.nodes[first.0].start;
            self.nodes[id.0].end = self.nodes[last.0].end;
        }
    }

    pub(crate) fn leaf(&mut self, kind: NodeKind, start: usize, end: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = self.open.last().copied();
        self.nodes.push(NodeData {
            kind,
            start,
            end,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    pub(crate) fn build(mut self, text: String) -> SyntaxTree {
        while !self.open.is_empty() {
            self.finish();
        }
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        SyntaxTree {
            text,
            nodes: self.nodes,
            line_starts,
        }
    }
}
