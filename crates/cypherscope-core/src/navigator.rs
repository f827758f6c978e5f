//! Position queries over a parsed tree.
//!
//! All lookups resolve to the closest enclosing node rather than failing:
//! a caret in open space lands on a trivia leaf, a caret past everything
//! lands on the deepest node still containing it, and an empty document
//! resolves to the root.

use crate::tree::{NodeKind, NodeRef, SyntaxTree};
use crate::types::Position;

/// Finds the node under a caret by depth-first descent.
///
/// A node spanning bytes `[start, end]` contains caret `c` when
/// `start <= c <= end`; children are scanned left to right and the last
/// containing child wins, so on a shared boundary the right-hand sibling
/// is chosen. Descent stops at a leaf or wherever `stop_at` says the node
/// is already the answer.
pub fn element_at_with<'a>(
    tree: &'a SyntaxTree,
    position: Position,
    mut stop_at: impl FnMut(NodeRef<'a>) -> bool,
) -> NodeRef<'a> {
    let caret = position.offset.min(tree.text().len());
    let mut node = tree.node(tree.root());
    loop {
        if stop_at(node) {
            return node;
        }
        let mut next = None;
        for child in node.children() {
            let (start, end) = child.span();
            if start <= caret && caret <= end {
                next = Some(child);
            }
        }
        match next {
            Some(child) => node = child,
            None => return node,
        }
    }
}

/// Finds the deepest node under a caret.
pub fn element_at<'a>(tree: &'a SyntaxTree, position: Position) -> NodeRef<'a> {
    element_at_with(tree, position, |_| false)
}

/// Nearest enclosing ancestor of the given kind. The search starts at the
/// parent; the node itself never matches.
pub fn ancestor_of_kind<'a>(node: NodeRef<'a>, kind: NodeKind) -> Option<NodeRef<'a>> {
    let mut current = node.parent();
    while let Some(candidate) = current {
        if candidate.kind() == kind {
            return Some(candidate);
        }
        current = candidate.parent();
    }
    None
}

/// True when the node or anything under it is a recovery token.
pub fn has_error_descendant(node: NodeRef<'_>) -> bool {
    if node.kind().is_error() {
        return true;
    }
    node.children().any(has_error_descendant)
}
