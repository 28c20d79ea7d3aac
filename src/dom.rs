//! DOM operations adapter over `dom_query`.
//!
//! The pipeline thinks in lxml-style terms: an element has "text" (character
//! data before its first child element) and a "tail" (character data between
//! its closing tag and the next element sibling). In the html5ever tree those
//! are plain text-node siblings, so this module provides the small set of
//! accessors that recover the text/tail view, plus tag and removal helpers.
//!
//! ```html
//! <div>
//!   TEXT HERE          <!-- div's "text" -->
//!   <span>inner</span>
//!   TAIL HERE          <!-- span's "tail" -->
//! </div>
//! ```
//!
//! Because trailing text lives in its own node, removing an element never
//! destroys the text that follows it; in-order textual continuity is
//! preserved by the tree itself.

use dom_query::{NodeRef, Selection};

/// Get the element's tag name, lowercased. Empty for non-element nodes.
#[must_use]
pub fn tag_name(node: &NodeRef) -> String {
    node.node_name()
        .map(|name| name.to_lowercase())
        .unwrap_or_default()
}

/// Get the element children of a node, in document order.
///
/// Text nodes, comments, and other non-element children are skipped.
#[must_use]
pub fn element_children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let mut children = Vec::new();
    let mut child = node.first_child();
    while let Some(current) = child {
        if current.is_element() {
            children.push(current.clone());
        }
        child = current.next_sibling();
    }
    children
}

/// Get the node's leading text: the concatenated text nodes that precede its
/// first element child.
///
/// Comments between text runs are transparent, matching a parse that strips
/// comments.
#[must_use]
pub fn leading_text(node: &NodeRef) -> String {
    let mut text = String::new();
    let mut child = node.first_child();
    while let Some(current) = child {
        if current.is_element() {
            break;
        }
        if current.is_text() {
            text.push_str(&current.text());
        }
        child = current.next_sibling();
    }
    text
}

/// Get the node's tail text: the concatenated text nodes between this node
/// and its next element sibling (or the end of the parent).
#[must_use]
pub fn tail_text(node: &NodeRef) -> String {
    let mut text = String::new();
    let mut sibling = node.next_sibling();
    while let Some(current) = sibling {
        if current.is_element() {
            break;
        }
        if current.is_text() {
            text.push_str(&current.text());
        }
        sibling = current.next_sibling();
    }
    text
}

/// Detach a node (and its subtree) from the tree.
///
/// Detaching an already-detached node is a no-op. Trailing text nodes are
/// siblings, not part of the subtree, so they survive the removal.
pub fn remove(node: &NodeRef) {
    Selection::from(node.clone()).remove();
}
