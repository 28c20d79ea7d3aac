//! Structural fingerprints for DOM subtrees.
//!
//! A fingerprint is a canonical string rendering of a subtree built from tag
//! names and text only. Attribute values never participate, so two
//! navigation bars that differ only in `href`s or class names compare equal.
//! The output is not valid HTML and is not meant to be read; it only needs
//! to be identical for structurally and textually identical subtrees.
//!
//! Whitespace (space, tab, CR, LF) is removed and the result lowercased, so
//! formatting and casing differences never break equality.
//!
//! For non-root nodes the fingerprint also appends the node's normalized
//! tail text: a `<li>` followed by different trailing text is a different
//! sibling context and must not match. The root of a comparison omits the
//! tail, since what comes after the subtree is not part of its identity.

use std::collections::HashMap;

use dom_query::{NodeId, NodeRef};

use crate::dom;

/// Per-page memo of fingerprint bodies, keyed by the page-scoped node id.
///
/// Only the tag/text/children part is cached; the tail is recomputed on
/// every call because it depends on the node's current position in the
/// document. Entries are valid until the tree is mutated; mutation sites
/// must clear the cache.
pub type FingerprintCache = HashMap<NodeId, String>;

/// Computes the structural fingerprint of `node`.
///
/// `is_root` marks the subtree root of this comparison: the tail text is
/// appended only for non-root nodes.
#[must_use]
pub fn fingerprint(node: &NodeRef, is_root: bool, cache: &mut FingerprintCache) -> String {
    let tail = if is_root {
        String::new()
    } else {
        squeeze(dom::tail_text(node).trim())
    };

    if let Some(body) = cache.get(&node.id) {
        return format!("{body}{tail}");
    }

    let body = render(node, cache);
    let result = format!("{body}{tail}");
    cache.insert(node.id, body);
    result
}

/// Renders the tag/text/children body of the fingerprint, recursively,
/// normalizing the result.
fn render(node: &NodeRef, cache: &mut FingerprintCache) -> String {
    let tag = dom::tag_name(node);
    let leading = dom::leading_text(node);
    let text = leading.trim();
    let children = dom::element_children(node);

    if children.is_empty() && text.is_empty() {
        return squeeze(&format!("<{tag}></{tag}>"));
    }

    let mut inner = String::new();
    for child in &children {
        inner.push_str(&fingerprint(child, false, cache));
    }
    squeeze(&format!("<{tag}>{text}{inner}</{tag}>"))
}

/// Strips spaces, tabs, and line breaks, and lowercases.
fn squeeze(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\n' | '\r'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_query::Document;

    fn first<'a>(doc: &'a Document, css: &str) -> NodeRef<'a> {
        match doc.select(css).nodes().first().cloned() {
            Some(node) => node,
            None => panic!("no match for {css}"),
        }
    }

    fn fp(html: &str, css: &str) -> String {
        let doc = Document::from(html);
        let node = first(&doc, css);
        fingerprint(&node, true, &mut FingerprintCache::new())
    }

    #[test]
    fn attributes_are_ignored() {
        let a = fp(r#"<nav class="main" id="x"><a href="/one">Share</a></nav>"#, "nav");
        let b = fp(r#"<nav data-role="menu"><a href="/two">Share</a></nav>"#, "nav");
        assert_eq!(a, b);
    }

    #[test]
    fn differing_text_never_matches() {
        let a = fp("<nav><a>Home</a></nav>", "nav");
        let b = fp("<nav><a>About</a></nav>", "nav");
        assert_ne!(a, b);
    }

    #[test]
    fn differing_tags_never_match() {
        assert_ne!(fp("<div>x</div>", "div"), fp("<nav>x</nav>", "nav"));
    }

    #[test]
    fn whitespace_and_case_are_normalized() {
        let a = fp("<div>  Hello\n\t World </div>", "div");
        let b = fp("<div>hello world</div>", "div");
        assert_eq!(a, b);
    }

    #[test]
    fn empty_leaf_renders_as_bare_tag_pair() {
        assert_eq!(fp("<div><hr></div>", "hr"), "<hr></hr>");
    }

    #[test]
    fn tail_is_included_for_non_root_nodes() {
        let doc_a = Document::from("<div><span>x</span>one</div>");
        let doc_b = Document::from("<div><span>x</span>two</div>");
        let span_a = first(&doc_a, "span");
        let span_b = first(&doc_b, "span");
        let mut cache = FingerprintCache::new();
        assert_ne!(
            fingerprint(&span_a, false, &mut cache),
            fingerprint(&span_b, false, &mut FingerprintCache::new())
        );
        // as comparison roots the tails are excluded and the spans match
        assert_ne!(
            fingerprint(&span_a, false, &mut FingerprintCache::new()),
            fingerprint(&span_a, true, &mut FingerprintCache::new())
        );
    }

    #[test]
    fn identical_subtrees_on_different_pages_match() {
        let page_a = fp(
            "<html><body><nav><a>Home</a><a>About</a></nav><p>alpha</p></body></html>",
            "nav",
        );
        let page_b = fp(
            "<html><body><div>unrelated</div><nav><a>Home</a><a>About</a></nav></body></html>",
            "nav",
        );
        assert_eq!(page_a, page_b);
    }

    #[test]
    fn cache_is_not_a_snapshot_across_mutation() {
        let doc = Document::from("<div><span>x</span><b>y</b></div>");
        let div = first(&doc, "div");
        let mut cache = FingerprintCache::new();
        let before = fingerprint(&div, true, &mut cache);

        doc.select("span").remove();

        // stale cache still answers with the old body
        assert_eq!(fingerprint(&div, true, &mut cache), before);
        // a cleared cache observes the mutation
        cache.clear();
        assert_ne!(fingerprint(&div, true, &mut cache), before);
    }
}
