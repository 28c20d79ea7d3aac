//! Candidate subtree selection.
//!
//! Boilerplate discovery does not compare every subtree of every page; it
//! narrows the search to tags that plausibly represent reusable UI regions
//! (navigation, footers, menus, forms, layout containers). The rule list is
//! deliberately coarse and recall-oriented: false positives are cheap, since
//! a subtree only becomes boilerplate if it actually recurs across pages and
//! survives the near-duplicate safeguard.

use dom_query::{Document, NodeRef};

use crate::dom;

/// A tag-matching rule.
///
/// `Exact("div")` matches only `div`; `Contains("nav")` would match any tag
/// whose name includes `nav`, such as `nav` and `navigation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRule {
    /// Tag name equals the literal.
    Exact(&'static str),
    /// Tag name contains the literal.
    Contains(&'static str),
}

impl TagRule {
    /// Tests a lowercased tag name against this rule.
    #[must_use]
    pub fn matches(&self, tag: &str) -> bool {
        match self {
            Self::Exact(name) => tag == *name,
            Self::Contains(name) => tag.contains(name),
        }
    }
}

/// Tags identifying candidate subtrees.
pub const CANDIDATE_TAGS: &[TagRule] = &[
    TagRule::Exact("div"),
    TagRule::Exact("nav"),
    TagRule::Contains("form"),
    TagRule::Contains("navigation"),
    TagRule::Contains("footer"),
    TagRule::Contains("header"),
    TagRule::Contains("menu"),
    TagRule::Contains("top"),
    TagRule::Contains("bottom"),
    TagRule::Contains("left"),
    TagRule::Contains("right"),
];

/// Tests whether a tag name satisfies at least one candidate rule.
#[must_use]
pub fn is_candidate_tag(tag: &str) -> bool {
    CANDIDATE_TAGS.iter().any(|rule| rule.matches(tag))
}

/// Get all candidate nodes of the document, in document order.
///
/// These are the nodes whose fingerprints participate in pairwise matching
/// and, later, in removal.
#[must_use]
pub fn candidate_nodes(doc: &Document) -> Vec<NodeRef<'_>> {
    doc.select("*")
        .nodes()
        .iter()
        .filter(|node| is_candidate_tag(&dom::tag_name(node)))
        .cloned()
        .collect()
}
