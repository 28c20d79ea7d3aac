//! Text and metadata extraction from a parsed page.
//!
//! All extraction here is deterministic text assembly from the DOM: body
//! text with block/inline-aware line breaks, title, headings, lists,
//! breadcrumbs, and language. Entity decoding already happened inside the
//! HTML parser, so normalization only needs to handle Unicode forms and
//! whitespace.

use std::sync::LazyLock;

use dom_query::{Document, NodeRef};
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::dom;

/// When extracting text, line breaks are NOT inserted around these tags.
const INLINE_ELEMENTS: &[&str] = &[
    "a", "span", "em", "strong", "u", "i", "font", "mark", "label", "s", "sub", "sup", "tt",
    "bdo", "button", "cite", "del", "b",
];

/// No text is extracted from these subtrees.
const BLACKLIST_TAGS: &[&str] = &["script", "style", "noscript", "button", "form"];

/// Marker prefixed to `<li>` items in extracted text:
///
/// ```text
/// This is a list
/// * item 1
/// * item 2
/// ```
const LIST_INDICATOR: &str = "* ";

/// Breadcrumb containers larger than this are assumed to be mistakenly
/// matched page-level wrappers and are discarded.
const MAX_BREADCRUMBS_LEN: usize = 200;

#[allow(clippy::expect_used)]
static NEWLINE_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n +").expect("valid regex"));

#[allow(clippy::expect_used)]
static MULTI_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").expect("valid regex"));

#[allow(clippy::expect_used)]
static MULTI_NEWLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Normalizes extracted text: NFKC, whitespace collapse, per-line trim,
/// blank lines dropped.
#[must_use]
pub fn normalize(text: &str) -> String {
    let text: String = text.nfkc().collect();
    let text = text.replace('\t', " ");
    let text = NEWLINE_SPACE_RE.replace_all(&text, "\n");
    let text = MULTI_SPACE_RE.replace_all(&text, " ");
    let text = MULTI_NEWLINE_RE.replace_all(&text, "\n\n");
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    lines.join("\n")
}

/// Assembles the raw block text of a subtree into `out`.
///
/// Depth-first over element children: blacklisted subtrees are skipped
/// entirely (their tails included), block-level tags get a line break before
/// and after, `<br>` emits a newline, and `<li>` text is prefixed with the
/// list marker. The subtree root's own leading text is not emitted; it
/// belongs to the enclosing context.
fn extract_block_text(node: &NodeRef, out: &mut String) {
    for child in dom::element_children(node) {
        let tag = dom::tag_name(&child);
        if BLACKLIST_TAGS.contains(&tag.as_str()) {
            continue;
        }

        let is_block = !INLINE_ELEMENTS.contains(&tag.as_str());
        if is_block {
            out.push('\n');
        }
        if tag == "li" {
            out.push_str(LIST_INDICATOR);
        }

        let text = dom::leading_text(&child);
        if !text.trim().is_empty() {
            out.push_str(&text);
        }

        if tag == "br" {
            out.push('\n');
        } else {
            extract_block_text(&child, out);
        }

        let tail = dom::tail_text(&child);
        if !tail.trim().is_empty() {
            out.push_str(&tail);
        }

        if is_block {
            out.push('\n');
        }
    }
}

/// Extracts the normalized body text of the document.
///
/// Returns an empty string when the document has no `<body>`.
#[must_use]
pub fn extract_text(doc: &Document) -> String {
    let body = doc.select("body");
    let Some(node) = body.nodes().first() else {
        return String::new();
    };
    let mut raw = String::new();
    extract_block_text(node, &mut raw);
    normalize(&raw)
}

/// Extracts the text of the first `<title>` element, or empty.
#[must_use]
pub fn extract_title(doc: &Document) -> String {
    let title = doc.select("title");
    let Some(node) = title.nodes().first() else {
        return String::new();
    };
    normalize(&dom::leading_text(node))
}

/// Extracts the direct text of every `h1..h6`, newline-joined.
#[must_use]
pub fn extract_headings(doc: &Document) -> String {
    let headings: Vec<String> = doc
        .select("h1, h2, h3, h4, h5, h6")
        .nodes()
        .iter()
        .filter_map(|node| {
            let text = dom::leading_text(node);
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .collect();
    normalize(&headings.join("\n"))
}

/// Extracts the block text of every `<ul>`/`<ol>`, concatenated.
#[must_use]
pub fn extract_lists(doc: &Document) -> String {
    let lists: Vec<String> = doc
        .select("ul, ol")
        .nodes()
        .iter()
        .map(|node| {
            let mut raw = String::new();
            extract_block_text(node, &mut raw);
            raw.trim().to_string()
        })
        .collect();
    normalize(&lists.join("\n\n"))
}

/// Extracts breadcrumb text, or empty when no plausible container exists.
///
/// Tries the attribute-value patterns in order from most to least
/// restrictive; the first pattern that matches any non-body element wins.
/// Among that pattern's matches, the longest extracted text within the
/// length ceiling is returned; multiple hits usually mean nested wrappers,
/// and the longest one under the cap is the most complete trail.
#[must_use]
pub fn extract_breadcrumbs(doc: &Document) -> String {
    for pattern in ["breadcrumbs", "breadcrumb", "crumb"] {
        let elements: Vec<NodeRef> = doc
            .select("*")
            .nodes()
            .iter()
            .filter(|node| {
                dom::tag_name(node) != "body" && has_attr_value_containing(node, pattern)
            })
            .cloned()
            .collect();

        if elements.is_empty() {
            continue;
        }

        return elements
            .iter()
            .map(|node| {
                let mut raw = String::new();
                extract_block_text(node, &mut raw);
                raw.trim().to_string()
            })
            .filter(|text| text.chars().count() <= MAX_BREADCRUMBS_LEN)
            .max_by_key(|text| text.chars().count())
            .unwrap_or_default();
    }
    String::new()
}

/// Tests whether any attribute value of the node contains `pattern`.
fn has_attr_value_containing(node: &NodeRef, pattern: &str) -> bool {
    node.attrs().iter().any(|attr| attr.value.contains(pattern))
}

/// Gets the document's declared language: the `lang` attribute of the root
/// `<html>` element, lowercased.
#[must_use]
pub fn declared_language(doc: &Document) -> Option<String> {
    doc.select("html")
        .attr("lang")
        .map(|lang| lang.to_lowercase())
        .filter(|lang| !lang.is_empty())
}

/// Determines the page language.
///
/// Prefers the declared document language; when absent and the extracted
/// text is non-empty, falls back to statistical detection and reports the
/// ISO 639-1 code (639-3 when no two-letter code exists). Returns `None`
/// for pages with no text.
#[must_use]
pub fn detect_language(doc: &Document, cleaned_text: &str) -> Option<String> {
    if cleaned_text.is_empty() {
        return None;
    }
    if let Some(lang) = declared_language(doc) {
        return Some(lang);
    }
    whatlang::detect(cleaned_text).map(|info| {
        let code = info.lang().code();
        isolang::Language::from_639_3(code)
            .and_then(|lang| lang.to_639_1())
            .map_or_else(|| code.to_string(), ToString::to_string)
    })
}
