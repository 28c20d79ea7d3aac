//! Raw and parsed page models.
//!
//! `RawPage` is a crawled payload straight from the dataset; `ParsedPage`
//! owns the DOM tree plus the derived caches the fit phase lives on: the
//! candidate fingerprint set and the per-node fingerprint memo. Parsing
//! never fails outward: undecodable or empty payloads degrade to an empty
//! document with a logged warning, so one broken page cannot crash a
//! whole-domain run.

use std::collections::HashSet;

use dom_query::Document;
use tracing::warn;

use crate::dom;
use crate::encoding;
use crate::fingerprint::{fingerprint, FingerprintCache};
use crate::selector;
use crate::text;

/// Fallback document for pages that cannot be decoded.
const EMPTY_HTML: &str = "<html></html>";

/// Raw page content, either already-decoded text or crawler bytes.
#[derive(Debug, Clone)]
pub enum RawContent {
    /// UTF-8 text, used as-is.
    Text(String),
    /// Raw bytes, decoded with charset sniffing at parse time.
    Bytes(Vec<u8>),
}

impl From<String> for RawContent {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for RawContent {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<u8>> for RawContent {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

/// A crawled page with raw (string or binary) content.
#[derive(Debug, Clone)]
pub struct RawPage {
    /// URL the page was indexed under.
    pub url: String,
    /// Undecoded payload.
    pub content: RawContent,
}

impl RawPage {
    /// Creates a raw page from a URL and payload.
    pub fn new(url: impl Into<String>, content: impl Into<RawContent>) -> Self {
        Self {
            url: url.into(),
            content: content.into(),
        }
    }

    /// Parses the payload into a `ParsedPage`. Never fails.
    #[must_use]
    pub fn parse(self) -> ParsedPage {
        ParsedPage::new(self.url, self.content)
    }
}

/// A parsed page: one DOM tree plus the derived caches.
///
/// The candidate set holds the fingerprint of every candidate node at parse
/// time; it only accelerates the fit phase and is invalidated by any
/// mutation. The node-level fingerprint cache is keyed by the page-scoped
/// `NodeId` that `dom_query` assigns in document order at parse time.
pub struct ParsedPage {
    /// URL the page was indexed under.
    pub url: String,
    doc: Document,
    candidates: HashSet<String>,
    fp_cache: FingerprintCache,
}

impl ParsedPage {
    /// Parses `content` into a DOM and computes the candidate fingerprint
    /// set.
    ///
    /// Decoding failures are absorbed: a payload that cannot be decoded
    /// cleanly is replaced character-wise, and an empty payload becomes an
    /// empty document. Both cases log a warning.
    #[must_use]
    pub fn new(url: String, content: RawContent) -> Self {
        let html = match content {
            RawContent::Text(text) => text,
            RawContent::Bytes(bytes) => {
                let (text, had_errors) = encoding::decode_html(&bytes);
                if had_errors {
                    warn!(url = %url, "undecodable byte sequences replaced while decoding");
                }
                text
            }
        };
        let html = if html.trim().is_empty() {
            warn!(url = %url, "empty page content, falling back to an empty document");
            EMPTY_HTML.to_string()
        } else {
            html
        };

        let doc = Document::from(html);
        let mut fp_cache = FingerprintCache::new();
        let candidates = selector::candidate_nodes(&doc)
            .iter()
            .map(|node| fingerprint(node, true, &mut fp_cache))
            .collect();

        Self {
            url,
            doc,
            candidates,
            fp_cache,
        }
    }

    /// The candidate fingerprint set computed at parse time.
    ///
    /// Empty after `clear_cache` or any mutation.
    #[must_use]
    pub fn candidates(&self) -> &HashSet<String> {
        &self.candidates
    }

    /// The underlying DOM.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Clears the candidate set and, when `clear_node_cache` is set, the
    /// per-node fingerprint memo as well.
    ///
    /// The candidate set is only needed during fit, so it can always be
    /// dropped once both of the page's pairs have been matched. The node
    /// memo is kept in performance mode, where the same tree is reused
    /// unmutated by transform, and dropped in memory mode.
    pub fn clear_cache(&mut self, clear_node_cache: bool) {
        self.candidates = HashSet::new();
        if clear_node_cache {
            self.fp_cache = FingerprintCache::new();
        }
    }

    /// Removes every candidate node whose current fingerprint is in
    /// `boilerplate`, then invalidates both derived caches.
    ///
    /// Returns the number of nodes removed. Removing a node that was already
    /// detached (because an enclosing candidate was removed first) is a
    /// no-op in the tree; trailing text of removed nodes survives as sibling
    /// text nodes, so no content that followed a removed element is lost.
    pub fn remove_boilerplate(&mut self, boilerplate: &HashSet<String>) -> usize {
        let mut n_removed = 0;
        {
            let matched: Vec<_> = selector::candidate_nodes(&self.doc)
                .into_iter()
                .filter(|node| {
                    boilerplate.contains(&fingerprint(node, true, &mut self.fp_cache))
                })
                .collect();
            for node in &matched {
                dom::remove(node);
                n_removed += 1;
            }
        }
        // mutation invalidates everything derived from the tree
        self.candidates = HashSet::new();
        self.fp_cache = FingerprintCache::new();
        n_removed
    }

    /// Normalized body text. See [`text::extract_text`].
    #[must_use]
    pub fn extract_text(&self) -> String {
        text::extract_text(&self.doc)
    }

    /// Page title. See [`text::extract_title`].
    #[must_use]
    pub fn extract_title(&self) -> String {
        text::extract_title(&self.doc)
    }

    /// Heading text. See [`text::extract_headings`].
    #[must_use]
    pub fn extract_headings(&self) -> String {
        text::extract_headings(&self.doc)
    }

    /// List text. See [`text::extract_lists`].
    #[must_use]
    pub fn extract_lists(&self) -> String {
        text::extract_lists(&self.doc)
    }

    /// Breadcrumb trail. See [`text::extract_breadcrumbs`].
    #[must_use]
    pub fn extract_breadcrumbs(&self) -> String {
        text::extract_breadcrumbs(&self.doc)
    }

    /// Declared or detected language. See [`text::detect_language`].
    #[must_use]
    pub fn detect_language(&self, cleaned_text: &str) -> Option<String> {
        text::detect_language(&self.doc, cleaned_text)
    }

    /// Serialized HTML of the current (possibly cleaned) tree.
    #[must_use]
    pub fn html(&self) -> String {
        self.doc.html().to_string()
    }
}
