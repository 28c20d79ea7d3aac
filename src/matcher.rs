//! Pairwise shared-subtree matching.
//!
//! Two pages of the same domain share their boilerplate: the candidate
//! fingerprints present in both are the pair's vote for what is boilerplate.
//! The intersection-over-union safeguard catches near-duplicate pages:
//! without it, comparing two copies of the same template would flag the
//! entire page body as boilerplate and destroy real content.

use std::collections::HashSet;

use tracing::debug;

use crate::page::ParsedPage;

/// Result of matching one pair of pages.
#[derive(Debug, Clone)]
pub struct PairMatch {
    /// Candidate fingerprints present in both pages. Empty when the pair is
    /// too similar.
    pub shared: HashSet<String>,
    /// The pair's IOU reached the threshold and was excluded from
    /// identification.
    pub too_similar: bool,
}

/// Computes the fingerprints shared between a pair of parsed pages.
///
/// `iou = |shared| / max(|union|, 1)`; at or above `iou_threshold` the pair
/// is considered near-identical and contributes nothing.
#[must_use]
pub fn match_pair(primary: &ParsedPage, secondary: &ParsedPage, iou_threshold: f64) -> PairMatch {
    let shared: HashSet<String> = primary.candidates() & secondary.candidates();
    let n_union = primary.candidates().union(secondary.candidates()).count();
    let iou = shared.len() as f64 / n_union.max(1) as f64;

    if iou >= iou_threshold {
        debug!(
            iou,
            iou_threshold,
            primary = %primary.url,
            secondary = %secondary.url,
            "pair is near-duplicate, excluded from boilerplate identification"
        );
        return PairMatch {
            shared: HashSet::new(),
            too_similar: true,
        };
    }

    PairMatch {
        shared,
        too_similar: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::RawPage;

    fn page(url: &str, html: &str) -> ParsedPage {
        RawPage::new(url, html).parse()
    }

    #[test]
    fn shared_nav_is_found_between_disjoint_pages() {
        let nav = "<nav><a>Home</a><a>About</a></nav>";
        let a = page(
            "https://example.com/a",
            &format!("<html><body>{nav}<div>alpha only</div></body></html>"),
        );
        let b = page(
            "https://example.com/b",
            &format!("<html><body>{nav}<div>beta only</div></body></html>"),
        );

        let result = match_pair(&a, &b, 0.95);
        assert!(!result.too_similar);
        assert_eq!(result.shared.len(), 1);
    }

    #[test]
    fn identical_pages_are_flagged_too_similar() {
        let html = "<html><body><nav>Menu</nav><div>Same body</div></body></html>";
        let a = page("https://example.com/a", html);
        let b = page("https://example.com/b", html);

        let result = match_pair(&a, &b, 0.95);
        assert!(result.too_similar);
        assert!(result.shared.is_empty());
    }

    #[test]
    fn pages_with_no_candidates_are_not_too_similar() {
        let a = page("https://example.com/a", "<html><body><p>x</p></body></html>");
        let b = page("https://example.com/b", "<html><body><p>y</p></body></html>");

        // iou is 0/1, not 1.0: an empty union means nothing was shared
        let result = match_pair(&a, &b, 0.95);
        assert!(!result.too_similar);
        assert!(result.shared.is_empty());
    }
}
