//! Page-source collaborators.
//!
//! A dataset owns the raw crawled pages of one domain and exposes them by
//! URL. The pipeline only needs three things from it: a sorted, de-duplicated
//! URL list; random access from URL to raw content; and a record count.
//! Everything else (file formats, offset indexes) is the dataset's own
//! business.
//!
//! Datasets filter their records at index-build time: a record only
//! qualifies when its crawl status is a success (if tracked) and its
//! content-type is HTML (if tracked).

mod json;
mod list;

pub use json::JsonLinesDataset;
pub use list::ListDataset;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::page::RawPage;

/// One crawled record as stored in a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    /// Unique page URL, the record's identity.
    pub url: String,
    /// Raw HTML payload.
    pub content: String,
    /// HTTP status of the crawl, when tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Declared content type, when tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Which record fields are checked when building a dataset index.
///
/// Corpora that don't carry crawl metadata can switch the corresponding
/// check off; a switched-on check disqualifies records missing the field.
#[derive(Debug, Clone, Copy)]
pub struct Validity {
    /// Require a 2xx status.
    pub check_status: bool,
    /// Require a `text/html` content type.
    pub check_content_type: bool,
}

impl Default for Validity {
    fn default() -> Self {
        Self {
            check_status: true,
            check_content_type: true,
        }
    }
}

impl Validity {
    /// A validity that accepts every record.
    #[must_use]
    pub fn none() -> Self {
        Self {
            check_status: false,
            check_content_type: false,
        }
    }

    /// Tests a record against the enabled checks.
    #[must_use]
    pub fn is_valid(&self, record: &PageRecord) -> bool {
        let status_ok = !self.check_status
            || record.status.is_some_and(|status| (200..300).contains(&status));
        let content_type_ok = !self.check_content_type
            || record.content_type.as_deref() == Some("text/html");
        status_ok && content_type_ok
    }
}

/// A URL-addressable, enumerable source of raw pages.
pub trait Dataset {
    /// All indexed URLs, sorted and de-duplicated.
    fn urls(&self) -> Vec<String>;

    /// Random access from URL to raw content.
    ///
    /// # Errors
    ///
    /// `Error::UnknownUrl` when the URL is not in the index.
    fn get(&self, url: &str) -> Result<RawPage>;

    /// Number of indexed records.
    fn len(&self) -> usize;

    /// Whether the dataset holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adjacent pairs over the sorted URL list.
    ///
    /// These are the pairs compared during boilerplate identification; every
    /// page appears in at most two of them. Fewer than two URLs yield no
    /// pairs.
    fn pairs(&self) -> Vec<(String, String)> {
        let urls = self.urls();
        if urls.len() < 2 {
            return Vec::new();
        }
        urls.windows(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, status: Option<u16>, content_type: Option<&str>) -> PageRecord {
        PageRecord {
            url: url.to_string(),
            content: "<html></html>".to_string(),
            status,
            content_type: content_type.map(ToString::to_string),
        }
    }

    #[test]
    fn default_validity_requires_status_and_content_type() {
        let validity = Validity::default();
        assert!(validity.is_valid(&record("u", Some(200), Some("text/html"))));
        assert!(!validity.is_valid(&record("u", Some(404), Some("text/html"))));
        assert!(!validity.is_valid(&record("u", Some(200), Some("application/pdf"))));
        assert!(!validity.is_valid(&record("u", None, Some("text/html"))));
    }

    #[test]
    fn disabled_checks_accept_anything() {
        let validity = Validity::none();
        assert!(validity.is_valid(&record("u", Some(500), None)));
    }

    #[test]
    fn pairs_are_adjacent_over_sorted_urls() {
        let records = vec![
            record("https://x.com/c", Some(200), None),
            record("https://x.com/a", Some(200), None),
            record("https://x.com/b", Some(200), None),
        ];
        let dataset = ListDataset::new(
            records,
            Validity {
                check_status: true,
                check_content_type: false,
            },
        );
        assert_eq!(
            dataset.pairs(),
            vec![
                ("https://x.com/a".to_string(), "https://x.com/b".to_string()),
                ("https://x.com/b".to_string(), "https://x.com/c".to_string()),
            ]
        );
    }

    #[test]
    fn single_url_yields_no_pairs() {
        let dataset = ListDataset::new(vec![record("https://x.com/a", None, None)], Validity::none());
        assert!(dataset.pairs().is_empty());
    }
}
