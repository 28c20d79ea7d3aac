//! Domain-level HTML boilerplate removal.
//!
//! Pages of the same website repeat their navigation, headers, footers and
//! cookie banners on every page. This crate identifies those repeated
//! subtrees by comparing structural fingerprints across pages of one
//! domain, strips them, and extracts the remaining content (text, title,
//! headings, lists, breadcrumbs, language).
//!
//! The pipeline has two phases over a [`Dataset`]: [`Deboiler::fit`]
//! learns the boilerplate fingerprints, [`Deboiler::transform`] streams
//! each page back out cleaned.
//!
//! ```
//! use rs_deboiler::{Dataset, Deboiler, Options, PageRecord, ListDataset, Validity};
//!
//! let nav = r#"<nav><a href="/">Home</a><a href="/about">About</a></nav>"#;
//! let records = vec![
//!     PageRecord {
//!         url: "https://example.com/a".to_string(),
//!         content: format!("<html><body>{nav}<div>First article</div></body></html>"),
//!         status: None,
//!         content_type: None,
//!     },
//!     PageRecord {
//!         url: "https://example.com/b".to_string(),
//!         content: format!("<html><body>{nav}<div>Second article</div></body></html>"),
//!         status: None,
//!         content_type: None,
//!     },
//! ];
//! let dataset = ListDataset::new(records, Validity::none());
//!
//! let mut deboiler = Deboiler::new(Options::default())?;
//! deboiler.fit(&dataset)?;
//! assert_eq!(deboiler.boilerplate().len(), 1);
//!
//! for output in deboiler.transform(&dataset, false)? {
//!     let page = output?;
//!     assert!(!page.cleaned_text.contains("Home"));
//!     assert!(page.cleaned_text.contains("article"));
//! }
//! # Ok::<(), rs_deboiler::Error>(())
//! ```

pub mod dataset;
mod deboiler;
pub mod dom;
pub mod encoding;
mod error;
pub mod fingerprint;
pub mod matcher;
pub mod memo;
mod options;
mod output;
pub mod page;
pub mod selector;
pub mod text;

pub use dataset::{Dataset, JsonLinesDataset, ListDataset, PageRecord, Validity};
pub use deboiler::{transform_page, Deboiler, TransformIter};
pub use error::{Error, Result};
pub use options::{OperationMode, Options};
pub use output::OutputPage;
pub use page::{ParsedPage, RawContent, RawPage};
