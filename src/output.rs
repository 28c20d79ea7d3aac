//! Output record produced for each transformed page.

use serde::{Deserialize, Serialize};

/// Everything extracted from one page.
///
/// `text` reflects the page before boilerplate removal, `cleaned_text`
/// after; the difference is the noise the pipeline stripped. Title and
/// breadcrumbs also come from the pre-removal tree, since boilerplate
/// removal may take the containers they live in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPage {
    /// URL the page was indexed under.
    pub url: String,

    /// Body text of the original page.
    pub text: String,

    /// Body text after boilerplate removal.
    pub cleaned_text: String,

    /// Text of the first `<title>` element (pre-removal tree).
    pub title: String,

    /// `h1..h6` text, newline-joined (post-removal tree).
    pub headings: String,

    /// `<ul>`/`<ol>` text with `* ` item markers (post-removal tree).
    pub lists: String,

    /// Breadcrumb trail text (pre-removal tree), empty when none was found.
    pub breadcrumbs: String,

    /// Declared or detected page language, lowercased.
    pub language: Option<String>,

    /// Serialized HTML of the cleaned page, when requested.
    pub cleaned_html: Option<String>,
}
