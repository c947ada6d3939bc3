//! Element text extraction.

use scraper::{Html, Selector};
use tracing::debug;

use crate::core::PageStream;
use crate::errors::ExtractError;

/// Pulls the text of the first element matching a CSS selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementExtractor {
    selector: String,
}

impl ElementExtractor {
    /// Creates an extractor for `selector`.
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }

    /// The selector this extractor looks for.
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Consumes `page` and returns the matched element's text.
    ///
    /// The stream is released before this returns, on every path.
    pub async fn extract(&self, page: PageStream) -> Result<String, ExtractError> {
        let url = page.url().to_string();
        let body = page.read_to_end().await.map_err(ExtractError::parse)?;
        debug!(%url, bytes = body.len(), "page body read");

        let html = String::from_utf8_lossy(&body);
        extract_text(&html, &self.selector)
    }
}

/// Returns the concatenated text of the first element matching `selector`.
///
/// Text nodes are joined as they appear, with no trimming.
pub fn extract_text(html: &str, selector: &str) -> Result<String, ExtractError> {
    let compiled = Selector::parse(selector)
        .map_err(|e| ExtractError::invalid_selector(selector, e.to_string()))?;

    let document = Html::parse_document(html);
    document
        .select(&compiled)
        .next()
        .map(|element| element.text().collect::<String>())
        .ok_or_else(|| ExtractError::not_found(selector))
}
