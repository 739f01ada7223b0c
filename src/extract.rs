//! Readable-text extraction and truncation.

use readability::extractor;
use scraper::Html;
use tracing::warn;
use url::Url;

/// Isolate the main article body from full page markup and flatten it to
/// plain text with newline-separated block boundaries.
///
/// Returns `None` when nothing usable remains — callers treat that as "no
/// content", not an error.
pub fn extract_main_text(html: &str, base_url: &Url) -> Option<String> {
    let product = match extractor::extract(&mut html.as_bytes(), base_url) {
        Ok(product) => product,
        Err(e) => {
            warn!("readability extraction failed: {}", e);
            return None;
        }
    };

    let text = flatten_fragment(&product.content);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Flatten an HTML fragment to its text nodes, one per line, each trimmed
/// and empty chunks dropped.
fn flatten_fragment(fragment_html: &str) -> String {
    let fragment = Html::parse_fragment(fragment_html);
    fragment
        .root_element()
        .text()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Hard word-count cap: split on whitespace, keep the first `max_words`
/// words rejoined with single spaces. No sentence awareness, no ellipsis.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return text.trim().to_string();
    }
    words[..max_words].join(" ").trim().to_string()
}
