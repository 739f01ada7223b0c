//! DuckDuckGo search resolution.
//!
//! Two-tier strategy: the standard search page is richer but more
//! bot-defended, so on timeout or a detected challenge we degrade to the
//! lightweight HTML-only endpoint instead of attempting any evasion. A
//! captcha that survives both tiers aborts the whole run — without search
//! results there is nothing left to scrape.

use chromiumoxide::{Element, Page};
use tracing::{info, warn};
use url::Url;

use crate::browser::{self, NavError};
use crate::captcha::{ensure_not_captcha, is_captcha_page};
use crate::delay::DelayPolicy;
use crate::error::HarvestError;

const SEARCH_ENDPOINT: &str = "https://duckduckgo.com/";
const HTML_SEARCH_ENDPOINT: &str = "https://duckduckgo.com/html/";
const SEARCH_DOMAIN: &str = "duckduckgo.com";

/// Organic result links on the standard search page.
const RESULT_LINK_SELECTOR: &str = r#"a[data-testid="result-title-a"]"#;
/// How long to wait for result links to render after domcontentloaded.
const RESULT_WAIT_MS: u64 = 5_000;

/// What the primary search tier produced. `Timeout` and `Captcha` trigger
/// the HTML fallback; anything else has already succeeded or failed hard.
enum PrimaryOutcome {
    Links(Vec<Element>),
    Timeout,
    Captcha,
}

fn search_url(endpoint: &str, query: &str) -> Result<String, HarvestError> {
    let url = Url::parse_with_params(endpoint, &[("q", query)])
        .map_err(|e| HarvestError::Other(anyhow::anyhow!("bad search URL: {}", e)))?;
    Ok(url.into())
}

/// An href qualifies as an organic result only when it is absolute and does
/// not point back at the search engine itself.
pub fn is_external_result(href: &str) -> bool {
    !href.starts_with('/') && !href.contains(SEARCH_DOMAIN)
}

/// Walk hrefs in document order, keeping qualifying ones until `limit` is
/// reached. `None` entries are elements whose href could not be read.
pub fn select_result_urls<I>(hrefs: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    let mut results = Vec::new();
    for href in hrefs {
        if results.len() >= limit {
            break;
        }
        let Some(href) = href else { continue };
        if href.is_empty() || !is_external_result(&href) {
            continue;
        }
        results.push(href);
    }
    results
}

/// Run the DuckDuckGo query and return absolute URLs for the top results,
/// at most `num_sites` of them, in listing order.
///
/// An empty return is not an error here; the caller decides how to proceed.
pub async fn fetch_search_results(
    page: &Page,
    query: &str,
    num_sites: usize,
) -> Result<Vec<String>, HarvestError> {
    info!("Searching DuckDuckGo for: {}", query);

    let elements = match primary_search(page, query).await? {
        PrimaryOutcome::Links(elements) => elements,
        PrimaryOutcome::Timeout => {
            info!("Primary search timed out, trying HTML endpoint");
            fallback_search(page, query).await?
        }
        PrimaryOutcome::Captcha => {
            info!("Primary search looks bot-challenged, trying HTML endpoint");
            fallback_search(page, query).await?
        }
    };

    let mut hrefs = Vec::with_capacity(elements.len());
    for element in &elements {
        match element.attribute("href").await {
            Ok(href) => hrefs.push(href),
            Err(e) => {
                warn!("could not read href from result link: {}", e);
                hrefs.push(None);
            }
        }
    }

    let results = select_result_urls(hrefs, num_sites);
    if results.is_empty() {
        warn!("No results were found on the DuckDuckGo page.");
    } else {
        info!("Found {} result(s).", results.len());
    }
    Ok(results)
}

/// The standard search page: navigate, check for a challenge immediately
/// (bot-detection screens on this engine often render before any further
/// interaction), then wait for the result-link marker.
async fn primary_search(page: &Page, query: &str) -> Result<PrimaryOutcome, HarvestError> {
    let url = search_url(SEARCH_ENDPOINT, query)?;

    match browser::navigate(page, &url).await {
        Ok(()) => {}
        Err(NavError::Timeout(_)) => return Ok(PrimaryOutcome::Timeout),
        Err(NavError::Driver(e)) => return Err(HarvestError::Other(anyhow::anyhow!(e))),
    }

    if is_captcha_page(page).await {
        return Ok(PrimaryOutcome::Captcha);
    }
    DelayPolicy::routine().pause().await;

    match browser::wait_for_elements(page, RESULT_LINK_SELECTOR, RESULT_WAIT_MS).await {
        Ok(elements) => Ok(PrimaryOutcome::Links(elements)),
        Err(_) => Ok(PrimaryOutcome::Timeout),
    }
}

/// The HTML-only endpoint: simpler markup, lower likelihood of triggering
/// bot defenses, but no specialized result marker — generic anchors only.
/// Any failure here is the run's hard stop.
async fn fallback_search(page: &Page, query: &str) -> Result<Vec<Element>, HarvestError> {
    let url = search_url(HTML_SEARCH_ENDPOINT, query)?;

    let blocked = |detail: String| {
        HarvestError::captcha(format!(
            "DuckDuckGo search page (timed out waiting for results or blocked: {})",
            detail
        ))
    };

    browser::navigate(page, &url)
        .await
        .map_err(|e| blocked(e.to_string()))?;
    ensure_not_captcha(page, "DuckDuckGo HTML search page").await?;
    DelayPolicy::routine().pause().await;

    page.find_elements("a")
        .await
        .map_err(|e| blocked(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_and_internal_links_are_rejected() {
        assert!(!is_external_result("/html/?q=test"));
        assert!(!is_external_result("/settings"));
        assert!(!is_external_result("https://duckduckgo.com/about"));
        assert!(!is_external_result(
            "https://duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com"
        ));
        assert!(is_external_result("https://example.com/article"));
        assert!(is_external_result("http://blog.example.org/post/1"));
    }

    #[test]
    fn selects_externals_in_order_up_to_limit() {
        // 5 anchors, 2 external: both come back, in listing order.
        let hrefs = vec![
            Some("/first-internal".to_string()),
            Some("https://one.example/a".to_string()),
            Some("https://duckduckgo.com/assets".to_string()),
            None,
            Some("https://two.example/b".to_string()),
        ];
        let urls = select_result_urls(hrefs, 2);
        assert_eq!(urls, vec!["https://one.example/a", "https://two.example/b"]);
    }

    #[test]
    fn limit_bounds_the_result_count() {
        let hrefs = (0..10).map(|i| Some(format!("https://site{}.example/", i)));
        let urls = select_result_urls(hrefs, 3);
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[0], "https://site0.example/");
    }

    #[test]
    fn empty_and_missing_hrefs_are_skipped() {
        let hrefs = vec![None, Some(String::new()), Some("https://ok.example/".into())];
        assert_eq!(select_result_urls(hrefs, 5), vec!["https://ok.example/"]);
    }

    #[test]
    fn query_is_percent_encoded() {
        let url = search_url(SEARCH_ENDPOINT, "best console editor for linux").unwrap();
        assert_eq!(
            url,
            "https://duckduckgo.com/?q=best+console+editor+for+linux"
        );
        let url = search_url(HTML_SEARCH_ENDPOINT, "a&b=c").unwrap();
        assert!(url.starts_with("https://duckduckgo.com/html/?q="));
        assert!(!url.contains("&b=c"));
    }
}
