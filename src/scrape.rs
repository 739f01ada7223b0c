//! Single-article fetch with bounded retry.
//!
//! The fetch loop is an explicit state machine so every transition and its
//! trigger is visible: navigate, check for a challenge, pause, capture
//! markup, re-check. A timeout earns one retry behind the longer delay; a
//! detected challenge is durable for the URL and skips immediately; any
//! other driver error is logged and skipped. No failure here can abort the
//! run — the worst outcome for a URL is a skip.

use chromiumoxide::Page;
use tracing::{info, warn};
use url::Url;

use crate::browser::{self, NavError};
use crate::captcha::is_captcha_page;
use crate::delay::DelayPolicy;
use crate::extract::{extract_main_text, truncate_words};
use crate::types::SkipReason;

const MAX_ATTEMPTS: u8 = 2;

#[derive(Debug, PartialEq)]
enum FetchState {
    Navigating { attempt: u8 },
    Retrying { next_attempt: u8 },
    Succeeded { html: String },
    Skipped(SkipReason),
}

/// Transition for a navigation or capture timeout. Earns a retry until the
/// attempt budget is spent; after that the URL is skipped, as a captcha when
/// one was what stalled the load.
fn on_timeout(attempt: u8, captcha_seen: bool) -> FetchState {
    if attempt < MAX_ATTEMPTS {
        FetchState::Retrying {
            next_attempt: attempt + 1,
        }
    } else if captcha_seen {
        FetchState::Skipped(SkipReason::Captcha)
    } else {
        FetchState::Skipped(SkipReason::Timeout)
    }
}

/// Transition for any other driver failure: skip immediately, preferring
/// the captcha reason when a challenge is on screen.
fn on_driver_error(captcha_seen: bool, error: String) -> FetchState {
    if captcha_seen {
        FetchState::Skipped(SkipReason::Captcha)
    } else {
        FetchState::Skipped(SkipReason::Driver(error))
    }
}

/// Navigate to an article URL, extract readable text, and truncate it to
/// `max_words`. `Err` is the per-URL skip signal, never a run failure.
pub async fn scrape_page(page: &Page, url: &str, max_words: usize) -> Result<String, SkipReason> {
    info!("Opening {}", url);

    let mut state = FetchState::Navigating { attempt: 1 };
    let html = loop {
        state = match state {
            FetchState::Navigating { attempt } => attempt_fetch(page, url, attempt).await,
            FetchState::Retrying { next_attempt } => {
                DelayPolicy::retry().pause().await;
                FetchState::Navigating {
                    attempt: next_attempt,
                }
            }
            FetchState::Succeeded { html } => break html,
            FetchState::Skipped(reason) => return Err(reason),
        };
    };

    if html.trim().is_empty() {
        info!("No HTML captured from {}; skipping.", url);
        return Err(SkipReason::NoContent);
    }

    let base = match Url::parse(url) {
        Ok(base) => base,
        Err(e) => {
            warn!("Unparseable result URL {}: {}", url, e);
            return Err(SkipReason::Driver(e.to_string()));
        }
    };

    let Some(text) = extract_main_text(&html, &base) else {
        info!("Could not extract readable content from {}", url);
        return Err(SkipReason::NoContent);
    };

    Ok(truncate_words(&text, max_words))
}

/// One full attempt: navigate → challenge check → pause → capture →
/// challenge re-check (screens may render asynchronously after load).
async fn attempt_fetch(page: &Page, url: &str, attempt: u8) -> FetchState {
    match browser::navigate(page, url).await {
        Ok(()) => {}
        Err(NavError::Timeout(_)) => return after_timeout(page, attempt).await,
        Err(NavError::Driver(e)) => return after_driver_error(page, url, e).await,
    }

    if is_captcha_page(page).await {
        return FetchState::Skipped(SkipReason::Captcha);
    }

    DelayPolicy::routine().pause().await;

    let html = match browser::page_content(page).await {
        Ok(html) => html,
        Err(NavError::Timeout(_)) => return after_timeout(page, attempt).await,
        Err(NavError::Driver(e)) => return after_driver_error(page, url, e).await,
    };

    if is_captcha_page(page).await {
        return FetchState::Skipped(SkipReason::Captcha);
    }

    FetchState::Succeeded { html }
}

async fn after_timeout(page: &Page, attempt: u8) -> FetchState {
    // The challenge check only matters once the attempt budget is spent.
    let captcha_seen = if attempt < MAX_ATTEMPTS {
        false
    } else {
        is_captcha_page(page).await
    };
    on_timeout(attempt, captcha_seen)
}

async fn after_driver_error(page: &Page, url: &str, error: String) -> FetchState {
    let captcha_seen = is_captcha_page(page).await;
    if !captcha_seen {
        warn!("Failed to load {}: {}", url, error);
    }
    on_driver_error(captcha_seen, error)
}
