//! Heuristic detection of captcha / bot-challenge screens.
//!
//! Two independent signals: challenge phrases in the visible body text, and
//! structural markers of known captcha widgets. Either one is enough. A
//! driver error during a sub-check is logged and resolved to "no signal from
//! this check" — when every check fails to execute the page is conservatively
//! treated as not a captcha, so a flaky driver read cannot abort a scrape on
//! its own.

use chromiumoxide::Page;
use tracing::warn;

use crate::browser;
use crate::error::HarvestError;

pub const CAPTCHA_KEYWORDS: &[&str] = &[
    "are you human",
    "verify you are human",
    "unusual traffic",
    "complete the captcha",
    "please verify",
    "captcha",
    "robot check",
    "security check",
];

pub const CAPTCHA_SELECTORS: &[&str] = &[
    r#"[id*="captcha" i]"#,
    r#"[class*="captcha" i]"#,
    "div.g-recaptcha",
    "div.h-captcha",
    r#"iframe[src*="recaptcha" i]"#,
    r#"iframe[src*="hcaptcha" i]"#,
];

/// Substring scan of lower-cased page text for any challenge phrase.
pub fn text_looks_like_challenge(text: &str) -> bool {
    let lower = text.to_lowercase();
    CAPTCHA_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

pub async fn is_captcha_page(page: &Page) -> bool {
    match browser::body_text(page).await {
        Ok(text) => {
            if text_looks_like_challenge(&text) {
                return true;
            }
        }
        Err(e) => warn!("captcha check: body text unreadable, no signal: {}", e),
    }

    for selector in CAPTCHA_SELECTORS {
        match page.find_elements(*selector).await {
            Ok(els) if !els.is_empty() => return true,
            Ok(_) => {}
            Err(e) => warn!("captcha check: selector '{}' failed, no signal: {}", selector, e),
        }
    }

    false
}

/// Guard clause: fail with `CaptchaDetected` if the current page looks like
/// a challenge screen. `context` names where detection happened (the search
/// page or a specific article URL).
pub async fn ensure_not_captcha(page: &Page, context: &str) -> Result<(), HarvestError> {
    if is_captcha_page(page).await {
        return Err(HarvestError::captcha(context));
    }
    Ok(())
}
