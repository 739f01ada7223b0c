use thiserror::Error;

/// Run-level failures. Per-URL problems never surface here — the page
/// scraper absorbs them as skips (see `types::SkipReason`).
#[derive(Debug, Error)]
pub enum HarvestError {
    /// A captcha or bot-detection screen blocked automation. Fatal for the
    /// whole run when raised during the search phase.
    #[error("captcha (or bot detection) encountered on {context}")]
    CaptchaDetected { context: String },

    #[error("no results were found on the DuckDuckGo page")]
    NoResults,

    #[error("no content could be scraped from the selected sites")]
    NoContent,

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HarvestError {
    pub fn captcha(context: impl Into<String>) -> Self {
        HarvestError::CaptchaDetected {
            context: context.into(),
        }
    }

    pub fn is_captcha(&self) -> bool {
        matches!(self, HarvestError::CaptchaDetected { .. })
    }
}
