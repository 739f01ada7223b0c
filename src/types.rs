use std::fmt;

/// One successfully harvested page: the result URL and its truncated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedPage {
    pub url: String,
    pub text: String,
}

/// Why a single URL produced no text. Informational only — nothing branches
/// on the reason after it is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Captcha,
    Timeout,
    NoContent,
    Driver(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Captcha => write!(f, "captcha or bot detection"),
            SkipReason::Timeout => write!(f, "navigation timed out"),
            SkipReason::NoContent => write!(f, "no readable content"),
            SkipReason::Driver(e) => write!(f, "navigation error: {}", e),
        }
    }
}

/// Tagged outcome of processing one result URL.
#[derive(Debug, Clone)]
pub enum PageOutcome {
    Scraped(ScrapedPage),
    Skipped { url: String, reason: SkipReason },
}

/// Aggregate of one run. Entries keep the order results were discovered in
/// the search listing; processing is strictly sequential.
#[derive(Debug, Default)]
pub struct RunResult {
    pub scraped: Vec<ScrapedPage>,
    pub skipped: Vec<(String, SkipReason)>,
}

impl RunResult {
    pub fn record(&mut self, outcome: PageOutcome) {
        match outcome {
            PageOutcome::Scraped(page) => self.scraped.push(page),
            PageOutcome::Skipped { url, reason } => self.skipped.push((url, reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_encounter_order() {
        let mut run = RunResult::default();
        run.record(PageOutcome::Scraped(ScrapedPage {
            url: "https://a.example".into(),
            text: "alpha".into(),
        }));
        run.record(PageOutcome::Skipped {
            url: "https://b.example".into(),
            reason: SkipReason::Timeout,
        });
        run.record(PageOutcome::Scraped(ScrapedPage {
            url: "https://c.example".into(),
            text: "gamma".into(),
        }));

        let urls: Vec<_> = run.scraped.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.example", "https://c.example"]);
        assert_eq!(run.skipped.len(), 1);
        assert_eq!(run.skipped[0].0, "https://b.example");
    }
}
