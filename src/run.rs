//! Run orchestration: search once, scrape each result sequentially, persist.

use anyhow::Context;
use tracing::{info, warn};

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::error::HarvestError;
use crate::output::write_markdown;
use crate::scrape::scrape_page;
use crate::search::fetch_search_results;
use crate::types::{PageOutcome, RunResult, ScrapedPage};

pub struct Harvester {
    config: Config,
}

impl Harvester {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the full harvesting flow.
    ///
    /// The browser session is owned exclusively here and closed on every
    /// exit path: the inner flow's result is captured first, the session is
    /// closed, then the result is returned.
    pub async fn run(&self) -> Result<RunResult, HarvestError> {
        // Validated before any browser work begins.
        self.config.validate()?;

        let session = BrowserSession::launch(self.config.headless)
            .await
            .map_err(HarvestError::Other)?;

        let result = self.run_with_session(&session).await;
        session.close().await;
        result
    }

    async fn run_with_session(&self, session: &BrowserSession) -> Result<RunResult, HarvestError> {
        let page = session.page();
        let urls = fetch_search_results(page, &self.config.query, self.config.num_sites).await?;
        if urls.is_empty() {
            return Err(HarvestError::NoResults);
        }

        let mut run = RunResult::default();
        for url in urls {
            let outcome = match scrape_page(page, &url, self.config.max_words).await {
                Ok(text) => PageOutcome::Scraped(ScrapedPage { url, text }),
                Err(reason) => {
                    warn!("Skipping {}: {}", url, reason);
                    PageOutcome::Skipped { url, reason }
                }
            };
            run.record(outcome);
        }

        // Persistence is only reachable past this gate.
        let run = require_content(run)?;

        write_markdown(&self.config.output, &run.scraped, self.config.append)
            .with_context(|| format!("writing {}", self.config.output.display()))?;
        info!(
            "Saved {} entr(ies) to {}",
            run.scraped.len(),
            self.config.output.display()
        );

        if self.config.verbose && !run.skipped.is_empty() {
            info!(
                "Skipped {} URL(s) due to captcha or errors:",
                run.skipped.len()
            );
            for (url, reason) in &run.skipped {
                info!("  - {} ({})", url, reason);
            }
        }

        Ok(run)
    }
}

/// A run that scraped nothing is a failure; the output file must not be
/// touched for it.
fn require_content(run: RunResult) -> Result<RunResult, HarvestError> {
    if run.scraped.is_empty() {
        Err(HarvestError::NoContent)
    } else {
        Ok(run)
    }
}
