use std::path::PathBuf;

use crate::error::HarvestError;

/// Immutable run parameters, resolved once at startup. Replaces any notion
/// of process-wide mutable state: every component that needs a knob receives
/// it explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub query: String,
    /// Number of organic search results to scrape. Must be > 0.
    pub num_sites: usize,
    /// Word cap applied to each page's extracted text. Must be > 0.
    pub max_words: usize,
    pub output: PathBuf,
    /// Append to the output file instead of overwriting it.
    pub append: bool,
    /// Run the browser headless (default is headed).
    pub headless: bool,
    /// Enable non-error diagnostic output.
    pub verbose: bool,
}

impl Config {
    /// Checked before any browser work begins.
    pub fn validate(&self) -> Result<(), HarvestError> {
        if self.num_sites == 0 {
            return Err(HarvestError::InvalidInput(
                "--num-sites must be greater than 0".into(),
            ));
        }
        if self.max_words == 0 {
            return Err(HarvestError::InvalidInput(
                "--max-words must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
