pub mod browser;
pub mod captcha;
pub mod config;
pub mod delay;
pub mod error;
pub mod extract;
pub mod output;
pub mod run;
pub mod scrape;
pub mod search;
pub mod types;

pub use config::Config;
pub use error::HarvestError;
pub use run::Harvester;
pub use types::{PageOutcome, RunResult, ScrapedPage, SkipReason};
