use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use textscout::{Config, Harvester};

/// Search DuckDuckGo, scrape the top results, and save cleaned text to
/// markdown. Refuses to defeat bot detection: a captcha aborts cleanly.
#[derive(Parser, Debug)]
#[command(name = "textscout", version, about)]
struct Args {
    /// Search query to use on DuckDuckGo.
    #[arg(default_value = "best console editor for linux")]
    query: String,

    /// Number of search results to scrape.
    #[arg(short, long, default_value_t = 3)]
    num_sites: usize,

    /// Maximum number of words to keep from each site.
    #[arg(short, long, default_value_t = 1000)]
    max_words: usize,

    /// Markdown file to write results to.
    #[arg(short, long, default_value = "output.md")]
    output: PathBuf,

    /// Append to the output file instead of overwriting.
    #[arg(long)]
    append: bool,

    /// Run the browser in headless mode (default is headed).
    #[arg(long)]
    headless: bool,

    /// Enable verbose output. By default only errors are reported.
    #[arg(long)]
    verbatim: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            query: args.query,
            num_sites: args.num_sites,
            max_words: args.max_words,
            output: args.output,
            append: args.append,
            headless: args.headless,
            verbose: args.verbatim,
        }
    }
}

fn init_tracing(verbose: bool) {
    // Errors, skips, and captcha notices always show; --verbatim adds the
    // progress diagnostics. RUST_LOG overrides both for debugging.
    let default_filter = if verbose {
        "textscout=info"
    } else {
        "textscout=warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbatim);

    let harvester = Harvester::new(Config::from(args));
    match harvester.run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            if e.is_captcha() {
                error!(
                    "The scraper was likely blocked by a captcha challenge. \
                     Exiting without attempting to solve it."
                );
            }
            ExitCode::FAILURE
        }
    }
}
