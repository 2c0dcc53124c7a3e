use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use zimmerangebote::config::AppConfig;
use zimmerangebote::orchestrator;
use zimmerangebote::report::ScrapeOutcome;
use zimmerangebote::scrapers::{LinsbergScraper, OfferScraper};

/// Scrape room offers for a short-term and an early-booking one-night stay
#[derive(Debug, Parser)]
#[command(name = "zimmerangebote", version, about)]
struct Cli {
    /// TOML file overriding the built-in settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for the report
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if cli.headed {
        config.browser.headless = false;
    }
    let config = Arc::new(config);

    let scraper: Arc<dyn OfferScraper> = Arc::new(LinsbergScraper::new(Arc::clone(&config)));
    let today = Local::now().date_naive();
    info!(
        "Scraping {} offers requested on {}",
        scraper.source_name(),
        today
    );

    let outcome = orchestrator::scrape_horizons(
        scraper,
        config.horizons.short_term(),
        config.horizons.early_booking(),
        today,
        config.workers,
    )
    .await?;

    match outcome {
        ScrapeOutcome::Offers(table) => {
            info!("Writing {} rows", table.len());
            let delimiter = u8::try_from(config.report.delimiter)
                .context("Report delimiter must be a single-byte character")?;
            table.write_delimited(std::io::stdout().lock(), delimiter)?;
        }
        ScrapeOutcome::NothingFound => {
            warn!("Nothing found for either horizon");
        }
    }

    Ok(())
}
