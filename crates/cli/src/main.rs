//! # holdings-advisor
//!
//! Reads a `code,name,count,purchasePrice` portfolio file, prices every
//! holding and prints profit/loss with simple advice.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use holdings_advisor_core::models::settings::Settings;
use holdings_advisor_core::services::enrichment_service::CancelToken;
use holdings_advisor_core::HoldingsAdvisor;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;

#[derive(Debug, Parser)]
#[command(name = "holdings-advisor", version, about)]
struct Cli {
    /// Portfolio file (header line, then code,name,count,purchasePrice rows)
    file: PathBuf,

    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Published spreadsheet CSV export with code,price rows (bulk pricing)
    #[arg(long, env = "HOLDINGS_SPREADSHEET_URL")]
    spreadsheet_url: Option<String>,

    /// Alpha Vantage API key (per-item pricing)
    #[arg(long, env = "ALPHAVANTAGE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Suffix appended to codes for quote lookups, e.g. ".T"
    #[arg(long)]
    symbol_suffix: Option<String>,

    /// Pause between per-item quote requests, in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Print the full analysis as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Settings file first, then command line / environment on top.
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading settings from {}", path.display()))?;
                Settings::from_json(&json)
                    .with_context(|| format!("parsing settings from {}", path.display()))?
            }
            None => Settings::default(),
        };

        if let Some(url) = &self.spreadsheet_url {
            settings.spreadsheet_url = Some(url.clone());
        }
        if let Some(key) = &self.api_key {
            settings
                .api_keys
                .insert("alphavantage".to_string(), key.clone());
        }
        if let Some(suffix) = &self.symbol_suffix {
            settings.symbol_suffix = Some(suffix.clone());
        }
        if let Some(ms) = self.interval_ms {
            settings.request_interval_ms = ms;
        }
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let advisor = HoldingsAdvisor::new(cli.settings()?)?;
    tracing::debug!("Using {:?}", advisor);

    let cancel = CancelToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current lookup");
            on_signal.cancel();
        }
    });

    let report = advisor
        .import_file(&cli.file, &cancel)
        .await
        .with_context(|| format!("importing {}", cli.file.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::render_report(&report));
    }
    Ok(())
}
