//! Mostratize ledger CLI
//!
//! Replays a JSON journal of ledger commands against an in-memory ledger and
//! prints the resulting sub-balances.

mod journal;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use mostratize_app::{InMemoryRates, InMemoryStore, LedgerService};
use mostratize_core::currency::CurrencyCode;
use mostratize_shared::AppConfig;

use crate::journal::{Journal, Replayer};

#[derive(Parser, Debug)]
#[command(name = "mostratize", version, about = "Replay a ledger journal and print balances")]
struct Cli {
    /// Journal file (JSON).
    #[arg(short = 'j', long = "journal")]
    journal: PathBuf,

    /// Base currency, overriding the configured one.
    #[arg(long = "base-currency")]
    base_currency: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long = "json-logs")]
    json_logs: bool,
}

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    init_tracing(&config.logging.filter, cli.json_logs || config.logging.json);

    let base_currency = CurrencyCode::parse(
        cli.base_currency
            .as_deref()
            .unwrap_or(&config.ledger.base_currency),
    )?;
    info!(%base_currency, journal = %cli.journal.display(), "Replaying journal");

    let store = Arc::new(InMemoryStore::new());
    let rates = Arc::new(InMemoryRates::new());
    let service = LedgerService::new(store, rates.clone(), base_currency);

    let journal = Journal::from_path(&cli.journal)?;
    let mut replayer = Replayer::new(service, rates);
    replayer.replay(journal)?;

    for line in replayer.balances()? {
        let status = if line.active { "" } else { " (inactive)" };
        println!("{:<24} {} {:>16}{status}", line.alias, line.currency, line.balance);
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only the balances.
fn init_tracing(default_filter: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}
