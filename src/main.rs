//! fba-lookup - Find the first Fulfilled-by-Amazon offer for an ASIN
//!
//! Prints `identifier<TAB>price<TAB>condition` and exits 0 when an FBA offer
//! exists, exits 2 when the item does not exist and 3 when no offer is FBA.

use anyhow::Result;
use clap::Parser;
use fba_lookup::commands::LookupCommand;
use fba_lookup::config::{Config, OutputFormat};
use fba_lookup::format::Formatter;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Usage and configuration errors.
const EXIT_USAGE: u8 = 1;

#[derive(Parser)]
#[command(
    name = "fba-lookup",
    version,
    about = "Find the first Fulfilled-by-Amazon offer for an ASIN or ISBN",
    long_about = "Walks the Amazon offer listing for an ASIN (or ISBN-13) page by page and \
                  reports the first offer fulfilled by Amazon.\n\n\
                  Exit codes: 0 found, 1 usage error, 2 no such item, 3 no FBA listings, \
                  4 network failure, 5 unrecognized page structure."
)]
struct Cli {
    /// ASIN or ISBN (spaces and hyphens are ignored)
    asin: Option<String>,

    /// Marketplace base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Offer condition filter (all, new, used, collectible, refurbished)
    #[arg(long)]
    condition: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long)]
    proxy: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap's own exit code 2 would collide with "no such item"
            let _ = e.print();
            return if e.use_stderr() { ExitCode::from(EXIT_USAGE) } else { ExitCode::SUCCESS };
        }
    };

    let Some(asin) = cli.asin.clone() else {
        eprintln!("Missing ASIN. Please run: fba-lookup ASIN");
        return ExitCode::from(EXIT_USAGE);
    };

    // Initialize logging; stdout is reserved for the result line
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let formatter = Formatter::new(config.format);
    let cmd = LookupCommand::new(config);

    match cmd.execute(&asin).await {
        Ok(lookup) => {
            println!("{}", formatter.format_lookup(&lookup));
            ExitCode::from(lookup.exit_code())
        }
        Err(e) => {
            let code = e.exit_code();
            eprintln!("error: {:#}", anyhow::Error::from(e));
            ExitCode::from(code)
        }
    }
}

/// Loads config with layered overrides: file, environment, then CLI flags.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(condition) = &cli.condition {
        config.condition = condition.clone();
    }
    if let Some(proxy) = &cli.proxy {
        config.proxy = Some(proxy.clone());
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    Ok(config)
}
