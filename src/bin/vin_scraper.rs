//! Command-line vehicle history lookup.
//!
//! Looks up every VIN given with `-v`, prints the batch, and exits non-zero
//! if any VIN could not be completed.
//!
//! ```bash
//! vin-scraper -v 1HGCM82633A004352 --firefox /usr/bin/firefox --extension ./extension
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::instrument::WithSubscriber;
use tracing::{info, warn};

use vehicle_history_reports::logging::{self, LogLevel};
use vehicle_history_reports::output::{self, DEFAULT_RECORD_FILE};
use vehicle_history_reports::{Driver, ProxyConfig, ReportConfig, Reporter};

// ============================================================================
// CLI
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "vin-scraper",
    version,
    about = "Look up vehicle history reports by VIN"
)]
struct Cli {
    /// VINs to look up, in order
    #[arg(short = 'v', long = "vin-numbers", value_name = "VIN", num_args = 1.., required = true)]
    vin_numbers: Vec<String>,

    /// Show the browser window
    #[arg(long)]
    no_headless: bool,

    /// Print the records as Rust debug output instead of JSON
    #[arg(short = 'j', long)]
    no_json_output: bool,

    /// Proxy host
    #[arg(long, value_name = "HOST")]
    host: Option<String>,

    /// Proxy port
    #[arg(long, value_name = "PORT")]
    port: Option<u16>,

    /// Proxy username
    #[arg(long, value_name = "USER")]
    username: Option<String>,

    /// Proxy password
    #[arg(long, value_name = "PASSWORD")]
    password: Option<String>,

    /// Log level
    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    loglevel: LogLevel,

    /// Firefox binary
    #[arg(long, env = "FIREFOX_BINARY", value_name = "PATH")]
    firefox: PathBuf,

    /// Control extension (directory or .xpi)
    #[arg(long, env = "VIN_SCRAPER_EXTENSION", value_name = "PATH")]
    extension: PathBuf,

    /// Element wait timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 60)]
    timeout: u64,

    /// Disable image loading in the browser
    #[arg(long)]
    block_images: bool,

    /// Write the last completed record to FILE
    #[arg(
        long,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_RECORD_FILE
    )]
    save_record: Option<PathBuf>,
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let dispatch = logging::dispatch(cli.loglevel);

    match run(cli).with_subscriber(dispatch).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the batch. `Ok(false)` means some VIN did not complete.
async fn run(cli: Cli) -> Result<bool> {
    let proxy = ProxyConfig::from_parts(cli.host, cli.port, cli.username, cli.password)?;
    let config = ReportConfig::new()
        .with_headless(!cli.no_headless)
        .with_block_images(cli.block_images)
        .with_element_timeout(Duration::from_secs(cli.timeout))
        .with_proxy(proxy);

    let driver = Driver::builder()
        .binary(cli.firefox)
        .extension(cli.extension)
        .build()
        .context("Failed to configure Firefox")?;

    let report = Reporter::new(driver, config).run(&cli.vin_numbers).await;
    info!(
        completed = report.batch.len(),
        requested = cli.vin_numbers.len(),
        "Batch finished"
    );

    if cli.no_json_output {
        println!("{:#?}", report.batch);
    } else {
        println!("{}", output::batch_to_json(&report.batch)?);
    }

    if let Some(path) = cli.save_record {
        match report.batch.last() {
            Some(record) => output::write_record(record, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?,
            None => warn!(path = %path.display(), "No completed record to save"),
        }
    }

    if let Some(failure) = &report.failure {
        eprintln!("Error: {failure}");
    }
    Ok(report.is_complete())
}
