use std::path::PathBuf;

use clap::Parser;
use ns_core::Result;
use ns_scrappers::{handle_command, init_logging, LoggingConfig, ScraperCommands, ScraperArgs};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Search news sites and export matching articles", long_about = None)]
pub struct Cli {
    /// Default log filter when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log file written alongside the console output
    #[arg(long, default_value = "output/news_scraper.log")]
    log_file: PathBuf,

    /// Log to the console only
    #[arg(long)]
    no_log_file: bool,

    #[command(subcommand)]
    command: ScraperCommands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: cli.log_level.clone(),
        file: (!cli.no_log_file).then(|| cli.log_file.clone()),
    };
    // dropping the guard flushes the log file
    let (logger, _guard) = init_logging(&logging)?;
    info!("🦗 ns {} starting", env!("CARGO_PKG_VERSION"));

    let args = ScraperArgs {
        command: cli.command,
    };
    if let Err(e) = handle_command(args, logger.clone()).await {
        logger.error(&format!("Run failed: {}", e));
        return Err(e);
    }
    Ok(())
}
