use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use ns_core::{MonthsValue, Result, RunParameters, WorkItem};
use ns_storage::OutputFormat;

use crate::config::RunConfig;
use crate::logging::Logger;
use crate::manager::{RunReport, ScraperManager};
use crate::retry::RetryPolicy;
use crate::webdriver::WebDriverFactory;

#[derive(Args, Debug, Clone)]
pub struct ScraperArgs {
    #[command(subcommand)]
    pub command: ScraperCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScraperCommands {
    /// Search a publisher and export the matching articles
    Run(RunArgs),
    /// List available scrapers
    List,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// The site to search in format region/name (e.g. us/latimes)
    #[arg(short, long, default_value = "us/latimes")]
    pub source: String,

    /// YAML work item with search_phrase, news_category and months
    #[arg(short, long)]
    pub params: Option<PathBuf>,

    /// Search phrase; overrides the work item
    #[arg(long)]
    pub phrase: Option<String>,

    /// News category to filter by; overrides the work item
    #[arg(long)]
    pub category: Option<String>,

    /// How many months back to keep articles; overrides the work item
    #[arg(long)]
    pub months: Option<String>,

    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Table file name, relative to the output directory unless absolute
    #[arg(long, default_value = "news_data.csv")]
    pub output_file: PathBuf,

    /// csv or json; guessed from the output file extension when omitted
    #[arg(long)]
    pub format: Option<OutputFormat>,

    #[arg(long, default_value = "http://localhost:4444")]
    pub webdriver_url: String,

    #[arg(long)]
    pub headless: bool,

    #[arg(long, default_value_t = 3)]
    pub retries: u32,

    #[arg(long, default_value_t = 5)]
    pub retry_delay_secs: u64,

    #[arg(long, default_value_t = 30)]
    pub page_timeout_secs: u64,

    #[arg(long, default_value_t = 10)]
    pub element_timeout_secs: u64,

    /// Stop after this many result pages
    #[arg(long)]
    pub max_pages: Option<u32>,
}

impl RunArgs {
    /// The work item file, if any, with command-line values layered on top.
    pub fn parameters(&self) -> Result<RunParameters> {
        let base = match &self.params {
            Some(path) => WorkItem::from_yaml_file(path)?,
            None => WorkItem::default(),
        };
        let overrides = WorkItem {
            search_phrase: self.phrase.clone(),
            news_category: self.category.clone(),
            months: self.months.clone().map(MonthsValue::Text),
        };
        base.merge(overrides).into_parameters()
    }

    pub fn run_config(&self) -> RunConfig {
        let defaults = RunConfig::default();
        RunConfig {
            webdriver_url: self.webdriver_url.clone(),
            headless: self.headless,
            output_dir: self.output_dir.clone(),
            output_file: self.output_file.clone(),
            format: self
                .format
                .or_else(|| OutputFormat::from_path(&self.output_file))
                .unwrap_or_default(),
            page_timeout: Duration::from_secs(self.page_timeout_secs),
            element_timeout: Duration::from_secs(self.element_timeout_secs),
            retry: RetryPolicy {
                retries: self.retries,
                delay: Duration::from_secs(self.retry_delay_secs),
            },
            max_pages: self.max_pages,
            ..defaults
        }
    }
}

pub async fn handle_command(args: ScraperArgs, logger: Logger) -> Result<()> {
    match args.command {
        ScraperCommands::Run(run) => {
            let params = run.parameters()?;
            let config = run.run_config();
            let sessions = WebDriverFactory::new(config.webdriver_url.clone(), config.headless, logger.clone());
            let manager = ScraperManager::new(Box::new(sessions), config, logger.clone());

            let report = manager.run(&run.source, &params).await?;
            print_report(&report);
        }
        ScraperCommands::List => {
            let sessions = WebDriverFactory::new(RunConfig::default().webdriver_url, false, logger.clone());
            let manager = ScraperManager::new(Box::new(sessions), RunConfig::default(), logger);
            println!("Available scrapers:");
            for line in manager.list_scrapers() {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    println!(
        "✨ {}: {} record(s) from {} page(s), {}",
        report.source, report.records, report.pages_visited, report.stop_reason
    );
    match &report.output {
        Some(path) => println!("💾 Saved to {}", path.display()),
        None => println!("Nothing was saved"),
    }
}
