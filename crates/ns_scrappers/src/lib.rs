pub mod cli;
pub mod config;
pub mod extract;
pub mod images;
pub mod logging;
pub mod manager;
pub mod pagination;
pub mod retry;
pub mod scrapers;
pub mod screenshots;
pub mod webdriver;

#[cfg(test)]
pub(crate) mod test_utils;

pub use cli::{handle_command, RunArgs, ScraperArgs, ScraperCommands};
pub use config::RunConfig;
pub use logging::{init_logging, Logger, LoggingConfig};
pub use manager::{RunReport, ScraperManager};
pub use pagination::{PaginationOutcome, StopReason};
pub use scrapers::SiteAdapter;

pub mod prelude {
    pub use super::scrapers::{SiteAdapter, SourceMetadata};
    pub use super::{RunConfig, RunReport, ScraperManager};
    pub use ns_core::{ArticleRecord, Error, Result, RunParameters};
}
