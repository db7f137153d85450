use super::{BoxedAdapter, Region, ScraperFactory};

pub mod apnews;
pub mod latimes;

pub use apnews::ApNewsScraper;
pub use latimes::LaTimesScraper;

pub const REGION: Region = Region {
    name: "us",
    emoji: "🇺🇸",
};

/// Returns factories for all available US publisher adapters
pub fn get_scraper_factories() -> Vec<ScraperFactory> {
    let mut factories: Vec<ScraperFactory> = Vec::new();
    factories.push(Box::new(|| Box::new(LaTimesScraper::new()) as BoxedAdapter));
    factories.push(Box::new(|| Box::new(ApNewsScraper::new()) as BoxedAdapter));
    factories
}
