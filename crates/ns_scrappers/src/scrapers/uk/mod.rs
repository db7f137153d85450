use super::{BoxedAdapter, Region, ScraperFactory};

pub mod reuters;

pub use reuters::ReutersScraper;

pub const REGION: Region = Region {
    name: "uk",
    emoji: "🇬🇧",
};

/// Returns factories for all available UK publisher adapters
pub fn get_scraper_factories() -> Vec<ScraperFactory> {
    let mut factories: Vec<ScraperFactory> = Vec::new();
    factories.push(Box::new(|| Box::new(ReutersScraper::new()) as BoxedAdapter));
    factories
}
