use ns_core::dates::DateFormat;
use ns_core::Locator;

use super::REGION;
use crate::scrapers::utils::xpath_literal;
use crate::scrapers::{CardLocators, SiteAdapter, SourceMetadata};

const RESULTS: &str = "ul.search-results-module-results-menu li";

#[derive(Debug, Clone, Default)]
pub struct LaTimesScraper;

impl LaTimesScraper {
    pub fn new() -> Self {
        Self
    }

    const BASE_URL: &'static str = "https://www.latimes.com/";
}

impl SiteAdapter for LaTimesScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "Los Angeles Times",
            emoji: "🌴",
            region: REGION,
        }
    }

    fn base_url(&self) -> &str {
        Self::BASE_URL
    }

    fn cli_names(&self) -> Vec<&str> {
        vec!["latimes", "lat"]
    }

    fn locate_search_trigger(&self) -> Option<Locator> {
        Some(Locator::css("button[data-element='search-button']"))
    }

    fn locate_search_box(&self) -> Locator {
        Locator::css("input[data-element='search-form-input']")
    }

    fn locate_submit(&self) -> Option<Locator> {
        Some(Locator::css("button[data-element='search-submit-button']"))
    }

    fn locate_category_filter(&self, category: &str) -> Vec<Locator> {
        // topic checkboxes are listed by label under the "Topics" filter
        vec![Locator::xpath(format!(
            "//ul[contains(@class,'search-filter-menu')]//label[span[normalize-space()={}]]//input[@type='checkbox']",
            xpath_literal(category)
        ))]
    }

    fn locate_sort_control(&self) -> Vec<Locator> {
        vec![
            Locator::css("select.select-input[name='s']"),
            Locator::xpath("//select[@name='s']/option[normalize-space()='Newest']"),
        ]
    }

    fn locate_cards(&self) -> CardLocators {
        CardLocators {
            titles: Locator::css(format!("{} h3.promo-title a", RESULTS)),
            dates: Locator::css(format!("{} p.promo-timestamp", RESULTS)),
            descriptions: Locator::css(format!("{} p.promo-description", RESULTS)),
            images: Locator::css(format!("{} div.promo-media img", RESULTS)),
            date_attribute: Some("data-timestamp"),
            date_format: DateFormat::EpochMillis,
        }
    }

    fn locate_next_page(&self) -> Option<Locator> {
        Some(Locator::css("div.search-results-module-next-page a"))
    }
}
