use ns_core::dates::DateFormat;
use ns_core::Locator;

use super::REGION;
use crate::scrapers::utils::xpath_literal;
use crate::scrapers::{CardLocators, SiteAdapter, SourceMetadata};

const RESULTS: &str = "ul[class*='search-results__list'] li";

#[derive(Debug, Clone, Default)]
pub struct ReutersScraper;

impl ReutersScraper {
    pub fn new() -> Self {
        Self
    }

    const BASE_URL: &'static str = "https://www.reuters.com/";

    fn dropdown_option(button_id: &str, label: &str) -> Vec<Locator> {
        vec![
            Locator::css(format!("button#{}", button_id)),
            Locator::xpath(format!(
                "//ul[@aria-labelledby='{}']/li[normalize-space()={}]",
                button_id,
                xpath_literal(label)
            )),
        ]
    }
}

impl SiteAdapter for ReutersScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "Reuters",
            emoji: "🗞️",
            region: REGION,
        }
    }

    fn base_url(&self) -> &str {
        Self::BASE_URL
    }

    fn cli_names(&self) -> Vec<&str> {
        vec!["reuters"]
    }

    fn locate_search_trigger(&self) -> Option<Locator> {
        Some(Locator::css("button[aria-label='Open search bar']"))
    }

    fn locate_search_box(&self) -> Locator {
        Locator::css("input[data-testid='FormField:input']")
    }

    // the search form submits on Enter
    fn locate_submit(&self) -> Option<Locator> {
        None
    }

    fn locate_category_filter(&self, category: &str) -> Vec<Locator> {
        Self::dropdown_option("sectionfilter", category)
    }

    fn locate_sort_control(&self) -> Vec<Locator> {
        Self::dropdown_option("sortby", "Newest")
    }

    fn locate_cards(&self) -> CardLocators {
        CardLocators {
            titles: Locator::css(format!("{} [data-testid='Heading']", RESULTS)),
            dates: Locator::css(format!("{} time[datetime]", RESULTS)),
            descriptions: Locator::css(format!("{} [data-testid='Description']", RESULTS)),
            images: Locator::css(format!("{} [data-testid='Image'] img", RESULTS)),
            date_attribute: Some("datetime"),
            date_format: DateFormat::Rfc3339,
        }
    }

    fn locate_next_page(&self) -> Option<Locator> {
        Some(Locator::css("button[aria-label='Next stories']"))
    }
}
