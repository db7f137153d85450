use ns_core::dates::DateFormat;
use ns_core::Locator;

use super::REGION;
use crate::scrapers::utils::xpath_literal;
use crate::scrapers::{CardLocators, SiteAdapter, SourceMetadata};

const RESULTS: &str = "div.SearchResultsModule-results div.PageList-items-item";

#[derive(Debug, Clone, Default)]
pub struct ApNewsScraper;

impl ApNewsScraper {
    pub fn new() -> Self {
        Self
    }

    const BASE_URL: &'static str = "https://apnews.com/";
}

impl SiteAdapter for ApNewsScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "Associated Press",
            emoji: "📰",
            region: REGION,
        }
    }

    fn base_url(&self) -> &str {
        Self::BASE_URL
    }

    fn cli_names(&self) -> Vec<&str> {
        vec!["apnews", "ap"]
    }

    fn locate_search_trigger(&self) -> Option<Locator> {
        Some(Locator::css("button.SearchOverlay-search-button"))
    }

    fn locate_search_box(&self) -> Locator {
        Locator::css("input.SearchOverlay-search-input")
    }

    fn locate_submit(&self) -> Option<Locator> {
        Some(Locator::css("button.SearchOverlay-search-submit"))
    }

    fn locate_category_filter(&self, category: &str) -> Vec<Locator> {
        vec![
            Locator::css("div.SearchFilter-heading"),
            Locator::xpath(format!(
                "//div[contains(@class,'SearchFilter-items')]//label[normalize-space()={}]/input",
                xpath_literal(category)
            )),
        ]
    }

    fn locate_sort_control(&self) -> Vec<Locator> {
        vec![
            Locator::css("select.Select-input"),
            Locator::xpath("//select[contains(@class,'Select-input')]/option[normalize-space()='Newest']"),
        ]
    }

    fn locate_cards(&self) -> CardLocators {
        CardLocators {
            titles: Locator::css(format!("{} div.PagePromo-title span.PagePromoContentIcons-text", RESULTS)),
            dates: Locator::css(format!("{} bsp-timestamp", RESULTS)),
            descriptions: Locator::css(format!("{} div.PagePromo-description span", RESULTS)),
            images: Locator::css(format!("{} div.PagePromo-media img.Image", RESULTS)),
            date_attribute: Some("data-timestamp"),
            date_format: DateFormat::EpochMillis,
        }
    }

    fn locate_next_page(&self) -> Option<Locator> {
        Some(Locator::css("div.Pagination-nextPage a"))
    }
}
