use ns_core::dates::DateFormat;
use ns_core::Locator;

pub mod uk;
pub mod us;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub emoji: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct SourceMetadata {
    pub name: &'static str,
    pub emoji: &'static str,
    pub region: Region,
}

/// Page-level locators for the parallel element sequences that make up the
/// result cards. Index `i` in each sequence belongs to the `i`-th card.
#[derive(Debug, Clone)]
pub struct CardLocators {
    pub titles: Locator,
    pub dates: Locator,
    pub descriptions: Locator,
    pub images: Locator,
    /// Attribute holding the raw date token; the element text is used when `None`
    pub date_attribute: Option<&'static str>,
    pub date_format: DateFormat,
}

/// Everything the pipeline needs to know about one publisher's search page.
///
/// Multi-step controls (open a dropdown, then pick an option) are returned as
/// a sequence of locators that are clicked in order.
pub trait SiteAdapter: Send + Sync {
    fn source_metadata(&self) -> SourceMetadata;

    fn base_url(&self) -> &str;

    /// Returns a list of CLI shorthand names for this site
    fn cli_names(&self) -> Vec<&str> {
        vec![]
    }

    /// Control that has to be clicked before the search box appears
    fn locate_search_trigger(&self) -> Option<Locator> {
        None
    }

    fn locate_search_box(&self) -> Locator;

    /// Submit control; `None` submits by pressing Enter in the search box
    fn locate_submit(&self) -> Option<Locator>;

    /// Clicks that apply `category`; empty when the site cannot filter
    fn locate_category_filter(&self, category: &str) -> Vec<Locator>;

    /// Clicks that sort results newest first; empty when the site cannot sort
    fn locate_sort_control(&self) -> Vec<Locator>;

    fn locate_cards(&self) -> CardLocators;

    fn locate_next_page(&self) -> Option<Locator>;
}

pub type BoxedAdapter = Box<dyn SiteAdapter>;
pub type ScraperFactory = Box<dyn Fn() -> BoxedAdapter + Send + Sync>;

pub fn get_scraper_factories() -> Vec<ScraperFactory> {
    let mut factories = us::get_scraper_factories();
    factories.extend(uk::get_scraper_factories());
    factories
}

/// Common utilities for site adapters
pub(crate) mod utils {
    use ns_core::{Error, Result};
    use url::Url;

    pub fn parse_url(url: &str) -> Result<Url> {
        Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))
    }

    /// Resolves an image `src` against the page it came from. Inline `data:`
    /// placeholders left behind by lazy loading resolve to nothing.
    pub fn resolve_url(base: &str, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() || href.starts_with("data:") {
            return None;
        }
        parse_url(base)
            .ok()?
            .join(href)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .map(|u| u.to_string())
    }

    /// Quotes `s` as an XPath string literal, falling back to `concat()` when it
    /// contains both kinds of quote.
    pub fn xpath_literal(s: &str) -> String {
        if !s.contains('\'') {
            format!("'{}'", s)
        } else if !s.contains('"') {
            format!("\"{}\"", s)
        } else {
            let parts: Vec<String> = s.split('\'').map(|p| format!("'{}'", p)).collect();
            format!("concat({})", parts.join(", \"'\", "))
        }
    }
}
