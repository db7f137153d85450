use std::collections::BTreeMap;
use std::path::PathBuf;

use ns_core::browser::ENTER_KEY;
use ns_core::{
    BoxedElement, BrowserSession, Error, Locator, RecordSink, Result, RunParameters, SessionFactory,
    WaitCondition,
};
use ns_storage::create_sink;

use crate::config::RunConfig;
use crate::images::ImageDownloader;
use crate::logging::Logger;
use crate::pagination::{Paginator, StopReason};
use crate::retry::retry;
use crate::scrapers::{get_scraper_factories, BoxedAdapter, ScraperFactory, SiteAdapter};
use crate::screenshots::{FailureShot, Screenshots};

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub source: String,
    pub records: usize,
    pub pages_visited: u32,
    pub stop_reason: StopReason,
    /// Where the table was written; `None` when nothing was extracted
    pub output: Option<PathBuf>,
}

pub struct ScraperManager {
    factories: Vec<ScraperFactory>,
    sessions: Box<dyn SessionFactory>,
    config: RunConfig,
    logger: Logger,
}

impl ScraperManager {
    pub fn new(sessions: Box<dyn SessionFactory>, config: RunConfig, logger: Logger) -> Self {
        Self {
            factories: get_scraper_factories(),
            sessions,
            config,
            logger,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn add_scraper_factory(&mut self, factory: ScraperFactory) {
        self.factories.push(factory);
    }

    pub fn get_scrapers(&self) -> Vec<BoxedAdapter> {
        self.factories.iter().map(|f| f()).collect()
    }

    /// Splits `region/name`. A bare name matches that name in any region.
    pub fn parse_source(&self, source: &str) -> Result<(Option<String>, String)> {
        let parts: Vec<&str> = source.split('/').map(str::trim).collect();
        match parts.as_slice() {
            [name] if !name.is_empty() => Ok((None, name.to_lowercase())),
            [region, name] if !region.is_empty() && !name.is_empty() => {
                Ok((Some(region.to_lowercase()), name.to_lowercase()))
            }
            _ => Err(Error::InvalidParameters(format!(
                "Invalid source format: {} (expected region/name, e.g. us/latimes)",
                source
            ))),
        }
    }

    pub fn get_scraper(&self, source: &str) -> Result<BoxedAdapter> {
        let (region, name) = self.parse_source(source)?;
        self.factories
            .iter()
            .map(|f| f())
            .find(|scraper| {
                let in_region = region
                    .as_deref()
                    .map_or(true, |r| scraper.source_metadata().region.name == r);
                in_region && scraper.cli_names().contains(&name.as_str())
            })
            .ok_or_else(|| Error::Scraping(format!("No scraper found for {}", source)))
    }

    fn get_all_scrapers(&self) -> BTreeMap<String, Vec<BoxedAdapter>> {
        let mut scrapers = BTreeMap::new();
        for scraper in self.get_scrapers() {
            let region = scraper.source_metadata().region;
            scrapers
                .entry(format!("{} {}", region.emoji, region.name))
                .or_insert_with(Vec::new)
                .push(scraper);
        }
        scrapers
    }

    /// One line per region and per adapter, ready to print.
    pub fn list_scrapers(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (region, scrapers) in self.get_all_scrapers() {
            lines.push(format!("{}:", region));
            for scraper in scrapers {
                let meta = scraper.source_metadata();
                lines.push(format!(
                    "  - {} {} [{}/{}] {}",
                    meta.emoji,
                    meta.name,
                    meta.region.name,
                    scraper.cli_names().join(", "),
                    scraper.base_url()
                ));
            }
        }
        lines
    }

    /// Searches `source` for `params`, pages through the results and writes the
    /// table. The browser is shut down whichever step fails.
    pub async fn run(&self, source: &str, params: &RunParameters) -> Result<RunReport> {
        let adapter = self.get_scraper(source)?;
        let meta = adapter.source_metadata();
        let logger = self.logger.clone().with_new_prefixes(meta.name.to_string());
        logger.info(&format!(
            "{} Starting run for '{}' (category: {}, window: {} months)",
            meta.emoji,
            params.search_phrase,
            params.category.as_deref().unwrap_or("any"),
            params.months
        ));

        let session = self.sessions.open().await?;
        let result = self.drive(&*session, &*adapter, params, &logger).await;

        match session.quit().await {
            Ok(()) => logger.info("🛑 Browser closed"),
            Err(e) => logger.warn(&format!("Could not close the browser cleanly: {}", e)),
        }

        let report = result?;
        Ok(RunReport {
            source: source.to_string(),
            ..report
        })
    }

    async fn drive(
        &self,
        session: &dyn BrowserSession,
        adapter: &dyn SiteAdapter,
        params: &RunParameters,
        logger: &Logger,
    ) -> Result<RunReport> {
        let screenshots = Screenshots::new(self.config.screenshot_dir(), logger.clone());

        logger.info(&format!("🌐 Opening {}", adapter.base_url()));
        session.goto(adapter.base_url()).await?;
        if let Err(e) = session.wait_until_ready(self.config.page_timeout).await {
            logger.warn(&format!("Home page did not finish loading: {}. Continuing.", e));
        }

        self.search(session, adapter, params, &screenshots, logger).await?;
        self.filter_category(session, adapter, params, &screenshots, logger).await;
        self.sort_newest(session, adapter, &screenshots, logger).await;

        let images = ImageDownloader::new(&self.config.output_dir, self.config.image_timeout, logger.clone())?;
        let mut sink = create_sink(self.config.format);
        let outcome = Paginator::new(
            session,
            adapter,
            params,
            &self.config,
            &images,
            &screenshots,
            logger.clone(),
        )
        .run(&mut sink)
        .await;

        let output = if sink.is_empty() {
            logger.info("No records extracted, nothing to write");
            None
        } else {
            let path = self.config.output_path();
            sink.flush(&path)?;
            logger.info(&format!(
                "💾 Wrote {} records to {} ({})",
                sink.len(),
                path.display(),
                self.config.format
            ));
            Some(path)
        };

        Ok(RunReport {
            source: String::new(),
            records: outcome.records_appended,
            pages_visited: outcome.pages_visited,
            stop_reason: outcome.stop_reason,
            output,
        })
    }

    async fn search(
        &self,
        session: &dyn BrowserSession,
        adapter: &dyn SiteAdapter,
        params: &RunParameters,
        screenshots: &Screenshots,
        logger: &Logger,
    ) -> Result<()> {
        logger.info(&format!("🔍 Searching for '{}'", params.search_phrase));

        if let Some(trigger) = adapter.locate_search_trigger() {
            let button = self
                .await_control("locate search button", session, &trigger, WaitCondition::Clickable, logger)
                .await;
            let button = self.or_screenshot(button, session, screenshots, FailureShot::SearchButtonNotFound).await?;
            button.click().await?;
        }

        let search_box = self
            .await_control(
                "locate search input",
                session,
                &adapter.locate_search_box(),
                WaitCondition::Visible,
                logger,
            )
            .await;
        let search_box = self.or_screenshot(search_box, session, screenshots, FailureShot::SearchInputNotFound).await?;
        search_box.send_keys(&params.search_phrase).await?;

        match adapter.locate_submit() {
            Some(submit) => {
                let button = self
                    .await_control("locate submit button", session, &submit, WaitCondition::Clickable, logger)
                    .await;
                let button = self.or_screenshot(button, session, screenshots, FailureShot::SearchButtonNotFound).await?;
                button.click().await?;
            }
            None => search_box.send_keys(ENTER_KEY).await?,
        }

        if let Err(e) = session.wait_until_ready(self.config.page_timeout).await {
            logger.warn(&format!("Results page did not finish loading: {}. Continuing.", e));
        }
        logger.info("Search submitted");
        Ok(())
    }

    async fn filter_category(
        &self,
        session: &dyn BrowserSession,
        adapter: &dyn SiteAdapter,
        params: &RunParameters,
        screenshots: &Screenshots,
        logger: &Logger,
    ) {
        let Some(category) = params.category.as_deref() else {
            logger.info("No category requested, skipping the filter");
            return;
        };
        let steps = adapter.locate_category_filter(category);
        if steps.is_empty() {
            logger.info("Site has no category filter, skipping");
            return;
        }

        logger.info(&format!("🏷️ Filtering by category '{}'", category));
        if let Err(e) = self.click_through("category filter", session, &steps, logger).await {
            logger.warn(&format!("Category filter failed, continuing unfiltered: {}", e));
            screenshots.capture(session, FailureShot::CategoryFilterError).await;
        }
    }

    async fn sort_newest(
        &self,
        session: &dyn BrowserSession,
        adapter: &dyn SiteAdapter,
        screenshots: &Screenshots,
        logger: &Logger,
    ) {
        let steps = adapter.locate_sort_control();
        if steps.is_empty() {
            logger.info("Site has no sort control, skipping");
            return;
        }

        logger.info("↕️ Sorting by newest");
        if let Err(e) = self.click_through("sort control", session, &steps, logger).await {
            logger.warn(&format!("Sort failed, results may be out of order: {}", e));
            screenshots.capture(session, FailureShot::SortError).await;
        }
    }

    async fn click_through(
        &self,
        name: &str,
        session: &dyn BrowserSession,
        steps: &[Locator],
        logger: &Logger,
    ) -> Result<()> {
        for (i, locator) in steps.iter().enumerate() {
            let step = format!("{} step {}", name, i + 1);
            let control = self
                .await_control(&step, session, locator, WaitCondition::Clickable, logger)
                .await?;
            control.click().await?;
        }
        if let Err(e) = session.wait_until_ready(self.config.page_timeout).await {
            logger.warn(&format!("Page did not settle after {}: {}", name, e));
        }
        Ok(())
    }

    async fn await_control(
        &self,
        name: &str,
        session: &dyn BrowserSession,
        locator: &Locator,
        condition: WaitCondition,
        logger: &Logger,
    ) -> Result<BoxedElement> {
        let timeout = self.config.element_timeout;
        retry(name, &self.config.retry, logger, move || {
            session.wait_for(locator, condition, timeout)
        })
        .await
    }

    async fn or_screenshot<T>(
        &self,
        result: Result<T>,
        session: &dyn BrowserSession,
        screenshots: &Screenshots,
        shot: FailureShot,
    ) -> Result<T> {
        if result.is_err() {
            screenshots.capture(session, shot).await;
        }
        result
    }
}
