use std::fmt;

use chrono::{NaiveDate, Utc};
use ns_core::dates::{is_outside_window, normalize_date};
use ns_core::signals::{contains_money, count_phrase};
use ns_core::{
    ArticleRecord, BoxedElement, BrowserSession, Error, Locator, RecordSink, Result, RunParameters,
    WaitCondition,
};

use crate::config::RunConfig;
use crate::extract::{ElementSequences, FieldExtractor};
use crate::images::{image_filename, ImageDownloader};
use crate::logging::Logger;
use crate::retry::retry;
use crate::scrapers::{CardLocators, SiteAdapter};
use crate::screenshots::{FailureShot, Screenshots};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A card fell outside the recency window
    DateWindow,
    /// No next-page control, or the page cap was reached
    NoMorePages,
    /// Extraction hit an unexpected error; records appended so far are kept
    Failed(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::DateWindow => f.write_str("reached the end of the date window"),
            StopReason::NoMorePages => f.write_str("no more pages"),
            StopReason::Failed(e) => write!(f, "failed: {}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationOutcome {
    pub pages_visited: u32,
    pub records_appended: usize,
    pub stop_reason: StopReason,
}

enum PageEnd {
    Exhausted,
    OutsideWindow,
}

#[derive(Default)]
struct Progress {
    appended: usize,
    last_date: Option<NaiveDate>,
}

/// Walks result pages of an already-searched site, appending one record per
/// card until a card is too old or there is no next page.
pub struct Paginator<'a> {
    session: &'a dyn BrowserSession,
    adapter: &'a dyn SiteAdapter,
    params: &'a RunParameters,
    config: &'a RunConfig,
    images: &'a ImageDownloader,
    screenshots: &'a Screenshots,
    logger: Logger,
    today: NaiveDate,
}

impl<'a> Paginator<'a> {
    pub fn new(
        session: &'a dyn BrowserSession,
        adapter: &'a dyn SiteAdapter,
        params: &'a RunParameters,
        config: &'a RunConfig,
        images: &'a ImageDownloader,
        screenshots: &'a Screenshots,
        logger: Logger,
    ) -> Self {
        Self {
            session,
            adapter,
            params,
            config,
            images,
            screenshots,
            logger: logger.with_prefix("paginate".to_string()),
            today: Utc::now().date_naive(),
        }
    }

    /// Measures recency against `today` instead of the current date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub async fn run(&self, sink: &mut dyn RecordSink) -> PaginationOutcome {
        let mut progress = Progress::default();
        let mut page = 1;

        loop {
            match self.scrape_page(page, sink, &mut progress).await {
                Ok(PageEnd::OutsideWindow) => {
                    return self.outcome(page, &progress, StopReason::DateWindow);
                }
                Ok(PageEnd::Exhausted) => {}
                Err(e) => {
                    self.logger
                        .error(&format!("Extraction failed on page {}: {}", page, e));
                    self.screenshots
                        .capture(self.session, FailureShot::ExtractionError)
                        .await;
                    return self.outcome(page, &progress, StopReason::Failed(e.to_string()));
                }
            }

            if self.config.max_pages.is_some_and(|max| page >= max) {
                self.logger.info(&format!("Reached the page cap of {}", page));
                return self.outcome(page, &progress, StopReason::NoMorePages);
            }
            if !self.next_page().await {
                return self.outcome(page, &progress, StopReason::NoMorePages);
            }
            page += 1;
        }
    }

    fn outcome(&self, page: u32, progress: &Progress, stop_reason: StopReason) -> PaginationOutcome {
        self.logger.info(&format!(
            "Stopped after {} page(s) with {} record(s): {}",
            page, progress.appended, stop_reason
        ));
        PaginationOutcome {
            pages_visited: page,
            records_appended: progress.appended,
            stop_reason,
        }
    }

    async fn scrape_page(
        &self,
        page: u32,
        sink: &mut dyn RecordSink,
        progress: &mut Progress,
    ) -> Result<PageEnd> {
        self.logger.info(&format!("📄 Scraping results page {}", page));
        if let Err(e) = self.session.wait_until_ready(self.config.page_timeout).await {
            self.logger
                .warn(&format!("Page {} did not finish loading: {}. Continuing.", page, e));
        }

        let cards = self.adapter.locate_cards();
        let sequences = self.locate_sequences(&cards).await?;
        let extractor = FieldExtractor::new(&cards, self.adapter.base_url(), self.logger.clone());

        for index in 0..sequences.card_count() {
            let fields = extractor.extract(&sequences, index).await;
            let date = normalize_date(&fields.raw_date, cards.date_format);

            if is_outside_window(self.today, date, self.params.months) {
                self.logger.info(&format!(
                    "Card {} on page {} is dated {}, outside the {}-month window",
                    index, page, date, self.params.months
                ));
                return Ok(PageEnd::OutsideWindow);
            }
            if progress.last_date.is_some_and(|last| date > last) {
                self.logger.warn(&format!(
                    "Results out of order: card {} on page {} ({}) is newer than the one before it",
                    index, page, date
                ));
            }
            progress.last_date = Some(date);

            let image = match fields.image_url.as_deref() {
                Some(url) => {
                    self.images
                        .download(url, &image_filename(date, page, index, url))
                        .await
                }
                None => None,
            };

            let record = ArticleRecord {
                phrase_count: count_phrase(&fields.title, &fields.description, &self.params.search_phrase),
                contains_money: contains_money(&fields.title, &fields.description),
                title: fields.title,
                date,
                description: fields.description,
                image_filename: image,
            };
            sink.append(record);
            progress.appended += 1;
        }

        self.logger.info(&format!(
            "Page {} done, {} record(s) so far",
            page, progress.appended
        ));
        Ok(PageEnd::Exhausted)
    }

    async fn locate_sequences(&self, cards: &CardLocators) -> Result<ElementSequences> {
        let session = self.session;
        let titles = retry("locate card titles", &self.config.retry, &self.logger, move || async move {
            let found = session.find_all(&cards.titles).await?;
            if found.is_empty() {
                return Err(Error::ElementNotFound(cards.titles.to_string()));
            }
            Ok(found)
        })
        .await?;

        Ok(ElementSequences {
            titles,
            dates: self.locate_all("locate card dates", &cards.dates).await?,
            descriptions: self
                .locate_all("locate card descriptions", &cards.descriptions)
                .await?,
            images: self.locate_all("locate card images", &cards.images).await?,
        })
    }

    /// An empty result is valid here; only lookup errors are retried.
    async fn locate_all(&self, name: &str, locator: &Locator) -> Result<Vec<BoxedElement>> {
        let session = self.session;
        retry(name, &self.config.retry, &self.logger, move || session.find_all(locator)).await
    }

    async fn next_page(&self) -> bool {
        let Some(locator) = self.adapter.locate_next_page() else {
            self.logger.info("Site has no pagination");
            return false;
        };
        let control = match self
            .session
            .wait_for(&locator, WaitCondition::Clickable, self.config.next_page_timeout)
            .await
        {
            Ok(control) => control,
            Err(e) => {
                self.logger.info(&format!("No next page: {}", e));
                return false;
            }
        };
        match control.click().await {
            Ok(()) => true,
            Err(e) => {
                self.logger.warn(&format!("Could not open the next page: {}", e));
                false
            }
        }
    }
}
