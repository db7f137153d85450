//! [`BrowserSession`] on top of a W3C WebDriver server.

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use ns_core::{
    BoxedElement, BrowserSession, Error, Locator, PageElement, Result, SessionFactory,
    WaitCondition,
};
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::ElementQueryable;
use thirtyfour::{By, ChromiumLikeCapabilities, DesiredCapabilities, WebDriver, WebElement};

use crate::logging::Logger;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn by(locator: &Locator) -> By {
    match locator {
        Locator::Css(selector) => By::Css(selector.as_str()),
        Locator::XPath(expression) => By::XPath(expression.as_str()),
    }
}

fn browser_error(e: WebDriverError) -> Error {
    match e {
        WebDriverError::NoSuchElement(..) => Error::ElementNotFound(e.to_string()),
        WebDriverError::Timeout(..) => Error::Timeout(e.to_string()),
        other => Error::Browser(other.to_string()),
    }
}

pub struct WebDriverElement {
    element: WebElement,
}

#[async_trait]
impl PageElement for WebDriverElement {
    async fn text(&self) -> Result<String> {
        self.element.text().await.map_err(browser_error)
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.element.attr(name).await.map_err(browser_error)
    }

    async fn click(&self) -> Result<()> {
        self.element.click().await.map_err(browser_error)
    }

    async fn send_keys(&self, keys: &str) -> Result<()> {
        self.element.send_keys(keys).await.map_err(browser_error)
    }
}

fn boxed(element: WebElement) -> BoxedElement {
    Box::new(WebDriverElement { element })
}

pub struct WebDriverSession {
    driver: WebDriver,
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn goto(&self, url: &str) -> Result<()> {
        self.driver.goto(url).await.map_err(browser_error)
    }

    async fn find(&self, locator: &Locator) -> Result<BoxedElement> {
        self.driver
            .find(by(locator))
            .await
            .map(boxed)
            .map_err(browser_error)
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<BoxedElement>> {
        let elements = self.driver.find_all(by(locator)).await.map_err(browser_error)?;
        Ok(elements.into_iter().map(boxed).collect())
    }

    async fn wait_for(
        &self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<BoxedElement> {
        let query = self.driver.query(by(locator)).wait(timeout, POLL_INTERVAL);
        let query = match condition {
            WaitCondition::Present => query,
            WaitCondition::Visible => query.and_displayed(),
            WaitCondition::Clickable => query.and_clickable(),
        };
        match query.first().await {
            Ok(element) => Ok(boxed(element)),
            // the query reports an expired wait as a missing element
            Err(WebDriverError::NoSuchElement(..)) | Err(WebDriverError::Timeout(..)) => {
                Err(Error::Timeout(format!("{} not {:?} after {:?}", locator, condition, timeout)))
            }
            Err(e) => Err(browser_error(e)),
        }
    }

    async fn wait_until_ready(&self, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        loop {
            let ret = self
                .driver
                .execute("return document.readyState", Vec::new())
                .await
                .map_err(browser_error)?;
            if ret.json().as_str() == Some("complete") {
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(Error::Timeout(format!("page not ready after {:?}", timeout)));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        self.driver.screenshot(path).await.map_err(browser_error)
    }

    async fn quit(self: Box<Self>) -> Result<()> {
        self.driver.quit().await.map_err(browser_error)
    }
}

/// Starts Chrome sessions on the WebDriver server at `url`.
pub struct WebDriverFactory {
    url: String,
    headless: bool,
    logger: Logger,
}

impl WebDriverFactory {
    pub fn new(url: impl Into<String>, headless: bool, logger: Logger) -> Self {
        Self {
            url: url.into(),
            headless,
            logger,
        }
    }
}

#[async_trait]
impl SessionFactory for WebDriverFactory {
    async fn open(&self) -> Result<Box<dyn BrowserSession>> {
        let mut caps = DesiredCapabilities::chrome();
        if self.headless {
            caps.set_headless().map_err(browser_error)?;
        }
        caps.add_arg("--window-size=1920,1080").map_err(browser_error)?;

        self.logger.info(&format!(
            "🧭 Connecting to WebDriver at {}{}",
            self.url,
            if self.headless { " (headless)" } else { "" }
        ));
        let driver = WebDriver::new(self.url.as_str(), caps)
            .await
            .map_err(|e| Error::Browser(format!("Could not start a session at {}: {}", self.url, e)))?;
        Ok(Box::new(WebDriverSession { driver }))
    }
}

