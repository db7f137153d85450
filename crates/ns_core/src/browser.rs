use std::fmt;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::Result;

/// WebDriver key code for Enter, usable with [`PageElement::send_keys`].
pub const ENTER_KEY: &str = "\u{E007}";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Locator::XPath(expression.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css={}", s),
            Locator::XPath(s) => write!(f, "xpath={}", s),
        }
    }
}

/// What a bounded wait on an element has to observe before it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition {
    Present,
    Visible,
    Clickable,
}

/// The narrow view of a located element the pipeline depends on.
#[async_trait]
pub trait PageElement: Send + Sync {
    async fn text(&self) -> Result<String>;

    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    async fn click(&self) -> Result<()>;

    async fn send_keys(&self, keys: &str) -> Result<()>;
}

pub type BoxedElement = Box<dyn PageElement>;

/// A live browser tab driven by the pipeline.
///
/// Lookups that find nothing return [`crate::Error::ElementNotFound`], and waits
/// that expire return [`crate::Error::Timeout`], so callers can retry them.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;

    async fn find(&self, locator: &Locator) -> Result<BoxedElement>;

    /// An empty result is not an error.
    async fn find_all(&self, locator: &Locator) -> Result<Vec<BoxedElement>>;

    async fn wait_for(
        &self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<BoxedElement>;

    /// Waits until `document.readyState` reports `complete`.
    async fn wait_until_ready(&self, timeout: Duration) -> Result<()>;

    async fn screenshot(&self, path: &Path) -> Result<()>;

    async fn quit(self: Box<Self>) -> Result<()>;
}

/// Opens browser sessions. Production code talks to a WebDriver server; tests
/// hand out scripted sessions.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn BrowserSession>>;
}
