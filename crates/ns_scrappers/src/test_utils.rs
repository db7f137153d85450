//! Scripted browser doubles for pipeline tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ns_core::{
    BoxedElement, BrowserSession, Error, Locator, PageElement, Result, SessionFactory,
    WaitCondition,
};

use crate::scrapers::CardLocators;

type Hook = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Clone, Default)]
pub struct FakeElement {
    text: String,
    unreadable: bool,
    attributes: HashMap<String, String>,
    on_click: Option<Hook>,
    on_keys: Option<Hook>,
}

impl FakeElement {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }

    /// An element whose text can no longer be read, like a stale reference.
    pub fn unreadable() -> Self {
        Self {
            unreadable: true,
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }
}

#[async_trait]
impl PageElement for FakeElement {
    async fn text(&self) -> Result<String> {
        if self.unreadable {
            return Err(Error::Browser("stale element reference".into()));
        }
        Ok(self.text.clone())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.attributes.get(name).cloned())
    }

    async fn click(&self) -> Result<()> {
        if let Some(hook) = &self.on_click {
            hook("");
        }
        Ok(())
    }

    async fn send_keys(&self, keys: &str) -> Result<()> {
        if let Some(hook) = &self.on_keys {
            hook(keys);
        }
        Ok(())
    }
}

pub fn boxed(elements: Vec<FakeElement>) -> Vec<BoxedElement> {
    elements
        .into_iter()
        .map(|e| Box::new(e) as BoxedElement)
        .collect()
}

/// One results page: element sequences keyed by the locator that finds them.
#[derive(Clone, Default)]
pub struct FakePage {
    elements: HashMap<Locator, Vec<FakeElement>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locator: Locator, elements: Vec<FakeElement>) -> Self {
        self.elements.insert(locator, elements);
        self
    }

    /// Builds the card sequences for `rows` of `(title, raw date, description)`.
    pub fn from_cards(cards: &CardLocators, rows: &[(&str, &str, &str)]) -> Self {
        let date = |raw: &str| match cards.date_attribute {
            Some(attr) => FakeElement::default().attr(attr, raw),
            None => FakeElement::with_text(raw),
        };
        Self::new()
            .with(
                cards.titles.clone(),
                rows.iter().map(|(t, _, _)| FakeElement::with_text(t)).collect(),
            )
            .with(cards.dates.clone(), rows.iter().map(|(_, d, _)| date(*d)).collect())
            .with(
                cards.descriptions.clone(),
                rows.iter().map(|(_, _, s)| FakeElement::with_text(s)).collect(),
            )
    }

    /// Adds one thumbnail per card, in card order.
    pub fn with_images(self, cards: &CardLocators, urls: &[&str]) -> Self {
        self.with(
            cards.images.clone(),
            urls.iter().map(|url| FakeElement::default().attr("src", url)).collect(),
        )
    }
}

#[derive(Default)]
struct SessionState {
    pages: Vec<FakePage>,
    controls: HashMap<Locator, FakeElement>,
    flaky: HashMap<Locator, usize>,
    next_page: Option<Locator>,
    current: usize,
    visited: Vec<usize>,
    urls: Vec<String>,
    events: Vec<String>,
    screenshots: Vec<PathBuf>,
    fail_goto: bool,
    quit: bool,
}

/// A browser tab that serves scripted pages. Clones share state, so a test can
/// hand one to the pipeline and inspect another.
#[derive(Clone, Default)]
pub struct FakeSession {
    state: Arc<Mutex<SessionState>>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clickable control present on every page, such as a search button.
    pub fn with_control(self, locator: Locator) -> Self {
        self.state
            .lock()
            .unwrap()
            .controls
            .insert(locator, FakeElement::default());
        self
    }

    pub fn with_page(self, page: FakePage) -> Self {
        self.state.lock().unwrap().pages.push(page);
        self
    }

    /// Exposes a next-page control on every page but the last.
    pub fn with_next_page(self, locator: Locator) -> Self {
        self.state.lock().unwrap().next_page = Some(locator);
        self
    }

    /// The first `failures` lookups of `locator` fail as if nothing matched yet.
    pub fn flaky_lookup(self, locator: Locator, failures: usize) -> Self {
        self.state.lock().unwrap().flaky.insert(locator, failures);
        self
    }

    pub fn failing_goto(self) -> Self {
        self.state.lock().unwrap().fail_goto = true;
        self
    }

    /// Indices of the results pages the pipeline read cards from, in order.
    pub fn visited(&self) -> Vec<usize> {
        self.state.lock().unwrap().visited.clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.state.lock().unwrap().urls.clone()
    }

    /// `click <locator>` and `keys <locator> <text>` entries, in order.
    pub fn events(&self) -> Vec<String> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().screenshots.clone()
    }

    pub fn is_quit(&self) -> bool {
        self.state.lock().unwrap().quit
    }

    fn recording(&self, locator: &Locator, element: FakeElement) -> FakeElement {
        let clicks = Arc::clone(&self.state);
        let keys = Arc::clone(&self.state);
        let click_name = locator.to_string();
        let key_name = locator.to_string();
        FakeElement {
            on_click: Some(Arc::new(move |_: &str| {
                clicks.lock().unwrap().events.push(format!("click {}", click_name));
            })),
            on_keys: Some(Arc::new(move |text: &str| {
                keys.lock()
                    .unwrap()
                    .events
                    .push(format!("keys {} {}", key_name, text));
            })),
            ..element
        }
    }

    fn next_page_element(&self, locator: &Locator) -> FakeElement {
        let state = Arc::clone(&self.state);
        let name = locator.to_string();
        FakeElement {
            on_click: Some(Arc::new(move |_: &str| {
                let mut state = state.lock().unwrap();
                state.events.push(format!("click {}", name));
                state.current += 1;
            })),
            ..Default::default()
        }
    }

    fn lookup(&self, locator: &Locator) -> Option<FakeElement> {
        let (on_page, control, is_next) = {
            let state = self.state.lock().unwrap();
            let on_page = state
                .pages
                .get(state.current)
                .and_then(|page| page.elements.get(locator))
                .and_then(|elements| elements.first())
                .cloned();
            let is_next = state.current + 1 < state.pages.len()
                && state.next_page.as_ref() == Some(locator);
            (on_page, state.controls.get(locator).cloned(), is_next)
        };
        if on_page.is_some() {
            return on_page;
        }
        if let Some(control) = control {
            return Some(self.recording(locator, control));
        }
        if is_next {
            return Some(self.next_page_element(locator));
        }
        None
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_goto {
            return Err(Error::Browser(format!("net::ERR_NAME_NOT_RESOLVED at {}", url)));
        }
        state.urls.push(url.to_string());
        Ok(())
    }

    async fn find(&self, locator: &Locator) -> Result<BoxedElement> {
        self.lookup(locator)
            .map(|e| Box::new(e) as BoxedElement)
            .ok_or_else(|| Error::ElementNotFound(locator.to_string()))
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<BoxedElement>> {
        let mut state = self.state.lock().unwrap();
        let current = state.current;
        if state.visited.last() != Some(&current) {
            state.visited.push(current);
        }
        if let Some(remaining) = state.flaky.get_mut(locator).filter(|n| **n > 0) {
            *remaining -= 1;
            return Err(Error::ElementNotFound(locator.to_string()));
        }
        let elements = state
            .pages
            .get(current)
            .and_then(|page| page.elements.get(locator))
            .cloned()
            .unwrap_or_default();
        Ok(boxed(elements))
    }

    async fn wait_for(
        &self,
        locator: &Locator,
        _condition: WaitCondition,
        _timeout: Duration,
    ) -> Result<BoxedElement> {
        self.lookup(locator)
            .map(|e| Box::new(e) as BoxedElement)
            .ok_or_else(|| Error::Timeout(format!("waiting for {}", locator)))
    }

    async fn wait_until_ready(&self, _timeout: Duration) -> Result<()> {
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        self.state.lock().unwrap().screenshots.push(path.to_path_buf());
        Ok(())
    }

    async fn quit(self: Box<Self>) -> Result<()> {
        self.state.lock().unwrap().quit = true;
        Ok(())
    }
}

/// Hands out clones of one scripted session.
pub struct FakeSessionFactory {
    session: FakeSession,
}

impl FakeSessionFactory {
    pub fn new(session: FakeSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SessionFactory for FakeSessionFactory {
    async fn open(&self) -> Result<Box<dyn BrowserSession>> {
        Ok(Box::new(self.session.clone()))
    }
}
