use ns_core::{BoxedElement, CardFields};

use crate::logging::Logger;
use crate::scrapers::utils::resolve_url;
use crate::scrapers::CardLocators;

/// The four parallel element sequences located on one results page.
#[derive(Default)]
pub struct ElementSequences {
    pub titles: Vec<BoxedElement>,
    pub dates: Vec<BoxedElement>,
    pub descriptions: Vec<BoxedElement>,
    pub images: Vec<BoxedElement>,
}

impl ElementSequences {
    /// Cards the title, date and description sequences have in common. Images
    /// are lazy-loaded and may be missing, so they do not bound the range.
    pub fn card_count(&self) -> usize {
        self.titles
            .len()
            .min(self.dates.len())
            .min(self.descriptions.len())
    }
}

/// Reads card fields off located elements. A missing or unreadable element
/// yields an empty field, never an error.
pub struct FieldExtractor<'a> {
    cards: &'a CardLocators,
    base_url: &'a str,
    logger: Logger,
}

impl<'a> FieldExtractor<'a> {
    pub fn new(cards: &'a CardLocators, base_url: &'a str, logger: Logger) -> Self {
        Self {
            cards,
            base_url,
            logger,
        }
    }

    pub async fn extract(&self, sequences: &ElementSequences, index: usize) -> CardFields {
        let title = self.read_text(sequences.titles.get(index), "title", index).await;

        let date_element = sequences.dates.get(index);
        let raw_date = match self.cards.date_attribute {
            Some(attr) => self
                .read_attribute(date_element, attr, "date", index)
                .await
                .unwrap_or_default(),
            None => self.read_text(date_element, "date", index).await,
        };

        let description = self
            .read_text(sequences.descriptions.get(index), "description", index)
            .await;

        let image_element = sequences.images.get(index);
        let mut image_url = self
            .read_attribute(image_element, "src", "image", index)
            .await
            .and_then(|src| resolve_url(self.base_url, &src));
        if image_url.is_none() {
            // lazy-loaded images keep the real URL aside until scrolled into view
            image_url = self
                .read_attribute(image_element, "data-src", "image", index)
                .await
                .and_then(|src| resolve_url(self.base_url, &src));
        }

        CardFields {
            title,
            raw_date: raw_date.trim().to_string(),
            description,
            image_url,
        }
    }

    async fn read_text(&self, element: Option<&BoxedElement>, field: &str, index: usize) -> String {
        let Some(element) = element else {
            self.logger.debug(&format!("card {}: no {} element", index, field));
            return String::new();
        };
        match element.text().await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                self.logger.debug(&format!("card {}: could not read {}: {}", index, field, e));
                String::new()
            }
        }
    }

    async fn read_attribute(
        &self,
        element: Option<&BoxedElement>,
        name: &str,
        field: &str,
        index: usize,
    ) -> Option<String> {
        let element = element?;
        match element.attribute(name).await {
            Ok(value) => value,
            Err(e) => {
                self.logger.debug(&format!(
                    "card {}: could not read {} attribute {}: {}",
                    index, field, name, e
                ));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{boxed, FakeElement};
    use ns_core::dates::DateFormat;
    use ns_core::Locator;

    fn cards(date_attribute: Option<&'static str>) -> CardLocators {
        CardLocators {
            titles: Locator::css("h3"),
            dates: Locator::css("time"),
            descriptions: Locator::css("p"),
            images: Locator::css("img"),
            date_attribute,
            date_format: DateFormat::EpochMillis,
        }
    }

    #[tokio::test]
    async fn test_extracts_all_fields() {
        let cards = cards(Some("data-timestamp"));
        let extractor = FieldExtractor::new(&cards, "https://www.latimes.com/", Logger::new());
        let sequences = ElementSequences {
            titles: boxed(vec![FakeElement::with_text("  Wildfire spreads \n")]),
            dates: boxed(vec![FakeElement::with_text("ignored").attr("data-timestamp", "1700000000000")]),
            descriptions: boxed(vec![FakeElement::with_text("Crews battle blaze")]),
            images: boxed(vec![FakeElement::default().attr("src", "/img/fire.jpg")]),
        };

        let fields = extractor.extract(&sequences, 0).await;
        assert_eq!(
            fields,
            CardFields {
                title: "Wildfire spreads".to_string(),
                raw_date: "1700000000000".to_string(),
                description: "Crews battle blaze".to_string(),
                image_url: Some("https://www.latimes.com/img/fire.jpg".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_elements_become_empty() {
        let cards = cards(None);
        let extractor = FieldExtractor::new(&cards, "https://apnews.com/", Logger::new());
        let sequences = ElementSequences {
            titles: boxed(vec![
                FakeElement::with_text("First"),
                FakeElement::with_text("Second"),
            ]),
            dates: boxed(vec![FakeElement::with_text("2024-01-02")]),
            descriptions: boxed(vec![FakeElement::unreadable()]),
            images: vec![],
        };

        let first = extractor.extract(&sequences, 0).await;
        assert_eq!(first.raw_date, "2024-01-02");
        assert_eq!(first.description, "");
        assert_eq!(first.image_url, None);

        let second = extractor.extract(&sequences, 1).await;
        assert_eq!(second.title, "Second");
        assert_eq!(second.raw_date, "");
        assert_eq!(second.description, "");
    }

    #[test]
    fn test_card_range_ignores_missing_images() {
        let sequences = ElementSequences {
            titles: boxed(vec![FakeElement::with_text("A"), FakeElement::with_text("B")]),
            dates: boxed(vec![FakeElement::with_text("2024-01-02")]),
            descriptions: boxed(vec![FakeElement::default(), FakeElement::default()]),
            images: vec![],
        };
        assert_eq!(sequences.card_count(), 1);
    }

    #[tokio::test]
    async fn test_lazy_image_falls_back_to_data_src() {
        let cards = cards(None);
        let extractor = FieldExtractor::new(&cards, "https://apnews.com/", Logger::new());
        let sequences = ElementSequences {
            titles: boxed(vec![FakeElement::with_text("Storm")]),
            images: boxed(vec![FakeElement::default()
                .attr("src", "data:image/gif;base64,R0lGODlhAQABAAAAACw=")
                .attr("data-src", "https://cdn.apnews.com/storm.webp")]),
            ..Default::default()
        };

        let fields = extractor.extract(&sequences, 0).await;
        assert_eq!(fields.image_url.as_deref(), Some("https://cdn.apnews.com/storm.webp"));
    }
}
