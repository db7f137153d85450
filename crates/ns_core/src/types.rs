use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Validated parameters for one run. Built once at startup and never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParameters {
    pub search_phrase: String,
    pub category: Option<String>,
    pub months: u32,
}

impl RunParameters {
    pub fn new(search_phrase: impl Into<String>, category: Option<String>, months: u32) -> Result<Self> {
        let search_phrase = search_phrase.into().trim().to_string();
        if search_phrase.is_empty() {
            return Err(Error::InvalidParameters("search_phrase must not be empty".to_string()));
        }
        if months == 0 {
            return Err(Error::InvalidParameters("months must be at least 1".to_string()));
        }
        let category = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(Self {
            search_phrase,
            category,
            months,
        })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        WorkItem::from_yaml_str(yaml)?.into_parameters()
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        WorkItem::from_yaml_file(path)?.into_parameters()
    }
}

/// `months` as it arrives from a work item: either a number or a number in a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MonthsValue {
    Number(i64),
    Text(String),
}

impl MonthsValue {
    pub fn parse(&self) -> Result<u32> {
        let value = match self {
            MonthsValue::Number(n) => *n,
            MonthsValue::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                Error::InvalidParameters(format!("months is not an integer: {:?}", s))
            })?,
        };
        u32::try_from(value)
            .map_err(|_| Error::InvalidParameters(format!("months out of range: {}", value)))
    }
}

/// Raw run parameters as loaded from a YAML work item. Every field is optional
/// so that command-line flags can fill in or override them before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorkItem {
    pub search_phrase: Option<String>,
    #[serde(alias = "category")]
    pub news_category: Option<String>,
    pub months: Option<MonthsValue>,
}

impl WorkItem {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Fields set on `other` win.
    pub fn merge(self, other: WorkItem) -> WorkItem {
        WorkItem {
            search_phrase: other.search_phrase.or(self.search_phrase),
            news_category: other.news_category.or(self.news_category),
            months: other.months.or(self.months),
        }
    }

    pub fn into_parameters(self) -> Result<RunParameters> {
        let search_phrase = self
            .search_phrase
            .ok_or_else(|| Error::InvalidParameters("search_phrase is required".to_string()))?;
        let months = match self.months {
            Some(months) => months.parse()?,
            None => return Err(Error::InvalidParameters("months is required".to_string())),
        };
        RunParameters::new(search_phrase, self.news_category, months)
    }
}

/// What the field extractor reads off one card before any normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFields {
    pub title: String,
    pub raw_date: String,
    pub description: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub date: NaiveDate,
    pub description: String,
    pub image_filename: Option<String>,
    pub phrase_count: usize,
    pub contains_money: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_months_as_text() {
        let params = RunParameters::from_yaml_str(
            "search_phrase: inflation\nnews_category: Business\nmonths: \"3\"\n",
        )
        .unwrap();
        assert_eq!(params.search_phrase, "inflation");
        assert_eq!(params.category.as_deref(), Some("Business"));
        assert_eq!(params.months, 3);
    }

    #[test]
    fn test_months_as_number_and_category_alias() {
        let params =
            RunParameters::from_yaml_str("search_phrase: climate\ncategory: World\nmonths: 2\n")
                .unwrap();
        assert_eq!(params.category.as_deref(), Some("World"));
        assert_eq!(params.months, 2);
    }

    #[test]
    fn test_blank_category_is_absent() {
        let params = RunParameters::new("  elections ", Some("   ".to_string()), 1).unwrap();
        assert_eq!(params.search_phrase, "elections");
        assert!(params.category.is_none());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            RunParameters::new("", None, 1),
            Err(Error::InvalidParameters(_))
        ));
        assert!(matches!(
            RunParameters::new("ai", None, 0),
            Err(Error::InvalidParameters(_))
        ));
        assert!(matches!(
            RunParameters::from_yaml_str("search_phrase: ai\nmonths: soon\n"),
            Err(Error::InvalidParameters(_))
        ));
        assert!(matches!(
            RunParameters::from_yaml_str("search_phrase: ai\nmonths: -2\n"),
            Err(Error::InvalidParameters(_))
        ));
        assert!(matches!(
            RunParameters::from_yaml_str("months: 1\n"),
            Err(Error::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let file = WorkItem::from_yaml_str("search_phrase: ai\nmonths: 1\n").unwrap();
        let flags = WorkItem {
            months: Some(MonthsValue::Number(4)),
            news_category: Some("Technology".to_string()),
            ..Default::default()
        };
        let params = file.merge(flags).into_parameters().unwrap();
        assert_eq!(params.search_phrase, "ai");
        assert_eq!(params.months, 4);
        assert_eq!(params.category.as_deref(), Some("Technology"));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "search_phrase: drought\nmonths: \"6\"").unwrap();
        let params = RunParameters::from_yaml_file(file.path()).unwrap();
        assert_eq!(params.months, 6);
        assert!(params.category.is_none());
    }
}
