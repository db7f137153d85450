use std::path::PathBuf;
use std::time::Duration;

use ns_storage::OutputFormat;

use crate::retry::RetryPolicy;

/// Knobs for one scraping run. Defaults match a local Selenium server and the
/// `output/` layout.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub webdriver_url: String,
    pub headless: bool,
    pub output_dir: PathBuf,
    /// Table file name; when relative it lives under `output_dir`
    pub output_file: PathBuf,
    pub format: OutputFormat,
    pub page_timeout: Duration,
    pub element_timeout: Duration,
    pub next_page_timeout: Duration,
    pub image_timeout: Duration,
    pub retry: RetryPolicy,
    pub max_pages: Option<u32>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:4444".to_string(),
            headless: false,
            output_dir: PathBuf::from("output"),
            output_file: PathBuf::from("news_data.csv"),
            format: OutputFormat::Csv,
            page_timeout: Duration::from_secs(30),
            element_timeout: Duration::from_secs(10),
            next_page_timeout: Duration::from_secs(10),
            image_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            max_pages: None,
        }
    }
}

impl RunConfig {
    pub fn output_path(&self) -> PathBuf {
        if self.output_file.is_absolute() {
            self.output_file.clone()
        } else {
            self.output_dir.join(&self.output_file)
        }
    }

    pub fn screenshot_dir(&self) -> PathBuf {
        self.output_dir.join("screenshots")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = RunConfig::default();
        assert_eq!(config.output_path(), PathBuf::from("output/news_data.csv"));
        assert_eq!(config.screenshot_dir(), PathBuf::from("output/screenshots"));
        assert_eq!(config.retry.retries, 3);
    }

    #[test]
    fn test_absolute_output_file_wins() {
        let config = RunConfig {
            output_file: PathBuf::from("/tmp/run.json"),
            ..Default::default()
        };
        assert_eq!(config.output_path(), PathBuf::from("/tmp/run.json"));
    }
}
