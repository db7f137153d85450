use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use ns_core::Result;

use crate::logging::Logger;

const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "avif"];

/// Deterministic file name for the image of card `index` on results page `page`.
pub fn image_filename(date: NaiveDate, page: u32, index: usize, url: &str) -> String {
    format!(
        "{}_p{:02}_{:02}.{}",
        date.format("%Y%m%d"),
        page,
        index,
        image_extension(url)
    )
}

fn image_extension(url: &str) -> &'static str {
    let path = url::Url::parse(url)
        .map(|u| u.path().to_lowercase())
        .unwrap_or_default();
    let ext = Path::new(&path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    IMAGE_EXTENSIONS
        .iter()
        .find(|known| **known == ext)
        .copied()
        .unwrap_or("jpg")
}

/// Fetches card thumbnails into the output directory. Failures are logged and
/// reported as a missing image; there is no retry at this layer.
pub struct ImageDownloader {
    client: reqwest::Client,
    output_dir: PathBuf,
    logger: Logger,
}

impl ImageDownloader {
    pub fn new(output_dir: impl Into<PathBuf>, timeout: Duration, logger: Logger) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            output_dir: output_dir.into(),
            logger,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns `filename` once the image is on disk.
    pub async fn download(&self, url: &str, filename: &str) -> Option<String> {
        match self.fetch(url, filename).await {
            Ok(()) => {
                self.logger.debug(&format!("🖼️ Saved {} as {}", url, filename));
                Some(filename.to_string())
            }
            Err(e) => {
                self.logger.error(&format!("Failed to download image {}: {}", url, e));
                None
            }
        }
    }

    async fn fetch(&self, url: &str, filename: &str) -> Result<()> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        tokio::fs::create_dir_all(&self.output_dir).await?;
        tokio::fs::write(self.output_dir.join(filename), &bytes).await?;
        Ok(())
    }
}
