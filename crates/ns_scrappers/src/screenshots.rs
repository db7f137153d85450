use std::fmt;
use std::path::{Path, PathBuf};

use ns_core::BrowserSession;

use crate::logging::Logger;

/// The failure conditions that leave a screenshot behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureShot {
    SearchButtonNotFound,
    SearchInputNotFound,
    CategoryFilterError,
    SortError,
    ExtractionError,
}

impl FailureShot {
    pub fn file_stem(&self) -> &'static str {
        match self {
            FailureShot::SearchButtonNotFound => "search-button-not-found",
            FailureShot::SearchInputNotFound => "search-input-not-found",
            FailureShot::CategoryFilterError => "category-filter-error",
            FailureShot::SortError => "sort-error",
            FailureShot::ExtractionError => "extraction-error",
        }
    }
}

impl fmt::Display for FailureShot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

pub struct Screenshots {
    dir: PathBuf,
    logger: Logger,
}

impl Screenshots {
    pub fn new(dir: impl Into<PathBuf>, logger: Logger) -> Self {
        Self {
            dir: dir.into(),
            logger,
        }
    }

    pub fn path_for(&self, shot: FailureShot) -> PathBuf {
        self.dir.join(format!("{}.png", shot.file_stem()))
    }

    /// Saves the current page. Returns where it went, or `None` if the browser
    /// could not take it.
    pub async fn capture(&self, session: &dyn BrowserSession, shot: FailureShot) -> Option<PathBuf> {
        let path = self.path_for(shot);
        if let Err(e) = ensure_dir(&self.dir) {
            self.logger.warn(&format!("Could not create {}: {}", self.dir.display(), e));
            return None;
        }
        match session.screenshot(&path).await {
            Ok(()) => {
                self.logger.info(&format!("📸 Saved {} screenshot to {}", shot, path.display()));
                Some(path)
            }
            Err(e) => {
                self.logger.warn(&format!("Could not capture {} screenshot: {}", shot, e));
                None
            }
        }
    }
}

fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeSession;

    #[test]
    fn test_names() {
        let screenshots = Screenshots::new("output/screenshots", Logger::new());
        assert_eq!(
            screenshots.path_for(FailureShot::SortError),
            PathBuf::from("output/screenshots/sort-error.png")
        );
        assert_eq!(FailureShot::SearchInputNotFound.to_string(), "search-input-not-found");
    }

    #[tokio::test]
    async fn test_capture_records_path() {
        let dir = tempfile::tempdir().unwrap();
        let session = FakeSession::new();
        let screenshots = Screenshots::new(dir.path(), Logger::new());

        let path = screenshots
            .capture(&session, FailureShot::ExtractionError)
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("extraction-error.png"));
        assert_eq!(session.screenshots(), vec![path]);
    }
}
