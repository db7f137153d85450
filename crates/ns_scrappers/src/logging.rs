use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use ns_core::{Error, Result};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set
    pub level: String,
    /// Log file written alongside the console output
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some(PathBuf::from("output/news_scraper.log")),
        }
    }
}

/// Installs the console and file subscribers and hands back the root [`Logger`].
///
/// The returned guard flushes the file writer on drop, so keep it alive for the
/// whole run. Calling this when a subscriber is already installed is a no-op.
pub fn init_logging(config: &LoggingConfig) -> Result<(Logger, Option<WorkerGuard>)> {
    if tracing::dispatcher::has_been_set() {
        return Ok((Logger::new(), None));
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level))
        .add_directive("hyper=warn".parse().map_err(|e| Error::External(anyhow::Error::new(e)))?);

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| Error::InvalidParameters(format!("Invalid log file: {}", path.display())))?;
            std::fs::create_dir_all(&dir)?;

            let appender = tracing_appender::rolling::never(&dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::External(anyhow::Error::new(e)))?;

    Ok((Logger::new(), guard))
}

#[derive(Debug, Clone)]
pub struct CapturedLine {
    pub level: Level,
    pub message: String,
}

/// Collects every line a [`Logger`] emits, for assertions in tests.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    lines: Arc<Mutex<Vec<CapturedLine>>>,
}

impl LogCapture {
    fn push(&self, level: Level, message: String) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(CapturedLine { level, message });
        }
    }

    pub fn lines(&self) -> Vec<CapturedLine> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn messages(&self, level: Level) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|l| l.level == level)
            .map(|l| l.message)
            .collect()
    }

    pub fn count(&self, level: Level) -> usize {
        self.messages(level).len()
    }
}

/// Logging handle passed to every component. Prefixes name the component in
/// each line; a capture, when attached, sees the same lines.
#[derive(Debug, Clone, Default)]
pub struct Logger {
    prefixes: VecDeque<String>,
    capture: Option<LogCapture>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capturing() -> (Self, LogCapture) {
        let capture = LogCapture::default();
        let logger = Self {
            prefixes: VecDeque::new(),
            capture: Some(capture.clone()),
        };
        (logger, capture)
    }

    pub fn with_new_prefixes(mut self, prefix: String) -> Self {
        self.prefixes.clear();
        self.prefixes.push_back(prefix);
        self
    }

    pub fn with_prefix(mut self, prefix: String) -> Self {
        self.prefixes.push_back(prefix);
        self
    }

    fn line(&self, level: Level, message: &str) -> String {
        let prefix = self.prefixes.iter().map(|p| format!("{} ", p)).collect::<String>();
        let line = format!("{}{}", prefix, message);
        if let Some(capture) = &self.capture {
            capture.push(level, line.clone());
        }
        line
    }

    pub fn info(&self, message: &str) {
        let line = self.line(Level::INFO, message);
        tracing::info!("{}", line);
    }

    pub fn error(&self, message: &str) {
        let line = self.line(Level::ERROR, message);
        tracing::error!("{}", line);
    }

    pub fn warn(&self, message: &str) {
        let line = self.line(Level::WARN, message);
        tracing::warn!("{}", line);
    }

    pub fn debug(&self, message: &str) {
        let line = self.line(Level::DEBUG, message);
        tracing::debug!("{}", line);
    }
}
