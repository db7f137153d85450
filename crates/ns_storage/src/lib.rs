use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use ns_core::{ArticleRecord, Error, Result};

pub mod backends;

pub use backends::*;

/// Column order of every tabular output.
pub const COLUMNS: [&str; 6] = [
    "title",
    "date",
    "description",
    "image_filename",
    "phrase_count",
    "contains_money",
];

/// Serializes a complete record sequence as one table.
pub trait TableBackend: Send + Sync {
    fn format(&self) -> OutputFormat;

    fn write_table(&self, records: &[ArticleRecord], out: &mut dyn Write) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    /// Picks the format from the file extension, if it names one we write.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::Storage(format!("Unsupported output format: {}", other))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

pub fn create_backend(format: OutputFormat) -> Box<dyn TableBackend> {
    match format {
        OutputFormat::Csv => Box::new(CsvBackend),
        OutputFormat::Json => Box::new(JsonBackend),
    }
}

pub fn create_sink(format: OutputFormat) -> TabularSink {
    TabularSink::new(create_backend(format))
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_sink, OutputFormat, TableBackend};
    pub use ns_core::RecordSink;
}
