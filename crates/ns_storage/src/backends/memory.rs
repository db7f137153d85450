use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use ns_core::{ArticleRecord, RecordSink, Result};

use crate::{OutputFormat, TableBackend};

/// Keeps the run's records in memory and writes them out through a
/// [`TableBackend`] when flushed.
pub struct TabularSink {
    records: Vec<ArticleRecord>,
    backend: Box<dyn TableBackend>,
}

impl TabularSink {
    pub fn new(backend: Box<dyn TableBackend>) -> Self {
        Self {
            records: Vec::new(),
            backend,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.backend.format()
    }
}

impl RecordSink for TabularSink {
    fn append(&mut self, record: ArticleRecord) {
        self.records.push(record);
    }

    fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    fn flush(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut out = BufWriter::new(File::create(path)?);
        self.backend.write_table(&self.records, &mut out)?;
        out.flush()?;
        Ok(())
    }
}
