use std::path::Path;

use crate::types::ArticleRecord;
use crate::Result;

/// Ordered, append-only collection of the records produced by one run.
pub trait RecordSink: Send {
    /// Append a record after everything appended before it
    fn append(&mut self, record: ArticleRecord);

    /// All records so far, in append order
    fn records(&self) -> &[ArticleRecord];

    /// Write every record to `path` as a single table, replacing any existing file
    fn flush(&self, path: &Path) -> Result<()>;

    fn len(&self) -> usize {
        self.records().len()
    }

    fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}
