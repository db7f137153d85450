use std::io::Write;

use ns_core::{ArticleRecord, Result};

use crate::{OutputFormat, TableBackend};

/// Pretty-printed JSON array using the same field names as the CSV header.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBackend;

impl TableBackend for JsonBackend {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn write_table(&self, records: &[ArticleRecord], out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, records)?;
        out.write_all(b"\n")?;
        Ok(())
    }
}
