use std::io::Write;

use ns_core::{ArticleRecord, Error, Result};
use serde::Serialize;

use crate::{OutputFormat, TableBackend, COLUMNS};

#[derive(Serialize)]
struct CsvRow<'a> {
    title: &'a str,
    date: String,
    description: &'a str,
    image_filename: &'a str,
    phrase_count: usize,
    contains_money: bool,
}

impl<'a> From<&'a ArticleRecord> for CsvRow<'a> {
    fn from(record: &'a ArticleRecord) -> Self {
        Self {
            title: &record.title,
            date: record.date.format("%Y-%m-%d").to_string(),
            description: &record.description,
            image_filename: record.image_filename.as_deref().unwrap_or_default(),
            phrase_count: record.phrase_count,
            contains_money: record.contains_money,
        }
    }
}

/// Comma-separated spreadsheet with a fixed header row.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvBackend;

impl TableBackend for CsvBackend {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn write_table(&self, records: &[ArticleRecord], out: &mut dyn Write) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(out);

        writer.write_record(COLUMNS).map_err(csv_error)?;
        for record in records {
            writer.serialize(CsvRow::from(record)).map_err(csv_error)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn csv_error(e: csv::Error) -> Error {
    Error::Storage(format!("Failed to write CSV row: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn render(records: &[ArticleRecord]) -> String {
        let mut buf = Vec::new();
        CsvBackend.write_table(records, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_only_when_empty() {
        assert_eq!(
            render(&[]),
            "title,date,description,image_filename,phrase_count,contains_money\n"
        );
    }

    #[test]
    fn test_rows() {
        let records = vec![
            ArticleRecord {
                title: "Fed holds rates".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
                description: "Markets shrug, $5 billion moves".to_string(),
                image_filename: Some("20240109_p01_00.jpg".to_string()),
                phrase_count: 2,
                contains_money: true,
            },
            ArticleRecord {
                title: "Quiet week".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                description: String::new(),
                image_filename: None,
                phrase_count: 0,
                contains_money: false,
            },
        ];

        let lines: Vec<String> = render(&records).lines().map(String::from).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "Fed holds rates,2024-01-09,\"Markets shrug, $5 billion moves\",20240109_p01_00.jpg,2,true"
        );
        assert_eq!(lines[2], "Quiet week,2024-01-02,,,0,false");
    }
}
