//! Export of batch rows as CSV, JSON, JSON Lines or a plain-text report,
//! plus single-field plain-text blobs.

use serde::Serialize;
use std::io::{self, Write};

use crate::error::MicrostockError;
use crate::types::{BatchRow, MetadataRecord};

/// CSV header expected by stock agency upload forms.
pub const CSV_HEADER: [&str; 4] = ["Filename", "Title", "Description", "Keywords"];

/// Separator between keywords in CSV and text output.
pub const KEYWORD_SEPARATOR: &str = ", ";

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// `Filename,Title,Description,Keywords` with a header row
    Csv,
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
    /// Human-readable blocks, one per image
    Text,
}

impl ExportFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            "txt" | "text" => Some(Self::Text),
            _ => None,
        }
    }
}

/// One field of a record, for standalone plain-text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    Title,
    Description,
    Keywords,
}

impl MetadataField {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "title" => Some(Self::Title),
            "description" => Some(Self::Description),
            "keywords" => Some(Self::Keywords),
            _ => None,
        }
    }
}

/// The chosen field as a plain-text blob. Keywords are comma-separated.
pub fn plain_text(record: &MetadataRecord, field: MetadataField) -> String {
    match field {
        MetadataField::Title => record.title.clone(),
        MetadataField::Description => record.description.clone(),
        MetadataField::Keywords => record.keywords.join(KEYWORD_SEPARATOR),
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Filename")]
    filename: &'a str,
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Keywords")]
    keywords: String,
}

impl<'a> From<&'a BatchRow> for CsvRow<'a> {
    fn from(row: &'a BatchRow) -> Self {
        Self {
            filename: &row.filename,
            title: &row.record.title,
            description: &row.record.description,
            keywords: row.record.keywords.join(KEYWORD_SEPARATOR),
        }
    }
}

/// A writer that serializes batch rows in one of the export formats.
pub struct ExportWriter<W: Write> {
    writer: W,
    format: ExportFormat,
    pretty: bool,
    rows_written: usize,
}

impl<W: Write> ExportWriter<W> {
    /// Create a new export writer.
    ///
    /// # Arguments
    ///
    /// * `writer` - The underlying writer (file, stdout, etc.)
    /// * `format` - Export format
    /// * `pretty` - Whether to pretty-print JSON (only affects JSON format)
    pub fn new(writer: W, format: ExportFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            rows_written: 0,
        }
    }

    /// Write all rows in the configured format.
    ///
    /// CSV always carries the header, even for an empty batch.
    pub fn write_rows(&mut self, rows: &[BatchRow]) -> Result<(), MicrostockError> {
        match self.format {
            ExportFormat::Csv => {
                let mut csv = csv::WriterBuilder::new()
                    .has_headers(false)
                    .from_writer(&mut self.writer);
                csv.write_record(CSV_HEADER)?;
                for row in rows {
                    csv.serialize(CsvRow::from(row))?;
                }
                csv.flush()?;
            }
            ExportFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, rows)?;
                } else {
                    serde_json::to_writer(&mut self.writer, rows)?;
                }
                writeln!(self.writer)?;
            }
            ExportFormat::JsonLines => {
                // JSONL is never pretty-printed (one object per line)
                for row in rows {
                    serde_json::to_writer(&mut self.writer, row)?;
                    writeln!(self.writer)?;
                }
            }
            ExportFormat::Text => {
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        writeln!(self.writer)?;
                    }
                    write_text_block(&mut self.writer, row)?;
                }
            }
        }
        self.rows_written += rows.len();
        Ok(())
    }

    /// Write one field of each row as plain text, one blob per line.
    pub fn write_field(&mut self, rows: &[BatchRow], field: MetadataField) -> io::Result<()> {
        for row in rows {
            writeln!(self.writer, "{}", plain_text(&row.record, field))?;
        }
        self.rows_written += rows.len();
        Ok(())
    }

    /// Get the number of rows written.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn write_text_block<W: Write>(writer: &mut W, row: &BatchRow) -> io::Result<()> {
    writeln!(writer, "{}", row.filename)?;
    writeln!(writer, "Title: {}", row.record.title)?;
    writeln!(writer, "Description: {}", row.record.description)?;
    writeln!(
        writer,
        "Keywords ({}): {}",
        row.record.keywords.len(),
        row.record.keywords.join(KEYWORD_SEPARATOR)
    )
}

/// Convenience function to render rows as a CSV string.
pub fn to_csv(rows: &[BatchRow]) -> Result<String, MicrostockError> {
    let mut writer = ExportWriter::new(Vec::new(), ExportFormat::Csv, false);
    writer.write_rows(rows)?;
    String::from_utf8(writer.into_inner())
        .map_err(|e| MicrostockError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(filename: &str, title: &str, keywords: &[&str]) -> BatchRow {
        BatchRow {
            filename: filename.to_string(),
            record: MetadataRecord {
                title: title.to_string(),
                title_candidates: vec![title.to_string(), "Alt".to_string()],
                description: format!("About {title}, with commas, and \"quotes\"."),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            },
        }
    }

    #[test]
    fn test_csv_header_and_quoting() {
        let csv = to_csv(&[row("a.jpg", "Blue Waves", &["abstract", "blue"])]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Filename,Title,Description,Keywords"));
        let line = lines.next().unwrap();
        assert!(line.starts_with("a.jpg,Blue Waves,"));
        assert!(line.ends_with("\"abstract, blue\""));
        assert!(line.contains("\"\"quotes\"\""));
    }

    #[test]
    fn test_csv_roundtrips_through_reader() {
        let rows = vec![
            row("a.jpg", "One", &["x", "y"]),
            row("b.png", "Two", &["z"]),
        ];
        let csv = to_csv(&rows).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[1][0], "b.png");
        assert_eq!(&records[0][3], "x, y");
    }

    #[test]
    fn test_empty_csv_has_header() {
        assert_eq!(to_csv(&[]).unwrap(), "Filename,Title,Description,Keywords\n");
    }

    #[test]
    fn test_write_json_array() {
        let mut writer = ExportWriter::new(Vec::new(), ExportFormat::Json, false);
        writer.write_rows(&[row("a.jpg", "One", &["x"])]).unwrap();
        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert!(output.starts_with('['));
        assert!(output.contains("\"filename\":\"a.jpg\""));
        assert!(output.contains("\"title_candidates\":[\"One\",\"Alt\"]"));
    }

    #[test]
    fn test_write_jsonl() {
        let mut writer = ExportWriter::new(Vec::new(), ExportFormat::JsonLines, true);
        writer
            .write_rows(&[row("a.jpg", "One", &["x"]), row("b.jpg", "Two", &["y"])])
            .unwrap();
        assert_eq!(writer.rows_written(), 2);
        let output = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("\"Two\""));
    }

    #[test]
    fn test_write_text_blocks() {
        let mut writer = ExportWriter::new(Vec::new(), ExportFormat::Text, false);
        writer
            .write_rows(&[row("a.jpg", "One", &["x", "y"]), row("b.jpg", "Two", &[])])
            .unwrap();
        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert!(output.starts_with("a.jpg\nTitle: One\n"));
        assert!(output.contains("Keywords (2): x, y\n\nb.jpg\n"));
    }

    #[test]
    fn test_plain_text_fields() {
        let r = row("a.jpg", "One", &["x", "y"]);
        assert_eq!(plain_text(&r.record, MetadataField::Title), "One");
        assert_eq!(plain_text(&r.record, MetadataField::Keywords), "x, y");
        assert!(plain_text(&r.record, MetadataField::Description).starts_with("About One"));

        let mut writer = ExportWriter::new(Vec::new(), ExportFormat::Csv, false);
        writer.write_field(&[r.clone(), r], MetadataField::Title).unwrap();
        assert_eq!(String::from_utf8(writer.into_inner()).unwrap(), "One\nOne\n");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(ExportFormat::parse("csv"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("json"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::parse("JSONL"), Some(ExportFormat::JsonLines));
        assert_eq!(ExportFormat::parse("txt"), Some(ExportFormat::Text));
        assert_eq!(ExportFormat::parse("invalid"), None);
        assert_eq!(MetadataField::parse("Keywords"), Some(MetadataField::Keywords));
        assert_eq!(MetadataField::parse("tags"), None);
    }
}
