//! CSV list and error report output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use tracing::info;

use crate::dataset::{Dataset, ErrorLog};
use crate::error::{RcptError, Result};
use crate::models::config::HeaderStyle;
use crate::models::record::Record;

/// UTF-8 byte-order mark, so spreadsheet tools detect the encoding.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Current local time rendered with a `chrono` strftime format.
pub fn report_timestamp(format: &str) -> Result<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(RcptError::Config(format!("invalid timestamp format: {format}")));
    }
    Ok(Local::now().format_with_items(items.into_iter()).to_string())
}

/// Write records as CSV (header plus one row per record), preceded by a BOM.
pub fn write_records<W: Write>(
    mut writer: W,
    records: &[Record],
    header_style: HeaderStyle,
) -> Result<()> {
    writer.write_all(UTF8_BOM)?;

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header_style.headers())?;
    for record in records {
        wtr.write_record(record.to_row())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the error log, preceded by a BOM.
pub fn write_error_log<W: Write>(mut writer: W, log: &ErrorLog) -> Result<()> {
    writer.write_all(UTF8_BOM)?;
    writer.write_all(log.render().as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Writes the artifacts of one run into a folder, sharing one timestamp.
pub struct ReportWriter {
    dir: PathBuf,
    timestamp: String,
    header_style: HeaderStyle,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>, timestamp: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            timestamp: timestamp.into(),
            header_style: HeaderStyle::default(),
        }
    }

    /// Set the header row of the CSV list.
    pub fn with_header_style(mut self, header_style: HeaderStyle) -> Self {
        self.header_style = header_style;
        self
    }

    /// Writer stamped with the current local time.
    pub fn now(dir: impl Into<PathBuf>, timestamp_format: &str) -> Result<Self> {
        Ok(Self::new(dir, report_timestamp(timestamp_format)?))
    }

    pub fn list_path(&self) -> PathBuf {
        self.dir.join(format!("list_{}.csv", self.timestamp))
    }

    pub fn error_path(&self) -> PathBuf {
        self.dir.join(format!("error_{}.txt", self.timestamp))
    }

    /// Write `list_<timestamp>.csv`.
    pub fn write_list(&self, dataset: &Dataset) -> Result<PathBuf> {
        let path = self.list_path();
        write_records(create(&path)?, &dataset.records, self.header_style)?;
        info!("Wrote {} records to {}", dataset.len(), path.display());
        Ok(path)
    }

    /// Write `error_<timestamp>.txt` if any document fully failed.
    pub fn write_errors(&self, log: &ErrorLog) -> Result<Option<PathBuf>> {
        if log.is_empty() {
            return Ok(None);
        }
        let path = self.error_path();
        write_error_log(create(&path)?, log)?;
        info!("Wrote {} failed documents to {}", log.len(), path.display());
        Ok(Some(path))
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}
