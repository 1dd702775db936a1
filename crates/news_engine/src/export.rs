use std::fmt::Display;
use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde::Serialize;

use crate::filename::export_filename;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::{ApiArticle, FetchError, SearchClient, SearchRequest};

/// Written in the Source column when an article carries no source name.
pub const SOURCE_PLACEHOLDER: &str = "N/A";

/// Display format for publication timestamps, e.g. `Mar 5, 2024, 02:30 PM`.
pub const PUBLISHED_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

/// Name of the single worksheet in an xlsx export.
pub const SHEET_NAME: &str = "News Results";

/// Column widths in characters, in `ExportRecord::HEADERS` order.
pub const COLUMN_WIDTHS: [f64; 6] = [40.0, 60.0, 20.0, 20.0, 20.0, 50.0];

/// Longest text a single xlsx cell accepts.
const MAX_CELL_CHARS: usize = 32_767;

/// One flat spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportRecord {
    pub title: String,
    pub description: String,
    pub company: String,
    pub source: String,
    pub published_date: String,
    #[serde(rename = "URL")]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub records: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("export fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("xlsx error: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Turns a list of records into a downloadable file.
pub trait SpreadsheetWriter: Send + Sync {
    /// File extension without the dot, used to name the export.
    fn extension(&self) -> &'static str;

    fn write(&self, filename: &str, records: &[ExportRecord]) -> Result<PathBuf, ExportError>;
}

/// Writes records as a single-sheet xlsx workbook with a bold header row.
#[derive(Debug, Clone)]
pub struct XlsxSpreadsheetWriter {
    output_dir: PathBuf,
}

impl XlsxSpreadsheetWriter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    fn workbook_bytes(records: &[ExportRecord]) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;
        for (col, (title, width)) in ExportRecord::HEADERS
            .iter()
            .zip(COLUMN_WIDTHS)
            .enumerate()
        {
            let col = col as u16;
            sheet.set_column_width(col, width)?;
            sheet.write_string_with_format(0, col, *title, &header)?;
        }
        for (row, record) in (1u32..).zip(records) {
            for (col, value) in record.cells().into_iter().enumerate() {
                sheet.write_string(row, col as u16, cell_text(value))?;
            }
        }
        workbook.save_to_buffer()
    }
}

impl SpreadsheetWriter for XlsxSpreadsheetWriter {
    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn write(&self, filename: &str, records: &[ExportRecord]) -> Result<PathBuf, ExportError> {
        let bytes = Self::workbook_bytes(records)?;
        let path = AtomicFileWriter::new(self.output_dir.clone()).write(filename, &bytes)?;
        Ok(path)
    }
}

fn cell_text(value: &str) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}

/// Writes records as CSV with a header row into a fixed directory.
#[derive(Debug, Clone)]
pub struct CsvSpreadsheetWriter {
    output_dir: PathBuf,
}

impl CsvSpreadsheetWriter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }
}

impl SpreadsheetWriter for CsvSpreadsheetWriter {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn write(&self, filename: &str, records: &[ExportRecord]) -> Result<PathBuf, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        if records.is_empty() {
            writer.write_record(ExportRecord::HEADERS)?;
        }
        for record in records {
            writer.serialize(record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| ExportError::Persist(PersistError::Io(err.into_error())))?;
        let path = AtomicFileWriter::new(self.output_dir.clone()).write(filename, &bytes)?;
        Ok(path)
    }
}

impl ExportRecord {
    pub const HEADERS: [&'static str; 6] = [
        "Title",
        "Description",
        "Company",
        "Source",
        "PublishedDate",
        "URL",
    ];

    /// Cell values in `HEADERS` order.
    pub fn cells(&self) -> [&str; 6] {
        [
            &self.title,
            &self.description,
            &self.company,
            &self.source,
            &self.published_date,
            &self.url,
        ]
    }

    pub fn from_article<Tz>(article: &ApiArticle, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            title: article.title().to_string(),
            description: article.description().to_string(),
            company: article.company().to_string(),
            source: article
                .source_name()
                .unwrap_or(SOURCE_PLACEHOLDER)
                .to_string(),
            published_date: format_published(article.published_at(), tz),
            url: article.url().to_string(),
        }
    }
}

/// Formats an RFC 3339 timestamp in `tz`, or returns the input untouched if it
/// does not parse.
pub fn format_published<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(parsed) => parsed
            .with_timezone(tz)
            .format(PUBLISHED_FORMAT)
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

pub fn build_export_records<Tz>(articles: &[ApiArticle], tz: &Tz) -> Vec<ExportRecord>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    articles
        .iter()
        .map(|article| ExportRecord::from_article(article, tz))
        .collect()
}

/// Fetches the full matching set in one page and writes it out.
///
/// This is an independent query execution: the result reflects the data at
/// export time, not whatever pages were fetched before.
pub async fn export_all<Tz>(
    client: &dyn SearchClient,
    writer: &dyn SpreadsheetWriter,
    request: &SearchRequest,
    generated_at: DateTime<Utc>,
    tz: &Tz,
) -> Result<ExportSummary, ExportError>
where
    Tz: TimeZone + Sync,
    Tz::Offset: Display,
{
    let response = client.search(request).await?;
    let records = build_export_records(&response.data.articles, tz);
    let filename = export_filename(&request.companies, generated_at, writer.extension());
    let path = writer.write(&filename, &records)?;
    Ok(ExportSummary {
        path,
        records: records.len(),
    })
}

/// Builds the single-page request used for an export of `total_results` items.
pub fn export_request(
    companies: Vec<String>,
    time_range: u32,
    sources: Vec<String>,
    domains: Vec<String>,
    total_results: u32,
) -> SearchRequest {
    SearchRequest {
        companies,
        time_range,
        sources,
        domains,
        page: 1,
        page_size: total_results.max(1),
    }
}
