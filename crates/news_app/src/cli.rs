//! Command-line options for the news tracker.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use news_engine::ExportFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFileFormat {
    Xlsx,
    Csv,
}

impl From<ExportFileFormat> for ExportFormat {
    fn from(format: ExportFileFormat) -> Self {
        match format {
            ExportFileFormat::Xlsx => ExportFormat::Xlsx,
            ExportFileFormat::Csv => ExportFormat::Csv,
        }
    }
}

/// Track news coverage for a set of companies from the terminal.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Base URL of the news search API
    #[arg(long, env = "NEWS_API_BASE", default_value = "https://news-dash-api.vercel.app")]
    pub api_base: String,

    /// Directory for exported spreadsheets and the saved query
    #[arg(short, long, env = "NEWS_OUTPUT_DIR", default_value = "exports")]
    pub output_dir: PathBuf,

    /// Spreadsheet format written by `export`
    #[arg(long, value_enum, default_value_t = ExportFileFormat::Xlsx)]
    pub export_format: ExportFileFormat,

    /// Offer the 7/30/90/180 day ranges instead of 7/14/21/30
    #[arg(long)]
    pub legacy_ranges: bool,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Minimum log level
    #[arg(long, value_enum, env = "NEWS_LOG_LEVEL", default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Start with an empty query instead of the saved one
    #[arg(long)]
    pub no_restore: bool,
}
