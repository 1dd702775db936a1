//! News tracker engine: search backend client, export pipeline and effect execution.
mod engine;
mod export;
mod fetch;
mod filename;
mod persist;
mod types;

pub use engine::{Clock, EngineConfig, EngineError, EngineEvent, EngineHandle, ExportFormat};
pub use export::{
    build_export_records, export_all, export_request, format_published, CsvSpreadsheetWriter,
    ExportError, ExportRecord, ExportSummary, SpreadsheetWriter, XlsxSpreadsheetWriter,
    COLUMN_WIDTHS, PUBLISHED_FORMAT, SHEET_NAME, SOURCE_PLACEHOLDER,
};
pub use fetch::{ReqwestSearchClient, SearchClient, SearchSettings};
pub use filename::export_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use types::{
    ApiArticle, ApiSource, FailureKind, FetchError, RequestId, SearchData, SearchMetadata,
    SearchRequest, SearchResponse,
};
