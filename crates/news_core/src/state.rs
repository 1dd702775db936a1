use std::path::PathBuf;

use crate::query::{QueryOptions, QueryState, DEFAULT_PAGE_SIZE};
use crate::results::ResultState;

/// Banner text used when the backend gives no reason of its own.
pub const GENERIC_SEARCH_ERROR: &str = "Failed to fetch news articles";

/// Monotonic token identifying one outgoing request.
pub type RequestId = u64;

/// What happens to the displayed results when a paginated search fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaleResultsPolicy {
    /// Keep showing the last successful page next to the error banner.
    #[default]
    Retain,
    /// Blank the result state on failure.
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub query: QueryOptions,
    pub page_size: u32,
    pub on_search_error: StaleResultsPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            query: QueryOptions::default(),
            page_size: DEFAULT_PAGE_SIZE,
            on_search_error: StaleResultsPolicy::default(),
        }
    }
}

/// Why a paginated search failed, as far as the user needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchFailure {
    pub server_message: Option<String>,
}

impl SearchFailure {
    pub fn banner(&self) -> String {
        self.server_message
            .as_deref()
            .map(str::trim)
            .filter(|msg| !msg.is_empty())
            .unwrap_or(GENERIC_SEARCH_ERROR)
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub records: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFailure {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExportStatus {
    #[default]
    Idle,
    Exporting,
    Done(ExportOutcome),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingSearch {
    pub(crate) request_id: RequestId,
    pub(crate) page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub(crate) config: SessionConfig,
    pub(crate) query: QueryState,
    pub(crate) results: ResultState,
    pub(crate) error: Option<String>,
    pub(crate) pending_search: Option<PendingSearch>,
    pub(crate) pending_export: Option<RequestId>,
    pub(crate) export_status: ExportStatus,
    next_request_id: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            query: QueryState::new(config.query.clone()),
            results: ResultState::new(config.page_size),
            error: None,
            pending_search: None,
            pending_export: None,
            export_status: ExportStatus::Idle,
            next_request_id: 1,
            dirty: false,
            config,
        }
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn results(&self) -> &ResultState {
        &self.results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending_search.is_some()
    }

    pub fn is_exporting(&self) -> bool {
        self.pending_export.is_some()
    }

    pub fn export_status(&self) -> &ExportStatus {
        &self.export_status
    }

    pub fn page_size(&self) -> u32 {
        self.config.page_size
    }

    pub fn can_search(&self) -> bool {
        self.query.has_companies()
    }

    pub fn can_export(&self) -> bool {
        self.query.has_companies() && self.results.metadata().total_results > 0
    }

    /// Returns and clears the render flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn allocate_request_id(&mut self) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
