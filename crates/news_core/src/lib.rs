//! News tracker core: pure query/pagination state machine and view-model helpers.
mod effect;
mod filter;
mod msg;
mod page_window;
mod query;
mod results;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use filter::{filter_by_source, source_matches};
pub use msg::Msg;
pub use page_window::{compute_window, PageToken, FULL_RUN_LIMIT, INTERIOR_WINDOW};
pub use query::{DomainOption, QueryOptions, QuerySnapshot, QueryState, DEFAULT_PAGE_SIZE};
pub use results::{Article, PageMetadata, ResultState, SearchPage};
pub use state::{
    AppState, ExportFailure, ExportOutcome, ExportStatus, RequestId, SearchFailure,
    SessionConfig, StaleResultsPolicy, GENERIC_SEARCH_ERROR,
};
pub use update::update;
pub use view_model::{fallback_search_url, AppViewModel, ArticleRowView, ChoiceView};
