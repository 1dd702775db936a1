use crate::{ExportFailure, ExportOutcome, QuerySnapshot, RequestId, SearchFailure, SearchPage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked to track a company.
    CompanyAdded(String),
    /// User removed a tracked company.
    CompanyRemoved(String),
    /// User picked a time range, in days.
    TimeRangeSelected(u32),
    /// User toggled a discovered source.
    SourceToggled(String),
    /// User toggled a domain by canonical value.
    DomainToggled(String),
    /// Restore a previously persisted query.
    QueryRestored(QuerySnapshot),
    /// User started a fresh search from page 1.
    SearchClicked,
    /// User clicked a page number.
    PageRequested(u32),
    NextPageClicked,
    PrevPageClicked,
    /// User asked for the full result set as a file.
    ExportClicked,
    /// Engine finished a paginated search.
    SearchCompleted {
        request_id: RequestId,
        result: Result<SearchPage, SearchFailure>,
    },
    /// Engine finished an export.
    ExportCompleted {
        request_id: RequestId,
        result: Result<ExportOutcome, ExportFailure>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    NoOp,
}
