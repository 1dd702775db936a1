use crate::{QuerySnapshot, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch one page of results for `query`.
    Search {
        request_id: RequestId,
        query: QuerySnapshot,
        page: u32,
        page_size: u32,
    },
    /// Fetch the whole matching set on a single page and write it to a file.
    Export {
        request_id: RequestId,
        query: QuerySnapshot,
        page_size: u32,
    },
    /// The tracked query changed and should be saved.
    PersistQuery(QuerySnapshot),
}
