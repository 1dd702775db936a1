use news_logging::{news_debug, news_info, news_warn};

use crate::state::PendingSearch;
use crate::{AppState, Effect, ExportStatus, Msg, StaleResultsPolicy};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::CompanyAdded(name) => {
            if state.query.add_company(&name) {
                query_changed(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::CompanyRemoved(name) => {
            if state.query.remove_company(&name) {
                query_changed(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::TimeRangeSelected(days) => {
            if state.query.time_range_days() != days && state.query.set_time_range(days) {
                query_changed(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::DomainToggled(value) => {
            if state.query.toggle_domain(&value) {
                query_changed(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::SourceToggled(name) => {
            // Sources only narrow the held page until the next search.
            state.query.toggle_source(&name);
            state.mark_dirty();
            Vec::new()
        }
        Msg::QueryRestored(snapshot) => {
            state.query.restore(&snapshot);
            state.mark_dirty();
            Vec::new()
        }
        Msg::SearchClicked => start_search(&mut state, 1),
        Msg::PageRequested(page) => go_to_page(&mut state, page),
        Msg::NextPageClicked => {
            let current = state.results.metadata().current_page;
            go_to_page(&mut state, current.saturating_add(1))
        }
        Msg::PrevPageClicked => {
            let current = state.results.metadata().current_page;
            go_to_page(&mut state, current.saturating_sub(1))
        }
        Msg::ExportClicked => start_export(&mut state),
        Msg::SearchCompleted { request_id, result } => {
            let pending = match state.pending_search {
                Some(pending) if pending.request_id == request_id => pending,
                _ => {
                    news_debug!("Discarding stale search response request_id={}", request_id);
                    return (state, Vec::new());
                }
            };
            state.pending_search = None;
            match result {
                Ok(page) => {
                    state.results.replace(pending.page, page);
                }
                Err(failure) => {
                    let banner = failure.banner();
                    news_warn!(
                        "Search request_id={} page={} failed: {}",
                        request_id,
                        pending.page,
                        banner
                    );
                    state.error = Some(banner);
                    if state.config.on_search_error == StaleResultsPolicy::Clear {
                        state.results.clear();
                    }
                }
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::ExportCompleted { request_id, result } => {
            if state.pending_export != Some(request_id) {
                news_debug!("Discarding stale export response request_id={}", request_id);
                return (state, Vec::new());
            }
            state.pending_export = None;
            state.export_status = match result {
                Ok(outcome) => {
                    news_info!(
                        "Export request_id={} wrote {} records to {:?}",
                        request_id,
                        outcome.records,
                        outcome.path
                    );
                    ExportStatus::Done(outcome)
                }
                Err(failure) => {
                    news_warn!("Export request_id={} failed: {}", request_id, failure.message);
                    ExportStatus::Failed(failure.message)
                }
            };
            state.mark_dirty();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn query_changed(state: &mut AppState) -> Vec<Effect> {
    state.mark_dirty();
    vec![Effect::PersistQuery(state.query.snapshot())]
}

fn start_search(state: &mut AppState, page: u32) -> Vec<Effect> {
    if !state.can_search() || page == 0 {
        return Vec::new();
    }
    let request_id = state.allocate_request_id();
    // A newer search supersedes any outstanding one; its response is dropped on arrival.
    state.pending_search = Some(PendingSearch { request_id, page });
    state.error = None;
    state.mark_dirty();

    let query = state.query.snapshot();
    news_info!(
        "Search request_id={} page={} companies={}",
        request_id,
        page,
        query.companies.len()
    );
    vec![Effect::Search {
        request_id,
        query,
        page,
        page_size: state.page_size(),
    }]
}

fn go_to_page(state: &mut AppState, page: u32) -> Vec<Effect> {
    let meta = state.results.metadata();
    if page < 1 || page > meta.total_pages || page == meta.current_page {
        return Vec::new();
    }
    start_search(state, page)
}

fn start_export(state: &mut AppState) -> Vec<Effect> {
    if !state.can_export() {
        return Vec::new();
    }
    let request_id = state.allocate_request_id();
    state.pending_export = Some(request_id);
    state.export_status = ExportStatus::Exporting;
    state.mark_dirty();

    vec![Effect::Export {
        request_id,
        query: state.query.snapshot(),
        page_size: state.results.metadata().total_results,
    }]
}
