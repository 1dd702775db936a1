#![allow(dead_code)]

use std::sync::Once;

use news_core::{update, AppState, Article, Effect, Msg, RequestId, SearchPage};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(news_logging::initialize_for_tests);
}

pub fn article(page: u32, index: u32, source: &str) -> Article {
    Article {
        id: format!("p{page}-{index}"),
        title: format!("Acme story {page}.{index}"),
        description: format!("Description {page}.{index}"),
        url: format!("https://news.test/{page}/{index}"),
        published_at: "2024-03-05T14:30:00Z".to_string(),
        company: "Acme".to_string(),
        source: Some(source.to_string()),
    }
}

/// Builds page `page` of a 55-result, 3-page result set.
pub fn acme_page(page: u32) -> SearchPage {
    let count = if page == 3 { 15 } else { 20 };
    SearchPage {
        articles: (0..count)
            .map(|i| article(page, i, if i % 2 == 0 { "Reuters" } else { "AP" }))
            .collect(),
        sources: vec!["Reuters".to_string(), "AP".to_string()],
        total_pages: 3,
        total_results: 55,
    }
}

pub fn with_company(name: &str) -> AppState {
    let (state, _) = update(AppState::new(), Msg::CompanyAdded(name.to_string()));
    state
}

/// Extracts the request id of the single search effect.
pub fn search_id(effects: &[Effect]) -> RequestId {
    match effects {
        [Effect::Search { request_id, .. }] => *request_id,
        other => panic!("expected one search effect, got {other:?}"),
    }
}

pub fn complete(state: AppState, request_id: RequestId, page: SearchPage) -> AppState {
    let (state, effects) = update(
        state,
        Msg::SearchCompleted {
            request_id,
            result: Ok(page),
        },
    );
    assert!(effects.is_empty());
    state
}

/// Searches for Acme and lands on page 1 of the 3-page result set.
pub fn searched_acme() -> AppState {
    let state = with_company("Acme");
    let (state, effects) = update(state, Msg::SearchClicked);
    let id = search_id(&effects);
    complete(state, id, acme_page(1))
}
