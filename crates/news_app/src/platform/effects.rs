use std::path::PathBuf;

use news_core::{
    Article, Effect, ExportFailure, ExportOutcome, Msg, QuerySnapshot, RequestId, SearchFailure,
    SearchPage,
};
use news_engine::{
    export_request, ApiArticle, EngineConfig, EngineError, EngineEvent, EngineHandle,
    ExportError, ExportSummary, FetchError, SearchRequest, SearchResponse,
};
use news_logging::news_error;

use super::persistence;

/// Executes core effects and turns engine completions back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    output_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(config: EngineConfig) -> Self {
        let output_dir = config.output_dir.clone();
        Self {
            engine: EngineHandle::new(config),
            output_dir,
        }
    }

    /// Starts every effect. Returns failed completions for requests the
    /// engine could not accept, so their pending slots are released.
    pub fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        effects
            .into_iter()
            .filter_map(|effect| self.run_one(effect))
            .collect()
    }

    fn run_one(&self, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::Search {
                request_id,
                query,
                page,
                page_size,
            } => self
                .engine
                .search(request_id, search_request(query, page, page_size))
                .err()
                .map(|err| search_not_started(request_id, err)),
            Effect::Export {
                request_id,
                query,
                page_size,
            } => {
                let request = export_request(
                    query.companies,
                    query.time_range_days,
                    query.sources,
                    query.domains,
                    page_size,
                );
                self.engine
                    .export(request_id, request)
                    .err()
                    .map(|err| export_not_started(request_id, err))
            }
            Effect::PersistQuery(query) => {
                persistence::save_query(&self.output_dir, &query);
                None
            }
        }
    }

    /// Drains every completion that has arrived so far.
    pub fn poll(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(map_event)
            .collect()
    }
}

fn search_request(query: QuerySnapshot, page: u32, page_size: u32) -> SearchRequest {
    SearchRequest {
        companies: query.companies,
        time_range: query.time_range_days,
        sources: query.sources,
        domains: query.domains,
        page,
        page_size,
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SearchCompleted { request_id, result } => Msg::SearchCompleted {
            request_id,
            result: result.map(search_page).map_err(search_failure),
        },
        EngineEvent::ExportCompleted { request_id, result } => Msg::ExportCompleted {
            request_id,
            result: result.map(export_outcome).map_err(export_failure),
        },
    }
}

fn search_page(response: SearchResponse) -> SearchPage {
    let data = response.data;
    SearchPage {
        articles: data.articles.iter().map(article).collect(),
        sources: data.metadata.sources,
        total_pages: data.metadata.total_pages,
        total_results: data.metadata.total_results,
    }
}

fn article(api: &ApiArticle) -> Article {
    Article {
        id: api.identity(),
        title: api.title().to_string(),
        description: api.description().to_string(),
        url: api.url().to_string(),
        published_at: api.published_at().to_string(),
        company: api.company().to_string(),
        source: api.source_name().map(str::to_string),
    }
}

fn search_not_started(request_id: RequestId, err: EngineError) -> Msg {
    news_error!("Search request_id={} not started: {}", request_id, err);
    Msg::SearchCompleted {
        request_id,
        result: Err(SearchFailure {
            server_message: None,
        }),
    }
}

fn export_not_started(request_id: RequestId, err: EngineError) -> Msg {
    news_error!("Export request_id={} not started: {}", request_id, err);
    Msg::ExportCompleted {
        request_id,
        result: Err(ExportFailure {
            message: err.to_string(),
        }),
    }
}

fn search_failure(err: FetchError) -> SearchFailure {
    SearchFailure {
        server_message: err.server_message,
    }
}

fn export_outcome(summary: ExportSummary) -> ExportOutcome {
    ExportOutcome {
        path: summary.path,
        records: summary.records,
    }
}

fn export_failure(err: ExportError) -> ExportFailure {
    let message = match err {
        ExportError::Fetch(FetchError {
            server_message: Some(message),
            ..
        }) => message,
        other => other.to_string(),
    };
    ExportFailure { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use news_core::{update, AppState, GENERIC_SEARCH_ERROR};
    use news_engine::{FailureKind, SearchData, SearchMetadata};

    fn api_article(json: &str) -> ApiArticle {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn response_maps_to_core_page() {
        let response = SearchResponse {
            data: SearchData {
                articles: vec![api_article(
                    r#"{"title":"Acme up","url":"https://news.test/1","publishedAt":"2024-03-05T14:30:00Z","company":"Acme","source":{"name":"AP"}}"#,
                )],
                metadata: SearchMetadata {
                    sources: vec!["AP".into()],
                    total_pages: 1,
                    total_results: 1,
                },
            },
        };
        let page = search_page(response);
        assert_eq!(page.total_results, 1);
        assert_eq!(page.articles[0].id, "https://news.test/1");
        assert_eq!(page.articles[0].source.as_deref(), Some("AP"));
        assert_eq!(page.articles[0].description, "");
    }

    #[test]
    fn null_article_fields_map_to_empty_text() {
        let mapped = article(&api_article(
            r#"{"id":"a-1","title":null,"url":null,"publishedAt":null,"company":null,"source":{"name":null}}"#,
        ));
        assert_eq!(mapped.id, "a-1");
        assert_eq!(mapped.title, "");
        assert_eq!(mapped.url, "");
        assert_eq!(mapped.published_at, "");
        assert_eq!(mapped.source, None);
    }

    #[test]
    fn refused_search_releases_loading_with_generic_banner() {
        let (state, _) = update(AppState::new(), Msg::CompanyAdded("Acme".into()));
        let (state, effects) = update(state, Msg::SearchClicked);
        let request_id = match effects[..] {
            [Effect::Search { request_id, .. }] => request_id,
            _ => panic!("expected a search effect"),
        };
        assert!(state.is_loading());

        let (state, _) = update(state, search_not_started(request_id, EngineError::Stopped));
        assert!(!state.is_loading());
        assert_eq!(state.view().error.as_deref(), Some(GENERIC_SEARCH_ERROR));
    }

    #[test]
    fn refused_export_is_reported_as_failed() {
        let msg = export_not_started(4, EngineError::Stopped);
        assert_eq!(
            msg,
            Msg::ExportCompleted {
                request_id: 4,
                result: Err(ExportFailure {
                    message: "engine worker is not running".into(),
                }),
            }
        );
    }

    #[test]
    fn export_failure_prefers_server_message() {
        let mut fetch = FetchError {
            kind: FailureKind::HttpStatus(503),
            message: "503 Service Unavailable".into(),
            server_message: Some("Upstream unavailable".into()),
        };
        assert_eq!(
            export_failure(ExportError::Fetch(fetch.clone())).message,
            "Upstream unavailable"
        );
        fetch.server_message = None;
        assert_eq!(
            export_failure(ExportError::Fetch(fetch)).message,
            "export fetch failed: http status 503: 503 Service Unavailable"
        );
    }
}
