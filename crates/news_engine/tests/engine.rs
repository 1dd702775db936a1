use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use news_engine::{
    export_request, EngineEvent, EngineHandle, ExportFormat, ReqwestSearchClient, SearchRequest,
    SearchSettings,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page_body(page: u32, count: u32) -> serde_json::Value {
    json!({
        "data": {
            "articles": (0..count).map(|i| json!({
                "id": format!("p{page}-{i}"),
                "title": format!("Story {page}.{i}"),
                "url": format!("https://news.test/{page}/{i}"),
                "publishedAt": "2024-03-05T14:30:00Z",
                "company": "Acme",
                "source": { "name": "AP" }
            })).collect::<Vec<_>>(),
            "metadata": { "sources": ["AP"], "totalPages": 3, "totalResults": 55 }
        }
    })
}

fn search_request(page: u32) -> SearchRequest {
    SearchRequest {
        companies: vec!["Acme".into()],
        time_range: 7,
        sources: Vec::new(),
        domains: Vec::new(),
        page,
        page_size: 20,
    }
}

async fn collect_events(engine: &EngineHandle, count: usize) -> Vec<EngineEvent> {
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut events = Vec::new();
    while events.len() < count && Instant::now() < deadline {
        match engine.try_recv() {
            Some(event) => events.push(event),
            None => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    events
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_commands_complete_with_their_own_ids() {
    news_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/news"))
        .and(body_partial_json(json!({ "page": 1, "pageSize": 20 })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_json(page_body(1, 20)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/news"))
        .and(body_partial_json(json!({ "page": 2, "pageSize": 20 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(2, 20)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/news"))
        .and(body_partial_json(json!({ "page": 1, "pageSize": 55 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 55)))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let client = Arc::new(ReqwestSearchClient::new(SearchSettings::with_base_url(
        server.uri(),
    )));
    let writer = ExportFormat::Xlsx.writer(temp.path().to_path_buf());
    let clock = Arc::new(|| Utc.timestamp_millis_opt(42).unwrap());
    let engine = EngineHandle::with_workers(client, writer, clock);

    engine.search(1, search_request(1)).expect("queued");
    engine.search(2, search_request(2)).expect("queued");
    engine
        .export(3, export_request(vec!["Acme".into()], 7, Vec::new(), Vec::new(), 55))
        .expect("queued");

    let events = collect_events(&engine, 3).await;
    assert_eq!(events.len(), 3);

    // The slow first page answers last.
    match events.last() {
        Some(EngineEvent::SearchCompleted { request_id, result }) => {
            assert_eq!(*request_id, 1);
            assert_eq!(result.as_ref().unwrap().data.articles.len(), 20);
        }
        other => panic!("unexpected last event {other:?}"),
    }

    let export = events
        .iter()
        .find_map(|event| match event {
            EngineEvent::ExportCompleted { request_id: 3, result } => Some(result),
            _ => None,
        })
        .expect("export event");
    let summary = export.as_ref().expect("export ok");
    assert_eq!(summary.records, 55);
    assert_eq!(
        summary.path,
        temp.path().join("news_results_Acme_42.xlsx")
    );
    assert!(summary.path.is_file());
}
