use std::time::Duration;

use news_engine::{FailureKind, ReqwestSearchClient, SearchClient, SearchRequest, SearchSettings};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(page: u32) -> SearchRequest {
    SearchRequest {
        companies: vec!["Acme".to_string()],
        time_range: 7,
        sources: Vec::new(),
        domains: vec!["yahoo.com".to_string()],
        page,
        page_size: 20,
    }
}

fn client_for(server: &MockServer) -> ReqwestSearchClient {
    ReqwestSearchClient::new(SearchSettings::with_base_url(server.uri()))
}

#[tokio::test]
async fn search_posts_camel_case_body_and_decodes_page() {
    news_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/news"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "companies": ["Acme"],
            "timeRange": 7,
            "sources": [],
            "domains": ["yahoo.com"],
            "page": 2,
            "pageSize": 20
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "articles": [
                    {
                        "id": 17,
                        "title": "Acme beats estimates",
                        "description": "Quarterly results",
                        "url": "https://news.test/a",
                        "publishedAt": "2024-03-05T14:30:00Z",
                        "company": "Acme",
                        "source": { "id": null, "name": "Reuters" }
                    },
                    {
                        "title": "Acme hires",
                        "description": null,
                        "url": "https://news.test/b",
                        "publishedAt": "2024-03-04T09:00:00Z",
                        "company": "Acme"
                    }
                ],
                "metadata": { "sources": ["Reuters"], "totalPages": 3, "totalResults": 55 }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server).search(&request(2)).await.expect("search ok");
    let data = response.data;
    assert_eq!(data.metadata.total_pages, 3);
    assert_eq!(data.metadata.total_results, 55);
    assert_eq!(data.metadata.sources, vec!["Reuters".to_string()]);
    assert_eq!(data.articles.len(), 2);
    assert_eq!(data.articles[0].identity(), "17");
    assert_eq!(data.articles[0].source_name(), Some("Reuters"));
    assert_eq!(data.articles[1].identity(), "https://news.test/b");
    assert_eq!(data.articles[1].source_name(), None);
}

#[tokio::test]
async fn search_tolerates_null_article_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "articles": [
                    {
                        "id": "a-1",
                        "title": null,
                        "description": null,
                        "url": "https://news.test/a",
                        "publishedAt": null,
                        "company": null,
                        "source": null
                    },
                    { "title": "Acme hires", "url": null }
                ],
                "metadata": { "sources": [], "totalPages": 1, "totalResults": 2 }
            }
        })))
        .mount(&server)
        .await;

    let response = client_for(&server).search(&request(1)).await.expect("search ok");
    let articles = response.data.articles;
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].identity(), "a-1");
    assert_eq!(articles[0].title(), "");
    assert_eq!(articles[0].published_at(), "");
    assert_eq!(articles[0].company(), "");
    assert_eq!(articles[1].url(), "");
    assert_eq!(articles[1].identity(), "Acme hires");
}

#[tokio::test]
async fn search_surfaces_server_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/news"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({ "error": "Rate limit exceeded" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).search(&request(1)).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(429));
    assert_eq!(err.server_message.as_deref(), Some("Rate limit exceeded"));
}

#[tokio::test]
async fn search_fails_on_status_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/news"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server).search(&request(1)).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert_eq!(err.server_message, None);
}

#[tokio::test]
async fn search_rejects_malformed_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/news"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).search(&request(1)).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidResponse);
}

#[tokio::test]
async fn search_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/news"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("{}"),
        )
        .mount(&server)
        .await;

    let settings = SearchSettings {
        request_timeout: Duration::from_millis(50),
        ..SearchSettings::with_base_url(server.uri())
    };
    let err = ReqwestSearchClient::new(settings)
        .search(&request(1))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn search_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/news"))
        .respond_with(ResponseTemplate::new(200).set_body_string("01234567890"))
        .mount(&server)
        .await;

    let settings = SearchSettings {
        max_bytes: 10,
        ..SearchSettings::with_base_url(server.uri())
    };
    let err = ReqwestSearchClient::new(settings)
        .search(&request(1))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}
