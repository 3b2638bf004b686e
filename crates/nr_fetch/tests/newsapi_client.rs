use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use nr_core::Error;
use nr_fetch::{FeedClient, FeedParams, FetchConfig, FetchGateway, NewsApiClient};
use serde_json::{json, Value};

async fn top_headlines(Query(query): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    if query.get("apiKey").map(String::as_str) != Some("test-key") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"status": "error", "code": "apiKeyInvalid", "message": "bad key"})),
        );
    }

    let category = query.get("category").cloned().unwrap_or_default();
    let country = query.get("country").cloned().unwrap_or_default();
    match category.as_str() {
        "broken" => (StatusCode::OK, Json(json!({"unexpected": true}))),
        "down" => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({}))),
        _ => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "totalResults": 1,
                "articles": [{
                    "source": {"id": null, "name": "Local Wire"},
                    "author": "Reporter",
                    "title": format!("{} headline for {}", category, country),
                    "description": null,
                    "url": format!("https://local.test/{}/{}", category, country),
                    "urlToImage": null,
                    "publishedAt": "2024-03-01T10:00:00Z",
                    "content": "Body text",
                    "category": "should-be-ignored"
                }]
            })),
        ),
    }
}

async fn spawn_feed() -> SocketAddr {
    let app = Router::new().route("/v2/top-headlines", get(top_headlines));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr, key: &str) -> NewsApiClient {
    NewsApiClient::new(key, &format!("http://{}/v2", addr), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn fetches_and_parses_envelope() {
    let addr = spawn_feed().await;
    let envelope = client(addr, "test-key")
        .fetch(&FeedParams::new("science", "gb"))
        .await
        .unwrap();

    let articles = envelope.into_articles().unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title.as_deref(), Some("science headline for gb"));
}

#[tokio::test]
async fn error_status_surfaces_as_invalid_envelope() {
    let addr = spawn_feed().await;
    let envelope = client(addr, "wrong-key")
        .fetch(&FeedParams::new("science", "gb"))
        .await
        .unwrap();

    assert!(matches!(envelope.into_articles(), Err(Error::InvalidEnvelope(_))));
}

#[tokio::test]
async fn server_errors_are_transport_failures() {
    let addr = spawn_feed().await;
    let err = client(addr, "test-key")
        .fetch(&FeedParams::new("down", "us"))
        .await
        .unwrap_err();

    assert!(err.is_retryable());
}

#[tokio::test]
async fn refused_connection_is_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(addr, "test-key")
        .fetch(&FeedParams::new("sports", "us"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(ref m) if !m.contains("test-key")));
}

#[tokio::test]
async fn gateway_over_http_tags_and_skips_bad_pairs() {
    let addr = spawn_feed().await;
    let config = FetchConfig {
        categories: vec!["technology".into(), "broken".into()],
        regions: vec!["us".into(), "au".into()],
        max_attempts: 2,
        retry_delay: Duration::from_millis(10),
        concurrency: 4,
    };
    let gateway = FetchGateway::new(Arc::new(client(addr, "test-key")), config);

    let mut articles = gateway.fetch_all().await;
    articles.sort_by(|a, b| a.url.cmp(&b.url));

    assert_eq!(articles.len(), 2);
    assert!(articles.iter().all(|a| a.category == "technology"));
    assert_eq!(articles[0].region, "au");
    assert_eq!(articles[1].region, "us");
    assert_eq!(articles[0].source, "Local Wire");
    assert_eq!(articles[0].description, "");
}
