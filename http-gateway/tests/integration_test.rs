//! Integration tests for the HTTP gateway against a live record service
//!
//! The record service's REST listener runs in-process on an ephemeral port.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode as AxumStatus};
use axum::{routing::get, Router};
use http_body_util::BodyExt;
use http_gateway::{http_router, AppState, RecordHttpRouter, SOURCE};
use record_service::http::HttpState;
use record_service::server::serve_http;
use record_service::{InMemoryStore, Record, RecordCatalog};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceExt;

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });
    format!("http://{}", addr)
}

async fn start_record_service(shutdown: watch::Receiver<bool>) -> String {
    let store = InMemoryStore::new(vec![
        Record::new(1, "Dune", "Villeneuve"),
        Record::new("tt-2", "Arrival", "Villeneuve"),
        Record::new("..", "Dot Dot", "Nobody"),
    ]);
    let state = HttpState {
        catalog: RecordCatalog::new(Arc::new(store)),
        version: "test".to_string(),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve_http(listener, state, shutdown));
    format!("http://{}", addr)
}

async fn start_gateway(upstream_url: &str, timeout: Duration) -> String {
    let state = AppState {
        router: RecordHttpRouter::new(upstream_url, timeout).unwrap(),
        version: "test".to_string(),
    };
    serve(http_router(state)).await
}

async fn fetch(url: String) -> (StatusCode, Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_found_movie_is_wrapped() {
    let (_shutdown, rx) = watch::channel(false);
    let upstream = start_record_service(rx).await;
    let gateway = start_gateway(&upstream, Duration::from_secs(5)).await;

    let (status, body) = fetch(format!("{}/user/1", gateway)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "source": SOURCE,
            "details": {"movie_id": 1, "title": "Dune", "director": "Villeneuve"}
        })
    );
}

#[tokio::test]
async fn test_text_identifiers_pass_through() {
    let (_shutdown, rx) = watch::channel(false);
    let upstream = start_record_service(rx).await;
    let gateway = start_gateway(&upstream, Duration::from_secs(5)).await;

    let (status, body) = fetch(format!("{}/user/tt-2", gateway)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"]["title"], "Arrival");
}

#[tokio::test]
async fn test_details_match_record_service_body() {
    let (_shutdown, rx) = watch::channel(false);
    let upstream = start_record_service(rx).await;
    let gateway = start_gateway(&upstream, Duration::from_secs(5)).await;

    for id in ["1", "tt-2", "999"] {
        let (_, direct) = fetch(format!("{}/user/{}", upstream, id)).await;
        for _ in 0..3 {
            let (status, body) = fetch(format!("{}/user/{}", gateway, id)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["details"], direct, "id {}", id);
        }
    }
}

#[tokio::test]
async fn test_missing_movie_error_object_is_passed_through() {
    let (_shutdown, rx) = watch::channel(false);
    let upstream = start_record_service(rx).await;
    let gateway = start_gateway(&upstream, Duration::from_secs(5)).await;

    let (status, body) = fetch(format!("{}/user/999", gateway)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"source": SOURCE, "details": {"error": "Movie Not Found"}})
    );
}

#[tokio::test]
async fn test_dot_segment_ids_reach_record_service() {
    let (_shutdown, rx) = watch::channel(false);
    let upstream = start_record_service(rx).await;
    let app = http_router(AppState {
        router: RecordHttpRouter::new(&upstream, Duration::from_secs(5)).unwrap(),
        version: "test".to_string(),
    });

    // Clients would normalize these paths away, so drive the router directly.
    for (uri, details) in [
        ("/user/%2E%2E", json!({"movie_id": "..", "title": "Dot Dot", "director": "Nobody"})),
        ("/user/%2E", json!({"error": "Movie Not Found"})),
    ] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), AxumStatus::OK, "uri {}", uri);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"source": SOURCE, "details": details}), "uri {}", uri);
    }
}

#[tokio::test]
async fn test_non_json_response_is_server_error() {
    let upstream = serve(Router::new().route("/user/:id", get(|| async { "<html>oops</html>" }))).await;
    let gateway = start_gateway(&upstream, Duration::from_secs(5)).await;

    let (status, body) = fetch(format!("{}/user/1", gateway)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_upstream_error_status_is_server_error() {
    let upstream = serve(Router::new().route(
        "/user/:id",
        get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "{\"error\": \"boom\"}") }),
    ))
    .await;
    let gateway = start_gateway(&upstream, Duration::from_secs(5)).await;

    let (status, _) = fetch(format!("{}/user/1", gateway)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let upstream = serve(Router::new().route(
        "/user/:id",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "{}"
        }),
    ))
    .await;
    let gateway = start_gateway(&upstream, Duration::from_millis(200)).await;

    let (status, body) = fetch(format!("{}/user/1", gateway)).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "Upstream timeout");
}

#[tokio::test]
async fn test_record_service_down_is_server_error() {
    let (shutdown, rx) = watch::channel(false);
    let upstream = start_record_service(rx).await;
    shutdown.send(true).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let gateway = start_gateway(&upstream, Duration::from_secs(5)).await;
    let (status, body) = fetch(format!("{}/user/1", gateway)).await;
    assert!(status.is_server_error(), "unexpected status {}", status);
    assert!(body.get("details").is_none());
}
