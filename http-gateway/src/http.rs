//! HTTP surface of the REST gateway

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use error::{AppError, ErrorResponse};

use crate::router::RecordHttpRouter;

/// Provenance of every response this gateway produces
pub const SOURCE: &str = "Data from Record Service via REST";

/// Gateway response wrapping the record service's body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestEnvelope {
    pub source: String,
    pub details: Value,
}

/// State shared by the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: RecordHttpRouter,
    pub version: String,
}

/// [`AppError`] rendered as a JSON response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.0.report();
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse::from(&self.0).with_source(SOURCE);
        (status, Json(body)).into_response()
    }
}

/// Build the HTTP router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/user/:id", get(get_user))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RestEnvelope>, ApiError> {
    tracing::info!(id = %id, upstream = %state.router.base_url(), "Requesting movie from record service");

    let details = state.router.get_movie(&id).await?;

    Ok(Json(RestEnvelope {
        source: SOURCE.to_string(),
        details,
    }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "healthy": true, "version": state.version }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app(upstream_url: &str) -> Router {
        router(AppState {
            router: RecordHttpRouter::new(upstream_url, Duration::from_secs(2)).unwrap(),
            version: "test".to_string(),
        })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_upstream_down_is_bad_gateway() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (status, body) = get_json(app(&format!("http://{}", addr)), "/user/1").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["source"], SOURCE);
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app("http://127.0.0.1:1"), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["healthy"], true);
    }
}
