//! HTTP surface of the RPC gateway

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;

use error::{AppError, ErrorResponse};

use crate::router::RecordRouter;

/// Provenance of every response this gateway produces
pub const SOURCE: &str = "Data from Record Service via gRPC";

/// Gateway response for a found movie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieEnvelope {
    pub source: String,
    pub user_name: String,
    pub email: String,
}

/// State shared by the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: RecordRouter,
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

/// Parse the path identifier; integers only.
pub fn parse_movie_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("movie id must be an integer, got {:?}", raw)))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MovieEnvelope>, ApiError> {
    let movie_id = parse_movie_id(&id)?;
    tracing::debug!(movie_id, upstream = state.router.upstream_url(), "Forwarding lookup over gRPC");

    let movie = state.router.get_movie(movie_id).await?;

    Ok(Json(MovieEnvelope {
        source: SOURCE.to_string(),
        user_name: movie.user_name,
        email: movie.email,
    }))
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "healthy": true, "version": state.version }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(upstream_url: &str) -> Router {
        router(AppState {
            router: RecordRouter::new(upstream_url, Duration::from_secs(2)),
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

    #[test]
    fn test_parse_movie_id() {
        assert_eq!(parse_movie_id("42").unwrap(), 42);
        assert!(matches!(parse_movie_id("abc"), Err(AppError::Validation(_))));
        assert!(parse_movie_id("1.5").is_err());
        assert!(parse_movie_id("").is_err());
    }

    #[tokio::test]
    async fn test_non_integer_id_is_bad_request() {
        // Invalid URL: reaching the upstream would yield a 500, not a 400
        let (status, body) = get_json(app("not a url"), "/user/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["source"], SOURCE);
    }

    #[tokio::test]
    async fn test_upstream_down_is_bad_gateway() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (status, body) = get_json(app(&format!("http://{}", addr)), "/user/1").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Upstream unavailable");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app("http://127.0.0.1:1"), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["version"], "test");
    }
}
