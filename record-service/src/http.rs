//! HTTP listener
//!
//! REST view over the same catalog the gRPC listener serves.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use error::{ErrorResponse, NOT_FOUND_MESSAGE};

use crate::service::RecordCatalog;

/// State shared by the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub catalog: RecordCatalog,
    pub version: String,
}

/// `?id=` form of a lookup, for identifiers that cannot travel as a path
/// segment (`.` and `..` are removed by URL normalization).
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub id: String,
}

/// Build the HTTP router
pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/movies", get(list_movies))
        .route("/user", get(get_movie_by_query))
        .route("/user/:id", get(get_movie))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn list_movies(State(state): State<HttpState>) -> Response {
    Json(state.catalog.list().await).into_response()
}

async fn get_movie(State(state): State<HttpState>, Path(id): Path<String>) -> Response {
    find_movie(&state, id).await
}

async fn get_movie_by_query(State(state): State<HttpState>, Query(query): Query<LookupQuery>) -> Response {
    find_movie(&state, query.id).await
}

async fn find_movie(state: &HttpState, id: String) -> Response {
    match state.catalog.find(&id).await {
        Some(record) => Json(record).into_response(),
        None => {
            tracing::info!(id = %id, "HTTP lookup found no movie");
            (StatusCode::NOT_FOUND, Json(ErrorResponse::new(NOT_FOUND_MESSAGE))).into_response()
        }
    }
}

async fn health(State(state): State<HttpState>) -> Json<serde_json::Value> {
    Json(json!({ "healthy": true, "version": state.version }))
}
