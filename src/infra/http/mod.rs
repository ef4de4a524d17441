//! HTTP surface: router, card handler and the preview shell endpoints.

pub mod middleware;

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, Uri},
    middleware as axum_middleware,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tracing::info;

use crate::{
    application::{compose::DocumentComposer, error::AppError},
    domain::card::{CardQuery, CardRequest, FileType},
    infra::assets,
};

use middleware::{log_responses, set_request_context};

/// Response header telling the collaborating rasterizer which raster
/// format the caller asked for.
pub const CARD_FORMAT_HEADER: &str = "x-card-format";

#[derive(Clone)]
pub struct HttpState {
    pub composer: Arc<DocumentComposer>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(assets::serve_preview_shell))
        .route("/healthz", get(health))
        .route("/static/{*path}", get(assets::serve_static))
        .route("/{*path}", get(card))
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}

/// The pipeline endpoint. The raw (still percent-encoded) URI path is
/// handed to the parser; the strict title decoding happens there, not in
/// an extractor.
async fn card(
    State(state): State<HttpState>,
    uri: Uri,
    Query(query): Query<CardQuery>,
) -> Response {
    info!(target = "cardsmith::http", path = %uri.path(), "card request");

    let request = match CardRequest::from_parts(uri.path(), query) {
        Ok(request) => request,
        Err(err) => return AppError::from(err).into_response(),
    };
    let format = request.file_type;

    match state.composer.compose(&request) {
        Ok(document) => card_response(document, format),
        Err(err) => err.into_response(),
    }
}

fn card_response(document: String, format: FileType) -> Response {
    let mut response = Html(document).into_response();
    response
        .headers_mut()
        .insert(CARD_FORMAT_HEADER, HeaderValue::from_static(format.as_str()));
    response
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}
