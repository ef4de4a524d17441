//! Router-level tests driving the public surface with `tower::ServiceExt`.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::CONTENT_TYPE},
    response::Response,
};
use tower::ServiceExt;

use cardsmith::{
    application::compose::DocumentComposer,
    infra::{
        assets::ThemeAssetStore,
        http::{CARD_FORMAT_HEADER, HttpState, build_router},
    },
};

fn router() -> Router {
    let assets = Arc::new(ThemeAssetStore::load().expect("embedded assets"));
    let composer = Arc::new(DocumentComposer::new(assets));
    build_router(HttpState { composer })
}

async fn get(path: &str) -> Response {
    router()
        .oneshot(
            Request::builder()
                .uri(path)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response")
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

#[tokio::test]
async fn card_happy_path_is_html_with_a_format_hint() {
    let response = get("/Hello.png?domain=tech").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"), "{content_type}");
    assert_eq!(
        response
            .headers()
            .get(CARD_FORMAT_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some("png")
    );

    let body = body_text(response).await;
    assert!(body.contains("Hello"));
    assert!(body.contains("tech"));
}

#[tokio::test]
async fn jpeg_extension_negotiates_jpeg_output() {
    let response = get("/Hello.jpeg").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(CARD_FORMAT_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some("jpeg")
    );
}

#[tokio::test]
async fn unrecognized_extensions_fall_back_to_png() {
    let response = get("/Hello.gif").await;
    assert_eq!(
        response
            .headers()
            .get(CARD_FORMAT_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some("png")
    );
}

#[tokio::test]
async fn encoded_titles_are_decoded_before_rendering() {
    let response = get("/Hello%20World.png").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Hello World"));
}

#[tokio::test]
async fn malformed_percent_escape_is_a_client_error() {
    let response = get("/bad%G1.png").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_probe_is_silent() {
    let response = get("/healthz").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn preview_shell_is_served_at_the_root() {
    let response = get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("cardsmith preview"));
}

#[tokio::test]
async fn unknown_static_assets_are_not_found() {
    let response = get("/static/nope.css").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
