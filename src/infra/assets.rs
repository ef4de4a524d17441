//! Embedded binary assets: the theme store consumed by the composer and
//! static file serving for the preview shell.

use std::borrow::Cow;

use axum::{
    body::Body,
    extract::Path,
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use include_dir::{Dir, include_dir};
use mime_guess::{Mime, MimeGuess};

use crate::{application::error::ErrorReport, domain::card::Theme};

use super::error::InfraError;

static EMBEDDED_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");
static STATIC_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

const PREVIEW_SHELL: &str = "preview.html";

/// Base64 font blobs shared by every theme, one per `@font-face` rule.
#[derive(Debug, Clone)]
pub struct FontFaces {
    pub regular: String,
    pub medium: String,
    pub bold: String,
    pub italic: String,
}

/// Process-wide immutable theme assets, base64-encoded exactly once at
/// startup. A missing or empty asset file fails the load, never a request.
pub struct ThemeAssetStore {
    blend_blue: String,
    blend_orange: String,
    blend_rouge: String,
    fonts: FontFaces,
}

impl ThemeAssetStore {
    pub fn load() -> Result<Self, InfraError> {
        Ok(Self {
            blend_blue: encoded_asset("blends/blue.jpg")?,
            blend_orange: encoded_asset("blends/orange.jpg")?,
            blend_rouge: encoded_asset("blends/rouge.jpg")?,
            fonts: FontFaces {
                regular: encoded_asset("fonts/CardSans-Regular.woff2")?,
                medium: encoded_asset("fonts/CardSans-Medium.woff2")?,
                bold: encoded_asset("fonts/CardSans-Bold.woff2")?,
                italic: encoded_asset("fonts/CardSerif-Italic.woff2")?,
            },
        })
    }

    /// Background blend for the theme. Total: the enum is closed and
    /// unknown names were already folded to the blue default by
    /// [`Theme::parse`].
    pub fn resolve(&self, theme: Theme) -> &str {
        match theme {
            Theme::Blue => &self.blend_blue,
            Theme::Orange => &self.blend_orange,
            Theme::Rouge => &self.blend_rouge,
        }
    }

    pub fn fonts(&self) -> &FontFaces {
        &self.fonts
    }
}

fn encoded_asset(path: &str) -> Result<String, InfraError> {
    let file = EMBEDDED_ASSETS
        .get_file(path)
        .ok_or_else(|| InfraError::asset(format!("embedded asset `{path}` is missing")))?;
    let contents = file.contents();
    if contents.is_empty() {
        return Err(InfraError::asset(format!("embedded asset `{path}` is empty")));
    }
    Ok(STANDARD.encode(contents))
}

/// Serve the interactive preview page at the root.
pub async fn serve_preview_shell() -> Response {
    match STATIC_ASSETS.get_file(PREVIEW_SHELL) {
        Some(file) => Html(file.contents()).into_response(),
        None => not_found_response("infra::assets::serve_preview_shell"),
    }
}

/// Serve embedded static assets for the preview shell.
pub async fn serve_static(path: Option<Path<String>>) -> Response {
    let captured = path.map(|Path(value)| value);
    match resolve_asset(&STATIC_ASSETS, captured) {
        Some(asset) => asset.into_response(),
        None => not_found_response("infra::assets::serve_static"),
    }
}

fn not_found_response(source: &'static str) -> Response {
    let mut response = StatusCode::NOT_FOUND.into_response();
    ErrorReport::from_message(source, StatusCode::NOT_FOUND, "Static asset not found")
        .attach(&mut response);
    response
}

struct Asset<'a> {
    contents: Cow<'a, [u8]>,
    mime: MimeGuess,
}

fn resolve_asset(bundle: &'static Dir<'static>, path: Option<String>) -> Option<Asset<'static>> {
    let mut candidate = path.unwrap_or_default();
    if candidate.starts_with('/') {
        candidate = candidate.trim_start_matches('/').to_string();
    }

    if candidate.is_empty() || candidate.ends_with('/') || candidate.contains("..") {
        // Avoid directory traversal and disallow directory listings.
        return None;
    }

    let file = bundle.get_file(&candidate)?;
    let mime = mime_guess::from_path(&candidate);
    Some(Asset {
        contents: Cow::Borrowed(file.contents()),
        mime,
    })
}

impl IntoResponse for Asset<'static> {
    fn into_response(self) -> Response {
        let mime = self.mime.first_or_octet_stream();
        match self.contents {
            Cow::Borrowed(slice) => build_response(Bytes::from_static(slice), mime),
            Cow::Owned(bytes) => build_response(Bytes::from(bytes), mime),
        }
    }
}

fn build_response(bytes: Bytes, mime: Mime) -> Response {
    let len = bytes.len();
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = StatusCode::OK;

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&len.to_string()) {
        headers.insert(header::CONTENT_LENGTH, value);
    }
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=31536000, immutable"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_loads_and_resolves_every_theme() {
        let store = ThemeAssetStore::load().expect("embedded assets present");
        for theme in [Theme::Blue, Theme::Orange, Theme::Rouge] {
            assert!(!store.resolve(theme).is_empty());
        }
        assert!(!store.fonts().regular.is_empty());
    }

    #[test]
    fn unknown_and_absent_theme_names_share_the_blue_blend() {
        let store = ThemeAssetStore::load().expect("embedded assets present");
        let blue = store.resolve(Theme::Blue);
        assert_eq!(store.resolve(Theme::parse(None)), blue);
        assert_eq!(store.resolve(Theme::parse(Some("not-a-theme"))), blue);
    }

    #[test]
    fn traversal_paths_resolve_to_nothing() {
        assert!(resolve_asset(&STATIC_ASSETS, Some("../Cargo.toml".into())).is_none());
        assert!(resolve_asset(&STATIC_ASSETS, Some("".into())).is_none());
        assert!(resolve_asset(&STATIC_ASSETS, Some("nested/".into())).is_none());
    }

    #[test]
    fn preview_shell_is_embedded() {
        assert!(STATIC_ASSETS.get_file(PREVIEW_SHELL).is_some());
    }
}
