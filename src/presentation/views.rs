//! Askama view types for the two layout strategies.
//!
//! `title_html`, `teaser_src` and `author_src` arrive pre-sanitized and
//! are marked `|safe` in the templates; everything else goes through the
//! default HTML escaping.

use askama::{Error as AskamaError, Template};
use thiserror::Error;

use crate::{application::error::AppError, infra::assets::FontFaces};

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for AppError {
    fn from(err: TemplateRenderError) -> Self {
        AppError::unexpected(format!(
            "{} ({}): {}",
            err.public_message, err.source, err.error
        ))
    }
}

pub fn render_document<T: Template>(template: T) -> Result<String, TemplateRenderError> {
    template.render().map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_document",
            "Template rendering failed",
            err,
        )
    })
}

/// Derived CSS sizes, fixed multiples of the composer's base unit.
pub struct DocumentSizes {
    pub title_px: u32,
    pub heading_px: u32,
    pub meta_px: u32,
}

pub struct CardView<'a> {
    pub background: &'a str,
    pub fonts: &'a FontFaces,
    pub title_html: String,
    pub domain: Option<&'a str>,
    pub author: Option<&'a str>,
    pub teaser_src: Option<String>,
    pub author_src: Option<String>,
    pub date_display: Option<String>,
    pub sizes: DocumentSizes,
}

#[derive(Template)]
#[template(path = "card.html")]
pub struct CardTemplate<'a> {
    pub view: CardView<'a>,
}

pub struct HeroView<'a> {
    pub fonts: &'a FontFaces,
    pub title_html: String,
    pub domain: Option<&'a str>,
    pub author: Option<&'a str>,
    pub teaser_src: Option<String>,
    pub author_src: Option<String>,
    pub date_display: Option<String>,
    pub sizes: DocumentSizes,
}

#[derive(Template)]
#[template(path = "hero.html")]
pub struct HeroTemplate<'a> {
    pub view: HeroView<'a>,
}
