//! Document composition: a parsed descriptor plus the theme asset store
//! become a complete, self-contained HTML document.
//!
//! The composer is the only consumer of the three leaves: it resolves
//! theme assets, pushes the title through the markdown/emoji renderer,
//! sanitizes image sources and selects the layout template. Fonts and
//! the background blend are inlined as data URLs so the rasterizer never
//! fetches them over the network.

use std::sync::Arc;

use time::{
    Date, OffsetDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::{
    application::{error::AppError, render::TitleRenderer, sanitize::sanitize_src},
    domain::card::{CardRequest, Layout},
    infra::assets::ThemeAssetStore,
    presentation::views::{
        CardTemplate, CardView, DocumentSizes, HeroTemplate, HeroView, render_document,
    },
};

/// Base typographic unit in pixels. Derived sizes are fixed multiples of
/// it, not configurable inputs.
const BASE_FONT_PX: u32 = 100;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Text rendered in place of a date value that does not parse.
pub const INVALID_DATE_TEXT: &str = "Invalid Date";

pub struct DocumentComposer {
    assets: Arc<ThemeAssetStore>,
    titles: TitleRenderer,
}

impl DocumentComposer {
    pub fn new(assets: Arc<ThemeAssetStore>) -> Self {
        Self {
            assets,
            titles: TitleRenderer::new(),
        }
    }

    pub fn compose(&self, request: &CardRequest) -> Result<String, AppError> {
        let title_html = self.titles.render(&request.title);
        let teaser_src = embeddable_src(request.teaser_image.as_deref());
        let author_src = embeddable_src(request.author_image.as_deref());
        let date_display = request
            .date
            .as_deref()
            .map(|raw| display_date(raw, &request.locale));
        let sizes = DocumentSizes {
            title_px: BASE_FONT_PX * 5 / 4,
            heading_px: BASE_FONT_PX * 9 / 10,
            meta_px: BASE_FONT_PX * 4 / 5,
        };

        let document = match request.layout {
            Layout::Card => render_document(CardTemplate {
                view: CardView {
                    background: self.assets.resolve(request.theme),
                    fonts: self.assets.fonts(),
                    title_html,
                    domain: displayable(request.domain.as_deref()),
                    author: displayable(request.author.as_deref()),
                    teaser_src,
                    author_src,
                    date_display,
                    sizes,
                },
            })?,
            Layout::Hero => render_document(HeroTemplate {
                view: HeroView {
                    fonts: self.assets.fonts(),
                    title_html,
                    domain: displayable(request.domain.as_deref()),
                    author: displayable(request.author.as_deref()),
                    teaser_src,
                    author_src,
                    date_display,
                    sizes,
                },
            })?,
        };

        Ok(document)
    }
}

fn displayable(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Sanitized image source, or `None` when nothing safe remains; the
/// templates omit the element entirely in that case.
fn embeddable_src(value: Option<&str>) -> Option<String> {
    let cleaned = sanitize_src(value?);
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Locale-formatted display string for a raw date query value. Accepts a
/// calendar date or an RFC3339 timestamp; anything else renders as the
/// pinned [`INVALID_DATE_TEXT`] literal rather than failing the request.
fn display_date(raw: &str, locale: &str) -> String {
    let Some(date) = parse_card_date(raw.trim()) else {
        return INVALID_DATE_TEXT.to_string();
    };

    let day = date.day();
    let month = u8::from(date.month());
    let year = date.year();
    match locale.split(['-', '_']).next().unwrap_or(locale) {
        "en" => format!("{month}/{day}/{year}"),
        "de" => format!("{day}.{month}.{year}"),
        _ => format!("{day}/{month}/{year}"),
    }
}

fn parse_card_date(raw: &str) -> Option<Date> {
    if let Ok(stamp) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(stamp.date());
    }
    Date::parse(raw, ISO_DATE).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn en_dates_are_month_first_without_padding() {
        assert_eq!(display_date("2024-01-15", "en"), "1/15/2024");
        assert_eq!(display_date("2024-12-03", "en-US"), "12/3/2024");
    }

    #[test]
    fn de_dates_are_day_first_with_dots() {
        assert_eq!(display_date("2024-01-15", "de"), "15.1.2024");
    }

    #[test]
    fn other_locales_fall_back_to_day_first() {
        assert_eq!(display_date("2024-01-15", "fr"), "15/1/2024");
        assert_eq!(display_date("2024-01-15", "sv-SE"), "15/1/2024");
    }

    #[test]
    fn rfc3339_timestamps_use_their_date_part() {
        assert_eq!(display_date("2024-01-15T08:30:00Z", "en"), "1/15/2024");
    }

    #[test]
    fn unparseable_dates_render_the_pinned_literal() {
        assert_eq!(display_date("not-a-date", "en"), INVALID_DATE_TEXT);
        assert_eq!(display_date("2024-13-45", "en"), INVALID_DATE_TEXT);
        assert_eq!(display_date("", "en"), INVALID_DATE_TEXT);
    }

    #[test]
    fn unsafe_sources_are_not_embeddable() {
        assert_eq!(embeddable_src(Some("javascript:alert(1)")), None);
        assert_eq!(embeddable_src(Some("")), None);
        assert_eq!(embeddable_src(None), None);
        assert_eq!(
            embeddable_src(Some("https://example.com/a.png")).as_deref(),
            Some("https://example.com/a.png")
        );
    }

    #[test]
    fn blank_display_strings_are_omitted() {
        assert_eq!(displayable(Some("  ")), None);
        assert_eq!(displayable(Some("tech")), Some("tech"));
        assert_eq!(displayable(None), None);
    }
}
