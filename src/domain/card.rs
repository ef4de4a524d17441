//! Card request descriptor and path parsing.
//!
//! A request path of the form `/<title>.<extension>` plus an optional
//! query string is turned into an immutable [`CardRequest`]. Every field
//! except the title degrades to a documented default; the only way the
//! parse can fail is a malformed percent escape in the title segment.

use serde::Deserialize;

use super::error::DomainError;

pub const DEFAULT_LOCALE: &str = "en";

/// Raster format the downstream rasterizer should emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Png,
    Jpeg,
}

impl FileType {
    /// `Jpeg` iff the extension is literally `jpeg` (case-sensitive);
    /// every other extension, including none at all, is `Png`.
    pub fn from_extension(extension: &str) -> Self {
        if extension == "jpeg" {
            Self::Jpeg
        } else {
            Self::Png
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }
}

/// Named visual variant selecting a background blend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Blue,
    Orange,
    Rouge,
}

impl Theme {
    /// Absent or unrecognized names fold to the blue default.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("orange") => Self::Orange,
            Some("rouge") => Self::Rouge,
            _ => Self::Blue,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Orange => "orange",
            Self::Rouge => "rouge",
        }
    }
}

/// Composition strategy over the shared descriptor. `Card` is the themed
/// rounded-aside layout; `Hero` is the theme-free full-width layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Card,
    Hero,
}

impl Layout {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("hero") => Self::Hero,
            _ => Self::Card,
        }
    }
}

/// Wire-side query parameters. Field names mirror the public query string.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct CardQuery {
    pub theme: Option<String>,
    pub domain: Option<String>,
    #[serde(rename = "teaserImage")]
    pub teaser_image: Option<String>,
    pub author: Option<String>,
    #[serde(rename = "authorImage")]
    pub author_image: Option<String>,
    pub date: Option<String>,
    pub locale: Option<String>,
    pub layout: Option<String>,
}

/// Structured, defaulted description of a single card request. Built once
/// per request, consumed by the composer, then discarded.
#[derive(Debug, Clone)]
pub struct CardRequest {
    pub file_type: FileType,
    pub theme: Theme,
    pub layout: Layout,
    pub title: String,
    pub domain: Option<String>,
    pub teaser_image: Option<String>,
    pub author: Option<String>,
    pub author_image: Option<String>,
    pub date: Option<String>,
    pub locale: String,
}

impl CardRequest {
    /// Build a descriptor from the raw (still percent-encoded) request
    /// path and its parsed query.
    pub fn from_parts(path: &str, query: CardQuery) -> Result<Self, DomainError> {
        let (raw_title, file_type) = split_card_path(path);
        let title = percent_decode(raw_title)?;

        Ok(Self {
            file_type,
            theme: Theme::parse(query.theme.as_deref()),
            layout: Layout::parse(query.layout.as_deref()),
            title,
            domain: query.domain,
            teaser_image: query.teaser_image,
            author: query.author,
            author_image: query.author_image,
            date: query.date,
            locale: query.locale.unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
        })
    }
}

/// Split `/<title>.<extension>` into the still-encoded title and the
/// resolved file type. Only the final dot segment counts as an extension,
/// so dots embedded in the title survive: `/v1.2.title` → `v1.2` + `title`.
fn split_card_path(path: &str) -> (&str, FileType) {
    let remainder = path.strip_prefix('/').unwrap_or(path);
    match remainder.rsplit_once('.') {
        Some((title, extension)) => (title, FileType::from_extension(extension)),
        None => (remainder, FileType::Png),
    }
}

/// Strict percent-decoding. An incomplete escape (`%2`), a non-hex escape
/// (`%G1`) or bytes that do not decode to UTF-8 are validation errors;
/// everything else passes through untouched (`+` is not a space here).
fn percent_decode(input: &str) -> Result<String, DomainError> {
    let raw = input.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        if raw[i] == b'%' {
            let escape = raw.get(i + 1..i + 3).ok_or_else(|| {
                DomainError::validation(format!("incomplete percent escape at byte {i} of title"))
            })?;
            let (hi, lo) = match (hex_digit(escape[0]), hex_digit(escape[1])) {
                (Some(hi), Some(lo)) => (hi, lo),
                _ => {
                    return Err(DomainError::validation(format!(
                        "invalid percent escape at byte {i} of title"
                    )));
                }
            };
            bytes.push((hi << 4) | lo);
            i += 3;
        } else {
            bytes.push(raw[i]);
            i += 1;
        }
    }

    String::from_utf8(bytes)
        .map_err(|_| DomainError::validation("title percent-decodes to invalid UTF-8"))
}

fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
