//! Title rendering: markdown in, inline HTML fragment out.
//!
//! The pipeline runs in three stages: comrak renders the markdown (with
//! raw HTML passthrough enabled so untrusted markup reaches the
//! sanitizer instead of being silently replaced), ammonia reduces the
//! result to the inline allowlist a heading can carry, and the emoji
//! stage rewrites emoji sequences to Twemoji image references.

mod emoji;

use std::collections::HashSet;

use ammonia::Builder as AmmoniaBuilder;
use comrak::{Options, markdown_to_html};

pub use emoji::replace_emoji;

pub struct TitleRenderer {
    options: Options<'static>,
    sanitizer: AmmoniaBuilder<'static>,
}

impl TitleRenderer {
    pub fn new() -> Self {
        Self {
            options: title_options(),
            sanitizer: build_title_sanitizer(),
        }
    }

    /// Render a markdown title into an HTML fragment safe to embed inside
    /// the document heading. Emoji-free plain titles come back as a bare
    /// paragraph with the text untouched.
    pub fn render(&self, title: &str) -> String {
        let rendered = markdown_to_html(title, &self.options);
        let sanitized = self.sanitizer.clean(&rendered).to_string();
        emoji::replace_emoji(sanitized.trim_end())
    }
}

impl Default for TitleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn title_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.render.r#unsafe = true;
    options
}

/// Inline allowlist for title markup. Block constructs are not forbidden
/// (the fragment lands inside an `<h1>`, which tolerates them) but
/// anything script-bearing is stripped.
fn build_title_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();

    let tags: HashSet<&'static str> = HashSet::from([
        "a",
        "blockquote",
        "br",
        "code",
        "del",
        "em",
        "i",
        "img",
        "li",
        "ol",
        "p",
        "pre",
        "s",
        "strong",
        "sub",
        "sup",
        "u",
        "ul",
    ]);
    builder.tags(tags);
    builder.add_url_schemes(["http", "https", "mailto"].iter().copied());

    builder
}
